use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Instance to solve, in JSON
    #[arg(short, long, value_name = "FILE")]
    pub input_file: PathBuf,
    /// Folder the solution is written to
    #[arg(short, long, value_name = "FOLDER")]
    pub solution_folder: PathBuf,
    /// Configuration in JSON, defaults are used if absent
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    pub log_level: LevelFilter,
}
