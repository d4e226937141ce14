use std::fs;
use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{info, warn};
use stockcut_cli::config::CliConfig;
use stockcut_cli::io::cli::Cli;
use stockcut_cli::io::output::Output;
use stockcut_cli::{driver, io};

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            CliConfig::default()
        }
        Some(config_file) => {
            let file = File::open(&config_file)
                .with_context(|| format!("could not open config file: {}", config_file.display()))?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).context("incorrect config file format")?
        }
    };

    info!("[MAIN] Successfully parsed CliConfig: {config:?}");

    let input_file_stem = args
        .input_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .context("input file name is not valid unicode")?;

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!("could not create solution folder: {:?}", args.solution_folder)
        })?;
    }

    let ext_instance = io::read_instance(args.input_file.as_path())?;
    let instance = stockcut::io::import(&ext_instance)?;
    let plan = driver::solve(&instance, &config)?;

    let output = Output {
        instance: ext_instance,
        plan: stockcut::io::export(&plan),
        config,
    };
    let solution_path = args.solution_folder.join(format!("sol_{input_file_stem}.json"));
    io::write_json(&output, &solution_path)?;

    Ok(())
}
