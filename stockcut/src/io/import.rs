use crate::entities::{Instance, LengthMultiset};
use crate::io::ext_repr::{ExtInstance, ExtLengths};
use crate::{CutError, Result};

/// Imports an instance into the library
pub fn import(ext_instance: &ExtInstance) -> Result<Instance> {
    let stock = import_lengths(&ext_instance.stock)
        .map_err(|e| CutError::InputShape(format!("stock of {}: {e}", ext_instance.name)))?;
    let demand = import_lengths(&ext_instance.demand)
        .map_err(|e| CutError::InputShape(format!("demand of {}: {e}", ext_instance.name)))?;
    Ok(Instance::new(ext_instance.name.clone(), stock, demand))
}

/// Converts any of the accepted shapes into a [`LengthMultiset`]
pub fn import_lengths(ext_lengths: &ExtLengths) -> Result<LengthMultiset> {
    match ext_lengths {
        ExtLengths::Scalar(length) => LengthMultiset::from_scalar(*length),
        ExtLengths::List(lengths) => LengthMultiset::from_lengths(lengths.iter().copied()),
        ExtLengths::Counts(counts) => {
            let counts: Vec<(f64, usize)> = counts
                .iter()
                .map(|(length, qty)| Ok((parse_length(length)?, *qty)))
                .collect::<Result<_>>()?;
            LengthMultiset::from_counts(counts)
        }
        ExtLengths::Entries(entries) => {
            let entries = entries
                .iter()
                .map(|entry| {
                    entry
                        .iter()
                        .map(|(length, qty)| Ok((parse_length(length)?, *qty)))
                        .collect::<Result<Vec<_>>>()
                })
                .collect::<Result<Vec<_>>>()?;
            LengthMultiset::from_entries(entries)
        }
        ExtLengths::Unrecognized(_) => Err(CutError::InputShape(
            "expected a length, a list of lengths, a length to quantity mapping or a list of such mappings"
                .into(),
        )),
    }
}

fn parse_length(key: &str) -> Result<f64> {
    key.trim()
        .parse::<f64>()
        .map_err(|_| CutError::InputShape(format!("{key:?} is not a length")))
}
