//! UTXO list loading from an indexer JSON dump

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use lookout_common::UtxoRecord;
use tracing::{info, warn};

/// Read an array of UTXO records. A record that does not match the
/// expected shape is kept as an empty record so it counts as zero.
pub fn load_utxos(path: &Path) -> Result<Vec<UtxoRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read UTXO file {}", path.display()))?;
    let utxos = parse_utxos(&text)
        .with_context(|| format!("Failed to parse UTXO file {}", path.display()))?;
    info!(count = utxos.len(), "Loaded UTXOs from {}", path.display());
    Ok(utxos)
}

pub fn parse_utxos(text: &str) -> Result<Vec<UtxoRecord>> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Array(records) = value else {
        bail!("Expected a JSON array of UTXOs");
    };

    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record).unwrap_or_else(|e| {
                warn!("Malformed UTXO record {index}: {e}");
                UtxoRecord::default()
            })
        })
        .collect())
}
