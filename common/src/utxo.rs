//! UTXO records as returned by an address UTXO lookup

use serde::{Deserialize, Serialize};

use crate::asset::{lovelace_in, native_assets_in, AmountEntry, LOVELACE_UNIT};
use crate::Lovelace;

/// One unspent output, in the indexer's `/addresses/{address}/utxos` shape.
///
/// Every field defaults when absent so that a malformed record still loads;
/// missing amounts then count as zero wherever totals are taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UtxoRecord {
    #[serde(default)]
    pub tx_hash: String,

    #[serde(default)]
    pub output_index: u32,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub amount: Vec<AmountEntry>,

    /// Unix seconds of the block that created the output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_time: Option<i64>,
}

impl UtxoRecord {
    pub fn lovelace(&self) -> Lovelace {
        lovelace_in(&self.amount)
    }

    /// True when the output carries lovelace and nothing else
    pub fn is_pure_ada(&self) -> bool {
        self.amount.len() == 1 && self.amount[0].unit == LOVELACE_UNIT
    }

    pub fn native_assets(&self) -> impl Iterator<Item = &AmountEntry> {
        native_assets_in(&self.amount)
    }

    /// `tx_hash#index` reference
    pub fn reference(&self) -> String {
        format!("{}#{}", self.tx_hash, self.output_index)
    }
}

/// Total lovelace over a set of UTXOs, saturating at `Lovelace::MAX`
pub fn total_lovelace<'a>(utxos: impl IntoIterator<Item = &'a UtxoRecord>) -> Lovelace {
    utxos.into_iter().map(UtxoRecord::lovelace).fold(0, Lovelace::saturating_add)
}
