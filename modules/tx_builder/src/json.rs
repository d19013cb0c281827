//! Canonical JSON view of a draft, for hand-off to an external signing tool.
//!
//! Optional sections are left out entirely when empty rather than written
//! as `null` or `[]`.

use std::collections::BTreeMap;

use bigdecimal::ToPrimitive;
use lookout_common::{AmountEntry, Lovelace};
use serde::Serialize;

use crate::draft::{DraftInput, DraftOutput, TransactionDraft, Withdrawal};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputJson {
    pub tx_hash: String,
    pub output_index: u32,
    pub address: String,
    pub amount: Vec<AmountEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollateralJson {
    pub tx_hash: String,
    pub output_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputJson {
    pub address: String,
    /// ADA, as a JSON number
    pub amount: f64,
    pub assets: Vec<AmountEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionJson {
    pub inputs: Vec<InputJson>,
    pub outputs: Vec<OutputJson>,
    pub fee: Lovelace,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub collateral: Option<Vec<CollateralJson>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<u64, serde_json::Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_start: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_end: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_signers: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificates: Option<Vec<serde_json::Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawals: Option<Vec<Withdrawal>>,
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

impl From<&DraftInput> for InputJson {
    fn from(input: &DraftInput) -> Self {
        Self {
            tx_hash: input.utxo.tx_hash.clone(),
            output_index: input.utxo.output_index,
            address: input.utxo.address.clone(),
            amount: input.utxo.amount.clone(),
        }
    }
}

impl From<&DraftInput> for CollateralJson {
    fn from(input: &DraftInput) -> Self {
        Self {
            tx_hash: input.utxo.tx_hash.clone(),
            output_index: input.utxo.output_index,
        }
    }
}

impl From<&DraftOutput> for OutputJson {
    fn from(output: &DraftOutput) -> Self {
        Self {
            address: output.address.clone(),
            amount: output.amount_ada.to_f64().unwrap_or(0.0),
            assets: output.assets.clone(),
        }
    }
}

impl TransactionJson {
    pub fn from_draft(draft: &TransactionDraft, fee: Lovelace) -> Self {
        Self {
            inputs: draft.inputs.iter().map(InputJson::from).collect(),
            outputs: draft.outputs.iter().map(OutputJson::from).collect(),
            fee,
            collateral: non_empty(draft.collateral.iter().map(CollateralJson::from).collect()),
            metadata: (!draft.metadata.is_empty()).then(|| draft.metadata.clone()),
            validity_start: draft.validity_start,
            validity_end: draft.validity_end,
            required_signers: non_empty(
                draft.required_signers.iter().map(|signer| signer.value.clone()).collect(),
            ),
            certificates: non_empty(draft.certificates.clone()),
            withdrawals: non_empty(draft.withdrawals.clone()),
        }
    }

    pub fn to_pretty_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
