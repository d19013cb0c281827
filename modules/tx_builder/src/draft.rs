//! Lookout TxBuilder: draft transaction model

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use bigdecimal::BigDecimal;
use lookout_common::{max_ada, AmountEntry, Lovelace, UtxoRecord};
use serde::{Deserialize, Serialize};

/// A UTXO placed into the draft, either as a spent input or as collateral
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftInput {
    pub id: u64,
    pub utxo: UtxoRecord,
    #[serde(default)]
    pub is_collateral: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOutput {
    pub id: u64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub amount_ada: BigDecimal,
    #[serde(default)]
    pub assets: Vec<AmountEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredSigner {
    pub id: u64,
    /// Key hash or address
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub reward_address: String,
    pub amount: Lovelace,
}

/// Single field edit of a draft output
#[derive(Debug, Clone, PartialEq)]
pub enum OutputUpdate {
    Address(String),
    AmountAda(BigDecimal),
}

impl OutputUpdate {
    /// Build an update from a UI field name and its raw text. An amount that
    /// does not parse becomes zero and is reported later by validation; one
    /// past [`max_ada`] is capped there.
    pub fn parse(field: &str, value: &str) -> Option<Self> {
        match field {
            "address" => Some(OutputUpdate::Address(value.to_string())),
            "amount" | "amountAda" | "amount_ada" => {
                let amount: BigDecimal = value.trim().parse().unwrap_or_default();
                Some(OutputUpdate::AmountAda(amount.min(max_ada())))
            }
            _ => None,
        }
    }
}

/// The whole draft. This is the only mutable state of a builder session;
/// totals, fees and the JSON view are derived from it on demand.
///
/// Certificates and withdrawals live for the session only and are not part
/// of the persisted shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionDraft {
    pub inputs: Vec<DraftInput>,
    pub outputs: Vec<DraftOutput>,
    pub collateral: Vec<DraftInput>,
    pub metadata: BTreeMap<u64, serde_json::Value>,
    pub validity_start: Option<u64>,
    pub validity_end: Option<u64>,
    pub required_signers: Vec<RequiredSigner>,
    #[serde(skip)]
    pub certificates: Vec<serde_json::Value>,
    #[serde(skip)]
    pub withdrawals: Vec<Withdrawal>,
}

impl TransactionDraft {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Largest id used by any entry, so a restored session can keep ids unique
    pub fn max_id(&self) -> u64 {
        let inputs = self.inputs.iter().chain(&self.collateral).map(|i| i.id);
        let outputs = self.outputs.iter().map(|o| o.id);
        let signers = self.required_signers.iter().map(|s| s.id);
        inputs.chain(outputs).chain(signers).max().unwrap_or(0)
    }
}

/// Monotonic id source based on wall-clock milliseconds
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn next_id(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        self.last = now.max(self.last + 1);
        self.last
    }

    pub fn resume_after(&mut self, id: u64) {
        self.last = self.last.max(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn ids_strictly_increase() {
        let mut ids = IdGenerator::default();
        let generated: Vec<u64> = (0..1000).map(|_| ids.next_id()).collect();
        assert!(generated.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn ids_resume_above_restored() {
        let mut ids = IdGenerator::default();
        ids.resume_after(u64::MAX / 2);
        assert!(ids.next_id() > u64::MAX / 2);
    }

    #[test]
    fn output_update_from_fields() {
        assert_eq!(
            OutputUpdate::parse("address", "addr1x"),
            Some(OutputUpdate::Address("addr1x".to_string()))
        );
        assert_eq!(
            OutputUpdate::parse("amountAda", " 2.5 "),
            Some(OutputUpdate::AmountAda(BigDecimal::from_str("2.5").unwrap()))
        );
        assert_eq!(
            OutputUpdate::parse("amount", "lots"),
            Some(OutputUpdate::AmountAda(BigDecimal::default()))
        );
        assert_eq!(OutputUpdate::parse("colour", "red"), None);
    }

    #[test]
    fn oversized_amounts_are_capped() {
        for text in ["20000000000000", "1e2000000"] {
            assert_eq!(
                OutputUpdate::parse("amount", text),
                Some(OutputUpdate::AmountAda(max_ada()))
            );
        }
    }

    #[test]
    fn persisted_shape_defaults_missing_keys() {
        let draft: TransactionDraft = serde_json::from_str(r#"{"outputs": []}"#).unwrap();
        assert!(draft.is_empty());
    }

    #[test]
    fn persisted_shape_skips_session_only_fields() {
        let draft = TransactionDraft {
            validity_start: Some(100),
            certificates: vec![serde_json::json!({"type": "stake_registration"})],
            withdrawals: vec![Withdrawal {
                reward_address: "stake1u".to_string(),
                amount: 1,
            }],
            ..Default::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "collateral",
                "inputs",
                "metadata",
                "outputs",
                "requiredSigners",
                "validityEnd",
                "validityStart"
            ]
        );
    }

    #[test]
    fn metadata_labels_round_trip_as_json_keys() {
        let mut draft = TransactionDraft::default();
        draft.metadata.insert(721, serde_json::json!({"name": "nft"}));
        let json = serde_json::to_string(&draft).unwrap();
        assert!(json.contains(r#""metadata":{"721":{"name":"nft"}}"#));
        let back: TransactionDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draft);
    }
}
