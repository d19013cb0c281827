use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hash::PolicyId;
use crate::Lovelace;

/// Unit string of the native currency in indexer amount lists
pub const LOVELACE_UNIT: &str = "lovelace";

/// Maximum length of an asset name in bytes
pub const MAX_ASSET_NAME_LEN: usize = 32;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct AssetName {
    len: u8,
    bytes: [u8; MAX_ASSET_NAME_LEN],
}

impl AssetName {
    pub fn new(data: &[u8]) -> Option<Self> {
        if data.len() > MAX_ASSET_NAME_LEN {
            return None;
        }
        let mut bytes = [0u8; MAX_ASSET_NAME_LEN];
        bytes[..data.len()].copy_from_slice(data);
        Some(Self {
            len: data.len() as u8,
            bytes,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Human readable name, if the bytes are printable UTF-8
    pub fn as_utf8(&self) -> Option<&str> {
        std::str::from_utf8(self.as_slice())
            .ok()
            .filter(|s| !s.is_empty() && s.chars().all(|c| !c.is_control()))
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_utf8() {
            Some(s) => f.write_str(s),
            None => f.write_str(&hex::encode(self.as_slice())),
        }
    }
}

/// Decoded form of an amount `unit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetUnit {
    Lovelace,
    Native { policy: PolicyId, name: AssetName },
    /// Kept verbatim when it is neither lovelace nor policy id + hex name
    Unknown(String),
}

impl AssetUnit {
    pub fn parse(unit: &str) -> Self {
        if unit == LOVELACE_UNIT {
            return AssetUnit::Lovelace;
        }

        let policy_len = PolicyId::hex_len();
        if unit.len() < policy_len || !unit.is_char_boundary(policy_len) {
            return AssetUnit::Unknown(unit.to_string());
        }
        let (policy_hex, name_hex) = unit.split_at(policy_len);

        let Ok(policy) = policy_hex.parse::<PolicyId>() else {
            return AssetUnit::Unknown(unit.to_string());
        };
        match hex::decode(name_hex).ok().and_then(|bytes| AssetName::new(&bytes)) {
            Some(name) => AssetUnit::Native { policy, name },
            None => AssetUnit::Unknown(unit.to_string()),
        }
    }
}

/// One `{unit, quantity}` entry of an indexer amount list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AmountEntry {
    #[serde(default)]
    pub unit: String,

    /// Decimal string, as returned by the indexer
    #[serde(default)]
    pub quantity: String,
}

impl AmountEntry {
    pub fn lovelace(quantity: Lovelace) -> Self {
        Self {
            unit: LOVELACE_UNIT.to_string(),
            quantity: quantity.to_string(),
        }
    }

    pub fn asset_unit(&self) -> AssetUnit {
        AssetUnit::parse(&self.unit)
    }

    /// Quantity as an integer, zero when it does not parse
    pub fn quantity_u64(&self) -> u64 {
        self.quantity.trim().parse().unwrap_or(0)
    }
}

/// Lovelace carried by an amount list; zero when there is no lovelace entry
pub fn lovelace_in(amount: &[AmountEntry]) -> Lovelace {
    amount
        .iter()
        .find(|entry| entry.unit == LOVELACE_UNIT)
        .map(AmountEntry::quantity_u64)
        .unwrap_or(0)
}

/// Native asset entries of an amount list, in list order
pub fn native_assets_in(amount: &[AmountEntry]) -> impl Iterator<Item = &AmountEntry> {
    amount.iter().filter(|entry| entry.unit != LOVELACE_UNIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const POLICY: &str = "276fd18711931e2c0e21430192dbeac0e458093cd9d1fcd7210f64b3";

    #[test]
    fn parses_lovelace_unit() {
        assert_eq!(AssetUnit::parse("lovelace"), AssetUnit::Lovelace);
    }

    #[test]
    fn parses_native_asset_unit() {
        let unit = format!("{POLICY}{}", hex::encode("TEST"));
        let AssetUnit::Native { policy, name } = AssetUnit::parse(&unit) else {
            panic!("expected native asset");
        };
        assert_eq!(policy.to_string(), POLICY);
        assert_eq!(name.as_utf8(), Some("TEST"));
    }

    #[test]
    fn parses_policy_only_unit() {
        let AssetUnit::Native { name, .. } = AssetUnit::parse(POLICY) else {
            panic!("expected native asset");
        };
        assert!(name.is_empty());
    }

    #[test_case("ada" ; "too short")]
    #[test_case("zz6fd18711931e2c0e21430192dbeac0e458093cd9d1fcd7210f64b3" ; "bad policy hex")]
    #[test_case("276fd18711931e2c0e21430192dbeac0e458093cd9d1fcd7210f64b3abc" ; "odd name hex")]
    fn unknown_units_kept_verbatim(unit: &str) {
        assert_eq!(AssetUnit::parse(unit), AssetUnit::Unknown(unit.to_string()));
    }

    #[test]
    fn oversized_asset_name_is_unknown() {
        let unit = format!("{POLICY}{}", "ab".repeat(33));
        assert!(matches!(AssetUnit::parse(&unit), AssetUnit::Unknown(_)));
    }

    #[test]
    fn lovelace_in_defaults_to_zero() {
        assert_eq!(lovelace_in(&[]), 0);

        let tokens_only = vec![AmountEntry {
            unit: POLICY.to_string(),
            quantity: "5".to_string(),
        }];
        assert_eq!(lovelace_in(&tokens_only), 0);

        let garbage = vec![AmountEntry {
            unit: "lovelace".to_string(),
            quantity: "not a number".to_string(),
        }];
        assert_eq!(lovelace_in(&garbage), 0);
    }

    #[test]
    fn lovelace_in_finds_entry_anywhere() {
        let amount = vec![
            AmountEntry {
                unit: POLICY.to_string(),
                quantity: "1".to_string(),
            },
            AmountEntry::lovelace(2_500_000),
        ];
        assert_eq!(lovelace_in(&amount), 2_500_000);
        assert_eq!(native_assets_in(&amount).count(), 1);
    }
}
