// Lookout common library - main library exports

pub mod address;
pub mod asset;
pub mod hash;
pub mod math;
pub mod utxo;

/// Amount of the native currency in its smallest unit
pub type Lovelace = u64;

// Flattened re-exports
pub use self::asset::{lovelace_in, AmountEntry, AssetName, AssetUnit, LOVELACE_UNIT};
pub use self::hash::{Hash, PolicyId};
pub use self::address::{format_address, format_tx_hash, looks_like_cardano_address, time_ago};
pub use self::math::{
    ada_to_lovelace, format_ada, lovelace_to_ada, lovelace_to_ada_f64, max_ada, LOVELACE_PER_ADA,
};
pub use self::utxo::{total_lovelace, UtxoRecord};
