//! Lookout transaction builder module
//! Assembles a draft Cardano transaction from selected UTXOs, estimates its
//! fee, validates its balance and renders it as JSON for an external signer

use anyhow::{anyhow, Result};
use config::Config;
use tracing::info;

mod builder;
mod draft;
mod error;
mod fee;
mod fjall_draft_store;
mod json;
mod store;
mod validation;

pub use builder::{collateral_candidates, TxBuilder, TxSummary, SESSION_KEY};
pub use draft::{
    DraftInput, DraftOutput, IdGenerator, OutputUpdate, RequiredSigner, TransactionDraft,
    Withdrawal,
};
pub use error::TxBuilderError;
pub use fee::LinearFeeModel;
pub use fjall_draft_store::FjallDraftStore;
pub use json::{CollateralJson, InputJson, OutputJson, TransactionJson};
pub use store::{DraftStore, InMemoryDraftStore};
pub use validation::{validate_draft, ValidationError};

const DEFAULT_STORE: &str = "fjall";

/// Open the draft store named by `draft-store`
pub fn open_draft_store(config: &Config) -> Result<Box<dyn DraftStore>> {
    let store_type = config.get_string("draft-store").unwrap_or(DEFAULT_STORE.to_string());
    info!("Using '{store_type}' draft store");
    let store: Box<dyn DraftStore> = match store_type.as_str() {
        "memory" => Box::new(InMemoryDraftStore::new()),
        "fjall" => Box::new(FjallDraftStore::new(config)?),
        _ => return Err(anyhow!("Unknown draft store type {store_type}")),
    };
    Ok(store)
}
