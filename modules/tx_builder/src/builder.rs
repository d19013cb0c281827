//! Lookout TxBuilder: draft editing session

use bigdecimal::BigDecimal;
use lookout_common::{ada_to_lovelace, total_lovelace, Lovelace, UtxoRecord};
use tracing::{debug, error, info, warn};

use crate::draft::{
    DraftInput, DraftOutput, IdGenerator, OutputUpdate, RequiredSigner, TransactionDraft,
    Withdrawal,
};
use crate::error::{Result, TxBuilderError};
use crate::fee::LinearFeeModel;
use crate::json::TransactionJson;
use crate::store::DraftStore;
use crate::validation::{validate_draft, ValidationError};

/// Fixed key the draft is persisted under
pub const SESSION_KEY: &str = "tx-builder-state";

/// Totals shown in the transaction preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxSummary {
    pub total_input: Lovelace,
    pub total_output: Lovelace,
    pub fee: Lovelace,
    /// Negative when the inputs do not cover outputs and fee
    pub change: i128,
}

/// A transaction-building session: one draft, persisted through `S` after
/// every committed edit.
pub struct TxBuilder<S: DraftStore> {
    draft: TransactionDraft,
    store: S,
    ids: IdGenerator,
    fee_model: LinearFeeModel,
}

impl<S: DraftStore> TxBuilder<S> {
    /// Start a session, restoring whatever draft the store holds
    pub fn new(store: S) -> Self {
        let mut builder = Self {
            draft: TransactionDraft::default(),
            store,
            ids: IdGenerator::default(),
            fee_model: LinearFeeModel::default(),
        };
        builder.load_from_storage();
        builder
    }

    pub fn draft(&self) -> &TransactionDraft {
        &self.draft
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Replace the in-memory draft with the persisted one. A missing or
    /// unreadable entry leaves an empty draft.
    pub fn load_from_storage(&mut self) {
        self.draft = match self.store.get(SESSION_KEY) {
            Ok(Some(bytes)) => match serde_json::from_slice::<TransactionDraft>(&bytes) {
                Ok(draft) => {
                    info!(
                        inputs = draft.inputs.len(),
                        outputs = draft.outputs.len(),
                        collateral = draft.collateral.len(),
                        "Restored transaction draft"
                    );
                    draft
                }
                Err(e) => {
                    error!("Error loading transaction draft: {e}");
                    TransactionDraft::default()
                }
            },
            Ok(None) => TransactionDraft::default(),
            Err(e) => {
                error!("Error reading transaction draft store: {e:#}");
                TransactionDraft::default()
            }
        };
        self.ids.resume_after(self.draft.max_id());
    }

    /// Write the persisted shape of the draft to the store
    pub fn save_to_storage(&mut self) -> Result<()> {
        let bytes = serde_json::to_vec(&self.draft)?;
        self.store.put(SESSION_KEY, &bytes).map_err(TxBuilderError::Store)
    }

    /// Clear every collection and field back to the empty draft
    pub fn reset(&mut self) -> Result<()> {
        self.draft = TransactionDraft::default();
        info!("Transaction draft reset");
        self.save_to_storage()
    }

    // -- Inputs and collateral --

    /// Add a UTXO as a spent input, or as collateral. The record is taken
    /// as-is; fields it lacks simply count as zero.
    pub fn add_input(&mut self, utxo: UtxoRecord, is_collateral: bool) -> Result<u64> {
        let id = self.ids.next_id();
        debug!(id, utxo = %utxo.reference(), is_collateral, "Adding input");
        let input = DraftInput {
            id,
            utxo,
            is_collateral,
        };
        if is_collateral {
            self.draft.collateral.push(input);
        } else {
            self.draft.inputs.push(input);
        }
        self.save_to_storage()?;
        Ok(id)
    }

    /// Returns whether an input was removed
    pub fn remove_input(&mut self, id: u64) -> Result<bool> {
        let removed = remove_by(&mut self.draft.inputs, |input| input.id == id);
        self.save_if(removed)
    }

    pub fn remove_collateral(&mut self, id: u64) -> Result<bool> {
        let removed = remove_by(&mut self.draft.collateral, |input| input.id == id);
        self.save_if(removed)
    }

    // -- Outputs --

    /// Add an output with no address and a zero amount
    pub fn add_output(&mut self) -> Result<u64> {
        let id = self.ids.next_id();
        self.draft.outputs.push(DraftOutput {
            id,
            address: String::new(),
            amount_ada: BigDecimal::default(),
            assets: Vec::new(),
        });
        self.save_to_storage()?;
        Ok(id)
    }

    pub fn remove_output(&mut self, id: u64) -> Result<bool> {
        let removed = remove_by(&mut self.draft.outputs, |output| output.id == id);
        self.save_if(removed)
    }

    /// Change one field of an output. Values are not checked here; they
    /// are checked whenever the draft is validated.
    pub fn update_output(&mut self, id: u64, update: OutputUpdate) -> Result<bool> {
        let Some(output) = self.draft.outputs.iter_mut().find(|output| output.id == id) else {
            return Ok(false);
        };
        match update {
            OutputUpdate::Address(address) => output.address = address,
            OutputUpdate::AmountAda(amount) => output.amount_ada = amount,
        }
        self.save_to_storage()?;
        Ok(true)
    }

    // -- Metadata --

    /// Add an empty metadata entry under a new positive integer label
    pub fn add_metadata_label(&mut self, label: &str) -> Result<u64> {
        let parsed = label.trim().parse::<u64>().ok().filter(|label| *label > 0);
        let Some(parsed) = parsed.filter(|label| !self.draft.metadata.contains_key(label)) else {
            warn!("Rejected metadata label '{label}'");
            return Err(TxBuilderError::InvalidLabel(label.to_string()));
        };
        self.draft.metadata.insert(parsed, serde_json::json!({}));
        self.save_to_storage()?;
        Ok(parsed)
    }

    /// Set the value under `label` from JSON text. On a parse error the
    /// draft is left exactly as it was.
    pub fn update_metadata(&mut self, label: u64, json_text: &str) -> Result<()> {
        if label == 0 {
            return Err(TxBuilderError::InvalidLabel(label.to_string()));
        }
        let value: serde_json::Value = serde_json::from_str(json_text)?;
        self.draft.metadata.insert(label, value);
        self.save_to_storage()
    }

    pub fn remove_metadata_label(&mut self, label: u64) -> Result<bool> {
        let removed = self.draft.metadata.remove(&label).is_some();
        self.save_if(removed)
    }

    // -- Signers, validity interval, certificates, withdrawals --

    pub fn add_required_signer(&mut self, value: &str) -> Result<u64> {
        let value = value.trim();
        if value.is_empty() {
            return Err(TxBuilderError::EmptySigner);
        }
        let id = self.ids.next_id();
        self.draft.required_signers.push(RequiredSigner {
            id,
            value: value.to_string(),
        });
        self.save_to_storage()?;
        Ok(id)
    }

    pub fn remove_required_signer(&mut self, id: u64) -> Result<bool> {
        let removed = remove_by(&mut self.draft.required_signers, |signer| signer.id == id);
        self.save_if(removed)
    }

    pub fn set_validity_start(&mut self, slot: Option<u64>) -> Result<()> {
        self.draft.validity_start = slot;
        self.save_to_storage()
    }

    pub fn set_validity_end(&mut self, slot: Option<u64>) -> Result<()> {
        self.draft.validity_end = slot;
        self.save_to_storage()
    }

    /// Attach a certificate for this session only
    pub fn add_certificate(&mut self, certificate: serde_json::Value) {
        self.draft.certificates.push(certificate);
    }

    /// Attach a reward withdrawal for this session only
    pub fn add_withdrawal(&mut self, withdrawal: Withdrawal) {
        self.draft.withdrawals.push(withdrawal);
    }

    // -- Derived values --

    /// Lovelace over spent inputs; collateral is excluded
    pub fn total_input_lovelace(&self) -> Lovelace {
        total_lovelace(self.draft.inputs.iter().map(|input| &input.utxo))
    }

    /// Lovelace over outputs. Amounts that are not positive add nothing and
    /// oversized amounts saturate.
    pub fn total_output_lovelace(&self) -> Lovelace {
        self.draft
            .outputs
            .iter()
            .map(|output| ada_to_lovelace(&output.amount_ada))
            .fold(0, Lovelace::saturating_add)
    }

    pub fn calculate_fee(&self) -> Lovelace {
        self.fee_model.fee(self.draft.inputs.len(), self.draft.outputs.len())
    }

    pub fn summary(&self) -> TxSummary {
        let total_input = self.total_input_lovelace();
        let total_output = self.total_output_lovelace();
        let fee = self.calculate_fee();
        TxSummary {
            total_input,
            total_output,
            fee,
            change: i128::from(total_input) - i128::from(total_output) - i128::from(fee),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        validate_draft(
            &self.draft,
            self.total_input_lovelace(),
            self.total_output_lovelace(),
            self.calculate_fee(),
        )
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// JSON view of the draft as it stands, valid or not
    pub fn to_transaction_json(&self) -> TransactionJson {
        TransactionJson::from_draft(&self.draft, self.calculate_fee())
    }

    /// Pretty JSON of a valid draft
    pub fn export_json(&self) -> Result<String> {
        self.validate()?;
        Ok(self.to_transaction_json().to_pretty_string()?)
    }

    fn save_if(&mut self, changed: bool) -> Result<bool> {
        if changed {
            self.save_to_storage()?;
        }
        Ok(changed)
    }
}

fn remove_by<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !matches(item));
    items.len() != before
}

/// UTXOs that are suitable as collateral, i.e. carry nothing but lovelace
pub fn collateral_candidates(utxos: &[UtxoRecord]) -> Vec<&UtxoRecord> {
    utxos.iter().filter(|utxo| utxo.is_pure_ada()).collect()
}
