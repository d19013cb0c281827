use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use bigdecimal::Zero;
use lookout_common::{looks_like_cardano_address, UtxoRecord};
use lookout_module_tx_builder::{collateral_candidates, DraftStore, OutputUpdate, TxBuilder};
use lookout_module_utxo_field::UtxoField;
use rand::rngs::StdRng;
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::settings::DashboardConfig;
use crate::source::load_utxos;

/// Logical canvas pixels per terminal cell
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Field,
    Builder,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Field => View::Builder,
            View::Builder => View::Field,
        }
    }
}

/// What a text prompt will be applied to once submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    OutputAddress(u64),
    OutputAmount(u64),
    MetadataLabel,
    MetadataJson(u64),
    RequiredSigner,
    ValidityStart,
    ValidityEnd,
}

impl PromptKind {
    pub fn title(&self) -> String {
        match self {
            PromptKind::OutputAddress(_) => "Output address".to_string(),
            PromptKind::OutputAmount(_) => "Output amount (ADA)".to_string(),
            PromptKind::MetadataLabel => "Metadata label".to_string(),
            PromptKind::MetadataJson(label) => format!("Metadata {label} (JSON)"),
            PromptKind::RequiredSigner => "Required signer (key hash or address)".to_string(),
            PromptKind::ValidityStart => "Valid from slot (empty to clear)".to_string(),
            PromptKind::ValidityEnd => "Valid until slot (empty to clear)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

/// A deletable row of the builder view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Input(u64),
    Collateral(u64),
    Output(u64),
    Metadata(u64),
    Signer(u64),
}

pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    pub settings: DashboardConfig,
    pub field: UtxoField<StdRng>,
    pub builder: TxBuilder<Box<dyn DraftStore>>,
    pub load_error: Option<String>,

    // Interaction state
    pub prompt: Option<Prompt>,
    pub notice: Option<Notice>,
    pub focused_row: usize,

    /// Terminal cells the field canvas was last drawn into
    pub field_area: Rect,
}

fn now_unix_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or_default()
}

fn parse_slot(text: &str) -> Result<Option<u64>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse().map(Some).map_err(|_| format!("'{text}' is not a slot number"))
}

impl App {
    pub fn new(
        settings: DashboardConfig,
        field: UtxoField<StdRng>,
        builder: TxBuilder<Box<dyn DraftStore>>,
    ) -> Self {
        Self {
            running: true,
            current_view: View::Field,
            show_help: false,
            settings,
            field,
            builder,
            load_error: None,
            prompt: None,
            notice: None,
            focused_row: 0,
            field_area: Rect::default(),
        }
    }

    /// Load or reload the UTXO file into the field
    pub fn reload_utxos(&mut self) -> Result<()> {
        match load_utxos(&self.settings.utxo_file) {
            Ok(utxos) => {
                self.load(utxos);
                self.load_error = None;
                Ok(())
            }
            Err(e) => {
                self.load_error = Some(format!("{e:#}"));
                Err(e)
            }
        }
    }

    pub fn load(&mut self, utxos: Vec<UtxoRecord>) {
        let now = (now_unix_ms() / 1000) as i64;
        self.field.load(utxos, now);
    }

    pub fn tick(&mut self) {
        self.field.tick();
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // -- Field interaction --

    /// Follow the canvas size to the terminal cells it is drawn into
    pub fn sync_canvas(&mut self, area: Rect) {
        self.field_area = area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let width = f64::from(area.width) * CELL_WIDTH_PX;
        let height = f64::from(area.height) * CELL_HEIGHT_PX;
        if width != self.field.width() || height != self.field.height() {
            self.field.resize(width, height);
        }
    }

    /// Canvas coordinates of the centre of a terminal cell
    pub fn cell_to_field(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        let area = self.field_area;
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }
        let x = (f64::from(column - area.x) + 0.5) / f64::from(area.width) * self.field.width();
        let y = (f64::from(row - area.y) + 0.5) / f64::from(area.height) * self.field.height();
        Some((x, y))
    }

    pub fn hover_at(&mut self, column: u16, row: u16) {
        match self.cell_to_field(column, row) {
            Some((x, y)) => {
                self.field.hover(x, y);
            }
            None => self.field.clear_hover(),
        }
    }

    pub fn click_at(&mut self, column: u16, row: u16) {
        if let Some((x, y)) = self.cell_to_field(column, row) {
            self.field.hover(x, y);
            self.field.toggle_selection_at(x, y);
        }
    }

    /// Move the field selection into the draft as inputs or collateral
    pub fn add_selected(&mut self, is_collateral: bool) {
        let utxos = self.field.selected_utxos();
        if utxos.is_empty() {
            self.notice = Some(Notice::Warning("Select UTXOs in the field first".to_string()));
            return;
        }
        // Collateral may only hold lovelace
        let utxos: Vec<UtxoRecord> = if is_collateral {
            collateral_candidates(&utxos).into_iter().cloned().collect()
        } else {
            utxos
        };
        if utxos.is_empty() {
            self.notice = Some(Notice::Warning(
                "Collateral must be pure-ADA UTXOs".to_string(),
            ));
            return;
        }
        let count = utxos.len();
        for utxo in utxos {
            if let Err(e) = self.builder.add_input(utxo, is_collateral) {
                self.notice = Some(Notice::Error(e.to_string()));
                return;
            }
        }
        self.field.clear_selection();
        let kind = if is_collateral { "collateral" } else { "inputs" };
        self.notice = Some(Notice::Info(format!("Added {count} UTXO(s) as {kind}")));
    }

    pub fn clear_selection(&mut self) {
        self.field.clear_selection();
    }

    // -- Builder rows --

    pub fn rows(&self) -> Vec<Row> {
        let draft = self.builder.draft();
        let inputs = draft.inputs.iter().map(|input| Row::Input(input.id));
        let collateral = draft.collateral.iter().map(|input| Row::Collateral(input.id));
        let outputs = draft.outputs.iter().map(|output| Row::Output(output.id));
        let metadata = draft.metadata.keys().map(|label| Row::Metadata(*label));
        let signers = draft.required_signers.iter().map(|signer| Row::Signer(signer.id));
        inputs.chain(collateral).chain(outputs).chain(metadata).chain(signers).collect()
    }

    pub fn focused(&self) -> Option<Row> {
        self.rows().get(self.focused_row).copied()
    }

    pub fn select_next(&mut self) {
        let count = self.rows().len();
        if self.focused_row < count.saturating_sub(1) {
            self.focused_row += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.focused_row = self.focused_row.saturating_sub(1);
    }

    fn focus(&mut self, row: Row) {
        if let Some(index) = self.rows().iter().position(|r| *r == row) {
            self.focused_row = index;
        }
    }

    fn clamp_focus(&mut self) {
        self.focused_row = self.focused_row.min(self.rows().len().saturating_sub(1));
    }

    pub fn delete_focused(&mut self) {
        let Some(row) = self.focused() else {
            return;
        };
        let result = match row {
            Row::Input(id) => self.builder.remove_input(id),
            Row::Collateral(id) => self.builder.remove_collateral(id),
            Row::Output(id) => self.builder.remove_output(id),
            Row::Metadata(label) => self.builder.remove_metadata_label(label),
            Row::Signer(id) => self.builder.remove_required_signer(id),
        };
        if let Err(e) = result {
            self.notice = Some(Notice::Error(e.to_string()));
        }
        self.clamp_focus();
    }

    pub fn add_output(&mut self) {
        match self.builder.add_output() {
            Ok(id) => {
                self.focus(Row::Output(id));
                self.start_prompt(PromptKind::OutputAddress(id));
            }
            Err(e) => self.notice = Some(Notice::Error(e.to_string())),
        }
    }

    /// The focused output, or the most recent one
    pub fn target_output(&self) -> Option<u64> {
        match self.focused() {
            Some(Row::Output(id)) => Some(id),
            _ => self.builder.draft().outputs.last().map(|output| output.id),
        }
    }

    pub fn target_metadata(&self) -> Option<u64> {
        match self.focused() {
            Some(Row::Metadata(label)) => Some(label),
            _ => self.builder.draft().metadata.keys().next_back().copied(),
        }
    }

    pub fn edit_output_address(&mut self) {
        match self.target_output() {
            Some(id) => self.start_prompt(PromptKind::OutputAddress(id)),
            None => self.notice = Some(Notice::Warning("Add an output first (o)".to_string())),
        }
    }

    pub fn edit_output_amount(&mut self) {
        match self.target_output() {
            Some(id) => self.start_prompt(PromptKind::OutputAmount(id)),
            None => self.notice = Some(Notice::Warning("Add an output first (o)".to_string())),
        }
    }

    pub fn edit_metadata_json(&mut self) {
        match self.target_metadata() {
            Some(label) => self.start_prompt(PromptKind::MetadataJson(label)),
            None => {
                self.notice = Some(Notice::Warning("Add a metadata label first (l)".to_string()))
            }
        }
    }

    // -- Prompts --

    /// Open a prompt, prefilled with the current value where there is one
    pub fn start_prompt(&mut self, kind: PromptKind) {
        let draft = self.builder.draft();
        let output = |id: u64| draft.outputs.iter().find(|output| output.id == id);
        let buffer = match kind {
            PromptKind::OutputAddress(id) => {
                output(id).map(|output| output.address.clone()).unwrap_or_default()
            }
            PromptKind::OutputAmount(id) => output(id)
                .filter(|output| !output.amount_ada.is_zero())
                .map(|output| output.amount_ada.to_string())
                .unwrap_or_default(),
            PromptKind::MetadataJson(label) => draft
                .metadata
                .get(&label)
                .map(|value| value.to_string())
                .unwrap_or_default(),
            PromptKind::ValidityStart => {
                draft.validity_start.map(|slot| slot.to_string()).unwrap_or_default()
            }
            PromptKind::ValidityEnd => {
                draft.validity_end.map(|slot| slot.to_string()).unwrap_or_default()
            }
            PromptKind::MetadataLabel | PromptKind::RequiredSigner => String::new(),
        };
        self.prompt = Some(Prompt { kind, buffer });
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Apply the open prompt's text to the draft
    pub fn submit_prompt(&mut self) {
        let Some(Prompt { kind, buffer }) = self.prompt.take() else {
            return;
        };

        let result = match kind {
            PromptKind::OutputAddress(id) => {
                let address = buffer.trim().to_string();
                if !address.is_empty() && !looks_like_cardano_address(&address) {
                    warn!("Output address '{address}' does not look like a Cardano address");
                    self.notice = Some(Notice::Warning(
                        "Address does not look like a Cardano address".to_string(),
                    ));
                }
                self.builder.update_output(id, OutputUpdate::Address(address)).map(|_| ())
            }
            PromptKind::OutputAmount(id) => match OutputUpdate::parse("amount", &buffer) {
                Some(update) => self.builder.update_output(id, update).map(|_| ()),
                None => Ok(()),
            },
            PromptKind::MetadataLabel => self.builder.add_metadata_label(&buffer).map(|label| {
                self.focus(Row::Metadata(label));
            }),
            PromptKind::MetadataJson(label) => self.builder.update_metadata(label, &buffer),
            PromptKind::RequiredSigner => self.builder.add_required_signer(&buffer).map(|_| ()),
            PromptKind::ValidityStart | PromptKind::ValidityEnd => match parse_slot(&buffer) {
                Ok(slot) if kind == PromptKind::ValidityStart => {
                    self.builder.set_validity_start(slot)
                }
                Ok(slot) => self.builder.set_validity_end(slot),
                Err(message) => {
                    self.notice = Some(Notice::Error(message));
                    return;
                }
            },
        };

        if let Err(e) = result {
            self.notice = Some(Notice::Error(e.to_string()));
        }
    }

    // -- Draft lifecycle --

    pub fn reset_draft(&mut self) {
        match self.builder.reset() {
            Ok(()) => self.notice = Some(Notice::Info("Draft cleared".to_string())),
            Err(e) => self.notice = Some(Notice::Error(e.to_string())),
        }
        self.focused_row = 0;
    }

    /// Write the validated draft to `cardano-tx-<unix_ms>.json` in the export directory
    pub fn export(&mut self) -> Result<PathBuf> {
        let json = self.builder.export_json()?;
        let path = self.settings.export_dir.join(format!("cardano-tx-{}.json", now_unix_ms()));
        fs::write(&path, json)
            .with_context(|| format!("Failed to write transaction to {}", path.display()))?;
        info!("Exported transaction to {}", path.display());
        Ok(path)
    }

    pub fn export_with_notice(&mut self) {
        self.notice = Some(match self.export() {
            Ok(path) => Notice::Info(format!("Exported {}", path.display())),
            Err(e) => Notice::Error(format!("{e:#}")),
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use config::Config;
    use lookout_common::AmountEntry;
    use lookout_module_tx_builder::InMemoryDraftStore;
    use lookout_module_utxo_field::FieldConfig;
    use rand::SeedableRng;
    use tempfile::TempDir;

    pub const ADDRESS: &str = "addr1qx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzer3n0d3vllmyqwsx5wktcd8cc3sq835lu7drv2xwl2wywfgse35a3x";

    pub fn utxo(index: u32, lovelace: u64) -> UtxoRecord {
        UtxoRecord {
            tx_hash: format!("{index:064x}"),
            output_index: index,
            address: ADDRESS.to_string(),
            amount: vec![AmountEntry::lovelace(lovelace)],
            block_time: None,
        }
    }

    pub fn init_app(dir: &TempDir) -> App {
        let config = Config::builder()
            .set_default("export-dir", dir.path().to_str().unwrap())
            .unwrap()
            .build()
            .unwrap();
        let store: Box<dyn DraftStore> = Box::new(InMemoryDraftStore::new());
        App::new(
            DashboardConfig::from(&config),
            UtxoField::new(FieldConfig::default(), StdRng::seed_from_u64(1)),
            TxBuilder::new(store),
        )
    }

    /// Select bubble `index` by clicking its centre cell
    pub fn select_bubble(app: &mut App, index: usize) {
        let bubble = &app.field.bubbles()[index];
        let (x, y) = (bubble.x, bubble.y);
        assert!(app.field.toggle_selection_at(x, y).is_some());
    }

    fn type_into_prompt(app: &mut App, text: &str) {
        app.prompt.as_mut().unwrap().buffer = text.to_string();
        app.submit_prompt();
    }

    #[test]
    fn should_add_selected_bubbles_as_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        app.load(vec![utxo(0, 10_000_000)]);
        select_bubble(&mut app, 0);

        app.add_selected(false);
        assert_eq!(app.builder.draft().inputs.len(), 1);
        assert_eq!(app.field.selected_count(), 0);
        assert!(matches!(app.notice, Some(Notice::Info(_))));
    }

    #[test]
    fn should_warn_when_nothing_selected() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        app.add_selected(true);
        assert!(app.builder.draft().collateral.is_empty());
        assert!(matches!(app.notice, Some(Notice::Warning(_))));
    }

    #[test]
    fn should_only_use_pure_ada_as_collateral() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        let mut token = utxo(1, 2_000_000);
        token.amount.push(AmountEntry {
            unit: "276fd18711931e2c0e21430192dbeac0e458093cd9d1fcd7210f64b3".to_string(),
            quantity: "1".to_string(),
        });
        app.load(vec![token]);
        select_bubble(&mut app, 0);

        app.add_selected(true);
        assert!(app.builder.draft().collateral.is_empty());
        assert!(matches!(app.notice, Some(Notice::Warning(_))));
    }

    #[test]
    fn should_build_and_export_payment() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        app.load(vec![utxo(0, 10_000_000)]);
        select_bubble(&mut app, 0);
        app.add_selected(false);

        app.add_output();
        assert!(matches!(
            app.prompt,
            Some(Prompt {
                kind: PromptKind::OutputAddress(_),
                ..
            })
        ));
        type_into_prompt(&mut app, ADDRESS);
        app.edit_output_amount();
        type_into_prompt(&mut app, "5");

        assert_eq!(app.builder.summary().change, 4_916_094);
        let path = app.export().unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("cardano-tx-") && name.ends_with(".json"));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["outputs"][0]["address"], ADDRESS);
    }

    #[test]
    fn should_refuse_to_export_invalid_draft() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        app.export_with_notice();
        assert_eq!(app.notice, Some(Notice::Error("No inputs selected".to_string())));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn should_warn_on_suspicious_address_but_keep_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        app.add_output();
        type_into_prompt(&mut app, "bob");
        assert!(matches!(app.notice, Some(Notice::Warning(_))));
        assert_eq!(app.builder.draft().outputs[0].address, "bob");
    }

    #[test]
    fn should_report_bad_metadata_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        app.start_prompt(PromptKind::MetadataLabel);
        type_into_prompt(&mut app, "674");
        app.edit_metadata_json();
        type_into_prompt(&mut app, "{oops");

        assert!(matches!(app.notice, Some(Notice::Error(ref m)) if m.starts_with("Invalid JSON format")));
        assert_eq!(app.builder.draft().metadata[&674], serde_json::json!({}));
    }

    #[test]
    fn should_set_and_clear_validity() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        app.start_prompt(PromptKind::ValidityStart);
        type_into_prompt(&mut app, " 1200 ");
        assert_eq!(app.builder.draft().validity_start, Some(1200));

        app.start_prompt(PromptKind::ValidityStart);
        assert_eq!(app.prompt.as_ref().unwrap().buffer, "1200");
        type_into_prompt(&mut app, "");
        assert_eq!(app.builder.draft().validity_start, None);

        app.start_prompt(PromptKind::ValidityEnd);
        type_into_prompt(&mut app, "soon");
        assert_eq!(app.builder.draft().validity_end, None);
        assert!(matches!(app.notice, Some(Notice::Error(_))));
    }

    #[test]
    fn should_delete_focused_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        app.start_prompt(PromptKind::RequiredSigner);
        type_into_prompt(&mut app, "signer-a");
        app.add_output();
        app.cancel_prompt();

        assert_eq!(app.rows().len(), 2);
        assert!(matches!(app.focused(), Some(Row::Output(_))));
        app.delete_focused();
        assert!(app.builder.draft().outputs.is_empty());
        assert!(matches!(app.focused(), Some(Row::Signer(_))));
        app.delete_focused();
        assert!(app.rows().is_empty());
        app.delete_focused();
    }

    #[test]
    fn should_map_cells_to_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = init_app(&dir);
        app.sync_canvas(Rect::new(2, 3, 10, 5));
        assert_eq!(app.field.width(), 80.0);
        assert_eq!(app.field.height(), 80.0);
        assert_eq!(app.cell_to_field(2, 3), Some((4.0, 8.0)));
        assert_eq!(app.cell_to_field(11, 7), Some((76.0, 72.0)));
        assert_eq!(app.cell_to_field(12, 3), None);
        assert_eq!(app.cell_to_field(1, 3), None);
    }
}
