use std::time::{SystemTime, UNIX_EPOCH};

use lookout_common::{format_address, format_ada, format_tx_hash, time_ago, AssetUnit, UtxoRecord};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Row};
use crate::ui::common::{ada, dim, header_style, ACCENT};

fn section<'a>(title: &str, count: usize) -> Line<'a> {
    Line::from(Span::styled(format!(" {title} ({count})"), header_style()))
}

/// Short description of the UTXO used in input and collateral rows
fn describe_utxo(utxo: &UtxoRecord, now_unix: i64) -> String {
    let mut text = format!(
        "{}#{}  {}",
        format_tx_hash(&utxo.tx_hash),
        utxo.output_index,
        ada(utxo.lovelace())
    );
    if let Some(block_time) = utxo.block_time {
        text.push_str(&format!("  {}", time_ago(block_time, now_unix)));
    }
    let assets: Vec<String> = utxo
        .native_assets()
        .map(|entry| match entry.asset_unit() {
            AssetUnit::Native { name, .. } if !name.is_empty() => {
                format!("{} {name}", entry.quantity_u64())
            }
            AssetUnit::Native { policy, .. } => {
                format!("{} {}", entry.quantity_u64(), format_tx_hash(&policy.to_string()))
            }
            AssetUnit::Lovelace | AssetUnit::Unknown(_) => {
                format!("{} {}", entry.quantity, entry.unit)
            }
        })
        .collect();
    if !assets.is_empty() {
        text.push_str(&format!("  + {}", assets.join(", ")));
    }
    text
}

fn row_line<'a>(text: String, focused: bool) -> Line<'a> {
    if focused {
        Line::from(Span::styled(
            format!("> {text}"),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(format!("  {text}"))
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [draft_area, side_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);
    let [summary_area, json_area] =
        Layout::vertical([Constraint::Length(11), Constraint::Min(3)]).areas(side_area);

    render_draft(frame, app, draft_area);
    render_summary(frame, app, summary_area);
    render_json(frame, app, json_area);
}

/// Lists of every draft section, with the focused row marked
fn render_draft(frame: &mut Frame, app: &App, area: Rect) {
    let draft = app.builder.draft();
    let focused = app.focused();
    let mut lines: Vec<Line> = Vec::new();
    let mut focused_line = 0;

    let mut push_row = |lines: &mut Vec<Line>, row: Row, text: String| {
        if focused == Some(row) {
            focused_line = lines.len();
        }
        lines.push(row_line(text, focused == Some(row)));
    };

    let now = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as i64).unwrap_or(0);

    lines.push(section("Inputs", draft.inputs.len()));
    for input in &draft.inputs {
        push_row(&mut lines, Row::Input(input.id), describe_utxo(&input.utxo, now));
    }

    lines.push(section("Collateral", draft.collateral.len()));
    for input in &draft.collateral {
        push_row(&mut lines, Row::Collateral(input.id), describe_utxo(&input.utxo, now));
    }

    lines.push(section("Outputs", draft.outputs.len()));
    for output in &draft.outputs {
        let text = format!("{}  {} ₳", format_address(&output.address), output.amount_ada);
        push_row(&mut lines, Row::Output(output.id), text);
    }

    lines.push(section("Metadata", draft.metadata.len()));
    for (label, value) in &draft.metadata {
        push_row(&mut lines, Row::Metadata(*label), format!("{label}: {value}"));
    }

    lines.push(section("Required signers", draft.required_signers.len()));
    for signer in &draft.required_signers {
        push_row(&mut lines, Row::Signer(signer.id), signer.value.clone());
    }

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = focused_line.saturating_sub(visible.saturating_sub(1));

    let block = Block::default().title(" Transaction draft ").borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(lines).block(block).scroll((scroll as u16, 0)),
        area,
    );
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary = app.builder.summary();
    let draft = app.builder.draft();

    let change_style = if summary.change < 0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let slot = |slot: Option<u64>| slot.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());

    let status = match app.builder.validate() {
        Ok(()) => Span::styled("✓ Ready to export", Style::default().fg(Color::Green)),
        Err(e) => Span::styled(format!("✗ {e}"), Style::default().fg(Color::Red)),
    };

    let lines = vec![
        Line::from(vec![Span::styled(" Total input:  ", dim()), Span::raw(ada(summary.total_input))]),
        Line::from(vec![Span::styled(" Total output: ", dim()), Span::raw(ada(summary.total_output))]),
        Line::from(vec![
            Span::styled(" Fee:          ", dim()),
            Span::raw(format!("{} ₳", format_ada(i128::from(summary.fee), 6))),
        ]),
        Line::from(vec![
            Span::styled(" Change:       ", dim()),
            Span::styled(format!("{} ₳", format_ada(summary.change, 6)), change_style),
        ]),
        Line::from(vec![
            Span::styled(" Validity:     ", dim()),
            Span::raw(format!("{} .. {}", slot(draft.validity_start), slot(draft.validity_end))),
        ]),
        Line::from(""),
        Line::from(vec![Span::raw(" "), status]),
    ];

    let block = Block::default().title(" Summary ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn render_json(frame: &mut Frame, app: &App, area: Rect) {
    let text = app
        .builder
        .to_transaction_json()
        .to_pretty_string()
        .unwrap_or_else(|e| format!("Failed to render JSON: {e}"));

    let block = Block::default().title(" JSON preview ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(text).style(dim()).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_common::AmountEntry;

    const POLICY: &str = "276fd18711931e2c0e21430192dbeac0e458093cd9d1fcd7210f64b3";

    #[test]
    fn utxo_rows_list_native_assets() {
        let utxo = UtxoRecord {
            tx_hash: "39a7a284c2a0948189dc45dec670211cd4d72f7b66c5726c08d9b3df11e44d58".to_string(),
            output_index: 1,
            amount: vec![
                AmountEntry::lovelace(2_000_000),
                AmountEntry {
                    unit: format!("{POLICY}4d494e54"),
                    quantity: "5".to_string(),
                },
                AmountEntry {
                    unit: POLICY.to_string(),
                    quantity: "1".to_string(),
                },
            ],
            block_time: Some(1_000),
            ..Default::default()
        };
        assert_eq!(
            describe_utxo(&utxo, 1_000 + 7_200),
            "39a7a284...11e44d58#1  2.00 ₳  2 h ago  + 5 MINT, 1 276fd187...210f64b3"
        );
    }
}
