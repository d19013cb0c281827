use lookout_common::format_ada;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, Notice, View};

/// Highlight for hovered and selected items
pub const ACCENT: Color = Color::Rgb(0xa8, 0x55, 0xf7);

pub fn header_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

pub fn ada(lovelace: u64) -> String {
    format!("{} ₳", format_ada(i128::from(lovelace), 2))
}

/// Centre a `width` x `height` box inside `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Render the header with field and draft statistics
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.field.stats();
    let draft = app.builder.draft();

    let line = Line::from(vec![
        Span::styled(" Lookout ", header_style()),
        Span::styled(" UTXOs: ", dim()),
        Span::raw(stats.total_count.to_string()),
        Span::styled("  Total: ", dim()),
        Span::raw(ada(stats.total_lovelace)),
        Span::styled("  Selected: ", dim()),
        Span::raw(format!("{} ({})", stats.selected_count, ada(stats.selected_lovelace))),
        Span::styled("  Draft: ", dim()),
        Span::raw(format!(
            "{} in / {} out / {} collateral",
            draft.inputs.len(),
            draft.outputs.len(),
            draft.collateral.len()
        )),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" UTXO Field "), Line::from(" Transaction ")];

    let selected = match app.current_view {
        View::Field => 0,
        View::Builder => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(dim())
        .highlight_style(header_style())
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match (&app.notice, &app.load_error) {
        (Some(Notice::Info(message)), _) => (format!(" {message}"), Style::default().fg(Color::Green)),
        (Some(Notice::Warning(message)), _) => {
            (format!(" {message}"), Style::default().fg(Color::Yellow))
        }
        (Some(Notice::Error(message)), _) => (format!(" {message}"), Style::default().fg(Color::Red)),
        (None, Some(error)) => (format!(" Error: {error} | q:quit"), Style::default().fg(Color::Red)),
        (None, None) => match app.current_view {
            View::Field => (
                " click:select a:add inputs c:add collateral x:clear Tab:builder ?:help q:quit"
                    .to_string(),
                dim(),
            ),
            View::Builder => (
                " o:output e:address m:amount d:delete E:export R:reset Tab:field ?:help q:quit"
                    .to_string(),
                dim(),
            ),
        },
    };

    frame.render_widget(Paragraph::new(text).style(style), area);
}

/// Render the help overlay
pub fn render_help(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", header_style())]),
        Line::from(""),
        Line::from("  click     Select / deselect UTXO"),
        Line::from("  a         Add selection as inputs"),
        Line::from("  c         Add selection as collateral"),
        Line::from("  x         Clear selection"),
        Line::from("  o         Add output"),
        Line::from("  e / m     Edit output address / amount"),
        Line::from("  l / v     Add metadata label / set JSON"),
        Line::from("  g         Add required signer"),
        Line::from("  s / t     Set validity start / end"),
        Line::from("  j/k Up/Dn Move focus"),
        Line::from("  d         Delete focused row"),
        Line::from("  E         Export transaction JSON"),
        Line::from("  R         Reset draft"),
        Line::from("  Tab       Switch view"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled("Press any key to close", dim())]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let help_area = centered(area, 46, 21);
    frame.render_widget(Clear, help_area);
    frame.render_widget(Paragraph::new(help_text).block(block), help_area);
}

/// Render the text prompt overlay
pub fn render_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref prompt) = app.prompt else {
        return;
    };

    let block = Block::default()
        .title(format!(" {} ", prompt.kind.title()))
        .title_bottom(Line::from(" Enter:apply Esc:cancel ").style(dim()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let prompt_area = centered(area, area.width.saturating_sub(8).clamp(20, 120), 3);
    let inner_width = usize::from(prompt_area.width.saturating_sub(3));
    // Keep the cursor end of long input visible
    let visible: String = {
        let chars: Vec<char> = prompt.buffer.chars().collect();
        chars[chars.len().saturating_sub(inner_width)..].iter().collect()
    };

    frame.render_widget(Clear, prompt_area);
    frame.render_widget(
        Paragraph::new(Line::from(vec![Span::raw(visible), Span::styled("_", header_style())]))
            .block(block),
        prompt_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_box_fits_area() {
        assert_eq!(centered(Rect::new(0, 0, 100, 40), 40, 10), Rect::new(30, 15, 40, 10));
        assert_eq!(centered(Rect::new(5, 5, 20, 6), 40, 10), Rect::new(5, 5, 20, 6));
    }

    #[test]
    fn ada_amounts_use_two_decimals() {
        assert_eq!(ada(4_916_094), "4.92 ₳");
        assert_eq!(ada(0), "0.00 ₳");
    }
}
