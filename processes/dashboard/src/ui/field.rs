use lookout_module_utxo_field::AgeBand;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle},
        Block, Borders, Clear, Paragraph,
    },
    Frame,
};

use crate::app::{App, CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::ui::common::{dim, header_style, ACCENT};

/// Approximate width of a 12px monospace glyph in canvas pixels
const GLYPH_WIDTH_PX: f64 = 7.2;

/// Bubbles smaller than this carry no amount label
const LABEL_MIN_RADIUS: f64 = 25.0;

const SELECTION_RING_OFFSET: f64 = 5.0;

fn band_color(band: AgeBand) -> Color {
    let (r, g, b) = band.rgb();
    Color::Rgb(r, g, b)
}

fn field_block() -> Block<'static> {
    let mut legend = vec![Span::raw(" ")];
    for band in AgeBand::ALL {
        legend.push(Span::styled("● ", Style::default().fg(band_color(band))));
        legend.push(Span::styled(format!("{}  ", band.label()), dim()));
    }
    Block::default()
        .title(" UTXO Field ")
        .title_bottom(Line::from(legend))
        .borders(Borders::ALL)
}

/// Cells the canvas itself occupies within the view area
pub fn canvas_area(area: Rect) -> Rect {
    field_block().inner(area)
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let width = app.field.width();
    let height = app.field.height();
    let snapshot = app.field.snapshot();

    if snapshot.is_empty() {
        let message = app.load_error.as_deref().unwrap_or("No UTXOs loaded");
        frame.render_widget(Paragraph::new(message).style(dim()).block(field_block()), area);
        return;
    }

    // Canvas y grows upwards, the field's grows downwards
    let canvas = Canvas::default()
        .block(field_block())
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for bubble in &snapshot {
                let color = if bubble.hovered { ACCENT } else { band_color(bubble.band) };
                ctx.draw(&Circle {
                    x: bubble.x,
                    y: height - bubble.y,
                    radius: bubble.radius,
                    color,
                });
                if bubble.selected {
                    ctx.draw(&Circle {
                        x: bubble.x,
                        y: height - bubble.y,
                        radius: bubble.radius + SELECTION_RING_OFFSET,
                        color: ACCENT,
                    });
                }
            }
            ctx.layer();
            for bubble in snapshot.iter().filter(|b| b.radius >= LABEL_MIN_RADIUS) {
                let half_label = bubble.label.chars().count() as f64 * CELL_WIDTH_PX / 2.0;
                ctx.print(
                    bubble.x - half_label,
                    height - bubble.y,
                    Span::styled(bubble.label.clone(), Style::default().fg(Color::White)),
                );
            }
        });

    frame.render_widget(canvas, area);
    render_tooltip(frame, app, canvas_area(area));
}

/// Tooltip box for the hovered bubble, mapped from canvas pixels to cells
fn render_tooltip(frame: &mut Frame, app: &App, canvas: Rect) {
    let Some(tooltip) = app.field.tooltip(|line| line.chars().count() as f64 * GLYPH_WIDTH_PX)
    else {
        return;
    };

    let column = (tooltip.x.max(0.0) / CELL_WIDTH_PX) as u16;
    let row = (tooltip.y.max(0.0) / CELL_HEIGHT_PX) as u16;
    let longest = tooltip.lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    let tooltip_area = Rect::new(
        canvas.x + column,
        canvas.y + row,
        longest as u16 + 4,
        tooltip.lines.len() as u16 + 2,
    )
    .intersection(canvas);

    let lines: Vec<Line> = tooltip.lines.into_iter().map(Line::from).collect();
    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(ACCENT));

    frame.render_widget(Clear, tooltip_area);
    frame.render_widget(
        Paragraph::new(lines).style(header_style().fg(Color::White)).block(block),
        tooltip_area,
    );
}
