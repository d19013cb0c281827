//! Tooltip layout for the hovered bubble

use serde::Serialize;

use crate::bubble::Bubble;

pub const TOOLTIP_PADDING: f64 = 10.0;
pub const TOOLTIP_LINE_HEIGHT: f64 = 18.0;
/// Gap between the bubble edge and the tooltip
pub const TOOLTIP_GAP: f64 = 10.0;

const TX_PREFIX_CHARS: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub lines: Vec<String>,
}

pub fn tooltip_lines(bubble: &Bubble) -> Vec<String> {
    let tx_prefix: String = bubble.utxo.tx_hash.chars().take(TX_PREFIX_CHARS).collect();
    vec![
        format!("Amount: {:.6} ₳", bubble.amount_ada),
        format!("Age: {} days", bubble.age_days.floor() as i64),
        format!("TX: {tx_prefix}..."),
        format!("Index: {}", bubble.utxo.output_index),
    ]
}

/// Place the tooltip right of the bubble, or left of it when the right side
/// would overflow the canvas. Vertically centred on the bubble, then kept
/// inside the canvas.
pub fn layout_tooltip(
    bubble: &Bubble,
    canvas_width: f64,
    canvas_height: f64,
    text_width: impl Fn(&str) -> f64,
) -> Tooltip {
    let lines = tooltip_lines(bubble);
    let max_width = lines.iter().map(|line| text_width(line)).fold(0.0, f64::max);
    let width = max_width + TOOLTIP_PADDING * 2.0;
    let height = lines.len() as f64 * TOOLTIP_LINE_HEIGHT + TOOLTIP_PADDING * 2.0;

    let mut x = bubble.x + bubble.radius + TOOLTIP_GAP;
    if x + width > canvas_width {
        x = bubble.x - bubble.radius - width - TOOLTIP_GAP;
    }

    let mut y = bubble.y - height / 2.0;
    if y < 0.0 {
        y = 0.0;
    }
    if y + height > canvas_height {
        y = canvas_height - height;
    }

    Tooltip {
        x,
        y,
        width,
        height,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::AgeBand;
    use lookout_common::{AmountEntry, UtxoRecord};

    fn bubble_at(x: f64, y: f64) -> Bubble {
        Bubble {
            utxo: UtxoRecord {
                tx_hash: "39a7a284c2a0948189dc45dec670211cd4d72f7b66c5726c08d9b3df11e44d58"
                    .to_string(),
                output_index: 3,
                amount: vec![AmountEntry::lovelace(12_345_678)],
                ..Default::default()
            },
            x,
            y,
            radius: 20.0,
            vx: 0.0,
            vy: 0.0,
            lovelace: 12_345_678,
            amount_ada: 12.345678,
            age_days: 2.7,
            band: AgeBand::Recent,
            selected: false,
        }
    }

    fn fixed_width(_: &str) -> f64 {
        100.0
    }

    #[test]
    fn lines_describe_the_utxo() {
        assert_eq!(
            tooltip_lines(&bubble_at(0.0, 0.0)),
            [
                "Amount: 12.345678 ₳",
                "Age: 2 days",
                "TX: 39a7a284c2a09481...",
                "Index: 3"
            ]
        );
    }

    #[test]
    fn sits_right_of_bubble_with_room() {
        let tooltip = layout_tooltip(&bubble_at(100.0, 200.0), 800.0, 500.0, fixed_width);
        assert_eq!(tooltip.x, 130.0);
        assert_eq!(tooltip.width, 120.0);
        assert_eq!(tooltip.height, 92.0);
        assert_eq!(tooltip.y, 200.0 - 46.0);
    }

    #[test]
    fn flips_left_at_right_edge() {
        let tooltip = layout_tooltip(&bubble_at(750.0, 200.0), 800.0, 500.0, fixed_width);
        assert_eq!(tooltip.x, 750.0 - 20.0 - 120.0 - 10.0);
    }

    #[test]
    fn clamped_vertically() {
        let top = layout_tooltip(&bubble_at(100.0, 10.0), 800.0, 500.0, fixed_width);
        assert_eq!(top.y, 0.0);
        let bottom = layout_tooltip(&bubble_at(100.0, 495.0), 800.0, 500.0, fixed_width);
        assert_eq!(bottom.y, 500.0 - 92.0);
    }

    #[test]
    fn width_follows_widest_line() {
        let tooltip = layout_tooltip(&bubble_at(100.0, 200.0), 800.0, 500.0, |line| {
            line.chars().count() as f64
        });
        assert_eq!(tooltip.width, "TX: 39a7a284c2a09481...".len() as f64 + 20.0);
    }
}
