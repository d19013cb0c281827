//! Lookout UTXO field module
//! Lays a set of UTXOs out as bubbles sized by value and coloured by age,
//! lets them drift and settle, and resolves pointer hover and selection

mod bubble;
mod field;
mod field_config;
mod tooltip;

pub use bubble::{age_days, bubble_radius, AgeBand, Bubble};
pub use field::{BubbleSnapshot, FieldStats, UtxoField};
pub use field_config::{FieldConfig, MAX_INITIAL_SPEED, MAX_RADIUS, MIN_RADIUS};
pub use tooltip::{
    layout_tooltip, tooltip_lines, Tooltip, TOOLTIP_GAP, TOOLTIP_LINE_HEIGHT, TOOLTIP_PADDING,
};
