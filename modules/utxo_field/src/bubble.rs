//! Bubbles: one circle per UTXO, sized by value and coloured by age

use lookout_common::{lovelace_to_ada_f64, Lovelace, UtxoRecord};
use serde::Serialize;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Age of a UTXO, bucketed for colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBand {
    /// Under a day old
    Fresh,
    /// Under a week
    Recent,
    /// Under 30 days
    Aging,
    Ancient,
}

impl AgeBand {
    pub const ALL: [AgeBand; 4] = [AgeBand::Fresh, AgeBand::Recent, AgeBand::Aging, AgeBand::Ancient];

    pub fn from_age_days(days: f64) -> Self {
        if days < 1.0 {
            AgeBand::Fresh
        } else if days < 7.0 {
            AgeBand::Recent
        } else if days < 30.0 {
            AgeBand::Aging
        } else {
            AgeBand::Ancient
        }
    }

    pub fn colour(&self) -> &'static str {
        match self {
            AgeBand::Fresh => "#00ff88",
            AgeBand::Recent => "#ffd700",
            AgeBand::Aging => "#ff8c00",
            AgeBand::Ancient => "#ff4444",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            AgeBand::Fresh => (0x00, 0xff, 0x88),
            AgeBand::Recent => (0xff, 0xd7, 0x00),
            AgeBand::Aging => (0xff, 0x8c, 0x00),
            AgeBand::Ancient => (0xff, 0x44, 0x44),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::Fresh => "< 1 day",
            AgeBand::Recent => "< 7 days",
            AgeBand::Aging => "< 30 days",
            AgeBand::Ancient => "30+ days",
        }
    }
}

/// Logarithmic radius for an amount in ADA, bounded to `[min_radius, max_radius]`
pub fn bubble_radius(amount_ada: f64, min_radius: f64, max_radius: f64) -> f64 {
    let amount_ada = amount_ada.max(0.0);
    (min_radius + (amount_ada + 1.0).log10() * 15.0).clamp(min_radius, max_radius)
}

/// Days between block time and `now`; a missing block time means a brand new output
pub fn age_days(block_time: Option<i64>, now_unix: i64) -> f64 {
    match block_time {
        Some(block_time) => now_unix.saturating_sub(block_time) as f64 / SECONDS_PER_DAY,
        None => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub utxo: UtxoRecord,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub vx: f64,
    pub vy: f64,
    pub lovelace: Lovelace,
    pub amount_ada: f64,
    pub age_days: f64,
    pub band: AgeBand,
    pub selected: bool,
}

impl Bubble {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (x - self.x).hypot(y - self.y) < self.radius
    }

    /// Amount text drawn inside the bubble
    pub fn label(&self) -> String {
        format!("{:.1} ₳", self.amount_ada)
    }

    pub(crate) fn amount_of(utxo: &UtxoRecord) -> (Lovelace, f64) {
        let lovelace = utxo.lovelace();
        (lovelace, lovelace_to_ada_f64(lovelace))
    }
}
