//! Lookout UTXO field: bubble simulation and picking

use lookout_common::{Lovelace, UtxoRecord};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::bubble::{age_days, bubble_radius, AgeBand, Bubble};
use crate::field_config::FieldConfig;
use crate::tooltip::{layout_tooltip, Tooltip};

/// Header statistics of the field
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStats {
    pub total_count: usize,
    pub total_lovelace: Lovelace,
    pub selected_count: usize,
    pub selected_lovelace: Lovelace,
}

/// What a renderer needs to draw one bubble
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleSnapshot {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub band: AgeBand,
    pub colour: &'static str,
    pub selected: bool,
    pub hovered: bool,
    pub label: String,
}

/// A set of bubbles drifting inside a rectangular canvas.
///
/// Randomness is only used when loading, for start positions and
/// velocities; `tick()` is deterministic.
pub struct UtxoField<R: Rng> {
    config: FieldConfig,
    rng: R,
    bubbles: Vec<Bubble>,
    /// Bubble indices in the order they were selected
    selection: Vec<usize>,
    hovered: Option<usize>,
}

/// Keep a centre coordinate inside `[radius, extent - radius]`. A bubble
/// wider than the extent sits in the middle.
fn clamp_axis(position: f64, radius: f64, extent: f64) -> f64 {
    if extent < radius * 2.0 {
        extent / 2.0
    } else {
        position.clamp(radius, extent - radius)
    }
}

fn bounce(position: &mut f64, velocity: &mut f64, radius: f64, extent: f64) {
    if *position - radius < 0.0 || *position + radius > extent {
        *velocity = -*velocity;
        *position = clamp_axis(*position, radius, extent);
    }
}

impl<R: Rng> UtxoField<R> {
    pub fn new(config: FieldConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            bubbles: Vec::new(),
            selection: Vec::new(),
            hovered: None,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn width(&self) -> f64 {
        self.config.width
    }

    pub fn height(&self) -> f64 {
        self.config.height
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// Replace the bubble set with one bubble per UTXO
    pub fn load(&mut self, utxos: Vec<UtxoRecord>, now_unix: i64) {
        self.selection.clear();
        self.hovered = None;

        let bubbles: Vec<Bubble> = utxos.into_iter().map(|utxo| self.spawn(utxo, now_unix)).collect();
        self.bubbles = bubbles;

        info!(
            bubbles = self.bubbles.len(),
            lovelace = self.stats().total_lovelace,
            "Loaded UTXO field"
        );
    }

    fn spawn(&mut self, utxo: UtxoRecord, now_unix: i64) -> Bubble {
        let (lovelace, amount_ada) = Bubble::amount_of(&utxo);
        let radius = bubble_radius(amount_ada, self.config.min_radius, self.config.max_radius);
        let x = self.random_position(radius, self.config.width);
        let y = self.random_position(radius, self.config.height);
        let vx = self.random_velocity();
        let vy = self.random_velocity();
        let age_days = age_days(utxo.block_time, now_unix);

        Bubble {
            utxo,
            x,
            y,
            radius,
            vx,
            vy,
            lovelace,
            amount_ada,
            age_days,
            band: AgeBand::from_age_days(age_days),
            selected: false,
        }
    }

    fn random_position(&mut self, radius: f64, extent: f64) -> f64 {
        if extent < radius * 2.0 {
            return extent / 2.0;
        }
        radius + self.rng.random::<f64>() * (extent - radius * 2.0)
    }

    fn random_velocity(&mut self) -> f64 {
        (self.rng.random::<f64>() - 0.5) * 2.0 * self.config.max_initial_speed
    }

    /// Advance every bubble one frame: move, bounce off walls, damp
    pub fn tick(&mut self) {
        let FieldConfig {
            width,
            height,
            damping,
            ..
        } = self.config;

        for bubble in &mut self.bubbles {
            bubble.x += bubble.vx;
            bubble.y += bubble.vy;

            bounce(&mut bubble.x, &mut bubble.vx, bubble.radius, width);
            bounce(&mut bubble.y, &mut bubble.vy, bubble.radius, height);

            bubble.vx *= damping;
            bubble.vy *= damping;
        }
    }

    /// Change the canvas size, pulling bubbles back inside the new bounds
    pub fn resize(&mut self, width: f64, height: f64) {
        debug!(width, height, "Resizing UTXO field");
        self.config.width = width;
        self.config.height = height;
        for bubble in &mut self.bubbles {
            bubble.x = clamp_axis(bubble.x, bubble.radius, width);
            bubble.y = clamp_axis(bubble.y, bubble.radius, height);
        }
    }

    /// First bubble, in load order, strictly containing the point
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.bubbles.iter().position(|bubble| bubble.contains(x, y))
    }

    pub fn hover(&mut self, x: f64, y: f64) -> Option<usize> {
        self.hovered = self.hit_test(x, y);
        self.hovered
    }

    pub fn clear_hover(&mut self) {
        self.hovered = None;
    }

    pub fn hovered(&self) -> Option<&Bubble> {
        self.hovered.and_then(|index| self.bubbles.get(index))
    }

    /// Flip the selection of the bubble under the point, if any
    pub fn toggle_selection_at(&mut self, x: f64, y: f64) -> Option<usize> {
        let index = self.hit_test(x, y)?;
        let bubble = &mut self.bubbles[index];
        bubble.selected = !bubble.selected;
        if bubble.selected {
            self.selection.push(index);
        } else {
            self.selection.retain(|selected| *selected != index);
        }
        debug!(index, selected = self.bubbles[index].selected, "Toggled bubble");
        Some(index)
    }

    pub fn clear_selection(&mut self) {
        for bubble in &mut self.bubbles {
            bubble.selected = false;
        }
        self.selection.clear();
    }

    /// Selected bubbles in selection order
    pub fn selected(&self) -> impl Iterator<Item = &Bubble> {
        self.selection.iter().map(|index| &self.bubbles[*index])
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn selected_lovelace(&self) -> Lovelace {
        self.selected().map(|bubble| bubble.lovelace).fold(0, Lovelace::saturating_add)
    }

    pub fn selected_utxos(&self) -> Vec<UtxoRecord> {
        self.selected().map(|bubble| bubble.utxo.clone()).collect()
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats {
            total_count: self.bubbles.len(),
            total_lovelace: self.bubbles
                .iter()
                .map(|bubble| bubble.lovelace)
                .fold(0, Lovelace::saturating_add),
            selected_count: self.selected_count(),
            selected_lovelace: self.selected_lovelace(),
        }
    }

    pub fn snapshot(&self) -> Vec<BubbleSnapshot> {
        self.bubbles
            .iter()
            .enumerate()
            .map(|(index, bubble)| BubbleSnapshot {
                index,
                x: bubble.x,
                y: bubble.y,
                radius: bubble.radius,
                band: bubble.band,
                colour: bubble.band.colour(),
                selected: bubble.selected,
                hovered: self.hovered == Some(index),
                label: bubble.label(),
            })
            .collect()
    }

    /// Tooltip for the hovered bubble, measured with `text_width`
    pub fn tooltip(&self, text_width: impl Fn(&str) -> f64) -> Option<Tooltip> {
        self.hovered()
            .map(|bubble| layout_tooltip(bubble, self.config.width, self.config.height, text_width))
    }
}
