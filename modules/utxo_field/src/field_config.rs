use config::Config;

const DEFAULT_CANVAS_WIDTH: (&str, f64) = ("canvas-width", 800.0);
const DEFAULT_CANVAS_HEIGHT: (&str, f64) = ("canvas-height", 500.0);
const DEFAULT_DAMPING: (&str, f64) = ("damping", 0.99);

pub const MIN_RADIUS: f64 = 15.0;
pub const MAX_RADIUS: f64 = 80.0;
pub const MAX_INITIAL_SPEED: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    pub width: f64,
    pub height: f64,
    /// Multiplier applied to both velocity components every tick
    pub damping: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Initial velocity components are drawn from (-max, max)
    pub max_initial_speed: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH.1,
            height: DEFAULT_CANVAS_HEIGHT.1,
            damping: DEFAULT_DAMPING.1,
            min_radius: MIN_RADIUS,
            max_radius: MAX_RADIUS,
            max_initial_speed: MAX_INITIAL_SPEED,
        }
    }
}

impl From<&Config> for FieldConfig {
    fn from(config: &Config) -> Self {
        Self {
            width: config.get_float(DEFAULT_CANVAS_WIDTH.0).unwrap_or(DEFAULT_CANVAS_WIDTH.1),
            height: config.get_float(DEFAULT_CANVAS_HEIGHT.0).unwrap_or(DEFAULT_CANVAS_HEIGHT.1),
            damping: config.get_float(DEFAULT_DAMPING.0).unwrap_or(DEFAULT_DAMPING.1),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_read_overrides_and_keep_defaults() {
        let config = Config::builder()
            .set_default("canvas-width", 1024.0)
            .unwrap()
            .set_default("damping", 0.95)
            .unwrap()
            .build()
            .unwrap();

        let field_config = FieldConfig::from(&config);
        assert_eq!(field_config.width, 1024.0);
        assert_eq!(field_config.height, 500.0);
        assert_eq!(field_config.damping, 0.95);
        assert_eq!(field_config.min_radius, MIN_RADIUS);
    }
}
