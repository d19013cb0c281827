use std::path::PathBuf;
use std::time::Duration;

use config::Config;

const DEFAULT_UTXO_FILE: (&str, &str) = ("utxo-file", "utxos.json");
const DEFAULT_TICK_INTERVAL_MS: (&str, u64) = ("tick-interval-ms", 16);
const DEFAULT_EXPORT_DIR: (&str, &str) = ("export-dir", ".");
const DEFAULT_LOG_FILE: (&str, &str) = ("log-file", "lookout-dashboard.log");
const SEED_KEY: &str = "seed";

/// Dashboard-level settings; the field and the draft store read their own keys
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub utxo_file: PathBuf,
    pub tick_interval: Duration,
    /// Fixed seed for bubble placement, random when absent
    pub seed: Option<u64>,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
}

impl From<&Config> for DashboardConfig {
    fn from(config: &Config) -> Self {
        let tick_interval_ms = config
            .get_int(DEFAULT_TICK_INTERVAL_MS.0)
            .ok()
            .and_then(|ms| u64::try_from(ms).ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TICK_INTERVAL_MS.1);

        Self {
            utxo_file: config
                .get_string(DEFAULT_UTXO_FILE.0)
                .unwrap_or(DEFAULT_UTXO_FILE.1.to_string())
                .into(),
            tick_interval: Duration::from_millis(tick_interval_ms),
            seed: config.get_int(SEED_KEY).ok().and_then(|seed| u64::try_from(seed).ok()),
            export_dir: config
                .get_string(DEFAULT_EXPORT_DIR.0)
                .unwrap_or(DEFAULT_EXPORT_DIR.1.to_string())
                .into(),
            log_file: config
                .get_string(DEFAULT_LOG_FILE.0)
                .unwrap_or(DEFAULT_LOG_FILE.1.to_string())
                .into(),
        }
    }
}
