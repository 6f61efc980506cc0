use crate::config::BarConfig;

pub const DEFAULT_TICK_MS: u64 = 250;

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            width: None,
            tick_ms: DEFAULT_TICK_MS,
            // The bundled decoder already reports 0-based columns.
            column_bias: 0,
            mouse: true,
        }
    }
}
