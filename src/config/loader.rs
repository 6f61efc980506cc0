use crate::config::BarConfig;
use crate::utils::warn_with_context;
use std::collections::HashMap;
use std::env;
use std::str::FromStr;

/// Configuration with priority: CLI args > env vars > defaults. CLI overrides
/// are applied by the caller on top of the returned value.
pub fn load_config() -> BarConfig {
    let vars: HashMap<String, String> = env::vars().collect();
    let mut config = BarConfig::default();
    apply_env_overrides(&mut config, &vars);
    config
}

/// Apply `POWERBAR_*` variables from `vars`. Unparseable values are reported
/// and ignored.
pub fn apply_env_overrides(config: &mut BarConfig, vars: &HashMap<String, String>) {
    if let Some(theme) = vars.get("POWERBAR_THEME") {
        config.theme = theme.clone();
    }

    if let Some(width) = parsed::<usize>(vars, "POWERBAR_WIDTH") {
        config.width = Some(width);
    }

    if let Some(tick) = parsed::<u64>(vars, "POWERBAR_TICK_MS") {
        config.tick_ms = tick.max(1);
    }

    if let Some(bias) = parsed::<i64>(vars, "POWERBAR_COLUMN_BIAS") {
        config.column_bias = bias;
    }
}

fn parsed<T: FromStr>(vars: &HashMap<String, String>, key: &str) -> Option<T> {
    let raw = vars.get(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn_with_context("config", &format!("ignoring {}={:?}", key, raw));
            None
        }
    }
}
