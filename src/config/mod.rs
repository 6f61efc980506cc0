pub mod defaults;
pub mod loader;

pub use defaults::*;
pub use loader::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarConfig {
    pub theme: String,
    /// Columns available to the bar; `None` reads the terminal once at startup.
    pub width: Option<usize>,
    #[serde(rename = "tickMs")]
    pub tick_ms: u64,
    /// Added to hit-region bounds so they match the columns the input decoder reports.
    #[serde(rename = "columnBias")]
    pub column_bias: i64,
    pub mouse: bool,
}
