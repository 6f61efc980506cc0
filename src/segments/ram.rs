use crate::bar::{Environment, Module, ModuleRef, RenderModule};
use crate::error::BarError;
use crate::input::{ClickEvent, ClickKind};
use crate::segments::FormatToggle;
use crate::utils::{apply_format, human_bytes, percent, FormatContext, FormatString};
use anyhow::{Context, Result};
use futures::future::LocalBoxFuture;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total: u64,
    pub free: u64,
}

impl MemoryInfo {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.free)
    }

    /// ramUsagePercent, free, used, total
    pub fn context(&self) -> FormatContext {
        let ratio = if self.total == 0 {
            0.0
        } else {
            self.used() as f64 / self.total as f64
        };
        let mut context = FormatContext::new();
        context.insert("ramUsagePercent".into(), Value::String(percent(ratio)));
        context.insert("free".into(), Value::String(human_bytes(self.free)));
        context.insert("used".into(), Value::String(human_bytes(self.used())));
        context.insert("total".into(), Value::String(human_bytes(self.total)));
        context
    }
}

/// Parse `/proc/meminfo`. "Free" is `MemAvailable`, falling back to `MemFree`
/// on kernels without it.
pub fn parse_meminfo(content: &str) -> Result<MemoryInfo> {
    let mut total = None;
    let mut available = None;
    let mut free = None;

    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let (Some(key), Some(kib)) = (fields.next(), fields.next()) else {
            continue;
        };
        let Ok(kib) = kib.parse::<u64>() else { continue };
        match key {
            "MemTotal:" => total = Some(kib * 1024),
            "MemAvailable:" => available = Some(kib * 1024),
            "MemFree:" => free = Some(kib * 1024),
            _ => {}
        }
    }

    let total = total.ok_or_else(|| BarError::Backend("meminfo has no MemTotal".into()))?;
    let free = available
        .or(free)
        .ok_or_else(|| BarError::Backend("meminfo has no MemAvailable or MemFree".into()))?;
    Ok(MemoryInfo { total, free })
}

pub async fn read_meminfo(path: &Path) -> Result<MemoryInfo> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_meminfo(&content)
}

struct Ram {
    format: FormatString,
    alternate: Option<FormatString>,
    source: PathBuf,
    toggle: FormatToggle,
}

impl RenderModule for Ram {
    fn render<'a>(&'a self, _env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let context = read_meminfo(&self.source).await?.context();
            let format = match &self.alternate {
                Some(alternate) if self.toggle.is_alternate() => alternate,
                _ => &self.format,
            };
            Ok(apply_format(format, &context).await)
        })
    }

    fn accepts_input(&self) -> bool {
        true
    }

    fn input<'a>(&'a self, event: &'a ClickEvent) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if event.kind == ClickKind::MouseLeft {
                self.toggle.flip();
            }
            Ok(())
        })
    }
}

/// Memory usage from `/proc/meminfo`. With `alternate`, left clicks switch formats.
pub fn ram(format: impl Into<FormatString>, alternate: Option<FormatString>) -> ModuleRef {
    ram_from(format, alternate, "/proc/meminfo")
}

/// Like [`ram`], reading a meminfo-formatted file at `source`.
pub fn ram_from(
    format: impl Into<FormatString>,
    alternate: Option<FormatString>,
    source: impl Into<PathBuf>,
) -> ModuleRef {
    Module::render(Ram {
        format: format.into(),
        alternate,
        source: source.into(),
        toggle: FormatToggle::default(),
    })
}
