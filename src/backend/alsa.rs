use crate::backend::AudioBackend;
use crate::error::BarError;
use crate::utils::{debug_with_context, run_command, TtlCache};
use anyhow::Result;
use futures::future::LocalBoxFuture;
use std::time::Duration;

/// Audio backend driving an ALSA mixer control through `amixer`.
///
/// `amixer get` output is cached briefly, so the volume and mute lookups of
/// one frame (and of its hit-test walk) share a single process. Any `set`
/// drops the cached output.
pub struct AlsaBackend {
    program: String,
    control: String,
    cache: TtlCache<String, String>,
}

impl AlsaBackend {
    pub fn new() -> Self {
        Self::with_control("Master")
    }

    pub fn with_control(control: &str) -> Self {
        Self::with_program("amixer", control)
    }

    /// Use `program` in place of `amixer`; it must accept the same arguments.
    pub fn with_program(program: &str, control: &str) -> Self {
        Self {
            program: program.to_string(),
            control: control.to_string(),
            cache: TtlCache::new(Duration::from_millis(100)),
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = TtlCache::new(ttl);
        self
    }

    async fn get(&self) -> Result<String> {
        if let Some(output) = self.cache.get(&self.control) {
            return Ok(output);
        }
        debug_with_context("alsa", &format!("{} get {}", self.program, self.control));
        let output = run_command(&self.program, &["-M", "get", &self.control]).await?;
        self.cache.insert(self.control.clone(), output.clone());
        Ok(output)
    }

    async fn set(&self, value: &str) -> Result<()> {
        let result = run_command(&self.program, &["-M", "set", &self.control, value]).await;
        self.cache.clear();
        result.map(|_| ())
    }
}

impl Default for AlsaBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// First `[NN%]` in `amixer get` output.
pub fn parse_volume(output: &str) -> Result<u8> {
    output
        .split('[')
        .filter_map(|part| part.split(']').next())
        .find_map(|field| field.strip_suffix('%').and_then(|n| n.parse::<u8>().ok()))
        .ok_or_else(|| BarError::Backend("amixer output has no volume".into()).into())
}

/// `[off]` anywhere means the control is muted.
pub fn parse_muted(output: &str) -> Result<bool> {
    if output.contains("[off]") {
        Ok(true)
    } else if output.contains("[on]") {
        Ok(false)
    } else {
        Err(BarError::Backend("amixer output has no switch state".into()).into())
    }
}

impl AudioBackend for AlsaBackend {
    fn name(&self) -> &str {
        "ALSA"
    }

    fn volume(&self) -> LocalBoxFuture<'_, Result<u8>> {
        Box::pin(async move { parse_volume(&self.get().await?) })
    }

    fn set_volume(&self, percent: u8) -> LocalBoxFuture<'_, Result<()>> {
        Box::pin(async move { self.set(&format!("{}%", percent.min(100))).await })
    }

    fn muted(&self) -> LocalBoxFuture<'_, Result<bool>> {
        Box::pin(async move { parse_muted(&self.get().await?) })
    }

    fn set_muted(&self, muted: bool) -> LocalBoxFuture<'_, Result<()>> {
        Box::pin(async move { self.set(if muted { "mute" } else { "unmute" }).await })
    }
}
