use crate::backend::AudioBackend;
use crate::bar::{Environment, Module, ModuleRef, RenderModule};
use crate::input::{ClickEvent, ClickKind};
use crate::utils::{apply_format, debug_with_context, warn_with_context, FormatContext, FormatString};
use anyhow::Result;
use futures::future::LocalBoxFuture;
use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;
use std::str::FromStr;

/// What a click on the audio module does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioAction {
    /// `+n`
    Raise(u8),
    /// `-n`
    Lower(u8),
    /// `=n`
    Set(u8),
    Mute,
    Unmute,
    /// `!mute`
    ToggleMute,
}

impl FromStr for AudioAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "mute" => return Ok(AudioAction::Mute),
            "unmute" => return Ok(AudioAction::Unmute),
            "!mute" => return Ok(AudioAction::ToggleMute),
            _ => {}
        }
        let mut chars = s.chars();
        let op = chars.next();
        let amount = chars.as_str().parse::<u8>();
        match (op, amount) {
            (Some('+'), Ok(n)) => Ok(AudioAction::Raise(n)),
            (Some('-'), Ok(n)) => Ok(AudioAction::Lower(n)),
            (Some('='), Ok(n)) => Ok(AudioAction::Set(n)),
            _ => Err(format!("Invalid action \"{}\"", s)),
        }
    }
}

pub type AudioActions = HashMap<ClickKind, AudioAction>;

/// Parse `(event, action)` string pairs, logging and skipping invalid actions.
pub fn audio_actions(pairs: &[(ClickKind, &str)]) -> AudioActions {
    let mut actions = AudioActions::new();
    for (kind, action) in pairs {
        match action.parse() {
            Ok(action) => {
                actions.insert(*kind, action);
            }
            Err(e) => warn_with_context("audio", &e),
        }
    }
    actions
}

impl AudioAction {
    pub async fn apply(&self, backend: &dyn AudioBackend) -> Result<()> {
        match *self {
            AudioAction::Raise(n) => {
                let volume = backend.volume().await?;
                backend.set_volume(volume.saturating_add(n).min(100)).await
            }
            AudioAction::Lower(n) => {
                let volume = backend.volume().await?;
                backend.set_volume(volume.saturating_sub(n)).await
            }
            AudioAction::Set(n) => backend.set_volume(n.min(100)).await,
            AudioAction::Mute => backend.set_muted(true).await,
            AudioAction::Unmute => backend.set_muted(false).await,
            AudioAction::ToggleMute => {
                let muted = backend.muted().await?;
                backend.set_muted(!muted).await
            }
        }
    }
}

struct Audio {
    format: FormatString,
    mute_format: Option<FormatString>,
    actions: AudioActions,
    backend: Rc<dyn AudioBackend>,
}

impl RenderModule for Audio {
    fn render<'a>(&'a self, _env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let volume = self.backend.volume().await?;
            let muted = self.backend.muted().await?;

            let mut context = FormatContext::new();
            context.insert("volume".into(), Value::from(volume));
            context.insert("mute".into(), Value::Bool(muted));

            let format = match &self.mute_format {
                Some(mute_format) if muted => mute_format,
                _ => &self.format,
            };
            Ok(apply_format(format, &context).await)
        })
    }

    fn accepts_input(&self) -> bool {
        !self.actions.is_empty()
    }

    fn input<'a>(&'a self, event: &'a ClickEvent) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let Some(action) = self.actions.get(&event.kind) else {
                return Ok(());
            };
            debug_with_context("audio", &format!("{:?}", action));
            action.apply(self.backend.as_ref()).await
        })
    }
}

/// Volume and mute state (`{volume}`, `{mute}`); `mute_format` is used while muted.
pub fn audio(
    format: impl Into<FormatString>,
    mute_format: Option<FormatString>,
    actions: AudioActions,
    backend: Rc<dyn AudioBackend>,
) -> ModuleRef {
    Module::render(Audio {
        format: format.into(),
        mute_format,
        actions,
        backend,
    })
}
