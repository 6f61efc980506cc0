//! System backends consumed by the information segments.
//!
//! Windowing backends implement a subset of the optional capabilities; callers
//! must check `supports` before calling one. The default methods fail with
//! `BarError::Unsupported`.

pub mod alsa;
pub mod x11;

pub use alsa::*;
pub use x11::*;

use crate::error::BarError;
use anyhow::Result;
use futures::future::LocalBoxFuture;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ListWorkspaces,
    ActiveWorkspace,
    SetWorkspace,
    WindowTitle,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ListWorkspaces => "listWorkspaces",
            Capability::ActiveWorkspace => "getActiveWorkspace",
            Capability::SetWorkspace => "setWorkspace",
            Capability::WindowTitle => "getWindowTitle",
        }
    }
}

fn unsupported<T>(backend: &str, capability: Capability) -> Result<T> {
    Err(BarError::Unsupported {
        backend: backend.to_string(),
        capability: capability.as_str(),
    }
    .into())
}

pub trait WindowingBackend {
    fn name(&self) -> &str;

    fn supports(&self, capability: Capability) -> bool;

    /// Workspace names, unsorted.
    fn list_workspaces(&self) -> LocalBoxFuture<'_, Result<Vec<String>>> {
        Box::pin(async move { unsupported(self.name(), Capability::ListWorkspaces) })
    }

    /// Index into `list_workspaces()` of the active workspace.
    fn active_workspace(&self) -> LocalBoxFuture<'_, Result<usize>> {
        Box::pin(async move { unsupported(self.name(), Capability::ActiveWorkspace) })
    }

    /// Switch to `name`; `Ok(false)` when the backend refused.
    fn set_workspace<'a>(&'a self, _name: &'a str) -> LocalBoxFuture<'a, Result<bool>> {
        Box::pin(async move { unsupported(self.name(), Capability::SetWorkspace) })
    }

    fn window_title(&self) -> LocalBoxFuture<'_, Result<Option<String>>> {
        Box::pin(async move { unsupported(self.name(), Capability::WindowTitle) })
    }
}

pub trait AudioBackend {
    fn name(&self) -> &str;

    /// Volume in percent, 0..=100.
    fn volume(&self) -> LocalBoxFuture<'_, Result<u8>>;

    fn set_volume(&self, percent: u8) -> LocalBoxFuture<'_, Result<()>>;

    fn muted(&self) -> LocalBoxFuture<'_, Result<bool>>;

    fn set_muted(&self, muted: bool) -> LocalBoxFuture<'_, Result<()>>;
}
