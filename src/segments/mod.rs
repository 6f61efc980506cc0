pub mod audio;
pub mod basic;
pub mod ram;
pub mod time;
pub mod window;
pub mod workspaces;

pub use audio::*;
pub use basic::*;
pub use ram::*;
pub use time::*;
pub use window::*;
pub use workspaces::*;

use std::cell::Cell;

/// Per-instance toggle between a primary and an alternate format, flipped by
/// left clicks. Lives inside the module, so it survives across frames.
#[derive(Debug, Default)]
pub struct FormatToggle {
    alternate: Cell<bool>,
}

impl FormatToggle {
    pub fn is_alternate(&self) -> bool {
        self.alternate.get()
    }

    pub fn flip(&self) {
        self.alternate.set(!self.alternate.get());
    }
}
