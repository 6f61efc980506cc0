//! Powerline segments.
//!
//! An open chain is a meta module expanding to `[start, ..children, end]`.
//! `start` puts the chain colour into the environment's background and flags
//! that frame as the chain root; transitions found anywhere below it move the
//! root's background along; `end` closes with whatever background is current.

use crate::bar::environment::POWERLINE_ROOT;
use crate::bar::{Environment, MetaModule, Module, ModuleRef, RenderModule};
use crate::utils::style;
use anyhow::Result;
use futures::future::LocalBoxFuture;

/// Which way the transition glyph points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Glyph drawn in the new colour over the old background.
    Left,
    /// Glyph drawn in the old colour over the new background.
    Right,
}

/// Open a chain: `start` and `end` glyphs around `children`, starting in `color`.
pub fn powerline_open(start: &str, end: &str, color: &str, children: Vec<ModuleRef>) -> ModuleRef {
    let mut modules = Vec::with_capacity(children.len() + 2);
    modules.push(Module::render(ChainStart {
        glyph: start.to_string(),
        color: color.to_string(),
    }));
    modules.extend(children);
    modules.push(Module::render(ChainEnd {
        glyph: end.to_string(),
    }));
    Module::meta(Chain { modules })
}

/// Change the colour of the enclosing chain from here on.
pub fn powerline_transition(glyph: &str, color: &str, direction: Direction) -> ModuleRef {
    Module::render(Transition {
        glyph: glyph.to_string(),
        color: color.to_string(),
        direction,
    })
}

struct Chain {
    modules: Vec<ModuleRef>,
}

impl MetaModule for Chain {
    fn children<'a>(&'a self, _env: &'a Environment) -> LocalBoxFuture<'a, Result<Vec<ModuleRef>>> {
        Box::pin(async move { Ok(self.modules.clone()) })
    }
}

struct ChainStart {
    glyph: String,
    color: String,
}

impl RenderModule for ChainStart {
    fn render<'a>(&'a self, env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move {
            env.set_bg_color(Some(&self.color));
            env.set(POWERLINE_ROOT, true);
            Ok(style(&self.glyph, &format!("reset fg:{}", self.color)))
        })
    }

    fn alloc(&self) -> Option<usize> {
        Some(self.glyph.chars().count())
    }

    fn auto_bg(&self) -> bool {
        false
    }

    fn auto_fg(&self) -> bool {
        false
    }
}

struct ChainEnd {
    glyph: String,
}

impl RenderModule for ChainEnd {
    fn render<'a>(&'a self, env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let last = env.bg_color();
            env.set_bg_color(None);
            env.set(POWERLINE_ROOT, false);
            Ok(style(
                &self.glyph,
                &format!("reset fg:{} bg:none", last.as_deref().unwrap_or("null")),
            ))
        })
    }

    fn alloc(&self) -> Option<usize> {
        Some(self.glyph.chars().count())
    }

    fn auto_bg(&self) -> bool {
        false
    }

    fn auto_fg(&self) -> bool {
        false
    }
}

struct Transition {
    glyph: String,
    color: String,
    direction: Direction,
}

impl RenderModule for Transition {
    fn render<'a>(&'a self, env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let root = env.powerline_root();
            let old = root.bg_color();
            let old = old.as_deref().unwrap_or("null");
            root.set_bg_color(Some(&self.color));
            env.set_bg_color(Some(&self.color));

            let spec = match self.direction {
                Direction::Left => format!("reset fg:{} bg:{}", self.color, old),
                Direction::Right => format!("reset fg:{} bg:{}", old, self.color),
            };
            Ok(style(&self.glyph, &spec))
        })
    }

    fn alloc(&self) -> Option<usize> {
        Some(self.glyph.chars().count())
    }

    fn auto_bg(&self) -> bool {
        false
    }

    fn auto_fg(&self) -> bool {
        false
    }
}
