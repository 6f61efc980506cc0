//! General purpose modules: text, variables, commands and tree combinators.

use crate::bar::{Environment, MetaModule, Module, ModuleRef, RenderModule};
use crate::utils::{apply_format, color_directive, run_command, run_shell, style, Channel, FormatContext, FormatString};
use anyhow::Result;
use futures::future::LocalBoxFuture;
use serde_json::Value;
use std::rc::Rc;

struct Text {
    msg: String,
}

impl RenderModule for Text {
    fn render<'a>(&'a self, _env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move { Ok(self.msg.clone()) })
    }

    fn alloc(&self) -> Option<usize> {
        Some(self.msg.chars().count())
    }
}

/// Fixed text.
pub fn text(msg: &str) -> ModuleRef {
    Module::render(Text {
        msg: msg.to_string(),
    })
}

struct EnvVar {
    format: FormatString,
}

impl RenderModule for EnvVar {
    fn render<'a>(&'a self, _env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let context: FormatContext = std::env::vars().map(|(k, v)| (k, Value::String(v))).collect();
            Ok(apply_format(&self.format, &context).await)
        })
    }
}

/// Process environment variables substituted into `format`.
pub fn envvar(format: impl Into<FormatString>) -> ModuleRef {
    Module::render(EnvVar {
        format: format.into(),
    })
}

struct RenderEnv {
    format: FormatString,
}

impl RenderModule for RenderEnv {
    fn render<'a>(&'a self, env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move { Ok(apply_format(&self.format, &env.collapse()).await) })
    }
}

/// Render-environment variables (including inherited ones) substituted into `format`.
pub fn render_env(format: impl Into<FormatString>) -> ModuleRef {
    Module::render(RenderEnv {
        format: format.into(),
    })
}

struct SetRenderEnv {
    key: String,
    value: Value,
}

impl RenderModule for SetRenderEnv {
    fn render<'a>(&'a self, env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move {
            env.set(&self.key, self.value.clone());
            Ok(String::new())
        })
    }
}

/// Set `key` in the current environment frame for later siblings. Renders nothing.
///
/// Has no `alloc`: the hit-test walk must run it too, or siblings reading `key`
/// would be measured without it.
pub fn set_render_env(key: &str, value: impl Into<Value>) -> ModuleRef {
    Module::render(SetRenderEnv {
        key: key.to_string(),
        value: value.into(),
    })
}

struct ShellCommand {
    command: String,
}

impl RenderModule for ShellCommand {
    fn render<'a>(&'a self, _env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move { run_shell(&self.command).await })
    }
}

/// Trimmed stdout of a shell command, run every frame.
pub fn command(command: &str) -> ModuleRef {
    Module::render(ShellCommand {
        command: command.to_string(),
    })
}

type StateFn = Rc<dyn Fn() -> LocalBoxFuture<'static, Result<String>>>;

/// Where the window manager's binding state comes from.
#[derive(Clone)]
pub enum StateProvider {
    I3,
    Sway,
    Custom(StateFn),
}

impl StateProvider {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn() -> LocalBoxFuture<'static, Result<String>> + 'static,
    {
        StateProvider::Custom(Rc::new(f))
    }

    async fn query(&self) -> Result<String> {
        let program = match self {
            StateProvider::I3 => "i3-msg",
            StateProvider::Sway => "swaymsg",
            StateProvider::Custom(f) => return f().await,
        };
        let reply = run_command(program, &["-t", "get_binding_state"]).await?;
        let parsed: Value = serde_json::from_str(&reply)?;
        Ok(parsed
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }
}

struct WmState {
    format: FormatString,
    provider: StateProvider,
}

impl RenderModule for WmState {
    fn render<'a>(&'a self, _env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let mut context = FormatContext::new();
            context.insert("state".into(), Value::String(self.provider.query().await?));
            Ok(apply_format(&self.format, &context).await)
        })
    }
}

/// Current binding mode of i3/sway (`{state}`).
pub fn wm_state(format: impl Into<FormatString>, provider: StateProvider) -> ModuleRef {
    Module::render(WmState {
        format: format.into(),
        provider,
    })
}

struct Group {
    modules: Vec<ModuleRef>,
}

impl MetaModule for Group {
    fn children<'a>(&'a self, _env: &'a Environment) -> LocalBoxFuture<'a, Result<Vec<ModuleRef>>> {
        Box::pin(async move { Ok(self.modules.clone()) })
    }
}

/// Render `modules` in their own environment frame.
pub fn group(modules: Vec<ModuleRef>) -> ModuleRef {
    Module::meta(Group { modules })
}

struct SetColor {
    fg: String,
}

impl RenderModule for SetColor {
    fn render<'a>(&'a self, env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move {
            env.set_fg_color(Some(&self.fg));
            Ok(style("", &color_directive(Channel::Foreground, Some(&self.fg))))
        })
    }

    fn alloc(&self) -> Option<usize> {
        Some(0)
    }
}

/// Switch the foreground colour for the rest of the frame.
pub fn color(fg: &str) -> ModuleRef {
    Module::render(SetColor { fg: fg.to_string() })
}

/// What a `conditional` predicate gets to look at.
pub struct Condition<'a> {
    pub modules: &'a [ModuleRef],
    pub env: &'a Environment,
}

type Predicate = Box<dyn Fn(&Condition<'_>) -> bool>;

struct Conditional {
    modules: Vec<ModuleRef>,
    predicate: Predicate,
}

impl MetaModule for Conditional {
    fn children<'a>(&'a self, env: &'a Environment) -> LocalBoxFuture<'a, Result<Vec<ModuleRef>>> {
        Box::pin(async move {
            let condition = Condition {
                modules: &self.modules,
                env,
            };
            if (self.predicate)(&condition) {
                Ok(self.modules.clone())
            } else {
                Ok(Vec::new())
            }
        })
    }
}

/// Render `modules` only while `predicate` holds.
pub fn conditional<F>(modules: Vec<ModuleRef>, predicate: F) -> ModuleRef
where
    F: Fn(&Condition<'_>) -> bool + 'static,
{
    Module::meta(Conditional {
        modules,
        predicate: Box::new(predicate),
    })
}

type Picker = Box<dyn Fn(&Environment) -> Option<usize>>;

struct Select {
    choices: Vec<Vec<ModuleRef>>,
    picker: Picker,
}

impl MetaModule for Select {
    fn children<'a>(&'a self, env: &'a Environment) -> LocalBoxFuture<'a, Result<Vec<ModuleRef>>> {
        Box::pin(async move {
            Ok((self.picker)(env)
                .and_then(|i| self.choices.get(i))
                .cloned()
                .unwrap_or_default())
        })
    }
}

/// Render the choice picked by index; nothing for `None` or an index out of range.
pub fn select<F>(choices: Vec<Vec<ModuleRef>>, picker: F) -> ModuleRef
where
    F: Fn(&Environment) -> Option<usize> + 'static,
{
    Module::meta(Select {
        choices,
        picker: Box::new(picker),
    })
}
