use crate::backend::{Capability, WindowingBackend};
use crate::bar::{Environment, MetaModule, Module, ModuleRef, RenderModule};
use crate::error::BarError;
use crate::input::{ClickEvent, ClickKind};
use crate::segments::set_render_env;
use crate::utils::{apply_format, debug_with_context, natural_sort, value_to_text, FormatString};
use anyhow::Result;
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::rc::Rc;

/// Render-environment key holding the workspace a child module stands for.
pub const THIS_WORKSPACE: &str = "thisWorkspace";
/// Render-environment key holding the active workspace's name.
pub const CURRENT_WORKSPACE: &str = "currentWorkspace";

type Provider = Box<dyn Fn() -> ModuleRef>;

struct Workspaces {
    provider: Provider,
    backend: Rc<dyn WindowingBackend>,
    instances: RefCell<Vec<(String, ModuleRef)>>,
}

impl MetaModule for Workspaces {
    fn children<'a>(&'a self, _env: &'a Environment) -> LocalBoxFuture<'a, Result<Vec<ModuleRef>>> {
        Box::pin(async move {
            let mut names = self.backend.list_workspaces().await?;
            let mut output = Vec::with_capacity(names.len() * 2 + 1);

            if self.backend.supports(Capability::ActiveWorkspace) {
                let active = self.backend.active_workspace().await?;
                if let Some(name) = names.get(active) {
                    output.push(set_render_env(CURRENT_WORKSPACE, name.as_str()));
                }
            }
            natural_sort(&mut names);

            let mut instances = self.instances.borrow_mut();
            instances.retain(|(name, _)| names.contains(name));
            for name in &names {
                let module = match instances.iter().find(|(n, _)| n == name) {
                    Some((_, module)) => module.clone(),
                    None => {
                        debug_with_context("workspaces", &format!("new module for {}", name));
                        let module = (self.provider)();
                        instances.push((name.clone(), module.clone()));
                        module
                    }
                };
                output.push(set_render_env(THIS_WORKSPACE, name.as_str()));
                output.push(module);
            }

            Ok(output)
        })
    }
}

/// One module per workspace, created by `provider` the first time a workspace
/// shows up and kept until it disappears. Each is preceded by a
/// `thisWorkspace` variable; `currentWorkspace` is set when the backend knows it.
///
/// Fails if the backend cannot list workspaces.
pub fn workspaces<F>(provider: F, backend: Rc<dyn WindowingBackend>) -> Result<ModuleRef>
where
    F: Fn() -> ModuleRef + 'static,
{
    if !backend.supports(Capability::ListWorkspaces) {
        return Err(BarError::Unsupported {
            backend: backend.name().to_string(),
            capability: Capability::ListWorkspaces.as_str(),
        }
        .into());
    }
    Ok(Module::meta(Workspaces {
        provider: Box::new(provider),
        backend,
        instances: RefCell::new(Vec::new()),
    }))
}

struct WorkspaceButton {
    format: FormatString,
    backend: Rc<dyn WindowingBackend>,
    target: RefCell<Option<String>>,
}

impl RenderModule for WorkspaceButton {
    fn render<'a>(&'a self, env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move {
            if let Some(name) = env.get(THIS_WORKSPACE).as_ref().and_then(value_to_text) {
                *self.target.borrow_mut() = Some(name);
            }
            Ok(apply_format(&self.format, &env.collapse()).await)
        })
    }

    fn accepts_input(&self) -> bool {
        self.backend.supports(Capability::SetWorkspace)
    }

    fn input<'a>(&'a self, event: &'a ClickEvent) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if event.kind != ClickKind::MouseLeft {
                return Ok(());
            }
            let target = self.target.borrow().clone();
            if let Some(name) = target {
                let switched = self.backend.set_workspace(&name).await?;
                debug_with_context("workspaces", &format!("switch to {}: {}", name, switched));
            }
            Ok(())
        })
    }
}

/// Workspace label (render-environment keys) that switches to its workspace on left click.
pub fn workspace_button(format: impl Into<FormatString>, backend: Rc<dyn WindowingBackend>) -> ModuleRef {
    Module::render(WorkspaceButton {
        format: format.into(),
        backend,
        target: RefCell::new(None),
    })
}
