use crate::backend::{Capability, WindowingBackend};
use crate::bar::{Environment, Module, ModuleRef, RenderModule};
use crate::utils::{apply_format, FormatContext, FormatString};
use anyhow::Result;
use futures::future::LocalBoxFuture;
use serde_json::Value;
use std::rc::Rc;

struct Window {
    format: FormatString,
    backend: Rc<dyn WindowingBackend>,
}

impl RenderModule for Window {
    fn render<'a>(&'a self, _env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let mut context = FormatContext::new();
            if self.backend.supports(Capability::WindowTitle) {
                if let Some(title) = self.backend.window_title().await? {
                    context.insert("title".into(), Value::String(title));
                }
            }
            Ok(apply_format(&self.format, &context).await)
        })
    }
}

/// Title of the focused window (`{title}`).
pub fn window(format: impl Into<FormatString>, backend: Rc<dyn WindowingBackend>) -> ModuleRef {
    Module::render(Window {
        format: format.into(),
        backend,
    })
}
