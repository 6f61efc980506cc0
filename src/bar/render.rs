use crate::bar::{Environment, Module, ModuleRef};
use crate::utils::{color_directive, style, warn_with_context, Channel};
use futures::future::LocalBoxFuture;

/// Render `modules` left to right into one styled string.
///
/// Each call opens a new environment frame under `parent`. Siblings are
/// rendered strictly in order, since colour changes made by one module are
/// read by the next.
pub fn render<'a>(
    modules: &'a [ModuleRef],
    parent: Option<&'a Environment>,
) -> LocalBoxFuture<'a, String> {
    Box::pin(async move {
        let env = Environment::new(parent);
        let mut out = String::new();
        for module in modules {
            out.push_str(&render_module(module, &env).await);
        }
        out
    })
}

async fn render_module(module: &Module, env: &Environment) -> String {
    match module {
        Module::Render(m) => {
            let mut text = match m.render(env).await {
                Ok(text) => text,
                Err(e) => {
                    warn_with_context("render", &format!("module failed, skipped this frame: {:#}", e));
                    return String::new();
                }
            };
            if m.auto_bg() {
                let bg = env.bg_color();
                text = style(&text, &color_directive(Channel::Background, bg.as_deref()));
            }
            if m.auto_fg() {
                let fg = env.fg_color();
                text = style(&text, &color_directive(Channel::Foreground, fg.as_deref()));
            }
            text
        }
        Module::Meta(m) => match m.children(env).await {
            Ok(children) => render(&children, Some(env)).await,
            Err(e) => {
                warn_with_context("render", &format!("module children failed, skipped this frame: {:#}", e));
                String::new()
            }
        },
    }
}
