use crate::bar::Environment;
use crate::input::ClickEvent;
use anyhow::Result;
use futures::future::LocalBoxFuture;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a module. Trees hand out the same instances every frame,
/// so per-instance state survives between renders.
pub type ModuleRef = Rc<Module>;

/// Leaf module producing text.
pub trait RenderModule {
    fn render<'a>(&'a self, env: &'a Environment) -> LocalBoxFuture<'a, Result<String>>;

    /// Visible width without rendering. Stateful or side-effecting modules
    /// should provide this so hit-testing does not render them twice.
    fn alloc(&self) -> Option<usize> {
        None
    }

    fn accepts_input(&self) -> bool {
        false
    }

    fn input<'a>(&'a self, _event: &'a ClickEvent) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(async { Ok(()) })
    }

    /// Wrap output in the environment's background colour.
    fn auto_bg(&self) -> bool {
        true
    }

    /// Wrap output in the environment's foreground colour.
    fn auto_fg(&self) -> bool {
        true
    }
}

/// Module producing child modules.
pub trait MetaModule {
    fn children<'a>(&'a self, env: &'a Environment) -> LocalBoxFuture<'a, Result<Vec<ModuleRef>>>;

    /// When true, one hit region covers the whole rendered span of the children.
    fn accepts_input(&self) -> bool {
        false
    }

    fn input<'a>(&'a self, _event: &'a ClickEvent) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(async { Ok(()) })
    }
}

pub enum Module {
    Render(Box<dyn RenderModule>),
    Meta(Box<dyn MetaModule>),
}

impl Module {
    pub fn render(module: impl RenderModule + 'static) -> ModuleRef {
        Rc::new(Module::Render(Box::new(module)))
    }

    pub fn meta(module: impl MetaModule + 'static) -> ModuleRef {
        Rc::new(Module::Meta(Box::new(module)))
    }

    pub fn accepts_input(&self) -> bool {
        match self {
            Module::Render(m) => m.accepts_input(),
            Module::Meta(m) => m.accepts_input(),
        }
    }

    pub async fn input(&self, event: &ClickEvent) -> Result<()> {
        match self {
            Module::Render(m) => m.input(event).await,
            Module::Meta(m) => m.input(event).await,
        }
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Module::Render(m) => f
                .debug_struct("Render")
                .field("alloc", &m.alloc())
                .field("accepts_input", &m.accepts_input())
                .finish(),
            Module::Meta(m) => f
                .debug_struct("Meta")
                .field("accepts_input", &m.accepts_input())
                .finish(),
        }
    }
}

/// Render module built from a closure. Handy for one-off text producers.
pub struct FnModule<F> {
    render: F,
    auto_bg: bool,
    auto_fg: bool,
}

impl<F> FnModule<F>
where
    F: Fn(&Environment) -> Result<String>,
{
    pub fn new(render: F) -> Self {
        Self {
            render,
            auto_bg: true,
            auto_fg: true,
        }
    }

    /// Output is emitted as-is, without the environment's colours.
    pub fn raw(render: F) -> Self {
        Self {
            render,
            auto_bg: false,
            auto_fg: false,
        }
    }
}

impl<F> RenderModule for FnModule<F>
where
    F: Fn(&Environment) -> Result<String>,
{
    fn render<'a>(&'a self, env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move { (self.render)(env) })
    }

    fn auto_bg(&self) -> bool {
        self.auto_bg
    }

    fn auto_fg(&self) -> bool {
        self.auto_fg
    }
}
