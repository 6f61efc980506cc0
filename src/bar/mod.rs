pub mod environment;
pub mod layout;
pub mod module;
pub mod powerline;
pub mod render;
pub mod router;

pub use environment::*;
pub use layout::*;
pub use module::*;
pub use powerline::*;
pub use render::*;
pub use router::*;
