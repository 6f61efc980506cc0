pub mod cache;
pub mod command;
pub mod format;
pub mod logger;
pub mod style;
pub mod text;

pub use cache::*;
pub use command::*;
pub use format::*;
pub use logger::*;
pub use style::*;
pub use text::*;
