pub mod backend;
pub mod bar;
pub mod config;
pub mod error;
pub mod input;
pub mod segments;
pub mod terminal;
pub mod themes;
pub mod utils;

pub use bar::*;
pub use config::*;
pub use error::*;
pub use input::*;
pub use utils::*;
