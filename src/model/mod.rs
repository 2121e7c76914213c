pub mod config;
pub mod tag;
pub mod task;

pub use config::*;
pub use tag::*;
pub use task::*;
