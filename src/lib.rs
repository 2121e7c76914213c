//! Daily todo lists backed by a local key-value store.
//!
//! Tasks belong to one calendar day, global tasks stay visible from the day
//! they were created until the day they were finished, and tags label both.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod tui;
