pub mod agenda;
pub mod collection;
pub mod daily;
pub mod global;
pub mod reducer;
pub mod search;
pub mod tags;
pub mod validate;
