//! Database models for persistent storage.

mod item;
mod table;

pub use item::*;
pub use table::*;
