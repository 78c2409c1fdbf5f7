//! Core library components.
//!
//! Everything that touches keys, entries or the store file lives here; the
//! CLI only parses arguments and prints.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod editor;
pub mod keys;
pub mod lock;
pub mod resolve;
pub mod store;
pub mod types;
pub mod validation;
pub mod vault;
