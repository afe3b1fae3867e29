//! Command implementations for the devevent CLI

pub mod serve;

pub use serve::run_serve;
