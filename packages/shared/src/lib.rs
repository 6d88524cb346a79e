//! Shared utilities for the Ludo relay workspace.

pub mod logger;
pub mod time;
