//! CLI library components for `xpt-dump`.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
