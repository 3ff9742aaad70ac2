//! Command-line host for the sheetform import wizard.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;
pub mod summary;
