//! Command-line front end for the Philippine tax engine.

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod report;
pub mod utils;
