//! Data models: documents, parsed records, verification runs, configuration.

pub mod config;
pub mod document;
pub mod parsed;
pub mod run;
