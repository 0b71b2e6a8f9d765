//! Compose CI configuration split across files joined by `include` references
//! into one self-contained document, and talk to the remote config service.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
