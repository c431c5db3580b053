//! Generates Windows Setup answer files from a typed configuration.

pub mod accounts;
pub mod audit;
pub mod cli;
pub mod commands;
pub mod config;
pub mod contributors;
pub mod disk;
pub mod engine;
pub mod error;
pub mod modules;
pub mod options;

/// Build info
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
