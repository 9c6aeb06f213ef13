// scour/src/lib.rs
//! # Scour CLI
//!
//! This crate is the command-line surface over the `scour-core` engine. It
//! owns everything interactive: argument parsing, logging setup, the
//! findings report, and the confirmation gate in front of the destructive
//! clean. All detection and rewrite logic lives in `scour-core`.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod report;
