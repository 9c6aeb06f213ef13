// scour-core/src/engines/mod.rs
//! Concrete implementations of the `HistoryRewriteEngine` trait.

pub mod git_engine;

pub use git_engine::GitHistoryEngine;
