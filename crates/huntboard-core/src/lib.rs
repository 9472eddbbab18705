//! Core types and trait definitions for the Huntboard application tracker.
//!
//! This crate is deliberately free of database and transport dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod application;
pub mod chart;
pub mod demo;
pub mod error;
pub mod field;
pub mod preference;
pub mod report;
pub mod session;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
