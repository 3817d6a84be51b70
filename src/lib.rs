//! Firewatch - real-time fire-alarm sensor dashboard backend
//!
//! This library exposes the core modules for testing and reuse.

pub mod common;
pub mod config;
pub mod error;
pub mod monitor;
pub mod routes;
pub mod series;
pub mod sync;
pub mod upstream;
