//! FAIRWAY — Golf round tracker with a USGA-style handicap engine
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod api;
pub mod config;
pub mod handicap;
pub mod storage;
pub mod types;
