//! fxconvert library
//!
//! Exposes the conversion session and its supporting modules to the binary
//! and to integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod countdown;
pub mod data;
pub mod logging;
pub mod picker;
pub mod session;
pub mod ui;
