//! Scaffold a Roo Code workspace by materializing a bundled template tree
//! into a destination directory without overwriting anything already there.

pub mod cli;
pub mod engine;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod guard;
pub mod logging;
pub mod materialize;
pub mod model;
pub mod reporter;
pub mod resolve;
