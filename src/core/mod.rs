//! Core types and utilities

pub mod error;
pub mod logging;
pub mod time;
pub mod camera;
pub mod input;

pub use error::Error;
