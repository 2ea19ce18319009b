//! Scene objects and per-frame adoption

pub mod config;
pub mod object;
pub mod updater;

pub use config::ViewerConfig;
pub use object::ObjectState;
pub use updater::convert_rgba_to_bgra;
