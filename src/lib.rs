//! Lodview - an interactive scene viewer with asynchronous LOD texture streaming

pub mod core;
pub mod assets;
pub mod streaming;
pub mod scene;
pub mod render;
