//! Rasterizer: sprite dispatch (C5), the isometric canvas (C6), the shard
//! merger (C7), and the PNG encoder adapter (C8).

pub mod canvas;
pub mod merge;
pub mod png_writer;
pub mod sprite;

pub use canvas::{render, Canvas, Marker};
