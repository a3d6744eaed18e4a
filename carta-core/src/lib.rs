//! Core of the Carta map renderer.
//!
//! [`map`] opens a preprocessed binary map file as a memory-mapped,
//! pointer-addressable tile store and iterates the features intersecting
//! a geographic bounding box. [`render`] classifies those features into a
//! hierarchical render taxonomy, tessellates them into z-ordered shapes
//! and rasterizes the result into a PNG.

pub mod map;
pub mod render;
