//! Geodetic primitives shared by the Carta map renderer.
//!
//! Everything in here is pure math over WGS84 degrees: bounding-box
//! membership, the spherical Mercator projection used for world
//! coordinates, and the tile-grid planning that turns a geographic query
//! into map-file tile ids.

mod bbox;
mod grid;
mod mercator;

pub use bbox::BoundingBox;
pub use grid::{tile_id, tiles_for_bounding_box};
pub use mercator::{mercator_x, mercator_y, mercator_y_to_lat};
