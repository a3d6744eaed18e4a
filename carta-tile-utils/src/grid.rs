use crate::BoundingBox;

/// Tiles partition the world into a 1°×1° grid, 360 cells per latitude
/// row starting at the south pole. This id function is the contract with
/// the map-file producer and must not drift from it.
#[must_use]
pub fn tile_id(lat: f64, lon: f64) -> i32 {
    let row = cell_index(lat, 90, 179);
    let col = cell_index(lon, 180, 359);
    row * 360 + col
}

/// Returns the ids of every grid cell intersecting the query box, ordered
/// row-major from the south-west corner to the north-east corner.
///
/// The returned order is the tile visitation order of the store; it is
/// part of the iteration contract, not an implementation detail.
#[must_use]
pub fn tiles_for_bounding_box(bbox: &BoundingBox) -> Vec<i32> {
    let min_row = cell_index(bbox.min_lat, 90, 179);
    let max_row = cell_index(bbox.max_lat, 90, 179);
    let min_col = cell_index(bbox.min_lon, 180, 359);
    let max_col = cell_index(bbox.max_lon, 180, 359);

    if max_row < min_row || max_col < min_col {
        return Vec::new();
    }

    let mut ids =
        Vec::with_capacity(((max_row - min_row + 1) * (max_col - min_col + 1)) as usize);
    for row in min_row..=max_row {
        for col in min_col..=max_col {
            ids.push(row * 360 + col);
        }
    }
    ids
}

/// Degree value -> zero-based cell index, clamped into the grid.
fn cell_index(degrees: f64, shift: i32, max: i32) -> i32 {
    let cell = degrees.floor() as i32 + shift;
    cell.clamp(0, max)
}
