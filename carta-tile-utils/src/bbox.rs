/// A geographic bounding box in WGS84 degrees.
///
/// Both edges are inclusive: a coordinate lying exactly on the boundary
/// is considered inside.
///
/// # Examples
///
/// ```
/// # use carta_tile_utils::BoundingBox;
/// let bbox = BoundingBox::new(52.3, 13.0, 52.7, 13.8);
/// assert!(bbox.contains(52.5, 13.4));
/// assert!(bbox.contains(52.3, 13.0));
/// assert!(!bbox.contains(52.2, 13.4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern edge (inclusive)
    pub min_lat: f64,
    /// Western edge (inclusive)
    pub min_lon: f64,
    /// Northern edge (inclusive)
    pub max_lat: f64,
    /// Eastern edge (inclusive)
    pub max_lon: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from its southern, western, northern and
    /// eastern edges.
    #[must_use]
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Returns `true` if the coordinate lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}
