//! Tessellation of classified features into typed, z-ordered shapes.
//!
//! Every shape stores its geometry projected into world units (Mercator).
//! Shapes go through a stable min-heap keyed by `(z_index, insertion
//! sequence)` so the compositor drains them back-to-front, ties broken by
//! insertion order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use carta_tile_utils::{mercator_x, mercator_y};
use log::warn;

use super::classify::RenderType;
use crate::map::{FeatureData, GeometryType};

/// A point in projected world units.
pub type WorldPoint = (f64, f64);

/// Area fill class of a [`Shape::GeoFeature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoKind {
    Forest,
    Plain,
    Hills,
    Mountains,
    Desert,
    Water,
    Leisure,
    Residential,
    Unknown,
}

/// Road class, recovered from the highway leaf code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadKind {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Service,
    Track,
    Unknown,
}

impl RoadKind {
    fn from_render_type(render_type: RenderType) -> Self {
        match render_type {
            RenderType::HIGHWAY_MOTORWAY => Self::Motorway,
            RenderType::HIGHWAY_TRUNK => Self::Trunk,
            RenderType::HIGHWAY_PRIMARY => Self::Primary,
            RenderType::HIGHWAY_SECONDARY => Self::Secondary,
            RenderType::HIGHWAY_TERTIARY => Self::Tertiary,
            RenderType::HIGHWAY_RESIDENTIAL => Self::Residential,
            RenderType::HIGHWAY_SERVICE => Self::Service,
            RenderType::HIGHWAY_TRACK => Self::Track,
            _ => Self::Unknown,
        }
    }
}

/// A drawable shape in world units.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    GeoFeature {
        kind: GeoKind,
        geometry: GeometryType,
        points: Vec<WorldPoint>,
    },
    Road {
        kind: RoadKind,
        geometry: GeometryType,
        points: Vec<WorldPoint>,
    },
    Railway {
        points: Vec<WorldPoint>,
    },
    Waterway {
        geometry: GeometryType,
        points: Vec<WorldPoint>,
    },
    Border {
        points: Vec<WorldPoint>,
    },
    Label {
        text: String,
        points: Vec<WorldPoint>,
    },
}

impl Shape {
    /// The shape's projected coordinate array.
    #[must_use]
    pub fn points(&self) -> &[WorldPoint] {
        match self {
            Self::GeoFeature { points, .. }
            | Self::Road { points, .. }
            | Self::Railway { points }
            | Self::Waterway { points, .. }
            | Self::Border { points }
            | Self::Label { points, .. } => points,
        }
    }
}

/// Running bounding box of every projected coordinate, seeded to ±∞.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }
}

impl WorldBounds {
    fn extend(&mut self, (x, y): WorldPoint) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// `false` until at least one coordinate has been folded in.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }
}

/// Heap entry; `BinaryHeap` is a max-heap, so the ordering is reversed to
/// pop the lowest `(z_index, seq)` first.
#[derive(Debug)]
struct Queued {
    z_index: i32,
    seq: u64,
    shape: Shape,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.z_index == other.z_index && self.seq == other.seq
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.z_index, other.seq).cmp(&(self.z_index, self.seq))
    }
}

/// Builds the z-ordered shape queue for one rendering request.
#[derive(Debug, Default)]
pub struct Tessellator {
    queue: BinaryHeap<Queued>,
    bounds: WorldBounds,
    seq: u64,
}

impl Tessellator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The projected bounding box over every coordinate seen so far.
    #[must_use]
    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// Tessellates one classified feature into at most one shape and
    /// queues it. Unknown features are dropped silently; a render type
    /// unhandled at every hierarchy level is dropped with a diagnostic.
    pub fn add_feature(&mut self, feature: &FeatureData<'_>) {
        let Some((shape, z_index)) = self.build_shape(feature) else {
            return;
        };
        for &point in shape.points() {
            self.bounds.extend(point);
        }
        self.queue.push(Queued {
            z_index,
            seq: self.seq,
            shape,
        });
        self.seq += 1;
    }

    /// Pops every shape in draw order: ascending z-index, insertion order
    /// within equal z-indices.
    #[must_use]
    pub fn into_draw_order(mut self) -> Vec<Shape> {
        let mut shapes = Vec::with_capacity(self.queue.len());
        while let Some(entry) = self.queue.pop() {
            shapes.push(entry.shape);
        }
        shapes
    }

    /// Dispatches through the taxonomy hierarchy: leaf first, then the
    /// subcategory, category and general codes.
    fn build_shape(&self, feature: &FeatureData<'_>) -> Option<(Shape, i32)> {
        let render_type = feature.render_type;

        if let Some(built) = leaf_shape(render_type, feature) {
            return Some(built);
        }
        if let Some(built) = subcategory_shape(render_type.subcategory(), feature) {
            return Some(built);
        }
        if let Some(built) = category_shape(render_type.category(), feature) {
            return Some(built);
        }
        general_shape(render_type.general(), feature)
    }
}

fn project(feature: &FeatureData<'_>) -> Vec<WorldPoint> {
    feature
        .coordinates
        .iter()
        .map(|c| (mercator_x(c.lon()), mercator_y(c.lat())))
        .collect()
}

fn geo(kind: GeoKind, z_index: i32, feature: &FeatureData<'_>) -> Option<(Shape, i32)> {
    Some((
        Shape::GeoFeature {
            kind,
            geometry: feature.geometry_type,
            points: project(feature),
        },
        z_index,
    ))
}

fn leaf_shape(render_type: RenderType, feature: &FeatureData<'_>) -> Option<(Shape, i32)> {
    match render_type {
        RenderType::PLACE_NAME => {
            let text = feature.label.clone()?;
            Some((
                Shape::Label {
                    text,
                    points: project(feature),
                },
                60,
            ))
        }
        RenderType::WATERWAY => Some((
            Shape::Waterway {
                geometry: feature.geometry_type,
                points: project(feature),
            },
            40,
        )),
        RenderType::LANDUSE_FOREST => geo(GeoKind::Forest, 11, feature),
        RenderType::LANDUSE_PLAIN => geo(GeoKind::Plain, 10, feature),
        RenderType::LANDUSE_HILLS => geo(GeoKind::Hills, 12, feature),
        RenderType::LANDUSE_MOUNTAINS => geo(GeoKind::Mountains, 13, feature),
        RenderType::LANDUSE_DESERT => geo(GeoKind::Desert, 9, feature),
        RenderType::LANDUSE_WATER => geo(GeoKind::Water, 40, feature),
        _ => None,
    }
}

fn subcategory_shape(render_type: RenderType, feature: &FeatureData<'_>) -> Option<(Shape, i32)> {
    match render_type {
        RenderType::LANDUSE_LEISURE => geo(GeoKind::Leisure, 41, feature),
        _ => None,
    }
}

fn category_shape(render_type: RenderType, feature: &FeatureData<'_>) -> Option<(Shape, i32)> {
    match render_type {
        RenderType::LANDUSE_RESIDENTIAL => geo(GeoKind::Residential, 41, feature),
        _ => None,
    }
}

fn general_shape(render_type: RenderType, feature: &FeatureData<'_>) -> Option<(Shape, i32)> {
    match render_type {
        RenderType::UNKNOWN => None,
        RenderType::HIGHWAY => Some((
            Shape::Road {
                kind: RoadKind::from_render_type(feature.render_type),
                geometry: feature.geometry_type,
                points: project(feature),
            },
            50,
        )),
        RenderType::RAILWAY => Some((
            Shape::Railway {
                points: project(feature),
            },
            45,
        )),
        RenderType::BORDER => Some((
            Shape::Border {
                points: project(feature),
            },
            30,
        )),
        RenderType::LANDUSE => geo(GeoKind::Unknown, 7, feature),
        other => {
            warn!(
                "Feature {} has render type {} with no style at any hierarchy level",
                feature.id, other.0
            );
            None
        }
    }
}
