//! On-disk records of the binary map file.
//!
//! The file is a packed little-endian layout:
//!
//! ```text
//! FileHeader | TileHeaderEntry[tile_count] | Tile...
//! Tile: TileBlockHeader | MapFeature[features_count]
//!       | StoredCoordinate[coordinates_count]
//!       | StringEntry[string_count] | u16[characters_count]
//! ```
//!
//! Every record is 1-byte packed; the `zerocopy::little_endian` field
//! types pin both byte order and the absence of padding, so the structs
//! below can be cast directly out of the mapped region on any host.

use zerocopy::little_endian as le;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// The only map-file version this reader understands.
pub const SUPPORTED_VERSION: i64 = 1;

/// Leading record of the file: format version and tile index length.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Debug, Clone, Copy)]
#[repr(C)]
pub struct FileHeader {
    pub version: le::I64,
    pub tile_count: le::I32,
}

/// One entry of the tile index: tile id plus the absolute byte offset of
/// its [`TileBlockHeader`].
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Debug, Clone, Copy)]
#[repr(C)]
pub struct TileHeaderEntry {
    pub id: le::I32,
    pub offset_bytes: le::U64,
}

/// Per-tile record counts and the absolute byte offsets of the tile's
/// coordinate pool, string-entry table and character pool.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Debug, Clone, Copy)]
#[repr(C)]
pub struct TileBlockHeader {
    pub features_count: le::I32,
    pub coordinates_count: le::I32,
    pub string_count: le::I32,
    pub characters_count: le::I32,
    pub coordinates_offset_bytes: le::U64,
    pub strings_offset_bytes: le::U64,
    pub characters_offset_bytes: le::U64,
}

/// A single map feature. Offsets index into the tile's pools:
/// `coordinate_offset` in coordinate records, `label_offset` and
/// `properties_offset` in string-entry records. `label_offset < 0`
/// means the feature has no intrinsic label.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Debug, Clone, Copy)]
#[repr(C)]
pub struct MapFeature {
    pub id: le::I64,
    pub label_offset: le::I32,
    pub geometry_type: u8,
    pub coordinate_offset: le::I32,
    pub coordinate_count: le::I32,
    pub properties_offset: le::I32,
    pub property_count: le::I32,
}

impl MapFeature {
    /// The feature's geometry, or `None` for an unknown type code.
    #[must_use]
    pub fn geometry(&self) -> Option<GeometryType> {
        GeometryType::from_raw(self.geometry_type)
    }

    #[must_use]
    pub fn has_label(&self) -> bool {
        self.label_offset.get() >= 0
    }
}

/// A latitude/longitude pair in WGS84 degrees.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Debug, Clone, Copy)]
#[repr(C)]
pub struct StoredCoordinate {
    pub latitude: le::F64,
    pub longitude: le::F64,
}

impl StoredCoordinate {
    #[must_use]
    pub fn lat(&self) -> f64 {
        self.latitude.get()
    }

    #[must_use]
    pub fn lon(&self) -> f64 {
        self.longitude.get()
    }
}

/// A view into the tile's character pool. Both fields are in UTF-16 code
/// units; the byte offset of the string is `offset * 2`.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Debug, Clone, Copy)]
#[repr(C)]
pub struct StringEntry {
    pub offset: le::I32,
    pub length: le::I32,
}

/// Geometry class of a [`MapFeature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    Polyline,
    Polygon,
    Point,
}

impl GeometryType {
    /// Decodes the producer's geometry code.
    #[must_use]
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Polyline),
            1 => Some(Self::Polygon),
            2 => Some(Self::Point),
            _ => None,
        }
    }

    /// The on-disk code for this geometry.
    #[must_use]
    pub fn as_raw(self) -> u8 {
        match self {
            Self::Polyline => 0,
            Self::Polygon => 1,
            Self::Point => 2,
        }
    }
}
