use std::fs::File;
use std::mem::size_of;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use carta_tile_utils::{BoundingBox, tiles_for_bounding_box};
use log::{debug, trace};
use memmap2::Mmap;
use zerocopy::FromBytes;
use zerocopy::little_endian as le;

use super::error::{MapError, MapResult};
use super::layout::{
    FileHeader, GeometryType, MapFeature, StoredCoordinate, StringEntry, SUPPORTED_VERSION,
    TileBlockHeader, TileHeaderEntry,
};
use crate::render::classify::{RenderType, classify};

/// A read-only, memory-mapped map file.
///
/// The mapping is created at open, never written, and released on drop.
pub struct MapStore {
    path: PathBuf,
    mmap: Mmap,
    tile_count: usize,
}

impl std::fmt::Debug for MapStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapStore")
            .field("path", &self.path)
            .field("tile_count", &self.tile_count)
            .field("mapped_bytes", &self.mmap.len())
            .finish()
    }
}

/// Typed views into one tile's block of the mapped region.
#[derive(Debug, Clone, Copy)]
pub struct TileView<'a> {
    pub header: &'a TileBlockHeader,
    /// Absolute byte offset of the tile block within the file.
    pub offset_bytes: u64,
    pub features: &'a [MapFeature],
    pub coordinates: &'a [StoredCoordinate],
    pub strings: &'a [StringEntry],
    pub characters: &'a [le::U16],
}

/// A single decoded feature, handed to the iteration visitor.
///
/// `coordinates` borrows the mapped region and is only valid for the
/// duration of the visitor invocation.
#[derive(Debug)]
pub struct FeatureData<'a> {
    pub id: i64,
    pub geometry_type: GeometryType,
    pub coordinates: &'a [StoredCoordinate],
    /// The `name` property when present, otherwise the intrinsic label.
    pub label: Option<String>,
    /// Ordered key/value pairs, in storage order.
    pub properties: Vec<(String, String)>,
    pub render_type: RenderType,
}

/// How a bounding-box iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// Every planned tile was visited.
    Completed,
    /// The visitor returned `false`; normal termination, not an error.
    StoppedByVisitor,
    /// The cancel flag was raised between tiles.
    Cancelled,
}

impl MapStore {
    /// Opens and maps the map file at `path`, validating the file header
    /// and the extent of the tile index.
    pub fn open(path: impl AsRef<Path>) -> MapResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| MapError::IoError(e, path.clone()))?;
        // Safety: the file is opened read-only and the producer never
        // rewrites published map files in place.
        let mmap =
            unsafe { Mmap::map(&file) }.map_err(|e| MapError::IoError(e, path.clone()))?;

        let header = FileHeader::read_from_prefix(&mmap)
            .map(|(header, _)| header)
            .map_err(|_| MapError::TruncatedHeader(mmap.len()))?;
        if header.version.get() != SUPPORTED_VERSION {
            return Err(MapError::UnsupportedVersion(header.version.get()));
        }
        let declared = header.tile_count.get();
        let tile_count = usize::try_from(declared)
            .map_err(|_| MapError::TruncatedTileIndex(mmap.len(), declared))?;
        let index_end = tile_count
            .checked_mul(size_of::<TileHeaderEntry>())
            .and_then(|len| len.checked_add(size_of::<FileHeader>()))
            .ok_or(MapError::TruncatedTileIndex(mmap.len(), declared))?;
        if index_end > mmap.len() {
            return Err(MapError::TruncatedTileIndex(mmap.len(), declared));
        }

        Ok(Self {
            path,
            mmap,
            tile_count,
        })
    }

    /// The file this store was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The tile index, validated at open.
    fn tile_index(&self) -> &[TileHeaderEntry] {
        let start = size_of::<FileHeader>();
        let end = start + self.tile_count * size_of::<TileHeaderEntry>();
        <[TileHeaderEntry]>::ref_from_bytes(&self.mmap[start..end])
            .unwrap_or_else(|_| unreachable!("tile index extent was validated at open"))
    }

    /// Looks a tile up by id with a linear scan of the index.
    ///
    /// Tile counts of realistic map files are in the hundreds, so a scan
    /// beats keeping a side table warm.
    pub fn find_tile(&self, id: i32) -> MapResult<Option<TileView<'_>>> {
        let Some(entry) = self
            .tile_index()
            .iter()
            .find(|entry| entry.id.get() == id)
        else {
            return Ok(None);
        };
        self.tile_view(id, entry.offset_bytes.get()).map(Some)
    }

    /// Builds the typed views of one tile block, validating every byte
    /// range against the mapped region.
    fn tile_view(&self, id: i32, offset_bytes: u64) -> MapResult<TileView<'_>> {
        let out_of_range = || MapError::TileBlockOutOfRange(id, offset_bytes);

        let block_start = usize::try_from(offset_bytes).map_err(|_| out_of_range())?;
        let header_bytes = self
            .mmap
            .get(block_start..)
            .ok_or_else(out_of_range)?;
        let (header, _) =
            TileBlockHeader::ref_from_prefix(header_bytes).map_err(|_| out_of_range())?;

        let features = self.records_at(
            block_start as u64 + size_of::<TileBlockHeader>() as u64,
            header.features_count.get(),
            &out_of_range,
        )?;
        let coordinates = self.records_at(
            header.coordinates_offset_bytes.get(),
            header.coordinates_count.get(),
            &out_of_range,
        )?;
        let strings = self.records_at(
            header.strings_offset_bytes.get(),
            header.string_count.get(),
            &out_of_range,
        )?;
        let characters = self.records_at(
            header.characters_offset_bytes.get(),
            header.characters_count.get(),
            &out_of_range,
        )?;

        Ok(TileView {
            header,
            offset_bytes,
            features,
            coordinates,
            strings,
            characters,
        })
    }

    /// Casts `count` packed records at an absolute byte offset, or fails
    /// with the caller's error when the range leaves the mapped region.
    fn records_at<T: FromBytes + zerocopy::Immutable + zerocopy::KnownLayout>(
        &self,
        offset_bytes: u64,
        count: i32,
        out_of_range: &impl Fn() -> MapError,
    ) -> MapResult<&[T]> {
        let start = usize::try_from(offset_bytes).map_err(|_| out_of_range())?;
        let count = usize::try_from(count).map_err(|_| out_of_range())?;
        let end = count
            .checked_mul(size_of::<T>())
            .and_then(|len| start.checked_add(len))
            .ok_or_else(out_of_range)?;
        let bytes = self.mmap.get(start..end).ok_or_else(out_of_range)?;
        <[T]>::ref_from_bytes(bytes).map_err(|_| out_of_range())
    }

    /// Visits every feature with at least one coordinate inside `bbox`
    /// (inclusive edges), in planner-tile order and in-tile storage order.
    ///
    /// The visitor returns `true` to continue; `false` stops the whole
    /// iteration. The optional `cancel` flag is observed between tiles.
    /// Missing tiles are skipped silently; features whose offsets do not
    /// decode are skipped and iteration continues.
    pub fn for_each_feature<F>(
        &self,
        bbox: &BoundingBox,
        cancel: Option<&AtomicBool>,
        mut visitor: F,
    ) -> MapResult<IterationOutcome>
    where
        F: FnMut(&FeatureData<'_>) -> bool,
    {
        for tile_id in tiles_for_bounding_box(bbox) {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                return Ok(IterationOutcome::Cancelled);
            }
            let Some(tile) = self.find_tile(tile_id)? else {
                trace!("Tile {tile_id} is not present in {}", self.path.display());
                continue;
            };
            for feature in tile.features {
                let Some(data) = decode_feature(&tile, feature, bbox) else {
                    continue;
                };
                if !visitor(&data) {
                    return Ok(IterationOutcome::StoppedByVisitor);
                }
            }
        }
        Ok(IterationOutcome::Completed)
    }
}

/// Decodes one feature record against its tile, returning `None` when the
/// feature is outside the box or any of its offsets fail to decode.
fn decode_feature<'a>(
    tile: &TileView<'a>,
    feature: &MapFeature,
    bbox: &BoundingBox,
) -> Option<FeatureData<'a>> {
    let Some(geometry_type) = feature.geometry() else {
        debug!(
            "Skipping feature {}: unknown geometry code {}",
            feature.id.get(),
            feature.geometry_type
        );
        return None;
    };

    let start = usize::try_from(feature.coordinate_offset.get()).ok()?;
    let count = usize::try_from(feature.coordinate_count.get()).ok()?;
    let Some(coordinates) = tile.coordinates.get(start..start.checked_add(count)?) else {
        debug!(
            "Skipping feature {}: coordinate slice [{start}, {start}+{count}) out of range",
            feature.id.get()
        );
        return None;
    };

    // Coarse filter: one coordinate inside the box admits the feature,
    // anything off-canvas is clipped at rasterization time.
    if !coordinates
        .iter()
        .any(|c| bbox.contains(c.lat(), c.lon()))
    {
        return None;
    }

    let mut properties = Vec::with_capacity(usize::try_from(feature.property_count.get()).ok()?);
    let props_start = i64::from(feature.properties_offset.get());
    for pair in 0..i64::from(feature.property_count.get()) {
        let key = string_at(tile, props_start + pair * 2);
        let value = string_at(tile, props_start + pair * 2 + 1);
        match (key, value) {
            (Some(key), Some(value)) => properties.push((key, value)),
            _ => {
                debug!(
                    "Skipping feature {}: property pair {pair} out of range",
                    feature.id.get()
                );
                return None;
            }
        }
    }

    let intrinsic_label = if feature.has_label() {
        string_at(tile, feature.label_offset.get().into())
    } else {
        None
    };
    let label = properties
        .iter()
        .find(|(key, _)| key == "name")
        .map(|(_, value)| value.clone())
        .or(intrinsic_label);

    let render_type = classify(&properties, geometry_type);

    Some(FeatureData {
        id: feature.id.get(),
        geometry_type,
        coordinates,
        label,
        properties,
        render_type,
    })
}

/// Materializes the string at a string-entry index, transcoding the
/// UTF-16 character pool at the boundary.
fn string_at(tile: &TileView<'_>, entry_index: i64) -> Option<String> {
    let entry = tile.strings.get(usize::try_from(entry_index).ok()?)?;
    let start = usize::try_from(entry.offset.get()).ok()?;
    let length = usize::try_from(entry.length.get()).ok()?;
    let units = tile.characters.get(start..start.checked_add(length)?)?;
    let units: Vec<u16> = units.iter().map(|u| u.get()).collect();
    Some(String::from_utf16_lossy(&units))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use zerocopy::IntoBytes;

    use super::*;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let err = MapStore::open("/nonexistent/carta.map").unwrap_err();
        assert!(matches!(err, MapError::IoError(..)));
    }

    #[test]
    fn open_rejects_unknown_version() {
        let header = FileHeader {
            version: 9.into(),
            tile_count: 0.into(),
        };
        let file = write_temp(header.as_bytes());
        let err = MapStore::open(file.path()).unwrap_err();
        assert!(matches!(err, MapError::UnsupportedVersion(9)));
    }

    #[test]
    fn open_rejects_tile_index_past_eof() {
        let header = FileHeader {
            version: SUPPORTED_VERSION.into(),
            tile_count: 1000.into(),
        };
        let file = write_temp(header.as_bytes());
        let err = MapStore::open(file.path()).unwrap_err();
        assert!(matches!(err, MapError::TruncatedTileIndex(_, 1000)));
    }

    #[test]
    fn empty_index_opens_and_finds_nothing() {
        let header = FileHeader {
            version: SUPPORTED_VERSION.into(),
            tile_count: 0.into(),
        };
        let file = write_temp(header.as_bytes());
        let store = MapStore::open(file.path()).unwrap();
        assert!(store.find_tile(123).unwrap().is_none());
    }

    #[test]
    fn tile_block_past_eof_is_format_error() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(
            FileHeader {
                version: SUPPORTED_VERSION.into(),
                tile_count: 1.into(),
            }
            .as_bytes(),
        );
        bytes.extend_from_slice(
            TileHeaderEntry {
                id: 7.into(),
                offset_bytes: 4096.into(),
            }
            .as_bytes(),
        );
        let file = write_temp(&bytes);
        let store = MapStore::open(file.path()).unwrap();
        let err = store.find_tile(7).unwrap_err();
        assert!(matches!(err, MapError::TileBlockOutOfRange(7, 4096)));
    }
}
