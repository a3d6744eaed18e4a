//! In-memory map-file builder for tests.
//!
//! Fixtures are assembled from the same packed layout records the store
//! reads, so a builder bug and a reader bug cannot cancel each other out
//! silently: record sizes are pinned by the layout's own tests.

use std::io::Write as _;
use std::mem::size_of;

use carta_core::map::GeometryType;
use carta_core::map::layout::{
    FileHeader, MapFeature, SUPPORTED_VERSION, StoredCoordinate, StringEntry, TileBlockHeader,
    TileHeaderEntry,
};
use zerocopy::IntoBytes;

#[derive(Debug, Clone)]
pub struct FeatureSpec {
    pub id: i64,
    pub geometry: GeometryType,
    /// `(lat, lon)` pairs.
    pub coordinates: Vec<(f64, f64)>,
    pub label: Option<String>,
    pub properties: Vec<(String, String)>,
}

impl FeatureSpec {
    pub fn new(id: i64, geometry: GeometryType, coordinates: &[(f64, f64)]) -> Self {
        Self {
            id,
            geometry,
            coordinates: coordinates.to_vec(),
            label: None,
            properties: Vec::new(),
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn property(mut self, key: &str, value: &str) -> Self {
        self.properties.push((key.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Default)]
pub struct MapFileBuilder {
    tiles: Vec<(i32, Vec<FeatureSpec>)>,
}

impl MapFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tile(mut self, id: i32, features: Vec<FeatureSpec>) -> Self {
        self.tiles.push((id, features));
        self
    }

    /// Serializes the map file into bytes.
    pub fn build(&self) -> Vec<u8> {
        let tile_count = i32::try_from(self.tiles.len()).unwrap();
        let index_end =
            size_of::<FileHeader>() + self.tiles.len() * size_of::<TileHeaderEntry>();

        let mut blocks: Vec<Vec<u8>> = Vec::new();
        let mut index: Vec<TileHeaderEntry> = Vec::new();
        let mut offset = index_end as u64;
        for (id, features) in &self.tiles {
            let block = build_tile_block(features, offset);
            index.push(TileHeaderEntry {
                id: (*id).into(),
                offset_bytes: offset.into(),
            });
            offset += block.len() as u64;
            blocks.push(block);
        }

        let mut bytes = Vec::new();
        bytes.extend_from_slice(
            FileHeader {
                version: SUPPORTED_VERSION.into(),
                tile_count: tile_count.into(),
            }
            .as_bytes(),
        );
        for entry in &index {
            bytes.extend_from_slice(entry.as_bytes());
        }
        for block in &blocks {
            bytes.extend_from_slice(block);
        }
        bytes
    }

    /// Writes the map file to a temp file and returns its guard.
    pub fn write(&self) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&self.build()).unwrap();
        file.flush().unwrap();
        file
    }
}

fn build_tile_block(features: &[FeatureSpec], block_offset: u64) -> Vec<u8> {
    let mut coordinates: Vec<StoredCoordinate> = Vec::new();
    let mut strings: Vec<StringEntry> = Vec::new();
    let mut characters: Vec<u16> = Vec::new();
    let mut records: Vec<MapFeature> = Vec::new();

    fn intern(strings: &mut Vec<StringEntry>, characters: &mut Vec<u16>, s: &str) -> i32 {
        let entry_index = i32::try_from(strings.len()).unwrap();
        let offset = i32::try_from(characters.len()).unwrap();
        let units: Vec<u16> = s.encode_utf16().collect();
        let length = i32::try_from(units.len()).unwrap();
        characters.extend_from_slice(&units);
        strings.push(StringEntry {
            offset: offset.into(),
            length: length.into(),
        });
        entry_index
    }

    for feature in features {
        let coordinate_offset = i32::try_from(coordinates.len()).unwrap();
        for &(lat, lon) in &feature.coordinates {
            coordinates.push(StoredCoordinate {
                latitude: lat.into(),
                longitude: lon.into(),
            });
        }

        let label_offset = match &feature.label {
            Some(label) => intern(&mut strings, &mut characters, label),
            None => -1,
        };

        let properties_offset = i32::try_from(strings.len()).unwrap();
        for (key, value) in &feature.properties {
            intern(&mut strings, &mut characters, key);
            intern(&mut strings, &mut characters, value);
        }

        records.push(MapFeature {
            id: feature.id.into(),
            label_offset: label_offset.into(),
            geometry_type: feature.geometry.as_raw(),
            coordinate_offset: coordinate_offset.into(),
            coordinate_count: i32::try_from(feature.coordinates.len()).unwrap().into(),
            properties_offset: properties_offset.into(),
            property_count: i32::try_from(feature.properties.len()).unwrap().into(),
        });
    }

    let features_start = block_offset + size_of::<TileBlockHeader>() as u64;
    let coordinates_start = features_start + (records.len() * size_of::<MapFeature>()) as u64;
    let strings_start = coordinates_start + (coordinates.len() * size_of::<StoredCoordinate>()) as u64;
    let characters_start = strings_start + (strings.len() * size_of::<StringEntry>()) as u64;

    let header = TileBlockHeader {
        features_count: i32::try_from(records.len()).unwrap().into(),
        coordinates_count: i32::try_from(coordinates.len()).unwrap().into(),
        string_count: i32::try_from(strings.len()).unwrap().into(),
        characters_count: i32::try_from(characters.len()).unwrap().into(),
        coordinates_offset_bytes: coordinates_start.into(),
        strings_offset_bytes: strings_start.into(),
        characters_offset_bytes: characters_start.into(),
    };

    let mut block = Vec::new();
    block.extend_from_slice(header.as_bytes());
    for record in &records {
        block.extend_from_slice(record.as_bytes());
    }
    for coordinate in &coordinates {
        block.extend_from_slice(coordinate.as_bytes());
    }
    for entry in &strings {
        block.extend_from_slice(entry.as_bytes());
    }
    for unit in &characters {
        block.extend_from_slice(&unit.to_le_bytes());
    }
    block
}
