//! Classification of raw OSM-style property bags into the render taxonomy.
//!
//! [`RenderType`] is a hierarchical 32-bit code over four decimal digits,
//! `General × Category × Subcategory × Feature`: multiples of 1000 are
//! general classes, multiples of 100 within a class are categories,
//! multiples of 10 are subcategories and the ones digit picks the leaf.
//! Style dispatch walks leaf → subcategory → category → general, so a
//! leaf without a dedicated style inherits the nearest ancestor's.

use crate::map::GeometryType;

/// A node of the render taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderType(pub i32);

impl RenderType {
    pub const UNKNOWN: Self = Self(0);
    pub const WATERWAY: Self = Self(1);
    pub const PLACE_NAME: Self = Self(2);

    pub const HIGHWAY: Self = Self(1000);
    pub const HIGHWAY_MOTORWAY: Self = Self(1111);
    pub const HIGHWAY_TRUNK: Self = Self(1112);
    pub const HIGHWAY_PRIMARY: Self = Self(1113);
    pub const HIGHWAY_SECONDARY: Self = Self(1114);
    pub const HIGHWAY_TERTIARY: Self = Self(1115);
    pub const HIGHWAY_RESIDENTIAL: Self = Self(1116);
    pub const HIGHWAY_SERVICE: Self = Self(1117);
    pub const HIGHWAY_TRACK: Self = Self(1118);

    pub const RAILWAY: Self = Self(2000);
    pub const RAILWAY_MAINLINE: Self = Self(2111);
    pub const RAILWAY_SUBWAY: Self = Self(2112);
    pub const RAILWAY_LIGHT_RAIL: Self = Self(2113);
    pub const RAILWAY_TRAM: Self = Self(2114);
    pub const RAILWAY_NARROW_GAUGE: Self = Self(2115);
    pub const RAILWAY_MONORAIL: Self = Self(2116);
    pub const RAILWAY_PRESERVED: Self = Self(2117);
    pub const RAILWAY_MINIATURE: Self = Self(2118);
    pub const RAILWAY_FUNICULAR: Self = Self(2119);

    pub const BORDER: Self = Self(3000);
    pub const BUILDING: Self = Self(4000);

    pub const LANDUSE: Self = Self(5000);
    pub const LANDUSE_NATURAL: Self = Self(5110);
    pub const LANDUSE_FOREST: Self = Self(5111);
    pub const LANDUSE_PLAIN: Self = Self(5112);
    pub const LANDUSE_HILLS: Self = Self(5113);
    pub const LANDUSE_MOUNTAINS: Self = Self(5114);
    pub const LANDUSE_DESERT: Self = Self(5115);
    pub const LANDUSE_WATER: Self = Self(5116);
    pub const LANDUSE_LEISURE: Self = Self(5120);
    pub const LANDUSE_RESIDENTIAL: Self = Self(5200);
    pub const LANDUSE_FOUNTAIN: Self = Self(5201);

    /// The code with the feature digit cleared.
    #[must_use]
    pub fn subcategory(self) -> Self {
        Self(self.0 / 10 * 10)
    }

    /// The code with the feature and subcategory digits cleared.
    #[must_use]
    pub fn category(self) -> Self {
        Self(self.0 / 100 * 100)
    }

    /// The general class of the code.
    #[must_use]
    pub fn general(self) -> Self {
        Self(self.0 / 1000 * 1000)
    }
}

/// Maps a property bag plus geometry type to a single [`RenderType`].
///
/// The rule order is behavioral: a `highway` key always wins over
/// `waterway` and `railway` keys on the same feature, and the border
/// rule requires both an administrative boundary and `admin_level` 2.
/// First match wins; each rule reads only the first property whose key
/// matches its test.
#[must_use]
pub fn classify(properties: &[(String, String)], geometry: GeometryType) -> RenderType {
    let is_polygon = geometry == GeometryType::Polygon;
    let is_point = geometry == GeometryType::Point;

    if let Some(value) = value_of(properties, "highway") {
        return match value {
            "motorway" => RenderType::HIGHWAY_MOTORWAY,
            "trunk" => RenderType::HIGHWAY_TRUNK,
            "primary" => RenderType::HIGHWAY_PRIMARY,
            "secondary" => RenderType::HIGHWAY_SECONDARY,
            "tertiary" => RenderType::HIGHWAY_TERTIARY,
            "residential" | "living_street" => RenderType::HIGHWAY_RESIDENTIAL,
            "service" => RenderType::HIGHWAY_SERVICE,
            "track" => RenderType::HIGHWAY_TRACK,
            _ => RenderType::HIGHWAY,
        };
    }

    if !is_point && value_of_prefixed(properties, "water").is_some() {
        return RenderType::WATERWAY;
    }

    if let Some(value) = value_of(properties, "railway") {
        return match value {
            "rail" => RenderType::RAILWAY_MAINLINE,
            "subway" => RenderType::RAILWAY_SUBWAY,
            "light_rail" => RenderType::RAILWAY_LIGHT_RAIL,
            "tram" => RenderType::RAILWAY_TRAM,
            "narrow_gauge" => RenderType::RAILWAY_NARROW_GAUGE,
            "monorail" => RenderType::RAILWAY_MONORAIL,
            "preserved" => RenderType::RAILWAY_PRESERVED,
            "miniature" => RenderType::RAILWAY_MINIATURE,
            "funicular" => RenderType::RAILWAY_FUNICULAR,
            _ => RenderType::RAILWAY,
        };
    }

    let boundary = value_of_prefixed(properties, "boundary");
    if boundary.is_some_and(|v| v.starts_with("administrative"))
        && value_of_prefixed(properties, "admin_level") == Some("2")
    {
        return RenderType::BORDER;
    }

    if !is_point
        && value_of_prefixed(properties, "place")
            .is_some_and(|v| matches!(v, "city" | "town" | "locality" | "hamlet"))
    {
        return RenderType::PLACE_NAME;
    }

    if boundary.is_some_and(|v| v.starts_with("forest")) {
        return RenderType::LANDUSE_FOREST;
    }

    if let Some(value) = value_of_prefixed(properties, "landuse") {
        if value.starts_with("forest") || value.starts_with("orchard") {
            return RenderType::LANDUSE_FOREST;
        }
        if matches!(
            value,
            "residential"
                | "cemetery"
                | "industrial"
                | "commercial"
                | "square"
                | "construction"
                | "military"
                | "quarry"
                | "brownfield"
        ) {
            return RenderType::LANDUSE_RESIDENTIAL;
        }
        if is_polygon
            && matches!(
                value,
                "form"
                    | "meadow"
                    | "grass"
                    | "greenfield"
                    | "recreation_ground"
                    | "winter_sports"
                    | "allotments"
            )
        {
            return RenderType::LANDUSE_PLAIN;
        }
        if is_polygon && matches!(value, "reservoir" | "basin") {
            return RenderType::LANDUSE_WATER;
        }
    }

    if is_polygon {
        if value_of_prefixed(properties, "building").is_some() {
            return RenderType::LANDUSE_RESIDENTIAL;
        }
        if let Some(value) = value_of_prefixed(properties, "amenity") {
            return if value == "fountain" {
                RenderType::LANDUSE_FOUNTAIN
            } else {
                RenderType::LANDUSE_RESIDENTIAL
            };
        }
        if value_of_prefixed(properties, "leisure").is_some() {
            return RenderType::LANDUSE_LEISURE;
        }
        if let Some(value) = value_of_prefixed(properties, "natural") {
            return match value {
                "fell" | "grassland" | "heath" | "moor" | "scrub" | "wetland" => {
                    RenderType::LANDUSE_PLAIN
                }
                "wood" | "tree_row" => RenderType::LANDUSE_FOREST,
                "bare_rock" | "rock" | "scree" => RenderType::LANDUSE_MOUNTAINS,
                "beach" | "sand" => RenderType::LANDUSE_DESERT,
                "water" => RenderType::LANDUSE_WATER,
                _ => RenderType::LANDUSE_NATURAL,
            };
        }
    }

    RenderType::UNKNOWN
}

/// Value of the first property whose key equals `key`.
fn value_of<'a>(properties: &'a [(String, String)], key: &str) -> Option<&'a str> {
    properties
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Value of the first property whose key starts with `prefix`.
fn value_of_prefixed<'a>(properties: &'a [(String, String)], prefix: &str) -> Option<&'a str> {
    properties
        .iter()
        .find(|(k, _)| k.starts_with(prefix))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::map::GeometryType::{Point, Polygon, Polyline};

    fn props(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[rstest]
    #[case(&[("highway", "motorway")], RenderType::HIGHWAY_MOTORWAY)]
    #[case(&[("highway", "living_street")], RenderType::HIGHWAY_RESIDENTIAL)]
    #[case(&[("highway", "unclassified")], RenderType::HIGHWAY)]
    #[case(&[("railway", "rail")], RenderType::RAILWAY_MAINLINE)]
    #[case(&[("railway", "funicular")], RenderType::RAILWAY_FUNICULAR)]
    #[case(&[("railway", "abandoned")], RenderType::RAILWAY)]
    #[case(&[("waterway", "river")], RenderType::WATERWAY)]
    #[case(&[("water", "lake")], RenderType::WATERWAY)]
    #[case(&[("landuse", "orchard")], RenderType::LANDUSE_FOREST)]
    #[case(&[("landuse", "forestry")], RenderType::LANDUSE_FOREST)]
    #[case(&[("landuse", "cemetery")], RenderType::LANDUSE_RESIDENTIAL)]
    #[case(&[("boundary", "forest_compartment")], RenderType::LANDUSE_FOREST)]
    #[case(&[], RenderType::UNKNOWN)]
    fn classifies_polylines(#[case] pairs: &[(&str, &str)], #[case] expected: RenderType) {
        assert_eq!(classify(&props(pairs), Polyline), expected);
    }

    /// A feature tagged both highway and waterway is a road.
    #[test]
    fn highway_wins_over_waterway() {
        let bag = props(&[("highway", "primary"), ("waterway", "river")]);
        assert_eq!(classify(&bag, Polyline), RenderType::HIGHWAY_PRIMARY);
        let bag = props(&[("waterway", "river"), ("highway", "primary")]);
        assert_eq!(classify(&bag, Polyline), RenderType::HIGHWAY_PRIMARY);
    }

    #[test]
    fn waterway_excludes_points() {
        let bag = props(&[("waterway", "river")]);
        assert_eq!(classify(&bag, Point), RenderType::UNKNOWN);
    }

    #[test]
    fn border_needs_boundary_and_admin_level() {
        let boundary_only = props(&[("boundary", "administrative")]);
        assert_eq!(classify(&boundary_only, Polyline), RenderType::UNKNOWN);

        let both = props(&[("boundary", "administrative"), ("admin_level", "2")]);
        assert_eq!(classify(&both, Polyline), RenderType::BORDER);

        let wrong_level = props(&[("boundary", "administrative"), ("admin_level", "4")]);
        assert_eq!(classify(&wrong_level, Polyline), RenderType::UNKNOWN);
    }

    #[test]
    fn place_name_excludes_points() {
        let bag = props(&[("place", "city")]);
        assert_eq!(classify(&bag, Point), RenderType::UNKNOWN);
        assert_eq!(classify(&bag, Polyline), RenderType::PLACE_NAME);
    }

    #[rstest]
    #[case(&[("natural", "water")], RenderType::LANDUSE_WATER)]
    #[case(&[("natural", "wood")], RenderType::LANDUSE_FOREST)]
    #[case(&[("natural", "scree")], RenderType::LANDUSE_MOUNTAINS)]
    #[case(&[("natural", "beach")], RenderType::LANDUSE_DESERT)]
    #[case(&[("natural", "wetland")], RenderType::LANDUSE_PLAIN)]
    #[case(&[("natural", "volcano")], RenderType::LANDUSE_NATURAL)]
    #[case(&[("building", "yes")], RenderType::LANDUSE_RESIDENTIAL)]
    #[case(&[("amenity", "fountain")], RenderType::LANDUSE_FOUNTAIN)]
    #[case(&[("amenity", "school")], RenderType::LANDUSE_RESIDENTIAL)]
    #[case(&[("leisure", "park")], RenderType::LANDUSE_LEISURE)]
    #[case(&[("landuse", "meadow")], RenderType::LANDUSE_PLAIN)]
    #[case(&[("landuse", "reservoir")], RenderType::LANDUSE_WATER)]
    fn classifies_polygons(#[case] pairs: &[(&str, &str)], #[case] expected: RenderType) {
        assert_eq!(classify(&props(pairs), Polygon), expected);
    }

    /// The polygon-only landuse rules do not fire for polylines.
    #[rstest]
    #[case(&[("landuse", "meadow")])]
    #[case(&[("landuse", "basin")])]
    #[case(&[("building", "yes")])]
    #[case(&[("leisure", "pitch")])]
    #[case(&[("natural", "water")])]
    fn polygon_rules_skip_polylines(#[case] pairs: &[(&str, &str)]) {
        assert_eq!(classify(&props(pairs), Polyline), RenderType::UNKNOWN);
    }

    /// Reordering properties that does not change each rule's first match
    /// does not change the classification.
    #[test]
    fn classification_is_stable_under_reordering() {
        let forward = props(&[("name", "Mitte"), ("landuse", "residential")]);
        let backward = props(&[("landuse", "residential"), ("name", "Mitte")]);
        assert_eq!(
            classify(&forward, Polygon),
            classify(&backward, Polygon)
        );
    }

    #[rstest]
    #[case(RenderType::HIGHWAY_PRIMARY, RenderType(1110), RenderType(1100), RenderType::HIGHWAY)]
    #[case(RenderType::LANDUSE_FOREST, RenderType::LANDUSE_NATURAL, RenderType(5100), RenderType::LANDUSE)]
    #[case(RenderType::LANDUSE_FOUNTAIN, RenderType::LANDUSE_RESIDENTIAL, RenderType::LANDUSE_RESIDENTIAL, RenderType::LANDUSE)]
    #[case(RenderType::UNKNOWN, RenderType::UNKNOWN, RenderType::UNKNOWN, RenderType::UNKNOWN)]
    fn hierarchy_rounds_down(
        #[case] leaf: RenderType,
        #[case] subcategory: RenderType,
        #[case] category: RenderType,
        #[case] general: RenderType,
    ) {
        assert_eq!(leaf.subcategory(), subcategory);
        assert_eq!(leaf.category(), category);
        assert_eq!(leaf.general(), general);
    }
}
