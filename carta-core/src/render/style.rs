//! Colors and pen tables for the compositor.
//!
//! All named colors carry their standard CSS RGB values. The per-kind
//! area palette and the two-pass road pens live here so the canvas code
//! stays free of style constants.

use tiny_skia::Color;

use super::shape::{GeoKind, RoadKind};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    #[must_use]
    pub fn opaque(self) -> Color {
        Color::from_rgba8(self.0, self.1, self.2, u8::MAX)
    }

    #[must_use]
    pub fn with_alpha(self, alpha: u8) -> Color {
        Color::from_rgba8(self.0, self.1, self.2, alpha)
    }
}

pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const GRAY: Rgb = Rgb(128, 128, 128);
pub const DARK_GRAY: Rgb = Rgb(169, 169, 169);
pub const LIGHT_GRAY: Rgb = Rgb(211, 211, 211);
pub const LIGHT_BLUE: Rgb = Rgb(173, 216, 230);
pub const YELLOW: Rgb = Rgb(255, 255, 0);
pub const ORANGE: Rgb = Rgb(255, 165, 0);
pub const RED: Rgb = Rgb(255, 0, 0);
pub const DARK_RED: Rgb = Rgb(139, 0, 0);
pub const CORAL: Rgb = Rgb(255, 127, 80);
pub const BROWN: Rgb = Rgb(165, 42, 42);
pub const ROSY_BROWN: Rgb = Rgb(188, 143, 143);
pub const FOREST_GREEN: Rgb = Rgb(34, 139, 34);
pub const PALE_GREEN: Rgb = Rgb(152, 251, 152);
pub const MEDIUM_SEA_GREEN: Rgb = Rgb(60, 179, 113);
pub const DARK_KHAKI: Rgb = Rgb(189, 183, 107);
pub const SIENNA: Rgb = Rgb(160, 82, 45);
pub const WHEAT: Rgb = Rgb(245, 222, 179);
pub const GAINSBORO: Rgb = Rgb(220, 220, 220);

/// Alpha applied to translucent leisure fills (20%).
pub const LEISURE_FILL_ALPHA: u8 = 51;

/// Stroke width shared by thin outlines.
pub const THIN_STROKE: f32 = 1.2;

/// A pen: color plus stroke width in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Rgb,
    pub width: f32,
}

impl Pen {
    const fn new(color: Rgb, width: f32) -> Self {
        Self { color, width }
    }
}

/// Area color of a [`GeoKind`].
#[must_use]
pub fn geo_color(kind: GeoKind) -> Rgb {
    match kind {
        GeoKind::Forest => FOREST_GREEN,
        GeoKind::Plain => PALE_GREEN,
        GeoKind::Hills => DARK_KHAKI,
        GeoKind::Mountains => SIENNA,
        GeoKind::Desert => WHEAT,
        GeoKind::Water => LIGHT_BLUE,
        GeoKind::Leisure => MEDIUM_SEA_GREEN,
        GeoKind::Residential => LIGHT_GRAY,
        GeoKind::Unknown => GAINSBORO,
    }
}

/// Foreground and background pens of a road class. The background pen is
/// stroked first and peeks out past the foreground, giving the casing.
#[must_use]
pub fn road_pens(kind: RoadKind) -> (Pen, Pen) {
    match kind {
        RoadKind::Motorway => (Pen::new(DARK_RED, 2.0), Pen::new(YELLOW, 2.2)),
        RoadKind::Trunk => (Pen::new(RED, 1.8), Pen::new(YELLOW, 2.0)),
        RoadKind::Primary => (Pen::new(ORANGE, 1.8), Pen::new(YELLOW, 2.0)),
        RoadKind::Secondary => (Pen::new(ORANGE, 1.6), Pen::new(YELLOW, 1.8)),
        RoadKind::Tertiary => (Pen::new(YELLOW, 1.6), Pen::new(YELLOW, 1.8)),
        RoadKind::Residential => (Pen::new(WHITE, 1.6), Pen::new(DARK_GRAY, 1.8)),
        RoadKind::Track => (Pen::new(ROSY_BROWN, 1.4), Pen::new(BROWN, 1.5)),
        RoadKind::Service | RoadKind::Unknown => {
            (Pen::new(CORAL, 0.2), Pen::new(YELLOW, 0.4))
        }
    }
}
