//! The rendering pipeline: classification, tessellation, composition.
//!
//! [`Renderer`] is the façade: it drives the tile store over a geographic
//! query, feeds every visited feature through the tessellator and
//! rasterizes the resulting z-ordered queue into a PNG.

mod canvas;
pub mod classify;
mod error;
mod label;
mod shape;
mod style;

use std::sync::atomic::AtomicBool;

use carta_tile_utils::BoundingBox;

pub use classify::RenderType;
pub use error::{RenderError, RenderResult};
pub use label::LabelFont;
pub use shape::{GeoKind, RoadKind, Shape, Tessellator, WorldBounds};

use crate::map::{IterationOutcome, MapStore};

/// A rectangular geographic region plus the output edge size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderQuery {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
    pub size: u32,
}

impl RenderQuery {
    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.min_lat, self.min_lon, self.max_lat, self.max_lon)
    }
}

/// Renders geographic queries against one opened map store.
///
/// The store is immutable and may be shared; each request builds its own
/// queue and canvas, so one `Renderer` can serve concurrent requests.
#[derive(Debug)]
pub struct Renderer {
    store: MapStore,
    font: Option<LabelFont>,
}

impl Renderer {
    #[must_use]
    pub fn new(store: MapStore) -> Self {
        Self { store, font: None }
    }

    /// Attaches the font used for place-name labels.
    #[must_use]
    pub fn with_label_font(mut self, font: LabelFont) -> Self {
        self.font = Some(font);
        self
    }

    #[must_use]
    pub fn store(&self) -> &MapStore {
        &self.store
    }

    /// Renders the query into PNG bytes.
    ///
    /// A query matching zero features still yields a fully white
    /// `size`×`size` PNG.
    pub fn render(&self, query: &RenderQuery) -> RenderResult<Vec<u8>> {
        self.render_with_cancel(query, None)
    }

    /// Like [`render`](Self::render), but observes `cancel` between tiles
    /// and fails with [`RenderError::Cancelled`] once it is raised.
    pub fn render_with_cancel(
        &self,
        query: &RenderQuery,
        cancel: Option<&AtomicBool>,
    ) -> RenderResult<Vec<u8>> {
        let bbox = query.bounding_box();
        let mut tessellator = Tessellator::new();
        let outcome = self.store.for_each_feature(&bbox, cancel, |feature| {
            tessellator.add_feature(feature);
            true
        })?;
        if outcome == IterationOutcome::Cancelled {
            return Err(RenderError::Cancelled);
        }

        let bounds = tessellator.bounds();
        let shapes = tessellator.into_draw_order();
        let pixmap = canvas::rasterize(&shapes, &bounds, query.size, self.font.as_ref())?;
        Ok(pixmap.encode_png()?)
    }
}
