//! Bounding-box highlight rendering.

use serde_json::{json, Value};
use tracing::debug;

use projpicker_common::{Extent, Ring};

/// The map operations the renderer drives.
///
/// Implemented by whatever front end displays the map. The highlight layer
/// is distinct from the drawing layer; clearing it never touches drawn
/// geometry.
pub trait MapSurface {
    /// Remove everything from the highlight layer.
    fn clear_highlight(&mut self);

    /// Add rings to the highlight layer.
    fn draw_highlight(&mut self, rings: &[Ring]);

    /// Move the viewport so `extent` is fully visible.
    fn fit_bounds(&mut self, extent: Extent);
}

/// Contents of the highlight layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BboxLayer {
    rings: Vec<Ring>,
}

impl BboxLayer {
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn extent(&self) -> Option<Extent> {
        Extent::of_rings(&self.rings)
    }

    /// GeoJSON geometry of the highlight.
    ///
    /// A single ring becomes a `Polygon`; a split bbox becomes a
    /// `MultiPolygon` so the two halves are not read as shell and hole.
    pub fn to_geojson(&self) -> Option<Value> {
        match self.rings.as_slice() {
            [] => None,
            [ring] => Some(json!({
                "type": "Polygon",
                "coordinates": [ring.closed()],
            })),
            rings => Some(json!({
                "type": "MultiPolygon",
                "coordinates": rings.iter().map(|r| vec![r.closed()]).collect::<Vec<_>>(),
            })),
        }
    }
}

/// Replaces the highlight with new rings and fits the map to them.
pub struct BboxRenderer<M: MapSurface> {
    layer: BboxLayer,
    surface: M,
}

impl<M: MapSurface> BboxRenderer<M> {
    pub fn new(surface: M) -> Self {
        Self {
            layer: BboxLayer::default(),
            surface,
        }
    }

    /// Show exactly `rings`, dropping whatever was highlighted before.
    ///
    /// Returns the extent the viewport was fitted to, or `None` when `rings`
    /// is empty (the highlight is then just cleared).
    pub fn render(&mut self, rings: &[Ring]) -> Option<Extent> {
        self.clear();
        let extent = Extent::of_rings(rings)?;

        self.layer.rings = rings.to_vec();
        self.surface.draw_highlight(rings);
        self.surface.fit_bounds(extent);
        debug!(rings = rings.len(), ?extent, "Rendered CRS bbox");
        Some(extent)
    }

    pub fn clear(&mut self) {
        self.layer.rings.clear();
        self.surface.clear_highlight();
    }

    pub fn layer(&self) -> &BboxLayer {
        &self.layer
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut M {
        &mut self.surface
    }
}

/// A map surface that only records its state.
///
/// Used by the CLI, which has no screen, and by tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryMap {
    pub highlight: Vec<Ring>,
    pub viewport: Option<Extent>,
    pub fit_count: usize,
}

impl MapSurface for MemoryMap {
    fn clear_highlight(&mut self) {
        self.highlight.clear();
    }

    fn draw_highlight(&mut self, rings: &[Ring]) {
        self.highlight.extend_from_slice(rings);
    }

    fn fit_bounds(&mut self, extent: Extent) {
        self.viewport = Some(extent);
        self.fit_count += 1;
    }
}
