//! The drawing layer holding user-drawn query geometry.
//!
//! Kept separate from the highlight layer so rendering a CRS bbox never
//! changes what the next query sends.

use projpicker_common::{Extent, PickerError, PickerResult};
use projpicker_protocol::{Feature, FeatureCollection};

/// An edit reported by the drawing tools.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureChange {
    /// A new feature was drawn.
    Added(Feature),
    /// An existing feature was reshaped or moved.
    Edited { index: usize, feature: Feature },
    /// A feature was deleted.
    Removed(usize),
    /// Every feature was deleted.
    Cleared,
    /// The whole layer was loaded at once, e.g. from a file.
    Replaced(FeatureCollection),
}

/// Ordered features currently drawn on the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingLayer {
    features: Vec<Feature>,
}

impl DrawingLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an edit. Out-of-range indices leave the layer unchanged.
    pub fn apply(&mut self, change: FeatureChange) -> PickerResult<()> {
        match change {
            FeatureChange::Added(feature) => self.features.push(feature),
            FeatureChange::Edited { index, feature } => {
                let len = self.features.len();
                let slot = self
                    .features
                    .get_mut(index)
                    .ok_or_else(|| out_of_range("edit", index, len))?;
                *slot = feature;
            }
            FeatureChange::Removed(index) => {
                if index >= self.features.len() {
                    return Err(out_of_range("remove", index, self.features.len()));
                }
                self.features.remove(index);
            }
            FeatureChange::Cleared => self.features.clear(),
            FeatureChange::Replaced(collection) => self.features = collection.features,
        }
        Ok(())
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Current contents as the collection the serializer consumes.
    pub fn to_collection(&self) -> FeatureCollection {
        FeatureCollection::new().with_features(self.features.iter().cloned())
    }

    /// Extent of all drawn coordinates, widened when it has no area.
    pub fn extent(&self) -> Option<Extent> {
        let mut positions = self
            .features
            .iter()
            .flat_map(|feature| feature.geometry.positions());
        let [lon, lat] = positions.next()?;
        let mut extent = Extent::from_point(lon, lat);
        for [lon, lat] in positions {
            extent.include(lon, lat);
        }
        Some(extent.expand_degenerate())
    }
}

fn out_of_range(action: &str, index: usize, len: usize) -> PickerError {
    PickerError::InvalidFeature(format!(
        "cannot {} feature {}: layer has {} features",
        action, index, len
    ))
}
