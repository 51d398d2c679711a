//! Soil column representation.
//!
//! The column owns an ordered stack of [`SoilLayer`]s addressed by their
//! 1-based solver index. Depth ordering and index assignment happen at
//! construction time, so the solver can walk neighbors by index instead
//! of chasing links.

mod layer;

pub use layer::{FrozenState, HydraulicParams, LayerKind, SoilLayer};

use crate::error::{Result, VadoseError};
use crate::MAX_SOIL_LAYERS;

/// An ordered stack of soil layers, surface first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoilColumn {
    layers: Vec<SoilLayer>,
}

impl SoilColumn {
    /// Create an empty column.
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Build a column from surface-ordered layers.
    pub fn from_layers(layers: impl IntoIterator<Item = SoilLayer>) -> Result<Self> {
        let mut column = Self::new();
        for layer in layers {
            column.push(layer)?;
        }
        Ok(column)
    }

    /// Append a layer below the current bottom.
    ///
    /// Assigns the layer's top depth and 1-based solver index.
    pub fn push(&mut self, mut layer: SoilLayer) -> Result<()> {
        if self.layers.len() >= MAX_SOIL_LAYERS {
            return Err(VadoseError::ColumnFull {
                max: MAX_SOIL_LAYERS,
            });
        }
        let index = self.layers.len() + 1;
        if layer.dz <= 0.0 {
            return Err(VadoseError::invalid_layer(index, "thickness must be positive"));
        }
        if !(0.0..=1.0).contains(&layer.frozen_frac) {
            return Err(VadoseError::invalid_layer(
                index,
                "frozen fraction must lie in [0, 1]",
            ));
        }
        layer.z = self.bottom_depth();
        layer.solind = index;
        self.layers.push(layer);
        Ok(())
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the column has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Depth of the column bottom in meters.
    pub fn bottom_depth(&self) -> f64 {
        self.layers.last().map(|l| l.z + l.dz).unwrap_or(0.0)
    }

    /// Get a layer by its 1-based solver index.
    pub fn layer(&self, solind: usize) -> Option<&SoilLayer> {
        solind.checked_sub(1).and_then(|i| self.layers.get(i))
    }

    /// Get a mutable layer by its 1-based solver index.
    pub fn layer_mut(&mut self, solind: usize) -> Option<&mut SoilLayer> {
        solind.checked_sub(1).and_then(move |i| self.layers.get_mut(i))
    }

    /// Iterate layers from the surface down.
    pub fn iter(&self) -> std::slice::Iter<'_, SoilLayer> {
        self.layers.iter()
    }

    /// Solver index of the first layer that takes part in hydrology (the
    /// first non-moss layer), if any.
    pub fn first_hydrological(&self) -> Option<usize> {
        self.layers
            .iter()
            .find(|l| l.kind.is_hydrologically_active())
            .map(|l| l.solind)
    }
}
