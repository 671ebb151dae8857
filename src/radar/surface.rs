use anyhow::{anyhow, Result};

use super::OverlaySpec;

/// Handle for an overlay registered on a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u32);

/// The map the radar frames are drawn on.
pub trait MapSurface {
    /// Register an overlay at `overlay.opacity`.
    fn add_overlay(&mut self, overlay: &OverlaySpec) -> Result<LayerId>;

    fn set_opacity(&mut self, layer: LayerId, opacity: f64) -> Result<()>;

    fn remove_layer(&mut self, layer: LayerId) -> Result<()>;
}

/// Headless map surface that just records layers and their opacity.
#[derive(Debug, Default)]
pub struct MemorySurface {
    layers: Vec<(LayerId, OverlaySpec, f64)>,
    next_id: u32,
}

impl MemorySurface {
    pub fn new() -> Self { Self::default() }

    /// Number of layers currently on the map.
    #[inline] pub fn len(&self) -> usize { self.layers.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.layers.is_empty() }

    pub fn opacity(&self, layer: LayerId) -> Option<f64> {
        self.layers.iter().find(|(id, _, _)| *id == layer).map(|(_, _, opacity)| *opacity)
    }

    /// Layers with non-zero opacity, in registration order.
    pub fn visible(&self) -> Vec<LayerId> {
        self.layers.iter()
            .filter(|(_, _, opacity)| *opacity > 0.0)
            .map(|(id, _, _)| *id)
            .collect()
    }

    /// Overlay times in registration order.
    pub fn times(&self) -> Vec<&str> {
        self.layers.iter().map(|(_, spec, _)| spec.time.as_str()).collect()
    }

    fn entry(&mut self, layer: LayerId) -> Result<&mut (LayerId, OverlaySpec, f64)> {
        self.layers.iter_mut()
            .find(|(id, _, _)| *id == layer)
            .ok_or_else(|| anyhow!("[MemorySurface] unknown layer {layer:?}"))
    }
}

impl MapSurface for MemorySurface {
    fn add_overlay(&mut self, overlay: &OverlaySpec) -> Result<LayerId> {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.push((id, overlay.clone(), overlay.opacity));
        Ok(id)
    }

    fn set_opacity(&mut self, layer: LayerId, opacity: f64) -> Result<()> {
        self.entry(layer)?.2 = opacity;
        Ok(())
    }

    fn remove_layer(&mut self, layer: LayerId) -> Result<()> {
        self.entry(layer)?;
        self.layers.retain(|(id, _, _)| *id != layer);
        Ok(())
    }
}
