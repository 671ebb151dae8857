use anyhow::{anyhow, ensure, Result};
use chrono::DateTime;
use js_sys::{Function, Object, Reflect};
use snowcommand_core::{LayerId, MapSurface, OverlaySpec, RadarConfig, RadarScheduler, PlayState};
use wasm_bindgen::{JsCast, JsValue, prelude::wasm_bindgen};

use crate::common::*;

/// Map adapter backed by a JS object exposing
/// `addOverlay(spec) -> number`, `setOpacity(id, opacity)` and `removeLayer(id)`.
struct JsMapSurface {
    target: Object,
}

impl JsMapSurface {
    fn call(&self, method: &str, args: &[JsValue]) -> Result<JsValue> {
        let func: Function = Reflect::get(&self.target, &JsValue::from_str(method))
            .map_err(|e| anyhow!("map.{method} lookup failed: {e:?}"))?
            .dyn_into()
            .map_err(|_| anyhow!("map.{method} is not a function"))?;
        let args: js_sys::Array = args.iter().collect();
        func.apply(&self.target, &args).map_err(|e| anyhow!("map.{method} failed: {e:?}"))
    }
}

/// Layer ids cross the JS boundary as numbers; only whole values in `u32` range are accepted.
fn layer_id(id: f64) -> Result<LayerId> {
    ensure!(
        id.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&id),
        "map.addOverlay returned invalid layer id {id}"
    );
    Ok(LayerId(id as u32))
}

impl MapSurface for JsMapSurface {
    fn add_overlay(&mut self, overlay: &OverlaySpec) -> Result<LayerId> {
        let spec = to_js(overlay).map_err(|e| anyhow!("{e:?}"))?;
        let id = self.call("addOverlay", &[spec])?
            .as_f64()
            .ok_or_else(|| anyhow!("map.addOverlay must return a numeric layer id"))?;
        layer_id(id)
    }

    fn set_opacity(&mut self, layer: LayerId, opacity: f64) -> Result<()> {
        self.call("setOpacity", &[JsValue::from(layer.0), JsValue::from(opacity)])?;
        Ok(())
    }

    fn remove_layer(&mut self, layer: LayerId) -> Result<()> {
        self.call("removeLayer", &[JsValue::from(layer.0)])?;
        Ok(())
    }
}

#[wasm_bindgen]
pub struct WasmRadar {
    inner: RadarScheduler<JsMapSurface>,
}

#[wasm_bindgen]
impl WasmRadar {
    /// `map` is the JS map adapter; `config` is an optional `radar` config section.
    #[wasm_bindgen(constructor)]
    pub fn new(map: JsValue, config: JsValue) -> Result<WasmRadar, JsValue> {
        let target: Object = map.dyn_into().map_err(|_| js_err("map must be an object"))?;
        let config: RadarConfig = if config.is_undefined() || config.is_null() {
            RadarConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let surface = JsMapSurface { target };
        Ok(WasmRadar { inner: RadarScheduler::new(surface, config.source.clone(), config.settings()) })
    }

    /// Build the frame layers ending at `now_ms` (defaults to `Date.now()`).
    pub fn mount(&mut self, now_ms: Option<f64>) -> Result<(), JsValue> {
        let millis = now_ms.unwrap_or_else(js_sys::Date::now) as i64;
        let now = DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| js_err(format!("invalid timestamp {millis}")))?;
        self.inner.mount(now).map_err(js_err)
    }

    pub fn play(&mut self) -> Result<(), JsValue> {
        self.inner.play().map_err(js_err)
    }

    pub fn stop(&mut self) -> Result<(), JsValue> {
        self.inner.stop().map_err(js_err)
    }

    /// Advance one frame; returns the visible index, or `undefined` when not playing.
    pub fn tick(&mut self) -> Result<Option<u32>, JsValue> {
        Ok(self.inner.tick().map_err(js_err)?.map(|i| i as u32))
    }

    pub fn teardown(&mut self) -> Result<(), JsValue> {
        self.inner.teardown().map_err(js_err)
    }

    pub fn playing(&self) -> bool {
        self.inner.state() == PlayState::Playing
    }

    pub fn current(&self) -> Option<u32> {
        self.inner.current().map(|i| i as u32)
    }

    /// Interval the page should call `tick` at.
    pub fn tick_ms(&self) -> f64 {
        self.inner.settings().tick.as_secs_f64() * 1000.0
    }

    /// Frame times as ISO 8601 strings, oldest first.
    pub fn frame_times(&self) -> Result<JsValue, JsValue> {
        let times: Vec<String> = self.inner.frame_times().iter().map(|t| t.to_rfc3339()).collect();
        to_js(&times)
    }
}
