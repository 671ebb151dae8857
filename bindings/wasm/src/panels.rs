use js_sys::Function;
use snowcommand_core::{PanelKind, Side, SlidePanel};
use wasm_bindgen::{JsValue, prelude::wasm_bindgen};

use crate::common::*;

fn parse_kind(kind: &str) -> Result<PanelKind, JsValue> {
    match kind {
        "left" | "drawer-left" => Ok(PanelKind::Drawer(Side::Left)),
        "right" | "drawer-right" => Ok(PanelKind::Drawer(Side::Right)),
        "bottom" | "bottom-sheet" => Ok(PanelKind::BottomSheet),
        other => Err(js_err(format!(
            "Unknown panel kind {other:?}. Expected one of: left, right, bottom-sheet"
        ))),
    }
}

#[wasm_bindgen]
pub struct WasmPanel {
    inner: SlidePanel,
}

#[wasm_bindgen]
impl WasmPanel {
    #[wasm_bindgen(constructor)]
    pub fn new(kind: &str, on_close: Function) -> Result<WasmPanel, JsValue> {
        let kind = parse_kind(kind)?;
        let inner = SlidePanel::new(kind, move || {
            let _ = on_close.call0(&JsValue::NULL);
        });
        Ok(WasmPanel { inner })
    }

    pub fn view(&self, is_open: bool, title: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.view(is_open, title))
    }

    pub fn backdrop_click(&mut self, is_open: bool) -> bool {
        self.inner.backdrop_click(is_open)
    }

    pub fn close_click(&mut self, is_open: bool) -> bool {
        self.inner.close_click(is_open)
    }
}
