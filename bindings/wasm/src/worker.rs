use serde_json::Value;
use snowcommand_core::{ClickEvent, NotificationTemplate, ServiceWorker, WorkerEvent};
use wasm_bindgen::{JsValue, prelude::wasm_bindgen};

use crate::common::*;

/// Worker logic for `sw.js`. Every handler returns the list of effects the
/// script must perform inside `event.waitUntil`.
#[wasm_bindgen]
pub struct WasmServiceWorker {
    inner: ServiceWorker,
}

#[wasm_bindgen]
impl WasmServiceWorker {
    #[wasm_bindgen(constructor)]
    pub fn new(origin: String, template: JsValue) -> Result<WasmServiceWorker, JsValue> {
        let template: NotificationTemplate = if template.is_undefined() || template.is_null() {
            NotificationTemplate::default()
        } else {
            serde_wasm_bindgen::from_value(template)?
        };
        Ok(WasmServiceWorker { inner: ServiceWorker::new(template, &origin) })
    }

    pub fn install(&mut self) -> Result<JsValue, JsValue> {
        self.handle(WorkerEvent::Install)
    }

    pub fn activate(&mut self) -> Result<JsValue, JsValue> {
        self.handle(WorkerEvent::Activate)
    }

    /// `data` is `event.data?.text()`.
    pub fn push(&mut self, data: Option<String>) -> Result<JsValue, JsValue> {
        self.handle(WorkerEvent::Push(data))
    }

    /// `event` is `{ action, tag, url, clients: [{ id, url }] }`.
    pub fn notification_click(&mut self, event: JsValue) -> Result<JsValue, JsValue> {
        let click: ClickEvent = serde_wasm_bindgen::from_value(event)?;
        self.handle(WorkerEvent::NotificationClick(click))
    }

    pub fn notification_close(&mut self, tag: Option<String>) -> Result<JsValue, JsValue> {
        self.handle(WorkerEvent::NotificationClose { tag })
    }

    pub fn message(&mut self, data: JsValue) -> Result<JsValue, JsValue> {
        let data: Value = serde_wasm_bindgen::from_value(data)?;
        self.handle(WorkerEvent::Message(data))
    }

    fn handle(&mut self, event: WorkerEvent) -> Result<JsValue, JsValue> {
        to_js(&self.inner.handle(event))
    }
}
