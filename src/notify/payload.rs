use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Fields a push message may carry. Anything absent falls back to the template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub tag: Option<String>,
    pub url: Option<String>,
    pub urgent: Option<bool>,
}

impl PushPayload {
    /// Parse push data. A JSON object supplies fields by name (fields of the wrong
    /// type are ignored); anything else becomes the body text. Blank data yields
    /// an empty payload.
    pub fn parse(data: &str) -> Self {
        if data.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<Value>(data) {
            Ok(Value::Object(fields)) => Self::from_fields(&fields),
            Ok(Value::String(text)) => Self::text(text),
            Ok(_) => Self::text(data.to_string()),
            Err(e) => {
                debug!("[push] payload is not JSON ({e}), using it as body text");
                Self::text(data.to_string())
            }
        }
    }

    fn text(body: String) -> Self {
        Self { body: Some(body), ..Self::default() }
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            title: text("title"),
            body: text("body"),
            icon: text("icon"),
            badge: text("badge"),
            tag: text("tag"),
            url: text("url"),
            urgent: fields.get("urgent").and_then(Value::as_bool),
        }
    }
}

/// Default notification contents, overridden field by field by a push payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationTemplate {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
    pub url: String,
    pub urgent: bool,
}

impl Default for NotificationTemplate {
    fn default() -> Self {
        Self {
            title: "Snow Command".to_string(),
            body: "New snow zone update".to_string(),
            icon: "/icons/icon-192.png".to_string(),
            badge: "/icons/badge-72.png".to_string(),
            tag: "snow-alert".to_string(),
            url: "/".to_string(),
            urgent: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationOptions<'a> {
    body: &'a str,
    icon: &'a str,
    badge: &'a str,
    tag: &'a str,
    require_interaction: bool,
    data: NotificationData<'a>,
    actions: [NotificationAction; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct NotificationData<'a> {
    url: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct NotificationAction {
    action: &'static str,
    title: &'static str,
}

const ACTIONS: [NotificationAction; 2] = [
    NotificationAction { action: "view", title: "View" },
    NotificationAction { action: "dismiss", title: "Dismiss" },
];

/// A notification ready for `registration.showNotification(title, options)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub options: Value,
}

impl Notification {
    /// Target URL stored in `options.data.url`.
    pub fn url(&self) -> Option<&str> {
        self.options.get("data")?.get("url")?.as_str()
    }

    pub fn tag(&self) -> Option<&str> {
        self.options.get("tag")?.as_str()
    }
}

impl NotificationTemplate {
    /// Merge a payload over the template, adding the view / dismiss actions.
    pub fn render(&self, payload: &PushPayload) -> Notification {
        let pick = |field: &Option<String>, default: &str| -> String {
            field.clone().unwrap_or_else(|| default.to_string())
        };
        let body = pick(&payload.body, &self.body);
        let icon = pick(&payload.icon, &self.icon);
        let badge = pick(&payload.badge, &self.badge);
        let tag = pick(&payload.tag, &self.tag);
        let url = pick(&payload.url, &self.url);

        let options = NotificationOptions {
            body: &body,
            icon: &icon,
            badge: &badge,
            tag: &tag,
            require_interaction: payload.urgent.unwrap_or(self.urgent),
            data: NotificationData { url: &url },
            actions: ACTIONS,
        };

        Notification {
            title: pick(&payload.title, &self.title),
            options: serde_json::to_value(options).unwrap_or(Value::Null),
        }
    }
}
