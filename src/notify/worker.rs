use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{Notification, NotificationTemplate, PushPayload};

/// An open browser window controlled by the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowClient {
    pub id: String,
    pub url: String,
}

/// A notification was clicked, either on its body (`action: None`) or on one of its actions.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ClickEvent {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub clients: Vec<WindowClient>,
}

/// Lifecycle and functional events delivered by the browser.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Install,
    Activate,
    /// Push message with its data as text, if any.
    Push(Option<String>),
    NotificationClick(ClickEvent),
    NotificationClose { tag: Option<String> },
    /// `postMessage` payload from a page.
    Message(Value),
}

/// Host operation requested by a handler. Each one is asynchronous in the browser
/// and must be passed to `event.waitUntil` so the worker is kept alive until it settles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Effect {
    SkipWaiting,
    ClaimClients,
    Show { title: String, options: Value },
    Close { tag: Option<String> },
    Focus { client: String },
    OpenWindow { url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installed,
    Activated,
}

/// Push-notification service worker: `install → activate → event-driven`.
#[derive(Debug, Clone)]
pub struct ServiceWorker {
    template: NotificationTemplate,
    origin: String,
    state: WorkerState,
}

impl ServiceWorker {
    /// `origin` is the app's own origin, e.g. `https://snow.example.ca`.
    pub fn new(template: NotificationTemplate, origin: &str) -> Self {
        Self {
            template,
            origin: origin.trim_end_matches('/').to_string(),
            state: WorkerState::Parsed,
        }
    }

    #[inline] pub fn state(&self) -> WorkerState { self.state }

    pub fn handle(&mut self, event: WorkerEvent) -> Vec<Effect> {
        match event {
            WorkerEvent::Install => {
                self.state = WorkerState::Installed;
                vec![Effect::SkipWaiting]
            }
            WorkerEvent::Activate => {
                self.state = WorkerState::Activated;
                vec![Effect::ClaimClients]
            }
            WorkerEvent::Push(data) => {
                let payload = data.as_deref().map(PushPayload::parse).unwrap_or_default();
                vec![show(self.template.render(&payload))]
            }
            WorkerEvent::NotificationClick(click) => self.click(click),
            WorkerEvent::NotificationClose { tag } => {
                info!("[sw] notification closed: {}", tag.as_deref().unwrap_or("untagged"));
                Vec::new()
            }
            WorkerEvent::Message(message) => self.message(message),
        }
    }

    fn click(&self, click: ClickEvent) -> Vec<Effect> {
        let mut effects = vec![Effect::Close { tag: click.tag }];
        if click.action.as_deref() == Some("dismiss") {
            return effects;
        }

        let own = click.clients.iter().find(|client| self.is_own(&client.url));
        effects.push(match own {
            Some(client) => Effect::Focus { client: client.id.clone() },
            None => Effect::OpenWindow { url: click.url.unwrap_or_else(|| self.template.url.clone()) },
        });
        effects
    }

    fn message(&self, message: Value) -> Vec<Effect> {
        if message.get("type").and_then(Value::as_str) != Some("SHOW_NOTIFICATION") {
            debug!("[sw] message ignored: {message}");
            return Vec::new();
        }
        let title = message.get("title")
            .and_then(Value::as_str)
            .unwrap_or(self.template.title.as_str())
            .to_string();
        let options = match message.get("options") {
            Some(Value::Object(options)) => Value::Object(options.clone()),
            _ => Value::Object(Map::new()),
        };
        vec![Effect::Show { title, options }]
    }

    fn is_own(&self, url: &str) -> bool {
        url.strip_prefix(&self.origin)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') || rest.starts_with('#'))
    }
}

fn show(notification: Notification) -> Effect {
    Effect::Show { title: notification.title, options: notification.options }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn worker() -> ServiceWorker {
        ServiceWorker::new(NotificationTemplate::default(), "https://snow.example.ca/")
    }

    fn client(id: &str, url: &str) -> WindowClient {
        WindowClient { id: id.to_string(), url: url.to_string() }
    }

    #[test]
    fn lifecycle() {
        let mut sw = worker();
        assert_eq!(sw.state(), WorkerState::Parsed);
        assert_eq!(sw.handle(WorkerEvent::Install), vec![Effect::SkipWaiting]);
        assert_eq!(sw.state(), WorkerState::Installed);
        assert_eq!(sw.handle(WorkerEvent::Activate), vec![Effect::ClaimClients]);
        assert_eq!(sw.state(), WorkerState::Activated);
    }

    #[test]
    fn push_shows_merged_notification() {
        let mut sw = worker();
        let effects = sw.handle(WorkerEvent::Push(Some(r#"{"title":"X","body":"Y"}"#.to_string())));
        let [Effect::Show { title, options }] = effects.as_slice() else {
            panic!("expected one notification, got {effects:?}");
        };
        assert_eq!(title, "X");
        assert_eq!(options["body"], "Y");
        assert_eq!(options["tag"], "snow-alert");
    }

    #[test]
    fn push_without_data_uses_defaults() {
        let effects = worker().handle(WorkerEvent::Push(None));
        let [Effect::Show { title, options }] = effects.as_slice() else { panic!() };
        assert_eq!(title, "Snow Command");
        assert_eq!(options["body"], "New snow zone update");
    }

    #[test]
    fn dismiss_only_closes() {
        let click = ClickEvent {
            action: Some("dismiss".to_string()),
            tag: Some("snow-alert".to_string()),
            clients: vec![client("1", "https://snow.example.ca/")],
            ..ClickEvent::default()
        };
        assert_eq!(
            worker().handle(WorkerEvent::NotificationClick(click)),
            vec![Effect::Close { tag: Some("snow-alert".to_string()) }]
        );
    }

    #[test]
    fn click_focuses_existing_app_window() {
        let click = ClickEvent {
            clients: vec![
                client("other", "https://snow.example.ca.evil.test/"),
                client("app", "https://snow.example.ca/zones?id=3"),
            ],
            url: Some("/zones/3".to_string()),
            ..ClickEvent::default()
        };
        let effects = worker().handle(WorkerEvent::NotificationClick(click));
        assert_eq!(effects[1], Effect::Focus { client: "app".to_string() });
    }

    #[test]
    fn click_opens_window_when_none_match() {
        let click = ClickEvent {
            action: Some("view".to_string()),
            url: Some("/zones/3".to_string()),
            clients: vec![client("x", "https://elsewhere.test/")],
            ..ClickEvent::default()
        };
        let effects = worker().handle(WorkerEvent::NotificationClick(click));
        assert_eq!(effects, vec![
            Effect::Close { tag: None },
            Effect::OpenWindow { url: "/zones/3".to_string() },
        ]);

        let effects = worker().handle(WorkerEvent::NotificationClick(ClickEvent::default()));
        assert_eq!(effects[1], Effect::OpenWindow { url: "/".to_string() });
    }

    #[test]
    fn show_notification_message() {
        let mut sw = worker();
        let effects = sw.handle(WorkerEvent::Message(json!({
            "type": "SHOW_NOTIFICATION",
            "title": "Plow dispatched",
            "options": {"body": "Zone 4"},
        })));
        assert_eq!(effects, vec![Effect::Show {
            title: "Plow dispatched".to_string(),
            options: json!({"body": "Zone 4"}),
        }]);

        assert!(sw.handle(WorkerEvent::Message(json!({"type": "PING"}))).is_empty());
        assert!(sw.handle(WorkerEvent::NotificationClose { tag: None }).is_empty());
    }

    #[test]
    fn effects_serialize_for_the_host() {
        assert_eq!(
            serde_json::to_value(Effect::OpenWindow { url: "/".to_string() }).unwrap(),
            json!({"kind": "openWindow", "url": "/"})
        );
        assert_eq!(serde_json::to_value(Effect::SkipWaiting).unwrap(), json!({"kind": "skipWaiting"}));
    }
}
