mod payload;
mod worker;

pub use payload::{Notification, NotificationTemplate, PushPayload};
pub use worker::{ClickEvent, Effect, ServiceWorker, WindowClient, WorkerEvent, WorkerState};
