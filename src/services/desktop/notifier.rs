use super::r#trait::Notifier;
use crate::error::Result;
use std::collections::HashMap;
use tracing::{info, warn};
use zbus::blocking::Connection;
use zbus::zvariant::Value;

const NOTIFY_TIMEOUT_MS: i32 = 3000;

/// Уведомления через `org.freedesktop.Notifications` на сессионной шине.
pub struct DbusNotifier {
    connection: Connection,
    app_name: String,
}

impl DbusNotifier {
    pub fn new(app_name: impl Into<String>) -> Result<Self> {
        let connection = Connection::session()?;
        Ok(Self {
            connection,
            app_name: app_name.into(),
        })
    }

    fn send(&self, message: &str) -> zbus::Result<()> {
        let hints: HashMap<&str, Value<'_>> = HashMap::new();
        self.connection.call_method(
            Some("org.freedesktop.Notifications"),
            "/org/freedesktop/Notifications",
            Some("org.freedesktop.Notifications"),
            "Notify",
            &(
                self.app_name.as_str(),
                0u32,
                "",
                self.app_name.as_str(),
                message,
                Vec::<&str>::new(),
                hints,
                NOTIFY_TIMEOUT_MS,
            ),
        )?;
        Ok(())
    }
}

impl Notifier for DbusNotifier {
    fn notify(&self, message: &str) {
        if let Err(e) = self.send(message) {
            warn!("Не удалось отправить уведомление: {}", e);
        }
    }
}

/// Запасной вариант без сессионной шины: уведомления только в лог.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!("{}", message);
    }
}
