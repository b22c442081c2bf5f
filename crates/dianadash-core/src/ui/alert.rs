use std::fmt;
use std::time::{Duration, Instant};

use super::html::escape;

/// Banners remove themselves this long after being shown
pub const ALERT_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertKind {
    #[default]
    Success,
    Error,
    Warning,
    Info,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Success => "success",
            AlertKind::Error => "error",
            AlertKind::Warning => "warning",
            AlertKind::Info => "info",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub kind: AlertKind,
    pub shown_at: Instant,
}

impl Alert {
    pub fn class_name(&self) -> String {
        format!("alert-{} p-4 mb-4 rounded-md border", self.kind)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= ALERT_LIFETIME
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="{}">{}</div>"#,
            self.class_name(),
            escape(&self.message)
        )
    }
}

/// Transient banners, newest first.
#[derive(Debug, Clone, Default)]
pub struct AlertContainer {
    alerts: Vec<Alert>,
}

impl AlertContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: &str, kind: AlertKind) {
        self.show_at(message, kind, Instant::now());
    }

    /// Insert a banner at the top of the container
    pub fn show_at(&mut self, message: &str, kind: AlertKind, now: Instant) {
        self.alerts.insert(
            0,
            Alert {
                message: message.to_string(),
                kind,
                shown_at: now,
            },
        );
    }

    /// Drop banners that have outlived `ALERT_LIFETIME`
    pub fn prune(&mut self, now: Instant) {
        self.alerts.retain(|a| !a.is_expired(now));
    }

    pub fn visible(&self, now: Instant) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(move |a| !a.is_expired(now))
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn to_html(&self, now: Instant) -> String {
        self.visible(now).map(Alert::to_html).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_alert_on_top() {
        let now = Instant::now();
        let mut alerts = AlertContainer::new();
        alerts.show_at("first", AlertKind::Success, now);
        alerts.show_at("second", AlertKind::Error, now);

        let messages: Vec<&str> = alerts.visible(now).map(|a| a.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn test_alerts_expire_after_lifetime() {
        let start = Instant::now();
        let mut alerts = AlertContainer::new();
        alerts.show_at("saved", AlertKind::Success, start);

        assert_eq!(alerts.visible(start + Duration::from_secs(4)).count(), 1);
        assert_eq!(alerts.visible(start + ALERT_LIFETIME).count(), 0);

        alerts.prune(start + Duration::from_secs(6));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_alert_html() {
        let now = Instant::now();
        let mut alerts = AlertContainer::new();
        alerts.show_at("<b>oops</b>", AlertKind::Error, now);
        assert_eq!(
            alerts.to_html(now),
            r#"<div class="alert-error p-4 mb-4 rounded-md border">&lt;b&gt;oops&lt;/b&gt;</div>"#
        );
    }
}
