//! The page elements the dashboard script relies on.

use std::time::Instant;

use crate::ui::{AlertContainer, AlertKind};

/// A loaded page: its path plus the optional elements the client touches.
#[derive(Debug, Clone)]
pub struct Page {
    path: String,
    /// Text of the `#current-user` element
    current_user: Option<String>,
    /// Banners shown in the `main .max-w-7xl` container
    alerts: Option<AlertContainer>,
}

impl Page {
    /// A page with neither a user slot nor an alert container
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            current_user: None,
            alerts: None,
        }
    }

    /// The usual dashboard layout: user slot and alert container present
    pub fn dashboard(path: impl Into<String>) -> Self {
        Self::new(path)
            .with_current_user_slot()
            .with_alert_container()
    }

    pub fn with_current_user_slot(mut self) -> Self {
        self.current_user = Some(String::new());
        self
    }

    pub fn with_alert_container(mut self) -> Self {
        self.alerts = Some(AlertContainer::new());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    /// Write `username` into the user slot. Returns false if the page has none.
    pub fn set_current_user(&mut self, username: &str) -> bool {
        match self.current_user.as_mut() {
            Some(text) => {
                *text = username.to_string();
                true
            }
            None => false,
        }
    }

    pub fn alerts(&self) -> Option<&AlertContainer> {
        self.alerts.as_ref()
    }

    pub fn alerts_mut(&mut self) -> Option<&mut AlertContainer> {
        self.alerts.as_mut()
    }

    /// Show a banner; silently dropped when the page has no alert container.
    pub fn show_alert(&mut self, message: &str, kind: AlertKind) {
        self.show_alert_at(message, kind, Instant::now());
    }

    pub fn show_alert_at(&mut self, message: &str, kind: AlertKind, now: Instant) {
        if let Some(alerts) = self.alerts.as_mut() {
            alerts.show_at(message, kind, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_slot_only_when_present() {
        let mut bare = Page::new("/dashboard");
        assert!(!bare.set_current_user("alice"));
        assert_eq!(bare.current_user(), None);

        let mut page = Page::dashboard("/dashboard");
        assert!(page.set_current_user("alice"));
        assert_eq!(page.current_user(), Some("alice"));
    }

    #[test]
    fn test_alert_without_container_is_dropped() {
        let mut bare = Page::new("/users");
        bare.show_alert("hola", AlertKind::Success);
        assert!(bare.alerts().is_none());

        let mut page = Page::dashboard("/users");
        page.show_alert("hola", AlertKind::Success);
        assert_eq!(page.alerts().map(|a| a.len()), Some(1));
    }
}
