//! Transient notification toasts.

use std::time::{Duration, Instant};

use ratatui::style::Color;

pub const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Color class name; errors use the "danger" class.
    pub fn class(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "danger",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Severity::Info => Color::Cyan,
            Severity::Success => Color::Green,
            Severity::Warning => Color::Yellow,
            Severity::Error => Color::Red,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    pub created: Instant,
}

impl Toast {
    pub fn expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created) >= ttl
    }
}

#[derive(Debug)]
pub struct Notifications {
    // created on first notify
    container: Option<Vec<Toast>>,
    ttl: Duration,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            container: None,
            ttl,
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.notify_at(message, severity, Instant::now());
    }

    pub fn notify_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        let message = message.into();
        tracing::debug!(class = severity.class(), %message, "notification");
        self.container.get_or_insert_with(Vec::new).push(Toast {
            message,
            severity,
            created: now,
        });
    }

    /// Drop toasts whose display time ran out.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        if let Some(c) = self.container.as_mut() {
            c.retain(|t| !t.expired(now, ttl));
        }
    }

    pub fn dismiss_all(&mut self) {
        if let Some(c) = self.container.as_mut() {
            c.clear();
        }
    }

    pub fn has_container(&self) -> bool {
        self.container.is_some()
    }

    pub fn toasts(&self) -> &[Toast] {
        self.container.as_deref().unwrap_or(&[])
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(TOAST_TTL)
    }
}
