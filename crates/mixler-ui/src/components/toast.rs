//! Transient notifications. At most one toast exists at a time.

use std::time::Duration;

use mixler_core::UiConfig;

use crate::dom::{Element, NodeId, SharedDocument};

const TOAST_CLASS: &str = "toast";
const VISIBLE_CLASS: &str = "visible";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
    Warning,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl std::fmt::Display for ToastKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long a toast stays up, then how long its exit transition takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTiming {
    pub visible: Duration,
    pub exit: Duration,
}

impl Default for ToastTiming {
    fn default() -> Self {
        Self {
            visible: Duration::from_millis(3000),
            exit: Duration::from_millis(300),
        }
    }
}

impl From<&UiConfig> for ToastTiming {
    fn from(config: &UiConfig) -> Self {
        Self {
            visible: Duration::from_millis(config.toast_visible_ms),
            exit: Duration::from_millis(config.toast_exit_ms),
        }
    }
}

/// Show `message` with the default timing.
pub fn show_toast(document: &SharedDocument, message: &str, kind: ToastKind) -> NodeId {
    show_toast_with(document, message, kind, ToastTiming::default())
}

/// Show `message`, replacing any toast already on the page.
///
/// Must be called inside a tokio runtime; dismissal runs on a spawned task.
pub fn show_toast_with(
    document: &SharedDocument,
    message: &str,
    kind: ToastKind,
    timing: ToastTiming,
) -> NodeId {
    let node = {
        let mut doc = document.lock();
        for existing in doc.query_class(TOAST_CLASS) {
            doc.remove(existing);
        }

        let toast = Element::new("div")
            .with_class(TOAST_CLASS)
            .with_class(&format!("toast-{}", kind))
            .with_text(message);
        let node = doc.append(toast, None);
        doc.add_class(node, VISIBLE_CLASS);
        node
    };
    tracing::debug!("Toast ({}): {}", kind, message);

    let document = document.clone();
    tokio::spawn(async move {
        tokio::time::sleep(timing.visible).await;
        document.lock().remove_class(node, VISIBLE_CLASS);
        tokio::time::sleep(timing.exit).await;
        document.lock().remove(node);
    });

    node
}
