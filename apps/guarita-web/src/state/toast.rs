//! Non-blocking toast dispatcher.

use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct ToastAction {
    pub label: String,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub text: String,
    pub action: Option<ToastAction>,
}

/// Owned by the page shell and passed to whatever needs to report errors.
/// Submission failures show the backend's message verbatim when available.
#[derive(Clone, Copy)]
pub struct Toasts {
    items: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u32>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn items(&self) -> Vec<Toast> {
        self.items.get()
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(text.into(), None);
    }

    pub fn with_action(&self, text: impl Into<String>, label: impl Into<String>, href: impl Into<String>) {
        self.push(
            text.into(),
            Some(ToastAction {
                label: label.into(),
                href: href.into(),
            }),
        );
    }

    pub fn dismiss(&self, id: u32) {
        self.items.update(|items| items.retain(|t| t.id != id));
    }

    fn push(&self, text: String, action: Option<ToastAction>) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.items.update(|items| items.push(Toast { id, text, action }));
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}
