//! Per-page invitation session store.
//!
//! One instance is created by the page shell and passed explicitly to every
//! consumer (wizard, status view, polling controls) — session state is never
//! looked up from ambient context.

use leptos::prelude::*;
use leptos::task::spawn_local;

use guarita_api::ApiClient;
use guarita_invite::{classify, require_token, ErrorKind, FlowPath, ResolvedInvitation};

/// Shared invitation state. `valid == None` means resolution is still in
/// flight; consumers must render a loading affordance and not touch `data`.
#[derive(Clone, Copy)]
pub struct InviteSession {
    valid: RwSignal<Option<bool>>,
    data: RwSignal<Option<ResolvedInvitation>>,
    error: RwSignal<Option<ErrorKind>>,
    started: StoredValue<bool>,
}

impl InviteSession {
    pub fn new() -> Self {
        Self {
            valid: RwSignal::new(None),
            data: RwSignal::new(None),
            error: RwSignal::new(None),
            started: StoredValue::new(false),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.valid.get().is_none()
    }

    pub fn valid(&self) -> Option<bool> {
        self.valid.get()
    }

    pub fn data(&self) -> Option<ResolvedInvitation> {
        self.data.get()
    }

    pub fn data_untracked(&self) -> Option<ResolvedInvitation> {
        self.data.get_untracked()
    }

    pub fn error(&self) -> Option<ErrorKind> {
        self.error.get()
    }

    pub fn fail(&self, kind: ErrorKind) {
        self.error.set(Some(kind));
        self.valid.set(Some(false));
    }

    pub fn succeed(&self, invitation: ResolvedInvitation) {
        self.data.set(Some(invitation));
        self.valid.set(Some(true));
    }

    /// Replace the whole invitation snapshot. This is copy-on-write, not a
    /// merge: callers must carry forward every field they don't change.
    pub fn update_invite(&self, next: ResolvedInvitation) {
        self.data.set(Some(next));
    }

    /// Resolve the token against the backend at most once per page session.
    /// Repeated render effects are no-ops, and a confirmed failure is
    /// terminal — it is not retried automatically.
    pub fn resolve(&self, client: ApiClient, token: Option<String>, path: FlowPath) {
        if self.started.get_value() || self.valid.get_untracked().is_some() {
            return;
        }
        self.started.set_value(true);

        // Missing token fails before any network call is issued.
        let token = match require_token(token.as_deref()) {
            Ok(token) => token,
            Err(kind) => {
                self.fail(kind);
                return;
            }
        };

        let session = *self;
        spawn_local(async move {
            match client.invite_opening(&token).await {
                None => session.fail(ErrorKind::InvalidInvite),
                Some(payload) => match classify(&token, path, &payload) {
                    Ok(invitation) => session.succeed(invitation),
                    Err(kind) => session.fail(kind),
                },
            }
        });
    }
}

impl Default for InviteSession {
    fn default() -> Self {
        Self::new()
    }
}
