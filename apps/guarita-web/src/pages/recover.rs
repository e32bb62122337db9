//! Invitation recovery: the guest re-identifies with the document used on
//! submission and lands back on the status screen.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;

use guarita_api::ApiClient;
use guarita_invite::fields::digits;
use guarita_invite::{RecoveryRequest, ResolvedInvitation};

use crate::components::button::{Button, ButtonVariant};
use crate::components::fields::DocumentInput;
use crate::components::status::StatusView;
use crate::components::toast::ToastHost;
use crate::services::api::fetch_recovered;
use crate::state::session::InviteSession;
use crate::state::toast::Toasts;

#[component]
pub fn RecoverPage(client: ApiClient) -> impl IntoView {
    let params = use_params_map();
    let session = InviteSession::new();
    let toasts = Toasts::new();

    let document = RwSignal::new(String::new());
    let foreigner = RwSignal::new(false);
    let submitting = RwSignal::new(false);

    let lookup_client = StoredValue::new(client.clone());
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let token = params.with_untracked(|p| p.get("token")).unwrap_or_default();
        if token.trim().is_empty() {
            toasts.error("Link de recuperação inválido.");
            return;
        }
        let raw = document.get_untracked();
        let request = RecoveryRequest {
            document: if foreigner.get_untracked() {
                raw.trim().to_uppercase()
            } else {
                digits(&raw)
            },
            foreigner: foreigner.get_untracked(),
        };
        submitting.set(true);
        let client = lookup_client.get_value();
        spawn_local(async move {
            let fetched = fetch_recovered(&client, &token, &request).await;
            submitting.set(false);
            match fetched {
                Some(completed) => {
                    session.succeed(ResolvedInvitation::recovered(token, completed, request));
                }
                None => toasts.error(
                    "Não encontramos um convite para este documento. Confira e tente novamente.",
                ),
            }
        });
    };

    let body = move || match session.data() {
        Some(invitation) => {
            let completed = invitation.completed.clone().unwrap_or_default();
            view! {
                <StatusView
                    client=client.clone()
                    session=session
                    toasts=toasts
                    invitation=invitation
                    completed=completed
                />
            }
            .into_any()
        }
        None => view! {
            <form on:submit=on_submit class="card bg-base-100 shadow mt-8">
                <div class="card-body space-y-3">
                    <h1 class="card-title text-xl">"Recuperar convite"</h1>
                    <p class="text-sm text-base-content/70">
                        "Informe o documento usado no preenchimento do convite."
                    </p>
                    <DocumentInput value=document foreigner=foreigner required=true/>
                    <Button
                        variant=ButtonVariant::Primary
                        button_type="submit"
                        class="w-full"
                        disabled=Signal::derive(move || submitting.get())
                    >
                        {move || if submitting.get() { "Consultando…" } else { "Recuperar" }}
                    </Button>
                </div>
            </form>
        }
        .into_any(),
    };

    view! {
        <div class="max-w-xl mx-auto px-4 py-8">
            {body}
            <ToastHost toasts=toasts/>
        </div>
    }
}
