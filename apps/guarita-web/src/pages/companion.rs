//! Companion page: attach extra guests to an already submitted invitation.

use leptos::prelude::*;
use leptos::task::spawn_local;

use guarita_api::ApiClient;
use guarita_invite::fields::digits;
use guarita_invite::{Companion, ErrorKind, FlowPath, UploadService};

use crate::components::button::{Button, ButtonVariant};
use crate::components::error_view::ErrorView;
use crate::components::fields::{DocumentInput, NameInput, PhotoCapture};
use crate::components::spinner::LoadingShimmer;
use crate::components::status::status_label;
use crate::components::toast::ToastHost;
use crate::services::api::submit_companion;
use crate::state::session::InviteSession;
use crate::state::toast::Toasts;

#[component]
pub fn CompanionPage(client: ApiClient) -> impl IntoView {
    let params = leptos_router::hooks::use_params_map();
    let session = InviteSession::new();
    let toasts = Toasts::new();

    let name = RwSignal::new(String::new());
    let document = RwSignal::new(String::new());
    let foreigner = RwSignal::new(false);
    let photo = RwSignal::new(String::new());
    let submitting = RwSignal::new(false);
    // Companions added in this page session, on top of the ones the opening
    // payload already carried.
    let added = RwSignal::new(Vec::<Companion>::new());

    {
        let client = client.clone();
        Effect::new(move |_| {
            let token = params.with(|p| p.get("token"));
            session.resolve(client.clone(), token, FlowPath::Companion);
        });
    }

    let submit_client = StoredValue::new(client);
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let Some(token) = session.data_untracked().map(|i| i.token) else {
            return;
        };
        submitting.set(true);
        let client = submit_client.get_value();
        spawn_local(async move {
            let photo_url = match Some(photo.get_untracked()).filter(|p| !p.is_empty()) {
                Some(data_url) => match client.upload_photo(&token, &data_url).await {
                    Ok(url) => Some(url),
                    Err(failure) => {
                        submitting.set(false);
                        toasts.error(failure.to_string());
                        return;
                    }
                },
                None => None,
            };
            let doc = document.get_untracked();
            let doc = if foreigner.get_untracked() {
                doc.trim().to_uppercase()
            } else {
                digits(&doc)
            };
            let result = submit_companion(
                &client,
                &token,
                &name.get_untracked(),
                Some(doc.as_str()).filter(|d| !d.is_empty()),
                photo_url.as_deref(),
            )
            .await;
            submitting.set(false);
            match result {
                Ok(companion) => {
                    added.update(|list| list.push(companion));
                    photo.set(String::new());
                }
                Err(failure) => toasts.error(failure.to_string()),
            }
        });
    };

    let all_companions = move || {
        let mut list = session
            .data()
            .and_then(|i| i.completed)
            .map(|c| c.companions)
            .unwrap_or_default();
        list.extend(added.get());
        list
    };

    let body = move || match session.valid() {
        None => view! { <LoadingShimmer/> }.into_any(),
        Some(false) => {
            let kind = session.error().unwrap_or(ErrorKind::InvalidInvite);
            view! { <ErrorView kind=kind/> }.into_any()
        }
        // Companions can only be attached to an invitation that was already
        // submitted; a fresh invite has nothing to append to.
        Some(true) if session.data().is_some_and(|i| i.completed.is_none()) => {
            view! { <ErrorView kind=ErrorKind::InvalidInvite/> }.into_any()
        }
        Some(true) => view! {
            <div class="space-y-4">
                <h1 class="text-2xl font-semibold">"Acompanhantes"</h1>

                <Show when=move || !all_companions().is_empty()>
                    <ul class="space-y-1">
                        {move || {
                            all_companions()
                                .iter()
                                .map(|c| {
                                    view! {
                                        <li class="flex items-center justify-between text-sm bg-base-100 rounded p-2">
                                            <span>{c.name.clone()}</span>
                                            <span class="badge badge-warning">
                                                {status_label(c.status)}
                                            </span>
                                        </li>
                                    }
                                })
                                .collect_view()
                        }}
                    </ul>
                </Show>

                <form on:submit=on_submit class="card bg-base-100 shadow">
                    <div class="card-body space-y-3">
                        <NameInput value=name required=true/>
                        <DocumentInput value=document foreigner=foreigner required=false/>
                        <PhotoCapture value=photo required=false/>
                        <Button
                            variant=ButtonVariant::Primary
                            button_type="submit"
                            class="w-full"
                            disabled=Signal::derive(move || submitting.get())
                        >
                            {move || if submitting.get() { "Enviando…" } else { "Adicionar acompanhante" }}
                        </Button>
                    </div>
                </form>
            </div>
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
