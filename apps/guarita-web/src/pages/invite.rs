//! The main invitation flow page: resolve the token, then either collect the
//! wizard fields or show the completed-invitation status.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use guarita_api::ApiClient;
use guarita_invite::{ErrorKind, FlowPath};

use crate::components::error_view::ErrorView;
use crate::components::spinner::LoadingShimmer;
use crate::components::status::StatusView;
use crate::components::toast::ToastHost;
use crate::components::wizard::WizardForm;
use crate::state::session::InviteSession;
use crate::state::toast::Toasts;

#[component]
pub fn InviteFlowPage(client: ApiClient, path: FlowPath) -> impl IntoView {
    let params = use_params_map();
    let session = InviteSession::new();
    let toasts = Toasts::new();

    {
        let client = client.clone();
        Effect::new(move |_| {
            let token = params.with(|p| p.get("token"));
            session.resolve(client.clone(), token, path);
        });
    }

    let body = move || match session.valid() {
        None => view! { <LoadingShimmer/> }.into_any(),
        Some(false) => {
            let kind = session.error().unwrap_or(ErrorKind::InvalidInvite);
            view! { <ErrorView kind=kind/> }.into_any()
        }
        Some(true) => {
            let Some(invitation) = session.data() else {
                return view! { <LoadingShimmer/> }.into_any();
            };
            // Once the fields are consumed (submission, recovery, reopened
            // completed invite) the status screen takes over.
            if invitation.fields.is_empty() || invitation.completed.is_some() {
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
            } else {
                view! {
                    <WizardForm
                        client=client.clone()
                        session=session
                        toasts=toasts
                        invitation=invitation
                    />
                }
                .into_any()
            }
        }
    };

    view! {
        <div class="max-w-xl mx-auto px-4 py-8">
            {body}
            <ToastHost toasts=toasts/>
        </div>
    }
}
