//! The two-step registration wizard.
//!
//! Both steps stay mounted and are toggled with `hidden`, so typed input
//! survives navigation in either direction. Native constraint validation runs
//! before the submit handler fires; the handler only deals with the password
//! gate and the actual submission.

use std::collections::HashMap;

use leptos::prelude::*;
use leptos::task::spawn_local;
use gloo_timers::future::TimeoutFuture;

use guarita_api::ApiClient;
use guarita_invite::fields::FieldValues;
use guarita_invite::{
    FieldName, ResolvedInvitation, StepPlan, SubmissionDraft, WizardState,
};

use crate::components::button::{Button, ButtonVariant};
use crate::components::fields::field_input;
use crate::services::api::submit_invite;
use crate::state::session::InviteSession;
use crate::state::toast::Toasts;

/// Smooth-scroll back to the top shortly after a step switch, once the new
/// step has painted.
fn scroll_to_top_after_transition() {
    spawn_local(async {
        TimeoutFuture::new(300).await;
        if let Some(window) = web_sys::window() {
            window.scroll_to_with_x_and_y(0.0, 0.0);
        }
    });
}

#[component]
pub fn WizardForm(
    client: ApiClient,
    session: InviteSession,
    toasts: Toasts,
    invitation: ResolvedInvitation,
) -> impl IntoView {
    let plan = StoredValue::new(StepPlan::build(&invitation.fields));
    let token = StoredValue::new(invitation.token.clone());
    let recurring = invitation.recurring;
    let greeting = invitation.visitor_name.clone();
    let message = invitation.message.clone();
    let invitation = StoredValue::new(invitation);

    // One signal per planned field, shared by both render passes below.
    let values: StoredValue<HashMap<FieldName, RwSignal<String>>> = StoredValue::new(
        plan.with_value(|p| {
            p.identity
                .iter()
                .chain(p.extra.iter())
                .map(|spec| (spec.name.clone(), RwSignal::new(String::new())))
                .collect()
        }),
    );

    let foreigner = RwSignal::new(false);
    let confirm = RwSignal::new(String::new());
    let step = RwSignal::new(0usize);
    let submitting = RwSignal::new(false);

    let snapshot = move || -> FieldValues {
        values.with_value(|map| {
            map.iter()
                .map(|(name, signal)| (name.clone(), signal.get_untracked()))
                .collect()
        })
    };

    let submit = move || {
        submitting.set(true);
        let draft = SubmissionDraft::new(token.get_value(), foreigner.get_untracked(), snapshot());
        let client = client.clone();
        let invitation = invitation.get_value();
        spawn_local(async move {
            match submit_invite(&client, &draft).await {
                Ok(completed) => {
                    let mut next = invitation;
                    next.completed = Some(completed);
                    next.fields = Vec::new();
                    session.update_invite(next);
                }
                Err(failure) => {
                    submitting.set(false);
                    toasts.error(failure.to_string());
                }
            }
        });
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let mut state = WizardState {
            step: step.get_untracked(),
            direction: Default::default(),
            values: snapshot(),
        };
        let advanced =
            plan.with_value(|p| state.try_advance(p, recurring, &confirm.get_untracked()));
        match advanced {
            Err(gate) => toasts.error(gate.to_string()),
            Ok(true) => {
                step.set(state.step);
                scroll_to_top_after_transition();
            }
            Ok(false) => submit(),
        }
    };

    let on_back = move |_| {
        let mut state = WizardState {
            step: step.get_untracked(),
            ..Default::default()
        };
        if state.back() {
            step.set(state.step);
            scroll_to_top_after_transition();
        }
    };

    let step_fields = move |index: usize| {
        let specs = plan.with_value(|p| p.fields_at(index).to_vec());
        specs
            .into_iter()
            .map(|spec| {
                let value = values
                    .with_value(|map| map.get(&spec.name).copied())
                    .unwrap_or_else(|| RwSignal::new(String::new()));
                field_input(&spec, value, foreigner, confirm)
            })
            .collect_view()
    };

    let two_steps = plan.with_value(|p| !p.single_step());

    view! {
        <div class="space-y-4">
            {greeting.map(|name| view! {
                <h1 class="text-2xl font-semibold">"Olá, " {name} "!"</h1>
            })}
            {message.map(|m| view! {
                <div class="alert bg-base-200 text-sm">{m.text}</div>
            })}

            <Show when=move || two_steps>
                <p class="text-sm text-base-content/60">
                    "Etapa " {move || step.get() + 1} " de 2"
                </p>
            </Show>

            <form on:submit=on_submit class="space-y-4">
                // The inactive step is disabled, not just hidden, so its
                // required inputs stay out of constraint validation.
                <fieldset
                    class=move || if step.get() == 0 { "space-y-4" } else { "hidden" }
                    disabled=move || step.get() != 0
                >
                    {step_fields(0)}
                </fieldset>
                <Show when=move || two_steps>
                    <fieldset
                        class=move || if step.get() == 1 { "space-y-4" } else { "hidden" }
                        disabled=move || step.get() != 1
                    >
                        {step_fields(1)}
                    </fieldset>
                </Show>

                <div class="flex gap-3 pt-2">
                    <Show when=move || { step.get() > 0 }>
                        <Button
                            variant=ButtonVariant::Secondary
                            button_type="button"
                            disabled=Signal::derive(move || submitting.get())
                            on_click=Callback::new(on_back)
                        >
                            "Voltar"
                        </Button>
                    </Show>
                    <Button
                        variant=ButtonVariant::Primary
                        button_type="submit"
                        class="flex-1"
                        disabled=Signal::derive(move || submitting.get())
                    >
                        {move || {
                            if submitting.get() {
                                "Enviando…".to_string()
                            } else {
                                plan.with_value(|p| p.submit_label(step.get())).to_string()
                            }
                        }}
                    </Button>
                </div>
            </form>
        </div>
    }
}
