//! Completed-invitation screen: current status, the gate affordance (QR code,
//! facial, document or a plain success panel), companions, and the manual
//! status refresh with its cooldown.

use leptos::prelude::*;
use leptos::task::spawn_local;
use gloo_timers::future::TimeoutFuture;

use guarita_api::ApiClient;
use guarita_invite::fields::whatsapp_link;
use guarita_invite::polling::{evaluate, should_refresh, Cooldown, RefreshOutcome};
use guarita_invite::{
    AccessKind, CompletedInvite, InviteStatus, ResolvedInvitation, RouteKey,
};

use crate::components::button::{Button, ButtonVariant};
use crate::components::qr::QrCodeView;
use crate::services::api::fetch_recovered;
use crate::state::session::InviteSession;
use crate::state::toast::Toasts;

pub fn status_label(status: InviteStatus) -> &'static str {
    match status {
        InviteStatus::AwaitingResident => "Aguardando aprovação do morador",
        InviteStatus::PreAuthorized => "Pré-autorizado",
        InviteStatus::Authorized => "Autorizado",
        InviteStatus::Denied => "Negado",
        InviteStatus::Entered => "Entrada registrada",
        InviteStatus::Exited => "Saída registrada",
        InviteStatus::Late => "Atrasado",
        InviteStatus::Canceled => "Cancelado",
        InviteStatus::Expired => "Expirado",
        InviteStatus::ManuallyClosed => "Encerrado manualmente",
        InviteStatus::NoShow => "Não compareceu",
        InviteStatus::AwaitingBiometry => "Aguardando biometria",
        InviteStatus::Finished => "Finalizado",
        InviteStatus::Unknown => "Em processamento",
    }
}

fn status_badge_class(status: InviteStatus) -> &'static str {
    if status.is_authorized() {
        "badge badge-success"
    } else {
        match status {
            InviteStatus::Denied
            | InviteStatus::Canceled
            | InviteStatus::Expired
            | InviteStatus::ManuallyClosed
            | InviteStatus::NoShow => "badge badge-error",
            _ => "badge badge-warning",
        }
    }
}

/// The panel shown at the gate. Classifier-synthesized access wins over the
/// access the backend attached to the completed invite.
fn affordance(invitation: &ResolvedInvitation, completed: &CompletedInvite) -> AccessKind {
    invitation
        .access
        .or(completed.access)
        .unwrap_or(match invitation.route {
            // Routes that end on a confirmation rather than a gate credential.
            RouteKey::RegisterPet | RouteKey::UpdateImage | RouteKey::ResidentRegister => {
                AccessKind::Success
            }
            _ => AccessKind::Document,
        })
}

#[component]
fn AccessPanel(invitation: ResolvedInvitation, completed: CompletedInvite) -> impl IntoView {
    match affordance(&invitation, &completed) {
        AccessKind::QrCode => {
            let payload = completed
                .qr_payload
                .or(completed.qr_token)
                .unwrap_or_default();
            view! {
                <div class="space-y-2">
                    <QrCodeView payload=payload/>
                    <p class="text-center text-sm text-base-content/70">
                        "Apresente este QR Code na portaria."
                    </p>
                </div>
            }
            .into_any()
        }
        AccessKind::Facial => view! {
            <p class="text-center text-sm text-base-content/70">
                "Sua foto foi cadastrada. A liberação na portaria é feita por reconhecimento facial."
            </p>
        }
        .into_any(),
        AccessKind::Document => view! {
            <p class="text-center text-sm text-base-content/70">
                "Apresente seu documento na portaria para liberar o acesso."
            </p>
        }
        .into_any(),
        AccessKind::Success | AccessKind::Unknown => view! {
            <div class="text-center space-y-1">
                <p class="text-3xl">"✓"</p>
                <p class="text-sm text-base-content/70">"Tudo certo! Cadastro concluído."</p>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn StatusView(
    client: ApiClient,
    session: InviteSession,
    toasts: Toasts,
    invitation: ResolvedInvitation,
    completed: CompletedInvite,
) -> impl IntoView {
    let cooldown = RwSignal::new(Cooldown::default());
    let in_flight = RwSignal::new(false);

    // Stored so the refresh handler is `Copy` and survives re-renders of the
    // button branch.
    let client = StoredValue::new(client);
    let token = StoredValue::new(invitation.token.clone());
    let recovery = StoredValue::new(invitation.recovery_request.clone());
    let resident_phone = StoredValue::new(
        completed
            .resident_phone
            .clone()
            .or_else(|| invitation.resident.as_ref().and_then(|r| r.phone.clone())),
    );

    let current = StoredValue::new(completed.clone());
    let base_invitation = StoredValue::new(invitation.clone());

    // Drives the cooldown label; one spawn per cooldown start.
    let run_cooldown_timer = move || {
        spawn_local(async move {
            loop {
                TimeoutFuture::new(1_000).await;
                let still_counting = {
                    let mut state = cooldown.get_untracked();
                    let counting = state.tick();
                    cooldown.set(state);
                    counting
                };
                if !still_counting {
                    break;
                }
            }
        });
    };

    let soft_failure = move || {
        let mut state = cooldown.get_untracked();
        state.start();
        cooldown.set(state);
        run_cooldown_timer();
        match resident_phone.get_value() {
            Some(phone) => toasts.with_action(
                "O convite ainda não foi aprovado. Fale com o morador.",
                "Chamar no WhatsApp",
                whatsapp_link(&phone, "Olá! Poderia aprovar meu convite de visita?"),
            ),
            None => toasts.error("O convite ainda não foi aprovado. Tente novamente em instantes."),
        }
    };

    let refresh = move |_| {
        let Some(request) = recovery.get_value() else {
            return;
        };
        let held = current.get_value();
        if !should_refresh(
            &held,
            cooldown.get_untracked().remaining(),
            in_flight.get_untracked(),
        ) {
            return;
        }
        in_flight.set(true);
        let client = client.get_value();
        spawn_local(async move {
            let fetched = fetch_recovered(&client, &token.get_value(), &request).await;
            in_flight.set(false);
            match evaluate(&held, fetched) {
                RefreshOutcome::Updated(next) => {
                    let mut state = cooldown.get_untracked();
                    state.clear();
                    cooldown.set(state);
                    let mut snapshot = base_invitation.get_value();
                    snapshot.completed = Some(next);
                    session.update_invite(snapshot);
                }
                RefreshOutcome::Unchanged | RefreshOutcome::Failed => soft_failure(),
                RefreshOutcome::AlreadyAuthorized => {}
            }
        });
    };

    let can_refresh = recovery.get_value().is_some() && !completed.status.is_authorized();
    let status = completed.status;
    // Success panels (pet registration, photo update) render regardless of
    // the lifecycle status; gate credentials wait for authorization.
    let show_panel = status.is_authorized()
        || matches!(affordance(&invitation, &completed), AccessKind::Success);
    let companions = completed.companions.clone();
    let has_companions = !companions.is_empty();
    let visitor_phone = completed.visitor_phone.clone();
    let resident = invitation.resident.clone();

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body space-y-4">
                <div class="flex items-center justify-between">
                    <h2 class="card-title text-lg">"Seu convite"</h2>
                    <span class=status_badge_class(status)>{status_label(status)}</span>
                </div>

                {resident.map(|r| view! {
                    <p class="text-sm text-base-content/70">
                        {r.name.map(|name| format!("Convidado por {name}"))}
                        {r.unit.map(|unit| format!(" · {unit}"))}
                    </p>
                })}

                <Show when=move || show_panel>
                    <AccessPanel
                        invitation=invitation.clone()
                        completed=completed.clone()
                    />
                </Show>

                <Show when=move || has_companions>
                    <div>
                        <h3 class="text-sm font-medium mb-1">"Acompanhantes"</h3>
                        <ul class="space-y-1">
                            {companions
                                .iter()
                                .map(|c| {
                                    view! {
                                        <li class="flex items-center justify-between text-sm">
                                            <span>{c.name.clone()}</span>
                                            <span class=status_badge_class(c.status)>
                                                {status_label(c.status)}
                                            </span>
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                    </div>
                </Show>

                <Show when=move || can_refresh>
                    <Button
                        variant=ButtonVariant::Secondary
                        class="w-full"
                        disabled=Signal::derive(move || {
                            in_flight.get() || cooldown.get().active()
                        })
                        on_click=Callback::new(refresh)
                    >
                        {move || {
                            let remaining = cooldown.get().remaining();
                            if in_flight.get() {
                                "Consultando…".to_string()
                            } else if remaining > 0 {
                                format!("Aguarde {remaining}s para consultar novamente")
                            } else {
                                "Atualizar situação".to_string()
                            }
                        }}
                    </Button>
                </Show>

                {visitor_phone.map(|phone| view! {
                    <a
                        class="text-center text-sm text-primary"
                        href=whatsapp_link(&phone, "Guarde este contato para acompanhar seus convites.")
                        target="_blank"
                        rel="noopener"
                    >
                        "Salvar contato no WhatsApp"
                    </a>
                })}
            </div>
        </div>
    }
}
