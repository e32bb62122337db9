//! Pet registration page: repeating pet forms with type/breed lookups, a
//! concurrent photo upload fan-out and one `set_pet` call per animal.

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::HtmlSelectElement;

use guarita_api::wire::PetOption;
use guarita_api::ApiClient;
use guarita_invite::payload::{upload_pet_photos, PetDraft};
use guarita_invite::{AccessKind, ErrorKind, FlowPath};

use crate::components::button::{Button, ButtonVariant};
use crate::components::error_view::ErrorView;
use crate::components::fields::PhotoCapture;
use crate::components::spinner::LoadingShimmer;
use crate::components::toast::ToastHost;
use crate::services::api::submit_pet;
use crate::state::session::InviteSession;
use crate::state::toast::Toasts;

#[derive(Clone, Copy)]
struct PetRow {
    id: u32,
    name: RwSignal<String>,
    type_id: RwSignal<String>,
    breed_id: RwSignal<String>,
    photo: RwSignal<String>,
    breeds: RwSignal<Vec<PetOption>>,
}

impl PetRow {
    fn new(id: u32) -> Self {
        Self {
            id,
            name: RwSignal::new(String::new()),
            type_id: RwSignal::new(String::new()),
            breed_id: RwSignal::new(String::new()),
            photo: RwSignal::new(String::new()),
            breeds: RwSignal::new(Vec::new()),
        }
    }

    fn draft(&self) -> Option<PetDraft> {
        let name = self.name.get_untracked().trim().to_string();
        let type_id = self.type_id.get_untracked().parse().ok()?;
        let breed_id = self.breed_id.get_untracked().parse().ok()?;
        if name.is_empty() {
            return None;
        }
        let photo = Some(self.photo.get_untracked()).filter(|p| !p.is_empty());
        Some(PetDraft {
            name,
            type_id,
            breed_id,
            photo,
        })
    }
}

#[component]
fn PetRowForm(client: ApiClient, row: PetRow, types: RwSignal<Vec<PetOption>>) -> impl IntoView {
    let on_type_change = move |ev: leptos::ev::Event| {
        let selected = event_target::<HtmlSelectElement>(&ev).value();
        row.type_id.set(selected.clone());
        row.breed_id.set(String::new());
        row.breeds.set(Vec::new());
        let Ok(type_id) = selected.parse::<u64>() else {
            return;
        };
        let client = client.clone();
        spawn_local(async move {
            if let Some(options) = client.pet_breeds(type_id).await {
                row.breeds.set(options);
            }
        });
    };

    view! {
        <div class="card bg-base-100 shadow space-y-0">
            <div class="card-body space-y-3">
                <div class="form-control">
                    <label class="label"><span class="label-text">"Nome do pet"</span></label>
                    <input
                        type="text"
                        class="input input-bordered w-full"
                        required
                        prop:value=move || row.name.get()
                        on:input=move |ev| row.name.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">"Tipo"</span></label>
                    <select
                        class="select select-bordered w-full"
                        required
                        prop:value=move || row.type_id.get()
                        on:change=on_type_change
                    >
                        <option value="" disabled selected>"Selecione o tipo"</option>
                        <For each=move || types.get() key=|option| option.id let:option>
                            <option value=option.id.to_string()>{option.name.clone()}</option>
                        </For>
                    </select>
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">"Raça"</span></label>
                    <select
                        class="select select-bordered w-full"
                        required
                        disabled=move || row.breeds.get().is_empty()
                        prop:value=move || row.breed_id.get()
                        on:change=move |ev| {
                            row.breed_id.set(event_target::<HtmlSelectElement>(&ev).value())
                        }
                    >
                        <option value="" disabled selected>"Selecione a raça"</option>
                        <For each=move || row.breeds.get() key=|option| option.id let:option>
                            <option value=option.id.to_string()>{option.name.clone()}</option>
                        </For>
                    </select>
                </div>
                <PhotoCapture value=row.photo required=false/>
            </div>
        </div>
    }
}

#[component]
pub fn PetsPage(client: ApiClient) -> impl IntoView {
    let params = leptos_router::hooks::use_params_map();
    let session = InviteSession::new();
    let toasts = Toasts::new();

    let types = RwSignal::new(Vec::<PetOption>::new());
    let rows = RwSignal::new(vec![PetRow::new(0)]);
    let next_row = StoredValue::new(1u32);
    let submitting = RwSignal::new(false);
    let done = RwSignal::new(false);

    {
        let client = client.clone();
        Effect::new(move |_| {
            let token = params.with(|p| p.get("token"));
            session.resolve(client.clone(), token, FlowPath::Pets);
        });
    }

    // Pet types load once, as soon as the token resolves.
    {
        let client = client.clone();
        Effect::new(move |_| {
            if session.valid() == Some(true) && types.get_untracked().is_empty() {
                let client = client.clone();
                spawn_local(async move {
                    if let Some(options) = client.pet_types().await {
                        types.set(options);
                    }
                });
            }
        });
    }

    let add_row = move |_| {
        let id = next_row.get_value();
        next_row.set_value(id + 1);
        rows.update(|list| list.push(PetRow::new(id)));
    };

    let remove_last = move |_| {
        rows.update(|list| {
            if list.len() > 1 {
                list.pop();
            }
        });
    };

    // Stored so the submit handler stays `Copy` and can be re-attached on
    // every render of the form branch.
    let submit_client = StoredValue::new(client.clone());
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let drafts: Vec<PetDraft> = rows
            .get_untracked()
            .iter()
            .filter_map(PetRow::draft)
            .collect();
        if drafts.is_empty() {
            toasts.error("Preencha os dados do pet antes de enviar.");
            return;
        }
        let Some(token) = session.data_untracked().map(|i| i.token) else {
            return;
        };
        submitting.set(true);
        let client = submit_client.get_value();
        spawn_local(async move {
            // Photos fan out concurrently; registrations then run in order so
            // a failure names the pet that broke.
            let urls = match upload_pet_photos(&token, &drafts, &client).await {
                Ok(urls) => urls,
                Err(failure) => {
                    submitting.set(false);
                    toasts.error(failure.to_string());
                    return;
                }
            };
            for (pet, url) in drafts.iter().zip(urls.iter()) {
                if let Err(failure) = submit_pet(
                    &client,
                    &token,
                    &pet.name,
                    pet.type_id,
                    pet.breed_id,
                    url.as_deref(),
                )
                .await
                {
                    submitting.set(false);
                    toasts.error(format!("{}: {failure}", pet.name));
                    return;
                }
            }
            submitting.set(false);
            done.set(true);
        });
    };

    let form_client = client.clone();
    let body = move || match session.valid() {
        None => view! { <LoadingShimmer/> }.into_any(),
        Some(false) => {
            let kind = session.error().unwrap_or(ErrorKind::InvalidInvite);
            view! { <ErrorView kind=kind/> }.into_any()
        }
        Some(true) => {
            let already_registered = session
                .data()
                .and_then(|i| i.access)
                == Some(AccessKind::Success);
            if done.get() || already_registered {
                view! {
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body items-center text-center space-y-1">
                            <p class="text-3xl">"✓"</p>
                            <h2 class="card-title text-lg">"Pets cadastrados"</h2>
                            <p class="text-sm text-base-content/70">
                                "O cadastro dos seus pets foi concluído."
                            </p>
                        </div>
                    </div>
                }
                .into_any()
            } else {
                let client = form_client.clone();
                view! {
                    <form on:submit=on_submit class="space-y-4">
                        <h1 class="text-2xl font-semibold">"Cadastro de pets"</h1>
                        <For each=move || rows.get() key=|row| row.id let:row>
                            <PetRowForm client=client.clone() row=row types=types/>
                        </For>
                        <div class="flex gap-3">
                            <Button variant=ButtonVariant::Ghost on_click=Callback::new(add_row)>
                                "+ Adicionar pet"
                            </Button>
                            <Show when=move || { rows.get().len() > 1 }>
                                <Button
                                    variant=ButtonVariant::Ghost
                                    on_click=Callback::new(remove_last)
                                >
                                    "Remover último"
                                </Button>
                            </Show>
                        </div>
                        <Button
                            variant=ButtonVariant::Primary
                            button_type="submit"
                            class="w-full"
                            disabled=Signal::derive(move || submitting.get())
                        >
                            {move || if submitting.get() { "Enviando…" } else { "Enviar" }}
                        </Button>
                    </form>
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
