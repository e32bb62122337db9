//! One input component per field behavior. Each input declares its HTML
//! `pattern`/`required` constraint and sets a field-specific custom-validity
//! message on change; invalid fields block native form submission.

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::HtmlInputElement;

use guarita_invite::fields::{
    html_pattern, letters_only, mask_cpf, mask_date, mask_phone, mask_plate, title_case,
    validity_message, FieldName, PasswordStrength,
};
use guarita_invite::FieldSpec;

use crate::services::camera;

/// Dispatch a declared field to its input component.
pub fn field_input(
    spec: &FieldSpec,
    value: RwSignal<String>,
    foreigner: RwSignal<bool>,
    confirm: RwSignal<String>,
) -> AnyView {
    let required = spec.required;
    match &spec.name {
        FieldName::Name => view! { <NameInput value=value required=required/> }.into_any(),
        name if name.is_document() => {
            view! { <DocumentInput value=value foreigner=foreigner required=required/> }.into_any()
        }
        FieldName::Photo => view! { <PhotoCapture value=value required=required/> }.into_any(),
        FieldName::Password => {
            view! { <PasswordFields value=value confirm=confirm required=required/> }.into_any()
        }
        FieldName::Phone => view! {
            <MaskedInput
                label="Telefone"
                value=value
                required=required
                mask=mask_phone
                pattern=html_pattern(&FieldName::Phone, false)
                validity=validity_message(&FieldName::Phone, false)
                placeholder="(00) 00000-0000"
                inputmode="tel"
            />
        }
        .into_any(),
        FieldName::Plate => view! {
            <MaskedInput
                label="Placa do veículo"
                value=value
                required=required
                mask=mask_plate
                pattern=html_pattern(&FieldName::Plate, false)
                validity=validity_message(&FieldName::Plate, false)
                placeholder="AAA-0000"
            />
        }
        .into_any(),
        FieldName::BirthDate => view! {
            <MaskedInput
                label="Data de nascimento"
                value=value
                required=required
                mask=mask_date
                pattern=html_pattern(&FieldName::BirthDate, false)
                validity=validity_message(&FieldName::BirthDate, false)
                placeholder="DD/MM/AAAA"
                inputmode="numeric"
            />
        }
        .into_any(),
        FieldName::Email => view! { <EmailInput value=value required=required/> }.into_any(),
        other => {
            let label = title_case(other.label());
            view! { <TextInput label=label value=value required=required/> }.into_any()
        }
    }
}

/// Clear any previous custom validity, re-check the native constraints and
/// attach the field message when they fail.
fn apply_validity(input: &HtmlInputElement, message: &str) {
    input.set_custom_validity("");
    if !input.check_validity() {
        input.set_custom_validity(message);
    }
}

#[component]
pub fn MaskedInput(
    #[prop(into)] label: String,
    value: RwSignal<String>,
    required: bool,
    mask: fn(&str) -> String,
    validity: &'static str,
    #[prop(optional_no_strip)] pattern: Option<&'static str>,
    #[prop(optional)] placeholder: &'static str,
    #[prop(optional)] inputmode: &'static str,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                type="text"
                class="input input-bordered w-full"
                required=required
                pattern=pattern
                placeholder=placeholder
                inputmode=inputmode
                prop:value=move || value.get()
                on:input=move |ev| {
                    let input = event_target::<HtmlInputElement>(&ev);
                    let masked = mask(&input.value());
                    input.set_value(&masked);
                    value.set(masked);
                    apply_validity(&input, validity);
                }
            />
        </div>
    }
}

/// First and last name, letter-only filtered and title-cased; the combined
/// full name is the field value.
#[component]
pub fn NameInput(value: RwSignal<String>, required: bool) -> impl IntoView {
    let (first, set_first) = signal(String::new());
    let (last, set_last) = signal(String::new());

    let recombine = move || {
        let full = format!("{} {}", first.get_untracked(), last.get_untracked());
        value.set(title_case(&full));
    };

    view! {
        <div class="grid grid-cols-2 gap-3">
            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Nome"</span>
                </label>
                <input
                    type="text"
                    class="input input-bordered w-full"
                    required=required
                    placeholder="Nome"
                    prop:value=move || first.get()
                    on:input=move |ev| {
                        let input = event_target::<HtmlInputElement>(&ev);
                        let filtered = letters_only(&input.value());
                        input.set_value(&filtered);
                        set_first.set(filtered);
                        recombine();
                    }
                />
            </div>
            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Sobrenome"</span>
                </label>
                <input
                    type="text"
                    class="input input-bordered w-full"
                    required=required
                    placeholder="Sobrenome"
                    prop:value=move || last.get()
                    on:input=move |ev| {
                        let input = event_target::<HtmlInputElement>(&ev);
                        let filtered = letters_only(&input.value());
                        input.set_value(&filtered);
                        set_last.set(filtered);
                        recombine();
                    }
                />
            </div>
        </div>
    }
}

/// The collapsed document pseudo-field: a citizen/foreigner radio toggle
/// switching between CPF masking and free passport input.
#[component]
pub fn DocumentInput(
    value: RwSignal<String>,
    foreigner: RwSignal<bool>,
    required: bool,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text">"Documento"</span>
            </label>
            <div class="flex gap-4 mb-2 text-sm">
                <label class="flex items-center gap-1">
                    <input
                        type="radio"
                        name="nacionalidade"
                        checked=move || !foreigner.get()
                        on:change=move |_| {
                            foreigner.set(false);
                            value.set(String::new());
                        }
                    />
                    "Brasileiro(a)"
                </label>
                <label class="flex items-center gap-1">
                    <input
                        type="radio"
                        name="nacionalidade"
                        checked=move || foreigner.get()
                        on:change=move |_| {
                            foreigner.set(true);
                            value.set(String::new());
                        }
                    />
                    "Estrangeiro(a)"
                </label>
            </div>
            <input
                type="text"
                class="input input-bordered w-full"
                required=required
                pattern=move || html_pattern(&FieldName::Document, foreigner.get())
                placeholder=move || if foreigner.get() { "Passaporte" } else { "000.000.000-00" }
                prop:value=move || value.get()
                on:input=move |ev| {
                    let input = event_target::<HtmlInputElement>(&ev);
                    let is_foreigner = foreigner.get_untracked();
                    let next = if is_foreigner {
                        input.value().to_uppercase()
                    } else {
                        mask_cpf(&input.value())
                    };
                    input.set_value(&next);
                    value.set(next);
                    apply_validity(&input, validity_message(&FieldName::Document, is_foreigner));
                }
            />
        </div>
    }
}

#[component]
pub fn EmailInput(value: RwSignal<String>, required: bool) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text">"E-mail"</span>
            </label>
            <input
                type="email"
                class="input input-bordered w-full"
                required=required
                placeholder="voce@exemplo.com"
                prop:value=move || value.get()
                on:input=move |ev| {
                    let input = event_target::<HtmlInputElement>(&ev);
                    value.set(input.value());
                    apply_validity(&input, validity_message(&FieldName::Email, false));
                }
            />
        </div>
    }
}

#[component]
pub fn TextInput(
    #[prop(into)] label: String,
    value: RwSignal<String>,
    required: bool,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                type="text"
                class="input input-bordered w-full"
                required=required
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}

/// Password with confirmation and the live five-rule strength checklist.
#[component]
pub fn PasswordFields(
    value: RwSignal<String>,
    confirm: RwSignal<String>,
    required: bool,
) -> impl IntoView {
    let strength = move || PasswordStrength::check(&value.get());

    let rule = move |ok: bool, text: &'static str| {
        view! {
            <li class=move || {
                if ok { "text-success" } else { "text-base-content/50" }
            }>
                {if ok { "✓ " } else { "• " }}
                {text}
            </li>
        }
    };

    view! {
        <div class="space-y-3">
            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Senha"</span>
                </label>
                <input
                    type="password"
                    class="input input-bordered w-full"
                    required=required
                    minlength="6"
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
            </div>
            <ul class="text-xs space-y-1">
                {move || {
                    let s = strength();
                    vec![
                        rule(s.min_len, "Pelo menos 6 caracteres"),
                        rule(s.upper, "Uma letra maiúscula"),
                        rule(s.lower, "Uma letra minúscula"),
                        rule(s.digit, "Um número"),
                        rule(s.special, "Um caractere especial"),
                    ]
                }}
            </ul>
            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Confirmar senha"</span>
                </label>
                <input
                    type="password"
                    class="input input-bordered w-full"
                    required=required
                    prop:value=move || confirm.get()
                    on:input=move |ev| confirm.set(event_target_value(&ev))
                />
            </div>
        </div>
    }
}

/// Camera capture feeding the `foto` field with a JPEG data URL.
#[component]
pub fn PhotoCapture(value: RwSignal<String>, required: bool) -> impl IntoView {
    let video_ref = NodeRef::<leptos::html::Video>::new();
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let stream = StoredValue::new(None::<web_sys::MediaStream>);
    let (camera_open, set_camera_open) = signal(false);
    let (camera_error, set_camera_error) = signal(None::<String>);

    let close_camera = move || {
        if let Some(active) = stream.get_value() {
            camera::stop_camera(&active);
        }
        stream.set_value(None);
        set_camera_open.set(false);
    };

    let open_camera = move |_| {
        set_camera_error.set(None);
        spawn_local(async move {
            // Permission state is only advisory; a denied query still shows
            // the browser prompt path through getUserMedia.
            let _ = camera::camera_permission().await;
            let Some(video) = video_ref.get_untracked() else {
                return;
            };
            match camera::start_camera(&video).await {
                Ok(active) => {
                    stream.set_value(Some(active));
                    set_camera_open.set(true);
                }
                Err(message) => set_camera_error.set(Some(message)),
            }
        });
    };

    let capture = move |_| {
        let (Some(video), Some(canvas)) = (video_ref.get_untracked(), canvas_ref.get_untracked())
        else {
            return;
        };
        match camera::capture_frame(&video, &canvas) {
            Ok(data_url) => {
                value.set(data_url);
                close_camera();
            }
            Err(message) => set_camera_error.set(Some(message)),
        }
    };

    let retake = move |_| value.set(String::new());

    view! {
        <div class="form-control space-y-2">
            <label class="label">
                <span class="label-text">"Foto"</span>
            </label>

            // Participates in native form validation without being visible.
            <input type="text" class="sr-only" tabindex="-1" required=required prop:value=move || value.get()/>

            <Show when=move || camera_error.get().is_some()>
                <p class="text-sm text-error">{move || camera_error.get().unwrap_or_default()}</p>
            </Show>

            <video
                node_ref=video_ref
                autoplay
                playsinline
                class=move || {
                    if camera_open.get() { "rounded-lg w-full" } else { "hidden" }
                }
            ></video>
            <canvas node_ref=canvas_ref class="hidden"></canvas>

            <Show when=move || !value.get().is_empty()>
                <img src=move || value.get() alt="Foto capturada" class="rounded-lg w-full"/>
            </Show>

            {move || {
                if camera_open.get() {
                    view! {
                        <button type="button" class="btn btn-primary w-full" on:click=capture>
                            "Capturar"
                        </button>
                    }
                    .into_any()
                } else if value.get().is_empty() {
                    view! {
                        <button type="button" class="btn btn-outline w-full" on:click=open_camera>
                            "Abrir câmera"
                        </button>
                    }
                    .into_any()
                } else {
                    view! {
                        <button type="button" class="btn btn-ghost w-full" on:click=retake>
                            "Tirar outra foto"
                        </button>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
