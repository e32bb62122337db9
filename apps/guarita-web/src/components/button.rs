use leptos::ev;
use leptos::prelude::*;

#[derive(Default, Clone, Copy, PartialEq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Ghost,
}

#[component]
pub fn Button(
    #[prop(optional)] variant: ButtonVariant,
    #[prop(optional)] disabled: Signal<bool>,
    #[prop(optional)] class: &'static str,
    #[prop(optional, into)] button_type: Option<&'static str>,
    #[prop(optional)] on_click: Option<Callback<ev::MouseEvent>>,
    children: Children,
) -> impl IntoView {
    let base = "inline-flex items-center justify-center gap-2 font-medium rounded-md px-4 py-2 text-sm transition-colors focus:outline-none focus-visible:ring-2 disabled:opacity-50 disabled:cursor-not-allowed";

    let variant_class = match variant {
        ButtonVariant::Primary => "bg-primary text-white hover:bg-primary-hover",
        ButtonVariant::Secondary => {
            "bg-transparent text-base-content border border-base-300 hover:bg-base-100"
        }
        ButtonVariant::Ghost => "bg-transparent text-base-content/70 hover:bg-base-100",
    };

    view! {
        <button
            type=button_type.unwrap_or("button")
            class=format!("{} {} {}", base, variant_class, class)
            disabled=move || disabled.get()
            on:click=move |e| {
                if let Some(handler) = on_click {
                    handler.run(e);
                }
            }
        >
            {children()}
        </button>
    }
}
