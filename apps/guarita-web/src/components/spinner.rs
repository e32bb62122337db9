use leptos::prelude::*;

#[component]
pub fn Spinner(#[prop(optional)] class: &'static str) -> impl IntoView {
    view! {
        <span class=format!(
            "inline-block w-5 h-5 border-2 rounded-full animate-spin border-base-300 border-t-primary {}",
            class,
        )></span>
    }
}

/// Shimmering placeholder shown while the invitation token resolves.
#[component]
pub fn LoadingShimmer() -> impl IntoView {
    view! {
        <div class="animate-pulse space-y-4 py-12">
            <div class="h-6 bg-base-300 rounded w-2/3 mx-auto"></div>
            <div class="h-4 bg-base-300 rounded w-1/2 mx-auto"></div>
            <div class="h-40 bg-base-300 rounded"></div>
            <p class="text-center text-sm text-base-content/60">"Verificando convite…"</p>
        </div>
    }
}
