use leptos::prelude::*;

use crate::state::toast::Toasts;

/// Renders the toast stack. Dismissible, non-blocking; an optional action
/// opens a link in a new tab (the WhatsApp deep links).
#[component]
pub fn ToastHost(toasts: Toasts) -> impl IntoView {
    view! {
        <div class="fixed bottom-4 inset-x-0 flex flex-col items-center gap-2 px-4 z-50 pointer-events-none">
            <For each=move || toasts.items() key=|toast| toast.id let:toast>
                <div class="pointer-events-auto w-full max-w-md bg-base-100 border border-base-300 shadow-lg rounded-lg p-4 flex items-start gap-3">
                    <p class="flex-1 text-sm">{toast.text.clone()}</p>
                    {toast.action.clone().map(|action| view! {
                        <a
                            href=action.href
                            target="_blank"
                            rel="noopener"
                            class="text-sm font-medium text-primary whitespace-nowrap"
                        >
                            {action.label}
                        </a>
                    })}
                    <button
                        class="text-base-content/50 hover:text-base-content"
                        on:click=move |_| toasts.dismiss(toast.id)
                    >
                        "✕"
                    </button>
                </div>
            </For>
        </div>
    }
}
