use leptos::prelude::*;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="max-w-xl mx-auto px-4 py-16 text-center space-y-2">
            <h1 class="text-3xl font-semibold">"Página não encontrada"</h1>
            <p class="text-base-content/70">
                "Confira o link recebido e tente novamente."
            </p>
        </div>
    }
}
