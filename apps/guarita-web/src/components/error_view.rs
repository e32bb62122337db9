use leptos::prelude::*;

use guarita_invite::ErrorKind;

/// Terminal "access denied" screen. The copy is keyed by the error kind;
/// raw backend text never reaches this view.
#[component]
pub fn ErrorView(kind: ErrorKind) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl mt-12">
            <div class="card-body items-center text-center">
                <svg
                    xmlns="http://www.w3.org/2000/svg"
                    class="h-12 w-12 text-error"
                    fill="none"
                    viewBox="0 0 24 24"
                    stroke="currentColor"
                >
                    <path
                        stroke-linecap="round"
                        stroke-linejoin="round"
                        stroke-width="2"
                        d="M12 9v2m0 4h.01m-6.938 4h13.856c1.54 0 2.502-1.667 1.732-3L13.732 4c-.77-1.333-2.694-1.333-3.464 0L3.34 16c-.77 1.333.192 3 1.732 3z"
                    />
                </svg>
                <h2 class="card-title text-xl">{kind.title()}</h2>
                <p class="text-base-content/70 text-sm">{kind.description()}</p>
            </div>
        </div>
    }
}
