use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};

use guarita_api::ApiClient;
use guarita_invite::FlowPath;

use crate::pages::{
    companion::CompanionPage, invite::InviteFlowPage, not_found::NotFoundPage, pets::PetsPage,
    recover::RecoverPage,
};
use crate::components::error_view::ErrorView;
use guarita_invite::ErrorKind;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Built once at startup and threaded into every page explicitly; no page
    // reads ambient state to find the backend.
    let client = ApiClient::new(crate::services::config::api_config());

    let full = client.clone();
    let photo = client.clone();
    let auto = client.clone();
    let pets = client.clone();
    let companion = client.clone();
    let recover = client.clone();

    view! {
        <Meta name="description" content="Convite digital do condomínio"/>

        <Title text="Convite Digital"/>

        <Router>
            <main class="min-h-screen bg-base-200">
                <Routes fallback=|| view! { <NotFoundPage/> }>
                    // A bare path carries no token; fail before any network call.
                    <Route path=path!("/") view=|| view! {
                        <div class="max-w-xl mx-auto px-4 py-8">
                            <ErrorView kind=ErrorKind::EmptyInvite/>
                        </div>
                    }/>
                    <Route
                        path=path!("/recuperar-convite/:token")
                        view=move || view! { <RecoverPage client=recover.clone()/> }
                    />
                    <Route
                        path=path!("/acompanhante/:token")
                        view=move || view! { <CompanionPage client=companion.clone()/> }
                    />
                    <Route
                        path=path!("/pets/:token")
                        view=move || view! { <PetsPage client=pets.clone()/> }
                    />
                    <Route
                        path=path!("/auto/:token")
                        view=move || view! { <InviteFlowPage client=auto.clone() path=FlowPath::SelfRegister/> }
                    />
                    <Route
                        path=path!("/foto/:token")
                        view=move || view! { <InviteFlowPage client=photo.clone() path=FlowPath::PhotoOnly/> }
                    />
                    <Route
                        path=path!("/:token")
                        view=move || view! { <InviteFlowPage client=full.clone() path=FlowPath::Full/> }
                    />
                </Routes>
            </main>
        </Router>
    }
}
