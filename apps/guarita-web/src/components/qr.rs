use leptos::prelude::*;
use qrcode::{render::svg, QrCode};

/// Renders the backend's QR payload as an inline SVG.
#[component]
pub fn QrCodeView(#[prop(into)] payload: String) -> impl IntoView {
    let markup = QrCode::new(payload.as_bytes())
        .map(|code| {
            code.render::<svg::Color>()
                .min_dimensions(220, 220)
                .quiet_zone(true)
                .build()
        })
        .unwrap_or_default();

    view! {
        <div class="flex justify-center p-4 bg-white rounded-lg" inner_html=markup></div>
    }
}
