//! Camera permission negotiation and frame capture.
//!
//! Browser-only; the native stubs exist so the workspace builds and tests on
//! the host.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, HtmlVideoElement, MediaStream};

/// Current camera permission: `granted`, `denied` or `prompt`. `None` when
/// the Permissions API is unavailable (the user agent will prompt on
/// `getUserMedia` instead).
#[cfg(target_arch = "wasm32")]
pub async fn camera_permission() -> Option<String> {
    use web_sys::PermissionState;

    let permissions = web_sys::window()?.navigator().permissions().ok()?;
    let descriptor = js_sys::Object::new();
    js_sys::Reflect::set(&descriptor, &"name".into(), &"camera".into()).ok()?;
    let promise = permissions.query(&descriptor).ok()?;
    let status = wasm_bindgen_futures::JsFuture::from(promise).await.ok()?;
    let status: web_sys::PermissionStatus = status.dyn_into().ok()?;
    Some(
        match status.state() {
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            _ => "prompt",
        }
        .to_string(),
    )
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn camera_permission() -> Option<String> {
    None
}

/// Open the camera and attach the stream to the given video element.
#[cfg(target_arch = "wasm32")]
pub async fn start_camera(video: &HtmlVideoElement) -> Result<MediaStream, String> {
    let window = web_sys::window().ok_or("Câmera indisponível.")?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| "Câmera indisponível neste aparelho.")?;

    let constraints = web_sys::MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);
    constraints.set_audio(&JsValue::FALSE);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|_| "Câmera indisponível neste aparelho.")?;
    let stream = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(|_| "Permissão de câmera negada.")?;
    let stream: MediaStream = stream
        .dyn_into()
        .map_err(|_| "Câmera indisponível neste aparelho.")?;

    video.set_src_object(Some(&stream));
    let _ = video.play();
    Ok(stream)
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn start_camera(_video: &HtmlVideoElement) -> Result<MediaStream, String> {
    Err("Câmera disponível apenas no navegador.".to_string())
}

/// Capture the current video frame as a JPEG data URL — the value of the
/// `foto` field.
#[cfg(target_arch = "wasm32")]
pub fn capture_frame(
    video: &HtmlVideoElement,
    canvas: &HtmlCanvasElement,
) -> Result<String, String> {
    canvas.set_width(video.video_width());
    canvas.set_height(video.video_height());
    let context = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .ok_or("Não foi possível capturar a imagem.")?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()
        .map_err(|_| "Não foi possível capturar a imagem.")?;
    context
        .draw_image_with_html_video_element(video, 0.0, 0.0)
        .map_err(|_| "Não foi possível capturar a imagem.")?;
    canvas
        .to_data_url_with_type("image/jpeg")
        .map_err(|_| "Não foi possível capturar a imagem.".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn capture_frame(
    _video: &HtmlVideoElement,
    _canvas: &HtmlCanvasElement,
) -> Result<String, String> {
    Err("Câmera disponível apenas no navegador.".to_string())
}

/// Release the camera.
#[cfg(target_arch = "wasm32")]
pub fn stop_camera(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<web_sys::MediaStreamTrack>() {
            track.stop();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn stop_camera(_stream: &MediaStream) {}
