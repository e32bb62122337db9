//! RPC client for the backend's `{request: ..., ...params}` convention.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::config::ApiConfig;
use crate::wire::{OpeningPayload, PetOption};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("invalid header: {0}")]
    Header(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Value of the backend's routing header. Invitation flows use `convite`;
/// the visitor-area login calls use `visita`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Redirect {
    #[default]
    Convite,
    Visita,
}

impl Redirect {
    pub fn as_str(self) -> &'static str {
        match self {
            Redirect::Convite => "convite",
            Redirect::Visita => "visita",
        }
    }
}

/// Per-call options merged over the client's fixed defaults.
#[derive(Clone, Debug, Default)]
pub struct CallOptions {
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
    pub endpoint: Option<String>,
    pub redirect: Redirect,
}

impl CallOptions {
    /// Start an envelope for the named backend operation.
    pub fn request(name: &str) -> Self {
        Self {
            body: Some(json!({ "request": name })),
            ..Self::default()
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let Some(Value::Object(map)) = self.body.as_mut() {
            map.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn params(mut self, extra: Map<String, Value>) -> Self {
        if let Some(Value::Object(map)) = self.body.as_mut() {
            map.extend(extra);
        }
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    pub fn visita(mut self) -> Self {
        self.redirect = Redirect::Visita;
        self
    }
}

/// Returns true when the response object carries `RESULT: true`.
/// A missing or non-boolean `RESULT` counts as failure.
pub fn result_ok(value: &Value) -> bool {
    value
        .get("RESULT")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Human-readable failure reason: `INFO` first, then `MSG`.
pub fn failure_text(value: &Value) -> Option<&str> {
    value
        .get("INFO")
        .and_then(Value::as_str)
        .or_else(|| value.get("MSG").and_then(Value::as_str))
}

/// Single-call wrapper over the backend. Transport and parse failures resolve
/// to `None` instead of raising; callers treat `None` and `RESULT: false` as
/// the same failure signal.
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub async fn call(&self, method: Method, options: CallOptions) -> Option<Value> {
        match self.try_call(method, options).await {
            Ok(value) => Some(value),
            Err(err) => {
                log_failure(&err);
                None
            }
        }
    }

    async fn try_call(&self, method: Method, options: CallOptions) -> Result<Value, ApiError> {
        let url = options
            .endpoint
            .unwrap_or_else(|| self.config.base_url.clone());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("redirect"),
            HeaderValue::from_static(options.redirect.as_str()),
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&self.config.auth_token)
                .map_err(|e| ApiError::Header(e.to_string()))?,
        );
        // Per-call headers win over the fixed set.
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::Header(e.to_string()))?;
            let value =
                HeaderValue::from_str(value).map_err(|e| ApiError::Header(e.to_string()))?;
            headers.insert(name, value);
        }

        let mut request = match method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        }
        .headers(headers);

        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    // Typed operations ------------------------------------------------------

    /// `get_convite_abertura`: resolve an invitation token into its opening
    /// payload. The payload deserializes for both success and failure
    /// responses (`RESULT: false` plus `INFO`/`MSG`).
    pub async fn invite_opening(&self, token: &str) -> Option<OpeningPayload> {
        let value = self
            .call(
                Method::Post,
                CallOptions::request("get_convite_abertura").param("convite", token),
            )
            .await?;
        decode(value)
    }

    /// `cadastra_convite`: submit the assembled registration body.
    pub async fn register_invite(&self, body: Value) -> Option<Value> {
        let params = match body {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.call(Method::Post, CallOptions::request("cadastra_convite").params(params))
            .await
    }

    /// `get_recuperacao_convite`: recover a completed invitation by the
    /// guest's identity document.
    pub async fn recover_invite(
        &self,
        token: &str,
        document: &str,
        foreigner: bool,
    ) -> Option<Value> {
        self.call(
            Method::Post,
            CallOptions::request("get_recuperacao_convite")
                .param("convite", token)
                .param("documento", document)
                .param("estrangeiro", foreigner),
        )
        .await
    }

    /// `cadastra_acompanhante_convite`: attach a companion to a completed
    /// invitation.
    pub async fn register_companion(
        &self,
        token: &str,
        name: &str,
        document: Option<&str>,
        photo_url: Option<&str>,
    ) -> Option<Value> {
        let mut options = CallOptions::request("cadastra_acompanhante_convite")
            .param("convite", token)
            .param("nome", name);
        if let Some(document) = document {
            options = options.param("documento", document);
        }
        if let Some(url) = photo_url {
            options = options.param("url_foto", url);
        }
        self.call(Method::Post, options).await
    }

    /// `salva_imagem`: store a captured photo (base64 data URL) and get back
    /// its hosted URL.
    pub async fn save_image(&self, token: &str, data_url: &str) -> Option<Value> {
        self.call(
            Method::Post,
            CallOptions::request("salva_imagem")
                .param("convite", token)
                .param("imagem", data_url),
        )
        .await
    }

    /// `set_veiculo`: register a vehicle plate, returning its backend id.
    pub async fn set_vehicle(&self, token: &str, plate: &str) -> Option<Value> {
        self.call(
            Method::Post,
            CallOptions::request("set_veiculo")
                .param("convite", token)
                .param("placa", plate),
        )
        .await
    }

    /// `set_pet`: register one pet.
    pub async fn set_pet(
        &self,
        token: &str,
        name: &str,
        type_id: u64,
        breed_id: u64,
        photo_url: Option<&str>,
    ) -> Option<Value> {
        let mut options = CallOptions::request("set_pet")
            .param("convite", token)
            .param("nome", name)
            .param("id_tipo", type_id)
            .param("id_raca", breed_id);
        if let Some(url) = photo_url {
            options = options.param("url_foto", url);
        }
        self.call(Method::Post, options).await
    }

    /// `get_tipos_pet`: list of pet types.
    pub async fn pet_types(&self) -> Option<Vec<PetOption>> {
        let value = self
            .call(Method::Post, CallOptions::request("get_tipos_pet"))
            .await?;
        if !result_ok(&value) {
            return None;
        }
        decode(value.get("TIPOS")?.clone())
    }

    /// `get_racas_pet`: breeds available for one pet type.
    pub async fn pet_breeds(&self, type_id: u64) -> Option<Vec<PetOption>> {
        let value = self
            .call(
                Method::Post,
                CallOptions::request("get_racas_pet").param("id_tipo", type_id),
            )
            .await?;
        if !result_ok(&value) {
            return None;
        }
        decode(value.get("RACAS")?.clone())
    }

    /// `set_login_visita`: visitor-area login by document. Consumed interface
    /// only; the dashboard itself lives outside this repository.
    pub async fn login_visitor(&self, document: &str, password: &str) -> Option<Value> {
        self.call(Method::Post, visitor_login_options(document, password))
            .await
    }

    /// `set_login_usuario`: visitor-area login by e-mail.
    pub async fn login_user(&self, email: &str, password: &str) -> Option<Value> {
        self.call(Method::Post, user_login_options(email, password))
            .await
    }
}

fn visitor_login_options(document: &str, password: &str) -> CallOptions {
    CallOptions::request("set_login_visita")
        .param("documento", document)
        .param("senha", password)
        .visita()
}

fn user_login_options(email: &str, password: &str) -> CallOptions {
    CallOptions::request("set_login_usuario")
        .param("email", email)
        .param("senha", password)
        .visita()
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            log_failure(&ApiError::Decode(err.to_string()));
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn log_failure(err: &ApiError) {
    web_sys::console::error_1(&wasm_bindgen::JsValue::from_str(&format!(
        "guarita-api: {err}"
    )));
}

#[cfg(not(target_arch = "wasm32"))]
fn log_failure(err: &ApiError) {
    eprintln!("guarita-api: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_carries_request_and_params() {
        let options = CallOptions::request("get_convite_abertura").param("convite", "abc123");
        let body = options.body.unwrap();
        assert_eq!(body["request"], "get_convite_abertura");
        assert_eq!(body["convite"], "abc123");
    }

    #[test]
    fn test_result_ok_treats_missing_result_as_failure() {
        assert!(result_ok(&json!({ "RESULT": true })));
        assert!(!result_ok(&json!({ "RESULT": false })));
        assert!(!result_ok(&json!({})));
        assert!(!result_ok(&json!({ "RESULT": "true" })));
    }

    #[test]
    fn test_failure_text_prefers_info_over_msg() {
        let both = json!({ "INFO": "Convite Expirado!", "MSG": "outro" });
        assert_eq!(failure_text(&both), Some("Convite Expirado!"));
        let msg_only = json!({ "MSG": "falha" });
        assert_eq!(failure_text(&msg_only), Some("falha"));
        assert_eq!(failure_text(&json!({})), None);
    }

    #[test]
    fn test_redirect_header_values() {
        assert_eq!(Redirect::Convite.as_str(), "convite");
        assert_eq!(CallOptions::request("x").visita().redirect, Redirect::Visita);
    }

    #[test]
    fn test_login_envelopes_route_to_visita() {
        let options = visitor_login_options("12345678901", "s3nha!");
        let body = options.body.as_ref().unwrap();
        assert_eq!(body["request"], "set_login_visita");
        assert_eq!(body["documento"], "12345678901");
        assert_eq!(body["senha"], "s3nha!");
        assert_eq!(options.redirect, Redirect::Visita);

        let options = user_login_options("ana@exemplo.com", "s3nha!");
        let body = options.body.as_ref().unwrap();
        assert_eq!(body["request"], "set_login_usuario");
        assert_eq!(body["email"], "ana@exemplo.com");
        assert_eq!(options.redirect, Redirect::Visita);
    }
}
