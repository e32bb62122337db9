//! Submission payload assembly.
//!
//! Photo and vehicle values are uploaded first and their results
//! interpolated into the `cadastra_convite` body, so those awaits are
//! sequenced strictly before the body is built. Independent uploads (pet
//! photos) fan out concurrently and fail fast.

use async_trait::async_trait;
use futures::future::try_join_all;
use serde_json::{json, Map, Value};
use thiserror::Error;

use guarita_api::client::{failure_text, result_ok};
use guarita_api::wire::{StoredImage, VehicleRecord};
use guarita_api::ApiClient;

use crate::fields::{digits, title_case, FieldName, FieldValues};

#[derive(Clone, Debug, PartialEq, Error)]
pub enum SubmitError {
    /// The backend answered `RESULT: false`; carries its `INFO`/`MSG` text
    /// verbatim for the toast.
    #[error("{0}")]
    Backend(String),
    #[error("Não foi possível falar com o servidor. Tente novamente.")]
    Transport,
}

/// Upload side-effects the assembly depends on. The web app backs this with
/// [`ApiClient`]; tests use an in-memory mock.
#[async_trait(?Send)]
pub trait UploadService {
    /// `salva_imagem`: store a base64 data URL, returning the hosted URL.
    async fn upload_photo(&self, token: &str, data_url: &str) -> Result<String, SubmitError>;
    /// `set_veiculo`: register a plate, returning the vehicle id.
    async fn register_vehicle(&self, token: &str, plate: &str) -> Result<u64, SubmitError>;
}

#[async_trait(?Send)]
impl UploadService for ApiClient {
    async fn upload_photo(&self, token: &str, data_url: &str) -> Result<String, SubmitError> {
        let value = self
            .save_image(token, data_url)
            .await
            .ok_or(SubmitError::Transport)?;
        if !result_ok(&value) {
            return Err(backend_error(&value, "Não foi possível enviar a imagem."));
        }
        let stored: StoredImage =
            serde_json::from_value(value).map_err(|_| SubmitError::Transport)?;
        Ok(stored.url)
    }

    async fn register_vehicle(&self, token: &str, plate: &str) -> Result<u64, SubmitError> {
        let value = self
            .set_vehicle(token, plate)
            .await
            .ok_or(SubmitError::Transport)?;
        if !result_ok(&value) {
            return Err(backend_error(&value, "Não foi possível registrar o veículo."));
        }
        let record: VehicleRecord =
            serde_json::from_value(value).map_err(|_| SubmitError::Transport)?;
        Ok(record.id)
    }
}

/// Convert a `RESULT: false` response into a [`SubmitError`] carrying the
/// server's text when it has one.
pub fn backend_error(value: &Value, fallback: &str) -> SubmitError {
    SubmitError::Backend(
        failure_text(value)
            .unwrap_or(fallback)
            .to_string(),
    )
}

/// Collected wizard values plus the toggles that alter normalization.
#[derive(Clone, Debug, Default)]
pub struct SubmissionDraft {
    pub token: String,
    pub foreigner: bool,
    pub values: FieldValues,
}

impl SubmissionDraft {
    pub fn new(token: impl Into<String>, foreigner: bool, values: FieldValues) -> Self {
        Self {
            token: token.into(),
            foreigner,
            values,
        }
    }

    fn value_of(&self, name: &FieldName) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn document_value(&self) -> Option<&str> {
        [
            FieldName::Document,
            FieldName::Cpf,
            FieldName::Rg,
            FieldName::Passport,
        ]
        .iter()
        .find_map(|name| self.value_of(name))
    }

    /// Build the `cadastra_convite` body. Empty values are omitted entirely,
    /// never sent as `""` — the backend distinguishes absent from empty.
    pub fn body(&self, photo_url: Option<&str>, vehicle_id: Option<u64>) -> Value {
        let mut map = Map::new();
        map.insert("convite".to_string(), json!(self.token));

        for (name, raw) in &self.values {
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }
            match name {
                // Replaced by the upload results below.
                FieldName::Photo | FieldName::Plate => {}
                FieldName::Name => {
                    map.insert("nome".to_string(), json!(title_case(value)));
                }
                name if name.is_document() => {
                    let document = if self.foreigner {
                        value.to_uppercase()
                    } else {
                        digits(value)
                    };
                    map.insert("documento".to_string(), json!(document));
                    map.insert("estrangeiro".to_string(), json!(self.foreigner));
                }
                FieldName::Phone => {
                    map.insert("telefone".to_string(), json!(digits(value)));
                }
                FieldName::Email => {
                    map.insert("email".to_string(), json!(value.to_lowercase()));
                }
                other => {
                    map.insert(other.body_key().to_string(), json!(value));
                }
            }
        }

        if let Some(url) = photo_url {
            map.insert("url_foto".to_string(), json!(url));
        }
        if let Some(id) = vehicle_id {
            map.insert("id_veiculo".to_string(), json!(id));
        }
        Value::Object(map)
    }
}

/// Run the dependent uploads, then build the final body. The photo URL and
/// vehicle id must exist before the body does; this is a sequential chain,
/// not a fan-out.
pub async fn assemble<U: UploadService + ?Sized>(
    draft: &SubmissionDraft,
    uploads: &U,
) -> Result<Value, SubmitError> {
    let photo_url = match draft.value_of(&FieldName::Photo) {
        Some(data_url) => Some(uploads.upload_photo(&draft.token, data_url).await?),
        None => None,
    };
    let vehicle_id = match draft.value_of(&FieldName::Plate) {
        Some(plate) => Some(uploads.register_vehicle(&draft.token, plate).await?),
        None => None,
    };
    Ok(draft.body(photo_url.as_deref(), vehicle_id))
}

/// One pet being registered.
#[derive(Clone, Debug, PartialEq)]
pub struct PetDraft {
    pub name: String,
    pub type_id: u64,
    pub breed_id: u64,
    pub photo: Option<String>,
}

/// Upload every pet photo concurrently. Independent uploads fan out; the
/// first failure aborts the whole batch.
pub async fn upload_pet_photos<U: UploadService + ?Sized>(
    token: &str,
    pets: &[PetDraft],
    uploads: &U,
) -> Result<Vec<Option<String>>, SubmitError> {
    try_join_all(pets.iter().map(|pet| async move {
        match &pet.photo {
            Some(data_url) => uploads.upload_photo(token, data_url).await.map(Some),
            None => Ok(None),
        }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockUploads {
        calls: RefCell<Vec<String>>,
        fail_photo: bool,
    }

    #[async_trait(?Send)]
    impl UploadService for MockUploads {
        async fn upload_photo(&self, _token: &str, data_url: &str) -> Result<String, SubmitError> {
            self.calls.borrow_mut().push(format!("photo:{data_url}"));
            if self.fail_photo {
                return Err(SubmitError::Backend("Imagem recusada.".to_string()));
            }
            Ok(format!("https://cdn.example/{data_url}.jpg"))
        }

        async fn register_vehicle(&self, _token: &str, plate: &str) -> Result<u64, SubmitError> {
            self.calls.borrow_mut().push(format!("vehicle:{plate}"));
            Ok(99)
        }
    }

    fn draft_with(pairs: &[(FieldName, &str)]) -> SubmissionDraft {
        let values = pairs
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();
        SubmissionDraft::new("tok", false, values)
    }

    #[test]
    fn test_empty_profession_is_omitted_not_sent_blank() {
        let draft = draft_with(&[(FieldName::Name, "ana souza"), (FieldName::Profession, "")]);
        let body = draft.body(None, None);
        assert_eq!(body["nome"], "Ana Souza");
        assert!(body.get("desc_profissao").is_none());
        let serialized = serde_json::to_string(&body).unwrap();
        assert!(!serialized.contains("desc_profissao"));
    }

    #[test]
    fn test_phone_and_document_are_digit_stripped() {
        let draft = draft_with(&[
            (FieldName::Phone, "(11) 98765-4321"),
            (FieldName::Cpf, "123.456.789-01"),
        ]);
        let body = draft.body(None, None);
        assert_eq!(body["telefone"], "11987654321");
        assert_eq!(body["documento"], "12345678901");
        assert_eq!(body["estrangeiro"], false);
    }

    #[test]
    fn test_foreigner_document_keeps_letters_uppercased() {
        let mut draft = draft_with(&[(FieldName::Document, "ab123456")]);
        draft.foreigner = true;
        let body = draft.body(None, None);
        assert_eq!(body["documento"], "AB123456");
        assert_eq!(body["estrangeiro"], true);
    }

    #[test]
    fn test_upload_results_replace_raw_values() {
        let draft = draft_with(&[(FieldName::Photo, "data:image/jpeg;raw")]);
        let body = draft.body(Some("https://cdn.example/1.jpg"), Some(7));
        assert_eq!(body["url_foto"], "https://cdn.example/1.jpg");
        assert_eq!(body["id_veiculo"], 7);
        let serialized = serde_json::to_string(&body).unwrap();
        assert!(!serialized.contains("data:image"));
    }

    #[tokio::test]
    async fn test_assemble_uploads_before_body_build() {
        let uploads = MockUploads::default();
        let draft = draft_with(&[
            (FieldName::Photo, "selfie"),
            (FieldName::Plate, "ABC-1234"),
            (FieldName::Name, "ana"),
        ]);
        let body = assemble(&draft, &uploads).await.unwrap();
        assert_eq!(body["url_foto"], "https://cdn.example/selfie.jpg");
        assert_eq!(body["id_veiculo"], 99);
        // Photo upload settles before the vehicle registration.
        assert_eq!(
            *uploads.calls.borrow(),
            vec!["photo:selfie".to_string(), "vehicle:ABC-1234".to_string()]
        );
    }

    #[tokio::test]
    async fn test_assemble_propagates_upload_failure_untouched() {
        let uploads = MockUploads {
            fail_photo: true,
            ..MockUploads::default()
        };
        let draft = draft_with(&[(FieldName::Photo, "selfie"), (FieldName::Plate, "ABC-1234")]);
        let err = assemble(&draft, &uploads).await.unwrap_err();
        assert_eq!(err, SubmitError::Backend("Imagem recusada.".to_string()));
        // Fail fast: the dependent vehicle call never ran.
        assert_eq!(*uploads.calls.borrow(), vec!["photo:selfie".to_string()]);
    }

    #[tokio::test]
    async fn test_pet_photo_fan_out_fails_fast() {
        let uploads = MockUploads::default();
        let pets = vec![
            PetDraft {
                name: "Rex".into(),
                type_id: 1,
                breed_id: 2,
                photo: Some("rex".into()),
            },
            PetDraft {
                name: "Mia".into(),
                type_id: 2,
                breed_id: 5,
                photo: None,
            },
        ];
        let urls = upload_pet_photos("tok", &pets, &uploads).await.unwrap();
        assert_eq!(urls[0].as_deref(), Some("https://cdn.example/rex.jpg"));
        assert!(urls[1].is_none());

        let failing = MockUploads {
            fail_photo: true,
            ..MockUploads::default()
        };
        assert!(upload_pet_photos("tok", &pets, &failing).await.is_err());
    }

    #[test]
    fn test_backend_error_prefers_server_text() {
        let value = json!({ "RESULT": false, "INFO": "Placa já cadastrada!" });
        assert_eq!(
            backend_error(&value, "fallback"),
            SubmitError::Backend("Placa já cadastrada!".to_string())
        );
        assert_eq!(
            backend_error(&json!({ "RESULT": false }), "fallback"),
            SubmitError::Backend("fallback".to_string())
        );
    }
}
