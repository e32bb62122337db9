//! Typed wire shapes for the backend's JSON payloads.
//!
//! Keys mirror the PHP API's UPPERCASE naming via `serde(rename)`. String
//! enums keep an `Unknown` catch-all so a new backend state never breaks
//! deserialization of an otherwise valid payload.

use serde::{Deserialize, Serialize};

/// Which invitation kind the backend says this token belongs to (`KEY_ROTA`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteKey {
    #[serde(rename = "CONVITE_COMUM")]
    CommonInvite,
    #[serde(rename = "CADASTRO_MORADOR")]
    ResidentRegister,
    #[serde(rename = "CADASTRO_PET")]
    RegisterPet,
    #[serde(rename = "ATUALIZA_IMAGEM")]
    UpdateImage,
    #[serde(rename = "AUTO_CADASTRO")]
    SelfRegistration,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Lifecycle state of a submitted invitation (`STATUS`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InviteStatus {
    #[serde(rename = "AGUARDANDO_MORADOR")]
    AwaitingResident,
    #[serde(rename = "PRE_AUTORIZADO")]
    PreAuthorized,
    #[serde(rename = "AUTORIZADO")]
    Authorized,
    #[serde(rename = "NEGADO")]
    Denied,
    #[serde(rename = "ENTROU")]
    Entered,
    #[serde(rename = "SAIU")]
    Exited,
    #[serde(rename = "ATRASADO")]
    Late,
    #[serde(rename = "CANCELADO")]
    Canceled,
    #[serde(rename = "EXPIRADO")]
    Expired,
    #[serde(rename = "ENCERRADO_MANUALMENTE")]
    ManuallyClosed,
    #[serde(rename = "NAO_COMPARECEU")]
    NoShow,
    #[serde(rename = "AGUARDANDO_BIOMETRIA")]
    AwaitingBiometry,
    #[serde(rename = "FINALIZADO")]
    Finished,
    #[default]
    #[serde(other)]
    Unknown,
}

impl InviteStatus {
    /// States where access is already granted or consumed, so status polling
    /// has nothing left to discover.
    pub fn is_authorized(self) -> bool {
        matches!(
            self,
            InviteStatus::Authorized
                | InviteStatus::Entered
                | InviteStatus::Exited
                | InviteStatus::Finished
        )
    }
}

/// How the guest presents themselves at the gate (`TIPO_ACESSO`).
///
/// `Success` is never sent by the server; the classifier synthesizes it for
/// flows that end on a plain success screen (pet registration, photo update).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessKind {
    #[serde(rename = "QRCODE")]
    QrCode,
    #[serde(rename = "FACIAL")]
    Facial,
    #[serde(rename = "DOCUMENTO")]
    Document,
    #[serde(rename = "SUCESSO")]
    Success,
    #[serde(other)]
    Unknown,
}

/// One server-declared form field (`CAMPOS.DADOS[n]`).
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FieldDecl {
    #[serde(rename = "CAMPO")]
    pub name: String,
    #[serde(rename = "EXIBIR", default = "default_true")]
    pub visible: bool,
    #[serde(rename = "OBRIGATORIEDADE", default)]
    pub required: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FieldList {
    #[serde(rename = "DADOS", default)]
    pub entries: Vec<FieldDecl>,
}

/// Condominium-supplied note shown to the guest (`MENSAGEM`).
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CondoMessage {
    #[serde(rename = "EXIBIR", default)]
    pub show: bool,
    #[serde(rename = "TEXTO", default)]
    pub text: String,
}

/// Add-on guest attached to a completed invitation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Companion {
    #[serde(rename = "NOME")]
    pub name: String,
    #[serde(rename = "STATUS", default)]
    pub status: InviteStatus,
}

/// Server confirmation of a successful submission (`CONVITE`).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CompletedInvite {
    #[serde(rename = "STATUS", default)]
    pub status: InviteStatus,
    #[serde(rename = "TIPO_ACESSO", default)]
    pub access: Option<AccessKind>,
    #[serde(rename = "QR_TOKEN", default)]
    pub qr_token: Option<String>,
    #[serde(rename = "QRCODE", default)]
    pub qr_payload: Option<String>,
    #[serde(rename = "ACOMPANHANTES", default)]
    pub companions: Vec<Companion>,
    #[serde(rename = "TELEFONE_VISITANTE", default)]
    pub visitor_phone: Option<String>,
    #[serde(rename = "TELEFONE_MORADOR", default)]
    pub resident_phone: Option<String>,
}

/// Resident display block (`MORADOR`); rendering only.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Resident {
    #[serde(rename = "NOME", default)]
    pub name: Option<String>,
    #[serde(rename = "UNIDADE", default)]
    pub unit: Option<String>,
    #[serde(rename = "TELEFONE", default)]
    pub phone: Option<String>,
}

/// Condominium display block (`CONDOMINIO`). The id feeds the self
/// registration address lookup.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Condominium {
    #[serde(rename = "ID", default)]
    pub id: Option<u64>,
    #[serde(rename = "NOME", default)]
    pub name: Option<String>,
    #[serde(rename = "ENDERECO", default)]
    pub address: Option<String>,
    #[serde(rename = "TELEFONE", default)]
    pub phone: Option<String>,
}

/// Full response of `get_convite_abertura`. One polymorphic shape per
/// invitation kind; the route classifier collapses it into a closed set.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct OpeningPayload {
    #[serde(rename = "RESULT")]
    pub result: bool,
    #[serde(rename = "INFO", default)]
    pub info: Option<String>,
    #[serde(rename = "MSG", default)]
    pub msg: Option<String>,
    #[serde(rename = "KEY_ROTA", default)]
    pub route_key: Option<RouteKey>,
    #[serde(rename = "CAMPOS", default)]
    pub fields: Option<FieldList>,
    #[serde(rename = "RECORRENTE", default)]
    pub recurring: bool,
    #[serde(rename = "STATUS_PET", default)]
    pub pet_registered: bool,
    #[serde(rename = "FACE_HABILITADA", default)]
    pub face_enabled: bool,
    #[serde(rename = "NOME_VISITANTE", default)]
    pub visitor_name: Option<String>,
    #[serde(rename = "MENSAGEM", default)]
    pub message: Option<CondoMessage>,
    #[serde(rename = "STATUS", default)]
    pub status: Option<InviteStatus>,
    #[serde(rename = "CONVITE", default)]
    pub completed: Option<CompletedInvite>,
    #[serde(rename = "MORADOR", default)]
    pub resident: Option<Resident>,
    #[serde(rename = "CONDOMINIO", default)]
    pub condominium: Option<Condominium>,
}

/// `salva_imagem` success payload.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StoredImage {
    #[serde(rename = "URL")]
    pub url: String,
}

/// `set_veiculo` success payload.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct VehicleRecord {
    #[serde(rename = "ID_VEICULO")]
    pub id: u64,
}

/// Entry of `get_tipos_pet` / `get_racas_pet`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PetOption {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "NOME")]
    pub name: String,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_opening_payload_common_invite() {
        let payload: OpeningPayload = serde_json::from_value(json!({
            "RESULT": true,
            "KEY_ROTA": "CONVITE_COMUM",
            "RECORRENTE": false,
            "CAMPOS": { "DADOS": [
                { "CAMPO": "NOME", "EXIBIR": true, "OBRIGATORIEDADE": true },
                { "CAMPO": "FOTO", "EXIBIR": true, "OBRIGATORIEDADE": true }
            ]},
            "MORADOR": { "NOME": "Ana", "UNIDADE": "Bloco B 102" }
        }))
        .unwrap();

        assert!(payload.result);
        assert_eq!(payload.route_key, Some(RouteKey::CommonInvite));
        assert!(!payload.recurring);
        let entries = &payload.fields.as_ref().unwrap().entries;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "NOME");
        assert!(entries[0].required);
        assert_eq!(payload.resident.unwrap().unit.as_deref(), Some("Bloco B 102"));
    }

    #[test]
    fn test_opening_payload_failure_keeps_info() {
        let payload: OpeningPayload =
            serde_json::from_value(json!({ "RESULT": false, "INFO": "Convite Expirado!" }))
                .unwrap();
        assert!(!payload.result);
        assert_eq!(payload.info.as_deref(), Some("Convite Expirado!"));
        assert_eq!(payload.route_key, None);
    }

    #[test]
    fn test_unknown_route_key_and_status_do_not_fail() {
        let payload: OpeningPayload = serde_json::from_value(json!({
            "RESULT": true,
            "KEY_ROTA": "ROTA_NOVA",
            "STATUS": "ESTADO_NOVO"
        }))
        .unwrap();
        assert_eq!(payload.route_key, Some(RouteKey::Unknown));
        assert_eq!(payload.status, Some(InviteStatus::Unknown));
    }

    #[test]
    fn test_completed_invite_round_trip() {
        let completed: CompletedInvite = serde_json::from_value(json!({
            "STATUS": "AUTORIZADO",
            "TIPO_ACESSO": "QRCODE",
            "QR_TOKEN": "tok-1",
            "QRCODE": "payload-1",
            "ACOMPANHANTES": [{ "NOME": "Bia", "STATUS": "AGUARDANDO_MORADOR" }],
            "TELEFONE_VISITANTE": "11987654321"
        }))
        .unwrap();
        assert_eq!(completed.status, InviteStatus::Authorized);
        assert_eq!(completed.access, Some(AccessKind::QrCode));
        assert_eq!(completed.companions[0].status, InviteStatus::AwaitingResident);
        assert!(completed.resident_phone.is_none());
    }

    #[test]
    fn test_upload_payloads_decode_from_full_responses() {
        // The success envelope carries RESULT next to the data; the typed
        // shapes must decode straight from it.
        let stored: StoredImage =
            serde_json::from_value(json!({ "RESULT": true, "URL": "https://cdn.example/1.jpg" }))
                .unwrap();
        assert_eq!(stored.url, "https://cdn.example/1.jpg");

        let record: VehicleRecord =
            serde_json::from_value(json!({ "RESULT": true, "ID_VEICULO": 42 })).unwrap();
        assert_eq!(record.id, 42);

        // A missing key is a decode failure, not a silent default.
        assert!(serde_json::from_value::<VehicleRecord>(json!({ "RESULT": true })).is_err());
    }

    #[test]
    fn test_field_decl_visibility_defaults_to_true() {
        let decl: FieldDecl = serde_json::from_value(json!({ "CAMPO": "TELEFONE" })).unwrap();
        assert!(decl.visible);
        assert!(!decl.required);
    }

    #[test]
    fn test_authorized_states() {
        assert!(InviteStatus::Authorized.is_authorized());
        assert!(InviteStatus::Entered.is_authorized());
        assert!(!InviteStatus::AwaitingResident.is_authorized());
        assert!(!InviteStatus::Unknown.is_authorized());
    }
}
