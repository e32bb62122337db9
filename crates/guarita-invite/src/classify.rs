//! Invitation route classifier.
//!
//! `get_convite_abertura` answers with one polymorphic payload per invitation
//! kind. This module collapses it into the closed [`ResolvedInvitation`]
//! shape through an explicit ordered rule list — downstream code never
//! inspects raw payload JSON again.

use guarita_api::wire::{
    CompletedInvite, CondoMessage, Condominium, InviteStatus, OpeningPayload, Resident, RouteKey,
};

use crate::error::{kind_for_info, ErrorKind};
use crate::fields::{from_declarations, FieldName, FieldSpec};
use guarita_api::wire::AccessKind;

/// Which URL flavor opened the invitation. Sub-flows share the same backend
/// call but classify differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowPath {
    Full,
    PhotoOnly,
    Pets,
    Companion,
    SelfRegister,
    Recover,
}

/// Identity parameters used to recover a completed invitation. Remembered so
/// status refresh can replay the same request.
#[derive(Clone, Debug, PartialEq)]
pub struct RecoveryRequest {
    pub document: String,
    pub foreigner: bool,
}

/// The normalized invitation every view consumes. Exactly one route applies;
/// the field list and step set are fully determined by `route` + `fields` +
/// `recurring`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedInvitation {
    pub token: String,
    pub route: RouteKey,
    pub fields: Vec<FieldSpec>,
    pub recurring: bool,
    /// Synthesized access affordance; `Some(Success)` means "show a success
    /// screen, not a scanner". `None` defers to the completed invite.
    pub access: Option<AccessKind>,
    pub face_enabled: bool,
    pub visitor_name: Option<String>,
    pub message: Option<CondoMessage>,
    pub completed: Option<CompletedInvite>,
    pub recovery_request: Option<RecoveryRequest>,
    pub resident: Option<Resident>,
    pub condominium: Option<Condominium>,
}

impl ResolvedInvitation {
    /// Invitation reconstructed from `get_recuperacao_convite`, carrying the
    /// request body for status-refresh replays.
    pub fn recovered(
        token: impl Into<String>,
        completed: CompletedInvite,
        recovery: RecoveryRequest,
    ) -> Self {
        Self {
            token: token.into(),
            route: RouteKey::CommonInvite,
            fields: Vec::new(),
            recurring: false,
            access: None,
            face_enabled: false,
            visitor_name: None,
            message: None,
            completed: Some(completed),
            recovery_request: Some(recovery),
            resident: None,
            condominium: None,
        }
    }
}

/// The invitation token must exist before any network call goes out; a bare
/// path is a terminal `empty-invite`.
pub fn require_token(raw: Option<&str>) -> Result<String, ErrorKind> {
    match raw.map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => Ok(token.to_string()),
        None => Err(ErrorKind::EmptyInvite),
    }
}

struct Input<'a> {
    payload: &'a OpeningPayload,
    path: FlowPath,
    token: &'a str,
}

type Predicate = fn(&Input) -> bool;
type Build = fn(&Input) -> Result<ResolvedInvitation, ErrorKind>;

/// Dispatch table, evaluated top-to-bottom, first match wins.
///
/// The order is load-bearing: the photo/pet re-open checks are strict subsets
/// of the generic resident-register predicate and must run before it, and the
/// pet-already-registered check must precede the plain pet branch. Do not
/// reorder without re-checking the overlaps.
const RULES: &[(Predicate, Build)] = &[
    (failed_opening, build_failure),
    (resident_photo_reopen, build_updated_image),
    (resident_pet_path, build_invalid),
    (pet_already_registered, build_pet_success),
    (pet_registration, build_pet_registration),
    (resident_register, build_resident_register),
    (common_invite, build_common_invite),
    (photo_update, build_photo_update),
    (self_registration, build_self_registration),
    (anything, build_failure),
];

/// Collapse the opening payload into one canonical invitation or a terminal
/// error kind.
pub fn classify(
    token: &str,
    path: FlowPath,
    payload: &OpeningPayload,
) -> Result<ResolvedInvitation, ErrorKind> {
    let input = Input {
        payload,
        path,
        token,
    };
    for (applies, build) in RULES {
        if applies(&input) {
            return build(&input);
        }
    }
    // The last rule matches everything.
    unreachable!("classifier dispatch table has a catch-all rule")
}

// Predicates ----------------------------------------------------------------

fn failed_opening(input: &Input) -> bool {
    !input.payload.result
}

fn resident_photo_reopen(input: &Input) -> bool {
    input.payload.route_key == Some(RouteKey::ResidentRegister) && input.path == FlowPath::PhotoOnly
}

fn resident_pet_path(input: &Input) -> bool {
    input.payload.route_key == Some(RouteKey::ResidentRegister) && input.path == FlowPath::Pets
}

fn pet_already_registered(input: &Input) -> bool {
    input.payload.pet_registered && input.payload.route_key == Some(RouteKey::RegisterPet)
}

fn pet_registration(input: &Input) -> bool {
    input.payload.route_key == Some(RouteKey::RegisterPet)
}

fn resident_register(input: &Input) -> bool {
    input.payload.route_key == Some(RouteKey::ResidentRegister)
}

fn common_invite(input: &Input) -> bool {
    // `result` is already true here; the failure rule runs first.
    input.payload.route_key == Some(RouteKey::CommonInvite)
}

fn photo_update(input: &Input) -> bool {
    input.payload.route_key == Some(RouteKey::UpdateImage)
        && input.payload.status == Some(InviteStatus::Authorized)
}

fn self_registration(input: &Input) -> bool {
    input.payload.route_key == Some(RouteKey::SelfRegistration)
}

fn anything(_: &Input) -> bool {
    true
}

// Builders ------------------------------------------------------------------

fn base(input: &Input, route: RouteKey, fields: Vec<FieldSpec>, recurring: bool) -> ResolvedInvitation {
    let payload = input.payload;
    ResolvedInvitation {
        token: input.token.to_string(),
        route,
        fields,
        recurring,
        access: None,
        face_enabled: payload.face_enabled,
        visitor_name: payload.visitor_name.clone(),
        message: payload.message.clone().filter(|m| m.show),
        completed: payload.completed.clone(),
        recovery_request: None,
        resident: payload.resident.clone(),
        condominium: payload.condominium.clone(),
    }
}

/// Field set shared by resident registration and self registration, in the
/// backend's display order.
fn registration_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::required(FieldName::Password),
        FieldSpec::required(FieldName::Photo),
        FieldSpec::required(FieldName::Cpf),
        FieldSpec::required(FieldName::Email),
        FieldSpec::required(FieldName::Phone),
    ]
}

fn build_failure(input: &Input) -> Result<ResolvedInvitation, ErrorKind> {
    let payload = input.payload;
    Err(kind_for_info(
        payload.info.as_deref().or(payload.msg.as_deref()),
    ))
}

fn build_updated_image(_: &Input) -> Result<ResolvedInvitation, ErrorKind> {
    Err(ErrorKind::UpdatedImage)
}

fn build_invalid(_: &Input) -> Result<ResolvedInvitation, ErrorKind> {
    Err(ErrorKind::InvalidInvite)
}

fn build_pet_success(input: &Input) -> Result<ResolvedInvitation, ErrorKind> {
    let mut invitation = base(
        input,
        RouteKey::RegisterPet,
        vec![FieldSpec::required(FieldName::Photo)],
        false,
    );
    invitation.access = Some(AccessKind::Success);
    Ok(invitation)
}

fn build_pet_registration(input: &Input) -> Result<ResolvedInvitation, ErrorKind> {
    // The pets page renders its own repeating pet forms; there is no
    // server-declared field list for this kind.
    Ok(base(input, RouteKey::RegisterPet, Vec::new(), false))
}

fn build_resident_register(input: &Input) -> Result<ResolvedInvitation, ErrorKind> {
    Ok(base(
        input,
        RouteKey::ResidentRegister,
        registration_fields(),
        input.payload.recurring,
    ))
}

fn build_common_invite(input: &Input) -> Result<ResolvedInvitation, ErrorKind> {
    let payload = input.payload;
    let declared = payload
        .fields
        .as_ref()
        .map(|list| from_declarations(&list.entries))
        .unwrap_or_default();

    // OBSERVACOES declares nothing to collect; it only decides whether the
    // condominium message is shown.
    let show_message = declared
        .iter()
        .any(|f| f.name == FieldName::Observations && f.visible);
    let mut fields: Vec<FieldSpec> = declared
        .into_iter()
        .filter(|f| f.name != FieldName::Observations)
        .collect();

    if payload.recurring && !fields.iter().any(|f| f.name == FieldName::Password) {
        fields.push(FieldSpec::required(FieldName::Password));
    }

    let mut invitation = base(input, RouteKey::CommonInvite, fields, payload.recurring);
    invitation.message = payload
        .message
        .clone()
        .filter(|m| m.show && show_message);
    Ok(invitation)
}

fn build_photo_update(input: &Input) -> Result<ResolvedInvitation, ErrorKind> {
    Ok(base(
        input,
        RouteKey::UpdateImage,
        vec![FieldSpec::required(FieldName::Photo)],
        false,
    ))
}

fn build_self_registration(input: &Input) -> Result<ResolvedInvitation, ErrorKind> {
    Ok(base(
        input,
        RouteKey::SelfRegistration,
        registration_fields(),
        input.payload.recurring,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opening(value: serde_json::Value) -> OpeningPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_token_fails_before_any_network_call() {
        assert_eq!(require_token(None), Err(ErrorKind::EmptyInvite));
        assert_eq!(require_token(Some("  ")), Err(ErrorKind::EmptyInvite));
        assert_eq!(require_token(Some("tok")), Ok("tok".to_string()));
    }

    #[test]
    fn test_expired_info_maps_to_expired_invite() {
        let payload = opening(json!({ "RESULT": false, "INFO": "Convite Expirado!" }));
        let err = classify("tok", FlowPath::Full, &payload).unwrap_err();
        assert_eq!(err, ErrorKind::ExpiredInvite);
        assert_eq!(err.as_str(), "expired-invite");
    }

    #[test]
    fn test_failure_falls_back_to_msg_then_invalid() {
        let payload = opening(json!({ "RESULT": false, "MSG": "Convite Cancelado!" }));
        assert_eq!(
            classify("tok", FlowPath::Full, &payload),
            Err(ErrorKind::CanceledInvite)
        );
        let payload = opening(json!({ "RESULT": false }));
        assert_eq!(
            classify("tok", FlowPath::Full, &payload),
            Err(ErrorKind::InvalidInvite)
        );
    }

    #[test]
    fn test_resident_register_photo_path_wins_over_generic_branch() {
        // Satisfies both the photo-reopen rule and the generic
        // resident-register rule; order decides.
        let payload = opening(json!({ "RESULT": true, "KEY_ROTA": "CADASTRO_MORADOR" }));
        assert_eq!(
            classify("tok", FlowPath::PhotoOnly, &payload),
            Err(ErrorKind::UpdatedImage)
        );
        assert!(classify("tok", FlowPath::Full, &payload).is_ok());
    }

    #[test]
    fn test_resident_register_pet_path_is_invalid() {
        let payload = opening(json!({ "RESULT": true, "KEY_ROTA": "CADASTRO_MORADOR" }));
        assert_eq!(
            classify("tok", FlowPath::Pets, &payload),
            Err(ErrorKind::InvalidInvite)
        );
    }

    #[test]
    fn test_pet_already_registered_synthesizes_success() {
        let payload = opening(json!({
            "RESULT": true,
            "KEY_ROTA": "CADASTRO_PET",
            "STATUS_PET": true
        }));
        let invitation = classify("tok", FlowPath::Pets, &payload).unwrap();
        assert_eq!(invitation.route, RouteKey::RegisterPet);
        assert_eq!(invitation.fields, vec![FieldSpec::required(FieldName::Photo)]);
        assert!(!invitation.recurring);
        assert_eq!(invitation.access, Some(AccessKind::Success));
    }

    #[test]
    fn test_fresh_pet_invitation_has_no_declared_fields() {
        let payload = opening(json!({ "RESULT": true, "KEY_ROTA": "CADASTRO_PET" }));
        let invitation = classify("tok", FlowPath::Pets, &payload).unwrap();
        assert!(invitation.fields.is_empty());
        assert_eq!(invitation.access, None);
    }

    #[test]
    fn test_resident_register_fixed_field_set() {
        let payload = opening(json!({
            "RESULT": true,
            "KEY_ROTA": "CADASTRO_MORADOR",
            "FACE_HABILITADA": true,
            "NOME_VISITANTE": "Carlos"
        }));
        let invitation = classify("tok", FlowPath::Full, &payload).unwrap();
        let names: Vec<&FieldName> = invitation.fields.iter().map(|f| &f.name).collect();
        assert_eq!(
            names,
            vec![
                &FieldName::Password,
                &FieldName::Photo,
                &FieldName::Cpf,
                &FieldName::Email,
                &FieldName::Phone
            ]
        );
        assert!(invitation.face_enabled);
        assert_eq!(invitation.visitor_name.as_deref(), Some("Carlos"));
    }

    #[test]
    fn test_common_invite_uses_server_declared_fields() {
        let payload = opening(json!({
            "RESULT": true,
            "KEY_ROTA": "CONVITE_COMUM",
            "RECORRENTE": false,
            "CAMPOS": { "DADOS": [
                { "CAMPO": "NOME", "EXIBIR": true, "OBRIGATORIEDADE": true },
                { "CAMPO": "FOTO", "EXIBIR": true, "OBRIGATORIEDADE": true }
            ]}
        }));
        let invitation = classify("tok", FlowPath::Full, &payload).unwrap();
        let names: Vec<&FieldName> = invitation.fields.iter().map(|f| &f.name).collect();
        assert_eq!(names, vec![&FieldName::Name, &FieldName::Photo]);
        assert!(!invitation.recurring);
        // No synthetic password for one-time invitations.
        assert!(!invitation.fields.iter().any(|f| f.name == FieldName::Password));
    }

    #[test]
    fn test_common_invite_recurring_appends_password() {
        let payload = opening(json!({
            "RESULT": true,
            "KEY_ROTA": "CONVITE_COMUM",
            "RECORRENTE": true,
            "CAMPOS": { "DADOS": [
                { "CAMPO": "NOME", "EXIBIR": true, "OBRIGATORIEDADE": true }
            ]}
        }));
        let invitation = classify("tok", FlowPath::Full, &payload).unwrap();
        assert!(invitation.recurring);
        assert_eq!(
            invitation.fields.last(),
            Some(&FieldSpec::required(FieldName::Password))
        );
    }

    #[test]
    fn test_common_invite_observations_toggles_message_only() {
        let payload = opening(json!({
            "RESULT": true,
            "KEY_ROTA": "CONVITE_COMUM",
            "MENSAGEM": { "EXIBIR": true, "TEXTO": "Use o portão lateral." },
            "CAMPOS": { "DADOS": [
                { "CAMPO": "NOME", "EXIBIR": true, "OBRIGATORIEDADE": true },
                { "CAMPO": "OBSERVACOES", "EXIBIR": true, "OBRIGATORIEDADE": false }
            ]}
        }));
        let invitation = classify("tok", FlowPath::Full, &payload).unwrap();
        assert!(!invitation
            .fields
            .iter()
            .any(|f| f.name == FieldName::Observations));
        assert_eq!(
            invitation.message.as_ref().map(|m| m.text.as_str()),
            Some("Use o portão lateral.")
        );

        // Without the pseudo-field the message stays hidden.
        let payload = opening(json!({
            "RESULT": true,
            "KEY_ROTA": "CONVITE_COMUM",
            "MENSAGEM": { "EXIBIR": true, "TEXTO": "Use o portão lateral." },
            "CAMPOS": { "DADOS": [
                { "CAMPO": "NOME", "EXIBIR": true, "OBRIGATORIEDADE": true }
            ]}
        }));
        let invitation = classify("tok", FlowPath::Full, &payload).unwrap();
        assert!(invitation.message.is_none());
    }

    #[test]
    fn test_photo_update_requires_authorized_status() {
        let payload = opening(json!({
            "RESULT": true,
            "KEY_ROTA": "ATUALIZA_IMAGEM",
            "STATUS": "AUTORIZADO"
        }));
        let invitation = classify("tok", FlowPath::PhotoOnly, &payload).unwrap();
        assert_eq!(invitation.fields, vec![FieldSpec::required(FieldName::Photo)]);

        let payload = opening(json!({
            "RESULT": true,
            "KEY_ROTA": "ATUALIZA_IMAGEM",
            "STATUS": "AGUARDANDO_MORADOR"
        }));
        assert_eq!(
            classify("tok", FlowPath::PhotoOnly, &payload),
            Err(ErrorKind::InvalidInvite)
        );
    }

    #[test]
    fn test_self_registration_carries_condominium() {
        let payload = opening(json!({
            "RESULT": true,
            "KEY_ROTA": "AUTO_CADASTRO",
            "CONDOMINIO": { "ID": 42, "NOME": "Residencial Ipê" }
        }));
        let invitation = classify("tok", FlowPath::SelfRegister, &payload).unwrap();
        assert_eq!(invitation.route, RouteKey::SelfRegistration);
        assert_eq!(invitation.fields.len(), 5);
        let condo = invitation.condominium.unwrap();
        assert_eq!(condo.id, Some(42));
        assert_eq!(condo.name.as_deref(), Some("Residencial Ipê"));
    }

    #[test]
    fn test_unknown_route_falls_through_to_invalid() {
        let payload = opening(json!({ "RESULT": true, "KEY_ROTA": "ROTA_NOVA" }));
        assert_eq!(
            classify("tok", FlowPath::Full, &payload),
            Err(ErrorKind::InvalidInvite)
        );
    }
}
