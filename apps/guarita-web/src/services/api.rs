//! Page-level helpers over the RPC client.

use serde_json::Value;

use guarita_api::client::result_ok;
use guarita_api::ApiClient;
use guarita_invite::payload::{assemble, backend_error, SubmissionDraft, SubmitError};
use guarita_invite::{Companion, CompletedInvite, InviteStatus, RecoveryRequest};

/// Submit the wizard: dependent uploads first, then `cadastra_convite`.
/// Responses without a `CONVITE` block (photo update, resident register)
/// resolve to an empty completed invite; the view picks the affordance from
/// the route.
pub async fn submit_invite(
    client: &ApiClient,
    draft: &SubmissionDraft,
) -> Result<CompletedInvite, SubmitError> {
    let body = assemble(draft, client).await?;
    let value = client
        .register_invite(body)
        .await
        .ok_or(SubmitError::Transport)?;
    if !result_ok(&value) {
        return Err(backend_error(&value, "Não foi possível enviar o cadastro."));
    }
    match value.get("CONVITE") {
        Some(convite) => {
            serde_json::from_value(convite.clone()).map_err(|_| SubmitError::Transport)
        }
        None => Ok(CompletedInvite::default()),
    }
}

/// Replay the remembered recovery request; `None` covers transport errors and
/// `RESULT: false` alike, which status polling treats as the same soft
/// failure.
pub async fn fetch_recovered(
    client: &ApiClient,
    token: &str,
    recovery: &RecoveryRequest,
) -> Option<CompletedInvite> {
    let value = client
        .recover_invite(token, &recovery.document, recovery.foreigner)
        .await?;
    if !result_ok(&value) {
        return None;
    }
    serde_json::from_value(value.get("CONVITE")?.clone()).ok()
}

/// `cadastra_acompanhante_convite`, returning the new companion entry.
pub async fn submit_companion(
    client: &ApiClient,
    token: &str,
    name: &str,
    document: Option<&str>,
    photo_url: Option<&str>,
) -> Result<Companion, SubmitError> {
    let value = client
        .register_companion(token, name, document, photo_url)
        .await
        .ok_or(SubmitError::Transport)?;
    if !result_ok(&value) {
        return Err(backend_error(
            &value,
            "Não foi possível cadastrar o acompanhante.",
        ));
    }
    let status = value
        .get("STATUS")
        .cloned()
        .and_then(|s| serde_json::from_value::<InviteStatus>(s).ok())
        .unwrap_or_default();
    Ok(Companion {
        name: name.to_string(),
        status,
    })
}

/// `set_pet` with the server's failure text surfaced verbatim.
pub async fn submit_pet(
    client: &ApiClient,
    token: &str,
    name: &str,
    type_id: u64,
    breed_id: u64,
    photo_url: Option<&str>,
) -> Result<(), SubmitError> {
    let value: Value = client
        .set_pet(token, name, type_id, breed_id, photo_url)
        .await
        .ok_or(SubmitError::Transport)?;
    if !result_ok(&value) {
        return Err(backend_error(&value, "Não foi possível cadastrar o pet."));
    }
    Ok(())
}
