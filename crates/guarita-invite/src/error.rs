//! Terminal invitation errors and the backend error-text adapter.

use thiserror::Error;

/// Why an invitation link cannot be served. All variants are terminal and
/// mutually exclusive; views render a fixed title/description per kind and
/// never show raw backend text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("empty-invite")]
    EmptyInvite,
    #[error("invalid-invite")]
    InvalidInvite,
    #[error("expired-invite")]
    ExpiredInvite,
    #[error("completed-invite")]
    CompletedInvite,
    #[error("updated-image")]
    UpdatedImage,
    #[error("canceled-invite")]
    CanceledInvite,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::EmptyInvite => "empty-invite",
            ErrorKind::InvalidInvite => "invalid-invite",
            ErrorKind::ExpiredInvite => "expired-invite",
            ErrorKind::CompletedInvite => "completed-invite",
            ErrorKind::UpdatedImage => "updated-image",
            ErrorKind::CanceledInvite => "canceled-invite",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::EmptyInvite => "Convite não encontrado",
            ErrorKind::InvalidInvite => "Convite inválido",
            ErrorKind::ExpiredInvite => "Convite expirado",
            ErrorKind::CompletedInvite => "Convite já preenchido",
            ErrorKind::UpdatedImage => "Foto já atualizada",
            ErrorKind::CanceledInvite => "Convite cancelado",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::EmptyInvite => {
                "O endereço acessado não contém um convite. Confira o link recebido e tente novamente."
            }
            ErrorKind::InvalidInvite => {
                "Este convite não pôde ser verificado. Peça ao morador um novo link."
            }
            ErrorKind::ExpiredInvite => {
                "O prazo deste convite terminou. Peça ao morador um novo convite."
            }
            ErrorKind::CompletedInvite => {
                "Os dados deste convite já foram enviados. Se precisar alterar algo, fale com o morador."
            }
            ErrorKind::UpdatedImage => "A foto deste cadastro já foi enviada anteriormente.",
            ErrorKind::CanceledInvite => "Este convite foi cancelado pelo morador.",
        }
    }
}

/// Single adapter for the backend's string-literal error channel.
///
/// The backend exposes no structured error codes, only pt-BR `INFO` text, so
/// control flow depends on these exact literals (accents and punctuation
/// included). Keep every new match inside this one function.
pub fn kind_for_info(info: Option<&str>) -> ErrorKind {
    match info {
        Some("Convite já preenchido!") => ErrorKind::CompletedInvite,
        Some("Convite Expirado!") => ErrorKind::ExpiredInvite,
        Some("Imagem já atualizada!") => ErrorKind::UpdatedImage,
        Some("Convite Cancelado!") => ErrorKind::CanceledInvite,
        _ => ErrorKind::InvalidInvite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_literals_map_to_their_kind() {
        assert_eq!(
            kind_for_info(Some("Convite já preenchido!")),
            ErrorKind::CompletedInvite
        );
        assert_eq!(kind_for_info(Some("Convite Expirado!")), ErrorKind::ExpiredInvite);
        assert_eq!(
            kind_for_info(Some("Imagem já atualizada!")),
            ErrorKind::UpdatedImage
        );
        assert_eq!(
            kind_for_info(Some("Convite Cancelado!")),
            ErrorKind::CanceledInvite
        );
    }

    #[test]
    fn test_unrecognized_text_falls_back_to_invalid() {
        assert_eq!(kind_for_info(Some("Erro interno")), ErrorKind::InvalidInvite);
        assert_eq!(kind_for_info(None), ErrorKind::InvalidInvite);
        // Accent-stripped variant is a different string and must not match.
        assert_eq!(
            kind_for_info(Some("Convite ja preenchido!")),
            ErrorKind::InvalidInvite
        );
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(ErrorKind::ExpiredInvite.as_str(), "expired-invite");
        assert_eq!(ErrorKind::EmptyInvite.to_string(), "empty-invite");
    }
}
