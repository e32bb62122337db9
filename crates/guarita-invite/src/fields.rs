//! Canonical field names, input masks, validation patterns and the small
//! text helpers the form engine dispatches on.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use guarita_api::wire::FieldDecl;

/// Canonical form field. Wire `CAMPO` values are UPPERCASE pt-BR names; any
/// name this front-end does not know renders as a plain text input.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldName {
    Name,
    /// The collapsed identity-document pseudo-field. The backend may declare
    /// CPF, RG or passport separately; the form shows one input whose format
    /// follows the citizen/foreigner toggle.
    Document,
    Cpf,
    Rg,
    Passport,
    Photo,
    Password,
    Phone,
    Plate,
    Profession,
    BirthDate,
    Email,
    /// Pseudo-field: declares nothing to collect, only toggles whether the
    /// condominium message is shown.
    Observations,
    Other(String),
}

impl FieldName {
    pub fn from_wire(campo: &str) -> Self {
        match campo.trim().to_uppercase().as_str() {
            "NOME" => FieldName::Name,
            "DOCUMENTO" => FieldName::Document,
            "CPF" => FieldName::Cpf,
            "RG" => FieldName::Rg,
            "PASSAPORTE" => FieldName::Passport,
            "FOTO" => FieldName::Photo,
            "SENHA" => FieldName::Password,
            "TELEFONE" => FieldName::Phone,
            "PLACA" => FieldName::Plate,
            "PROFISSAO" => FieldName::Profession,
            "DATA_NASCIMENTO" => FieldName::BirthDate,
            "EMAIL" => FieldName::Email,
            "OBSERVACOES" => FieldName::Observations,
            other => FieldName::Other(other.to_lowercase()),
        }
    }

    /// Key used in the `cadastra_convite` body. A few differ from the wire
    /// declaration name; `Photo` and `Plate` are replaced by their upload
    /// results and never serialize their raw value.
    pub fn body_key(&self) -> &str {
        match self {
            FieldName::Name => "nome",
            FieldName::Document | FieldName::Cpf | FieldName::Rg | FieldName::Passport => {
                "documento"
            }
            FieldName::Photo => "url_foto",
            FieldName::Password => "senha",
            FieldName::Phone => "telefone",
            FieldName::Plate => "id_veiculo",
            FieldName::Profession => "desc_profissao",
            FieldName::BirthDate => "data_nascimento",
            FieldName::Email => "email",
            FieldName::Observations => "observacoes",
            FieldName::Other(name) => name,
        }
    }

    /// Identity fields open the wizard; everything else lands on step two.
    pub fn is_identity(&self) -> bool {
        matches!(
            self,
            FieldName::Name
                | FieldName::Document
                | FieldName::Cpf
                | FieldName::Rg
                | FieldName::Passport
                | FieldName::Photo
                | FieldName::Password
        )
    }

    pub fn is_document(&self) -> bool {
        matches!(
            self,
            FieldName::Document | FieldName::Cpf | FieldName::Rg | FieldName::Passport
        )
    }

    pub fn label(&self) -> &str {
        match self {
            FieldName::Name => "Nome completo",
            FieldName::Document | FieldName::Cpf => "Documento",
            FieldName::Rg => "RG",
            FieldName::Passport => "Passaporte",
            FieldName::Photo => "Foto",
            FieldName::Password => "Senha",
            FieldName::Phone => "Telefone",
            FieldName::Plate => "Placa do veículo",
            FieldName::Profession => "Profissão",
            FieldName::BirthDate => "Data de nascimento",
            FieldName::Email => "E-mail",
            FieldName::Observations => "Observações",
            FieldName::Other(name) => name,
        }
    }
}

/// One declared field after normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: FieldName,
    pub required: bool,
    pub visible: bool,
}

impl FieldSpec {
    pub fn required(name: FieldName) -> Self {
        Self {
            name,
            required: true,
            visible: true,
        }
    }

    pub fn optional(name: FieldName) -> Self {
        Self {
            name,
            required: false,
            visible: true,
        }
    }
}

/// Normalize the server-declared field list, preserving declaration order.
pub fn from_declarations(decls: &[FieldDecl]) -> Vec<FieldSpec> {
    decls
        .iter()
        .map(|decl| FieldSpec {
            name: FieldName::from_wire(&decl.name),
            required: decl.required,
            visible: decl.visible,
        })
        .collect()
}

// Validation patterns -------------------------------------------------------

static CPF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$").unwrap());
static PASSPORT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{7,9}$").unwrap());
static PLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{3}-\d{4}$|^[A-Za-z]{3}\d[A-Za-z]\d{2}$").unwrap());
static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(\d{2}\) \d{4,5}-\d{4}$").unwrap());

/// HTML `pattern` attribute for a field, or `None` when the input type and
/// the mask already constrain it enough.
pub fn html_pattern(field: &FieldName, foreigner: bool) -> Option<&'static str> {
    match field {
        FieldName::Document | FieldName::Cpf if foreigner => Some(r"[A-Za-z0-9]{7,9}"),
        FieldName::Document | FieldName::Cpf => Some(r"\d{3}\.\d{3}\.\d{3}-\d{2}"),
        FieldName::Passport => Some(r"[A-Za-z0-9]{7,9}"),
        FieldName::Phone => Some(r"\(\d{2}\) \d{4,5}-\d{4}"),
        FieldName::Plate => Some(r"[A-Za-z]{3}-\d{4}|[A-Za-z]{3}\d[A-Za-z]\d{2}"),
        FieldName::BirthDate => Some(r"\d{2}/\d{2}/\d{4}"),
        _ => None,
    }
}

/// Field-specific custom-validity message, with a generic fallback.
pub fn validity_message(field: &FieldName, foreigner: bool) -> &'static str {
    match field {
        FieldName::Document | FieldName::Cpf if foreigner => "Passaporte inválido",
        FieldName::Document | FieldName::Cpf => "CPF inválido",
        FieldName::Passport => "Passaporte inválido",
        FieldName::Phone => "Telefone inválido",
        FieldName::Plate => "Placa inválida",
        FieldName::BirthDate => "Data inválida",
        FieldName::Email => "E-mail inválido",
        _ => "Valor inválido",
    }
}

/// Check a value against the field's full-format pattern.
pub fn is_valid(field: &FieldName, foreigner: bool, value: &str) -> bool {
    match field {
        FieldName::Document | FieldName::Cpf if foreigner => PASSPORT_RE.is_match(value),
        FieldName::Document | FieldName::Cpf => CPF_RE.is_match(value),
        FieldName::Passport => PASSPORT_RE.is_match(value),
        FieldName::Phone => PHONE_RE.is_match(value),
        FieldName::Plate => PLATE_RE.is_match(value),
        FieldName::BirthDate => DATE_RE.is_match(value),
        _ => !value.trim().is_empty(),
    }
}

// Input masks ---------------------------------------------------------------

/// Progressive CPF mask: `000.000.000-00`.
pub fn mask_cpf(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).take(11).collect();
    let mut out = String::new();
    for (i, c) in digits.iter().enumerate() {
        match i {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(*c);
    }
    out
}

/// Progressive phone mask: `(00) 0000-0000` or `(00) 00000-0000`.
pub fn mask_phone(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).take(11).collect();
    if digits.is_empty() {
        return String::new();
    }
    let split = if digits.len() > 10 { 7 } else { 6 };
    let mut out = String::from("(");
    for (i, c) in digits.iter().enumerate() {
        if i == 2 {
            out.push_str(") ");
        } else if i == split {
            out.push('-');
        }
        out.push(*c);
    }
    out
}

/// Brazilian plate mask. Classic plates (`AAA-0000`) get a dash; Mercosul
/// plates (`AAA0A00`, letter in the fifth position) do not.
pub fn mask_plate(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .take(7)
        .collect();
    let mercosul = cleaned
        .chars()
        .nth(4)
        .map(|c| c.is_ascii_alphabetic())
        .unwrap_or(false);
    if mercosul || cleaned.len() <= 3 {
        cleaned
    } else {
        format!("{}-{}", &cleaned[..3], &cleaned[3..])
    }
}

/// Progressive date mask: `DD/MM/YYYY`.
pub fn mask_date(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).take(8).collect();
    let mut out = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i == 2 || i == 4 {
            out.push('/');
        }
        out.push(*c);
    }
    out
}

// Text helpers --------------------------------------------------------------

/// Strip everything but ASCII digits.
pub fn digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Keep letters (accented included) and spaces; name inputs reject the rest.
pub fn letters_only(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphabetic() || *c == ' ')
        .collect()
}

/// `"jOÃO da silva"` → `"João Da Silva"`.
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a full name into (first, rest).
pub fn split_name(full: &str) -> (String, String) {
    let mut words = full.split_whitespace();
    let first = words.next().unwrap_or_default().to_string();
    let rest = words.collect::<Vec<_>>().join(" ");
    (first, rest)
}

// Password strength ---------------------------------------------------------

/// Live checklist for the password sub-form. All five rules must hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PasswordStrength {
    pub min_len: bool,
    pub upper: bool,
    pub lower: bool,
    pub digit: bool,
    pub special: bool,
}

impl PasswordStrength {
    pub fn check(password: &str) -> Self {
        Self {
            min_len: password.chars().count() >= 6,
            upper: password.chars().any(|c| c.is_uppercase()),
            lower: password.chars().any(|c| c.is_lowercase()),
            digit: password.chars().any(|c| c.is_ascii_digit()),
            special: password
                .chars()
                .any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
        }
    }

    pub fn satisfied(self) -> bool {
        self.min_len && self.upper && self.lower && self.digit && self.special
    }
}

// WhatsApp ------------------------------------------------------------------

/// Deep link opening a WhatsApp conversation with a prefilled message.
/// Brazilian numbers get the country code when it is missing.
pub fn whatsapp_link(phone: &str, text: &str) -> String {
    let mut number = digits(phone);
    if !number.starts_with("55") || number.len() <= 11 {
        number = format!("55{number}");
    }
    format!("https://wa.me/{}?text={}", number, percent_encode(text))
}

fn percent_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Wizard values keyed by field.
pub type FieldValues = HashMap<FieldName, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wire_known_and_unknown() {
        assert_eq!(FieldName::from_wire("NOME"), FieldName::Name);
        assert_eq!(FieldName::from_wire("data_nascimento"), FieldName::BirthDate);
        assert_eq!(
            FieldName::from_wire("CRACHA"),
            FieldName::Other("cracha".to_string())
        );
    }

    #[test]
    fn test_body_keys() {
        assert_eq!(FieldName::Profession.body_key(), "desc_profissao");
        assert_eq!(FieldName::Cpf.body_key(), "documento");
        assert_eq!(FieldName::Photo.body_key(), "url_foto");
    }

    #[test]
    fn test_mask_cpf_progressive() {
        assert_eq!(mask_cpf("123"), "123");
        assert_eq!(mask_cpf("123456"), "123.456");
        assert_eq!(mask_cpf("12345678901"), "123.456.789-01");
        assert_eq!(mask_cpf("123.456.789-01999"), "123.456.789-01");
    }

    #[test]
    fn test_mask_phone_short_and_long() {
        assert_eq!(mask_phone("11"), "(11");
        assert_eq!(mask_phone("1143215678"), "(11) 4321-5678");
        assert_eq!(mask_phone("11987654321"), "(11) 98765-4321");
    }

    #[test]
    fn test_mask_plate_classic_and_mercosul() {
        assert_eq!(mask_plate("abc1234"), "ABC-1234");
        assert_eq!(mask_plate("abc1d23"), "ABC1D23");
        assert_eq!(mask_plate("ab"), "AB");
        assert_eq!(mask_plate("abc-1234"), "ABC-1234");
    }

    #[test]
    fn test_mask_date() {
        assert_eq!(mask_date("1"), "1");
        assert_eq!(mask_date("0102"), "01/02");
        assert_eq!(mask_date("01021990"), "01/02/1990");
    }

    #[test]
    fn test_document_validation_follows_foreigner_toggle() {
        let doc = FieldName::Document;
        assert!(is_valid(&doc, false, "123.456.789-01"));
        assert!(!is_valid(&doc, false, "12345678901"));
        assert!(is_valid(&doc, true, "AB123456"));
        assert!(!is_valid(&doc, true, "AB12")); // too short
        assert_eq!(validity_message(&doc, false), "CPF inválido");
        assert_eq!(validity_message(&doc, true), "Passaporte inválido");
    }

    #[test]
    fn test_generic_validity_fallback() {
        assert_eq!(validity_message(&FieldName::Name, false), "Valor inválido");
    }

    #[test]
    fn test_title_case_and_letters_only() {
        assert_eq!(title_case("jOÃO da silva"), "João Da Silva");
        assert_eq!(letters_only("ana 2maria!"), "ana maria");
        assert_eq!(split_name("Ana Maria Souza"), ("Ana".into(), "Maria Souza".into()));
    }

    #[test]
    fn test_password_strength_rules() {
        assert!(!PasswordStrength::check("abc").satisfied());
        assert!(!PasswordStrength::check("abcdef").satisfied());
        assert!(!PasswordStrength::check("Abcde1").satisfied());
        assert!(PasswordStrength::check("Abcd3!").satisfied());
        let partial = PasswordStrength::check("abcdef");
        assert!(partial.min_len && partial.lower);
        assert!(!partial.upper && !partial.digit && !partial.special);
    }

    #[test]
    fn test_whatsapp_link_prefixes_country_code() {
        let link = whatsapp_link("(11) 98765-4321", "Olá!");
        assert!(link.starts_with("https://wa.me/5511987654321?text="));
        assert!(link.contains("Ol%C3%A1%21"));
        // Numbers already carrying the country code are kept as-is.
        assert!(whatsapp_link("5511987654321", "oi").starts_with("https://wa.me/5511987654321"));
    }

    #[test]
    fn test_from_declarations_preserves_order() {
        let decls: Vec<FieldDecl> = serde_json::from_value(serde_json::json!([
            { "CAMPO": "TELEFONE", "EXIBIR": true, "OBRIGATORIEDADE": true },
            { "CAMPO": "NOME", "EXIBIR": false, "OBRIGATORIEDADE": false }
        ]))
        .unwrap();
        let specs = from_declarations(&decls);
        assert_eq!(specs[0].name, FieldName::Phone);
        assert!(specs[0].required);
        assert!(!specs[1].visible);
    }
}
