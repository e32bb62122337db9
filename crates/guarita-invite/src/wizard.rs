//! Wizard step partition and navigation state.

use thiserror::Error;

use crate::fields::{FieldName, FieldSpec, FieldValues};

/// Fixed display order of the identity step.
const IDENTITY_ORDER: &[FieldName] = &[
    FieldName::Name,
    FieldName::Document,
    FieldName::Photo,
    FieldName::Password,
];

/// The computed step layout: step one collects identity, step two everything
/// else in declaration order. With no step-two fields the wizard collapses to
/// a single step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepPlan {
    pub identity: Vec<FieldSpec>,
    pub extra: Vec<FieldSpec>,
}

impl StepPlan {
    pub fn build(fields: &[FieldSpec]) -> Self {
        let visible: Vec<&FieldSpec> = fields.iter().filter(|f| f.visible).collect();

        let mut identity = Vec::new();
        for wanted in IDENTITY_ORDER {
            if *wanted == FieldName::Document {
                // CPF/RG/passport collapse into one document input whose
                // format follows the citizen/foreigner toggle.
                let documents: Vec<&&FieldSpec> =
                    visible.iter().filter(|f| f.name.is_document()).collect();
                if !documents.is_empty() {
                    identity.push(FieldSpec {
                        name: FieldName::Document,
                        required: documents.iter().any(|f| f.required),
                        visible: true,
                    });
                }
            } else if let Some(found) = visible.iter().find(|f| &f.name == wanted) {
                identity.push((*found).clone());
            }
        }

        let extra = visible
            .iter()
            .filter(|f| !f.name.is_identity())
            .map(|f| (*f).clone())
            .collect();

        Self { identity, extra }
    }

    pub fn single_step(&self) -> bool {
        self.extra.is_empty()
    }

    pub fn step_count(&self) -> usize {
        if self.single_step() {
            1
        } else {
            2
        }
    }

    pub fn fields_at(&self, step: usize) -> &[FieldSpec] {
        if step == 0 {
            &self.identity
        } else {
            &self.extra
        }
    }

    /// Submit button label for a step: the last step sends, earlier steps
    /// continue.
    pub fn submit_label(&self, step: usize) -> &'static str {
        if step + 1 >= self.step_count() {
            "Enviar"
        } else {
            "Continuar"
        }
    }

    pub fn has_password(&self) -> bool {
        self.identity.iter().any(|f| f.name == FieldName::Password)
    }

    pub fn has_document(&self) -> bool {
        self.identity.iter().any(|f| f.name == FieldName::Document)
    }
}

/// Transition direction; selects enter/exit animations only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Back,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("As senhas informadas não coincidem")]
    PasswordMismatch,
}

/// Ephemeral per-mount wizard state. Discarded on submission or navigation.
#[derive(Clone, Debug, Default)]
pub struct WizardState {
    pub step: usize,
    pub direction: Direction,
    pub values: FieldValues,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: FieldName, value: String) {
        self.values.insert(name, value);
    }

    pub fn value(&self, name: &FieldName) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn is_last(&self, plan: &StepPlan) -> bool {
        self.step + 1 >= plan.step_count()
    }

    /// Advance one step. Returns `Ok(false)` on the last step — the caller
    /// submits instead. Recurring invitations must confirm the password
    /// before leaving the identity step; on mismatch the step index does not
    /// move and the collected input stays intact.
    pub fn try_advance(
        &mut self,
        plan: &StepPlan,
        recurring: bool,
        confirm: &str,
    ) -> Result<bool, GateError> {
        if self.step == 0 && recurring && plan.has_password() {
            let password = self.value(&FieldName::Password);
            if password != confirm {
                return Err(GateError::PasswordMismatch);
            }
        }
        if self.is_last(plan) {
            return Ok(false);
        }
        self.step += 1;
        self.direction = Direction::Forward;
        Ok(true)
    }

    /// Step back, clamped at the first step.
    pub fn back(&mut self) -> bool {
        if self.step == 0 {
            return false;
        }
        self.step -= 1;
        self.direction = Direction::Back;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_of(names: &[FieldName]) -> StepPlan {
        let fields: Vec<FieldSpec> = names
            .iter()
            .map(|n| FieldSpec::required(n.clone()))
            .collect();
        StepPlan::build(&fields)
    }

    #[test]
    fn test_identity_fields_collapse_to_single_step() {
        let plan = plan_of(&[FieldName::Name, FieldName::Photo]);
        assert!(plan.single_step());
        assert_eq!(plan.step_count(), 1);
        assert_eq!(plan.submit_label(0), "Enviar");
    }

    #[test]
    fn test_extra_fields_make_two_steps() {
        let plan = plan_of(&[FieldName::Name, FieldName::Photo, FieldName::Phone]);
        assert_eq!(plan.step_count(), 2);
        assert_eq!(plan.submit_label(0), "Continuar");
        assert_eq!(plan.submit_label(1), "Enviar");
        assert_eq!(plan.fields_at(1)[0].name, FieldName::Phone);
    }

    #[test]
    fn test_identity_order_is_fixed_regardless_of_declaration() {
        let plan = plan_of(&[
            FieldName::Password,
            FieldName::Photo,
            FieldName::Cpf,
            FieldName::Name,
        ]);
        let names: Vec<&FieldName> = plan.identity.iter().map(|f| &f.name).collect();
        assert_eq!(
            names,
            vec![
                &FieldName::Name,
                &FieldName::Document,
                &FieldName::Photo,
                &FieldName::Password
            ]
        );
    }

    #[test]
    fn test_document_variants_collapse_into_one() {
        let fields = vec![
            FieldSpec::optional(FieldName::Rg),
            FieldSpec::required(FieldName::Cpf),
            FieldSpec::optional(FieldName::Passport),
        ];
        let plan = StepPlan::build(&fields);
        assert_eq!(plan.identity.len(), 1);
        assert_eq!(plan.identity[0].name, FieldName::Document);
        // Required when any collapsed variant was required.
        assert!(plan.identity[0].required);
    }

    #[test]
    fn test_invisible_fields_are_dropped() {
        let fields = vec![
            FieldSpec::required(FieldName::Name),
            FieldSpec {
                name: FieldName::Phone,
                required: true,
                visible: false,
            },
        ];
        let plan = StepPlan::build(&fields);
        assert!(plan.single_step());
    }

    #[test]
    fn test_extra_fields_keep_declaration_order() {
        let plan = plan_of(&[
            FieldName::Email,
            FieldName::Name,
            FieldName::Plate,
            FieldName::Phone,
        ]);
        let names: Vec<&FieldName> = plan.extra.iter().map(|f| &f.name).collect();
        assert_eq!(names, vec![&FieldName::Email, &FieldName::Plate, &FieldName::Phone]);
    }

    #[test]
    fn test_password_gate_blocks_mismatch_without_advancing() {
        let plan = plan_of(&[FieldName::Name, FieldName::Password, FieldName::Phone]);
        let mut state = WizardState::new();
        state.set(FieldName::Password, "Abcd3!".to_string());

        let result = state.try_advance(&plan, true, "different");
        assert_eq!(result, Err(GateError::PasswordMismatch));
        assert_eq!(state.step, 0);

        let result = state.try_advance(&plan, true, "Abcd3!");
        assert_eq!(result, Ok(true));
        assert_eq!(state.step, 1);
        assert_eq!(state.direction, Direction::Forward);
    }

    #[test]
    fn test_gate_skipped_for_one_time_invitations() {
        let plan = plan_of(&[FieldName::Password, FieldName::Phone]);
        let mut state = WizardState::new();
        state.set(FieldName::Password, "Abcd3!".to_string());
        assert_eq!(state.try_advance(&plan, false, ""), Ok(true));
    }

    #[test]
    fn test_last_step_signals_submission() {
        let plan = plan_of(&[FieldName::Name]);
        let mut state = WizardState::new();
        assert_eq!(state.try_advance(&plan, false, ""), Ok(false));
        assert_eq!(state.step, 0);
    }

    #[test]
    fn test_back_is_clamped_at_first_step() {
        let plan = plan_of(&[FieldName::Name, FieldName::Phone]);
        let mut state = WizardState::new();
        assert!(!state.back());
        state.try_advance(&plan, false, "").unwrap();
        assert!(state.back());
        assert_eq!(state.step, 0);
        assert_eq!(state.direction, Direction::Back);
        assert!(!state.back());
    }
}
