//! Invitation domain core: route classification, the server-declared field
//! schema, the wizard state machine, submission payload assembly, and status
//! polling decisions.
//!
//! Everything here is framework-free. The web app owns rendering and reactive
//! state; this crate owns the rules.

pub mod classify;
pub mod error;
pub mod fields;
pub mod payload;
pub mod polling;
pub mod wizard;

pub use classify::{classify, require_token, FlowPath, RecoveryRequest, ResolvedInvitation};
pub use error::ErrorKind;
pub use fields::{FieldName, FieldSpec};
pub use payload::{SubmissionDraft, SubmitError, UploadService};
pub use polling::RefreshOutcome;
pub use wizard::{Direction, GateError, StepPlan, WizardState};

// Wire enums are part of the domain vocabulary; re-export them so the web app
// only needs this crate for types.
pub use guarita_api::wire::{
    AccessKind, Companion, CompletedInvite, Condominium, InviteStatus, Resident, RouteKey,
};
