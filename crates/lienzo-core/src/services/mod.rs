//! Orchestration services.
//!
//! Services coordinate ports; they hold no infrastructure of their own.

pub mod bonus;
pub mod deletion;
pub mod generation;
pub mod quota;

pub use bonus::BonusService;
pub use deletion::DeletionService;
pub use generation::{GenerationConfig, GenerationService};
pub use quota::{QuotaError, QuotaReservation, QuotaService, QuotaStatus, start_of_local_day};
