//! Application services for the attestation scheduling engine.

mod auto_close;
mod escalations;
mod reminders;
mod report;
mod scheduler;
mod transfer;
mod unregistered;
mod url;

pub use auto_close::CampaignAutoCloser;
pub use escalations::EscalationProcessor;
pub use reminders::ReminderProcessor;
pub use report::{CloseSummary, PassSummary, ProcessorError, ProcessorResult, TickReport};
pub use scheduler::{SchedulerConfig, SchedulerDriver, SchedulerParts};
pub use transfer::{AttestationCompletionService, CompletionError, CompletionResult};
pub use unregistered::{UnregisteredEscalationProcessor, UnregisteredReminderProcessor};
pub use url::{AttestationUrlSigner, UrlSignerConfig};
