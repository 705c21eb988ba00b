pub mod envelope;
pub mod identifier;
pub mod outcome;

pub use envelope::{build_envelope, ChargerCommand, ChargerPayload, CommandEnvelope};
pub use identifier::Identifier;
pub use outcome::{ItemOutcome, OutcomeEntry, OutcomeLedger, RunReport, RunStatus};
