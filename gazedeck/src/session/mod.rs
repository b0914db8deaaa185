//! Session accounting: counters, per-event records and the final report.

pub mod events;
pub mod recorder;

pub use events::{CardRecord, DwellRecord, SessionEvent};
pub use recorder::{SessionRecorder, SessionReport, SessionSummary};
