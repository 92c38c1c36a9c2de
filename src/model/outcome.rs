//! Result of one dispatched fetch.

use crate::model::Reading;
use crate::source::SourceError;

/// Exactly one `Outcome` is produced per dispatched fetch.
#[derive(Debug)]
pub enum Outcome {
    Success(Reading),
    /// The deadline budget elapsed before the source answered.
    Timeout,
    SourceError(SourceError),
    /// The owning scope was cancelled before or during the call.
    Cancelled,
}

impl Outcome {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::Timeout => "timeout",
            Outcome::SourceError(_) => "source_error",
            Outcome::Cancelled => "cancelled",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}
