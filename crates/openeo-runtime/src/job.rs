//! Job status types.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Status of a batch job, as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    /// The job was accepted and waits for execution.
    #[default]
    Accepted,
    /// The backend is executing the job.
    Running,
    /// The job completed successfully.
    Finished,
    /// The job failed.
    Error,
    /// The job was cancelled.
    Terminated,
}

impl JobStatus {
    /// Returns whether the job will not change status anymore.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Error | Self::Terminated)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(JobStatus::Accepted.as_ref(), "accepted");
        assert_eq!(JobStatus::from_str("terminated").unwrap(), JobStatus::Terminated);
        assert_eq!(
            serde_json::to_string(&JobStatus::Running).unwrap(),
            "\"running\""
        );
        assert!(JobStatus::from_str("queued").is_err());
    }

    #[test]
    fn test_terminal() {
        assert!(!JobStatus::Accepted.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Finished.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(JobStatus::Terminated.is_terminal());
    }
}
