use serde::{Deserialize, Serialize};

/// Lifecycle state of a single trial, as recorded by the benchmarking
/// framework that owns the backend. Unrecognized strings parse to
/// `Unknown` so that a newer backend never breaks the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrialStatus {
    Pending,
    Ready,
    Running,
    Succeeded,
    Canceled,
    Failed,
    TimedOut,
    Unknown,
}

impl TrialStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => TrialStatus::Pending,
            "READY" => TrialStatus::Ready,
            "RUNNING" => TrialStatus::Running,
            "SUCCEEDED" => TrialStatus::Succeeded,
            "CANCELED" => TrialStatus::Canceled,
            "FAILED" => TrialStatus::Failed,
            "TIMED_OUT" => TrialStatus::TimedOut,
            _ => TrialStatus::Unknown,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TrialStatus::Failed | TrialStatus::TimedOut)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrialStatus::Pending => "PENDING",
            TrialStatus::Ready => "READY",
            TrialStatus::Running => "RUNNING",
            TrialStatus::Succeeded => "SUCCEEDED",
            TrialStatus::Canceled => "CANCELED",
            TrialStatus::Failed => "FAILED",
            TrialStatus::TimedOut => "TIMED_OUT",
            TrialStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(TrialStatus::parse("succeeded"), TrialStatus::Succeeded);
        assert_eq!(TrialStatus::parse("FAILED"), TrialStatus::Failed);
        assert_eq!(TrialStatus::parse(" timed_out "), TrialStatus::TimedOut);
    }

    #[test]
    fn unrecognized_is_unknown() {
        assert_eq!(TrialStatus::parse("EXPLODED"), TrialStatus::Unknown);
        assert!(!TrialStatus::Unknown.is_failed());
    }

    #[test]
    fn failed_covers_timeouts() {
        assert!(TrialStatus::Failed.is_failed());
        assert!(TrialStatus::TimedOut.is_failed());
        assert!(!TrialStatus::Succeeded.is_failed());
    }
}
