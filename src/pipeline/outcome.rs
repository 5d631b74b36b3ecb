use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::AppError;

/// Why today's artifacts are not available
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// A negative marker from an earlier run exists for today
    PreviouslyFailed,
    Transport(String),
    MalformedResponse(String),
    Image(String),
    /// Writing the manifest or cleaning up failed
    Storage(String),
}

impl FailureReason {
    pub fn from_error(error: &AppError) -> Self {
        match error {
            AppError::Transport(e) => Self::Transport(e.to_string()),
            AppError::MalformedResponse { message } => Self::MalformedResponse(message.clone()),
            AppError::Image(e) => Self::Image(e.to_string()),
            other => Self::Storage(other.to_string()),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreviouslyFailed => write!(f, "an earlier attempt today failed"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
            Self::Image(msg) => write!(f, "image error: {msg}"),
            Self::Storage(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

/// Result of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Today's manifest was already on disk
    Cached(PathBuf),
    /// Today's manifest was written by this run
    Fetched(PathBuf),
    /// Today is unavailable; an older manifest is reported instead
    FellBack {
        manifest: PathBuf,
        reason: FailureReason,
    },
    /// Today is unavailable and nothing is cached
    Unavailable { reason: FailureReason },
}

impl RunOutcome {
    /// Manifest the caller should use, if any
    pub fn manifest_path(&self) -> Option<&Path> {
        match self {
            Self::Cached(path) | Self::Fetched(path) => Some(path),
            Self::FellBack { manifest, .. } => Some(manifest),
            Self::Unavailable { .. } => None,
        }
    }

    /// Whether the reported manifest is today's
    pub fn is_current(&self) -> bool {
        matches!(self, Self::Cached(_) | Self::Fetched(_))
    }

    /// Process exit code: 0 current, 2 fallback, 1 nothing available
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Cached(_) | Self::Fetched(_) => 0,
            Self::FellBack { .. } => 2,
            Self::Unavailable { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ImageError, TransportError};

    #[test]
    fn test_reason_from_error() {
        assert!(matches!(
            FailureReason::from_error(&TransportError::status("u", 500).into()),
            FailureReason::Transport(_)
        ));
        assert!(matches!(
            FailureReason::from_error(&ImageError::decode(Path::new("a.jpg"), "x").into()),
            FailureReason::Image(_)
        ));
        assert_eq!(
            FailureReason::from_error(&AppError::malformed("video day")),
            FailureReason::MalformedResponse("video day".to_string())
        );
        assert!(matches!(
            FailureReason::from_error(&AppError::Io(std::io::Error::other("disk full"))),
            FailureReason::Storage(_)
        ));
    }

    #[test]
    fn test_outcome_accessors() {
        let path = PathBuf::from("/c/2024-01-01.json");
        assert_eq!(RunOutcome::Cached(path.clone()).exit_code(), 0);
        assert_eq!(RunOutcome::Fetched(path.clone()).manifest_path(), Some(path.as_path()));

        let fell_back = RunOutcome::FellBack {
            manifest: path.clone(),
            reason: FailureReason::PreviouslyFailed,
        };
        assert!(!fell_back.is_current());
        assert_eq!(fell_back.exit_code(), 2);
        assert_eq!(fell_back.manifest_path(), Some(path.as_path()));

        let unavailable = RunOutcome::Unavailable {
            reason: FailureReason::PreviouslyFailed,
        };
        assert_eq!(unavailable.manifest_path(), None);
        assert_eq!(unavailable.exit_code(), 1);
    }
}
