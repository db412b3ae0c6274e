// Copyright 2026 Hypermesh Foundation. All rights reserved.
// League Projection Engine - Errors

use crate::types::ParticipantId;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Coarse classification of a [`ProjectionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DataUnavailable,
    InsufficientHistory,
    InvalidConfiguration,
    UnsynchronizedRounds,
    Cancelled,
}

/// Errors raised by a projection run. None are recovered inside the engine.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("data unavailable for {what}: {reason}")]
    DataUnavailable { what: String, reason: String },

    #[error("participant {participant} has no completed rounds")]
    InsufficientHistory { participant: ParticipantId },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("participant {participant} completed {completed} rounds, league completed {expected}")]
    UnsynchronizedRounds {
        participant: ParticipantId,
        completed: u32,
        expected: u32,
    },

    #[error("projection cancelled")]
    Cancelled,
}

impl ProjectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DataUnavailable { .. } => ErrorKind::DataUnavailable,
            Self::InsufficientHistory { .. } => ErrorKind::InsufficientHistory,
            Self::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            Self::UnsynchronizedRounds { .. } => ErrorKind::UnsynchronizedRounds,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub(crate) fn unavailable(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable { what: what.into(), reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let err = ProjectionError::InsufficientHistory { participant: ParticipantId(9) };
        assert_eq!(err.kind(), ErrorKind::InsufficientHistory);
        assert_eq!(ProjectionError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(ProjectionError::invalid("x").kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn messages_name_the_participant() {
        let err = ProjectionError::UnsynchronizedRounds {
            participant: ParticipantId(5),
            completed: 3,
            expected: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("participant 5"), "unexpected message: {}", msg);
        assert!(msg.contains("league completed 4"), "unexpected message: {}", msg);
    }
}
