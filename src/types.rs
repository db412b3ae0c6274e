// Copyright 2026 Hypermesh Foundation. All rights reserved.
// League Projection Engine - Type Definitions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ProjectionError;

// ─── Identifiers ────────────────────────────────────────────────────────────

/// Entry identifier of one participant in a league.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ParticipantId {
    fn from(id: u64) -> Self { ParticipantId(id) }
}

/// Identifier of a league (contest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeagueId(pub u64);

impl fmt::Display for LeagueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LeagueId {
    fn from(id: u64) -> Self { LeagueId(id) }
}

// ─── Round History ──────────────────────────────────────────────────────────

/// Points earned in each completed round, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundHistory(Vec<u32>);

impl RoundHistory {
    pub fn new(points: Vec<u32>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[u32] {
        &self.0
    }

    /// Number of completed rounds.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Points accrued so far.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&p| p as u64).sum()
    }
}

impl From<Vec<u32>> for RoundHistory {
    fn from(points: Vec<u32>) -> Self { Self(points) }
}

// ─── Labels ─────────────────────────────────────────────────────────────────

/// Display metadata for a participant. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantLabel {
    pub name: String,
    pub manager: String,
}

/// One roster line: who is in the league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: ParticipantId,
    pub name: String,
    pub manager: String,
}

// ─── Score Bounds ───────────────────────────────────────────────────────────

/// Plausible per-round score range. Every simulated round is clamped into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ScoreBounds {
    fn default() -> Self {
        Self { min: 35.0, max: 100.0 }
    }
}

impl ScoreBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Both ends finite and `min <= max`.
    pub fn validate(&self) -> Result<(), ProjectionError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ProjectionError::invalid(format!(
                "score bounds [{}, {}] are not a valid range",
                self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn clamp(&self, points: f64) -> f64 {
        points.clamp(self.min, self.max)
    }
}

// ─── Participant Profile ────────────────────────────────────────────────────

/// Everything the simulator needs to know about one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantProfile {
    pub id: ParticipantId,
    pub name: String,
    pub manager: String,
    /// Sum of the round history.
    pub current_points: u64,
    pub mean: f64,
    pub std_dev: f64,
    pub played_rounds: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_total_and_len() {
        let history = RoundHistory::new(vec![60, 45, 72]);
        assert_eq!(history.len(), 3);
        assert_eq!(history.total(), 177);
        assert!(!history.is_empty());
        assert!(RoundHistory::default().is_empty());
    }

    #[test]
    fn score_bounds_clamp() {
        let bounds = ScoreBounds::default();
        assert_eq!(bounds.clamp(12.0), 35.0);
        assert_eq!(bounds.clamp(140.0), 100.0);
        assert_eq!(bounds.clamp(64.5), 64.5);
    }

    #[test]
    fn score_bounds_validate() {
        assert!(ScoreBounds::default().validate().is_ok());
        assert!(ScoreBounds::new(50.0, 50.0).validate().is_ok());
        assert!(ScoreBounds::new(100.0, 35.0).validate().is_err());
        assert!(ScoreBounds::new(f64::NAN, 100.0).validate().is_err());
    }

    #[test]
    fn participant_id_ordering() {
        assert!(ParticipantId(3) < ParticipantId(10));
        assert_eq!(ParticipantId(42).to_string(), "42");
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&ParticipantId(7)).expect("test: serialize");
        assert_eq!(json, "7");
    }
}
