// Copyright 2026 Hypermesh Foundation. All rights reserved.
// League Projection Engine - Data Providers
//
// The engine never fetches data itself. Callers hand it something that
// implements both provider traits; `LeagueSnapshot` is the in-memory one.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ProjectionError;
use crate::types::{LeagueId, ParticipantId, ParticipantLabel, RosterEntry, RoundHistory};

// ─── Provider Traits ────────────────────────────────────────────────────────

/// Per-participant round history and display labels.
pub trait HistoryProvider {
    /// Completed-round points, oldest first.
    fn round_history(&self, participant: ParticipantId) -> Result<RoundHistory, ProjectionError>;

    fn participant_label(&self, participant: ParticipantId) -> Result<ParticipantLabel, ProjectionError>;
}

/// Enumerates everyone in a league.
pub trait RosterProvider {
    fn list_participants(&self, league: LeagueId) -> Result<Vec<RosterEntry>, ProjectionError>;
}

// ─── LeagueSnapshot ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub id: ParticipantId,
    pub name: String,
    pub manager: String,
    pub history: RoundHistory,
}

/// A league captured in memory: roster plus every participant's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    pub league: LeagueId,
    #[serde(default)]
    pub name: String,
    pub entries: Vec<SnapshotEntry>,
}

impl LeagueSnapshot {
    pub fn new(league: LeagueId, name: impl Into<String>) -> Self {
        Self { league, name: name.into(), entries: Vec::new() }
    }

    /// Append a participant. Roster order follows insertion order.
    pub fn with_entry(
        mut self,
        id: u64,
        name: &str,
        manager: &str,
        history: Vec<u32>,
    ) -> Self {
        self.entries.push(SnapshotEntry {
            id: ParticipantId(id),
            name: name.to_string(),
            manager: manager.to_string(),
            history: RoundHistory::new(history),
        });
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ProjectionError> {
        serde_json::from_str(json)
            .map_err(|e| ProjectionError::unavailable("league snapshot", e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self, ProjectionError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ProjectionError::unavailable(format!("league snapshot {}", path.display()), e.to_string())
        })?;
        Self::from_json_str(&json)
    }

    fn entry(&self, participant: ParticipantId) -> Result<&SnapshotEntry, ProjectionError> {
        self.entries
            .iter()
            .find(|e| e.id == participant)
            .ok_or_else(|| {
                ProjectionError::unavailable(
                    format!("participant {}", participant),
                    format!("not in league {}", self.league),
                )
            })
    }
}

impl HistoryProvider for LeagueSnapshot {
    fn round_history(&self, participant: ParticipantId) -> Result<RoundHistory, ProjectionError> {
        Ok(self.entry(participant)?.history.clone())
    }

    fn participant_label(&self, participant: ParticipantId) -> Result<ParticipantLabel, ProjectionError> {
        let entry = self.entry(participant)?;
        Ok(ParticipantLabel { name: entry.name.clone(), manager: entry.manager.clone() })
    }
}

impl RosterProvider for LeagueSnapshot {
    fn list_participants(&self, league: LeagueId) -> Result<Vec<RosterEntry>, ProjectionError> {
        if league != self.league {
            return Err(ProjectionError::unavailable(
                format!("league {}", league),
                format!("snapshot holds league {}", self.league),
            ));
        }
        Ok(self
            .entries
            .iter()
            .map(|e| RosterEntry { id: e.id, name: e.name.clone(), manager: e.manager.clone() })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn snapshot() -> LeagueSnapshot {
        LeagueSnapshot::new(LeagueId(542576), "Office League")
            .with_entry(11, "Haaland Globetrotters", "Ana", vec![55, 61, 48])
            .with_entry(12, "Saka Potatoes", "Ben", vec![70, 42, 66])
    }

    #[test]
    fn roster_preserves_insertion_order() {
        let roster = snapshot().list_participants(LeagueId(542576)).expect("test: roster");
        let ids: Vec<u64> = roster.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![11, 12]);
        assert_eq!(roster[1].manager, "Ben");
    }

    #[test]
    fn wrong_league_is_unavailable() {
        let err = snapshot().list_participants(LeagueId(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataUnavailable);
    }

    #[test]
    fn unknown_participant_is_unavailable() {
        let err = snapshot().round_history(ParticipantId(99)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataUnavailable);
        assert!(snapshot().participant_label(ParticipantId(99)).is_err());
    }

    #[test]
    fn history_and_label_lookup() {
        let snap = snapshot();
        let history = snap.round_history(ParticipantId(12)).expect("test: history");
        assert_eq!(history.points(), &[70, 42, 66]);
        let label = snap.participant_label(ParticipantId(11)).expect("test: label");
        assert_eq!(label.name, "Haaland Globetrotters");
    }

    #[test]
    fn parses_json_snapshot() {
        let json = r#"{
            "league": 7,
            "name": "Family",
            "entries": [
                { "id": 1, "name": "A", "manager": "x", "history": [50, 60] },
                { "id": 2, "name": "B", "manager": "y", "history": [40] }
            ]
        }"#;
        let snap = LeagueSnapshot::from_json_str(json).expect("test: snapshot should parse");
        assert_eq!(snap.league, LeagueId(7));
        assert_eq!(snap.entries.len(), 2);
        assert_eq!(snap.entries[0].history.total(), 110);
    }

    #[test]
    fn malformed_json_is_unavailable() {
        let err = LeagueSnapshot::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataUnavailable);
    }
}
