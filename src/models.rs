use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// One side of a matchup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// e.g. "BOS"
    pub abbreviation: String,
    /// e.g. "Boston Celtics"
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Upcoming,
    Live,
    Final,
}

/// A single game as reported by the score endpoint.
/// Never patched in place: a newer snapshot replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub home_team: Team,
    pub away_team: Team,
    #[serde(default)]
    pub home_score: i32,
    #[serde(default)]
    pub away_score: i32,
    pub status: GameStatus,
    /// 1–4 for regulation quarters, 5+ for overtime periods
    #[serde(default)]
    pub period: Option<u32>,
    /// Game clock within the period, e.g. "4:12"
    #[serde(default)]
    pub clock: Option<String>,
    /// Tip-off time as an ISO datetime
    #[serde(default)]
    pub kickoff: Option<String>,
}

/// Which team won a final game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl GameState {
    /// Winning side of a final game; `None` while in progress or on a tie.
    pub fn winner(&self) -> Option<Side> {
        if self.status != GameStatus::Final {
            return None;
        }
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// All games for one date, produced by exactly one successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub live: Vec<GameState>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub r#final: Vec<GameState>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub upcoming: Vec<GameState>,
    /// Unparsable timestamps are dropped rather than failing the snapshot
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl ScoreSnapshot {
    pub fn game_count(&self) -> usize {
        self.live.len() + self.r#final.len() + self.upcoming.len()
    }
}

/// What the display layer sees: nothing yet, or the latest good snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SnapshotView {
    #[default]
    Loading,
    Ready(Arc<ScoreSnapshot>),
}

impl SnapshotView {
    pub fn is_loading(&self) -> bool {
        matches!(self, SnapshotView::Loading)
    }

    pub fn snapshot(&self) -> Option<&ScoreSnapshot> {
        match self {
            SnapshotView::Loading => None,
            SnapshotView::Ready(snap) => Some(snap),
        }
    }
}

/// Selects which day's games to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DateKey {
    /// Let the server decide what "today" means
    #[default]
    Today,
    Date(NaiveDate),
}

impl DateKey {
    /// Value for the `date` query parameter, if one should be sent.
    pub fn query_value(&self) -> Option<String> {
        match self {
            DateKey::Today => None,
            DateKey::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateKey::Today => write!(f, "today"),
            DateKey::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("today") {
            return Ok(DateKey::Today);
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(DateKey::Date)
    }
}

/// Game ids show up as both JSON numbers and strings depending on the backend.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339 with offset, or a bare `YYYY-MM-DDTHH:MM:SS[.fff]` read as UTC.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => s,
        _ => return Ok(None),
    };
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    Ok(NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_id_accepts_number_and_string() {
        let from_num: GameState = serde_json::from_str(
            r#"{"id": 401, "homeTeam": {"abbreviation": "BOS", "name": "Celtics"},
                "awayTeam": {"abbreviation": "NYK", "name": "Knicks"},
                "homeScore": 0, "awayScore": 0, "status": "upcoming"}"#,
        )
        .unwrap();
        assert_eq!(from_num.id, "401");

        let from_str: GameState = serde_json::from_str(
            r#"{"id": "g-9", "homeTeam": {"abbreviation": "BOS", "name": "Celtics"},
                "awayTeam": {"abbreviation": "NYK", "name": "Knicks"},
                "homeScore": 0, "awayScore": 0, "status": "live", "period": 2, "clock": "1:02"}"#,
        )
        .unwrap();
        assert_eq!(from_str.id, "g-9");
        assert_eq!(from_str.status, GameStatus::Live);
        assert_eq!(from_str.period, Some(2));
    }

    #[test]
    fn test_snapshot_missing_blocks_default_empty() {
        let snap: ScoreSnapshot = serde_json::from_str(r#"{"live": []}"#).unwrap();
        assert!(snap.r#final.is_empty());
        assert!(snap.upcoming.is_empty());
        assert!(snap.last_updated.is_none());
        assert_eq!(snap.game_count(), 0);
    }

    #[test]
    fn test_date_key_parse_and_display() {
        assert_eq!("today".parse::<DateKey>().unwrap(), DateKey::Today);
        assert_eq!("".parse::<DateKey>().unwrap(), DateKey::Today);
        let key: DateKey = "2026-10-17".parse().unwrap();
        assert_eq!(key.to_string(), "2026-10-17");
        assert_eq!(key.query_value().as_deref(), Some("2026-10-17"));
        assert_eq!(DateKey::Today.query_value(), None);
        assert!("17/10/2026".parse::<DateKey>().is_err());
    }

    #[test]
    fn test_winner() {
        let mut g: GameState = serde_json::from_str(
            r#"{"id": 1, "homeTeam": {"abbreviation": "LAL"}, "awayTeam": {"abbreviation": "GSW"},
                "homeScore": 110, "awayScore": 104, "status": "final"}"#,
        )
        .unwrap();
        assert_eq!(g.winner(), Some(Side::Home));
        g.away_score = 120;
        assert_eq!(g.winner(), Some(Side::Away));
        g.away_score = 110;
        assert_eq!(g.winner(), None);
        g.status = GameStatus::Live;
        g.away_score = 0;
        assert_eq!(g.winner(), None);
    }
}
