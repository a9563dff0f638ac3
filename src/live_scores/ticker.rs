//! Render-ready views over a [`ScoreSnapshot`].
//!
//! Everything here is a pure function of the snapshot it is given, so the
//! display layer can recompute it on every snapshot change.

use chrono::{DateTime, Utc};
use chrono_tz::America::New_York;
use serde::Serialize;
use std::time::Duration;

use crate::models::{GameState, GameStatus, ScoreSnapshot, Side, SnapshotView};

/// Intended on-screen dwell time per ticker chip.
pub const SCROLL_MS_PER_CHIP: u64 = 8_000;
pub const SCROLL_MIN_MS: u64 = 20_000;
pub const SCROLL_MAX_MS: u64 = 80_000;

pub const LOADING_MESSAGE: &str = "Loading scores…";
pub const EMPTY_MESSAGE: &str = "No games scheduled today";

/// Live games first, then finals, then upcoming. Server order is kept
/// within each block.
pub fn ordered_games(snapshot: &ScoreSnapshot) -> Vec<&GameState> {
    snapshot
        .live
        .iter()
        .chain(snapshot.r#final.iter())
        .chain(snapshot.upcoming.iter())
        .collect()
}

/// Length of one full ticker scroll cycle for `game_count` chips.
pub fn scroll_duration(game_count: usize) -> Duration {
    let ms = (game_count as u64).saturating_mul(SCROLL_MS_PER_CHIP);
    Duration::from_millis(ms.clamp(SCROLL_MIN_MS, SCROLL_MAX_MS))
}

/// "Q3 · 4:12", "OT1", or "" when the period is unknown.
pub fn format_clock(period: Option<u32>, clock: Option<&str>) -> String {
    let period = match period {
        Some(p) if p > 0 => p,
        _ => return String::new(),
    };
    let q = if period <= 4 {
        format!("Q{}", period)
    } else {
        format!("OT{}", period - 4)
    };
    match clock {
        Some(c) if !c.is_empty() => format!("{} · {}", q, c),
        _ => q,
    }
}

/// Tip-off time in US Eastern, e.g. "7:30 PM ET".
pub fn format_kickoff(kickoff: Option<&str>) -> String {
    let raw = match kickoff {
        Some(k) if !k.trim().is_empty() => k.trim(),
        _ => return "TBD".to_string(),
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => format!("{} ET", dt.with_timezone(&New_York).format("%-I:%M %p")),
        // Some backends already send a display string
        Err(_) => raw.to_string(),
    }
}

/// "7:05 PM" in league time (US Eastern), matching kickoff times. The host's
/// local zone says nothing about the viewer, so it is not used.
pub fn format_last_updated(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&New_York).format("%-I:%M %p").to_string()
}

/// Single-line chip text for the scrolling ticker.
pub fn chip_label(game: &GameState) -> String {
    let away = &game.away_team.abbreviation;
    let home = &game.home_team.abbreviation;
    match game.status {
        GameStatus::Live => {
            let mut label = format!(
                "LIVE {} {} – {} {}",
                away, game.away_score, game.home_score, home
            );
            let clock = format_clock(game.period, game.clock.as_deref());
            if !clock.is_empty() {
                label.push(' ');
                label.push_str(&clock);
            }
            label
        }
        GameStatus::Final => format!(
            "FINAL {} {} – {} {}",
            away, game.away_score, game.home_score, home
        ),
        GameStatus::Upcoming => format!(
            "{} @ {} {}",
            away,
            home,
            format_kickoff(game.kickoff.as_deref())
        ),
    }
}

/// A labelled block of the scores board.
#[derive(Debug, Clone, Serialize)]
pub struct Section<'a> {
    pub label: &'static str,
    pub count: usize,
    pub games: &'a [GameState],
}

/// Non-empty blocks in display order.
pub fn sections(snapshot: &ScoreSnapshot) -> Vec<Section<'_>> {
    [
        ("LIVE NOW", snapshot.live.as_slice()),
        ("FINAL", snapshot.r#final.as_slice()),
        ("UPCOMING", snapshot.upcoming.as_slice()),
    ]
    .into_iter()
    .filter(|(_, games)| !games.is_empty())
    .map(|(label, games)| Section {
        label,
        count: games.len(),
        games,
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerChip {
    pub id: String,
    pub status: GameStatus,
    pub label: String,
    pub winner: Option<Side>,
}

/// Everything the ticker strip needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerView {
    pub loading: bool,
    pub chips: Vec<TickerChip>,
    pub scroll_duration_ms: u64,
    pub last_updated: Option<String>,
    /// Placeholder text when there are no chips to show
    pub message: Option<&'static str>,
}

impl TickerView {
    pub fn from_view(view: &SnapshotView) -> Self {
        let Some(snapshot) = view.snapshot() else {
            return TickerView {
                loading: true,
                chips: Vec::new(),
                scroll_duration_ms: scroll_duration(0).as_millis() as u64,
                last_updated: None,
                message: Some(LOADING_MESSAGE),
            };
        };

        let chips: Vec<TickerChip> = ordered_games(snapshot)
            .into_iter()
            .map(|g| TickerChip {
                id: g.id.clone(),
                status: g.status,
                label: chip_label(g),
                winner: g.winner(),
            })
            .collect();

        TickerView {
            loading: false,
            scroll_duration_ms: scroll_duration(chips.len()).as_millis() as u64,
            message: chips.is_empty().then_some(EMPTY_MESSAGE),
            last_updated: snapshot.last_updated.as_ref().map(format_last_updated),
            chips,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Team;
    use std::sync::Arc;

    fn game(id: &str, status: GameStatus) -> GameState {
        GameState {
            id: id.to_string(),
            home_team: Team {
                abbreviation: "BOS".into(),
                name: "Boston Celtics".into(),
            },
            away_team: Team {
                abbreviation: "NYK".into(),
                name: "New York Knicks".into(),
            },
            home_score: 0,
            away_score: 0,
            status,
            period: None,
            clock: None,
            kickoff: None,
        }
    }

    fn snapshot(live: usize, fin: usize, upcoming: usize) -> ScoreSnapshot {
        ScoreSnapshot {
            live: (0..live)
                .map(|i| game(&format!("l{}", i), GameStatus::Live))
                .collect(),
            r#final: (0..fin)
                .map(|i| game(&format!("f{}", i), GameStatus::Final))
                .collect(),
            upcoming: (0..upcoming)
                .map(|i| game(&format!("u{}", i), GameStatus::Upcoming))
                .collect(),
            last_updated: None,
        }
    }

    #[test]
    fn test_scroll_duration_bounds() {
        assert_eq!(scroll_duration(0).as_millis(), 20_000);
        assert_eq!(scroll_duration(2).as_millis(), 20_000);
        assert_eq!(scroll_duration(3).as_millis(), 24_000);
        assert_eq!(scroll_duration(5).as_millis(), 40_000);
        assert_eq!(scroll_duration(10).as_millis(), 80_000);
        assert_eq!(scroll_duration(12).as_millis(), 80_000);
        assert_eq!(scroll_duration(usize::MAX).as_millis(), 80_000);
    }

    #[test]
    fn test_scroll_duration_matches_clamp_formula() {
        for n in 0..40u64 {
            let expected = (n * 8_000).clamp(20_000, 80_000);
            assert_eq!(scroll_duration(n as usize).as_millis() as u64, expected);
        }
    }

    #[test]
    fn test_ordered_games_block_precedence() {
        let snap = snapshot(3, 2, 1);
        let ids: Vec<&str> = ordered_games(&snap).iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["l0", "l1", "l2", "f0", "f1", "u0"]);
        assert_eq!(scroll_duration(ids.len()).as_millis(), 48_000);
    }

    #[test]
    fn test_ordered_games_keeps_server_order() {
        let mut snap = snapshot(0, 0, 0);
        snap.upcoming = vec![game("z", GameStatus::Upcoming), game("a", GameStatus::Upcoming)];
        snap.live = vec![game("m", GameStatus::Live), game("b", GameStatus::Live)];
        let ids: Vec<&str> = ordered_games(&snap).iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["m", "b", "z", "a"]);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(None, Some("1:00")), "");
        assert_eq!(format_clock(Some(0), None), "");
        assert_eq!(format_clock(Some(2), None), "Q2");
        assert_eq!(format_clock(Some(4), Some("0:37")), "Q4 · 0:37");
        assert_eq!(format_clock(Some(5), Some("3:10")), "OT1 · 3:10");
        assert_eq!(format_clock(Some(6), Some("")), "OT2");
    }

    #[test]
    fn test_format_kickoff() {
        assert_eq!(format_kickoff(None), "TBD");
        assert_eq!(format_kickoff(Some("  ")), "TBD");
        // 01:00Z on Oct 18 is 9 PM the previous evening in EDT
        assert_eq!(format_kickoff(Some("2026-10-18T01:00:00Z")), "9:00 PM ET");
        // EST after the November switch
        assert_eq!(format_kickoff(Some("2026-12-01T00:30:00Z")), "7:30 PM ET");
        assert_eq!(format_kickoff(Some("7:00 PM ET")), "7:00 PM ET");
    }

    #[test]
    fn test_chip_labels() {
        let mut live = game("1", GameStatus::Live);
        live.away_score = 88;
        live.home_score = 90;
        live.period = Some(3);
        live.clock = Some("4:12".into());
        assert_eq!(chip_label(&live), "LIVE NYK 88 – 90 BOS Q3 · 4:12");

        let mut fin = game("2", GameStatus::Final);
        fin.away_score = 101;
        fin.home_score = 99;
        assert_eq!(chip_label(&fin), "FINAL NYK 101 – 99 BOS");

        let up = game("3", GameStatus::Upcoming);
        assert_eq!(chip_label(&up), "NYK @ BOS TBD");
    }

    #[test]
    fn test_sections_skip_empty_blocks() {
        let snap = snapshot(0, 2, 1);
        let s = sections(&snap);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].label, "FINAL");
        assert_eq!(s[0].count, 2);
        assert_eq!(s[1].label, "UPCOMING");
    }

    #[test]
    fn test_ticker_view_loading() {
        let view = TickerView::from_view(&SnapshotView::Loading);
        assert!(view.loading);
        assert!(view.chips.is_empty());
        assert_eq!(view.message, Some(LOADING_MESSAGE));
    }

    #[test]
    fn test_ticker_view_empty_day() {
        let view = TickerView::from_view(&SnapshotView::Ready(Arc::new(snapshot(0, 0, 0))));
        assert!(!view.loading);
        assert_eq!(view.message, Some(EMPTY_MESSAGE));
        assert_eq!(view.scroll_duration_ms, 20_000);
    }

    #[test]
    fn test_ticker_view_ready() {
        let mut snap = snapshot(3, 2, 1);
        snap.last_updated = Some("2026-10-17T23:05:00Z".parse().unwrap());
        let view = TickerView::from_view(&SnapshotView::Ready(Arc::new(snap)));
        assert_eq!(view.chips.len(), 6);
        assert_eq!(view.chips[0].status, GameStatus::Live);
        assert_eq!(view.chips[5].status, GameStatus::Upcoming);
        // Finals with equal scores have no winner
        assert_eq!(view.chips[3].winner, None);
        assert_eq!(view.scroll_duration_ms, 48_000);
        assert_eq!(view.last_updated.as_deref(), Some("7:05 PM"));
        assert_eq!(view.message, None);
    }
}
