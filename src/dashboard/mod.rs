use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::dates::{add_days, friendly_date, long_date, today_et};
use crate::live_scores::poller::PollerState;
use crate::live_scores::ticker::sections;
use crate::live_scores::{ScorePoller, TickerView};
use crate::models::{DateKey, SnapshotView};

#[derive(Clone)]
pub struct AppState {
    pub poller: ScorePoller,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub hidden: bool,
}

#[derive(Debug, Deserialize)]
pub struct DateRequest {
    pub date: String,
}

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/scores", get(scores_handler))
        .route("/api/ticker", get(ticker_handler))
        .route("/api/board", get(board_handler))
        .route("/api/status", get(status_handler))
        .route("/api/visibility", post(visibility_handler))
        .route("/api/date", post(date_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn index_handler() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

/// GET /api/scores
async fn scores_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.poller.get_snapshot() {
        SnapshotView::Loading => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "loading" })),
        ),
        SnapshotView::Ready(snap) => (StatusCode::OK, Json(json!(&*snap))),
    }
}

/// GET /api/ticker
async fn ticker_handler(State(state): State<Arc<AppState>>) -> Json<TickerView> {
    Json(TickerView::from_view(&state.poller.get_snapshot()))
}

/// GET /api/board: the active date's games grouped into labelled sections
async fn board_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let today = today_et();
    let key = state.poller.date();
    let date = match key {
        DateKey::Today => today,
        DateKey::Date(d) => d,
    };
    let view = state.poller.get_snapshot();
    let blocks = view.snapshot().map(sections).unwrap_or_default();

    Json(json!({
        "date": date.format("%Y-%m-%d").to_string(),
        "label": friendly_date(date, today),
        "longLabel": long_date(date),
        "isToday": date == today,
        "prev": add_days(date, -1).format("%Y-%m-%d").to_string(),
        "next": add_days(date, 1).format("%Y-%m-%d").to_string(),
        "loading": view.is_loading(),
        "sections": blocks,
    }))
}

/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "state": state.poller.state(),
        "date": state.poller.date().to_string(),
    }))
}

/// POST /api/visibility {"hidden": bool}
async fn visibility_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VisibilityRequest>,
) -> StatusCode {
    state.poller.on_visibility_change(req.hidden);
    StatusCode::NO_CONTENT
}

/// POST /api/date {"date": "today" | "YYYY-MM-DD"}
async fn date_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if state.poller.state() == PollerState::Stopped {
        return Err((StatusCode::CONFLICT, "score poller is stopped".to_string()));
    }
    let key: DateKey = req
        .date
        .parse()
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("invalid date '{}': {}", req.date, e)))?;
    info!("Dashboard switched date to {}", key);
    state.poller.start(key);
    Ok(Json(json!({ "date": key.to_string() })))
}

/// Embedded single-file dashboard (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Courtside Ticker</title>
<style>
  :root {
    --bg: #08080a;
    --card: rgba(255,255,255,0.03);
    --border: rgba(255,255,255,0.07);
    --red: #ff4747;
    --gold: #f7e998;
    --text: #fff;
    --muted: #888899;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  .ticker { height: 36px; display: flex; align-items: center; overflow: hidden; border-bottom: 1px solid rgba(255,71,71,.1); background: rgba(8,8,10,.82); }
  .ticker .tag { padding: 0 14px; font-size: .65rem; font-weight: 800; letter-spacing: 1.5px; color: var(--red); border-right: 1px solid rgba(255,71,71,.15); height: 100%; display: flex; align-items: center; }
  .ticker .area { flex: 1; overflow: hidden; padding: 0 12px; }
  .ticker .updated { padding: 0 12px; font-size: .65rem; color: #444; white-space: nowrap; }
  .empty { font-size: .75rem; color: #555; }
  @keyframes tickerScroll { 0% { transform: translateX(0); } 100% { transform: translateX(-50%); } }
  .track { display: flex; gap: 12px; width: max-content; animation: tickerScroll var(--scroll-dur, 40s) linear infinite; }
  .track:hover { animation-play-state: paused; }
  .chip { display: inline-flex; padding: 5px 14px; border-radius: 30px; white-space: nowrap; font-size: .8rem; font-weight: 600; border: 1px solid var(--border); background: rgba(255,255,255,.04); }
  .chip.live { border-color: rgba(255,71,71,.25); background: rgba(255,71,71,.08); color: var(--gold); }
  main { max-width: 760px; margin: 0 auto; padding: 40px 16px 100px; }
  h1 { font-size: 2rem; font-weight: 900; margin-bottom: 24px; }
  .nav { display: flex; align-items: center; justify-content: space-between; gap: 12px; background: var(--card); border: 1px solid var(--border); border-radius: 14px; padding: 10px 16px; margin-bottom: 24px; }
  .nav button { background: transparent; border: 1px solid var(--border); color: var(--text); padding: 8px 16px; border-radius: 8px; cursor: pointer; }
  .nav .center { text-align: center; flex: 1; }
  .nav .label { font-size: 1.2rem; font-weight: 800; }
  .nav .label.today { color: var(--gold); }
  .nav .long { font-size: .75rem; color: #555; }
  .section { font-size: .7rem; font-weight: 800; letter-spacing: 1.5px; margin: 28px 0 12px; color: var(--muted); }
  .section.live { color: var(--red); }
  .card { display: flex; align-items: center; gap: 16px; background: var(--card); border: 1px solid var(--border); border-radius: 16px; padding: 16px 20px; margin-bottom: 10px; }
  .card.live { border-color: rgba(255,71,71,.3); }
  .card .team { flex: 1; }
  .card .team.home { text-align: right; }
  .card .name { font-size: .75rem; color: #555; }
  .card .score { min-width: 110px; text-align: center; font-size: 1.5rem; font-weight: 800; }
  .win { font-weight: 800; }
</style>
</head>
<body>
<div class="ticker">
  <span class="tag">NBA</span>
  <div class="area" id="ticker-area"><span class="empty">Loading scores…</span></div>
  <div class="updated" id="updated"></div>
</div>

<main>
  <h1>NBA Scores</h1>
  <div class="nav">
    <button onclick="go(board.prev)">← Prev</button>
    <div class="center">
      <div class="label" id="date-label">–</div>
      <div class="long" id="date-long"></div>
    </div>
    <button onclick="go(board.next)">Next →</button>
  </div>
  <div style="text-align:center" id="today-wrap" hidden><button onclick="go('today')">↩ Back to Today</button></div>
  <div id="board"><div class="empty">Loading…</div></div>
</main>

<script>
let board = {};

function esc(s) { return String(s ?? '').replace(/[&<>"]/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;'}[c])); }

async function loadTicker() {
  const r = await fetch('/api/ticker');
  const t = await r.json();
  const area = document.getElementById('ticker-area');
  document.getElementById('updated').textContent = t.last_updated ? '↻ ' + t.last_updated : '';
  if (t.message) { area.innerHTML = `<span class="empty">${esc(t.message)}</span>`; return; }
  const chips = t.chips.map(c => `<span class="chip ${c.status}">${esc(c.label)}</span>`).join('');
  area.innerHTML = `<div class="track" style="--scroll-dur:${t.scroll_duration_ms}ms">${chips}${chips}</div>`;
}

function card(g, live) {
  const fin = g.status === 'final';
  const mid = (live || fin) ? `${g.awayScore} – ${g.homeScore}` : 'vs';
  const aw = fin && g.awayScore > g.homeScore ? 'win' : '';
  const hw = fin && g.homeScore > g.awayScore ? 'win' : '';
  return `<div class="card ${live ? 'live' : ''}">
    <div class="team ${aw}">${esc(g.awayTeam.abbreviation)}<div class="name">${esc(g.awayTeam.name)}</div></div>
    <div class="score">${mid}</div>
    <div class="team home ${hw}">${esc(g.homeTeam.abbreviation)}<div class="name">${esc(g.homeTeam.name)}</div></div>
  </div>`;
}

async function loadBoard() {
  const r = await fetch('/api/board');
  board = await r.json();
  const label = document.getElementById('date-label');
  label.textContent = board.label;
  label.className = 'label' + (board.isToday ? ' today' : '');
  document.getElementById('date-long').textContent = board.longLabel;
  document.getElementById('today-wrap').hidden = board.isToday;
  const el = document.getElementById('board');
  if (board.loading) { el.innerHTML = '<div class="empty">Loading…</div>'; return; }
  if (!board.sections.length) { el.innerHTML = `<div class="empty">No games on ${esc(board.label)}</div>`; return; }
  el.innerHTML = board.sections.map(s => {
    const live = s.label === 'LIVE NOW';
    return `<div class="section ${live ? 'live' : ''}">${s.label} · ${s.count}</div>` + s.games.map(g => card(g, live)).join('');
  }).join('');
}

async function go(date) {
  await fetch('/api/date', { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify({ date }) });
  loadAll();
}

function loadAll() {
  loadTicker().catch(() => {});
  loadBoard().catch(() => {});
}

document.addEventListener('visibilitychange', () => {
  fetch('/api/visibility', { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify({ hidden: document.hidden }) });
  if (!document.hidden) loadAll();
});

loadAll();
setInterval(loadAll, 5000);
</script>
</body>
</html>
"#;
