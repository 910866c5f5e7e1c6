//! Single binary web server: JSON API over the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpResponseBuilder, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use ladder_tournament::csv_io::{self, CsvError};
use ladder_tournament::models::DEFAULT_RATING;
use ladder_tournament::{
    recommended, repair, report_result, reset_result, start_tournament, ErrorKind, MatchId,
    PlayerId, SetScore, Tournament, TournamentConfig, TournamentError, TournamentId,
    TournamentStore,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

type AppState = Data<TournamentStore>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

const DEFAULT_RECOMMENDATIONS: usize = 5;

struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        Self { host, port }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    config: TournamentConfig,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    rating: Option<i32>,
}

#[derive(Deserialize)]
struct ReportResultBody {
    winner: PlayerId,
    sets: Vec<SetScore>,
    /// Completion time; defaults to now.
    at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RecommendedQuery {
    group: Option<usize>,
    limit: Option<usize>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and player id
#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: PlayerId,
}

/// Path segments: tournament id and match id
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

/// JSON `{ "error": ... }` body with the given status.
fn error_body(mut builder: HttpResponseBuilder, err: &dyn fmt::Display) -> HttpResponse {
    builder.json(serde_json::json!({ "error": err.to_string() }))
}

fn error_response(err: &TournamentError) -> HttpResponse {
    match err.kind() {
        ErrorKind::NotFound => error_body(HttpResponse::NotFound(), err),
        ErrorKind::InvalidInput | ErrorKind::ConsistencyViolation => {
            error_body(HttpResponse::BadRequest(), err)
        }
    }
}

/// Serialize `Ok` as JSON, map errors by kind.
fn respond<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "ladder-tournament",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let tournament = Tournament::new(body.name.trim(), body.config);
    let response = HttpResponse::Ok().json(&tournament);
    state.insert(tournament);
    response
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.read(path.id, Tournament::clone))
}

/// Register a participant (Setup only).
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddPlayerBody>,
) -> HttpResponse {
    respond(state.update(path.id, |t| {
        t.add_player(body.name.trim(), body.rating.unwrap_or(DEFAULT_RATING))?;
        Ok(t.clone())
    }))
}

/// Register participants from a `name,rating` CSV body (Setup only).
#[post("/api/tournaments/{id}/players/import")]
async fn api_import_players(
    state: AppState,
    path: Path<TournamentPath>,
    body: String,
) -> HttpResponse {
    let result = state.update(path.id, |t| {
        csv_io::import_participants(t, body.as_bytes())?;
        Ok::<_, CsvError>(t.clone())
    });
    match result {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(CsvError::Tournament(e)) => error_response(&e),
        Err(e) => error_body(HttpResponse::BadRequest(), &e),
    }
}

/// Remove a participant by id (Setup only).
#[delete("/api/tournaments/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    respond(state.update(path.id, |t| {
        t.remove_player(path.player_id)?;
        Ok(t.clone())
    }))
}

/// Start the tournament (Setup -> schedule generated).
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.update(path.id, |t| {
        start_tournament(t)?;
        Ok(t.clone())
    }))
}

#[post("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_report_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ReportResultBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let at = body.at.unwrap_or_else(Utc::now);
    respond(state.update(path.id, |t| {
        report_result(t, path.match_id, body.winner, body.sets, at)?;
        Ok(t.clone())
    }))
}

#[post("/api/tournaments/{id}/matches/{match_id}/reset")]
async fn api_reset_result(state: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    respond(state.update(path.id, |t| {
        reset_result(t, path.match_id)?;
        Ok(t.clone())
    }))
}

/// Elimination rounds for bracket rendering.
#[get("/api/tournaments/{id}/bracket")]
async fn api_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.read(path.id, |t| serde_json::to_value(t.rounds())) {
        Ok(Ok(rounds)) => HttpResponse::Ok().json(rounds),
        Ok(Err(e)) => error_body(HttpResponse::InternalServerError(), &e),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.read(path.id, |t| {
        let groups: Vec<_> = t
            .groups
            .iter()
            .map(|g| serde_json::json!({ "name": g.name, "standings": g.standings }))
            .collect();
        serde_json::json!({ "standings": t.standings, "groups": groups })
    }))
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let result = state.read(path.id, |t| {
        let mut out = Vec::new();
        csv_io::write_standings(&mut out, t, &t.standings).map(|_| out)
    });
    match result {
        Ok(Ok(csv)) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(csv),
        Ok(Err(e)) => error_body(HttpResponse::InternalServerError(), &e),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/recommended")]
async fn api_recommended(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<RecommendedQuery>,
) -> HttpResponse {
    let limit = query.limit.unwrap_or(DEFAULT_RECOMMENDATIONS);
    respond(
        state
            .read(path.id, |t| recommended(t, query.group, limit))
            .and_then(|r| r),
    )
}

#[get("/api/tournaments/{id}/rating-history")]
async fn api_rating_history(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.read(path.id, |t| t.rating_history.clone()))
}

/// Rebuild ratings, streaks and standings from the match log.
#[post("/api/tournaments/{id}/recompute")]
async fn api_recompute(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.update(path.id, |t| {
        repair(t)?;
        Ok(t.clone())
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(TournamentStore::new());

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let removed = state_cleanup.evict_inactive(INACTIVITY_TIMEOUT);
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_player)
            .service(api_import_players)
            .service(api_remove_player)
            .service(api_start_tournament)
            .service(api_report_result)
            .service(api_reset_result)
            .service(api_bracket)
            .service(api_standings)
            .service(api_standings_csv)
            .service(api_recommended)
            .service(api_rating_history)
            .service(api_recompute)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
