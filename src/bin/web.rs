//! Single binary web server: JSON API over the trivia leaderboard.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, LEADERBOARD_PATH, TRIVIA_CATEGORIES (comma separated).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::sync::RwLock;
use trivia_leaderboard::{AppConfig, GameSession, RegistryError, SessionError};

/// One session owns the registry; the lock keeps it single-writer across workers.
type AppState = Data<RwLock<GameSession>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    players: usize,
}

#[derive(Deserialize)]
struct CreatePlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct RenamePlayerBody {
    new_name: String,
}

#[derive(Deserialize)]
struct RecordAnswerBody {
    category: String,
    correct: bool,
}

/// Path segment: player name (e.g. /api/players/{name})
#[derive(Deserialize)]
struct PlayerPath {
    name: String,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn error_response(e: &SessionError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        SessionError::Registry(RegistryError::NotFound(_)) => HttpResponse::NotFound().json(body),
        SessionError::Registry(RegistryError::DuplicateKey(_))
        | SessionError::Registry(RegistryError::NameConflict(_)) => {
            HttpResponse::Conflict().json(body)
        }
        SessionError::Registry(_) => HttpResponse::BadRequest().json(body),
        SessionError::NoActiveRound(_) | SessionError::RoundFinished(_) => {
            HttpResponse::Conflict().json(body)
        }
        SessionError::Persistence(_) => HttpResponse::InternalServerError().json(body),
    }
}

#[get("/api/health")]
async fn api_health(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "trivia-leaderboard",
        players: g.registry().len(),
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> impl Responder {
    HttpResponse::NoContent().finish()
}

/// Leaderboard: score descending, then name.
#[get("/api/ranking")]
async fn api_ranking(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(g) => HttpResponse::Ok().json(g.ranking()),
        Err(_) => lock_error(),
    }
}

#[get("/api/categories")]
async fn api_categories(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(g) => HttpResponse::Ok().json(g.categories()),
        Err(_) => lock_error(),
    }
}

/// Spin the category wheel.
#[post("/api/spin")]
async fn api_spin(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.spin_category(&mut rand::thread_rng()) {
        Some(category) => HttpResponse::Ok().json(serde_json::json!({ "category": category })),
        None => HttpResponse::BadRequest().json(serde_json::json!({ "error": "No categories configured" })),
    }
}

/// Register a new player (name must be valid and unused).
#[post("/api/players")]
async fn api_create_player(state: AppState, body: Json<CreatePlayerBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.create_player(&body.name) {
        Ok(record) => HttpResponse::Created().json(record),
        Err(e) => error_response(&e),
    }
}

/// Get one player by exact name (404 if not found).
#[get("/api/players/{name}")]
async fn api_get_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.read_player(&path.name) {
        Some(record) => HttpResponse::Ok().json(record),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No player" })),
    }
}

/// Rename a player. Id and stats carry over.
#[put("/api/players/{name}")]
async fn api_rename_player(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<RenamePlayerBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if let Err(e) = g.rename_player(&path.name, &body.new_name) {
        return error_response(&e);
    }
    match g.read_player(body.new_name.trim()) {
        Some(record) => HttpResponse::Ok().json(record),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No player" })),
    }
}

#[delete("/api/players/{name}")]
async fn api_delete_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.delete_player(&path.name) {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "deleted": true })),
        Ok(false) => HttpResponse::NotFound().json(serde_json::json!({ "error": "No player" })),
        Err(e) => error_response(&e),
    }
}

/// Record one answered question for a player.
#[post("/api/players/{name}/answers")]
async fn api_record_answer(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<RecordAnswerBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if let Err(e) = g.record_answer(&path.name, &body.category, body.correct) {
        return error_response(&e);
    }
    match g.read_player(&path.name) {
        Some(record) => HttpResponse::Ok().json(record),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No player" })),
    }
}

/// Start (or restart) a round of ten questions for a player.
#[post("/api/players/{name}/round")]
async fn api_start_round(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.start_round(&path.name) {
        Ok(round) => HttpResponse::Created().json(round),
        Err(e) => error_response(&e),
    }
}

#[get("/api/players/{name}/round")]
async fn api_get_round(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.round(&path.name) {
        Some(round) => HttpResponse::Ok().json(round),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No round in progress" })),
    }
}

/// Record one answer in the player's current round (409 once the round is over).
#[post("/api/players/{name}/round/answers")]
async fn api_record_round_answer(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<RecordAnswerBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.record_round_answer(&path.name, &body.category, body.correct) {
        Ok(round) => HttpResponse::Ok().json(round),
        Err(e) => error_response(&e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    log::info!(
        "Using leaderboard {} with categories {:?}",
        config.leaderboard_path.display(),
        config.categories
    );
    let session = GameSession::open(&config.leaderboard_path, &config.categories);
    let state = Data::new(RwLock::new(session));

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_ranking)
            .service(api_categories)
            .service(api_spin)
            .service(api_create_player)
            .service(api_get_player)
            .service(api_rename_player)
            .service(api_delete_player)
            .service(api_record_answer)
            .service(api_start_round)
            .service(api_get_round)
            .service(api_record_round_answer)
    })
    .bind(bind)?
    .run()
    .await
}
