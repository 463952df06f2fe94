use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::dune::DuneClient;
use crate::frames::{
    cast_image_url, frame_html, frame_image_url, hours_lines, stats_lines, tier_lines,
    FramePayload, Screen, ScreenContent,
};
use crate::neynar::{ActionContext, NeynarClient};
use crate::openai::OpenAiClient;
use crate::RecommendationPick;

#[derive(Clone)]
struct AppState {
    config: AppConfig,
    dune: DuneClient,
    neynar: NeynarClient,
    openai: Option<OpenAiClient>,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

pub async fn serve(config: AppConfig) -> Result<(), String> {
    let dune = DuneClient::from_config(&config.dune)?;
    let neynar = NeynarClient::from_config(&config.neynar)?;
    let openai = OpenAiClient::from_config(&config.openai);
    if openai.is_none() {
        warn!("OPENAI_API_KEY is not set; summary endpoints are disabled");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    let state = AppState {
        config,
        dune,
        neynar,
        openai,
    };

    let app = Router::new()
        .route("/", get(home_frame).post(home_frame))
        .route("/frames/:screen", get(screen_initial).post(screen_action))
        .route("/actions/top-mentions", post(top_mentions_action))
        .route("/actions/top-mentions/:hash", get(top_mentions_by_hash))
        .route("/api/recommendations/:fid", get(recommendations))
        .route("/api/health", get(health))
        .with_state(state);

    info!("listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| format!("failed to bind server: {}", err))?,
        app,
    )
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn home_frame(State(state): State<AppState>) -> Html<String> {
    let content = ScreenContent::titled(Screen::Home);
    let image = frame_image_url(&state.config.render.image_base, &content);
    Html(frame_html(
        &content.title,
        &image,
        next_post_url(&state, Screen::Home).as_deref(),
    ))
}

/// Initial GET loads (crawlers, previews) render the screen shell without
/// fetching anything.
async fn screen_initial(
    State(state): State<AppState>,
    Path(screen): Path<String>,
) -> Result<Html<String>, (StatusCode, String)> {
    let screen = parse_screen(&screen)?;
    render_screen(&state, screen, None).await
}

/// Button presses POST a signed payload. The metric is fetched only when the
/// signature validates; verification failures fall back to the shell
/// (silent verification).
async fn screen_action(
    State(state): State<AppState>,
    Path(screen): Path<String>,
    Json(payload): Json<FramePayload>,
) -> Result<Html<String>, (StatusCode, String)> {
    let screen = parse_screen(&screen)?;
    let action = verify_payload(&state, &payload).await;
    let fid = action.and_then(|action| action.fid);
    if let Some(fid) = fid {
        info!(fid, screen = screen.path(), "serving verified frame");
    }
    render_screen(&state, screen, fid).await
}

async fn render_screen(
    state: &AppState,
    screen: Screen,
    fid: Option<u64>,
) -> Result<Html<String>, (StatusCode, String)> {
    let post_url = next_post_url(state, screen);

    let fid = match fid {
        Some(fid) => fid,
        None => {
            let content = ScreenContent::placeholder(screen);
            let image = frame_image_url(&state.config.render.image_base, &content);
            return Ok(Html(frame_html(&content.title, &image, post_url.as_deref())));
        }
    };

    let mut content = ScreenContent::titled(screen);
    let mut image_override = None;

    match screen {
        Screen::Home => {}
        Screen::ThirtyDayStats => {
            let row = state.dune.fid_stats(fid).await.map_err(upstream_error)?;
            content.lines = stats_lines(&row);
        }
        Screen::ActiveHours => {
            let grid = state.dune.active_hours(fid).await.map_err(upstream_error)?;
            content.lines = hours_lines(&grid);
        }
        Screen::ActiveChannels => {
            content.lines = state.dune.top_channels(fid).await.map_err(upstream_error)?;
        }
        Screen::FollowerTiers => {
            let tiers = state
                .dune
                .follower_tiers(fid)
                .await
                .map_err(upstream_error)?;
            content.lines = tier_lines(&tiers);
        }
        Screen::TopCast => {
            let row = state.dune.top_cast(fid).await.map_err(upstream_error)?;
            if let Some(hash) = row.get("hash").and_then(|value| value.as_str()) {
                image_override =
                    Some(cast_image_url(&state.config.render.cast_image_base, hash));
            }
        }
        Screen::TrendingWords => {
            content.lines = state
                .dune
                .trending_words(fid)
                .await
                .map_err(upstream_error)?;
        }
    }

    let image = image_override
        .unwrap_or_else(|| frame_image_url(&state.config.render.image_base, &content));
    Ok(Html(frame_html(&content.title, &image, post_url.as_deref())))
}

/// Cast-action endpoint: validates the signed payload, then summarizes the
/// replies under the cast it was invoked on. Invalid signatures get the only
/// deliberate error status in the system.
async fn top_mentions_action(
    State(state): State<AppState>,
    Json(payload): Json<FramePayload>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, String)> {
    let trusted = match payload.trusted_data.as_ref() {
        Some(trusted) => trusted,
        None => return Ok(unauthorized()),
    };

    let action = state
        .neynar
        .validate_action(&trusted.message_bytes)
        .await
        .map_err(upstream_error)?;

    let cast_hash = match action.and_then(|action| action.cast_hash) {
        Some(hash) => hash,
        None => return Ok(unauthorized()),
    };

    info!(cast_hash = %cast_hash, "fetching conversation for validated action");
    let message = summarize_cast(&state, &cast_hash).await?;
    Ok((StatusCode::OK, Json(MessageResponse { message })))
}

async fn top_mentions_by_hash(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let message = summarize_cast(&state, &hash).await?;
    Ok(Json(MessageResponse { message }))
}

async fn recommendations(
    State(state): State<AppState>,
    Path(fid): Path<u64>,
) -> Result<Json<Vec<RecommendationPick>>, (StatusCode, String)> {
    let picks = state
        .dune
        .recommendations(fid)
        .await
        .map_err(upstream_error)?;
    Ok(Json(picks))
}

async fn summarize_cast(state: &AppState, cast_hash: &str) -> Result<String, (StatusCode, String)> {
    let openai = state.openai.as_ref().ok_or((
        StatusCode::INTERNAL_SERVER_ERROR,
        "summarizer not configured: set OPENAI_API_KEY".to_string(),
    ))?;

    let conversation = state
        .neynar
        .conversation(cast_hash)
        .await
        .map_err(upstream_error)?;

    openai
        .summarize_replies(&conversation.cast_text, &conversation.replies)
        .await
        .map_err(upstream_error)
}

async fn verify_payload(state: &AppState, payload: &FramePayload) -> Option<ActionContext> {
    let trusted = payload.trusted_data.as_ref()?;
    match state.neynar.validate_action(&trusted.message_bytes).await {
        Ok(action) => action,
        Err(err) => {
            warn!("action verification failed: {}", err);
            None
        }
    }
}

fn next_post_url(state: &AppState, screen: Screen) -> Option<String> {
    screen.next().map(|next| {
        format!(
            "{}/frames/{}",
            state.config.server.public_url.trim_end_matches('/'),
            next.path()
        )
    })
}

fn parse_screen(value: &str) -> Result<Screen, (StatusCode, String)> {
    Screen::from_path(value)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown screen: {}", value)))
}

fn upstream_error(err: String) -> (StatusCode, String) {
    (StatusCode::BAD_GATEWAY, err)
}

fn unauthorized() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(MessageResponse {
            message: "Unauthorized".to_string(),
        }),
    )
}
