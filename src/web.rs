use crate::{
    app::{App, AppError},
    catalog::CatalogItem,
    semantic::ThemeMatch,
};
use axum::{
    body::Bytes,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::signal;

#[derive(Clone)]
struct SharedState {
    app: Arc<App>,
}

/// Build the HTTP router. Exposed separately from the daemon so tests can
/// drive it with `tower::ServiceExt::oneshot`.
pub(crate) fn router(app: Arc<App>) -> Router {
    let shared_state = Arc::new(SharedState { app });

    Router::new()
        .route("/nudge_theme", post(nudge_theme))
        .route("/semantic_suggestions", post(semantic_suggestions))
        .route("/translate", post(translate))
        .route("/health", get(health))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state)
}

/// Listen-port precedence: the explicit --port flag, then the PORT env
/// var, then the config file. An unparsable env value is ignored.
pub fn resolve_port(flag: Option<u16>, env_port: Option<&str>, config_port: u16) -> u16 {
    flag.or_else(|| env_port.and_then(|p| p.parse().ok()))
        .unwrap_or(config_port)
}

async fn start_app(app: App) {
    let port = app.config().port;

    let router = router(Arc::new(app));

    async fn shutdown_signal() {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("failed to install Ctrl+C handler");
        };

        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await.unwrap();
    log::info!("listening on 0.0.0.0:{port}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

pub fn start_daemon(app: App) {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async { start_app(app).await });
}

// Make our own error that wraps `AppError`.
#[derive(Debug)]
struct HttpError(AppError);

// Tell axum how to convert `AppError` into a response. One policy for every
// route: any capability-layer failure is logged and surfaced as a
// structured 500. Empty input never reaches this path.
impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        log::error!("{self:?}");
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": self.0.to_string()}).to_string(),
        )
            .into_response()
    }
}

// This enables using `?` on functions that return `Result<_, AppError>` to
// turn them into `Result<_, HttpError>`.
impl<E> From<E> for HttpError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Parse a request body leniently: anything that is not valid JSON of the
/// expected shape becomes the default (empty) request, which downstream
/// reduces to the empty-input response.
fn lenient_json<T: Default + serde::de::DeserializeOwned>(body: &Bytes) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NudgeThemeRequest {
    #[serde(default)]
    pub summary: String,
}

async fn nudge_theme(
    State(state): State<Arc<SharedState>>,
    body: Bytes,
) -> Result<axum::Json<ThemeMatch>, HttpError> {
    let payload: NudgeThemeRequest = lenient_json(&body);
    log::debug!("payload: {payload:?}");

    let app = state.app.clone();

    tokio::task::block_in_place(move || {
        app.nudge(&payload.summary).map(Json).map_err(Into::into)
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SemanticSuggestionsRequest {
    #[serde(default)]
    pub query: String,

    /// Full catalog override; replaces the default catalog when present
    /// and non-empty. A mistyped override falls back to the default
    /// catalog instead of discarding the whole request.
    #[serde(default, deserialize_with = "lenient_products")]
    pub products: Option<Vec<CatalogItem>>,
}

fn lenient_products<'de, D>(deserializer: D) -> Result<Option<Vec<CatalogItem>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

async fn semantic_suggestions(
    State(state): State<Arc<SharedState>>,
    body: Bytes,
) -> Result<axum::Json<Vec<CatalogItem>>, HttpError> {
    let payload: SemanticSuggestionsRequest = lenient_json(&body);
    log::debug!("query: {:?}", payload.query);

    let app = state.app.clone();

    tokio::task::block_in_place(move || {
        app.suggest(&payload.query, payload.products)
            .map(Json)
            .map_err(Into::into)
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslateResponse {
    pub translation: String,
}

async fn translate(
    State(state): State<Arc<SharedState>>,
    body: Bytes,
) -> Result<axum::Json<TranslateResponse>, HttpError> {
    let payload: TranslateRequest = lenient_json(&body);

    let app = state.app.clone();

    tokio::task::block_in_place(move || {
        app.translate(&payload.text)
            .map(|translation| Json(TranslateResponse { translation }))
            .map_err(Into::into)
    })
}

/// Liveness probe; independent of model state by construction.
async fn health() -> axum::Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}
