use super::{read_source, resolve};
use crate::config::Config;
use crate::playground::{render_page, INITIAL_SOURCE};
use anyhow::Result;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse,
    },
    routing::get,
    Router,
};
use clap::Args;
use colored::Colorize;
use futures::stream::Stream;
use livepad_controller::{Controller, ControllerState, ControllerStatus, RunOutcome};
use livepad_sandbox::{ChannelHost, SandboxPolicy};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use tower_http::cors::CorsLayer;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Load this component and reload it when it changes on disk
    #[arg(short, long)]
    pub watch: Option<PathBuf>,

    /// Quiet period in milliseconds (overrides config)
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

pub fn serve(args: ServeArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_server(args, config, cwd))
}

/// Shared state for HTTP handlers
pub struct AppState {
    controller: Controller,
    host: Arc<ChannelHost>,
    page: String,
}

impl AppState {
    pub fn new(controller: Controller, host: Arc<ChannelHost>) -> Self {
        Self {
            controller,
            host,
            page: render_page(&SandboxPolicy::default()),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/api/preview", get(preview_sse_handler))
        .route("/api/source", get(source_handler).post(update_source_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

async fn run_server(args: ServeArgs, config: Config, cwd: &Path) -> Result<()> {
    let quiet_period = args
        .debounce_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.quiet_period());

    let host = Arc::new(ChannelHost::new());
    let controller = Controller::new(host.clone(), quiet_period)?;

    let watch_path = args.watch.as_deref().map(|p| resolve(cwd, p));
    let initial = initial_source(watch_path.as_deref(), &config, cwd)?;
    controller.on_change(initial);
    let startup = controller.clone();
    let first_run = tokio::task::spawn_blocking(move || startup.run_now()).await?;
    if let RunOutcome::Failed(failure) = first_run.outcome {
        println!("{} {}", "⚠️".yellow(), failure.message().yellow());
    }

    let _watcher = match &watch_path {
        Some(path) => Some(watch_file(path, controller.clone())?),
        None => None,
    };

    let addr = format!(
        "{}:{}",
        args.host.as_deref().unwrap_or(&config.host),
        args.port.unwrap_or(config.port)
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("{}", "🚀 Livepad playground running".green().bold());
    println!("   URL:   http://{}", addr);
    if let Some(path) = &watch_path {
        println!("   Watch: {}", path.display());
    }
    println!("   Quiet period: {}ms", quiet_period.as_millis());

    let state = Arc::new(AppState::new(controller, host));
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Watched file, then the configured entry, then the built-in template
fn initial_source(watch_path: Option<&Path>, config: &Config, cwd: &Path) -> Result<String> {
    if let Some(path) = watch_path {
        return read_source(path);
    }

    let entry = config.entry_path(cwd);
    if entry.exists() {
        return read_source(&entry);
    }

    Ok(INITIAL_SOURCE.to_string())
}

fn watch_file(path: &Path, controller: Controller) -> Result<RecommendedWatcher> {
    let target = path.to_path_buf();
    let file_name = target.file_name().map(|n| n.to_os_string());

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| match res {
            Ok(event) => {
                let touches_target = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);

                if touches_target && (event.kind.is_modify() || event.kind.is_create()) {
                    if let Err(e) = controller.on_file_change(&target) {
                        tracing::warn!("failed to reload {}: {}", target.display(), e);
                    }
                }
            }
            Err(e) => tracing::warn!("watch error: {}", e),
        },
        notify::Config::default(),
    )?;

    // editors often replace the file, so watch its directory
    let dir = path.parent().unwrap_or(path);
    watcher.watch(dir, RecursiveMode::NonRecursive)?;

    Ok(watcher)
}

async fn page_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}

#[derive(Debug, Serialize, Deserialize)]
struct SourcePayload {
    source: String,
}

async fn source_handler(State(state): State<Arc<AppState>>) -> Json<SourcePayload> {
    Json(SourcePayload {
        source: state.controller.source(),
    })
}

async fn update_source_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SourcePayload>,
) -> impl IntoResponse {
    tracing::debug!(bytes = update.source.len(), "source update received");
    state.controller.on_change(update.source);
    StatusCode::ACCEPTED
}

/// SSE endpoint streaming source, state, preview and error events
async fn preview_sse_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::info!("preview stream opened");

    let sources = WatchStream::new(state.controller.subscribe_source())
        .map(|source| json_event("source", &SourcePayload { source }));

    let statuses = WatchStream::new(state.controller.subscribe()).map(|status| status_event(&status));

    let previews = WatchStream::new(state.host.subscribe())
        .filter_map(|doc| doc.map(|doc| json_event("preview", doc.as_ref())));

    let combined = sources.merge(statuses).merge(previews);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn status_event(status: &ControllerStatus) -> Result<Event, Infallible> {
    match status.state {
        ControllerState::Failed(_) => json_event("error", status),
        _ => json_event("state", status),
    }
}

fn json_event<T: Serialize>(name: &str, payload: &T) -> Result<Event, Infallible> {
    let json = serde_json::to_string(payload).unwrap_or_default();
    Ok(Event::default().event(name).data(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> (Router, Controller) {
        let host = Arc::new(ChannelHost::new());
        let controller = Controller::new(host.clone(), Duration::from_millis(300)).unwrap();
        let state = Arc::new(AppState::new(controller.clone(), host));
        (router(state), controller)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_playground_page() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains("sandbox=\"allow-scripts\""));
        assert!(page.contains("new EventSource('/api/preview')"));
    }

    #[tokio::test]
    async fn test_post_source_is_accepted() {
        let (app, controller) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/source")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"source":"export default () => null;"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(controller.source(), "export default () => null;");
        assert_eq!(controller.status().state, ControllerState::Pending);
    }

    #[tokio::test]
    async fn test_get_source() {
        let (app, controller) = app();
        controller.on_change("const a = 1;");

        let response = app
            .oneshot(Request::builder().uri("/api/source").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let payload: SourcePayload = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(payload.source, "const a = 1;");
    }

    #[test]
    fn test_initial_source_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        assert_eq!(initial_source(None, &config, dir.path()).unwrap(), INITIAL_SOURCE);

        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/App.jsx"), "entry").unwrap();
        assert_eq!(initial_source(None, &config, dir.path()).unwrap(), "entry");

        let watched = dir.path().join("Watched.jsx");
        std::fs::write(&watched, "watched").unwrap();
        assert_eq!(
            initial_source(Some(&watched), &config, dir.path()).unwrap(),
            "watched"
        );
    }
}
