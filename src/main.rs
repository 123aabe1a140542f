use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, subscriber::set_global_default, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

mod api;
mod cache;
mod config;
mod data;
mod error;
mod html;
mod reaction;
mod routes;

use api::CommentApi;
use cache::CacheStore;
use config::Options;
use error::{Error, Result};

#[derive(Clone)]
pub struct AppState {
    api: CommentApi,
    caches: Arc<Mutex<CacheStore>>,
}

impl AppState {
    pub fn new(api: CommentApi, caches: CacheStore) -> Self {
        AppState {
            api,
            caches: Arc::new(Mutex::new(caches)),
        }
    }
}

fn init_logging(options: &Options) -> Result<()> {
    let default_level = if options.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    set_global_default(
        Registry::default()
            .with(
                fmt::Layer::default()
                    .compact()
                    .with_ansi(!options.no_color)
                    .with_writer(io::stdout),
            )
            .with(
                EnvFilter::builder()
                    .with_default_directive(default_level.into())
                    .from_env()?,
            ),
    )?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(|| async { "GOOD" }))
        .route(
            "/article/:slug/comments",
            get(routes::pages::comments).post(routes::post::comment),
        )
        .route(
            "/article/:slug/comments/list",
            get(routes::pages::comment_list),
        )
        .route(
            "/article/:slug/comments/:id",
            axum::routing::delete(routes::delete::comment),
        )
        .route(
            "/article/:slug/comments/:id/delete",
            post(routes::delete::comment_form),
        )
        .route("/article/:slug/comments/:id/like", post(routes::post::like))
        .route(
            "/article/:slug/comments/:id/dislike",
            post(routes::post::dislike),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

async fn run(options: Options) -> Result<()> {
    let api = CommentApi::new(&options.api_url, options.timeout())?;
    info!("Using the API at {}", api.base_url());

    let listener = TcpListener::bind(options.listen)
        .await
        .map_err(|source| Error::Bind {
            addr: options.listen.to_string(),
            source,
        })?;
    info!("Serving comments at http://{}", options.listen);

    let caches = CacheStore::new(options.cache_viewers, options.cache_lists);
    axum::serve(listener, router(AppState::new(api, caches)))
        .await
        .map_err(Error::Serve)
}

#[tokio::main]
async fn main() -> ExitCode {
    let options = Options::parse();
    if let Err(err) = init_logging(&options) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
