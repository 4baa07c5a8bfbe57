use std::env;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    extract::State,
    extract::connect_info::ConnectInfo,
    http::Method,
    http::Request,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
    middleware,
    middleware::Next,
    response::Response,
    routing::{get, post},
};
use clap::Parser;
use dotenvy::dotenv;
use governor::{
    Quota, RateLimiter, clock::DefaultClock, middleware::NoOpMiddleware,
    state::keyed::DashMapStateStore,
};
use jm_common::db::{PoolSettings, create_pool_from_url};
use jm_common::job_index::{InMemoryJobIndex, JobIndex, PgJobIndex, load_openings_from_json, parse_openings_json};
use jm_common::logging::{LogSettings, LogSink, init_logging, install_panic_hook};
use jm_common::matching::{MatchingEngine, ScoringConfig, TopN};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod auth;
pub mod error;
pub mod handlers;

use auth::{API_KEY_HEADER, AuthConfig};
use error::ApiError;
use handlers::{health, jobs, matches};

const SHUTDOWN_DRAIN_GRACE: Duration = Duration::from_millis(200);
const DEMO_OPENINGS: &str = include_str!("../../../fixtures/job_openings.json");

#[derive(Debug, Clone, Parser)]
#[command(name = "jm-api", about = "HTTP API for job-seeker / opening matching")]
struct Cli {
    /// Server port
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// API key for X-API-Key authentication
    #[arg(long, env = "JM_API_KEY")]
    api_key: Option<String>,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "JM_CORS_ORIGINS", default_value = "http://localhost:3000")]
    cors_origins: String,

    /// JSON file with job openings; takes precedence over DATABASE_URL
    #[arg(long, env = "JM_JOBS_FILE")]
    jobs_file: Option<PathBuf>,

    /// PostgreSQL connection string for the job_openings table
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum open connections to DATABASE_URL
    #[arg(long, env = "JM_DB_POOL_SIZE", default_value_t = 8)]
    db_pool_size: usize,

    /// Number of matches returned when a request has no top_n
    #[arg(long, env = "JM_DEFAULT_TOP_N", default_value_t = 3)]
    default_top_n: i64,

    /// tracing filter directives
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_filter: String,

    /// Write daily-rotated log files here instead of stdout
    #[arg(long, env = "JM_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Also print panics with the default hook (backtraces)
    #[arg(
        long,
        env = "JM_LOG_INCLUDE_BACKTRACE",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    log_panic_backtrace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSource {
    File(PathBuf),
    Database { url: String, pool: PoolSettings },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub auth: AuthConfig,
    pub job_source: JobSource,
    pub default_top_n: TopN,
    pub log: LogSettings,
}

type IpRateLimiter = RateLimiter<IpAddr, DashMapStateStore<IpAddr>, DefaultClock, NoOpMiddleware>;

#[derive(Clone)]
pub struct RateLimits {
    global: Arc<IpRateLimiter>,
    matching: Arc<IpRateLimiter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub global_per_sec: u64,
    pub global_burst: u32,
    pub match_per_sec: u64,
    pub match_burst: u32,
}

impl RateLimitConfig {
    fn parse_env<T: std::str::FromStr + PartialOrd + Default>(name: &str) -> Option<T> {
        env::var(name)
            .ok()
            .and_then(|value| value.parse::<T>().ok())
            .filter(|value| *value > T::default())
    }

    fn from_env() -> Self {
        Self {
            global_per_sec: Self::parse_env("JM_RATE_LIMIT_GLOBAL_PER_SEC").unwrap_or(20),
            global_burst: Self::parse_env("JM_RATE_LIMIT_GLOBAL_BURST").unwrap_or(40),
            match_per_sec: Self::parse_env("JM_RATE_LIMIT_MATCH_PER_SEC").unwrap_or(5),
            match_burst: Self::parse_env("JM_RATE_LIMIT_MATCH_BURST").unwrap_or(10),
        }
    }
}

impl AppConfig {
    fn from_cli(cli: Cli) -> Result<Self, ApiError> {
        let cors_origins = cli
            .cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect::<Vec<_>>();

        if cors_origins.iter().any(|origin| origin == "*") {
            return Err(ApiError::Config(
                "JM_CORS_ORIGINS must list explicit origins".into(),
            ));
        }

        let api_key = cli
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ApiError::Config("JM_API_KEY is required".into()))?;

        let job_source = match (cli.jobs_file, cli.database_url) {
            (Some(path), _) => JobSource::File(path),
            (None, Some(url)) => JobSource::Database {
                url,
                pool: PoolSettings {
                    max_size: cli.db_pool_size,
                    ..PoolSettings::default()
                },
            },
            (None, None) => {
                return Err(ApiError::Config(
                    "either JM_JOBS_FILE or DATABASE_URL must be set".into(),
                ));
            }
        };

        let default_top_n = TopN::new(cli.default_top_n)
            .map_err(|err| ApiError::Config(format!("JM_DEFAULT_TOP_N: {err}")))?;

        let log = LogSettings {
            filter: cli.log_filter,
            sink: cli.log_dir.map_or(LogSink::Stdout, LogSink::DailyFile),
            panic_backtrace: cli.log_panic_backtrace,
            ..LogSettings::new(env!("CARGO_PKG_NAME"))
        };

        Ok(Self {
            port: cli.port,
            cors_origins,
            auth: AuthConfig { api_key },
            job_source,
            default_top_n,
            log,
        })
    }

    pub fn for_tests(api_key: &str) -> Self {
        Self {
            port: 3001,
            cors_origins: vec!["http://localhost:3000".into()],
            auth: AuthConfig {
                api_key: api_key.to_string(),
            },
            job_source: JobSource::File(PathBuf::from("fixtures/job_openings.json")),
            default_top_n: TopN::default(),
            log: LogSettings::new(env!("CARGO_PKG_NAME")),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub job_index: Arc<dyn JobIndex>,
    pub engine: MatchingEngine,
    pub config: AppConfig,
    pub(crate) rate_limits: RateLimits,
    pub readiness: Arc<AtomicBool>,
}

pub type SharedState = Arc<AppState>;

impl axum::extract::FromRef<SharedState> for AuthConfig {
    fn from_ref(input: &SharedState) -> AuthConfig {
        input.config.auth.clone()
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(API_KEY_HEADER)])
}

fn build_ip_limiter(per_second: u64, burst_size: u32) -> Arc<IpRateLimiter> {
    let nanos_per_token = 1_000_000_000u64 / per_second.max(1);
    let burst = NonZeroU32::new(burst_size).unwrap_or(NonZeroU32::MIN);
    let quota = Quota::with_period(Duration::from_nanos(nanos_per_token.max(1)))
        .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
        .allow_burst(burst);

    Arc::new(RateLimiter::keyed(quota))
}

pub fn default_rate_limits() -> RateLimits {
    let cfg = RateLimitConfig::from_env();
    RateLimits {
        global: build_ip_limiter(cfg.global_per_sec, cfg.global_burst),
        matching: build_ip_limiter(cfg.match_per_sec, cfg.match_burst),
    }
}

fn request_ip<B>(req: &Request<B>) -> Option<IpAddr> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
}

fn enforce_rate_limit(limiter: &IpRateLimiter, ip: Option<IpAddr>) -> Result<(), ApiError> {
    if let Some(client_ip) = ip {
        if limiter.check_key(&client_ip).is_err() {
            return Err(ApiError::TooManyRequests("rate limit exceeded".into()));
        }
    }

    Ok(())
}

async fn global_rate_limit(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    enforce_rate_limit(&state.rate_limits.global, request_ip(&req))?;
    Ok(next.run(req).await)
}

async fn match_rate_limit(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    enforce_rate_limit(&state.rate_limits.matching, request_ip(&req))?;
    Ok(next.run(req).await)
}

async fn attach_request_id_context(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    Ok(error::with_request_id(request_id, next.run(req)).await)
}

pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_header = request_id_header.clone();

    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(&trace_header)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
            status = tracing::field::Empty,
        )
    });

    let match_limit = || middleware::from_fn_with_state(state.clone(), match_rate_limit);

    let api_routes = Router::new()
        .route("/matches", post(matches::run_match).route_layer(match_limit()))
        .route("/matches/:job_id", post(matches::score_job).route_layer(match_limit()))
        .route("/jobs", get(jobs::list_jobs))
        .route("/jobs/:id", get(jobs::get_job));

    Router::new()
        .route("/livez", get(health::livez))
        .route("/readyz", get(health::readyz))
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            global_rate_limit,
        ))
        .layer(middleware::from_fn(attach_request_id_context))
        .layer(DefaultBodyLimit::max(256 * 1024))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid::default(),
        ))
        .layer(cors)
        .with_state(state)
}

pub fn build_state(
    config: AppConfig,
    job_index: Arc<dyn JobIndex>,
    scoring: ScoringConfig,
) -> SharedState {
    let engine = MatchingEngine::new(scoring).with_default_top_n(config.default_top_n);

    Arc::new(AppState {
        job_index,
        engine,
        config,
        rate_limits: default_rate_limits(),
        readiness: Arc::new(AtomicBool::new(true)),
    })
}

/// Demo openings bundled with the binary.
pub fn demo_job_index() -> InMemoryJobIndex {
    parse_openings_json(DEMO_OPENINGS).unwrap_or_default()
}

pub fn test_state(api_key: &str) -> SharedState {
    build_state(
        AppConfig::for_tests(api_key),
        Arc::new(demo_job_index()),
        ScoringConfig::default(),
    )
}

fn open_job_index(source: &JobSource) -> Result<Arc<dyn JobIndex>, ApiError> {
    match source {
        JobSource::File(path) => {
            let index = load_openings_from_json(path)
                .map_err(|err| ApiError::Config(format!("failed to load JM_JOBS_FILE: {err}")))?;
            Ok(Arc::new(index))
        }
        JobSource::Database { url, pool } => {
            let pool = create_pool_from_url(url, *pool)
                .map_err(|err| ApiError::Config(format!("failed to create pool: {err}")))?;
            Ok(Arc::new(PgJobIndex::new(pool)))
        }
    }
}

pub async fn run() -> Result<(), ApiError> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_cli(cli)?;
    let _log_guard = init_logging(&config.log).map_err(|err| ApiError::Config(err.to_string()))?;
    install_panic_hook(&config.log);

    let job_index = open_job_index(&config.job_source)?;

    let state = build_state(config.clone(), job_index, ScoringConfig::from_env());

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let app = create_router(state.clone());

    info!(
        %addr,
        service = config.log.service,
        job_source = state.job_index.name(),
        default_top_n = config.default_top_n.get(),
        "jm-api listening"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    let service = app.into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal(state.clone()))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(())
}

async fn shutdown_signal(state: SharedState) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    state.readiness.store(false, Ordering::SeqCst);

    // let load balancers observe /readyz as not ready before the listener closes
    tokio::time::sleep(SHUTDOWN_DRAIN_GRACE).await;
}
