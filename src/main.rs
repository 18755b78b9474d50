use axum::extract::Extension;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum_prometheus::PrometheusMetricLayer;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use facility_ai::config::AppConfig;
use facility_ai::error::AppError;
use facility_ai::telemetry;
use facility_ai::workflows::reservation::advisory::{TimeAdvice, TimeAdvisor};
use facility_ai::workflows::reservation::recommendation::{
    recommendation_router, Coordinates, FacilityCsvImporter, FacilityDirectory, HttpMlGateway,
    RecommendationOutcome, RecommendationService, RecommendationState, RequesterContext,
    ResidentRegistry, ScoreRequest, ScoringConfig, DEFAULT_EXPECTED_ATTENDEES,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: Arc<PrometheusHandle>,
}

#[derive(Parser, Debug)]
#[command(
    name = "Facility Reservation Advisor",
    about = "Score and serve facility recommendations for LGU reservation workflows",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank facilities for a reservation purpose from the command line
    Recommend(RecommendArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct RecommendArgs {
    /// Facility roster CSV (defaults to the built-in sample catalog)
    #[arg(long)]
    facilities: Option<PathBuf>,
    /// Purpose of the reservation
    #[arg(long)]
    purpose: String,
    /// Expected attendee count
    #[arg(long, default_value_t = DEFAULT_EXPECTED_ATTENDEES)]
    attendees: u32,
    /// Requester latitude in decimal degrees
    #[arg(long)]
    latitude: Option<f64>,
    /// Requester longitude in decimal degrees
    #[arg(long)]
    longitude: Option<f64>,
    /// Reservation date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Requested time slot, e.g. 16:00-19:00
    #[arg(long)]
    time_slot: Option<String>,
    /// Mark the reservation as commercial use
    #[arg(long)]
    commercial: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Recommend(args) => run_recommend(args).await,
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn load_catalog(seed: Option<&PathBuf>) -> Result<FacilityDirectory, AppError> {
    match seed {
        Some(path) => Ok(FacilityDirectory::new(FacilityCsvImporter::from_path(
            path,
        )?)),
        None => Ok(FacilityDirectory::sample()),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(load_catalog(config.advisor.facility_seed.as_ref())?);
    let service = match &config.advisor.ml_gateway_url {
        Some(url) => {
            let gateway = Arc::new(HttpMlGateway::new(url.clone(), config.advisor.ml_budget())?);
            info!(%url, budget_ms = config.advisor.ml_budget_ms, "ml gateway enabled");
            RecommendationService::with_gateway(
                catalog,
                gateway,
                config.advisor.ml_budget(),
                ScoringConfig::default(),
            )
        }
        None => RecommendationService::heuristic_only(catalog, ScoringConfig::default()),
    };

    let state = RecommendationState {
        service: Arc::new(service),
        advisor: Arc::new(TimeAdvisor),
        residents: Arc::new(ResidentRegistry::default()),
    };

    let app = recommendation_router(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "facility reservation advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        facilities,
        purpose,
        attendees,
        latitude,
        longitude,
        date,
        time_slot,
        commercial,
    } = args;

    let catalog = Arc::new(load_catalog(facilities.as_ref())?);
    let service = RecommendationService::<FacilityDirectory, HttpMlGateway>::heuristic_only(
        catalog,
        ScoringConfig::default(),
    );

    let coordinates = match (latitude, longitude) {
        (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
        _ => None,
    };

    let request = ScoreRequest {
        purpose: purpose.clone(),
        expected_attendees: attendees,
        reservation_date: date.map(|value| value.to_string()),
        time_slot,
        commercial,
        requester: RequesterContext {
            resident_id: None,
            coordinates,
        },
    };

    let outcome = service.recommend(&request).await?;
    let advice = TimeAdvisor.advise(&purpose);

    render_recommendations(&purpose, attendees, &outcome, &advice);
    Ok(())
}

fn render_recommendations(
    purpose: &str,
    attendees: u32,
    outcome: &RecommendationOutcome,
    advice: &TimeAdvice,
) {
    println!("Facility recommendations for '{purpose}'");
    println!("Expected attendees: {attendees}");
    match outcome.backend.ml_seconds() {
        Some(seconds) => println!("Ranking backend: scheduling model ({seconds:.2}s)"),
        None => println!("Ranking backend: heuristic"),
    }

    if outcome.recommendations.is_empty() {
        println!("\nNo facilities are currently available for reservation.");
    } else {
        println!();
        for (index, entry) in outcome.recommendations.iter().enumerate() {
            let distance_note = match &entry.distance_label {
                Some(label) => format!(", {label} away"),
                None => String::new(),
            };
            println!(
                "{}. {} (capacity {}) score {:.2}{}",
                index + 1,
                entry.name,
                entry.capacity,
                entry.score,
                distance_note
            );
            println!("   {}", entry.reason_summary());
        }
    }

    println!(
        "\nSuggested times: {} ({})",
        advice.suggested_slots.join(", "),
        advice.label
    );
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
