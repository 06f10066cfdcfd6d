//! Query server for federated catalog searches.
//!
//! Provides an HTTP API that fans a search out to environmental data
//! catalogs, constrains it with a bounding box, and filters results against
//! a caller-supplied area of interest.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use clap::Parser;
use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tamarack::aoi::{filter_aoi_intersection, get_bounds, multi_polygon_from_value};
use tamarack::catalogs::{CatalogError, CatalogRegistry, SearchParams};
use tamarack::config::Config;
use tamarack::dates::parse_date;
use tamarack::models::{BBox, Resource, ResourceList};

mod error;
use error::{ApiError, ErrorBody};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Catalog search server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Optional TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Application state shared across handlers
struct AppState {
    registry: CatalogRegistry,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Tamarack Query Server");

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let registry = CatalogRegistry::from_config(&config.catalogs)?;
    if registry.is_empty() {
        anyhow::bail!("No catalogs are enabled");
    }
    info!("Registered catalogs: {}", registry.names().join(", "));

    let state = Arc::new(AppState { registry });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/catalogs", get(catalogs_handler))
        .route("/search", post(search_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        catalogs: state.registry.len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    catalogs: usize,
}

/// List the registered catalogs
async fn catalogs_handler(State(state): State<Arc<AppState>>) -> Json<CatalogsResponse> {
    Json(CatalogsResponse {
        catalogs: state.registry.names(),
    })
}

#[derive(Serialize)]
struct CatalogsResponse {
    catalogs: Vec<&'static str>,
}

#[derive(Deserialize)]
struct SearchRequest {
    /// Catalog to search; all registered catalogs when omitted
    catalog: Option<String>,
    /// Free-text query
    query: String,
    /// Lower bound on record dates, any accepted date format
    from_date: Option<String>,
    /// Upper bound on record dates
    to_date: Option<String>,
    /// Bounding box "xmin,ymin,xmax,ymax"; derived from the AOI when omitted
    bbox: Option<String>,
    /// GeoJSON Polygon or MultiPolygon area of interest
    aoi: Option<Value>,
    /// Result page, starting at 1
    page: Option<u32>,
}

#[derive(Serialize)]
struct SearchResponse {
    catalogs: Vec<CatalogSearchResult>,
}

#[derive(Serialize)]
struct CatalogSearchResult {
    catalog: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<Vec<Resource>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

impl CatalogSearchResult {
    fn ok(list: ResourceList) -> Self {
        Self {
            catalog: list.catalog,
            api_url: list.api_url,
            count: Some(list.count),
            results: Some(list.results),
            error: None,
        }
    }

    fn err(catalog: String, err: &CatalogError) -> Self {
        Self {
            catalog,
            api_url: None,
            count: None,
            results: None,
            error: Some(ErrorBody {
                detail: err.to_string(),
                code: err.code(),
            }),
        }
    }
}

/// Federated catalog search
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let from_date = parse_date(request.from_date.as_deref()).map_err(ApiError::bad_request)?;
    let to_date = parse_date(request.to_date.as_deref()).map_err(ApiError::bad_request)?;

    if let (Some(from), Some(to)) = (from_date, to_date) {
        if from > to {
            return Err(ApiError::BadRequest(
                "from_date must not be after to_date".to_string(),
            ));
        }
    }

    let aoi = request
        .aoi
        .as_ref()
        .map(multi_polygon_from_value)
        .transpose()
        .map_err(ApiError::bad_request)?;

    let bbox = match &request.bbox {
        Some(raw) => Some(
            BBox::parse(raw).ok_or_else(|| ApiError::BadRequest(format!("invalid bbox: {raw:?}")))?,
        ),
        None => aoi.as_ref().map(aoi_bounds).transpose()?,
    };

    let params = SearchParams {
        query: request.query.clone(),
        from_date,
        to_date,
        bbox,
        page: request.page,
    };

    let catalogs = match &request.catalog {
        Some(name) => {
            let catalog = state
                .registry
                .get(name)
                .ok_or_else(|| ApiError::NotFound(format!("unknown catalog: {name:?}")))?;

            let mut list = catalog.search(&params).await.map_err(ApiError::Catalog)?;
            if let Some(aoi) = &aoi {
                list.results = filter_aoi_intersection(aoi, std::mem::take(&mut list.results));
            }
            vec![CatalogSearchResult::ok(list)]
        }
        None => state
            .registry
            .search_all(&params)
            .await
            .into_iter()
            .map(|(name, outcome)| match outcome {
                Ok(mut list) => {
                    if let Some(aoi) = &aoi {
                        list.results =
                            filter_aoi_intersection(aoi, std::mem::take(&mut list.results));
                    }
                    CatalogSearchResult::ok(list)
                }
                Err(err) => {
                    tracing::error!("Catalog {} search failed: {}", name, err);
                    CatalogSearchResult::err(name, &err)
                }
            })
            .collect(),
    };

    Ok(Json(SearchResponse { catalogs }))
}

/// Bounding box sent upstream: bounds of the AOI's first polygon
fn aoi_bounds(aoi: &MultiPolygon<f64>) -> Result<BBox, ApiError> {
    let polygon = aoi
        .0
        .first()
        .ok_or_else(|| ApiError::BadRequest("area of interest has no polygons".to_string()))?;

    get_bounds(polygon).map_err(ApiError::bad_request)
}
