mod payloads;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Json, Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::config::{ServerConfig, SimulationConfig};
use crate::core::capital_loss::{CompensationResult, GainPool, compensate};
use crate::core::compound::run_compound;
use crate::core::exit_strategy::run_exit_strategy;
use crate::core::export::{
    ExportError, ExportFormat, calendar_event_url, csv_value_total, export_filename, losses_to_csv,
    portfolio_report, positions_from_csv, positions_to_csv, positions_to_json,
};
use crate::core::fund_cost::run_fund_cost;
use crate::core::net_worth::run_net_worth_projection;
use crate::core::portfolio::{PortfolioSummary, summarize};
use crate::core::re_portfolio::optimize_portfolio;
use crate::core::real_estate::run_real_estate_vs_stocks;
use crate::core::{SimulationResult, run_monte_carlo, solve_safe_withdrawal_rate};
use crate::store::{
    CAPITAL_LOSSES_KEY, KeyValueStore, POSITIONS_KEY, StoreError, TypedStore, check_slot_value,
};

pub use payloads::{
    CalendarQuery, CapitalLossPayload, CompoundPayload, ExitStrategyPayload, ExportQuery,
    FundCostPayload, MonteCarloPayload, NetWorthPayload, PortfolioPayload, PropertiesPayload,
    RealEstatePayload, SwrPayload, build_compound_inputs, build_exit_strategy_inputs,
    build_fund_cost_inputs, build_monte_carlo_inputs, build_net_worth_inputs,
    build_real_estate_inputs, build_swr_request, capital_loss_tax_rate,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub simulation: SimulationConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>, simulation: SimulationConfig) -> Self {
        Self { store, simulation }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AgeSurvival {
    age: u32,
    survival: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloResponse {
    #[serde(flatten)]
    result: SimulationResult,
    final_survival: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    survival_by_age: Vec<AgeSurvival>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalendarResponse {
    expires_on: NaiveDate,
    url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportResponse {
    imported: usize,
    total_value: f64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/monte-carlo",
            get(monte_carlo_get_handler).post(monte_carlo_post_handler),
        )
        .route("/api/monte-carlo/swr", post(swr_handler))
        .route(
            "/api/fund-cost",
            get(fund_cost_get_handler).post(fund_cost_post_handler),
        )
        .route(
            "/api/compound",
            get(compound_get_handler).post(compound_post_handler),
        )
        .route(
            "/api/exit-strategy",
            get(exit_strategy_get_handler).post(exit_strategy_post_handler),
        )
        .route(
            "/api/real-estate-vs-stocks",
            get(real_estate_get_handler).post(real_estate_post_handler),
        )
        .route(
            "/api/net-worth",
            get(net_worth_get_handler).post(net_worth_post_handler),
        )
        .route("/api/real-estate-portfolio", post(re_portfolio_handler))
        .route("/api/capital-loss", post(capital_loss_handler))
        .route("/api/capital-loss/calendar", get(calendar_handler))
        .route("/api/capital-loss/export", get(capital_loss_export_handler))
        .route("/api/portfolio", post(portfolio_handler))
        .route("/api/portfolio/export", get(portfolio_export_handler))
        .route("/api/portfolio/import", post(portfolio_import_handler))
        .route(
            "/api/store/:key",
            get(store_get_handler)
                .put(store_put_handler)
                .delete(store_delete_handler),
        )
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(server: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let addr: SocketAddr = format!("{}:{}", server.bind, server.port)
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "fincalc HTTP API listening");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn monte_carlo_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<MonteCarloPayload>,
) -> Response {
    monte_carlo_handler_impl(&state, payload)
}

async fn monte_carlo_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<MonteCarloPayload>,
) -> Response {
    monte_carlo_handler_impl(&state, payload)
}

fn monte_carlo_handler_impl(state: &AppState, payload: MonteCarloPayload) -> Response {
    let inputs = match build_monte_carlo_inputs(&payload, &state.simulation) {
        Ok(inputs) => inputs,
        Err(msg) => return bad_request(&msg),
    };
    debug!(paths = inputs.paths, years = inputs.horizon_years, mode = ?inputs.mode, "monte carlo request");
    let result = run_monte_carlo(&inputs);
    json_response(
        StatusCode::OK,
        build_monte_carlo_response(result, payload.current_age),
    )
}

pub fn build_monte_carlo_response(
    result: SimulationResult,
    current_age: Option<u32>,
) -> MonteCarloResponse {
    let survival_by_age = match current_age {
        Some(current_age) => (0..result.survival.len() as u32)
            .map_while(|offset| current_age.checked_add(offset))
            .filter_map(|age| {
                result
                    .survival_to_age(current_age, age)
                    .map(|survival| AgeSurvival { age, survival })
            })
            .collect(),
        None => Vec::new(),
    };
    MonteCarloResponse {
        final_survival: result.final_survival(),
        result,
        survival_by_age,
    }
}

async fn swr_handler(State(state): State<AppState>, Json(payload): Json<SwrPayload>) -> Response {
    let (inputs, config) = match build_swr_request(&payload, &state.simulation) {
        Ok(request) => request,
        Err(msg) => return bad_request(&msg),
    };
    match solve_safe_withdrawal_rate(&inputs, config) {
        Ok(result) => {
            info!(
                rate = ?result.solved_rate,
                survival = ?result.achieved_survival,
                iterations = result.iterations.len(),
                converged = result.converged,
                "safe withdrawal rate search finished"
            );
            json_response(StatusCode::OK, result)
        }
        Err(msg) => bad_request(&msg),
    }
}

async fn fund_cost_get_handler(Query(payload): Query<FundCostPayload>) -> Response {
    fund_cost_handler_impl(payload)
}

async fn fund_cost_post_handler(Json(payload): Json<FundCostPayload>) -> Response {
    fund_cost_handler_impl(payload)
}

fn fund_cost_handler_impl(payload: FundCostPayload) -> Response {
    match build_fund_cost_inputs(&payload) {
        Ok(inputs) => json_response(StatusCode::OK, run_fund_cost(&inputs)),
        Err(msg) => bad_request(&msg),
    }
}

async fn compound_get_handler(Query(payload): Query<CompoundPayload>) -> Response {
    compound_handler_impl(payload)
}

async fn compound_post_handler(Json(payload): Json<CompoundPayload>) -> Response {
    compound_handler_impl(payload)
}

fn compound_handler_impl(payload: CompoundPayload) -> Response {
    match build_compound_inputs(&payload) {
        Ok(inputs) => json_response(StatusCode::OK, run_compound(&inputs)),
        Err(msg) => bad_request(&msg),
    }
}

async fn exit_strategy_get_handler(Query(payload): Query<ExitStrategyPayload>) -> Response {
    exit_strategy_handler_impl(payload)
}

async fn exit_strategy_post_handler(Json(payload): Json<ExitStrategyPayload>) -> Response {
    exit_strategy_handler_impl(payload)
}

fn exit_strategy_handler_impl(payload: ExitStrategyPayload) -> Response {
    match build_exit_strategy_inputs(&payload) {
        Ok(inputs) => json_response(StatusCode::OK, run_exit_strategy(&inputs)),
        Err(msg) => bad_request(&msg),
    }
}

async fn real_estate_get_handler(Query(payload): Query<RealEstatePayload>) -> Response {
    real_estate_handler_impl(payload)
}

async fn real_estate_post_handler(Json(payload): Json<RealEstatePayload>) -> Response {
    real_estate_handler_impl(payload)
}

fn real_estate_handler_impl(payload: RealEstatePayload) -> Response {
    match build_real_estate_inputs(&payload) {
        Ok(inputs) => json_response(StatusCode::OK, run_real_estate_vs_stocks(&inputs)),
        Err(msg) => bad_request(&msg),
    }
}

async fn net_worth_get_handler(Query(payload): Query<NetWorthPayload>) -> Response {
    net_worth_handler_impl(payload)
}

async fn net_worth_post_handler(Json(payload): Json<NetWorthPayload>) -> Response {
    net_worth_handler_impl(payload)
}

fn net_worth_handler_impl(payload: NetWorthPayload) -> Response {
    match build_net_worth_inputs(&payload) {
        Ok(inputs) => json_response(StatusCode::OK, run_net_worth_projection(&inputs)),
        Err(msg) => bad_request(&msg),
    }
}

async fn re_portfolio_handler(Json(payload): Json<PropertiesPayload>) -> Response {
    if let Some(bad) = payload
        .properties
        .iter()
        .find(|p| !p.value.is_finite() || p.value < 0.0)
    {
        return bad_request(&format!("property {:?} must have a value >= 0", bad.name));
    }
    json_response(StatusCode::OK, optimize_portfolio(&payload.properties))
}

async fn capital_loss_handler(
    State(state): State<AppState>,
    Json(payload): Json<CapitalLossPayload>,
) -> Response {
    match capital_loss_impl(&state, payload) {
        Ok(result) => json_response(StatusCode::OK, result),
        Err(err) => err,
    }
}

fn capital_loss_impl(
    state: &AppState,
    payload: CapitalLossPayload,
) -> Result<CompensationResult, Response> {
    let tax_rate = capital_loss_tax_rate(&payload).map_err(|msg| bad_request(&msg))?;
    let losses = match payload.losses {
        Some(losses) => {
            state
                .store
                .set(&CAPITAL_LOSSES_KEY, &losses)
                .map_err(store_error_response)?;
            losses
        }
        None => state
            .store
            .get(&CAPITAL_LOSSES_KEY)
            .map_err(store_error_response)?
            .unwrap_or_default(),
    };
    let today = payload.today.unwrap_or_else(|| Local::now().date_naive());
    let result = compensate(&losses, payload.gains, today, tax_rate);
    debug!(
        losses = losses.len(),
        compensated = result.total_compensated,
        "capital loss compensation"
    );
    Ok(result)
}

async fn calendar_handler(Query(query): Query<CalendarQuery>) -> Response {
    let expires_on = crate::core::capital_loss::expiry_date(query.realized_on);
    let mut details = match query.amount {
        Some(amount) => format!("Minusvalenza da compensare: {amount:.2} EUR"),
        None => "Minusvalenza da compensare".to_string(),
    };
    if let Some(description) = query.description.as_deref().filter(|d| !d.trim().is_empty()) {
        details.push_str("\n");
        details.push_str(description);
    }
    let title = match query.category {
        Some(category) => format!("Scadenza minusvalenza ({})", serde_label(&category)),
        None => "Scadenza minusvalenza".to_string(),
    };
    json_response(
        StatusCode::OK,
        CalendarResponse {
            expires_on,
            url: calendar_event_url(&title, &details, expires_on),
        },
    )
}

async fn capital_loss_export_handler(State(state): State<AppState>) -> Response {
    let losses = match state.store.get(&CAPITAL_LOSSES_KEY) {
        Ok(losses) => losses.unwrap_or_default(),
        Err(err) => return store_error_response(err),
    };
    let today = Local::now().date_naive();
    let result = compensate(&losses, GainPool::default(), today, 0.0);
    match losses_to_csv(&result.allocations) {
        Ok(csv) => attachment_response(
            ExportFormat::Csv,
            &export_filename("minusvalenze", today, ExportFormat::Csv),
            csv,
        ),
        Err(e) => export_error_response(&e),
    }
}

async fn portfolio_handler(
    State(state): State<AppState>,
    Json(payload): Json<PortfolioPayload>,
) -> Response {
    match portfolio_impl(&state, payload) {
        Ok(summary) => json_response(StatusCode::OK, summary),
        Err(err) => err,
    }
}

fn portfolio_impl(state: &AppState, payload: PortfolioPayload) -> Result<PortfolioSummary, Response> {
    let positions = match payload.positions {
        Some(positions) => {
            state
                .store
                .set(&POSITIONS_KEY, &positions)
                .map_err(store_error_response)?;
            positions
        }
        None => state
            .store
            .get(&POSITIONS_KEY)
            .map_err(store_error_response)?
            .unwrap_or_default(),
    };
    Ok(summarize(&positions))
}

async fn portfolio_export_handler(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let raw_format = query.format.as_deref().unwrap_or("csv");
    let Some(format) = ExportFormat::parse(raw_format) else {
        return bad_request(&format!("unsupported export format {raw_format:?}"));
    };
    let positions = match state.store.get(&POSITIONS_KEY) {
        Ok(positions) => positions.unwrap_or_default(),
        Err(err) => return store_error_response(err),
    };
    let today = Local::now().date_naive();
    let summary = summarize(&positions);
    let body = match format {
        ExportFormat::Csv => positions_to_csv(&summary),
        ExportFormat::Json => positions_to_json(&positions),
        ExportFormat::Text => Ok(portfolio_report(&summary, today)),
    };
    let body = match body {
        Ok(body) => body,
        Err(e) => return export_error_response(&e),
    };
    info!(positions = positions.len(), format = format.extension(), "portfolio exported");
    attachment_response(format, &export_filename("portafoglio", today, format), body)
}

async fn portfolio_import_handler(State(state): State<AppState>, body: String) -> Response {
    let positions = match positions_from_csv(&body) {
        Ok(positions) => positions,
        Err(e) => return bad_request(&e.to_string()),
    };
    let total_value = match csv_value_total(&body) {
        Ok(total) => total,
        Err(e) => return bad_request(&e.to_string()),
    };
    if let Err(err) = state.store.set(&POSITIONS_KEY, &positions) {
        return store_error_response(err);
    }
    info!(imported = positions.len(), "portfolio imported from CSV");
    json_response(
        StatusCode::OK,
        ImportResponse {
            imported: positions.len(),
            total_value,
        },
    )
}

async fn store_get_handler(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match state.store.get_raw(&key) {
        Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
            Ok(value) => json_response(StatusCode::OK, value),
            Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        },
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Not found"),
        Err(err) => store_error_response(err),
    }
}

async fn store_put_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Response {
    store_put_impl(&state, &key, &body)
}

fn store_put_impl(state: &AppState, key: &str, body: &[u8]) -> Response {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => return bad_request(&format!("Invalid JSON body: {e}")),
    };
    let raw = value.to_string();
    if let Err(err) = check_slot_value(key, &raw) {
        return bad_request(&err.to_string());
    }
    match state.store.set_raw(key, raw) {
        Ok(()) => {
            debug!(%key, "store value written");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => store_error_response(err),
    }
}

async fn store_delete_handler(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match state.store.delete(&key) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Not found"),
        Err(err) => store_error_response(err),
    }
}

fn serde_label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(Value::String(label)) => label,
        _ => String::new(),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn attachment_response(format: ExportFormat, filename: &str, body: String) -> Response {
    let disposition = format!("attachment; filename=\"{filename}\"");
    let mut response = with_cache_control(body);
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(format.content_type()),
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn bad_request(msg: &str) -> Response {
    debug!(error = msg, "rejected request");
    error_response(StatusCode::BAD_REQUEST, msg)
}

fn export_error_response(err: &ExportError) -> Response {
    warn!(error = %err, "export failed");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
}

fn store_error_response(err: StoreError) -> Response {
    match err {
        StoreError::InvalidKey(_) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
        other => {
            warn!(error = %other, "store operation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capital_loss::{IncomeCategory, LossRecord};
    use crate::core::portfolio::tests::sample_positions;
    use crate::core::{MonteCarloInputs, SimulationMode};
    use crate::store::MemoryStore;

    fn state() -> AppState {
        AppState::new(Arc::new(MemoryStore::new()), SimulationConfig::default())
    }

    fn small_inputs() -> MonteCarloInputs {
        MonteCarloInputs {
            capital: 100_000.0,
            return_mean: 0.05,
            return_vol: 0.10,
            horizon_years: 10,
            paths: 200,
            mode: SimulationMode::Decumulation,
            annual_contribution: 0.0,
            annual_withdrawal: 4_000.0,
            inflation: 0.02,
            target_value: None,
            seed: 3,
        }
    }

    #[test]
    fn monte_carlo_response_serialization_contains_expected_fields() {
        let result = run_monte_carlo(&small_inputs());
        let response = build_monte_carlo_response(result, Some(60));
        let json = serde_json::to_value(&response).expect("serializes");

        for key in [
            "mode",
            "paths",
            "bands",
            "survival",
            "depletedPaths",
            "meanFinalValue",
            "finalSurvival",
            "survivalByAge",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        let by_age = json["survivalByAge"].as_array().expect("array");
        assert_eq!(by_age.len(), 11);
        assert_eq!(by_age[0]["age"], 60);
        assert_eq!(by_age[10]["age"], 70);
        assert_eq!(json["bands"][0]["p50"], 100_000.0);
    }

    #[test]
    fn monte_carlo_response_omits_age_table_without_age() {
        let result = run_monte_carlo(&small_inputs());
        let json = serde_json::to_value(build_monte_carlo_response(result, None)).expect("json");
        assert!(json.get("survivalByAge").is_none());
    }

    #[test]
    fn age_table_stops_before_overflowing() {
        let result = run_monte_carlo(&small_inputs());
        let response = build_monte_carlo_response(result, Some(u32::MAX - 3));
        let ages: Vec<u32> = response.survival_by_age.iter().map(|row| row.age).collect();
        assert_eq!(ages, vec![u32::MAX - 3, u32::MAX - 2, u32::MAX - 1, u32::MAX]);
    }

    #[test]
    fn store_put_rejects_values_that_break_typed_slots() {
        let state = state();
        let response = store_put_impl(&state, POSITIONS_KEY.name(), br#"{"hello":1}"#);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.store.get_raw(POSITIONS_KEY.name()).expect("get"), None);

        let summary = portfolio_impl(&state, PortfolioPayload::default()).expect("summary");
        assert!(summary.positions.is_empty());

        let rows = serde_json::to_vec(&sample_positions()).expect("serializes");
        let response = store_put_impl(&state, POSITIONS_KEY.name(), &rows);
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let summary = portfolio_impl(&state, PortfolioPayload::default()).expect("summary");
        assert_eq!(summary.positions.len(), sample_positions().len());

        let response = store_put_impl(&state, "notes", br#"{"hello":1}"#);
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn portfolio_payload_persists_and_reloads_positions() {
        let state = state();
        let summary = portfolio_impl(
            &state,
            PortfolioPayload {
                positions: Some(sample_positions()),
            },
        )
        .expect("summary");
        let reloaded =
            portfolio_impl(&state, PortfolioPayload::default()).expect("stored summary");
        assert_eq!(summary.positions.len(), reloaded.positions.len());
        assert!((summary.total_value - reloaded.total_value).abs() < 1e-9);
    }

    #[test]
    fn capital_loss_uses_stored_rows_when_omitted() {
        let state = state();
        let losses = vec![LossRecord {
            id: "l1".to_string(),
            amount: 1_000.0,
            realized_on: NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"),
            category: IncomeCategory::OtherIncome,
            description: None,
        }];
        state.store.set(&CAPITAL_LOSSES_KEY, &losses).expect("seed store");

        let payload = CapitalLossPayload {
            gains: GainPool {
                capital_income: 0.0,
                other_income: 400.0,
            },
            today: NaiveDate::from_ymd_opt(2025, 1, 1),
            ..CapitalLossPayload::default()
        };
        let result = capital_loss_impl(&state, payload).expect("result");
        assert_eq!(result.allocations.len(), 1);
        assert!((result.total_compensated - 400.0).abs() < 1e-9);
        assert!((result.tax_saved - 104.0).abs() < 1e-9);
    }

    #[test]
    fn store_errors_map_to_status_codes() {
        let invalid = store_error_response(StoreError::InvalidKey("../x".to_string()));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        let poisoned = store_error_response(StoreError::Poisoned);
        assert_eq!(poisoned.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            poisoned.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );
    }

    #[test]
    fn attachment_sets_filename_and_content_type() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).expect("date");
        let response = attachment_response(
            ExportFormat::Csv,
            &export_filename("portafoglio", date, ExportFormat::Csv),
            "id\n".to_string(),
        );
        let headers = response.headers();
        assert_eq!(
            headers.get(header::CONTENT_DISPOSITION),
            Some(&HeaderValue::from_static(
                "attachment; filename=\"portafoglio-2026-10-18.csv\""
            ))
        );
        assert_eq!(
            headers.get(header::CONTENT_TYPE),
            Some(&HeaderValue::from_static("text/csv; charset=utf-8"))
        );
    }

    #[test]
    fn serde_label_uses_wire_names() {
        assert_eq!(serde_label(&IncomeCategory::CapitalIncome), "capital-income");
    }
}
