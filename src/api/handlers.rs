//! HTTP request handlers for the Jornada Engine API.
//!
//! This module contains the handler functions for all API endpoints. Each
//! handler tags its work with a correlation id, delegates to
//! [`services`](crate::services) and maps engine errors to JSON error bodies.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{AnnualConfiguration, EmployeeGroup, Holiday};
use crate::error::EngineError;
use crate::models::{Employee, WeekId};
use crate::services;

use super::request::{
    AbsenceTypeRequest, ConfirmRequest, ContractTypeRequest, DashboardQuery, EmployeeRequest,
    EmployeeWeekRequest, GroupRequest, HolidayRequest, MessageRequest, ReadRequest,
    SessionRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

type ApiResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/session", post(session_handler))
        .route(
            "/employees",
            get(list_employees_handler).post(create_employee_handler),
        )
        .route(
            "/employees/:id",
            get(get_employee_handler)
                .put(update_employee_handler)
                .delete(delete_employee_handler),
        )
        .route("/employees/:id/balances/:year", get(balances_handler))
        .route("/employees/:id/vacations/:year", get(vacations_handler))
        .route(
            "/employees/:id/theoretical-hours/:year",
            get(theoretical_hours_handler),
        )
        .route(
            "/holidays",
            get(list_holidays_handler).post(create_holiday_handler),
        )
        .route("/holidays/:id", delete(delete_holiday_handler))
        .route("/groups", get(list_groups_handler).post(create_group_handler))
        .route("/groups/:id", delete(delete_group_handler))
        .route(
            "/contract-types",
            get(list_contract_types_handler).put(put_contract_type_handler),
        )
        .route("/contract-types/:id", delete(delete_contract_type_handler))
        .route(
            "/absence-types",
            get(list_absence_types_handler).put(put_absence_type_handler),
        )
        .route("/absence-types/:id", delete(delete_absence_type_handler))
        .route(
            "/annual-configurations",
            get(list_annual_handler).put(put_annual_handler),
        )
        .route("/weekly-records/:week", get(get_week_handler))
        .route(
            "/weekly-records/:week/employees/:id",
            put(upsert_employee_week_handler),
        )
        .route(
            "/weekly-records/:week/employees/:id/confirm",
            post(confirm_employee_week_handler),
        )
        .route(
            "/weekly-records/:week/employees/:id/reopen",
            post(reopen_employee_week_handler),
        )
        .route("/weekly-records/:week/confirm", post(confirm_week_handler))
        .route("/conversations", get(list_conversations_handler))
        .route("/conversations/:employee_id", get(get_conversation_handler))
        .route(
            "/conversations/:employee_id/messages",
            post(post_message_handler),
        )
        .route("/conversations/:employee_id/read", post(mark_read_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/reports/balances/:year", get(annual_report_handler))
        .with_state(state)
}

// -----------------------------------------------------------------------------
// Shared helpers
// -----------------------------------------------------------------------------

/// Unwraps a JSON body, turning extractor rejections into API errors.
fn json_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::with_details(
                            "VALIDATION_ERROR",
                            "Faltan campos obligatorios",
                            body_text,
                        )
                    } else {
                        ApiError::with_details(
                            "MALFORMED_JSON",
                            "Los datos enviados no son válidos",
                            body_text,
                        )
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("JSON mal formado: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => ApiError::new(
                    "MISSING_CONTENT_TYPE",
                    "El Content-Type debe ser application/json",
                ),
                _ => ApiError::malformed_json("No se ha podido leer el cuerpo de la petición"),
            };
            Err(ApiErrorResponse::bad_request(error))
        }
    }
}

/// Logs an engine failure and converts it.
fn engine_failure(correlation_id: Uuid, error: EngineError) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    error.into()
}

fn parse_week(correlation_id: Uuid, value: &str) -> Result<WeekId, ApiErrorResponse> {
    value
        .parse()
        .map_err(|e| engine_failure(correlation_id, e))
}

fn parse_year(correlation_id: Uuid, value: &str) -> Result<i32, ApiErrorResponse> {
    value
        .parse::<i32>()
        .ok()
        .filter(|year| (1900..=2200).contains(year))
        .ok_or_else(|| {
            engine_failure(
                correlation_id,
                EngineError::validation("year", format!("'{}' is not a valid year", value)),
            )
        })
}

fn ok<T: Serialize>(body: T) -> ApiResult {
    Ok((StatusCode::OK, Json(body)).into_response())
}

fn created<T: Serialize>(body: T) -> ApiResult {
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

fn no_content() -> ApiResult {
    Ok(StatusCode::NO_CONTENT.into_response())
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// -----------------------------------------------------------------------------
// Session
// -----------------------------------------------------------------------------

/// Handler for POST /session.
///
/// Resolves the role of a signed-in email.
async fn session_handler(
    State(state): State<AppState>,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Resolving session");
    let request = json_body(correlation_id, payload)?;
    let session = services::resolve_session(state.store(), &request.email)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    ok(session)
}

// -----------------------------------------------------------------------------
// Employees
// -----------------------------------------------------------------------------

async fn list_employees_handler(State(state): State<AppState>) -> ApiResult {
    ok(services::list_employees(state.store()).await)
}

async fn get_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let employee = services::get_employee(state.store(), &id)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    ok(employee)
}

/// Handler for POST /employees.
async fn create_employee_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Creating employee");
    let employee: Employee = json_body(correlation_id, payload)?.into();
    let employee = services::create_employee(state.store(), employee, today())
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    created(employee)
}

/// Handler for PUT /employees/{id}.
async fn update_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %id, "Updating employee");
    let employee: Employee = json_body(correlation_id, payload)?.into();
    let employee = services::update_employee(state.store(), &id, employee, today())
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    ok(employee)
}

async fn delete_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %id, "Deleting employee");
    services::delete_employee(state.store(), &id)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    no_content()
}

// -----------------------------------------------------------------------------
// Calculations
// -----------------------------------------------------------------------------

/// Handler for GET /employees/{id}/balances/{year}.
async fn balances_handler(
    State(state): State<AppState>,
    Path((id, year)): Path<(String, String)>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %id, year = %year, "Calculating balances");
    let year = parse_year(correlation_id, &year)?;
    let report = services::employee_balances(state.store(), &id, year)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    ok(report)
}

/// Handler for GET /employees/{id}/vacations/{year}.
async fn vacations_handler(
    State(state): State<AppState>,
    Path((id, year)): Path<(String, String)>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %id, year = %year, "Calculating vacations");
    let year = parse_year(correlation_id, &year)?;
    let summary = services::employee_vacations(state.store(), &id, year)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    ok(summary)
}

/// Handler for GET /employees/{id}/theoretical-hours/{year}.
async fn theoretical_hours_handler(
    State(state): State<AppState>,
    Path((id, year)): Path<(String, String)>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let year = parse_year(correlation_id, &year)?;
    let result = services::employee_theoretical_hours(state.store(), &id, year)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %id,
        year,
        theoretical_hours = %result.theoretical_hours,
        "Theoretical hours calculated"
    );
    ok(result)
}

/// Handler for GET /reports/balances/{year}.
async fn annual_report_handler(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, year = %year, "Building annual report");
    let year = parse_year(correlation_id, &year)?;
    let report = services::annual_report(state.store(), year)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    ok(report)
}

// -----------------------------------------------------------------------------
// Catalog
// -----------------------------------------------------------------------------

async fn list_holidays_handler(State(state): State<AppState>) -> ApiResult {
    ok(services::list_holidays(state.store()).await)
}

async fn create_holiday_handler(
    State(state): State<AppState>,
    payload: Result<Json<HolidayRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let holiday: Holiday = json_body(correlation_id, payload)?.into();
    let holiday = services::upsert_holiday(state.store(), holiday)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    created(holiday)
}

async fn delete_holiday_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    services::delete_holiday(state.store(), &id)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    no_content()
}

async fn list_groups_handler(State(state): State<AppState>) -> ApiResult {
    ok(services::list_groups(state.store()).await)
}

async fn create_group_handler(
    State(state): State<AppState>,
    payload: Result<Json<GroupRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let group: EmployeeGroup = json_body(correlation_id, payload)?.into();
    let group = services::upsert_group(state.store(), group)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    created(group)
}

async fn delete_group_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    services::delete_group(state.store(), &id)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    no_content()
}

async fn list_contract_types_handler(State(state): State<AppState>) -> ApiResult {
    ok(services::list_contract_types(state.store()).await)
}

async fn put_contract_type_handler(
    State(state): State<AppState>,
    payload: Result<Json<ContractTypeRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;
    let contract_type =
        services::upsert_contract_type(state.store(), request.id, request.contract_type)
            .await
            .map_err(|e| engine_failure(correlation_id, e))?;
    ok(contract_type)
}

async fn delete_contract_type_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    services::delete_contract_type(state.store(), &id)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    no_content()
}

async fn list_absence_types_handler(State(state): State<AppState>) -> ApiResult {
    ok(services::list_absence_types(state.store()).await)
}

async fn put_absence_type_handler(
    State(state): State<AppState>,
    payload: Result<Json<AbsenceTypeRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;
    let absence_type = services::upsert_absence_type(state.store(), request.id, request.absence_type)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    ok(absence_type)
}

async fn delete_absence_type_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    services::delete_absence_type(state.store(), &id)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    no_content()
}

async fn list_annual_handler(State(state): State<AppState>) -> ApiResult {
    ok(services::list_annual_configurations(state.store()).await)
}

async fn put_annual_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnnualConfiguration>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let annual = json_body(correlation_id, payload)?;
    let annual = services::upsert_annual_configuration(state.store(), annual)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    ok(annual)
}

// -----------------------------------------------------------------------------
// Weekly records
// -----------------------------------------------------------------------------

async fn get_week_handler(
    State(state): State<AppState>,
    Path(week): Path<String>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let week_id = parse_week(correlation_id, &week)?;
    ok(services::get_week(state.store(), week_id).await)
}

/// Handler for PUT /weekly-records/{week}/employees/{id}.
async fn upsert_employee_week_handler(
    State(state): State<AppState>,
    Path((week, id)): Path<(String, String)>,
    payload: Result<Json<EmployeeWeekRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, week_id = %week, employee_id = %id, "Saving employee week");
    let week_id = parse_week(correlation_id, &week)?;
    let request = json_body(correlation_id, payload)?;
    let week = services::upsert_employee_week(state.store(), week_id, &id, request.days, request.notes)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    ok(week)
}

/// Handler for POST /weekly-records/{week}/employees/{id}/confirm.
async fn confirm_employee_week_handler(
    State(state): State<AppState>,
    Path((week, id)): Path<(String, String)>,
    payload: Result<Json<ConfirmRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let week_id = parse_week(correlation_id, &week)?;
    let request = json_body(correlation_id, payload)?;
    let week = services::confirm_employee_week(
        state.store(),
        week_id,
        &id,
        &request.confirmed_by,
        Utc::now(),
    )
    .await
    .map_err(|e| engine_failure(correlation_id, e))?;
    ok(week)
}

async fn reopen_employee_week_handler(
    State(state): State<AppState>,
    Path((week, id)): Path<(String, String)>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let week_id = parse_week(correlation_id, &week)?;
    let week = services::reopen_employee_week(state.store(), week_id, &id)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    ok(week)
}

/// Handler for POST /weekly-records/{week}/confirm.
async fn confirm_week_handler(
    State(state): State<AppState>,
    Path(week): Path<String>,
    payload: Result<Json<ConfirmRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let week_id = parse_week(correlation_id, &week)?;
    let request = json_body(correlation_id, payload)?;
    let (record, confirmed) =
        services::confirm_week(state.store(), week_id, &request.confirmed_by, Utc::now())
            .await
            .map_err(|e| engine_failure(correlation_id, e))?;
    ok(serde_json::json!({ "record": record, "confirmed": confirmed }))
}

// -----------------------------------------------------------------------------
// Conversations
// -----------------------------------------------------------------------------

async fn list_conversations_handler(State(state): State<AppState>) -> ApiResult {
    ok(services::list_conversations(state.store()).await)
}

async fn get_conversation_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let conversation = services::get_conversation(state.store(), &employee_id)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    ok(conversation)
}

async fn post_message_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;
    let conversation = services::post_message(
        state.store(),
        &employee_id,
        request.sender,
        &request.text,
        Utc::now(),
    )
    .await
    .map_err(|e| engine_failure(correlation_id, e))?;
    created(conversation)
}

async fn mark_read_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<ReadRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;
    let conversation = services::mark_read(state.store(), &employee_id, request.reader)
        .await
        .map_err(|e| engine_failure(correlation_id, e))?;
    ok(conversation)
}

// -----------------------------------------------------------------------------
// Dashboard
// -----------------------------------------------------------------------------

/// Handler for GET /dashboard?date=YYYY-MM-DD.
async fn dashboard_handler(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|rejection| {
        warn!(correlation_id = %correlation_id, error = %rejection, "Invalid dashboard query");
        ApiErrorResponse::bad_request(ApiError::with_details(
            "VALIDATION_ERROR",
            "Fecha no válida",
            rejection.body_text(),
        ))
    })?;
    let date = query.date.unwrap_or_else(today);
    ok(services::dashboard_summary(state.store(), date).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/default").expect("Failed to load config");
        AppState::in_memory(config.into_config())
    }

    async fn send(router: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }
        let response = router
            .oneshot(
                builder
                    .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());
        let (status, body) = send(router, "POST", "/employees", Some("{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_validation_error() {
        let router = create_router(create_test_state());
        let (status, body) = send(router, "POST", "/session", Some("{}")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.details.unwrap().contains("missing field"));
    }

    #[tokio::test]
    async fn test_missing_content_type_returns_400() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/session")
                    .body(Body::from(r#"{"email":"admin@example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MISSING_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_invalid_week_id_returns_400() {
        let router = create_router(create_test_state());
        let (status, body) = send(router, "GET", "/weekly-records/2025-10", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INVALID_WEEK_ID");
    }

    #[tokio::test]
    async fn test_invalid_year_returns_400() {
        let router = create_router(create_test_state());
        let (status, body) = send(router, "GET", "/reports/balances/dosmil", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_employee_returns_404() {
        let router = create_router(create_test_state());
        let (status, body) = send(router, "GET", "/employees/nope/balances/2025", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "EMPLOYEE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_dashboard_rejects_bad_date() {
        let router = create_router(create_test_state());
        let (status, _) = send(router, "GET", "/dashboard?date=tomorrow", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
