//! HTTP request handlers for the leave ledger API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::LedgerError;
use crate::ledger::{LeaveGrant, MonthClose};
use crate::models::{Employee, EmployeeId, Page};
use crate::policy::{CompanyLimit, LimitInputs};

use super::request::{CloseMonthRequest, EmployeeRequest, LeaveRequest, LimitParams, ListParams};
use super::response::{ApiError, ApiErrorResponse, CountResponse};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/employees", get(list_handler).post(create_handler))
        .route("/employees/count", get(count_handler))
        .route(
            "/employees/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route("/employees/:id/leave", post(leave_handler))
        .route("/employees/:id/close-month", post(close_month_handler))
        .route("/employees/:id/company-limit", get(company_limit_handler))
        .with_state(state)
}

/// Handler for GET /employees/count.
async fn count_handler(State(state): State<AppState>) -> ApiResult<Json<CountResponse>> {
    let correlation_id = Uuid::new_v4();
    let count = state
        .ledger()
        .count_employees()
        .map_err(|err| ledger_failure(correlation_id, err))?;
    Ok(Json(CountResponse { count }))
}

/// Handler for GET /employees.
///
/// Lists all records, or only those with the given `name`, one page at a time.
async fn list_handler(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Page<Employee>>> {
    let correlation_id = Uuid::new_v4();
    let Query(params) = params.map_err(|rejection| query_failure(correlation_id, rejection))?;
    let page = params.page_request(state.default_page_size());
    let ledger = state.ledger();

    let result = match params.name.as_deref() {
        Some(name) => ledger.page_employees_by_name(name, &page),
        None => ledger.list_employees(&page),
    };
    result
        .map(Json)
        .map_err(|err| ledger_failure(correlation_id, err))
}

/// Handler for GET /employees/:id.
async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    state
        .ledger()
        .employee(id)
        .map(Json)
        .map_err(|err| ledger_failure(correlation_id, err))
}

/// Handler for POST /employees.
///
/// The body must not carry an id; storage assigns one.
async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing employee creation");

    let Json(request) = payload.map_err(|rejection| json_failure(correlation_id, rejection))?;
    let created = state
        .ledger()
        .create_employee(request.into())
        .map_err(|err| ledger_failure(correlation_id, err))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for PUT /employees/:id.
async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = id, "Processing employee update");

    let Json(mut request) =
        payload.map_err(|rejection| json_failure(correlation_id, rejection))?;
    if request.id.is_some_and(|body_id| body_id != id) {
        warn!(correlation_id = %correlation_id, employee_id = id, "Body id does not match path");
        return Err(ApiErrorResponse::bad_request(ApiError::validation_error(
            format!("Body id does not match path id {}", id),
        )));
    }
    request.id = Some(id);

    state
        .ledger()
        .update_employee(request.into())
        .map(Json)
        .map_err(|err| ledger_failure(correlation_id, err))
}

/// Handler for DELETE /employees/:id.
async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    state
        .ledger()
        .delete_employee(id)
        .map_err(|err| ledger_failure(correlation_id, err))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /employees/:id/leave.
///
/// Grants the requested range or rejects it with 422, leaving the record
/// unchanged.
async fn leave_handler(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
    payload: Result<Json<LeaveRequest>, JsonRejection>,
) -> ApiResult<Json<LeaveGrant>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = id, "Processing leave request");

    let Json(request) = payload.map_err(|rejection| json_failure(correlation_id, rejection))?;
    let ledger = state.ledger();
    let grant = ledger.employee(id).and_then(|mut employee| {
        ledger.request_leave(&mut employee, request.first_day, request.last_day)
    });

    grant
        .map(Json)
        .map_err(|err| ledger_failure(correlation_id, err))
}

/// Handler for POST /employees/:id/close-month.
async fn close_month_handler(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
    payload: Result<Json<CloseMonthRequest>, JsonRejection>,
) -> ApiResult<Json<MonthClose>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = id, "Processing month close");

    let Json(request) = payload.map_err(|rejection| json_failure(correlation_id, rejection))?;
    if !request.days_worked.is_finite() || request.days_worked < 0.0 {
        warn!(
            correlation_id = %correlation_id,
            days_worked = request.days_worked,
            "Invalid days worked"
        );
        return Err(ApiErrorResponse::bad_request(ApiError::validation_error(
            "days_worked must be a non-negative number",
        )));
    }

    let ledger = state.ledger();
    let close = ledger
        .employee(id)
        .and_then(|mut employee| ledger.close_month(&mut employee, request.days_worked));

    close
        .map(Json)
        .map_err(|err| ledger_failure(correlation_id, err))
}

/// Handler for GET /employees/:id/company-limit.
///
/// Returns the limit a leave request for the given range would be checked
/// against, with each of its terms.
async fn company_limit_handler(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> ApiResult<Json<CompanyLimit>> {
    let correlation_id = Uuid::new_v4();
    let Query(params) = params.map_err(|rejection| query_failure(correlation_id, rejection))?;
    let ledger = state.ledger();

    let limit = ledger.employee(id).and_then(|employee| {
        ledger.company_limit_breakdown(&LimitInputs {
            current_month: employee.current_month,
            prior_year_accrued: employee.leave_accrued_prior_year,
            contract_start_month: employee.contract_start_month,
            first_leave_day: params.first_day,
            last_leave_day: params.last_day,
        })
    });

    limit
        .map(Json)
        .map_err(|err| ledger_failure(correlation_id, err))
}

fn ledger_failure(correlation_id: Uuid, err: LedgerError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    err.into()
}

fn json_failure(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

fn query_failure(correlation_id: Uuid, rejection: QueryRejection) -> ApiErrorResponse {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Invalid query string"
    );
    ApiErrorResponse::bad_request(ApiError::validation_error(body_text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LeaveLedger;
    use crate::models::WorkingPattern;
    use crate::storage::InMemoryEmployeeRepository;
    use axum::{body::Body, http::Request};
    use chrono::NaiveDate;
    use tower::ServiceExt;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// State with one eligible five-day-week employee (id 1) and a company
    /// ratio of 0.5.
    fn create_test_state() -> AppState {
        let ledger = LeaveLedger::new(InMemoryEmployeeRepository::new());

        let mut employee = Employee::new("Jeannette Dupontelle", date(2024, 1, 1), date(2024, 6, 1));
        employee.days_worked_prior_year = 220.0;
        employee.leave_accrued_prior_year = 30.0;
        employee.working_pattern = WorkingPattern::five_day_week();
        ledger.create_employee(employee).unwrap();

        let mut colleague = Employee::new("Colleague", date(2015, 1, 1), date(2024, 6, 1));
        colleague.leave_accrued_prior_year = 60.0;
        colleague.leave_taken_prior_year = 45.0;
        ledger.create_employee(colleague).unwrap();

        AppState::new(ledger, 20)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_leave_granted_returns_200() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json(
                "/employees/1/leave",
                r#"{"first_day": "2024-07-15", "last_day": "2024-07-19"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let grant: LeaveGrant = body_json(response).await;
        assert_eq!(grant.current_year_days, 5);
        assert_eq!(grant.company_limit.limit, 5);
    }

    #[tokio::test]
    async fn test_leave_rejected_returns_422_and_keeps_record() {
        let state = create_test_state();
        let router = create_router(state.clone());

        let response = router
            .oneshot(post_json(
                "/employees/1/leave",
                r#"{"first_day": "2025-01-13", "last_day": "2025-01-17"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "EXCEEDS_COMPANY_LIMIT");
        assert!(state.ledger().employee(1).unwrap().leave_days_taken.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/employees/1/leave", "{invalid json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_negative_days_worked_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/employees/1/close-month", r#"{"days_worked": -1.0}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_company_limit_breakdown() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/employees/1/company-limit?first_day=2025-01-13&last_day=2025-01-17")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let limit: CompanyLimit = body_json(response).await;
        assert_eq!(limit.limit, 16);
        assert_eq!(limit.base, 22.0);
    }

    #[tokio::test]
    async fn test_update_with_mismatched_id_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/employees/1")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"id": 2, "name": "X", "contract_start_month": "2024-01-01", "current_month": "2024-06-01"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
