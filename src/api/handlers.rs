//! HTTP request handlers for the bakery back-office API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::attendance::{AttendanceStatus, Checkout, EndedBreak, Resumption};
use crate::cash::{RegisterClosure, RegisterSnapshot, encode_payment_type};
use crate::catalog::ProductDraft;
use crate::config::SystemProfile;
use crate::error::PosResult;
use crate::models::{
    BreakSession, ExitType, Expense, OrderPayment, PaymentSource, Product, Sale, WorkSession,
};

use super::auth::{CurrentUser, require_manager};
use super::request::{
    AdminClockAction, AdminClockRequest, BreakRequest, CashClosureRequest, ClockRequest,
    ExpenseRequest, OrderPaymentRequest, SaleRequest,
};
use super::response::ApiErrorResponse;
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/system/config", get(system_config_handler))
        .route("/employee/clock", post(clock_handler))
        .route("/employee/break", post(break_handler))
        .route("/employee/status", get(status_handler))
        .route(
            "/admin/work-sessions",
            get(list_work_sessions_handler).post(admin_clock_handler),
        )
        .route(
            "/admin/cash-closure",
            get(cash_snapshot_handler).post(cash_closure_handler),
        )
        .route("/admin/expenses", post(expense_handler))
        .route(
            "/admin/products",
            get(list_products_handler).post(create_product_handler),
        )
        .route(
            "/admin/products/:id",
            put(update_product_handler).delete(delete_product_handler),
        )
        .route("/sales", post(sale_handler))
        .route("/cake-bar/payments", post(cake_bar_payment_handler))
        .route("/custom-orders/payments", post(custom_order_payment_handler))
        .with_state(state)
}

/// `{ "workSession": ... }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkSessionBody {
    work_session: WorkSession,
}

/// `{ "breakSession": ... }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BreakSessionBody {
    break_session: BreakSession,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DaySheetBody {
    date: chrono::NaiveDate,
    work_sessions: Vec<WorkSession>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ClockOutcome {
    CheckedIn(WorkSessionBody),
    CheckedOut(Checkout),
    Resumed(Resumption),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum BreakOutcome {
    Started(BreakSessionBody),
    Ended(EndedBreak),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum CashClosureOutcome {
    Opened(RegisterSnapshot),
    Closed(RegisterClosure),
}

/// Unwraps a JSON body, mapping rejections to API errors.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiErrorResponse::from_rejection(correlation_id, rejection))
}

/// Logs the outcome of an operation and converts its error.
fn finish<T>(correlation_id: Uuid, action: &'static str, result: PosResult<T>) -> ApiResult<T> {
    match result {
        Ok(value) => {
            info!(correlation_id = %correlation_id, action, "Request completed");
            Ok(value)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                action,
                error = %err,
                "Request rejected"
            );
            Err(err.into())
        }
    }
}

/// Handler for GET /system/config. The only unauthenticated route.
async fn system_config_handler(State(state): State<AppState>) -> Json<SystemProfile> {
    Json(state.config().system().clone())
}

/// Handler for POST /employee/clock.
async fn clock_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> ApiResult<Json<ClockOutcome>> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, user_id = %user.id, ?request, "Processing clock request");

    let now = state.now();
    let tracker = state.tracker();
    let result = match request {
        ClockRequest::Checkin => tracker
            .check_in(&user.id, now)
            .map(|work_session| ClockOutcome::CheckedIn(WorkSessionBody { work_session })),
        ClockRequest::Checkout { exit_type } => tracker
            .check_out(&user.id, exit_type, now)
            .map(ClockOutcome::CheckedOut),
        ClockRequest::ReturnFromBreak => tracker.resume(&user.id, now).map(ClockOutcome::Resumed),
    };
    finish(correlation_id, "clock", result).map(Json)
}

/// Handler for POST /employee/break.
async fn break_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<BreakRequest>, JsonRejection>,
) -> ApiResult<Json<BreakOutcome>> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, user_id = %user.id, ?request, "Processing break request");

    let now = state.now();
    let tracker = state.tracker();
    let result = match request {
        BreakRequest::Start { break_type } => tracker
            .start_break(&user.id, break_type, now)
            .map(|break_session| BreakOutcome::Started(BreakSessionBody { break_session })),
        BreakRequest::End => tracker.end_break(&user.id, now).map(BreakOutcome::Ended),
    };
    finish(correlation_id, "break", result).map(Json)
}

/// Handler for GET /employee/status.
async fn status_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<AttendanceStatus>> {
    let correlation_id = Uuid::new_v4();
    let result = state.tracker().status(&user.id, state.now());
    finish(correlation_id, "status", result).map(Json)
}

/// Handler for GET /admin/work-sessions: everyone's sessions today.
async fn list_work_sessions_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<DaySheetBody>> {
    let correlation_id = Uuid::new_v4();
    let date = state.now().date();
    let result = require_manager(&user, "view work sessions")
        .and_then(|()| state.tracker().day_sheet(date))
        .map(|work_sessions| DaySheetBody {
            date,
            work_sessions,
        });
    finish(correlation_id, "list_work_sessions", result).map(Json)
}

/// Handler for POST /admin/work-sessions: clock an employee in or out.
async fn admin_clock_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<AdminClockRequest>, JsonRejection>,
) -> ApiResult<Json<ClockOutcome>> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        manager_id = %user.id,
        employee_id = %request.employee_id,
        action = ?request.action,
        "Processing admin clock request"
    );

    let now = state.now();
    let result = require_manager(&user, "clock other employees")
        .and_then(|()| state.config().find_staff(&request.employee_id))
        .and_then(|employee| {
            let tracker = state.tracker();
            match request.action {
                AdminClockAction::Checkin => tracker
                    .check_in(&employee.id, now)
                    .map(|work_session| ClockOutcome::CheckedIn(WorkSessionBody { work_session })),
                AdminClockAction::Checkout => tracker
                    .check_out(&employee.id, ExitType::Final, now)
                    .map(ClockOutcome::CheckedOut),
            }
        });
    finish(correlation_id, "admin_clock", result).map(Json)
}

/// Handler for GET /admin/cash-closure.
async fn cash_snapshot_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<RegisterSnapshot>> {
    let correlation_id = Uuid::new_v4();
    let result = require_manager(&user, "view the register")
        .and_then(|()| state.drawer().snapshot(state.now().date()));
    finish(correlation_id, "cash_snapshot", result).map(Json)
}

/// Handler for POST /admin/cash-closure: open or close the register.
async fn cash_closure_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CashClosureRequest>, JsonRejection>,
) -> ApiResult<Json<CashClosureOutcome>> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, user_id = %user.id, ?request, "Processing cash closure request");

    let now = state.now();
    let drawer = state.drawer();
    let result = require_manager(&user, "open or close the register").and_then(|()| match request {
        CashClosureRequest::Open {
            opening_cash,
            notes,
        } => drawer
            .open(opening_cash, notes, &user.id, now)
            .and_then(|_| drawer.snapshot(now.date()))
            .map(CashClosureOutcome::Opened),
        CashClosureRequest::Close { actual_cash, notes } => drawer
            .close(actual_cash, notes, &user.id, now)
            .map(CashClosureOutcome::Closed),
    });
    finish(correlation_id, "cash_closure", result).map(Json)
}

/// Handler for POST /admin/expenses.
async fn expense_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<ExpenseRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    let result = require_manager(&user, "record expenses").and_then(|()| {
        state
            .drawer()
            .record_expense(request.amount, &request.description, &user.id, state.now())
    });
    finish(correlation_id, "record_expense", result).map(|e| (StatusCode::CREATED, Json(e)))
}

/// Handler for GET /admin/products.
async fn list_products_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<Product>>> {
    let correlation_id = Uuid::new_v4();
    let result = require_manager(&user, "manage products").and_then(|()| state.catalog().list());
    finish(correlation_id, "list_products", result).map(Json)
}

/// Handler for POST /admin/products.
async fn create_product_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let correlation_id = Uuid::new_v4();
    let draft = parse_body(correlation_id, payload)?;
    let result =
        require_manager(&user, "manage products").and_then(|()| state.catalog().create(draft));
    finish(correlation_id, "create_product", result).map(|p| (StatusCode::CREATED, Json(p)))
}

/// Handler for PUT /admin/products/:id.
async fn update_product_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let correlation_id = Uuid::new_v4();
    let draft = parse_body(correlation_id, payload)?;
    let result =
        require_manager(&user, "manage products").and_then(|()| state.catalog().update(id, draft));
    finish(correlation_id, "update_product", result).map(Json)
}

/// Handler for DELETE /admin/products/:id.
async fn delete_product_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    let result = require_manager(&user, "manage products").and_then(|()| state.catalog().delete(id));
    finish(correlation_id, "delete_product", result).map(|()| StatusCode::NO_CONTENT)
}

/// Handler for POST /sales.
async fn sale_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<SaleRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    let result = state.catalog().sell(
        &request.items,
        encode_payment_type(&request.payment_type),
        &user.id,
        state.now(),
    );
    finish(correlation_id, "sale", result).map(|s| (StatusCode::CREATED, Json(s)))
}

/// Handler for POST /cake-bar/payments.
async fn cake_bar_payment_handler(
    state: State<AppState>,
    user: CurrentUser,
    payload: Result<Json<OrderPaymentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<OrderPayment>)> {
    take_order_payment(PaymentSource::CakeBar, state, user, payload)
}

/// Handler for POST /custom-orders/payments.
async fn custom_order_payment_handler(
    state: State<AppState>,
    user: CurrentUser,
    payload: Result<Json<OrderPaymentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<OrderPayment>)> {
    take_order_payment(PaymentSource::CustomOrder, state, user, payload)
}

fn take_order_payment(
    source: PaymentSource,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<OrderPaymentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<OrderPayment>)> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    let result = state.drawer().take_order_payment(
        source,
        &request.order_reference,
        request.amount,
        encode_payment_type(&request.payment_type),
        &user.id,
        state.now(),
    );
    finish(correlation_id, "order_payment", result).map(|p| (StatusCode::CREATED, Json(p)))
}
