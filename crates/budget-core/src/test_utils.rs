//! Test utilities for budget-core
//!
//! This module provides an in-memory mock of the budget planner REST API that
//! client, batch and CLI tests run against. It implements every endpoint the
//! client calls, with the same status codes and `{"detail": ...}` error bodies
//! as the real server. All users share one data set.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;

use crate::api::ApiClient;
use crate::models::{
    AuthResponse, Budget, BudgetEntry, BudgetWrite, BurnRate, Category, CategoryShare,
    GenerateResponse, ImportReport, LoginRequest, MessageResponse, MonthFlow, NewCategory,
    NewRecurringRule, NewTransaction, RecurringRule, Settings, SignupRequest, ToggleResponse,
    Transaction, TransactionType, User,
};
use crate::period::{project_from, CalendarPeriod};

/// Bearer token of the seeded user
pub const MOCK_TOKEN: &str = "mock-token";
pub const MOCK_EMAIL: &str = "demo@example.com";
pub const MOCK_PASSWORD: &str = "demo-password";

const SEED_EXPENSE_CATEGORIES: [&str; 6] = [
    "Groceries",
    "Restaurants",
    "Fuel",
    "Phone",
    "Internet",
    "Electricity",
];
const SEED_INCOME_CATEGORIES: [&str; 3] = ["Paycheck", "Bonus", "Dividends"];
const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

struct MockUser {
    user: User,
    password: String,
    token: String,
}

struct MockState {
    users: Vec<MockUser>,
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    /// Rows served as-is after the typed transactions, like a bad CSV import
    raw_transactions: Vec<serde_json::Value>,
    budgets: Vec<Budget>,
    recurring: Vec<RecurringRule>,
    currency: String,
    failing_budget_periods: HashSet<(u32, i32)>,
    requests: Vec<String>,
    next_id: u64,
}

impl MockState {
    fn seeded() -> Self {
        let mut state = Self {
            users: Vec::new(),
            categories: Vec::new(),
            transactions: Vec::new(),
            raw_transactions: Vec::new(),
            budgets: Vec::new(),
            recurring: Vec::new(),
            currency: "₹".to_string(),
            failing_budget_periods: HashSet::new(),
            requests: Vec::new(),
            next_id: 1,
        };

        let id = state.next_id("user");
        state.users.push(MockUser {
            user: User {
                id,
                email: MOCK_EMAIL.to_string(),
                name: "Demo".to_string(),
            },
            password: MOCK_PASSWORD.to_string(),
            token: MOCK_TOKEN.to_string(),
        });

        let seeds = SEED_EXPENSE_CATEGORIES
            .iter()
            .map(|n| (*n, TransactionType::Expense))
            .chain(
                SEED_INCOME_CATEGORIES
                    .iter()
                    .map(|n| (*n, TransactionType::Income)),
            );
        for (name, kind) in seeds {
            let id = state.next_id("cat");
            state.categories.push(Category {
                id,
                name: name.to_string(),
                kind,
                is_predefined: true,
            });
        }
        state
    }

    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{}-{}", prefix, self.next_id);
        self.next_id += 1;
        id
    }

    fn user_for_token(&self, token: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.token == token)
            .map(|u| &u.user)
    }

    fn total(&self, kind: TransactionType, period: CalendarPeriod) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.kind == kind && period.contains(t.date))
            .map(|t| t.amount)
            .sum()
    }

    fn flow(&self, label: String, period: CalendarPeriod) -> MonthFlow {
        let income = self.total(TransactionType::Income, period);
        let expense = self.total(TransactionType::Expense, period);
        MonthFlow {
            month: label,
            income,
            expense,
            balance: income - expense,
        }
    }
}

type SharedState = Arc<Mutex<MockState>>;

/// Mock budget planner API for testing
pub struct MockBudgetApi {
    addr: SocketAddr,
    state: SharedState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockBudgetApi {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state: SharedState = Arc::new(Mutex::new(MockState::seeded()));

        let api = Router::new()
            .route("/auth/signup", post(signup))
            .route("/auth/login", post(login))
            .route("/auth/me", get(me))
            .route("/categories", get(list_categories).post(create_category))
            .route(
                "/categories/:id",
                put(update_category).delete(delete_category),
            )
            .route(
                "/transactions",
                get(list_transactions).post(create_transaction),
            )
            .route(
                "/transactions/:id",
                put(update_transaction).delete(delete_transaction),
            )
            .route("/budgets", get(list_budgets).post(save_budget))
            .route("/analytics/monthly", get(monthly))
            .route("/analytics/yearly", get(yearly))
            .route("/analytics/fiscal-year", get(fiscal_year))
            .route("/analytics/trend", get(trend))
            .route("/analytics/category-breakdown", get(category_breakdown))
            .route("/analytics/burn-rate", get(burn_rate))
            .route(
                "/recurring-transactions",
                get(list_recurring).post(create_recurring),
            )
            .route("/recurring-transactions/generate", post(generate_recurring))
            .route(
                "/recurring-transactions/:id",
                put(update_recurring).delete(delete_recurring),
            )
            .route("/recurring-transactions/:id/toggle", post(toggle_recurring))
            .route("/settings", get(get_settings).put(update_settings))
            .route("/import/csv", post(import_csv))
            .route("/export/csv", get(export_csv));

        let app = Router::new()
            .nest("/api", api)
            .layer(middleware::from_fn_with_state(state.clone(), record_request))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the API base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Client authenticated as the seeded user
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.url()).with_token(MOCK_TOKEN)
    }

    /// Make every `POST /budgets` for this month/year answer 500
    pub fn fail_budget_writes_for(&self, month: u32, year: i32) {
        let mut state = self.state.lock().unwrap();
        state.failing_budget_periods.insert((month, year));
    }

    /// Stored budgets, in insertion order
    pub fn budgets(&self) -> Vec<Budget> {
        self.state.lock().unwrap().budgets.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().transactions.clone()
    }

    /// Insert a transaction directly, bypassing the API
    pub fn add_transaction(&self, tx: NewTransaction) -> Transaction {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id("txn");
        let stored = Transaction {
            id,
            date: tx.date,
            amount: tx.amount,
            description: tx.description,
            category: tx.category,
            kind: tx.kind,
            is_recurring: false,
            recurring_id: None,
        };
        state.transactions.push(stored.clone());
        stored
    }

    /// Store an unchecked transaction row, e.g. one with a `15/01/2025` date
    pub fn add_raw_transaction(&self, row: serde_json::Value) {
        self.state.lock().unwrap().raw_transactions.push(row);
    }

    /// Store a planned amount directly, bypassing the API
    pub fn set_budget(&self, category: &str, month: u32, year: i32, planned_amount: f64) {
        let mut state = self.state.lock().unwrap();
        upsert_budget(
            &mut state,
            BudgetWrite {
                category: category.to_string(),
                month,
                year,
                planned_amount,
            },
        );
    }

    /// Every request seen so far as "METHOD /path?query"
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockBudgetApi {
    fn drop(&mut self) {
        self.stop();
    }
}

/// `{"detail": ...}` error response
struct ApiError(StatusCode, String);

impl ApiError {
    fn bad_request(detail: &str) -> Self {
        Self(StatusCode::BAD_REQUEST, detail.to_string())
    }

    fn not_found(detail: &str) -> Self {
        Self(StatusCode::NOT_FOUND, detail.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "detail": self.1 }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

async fn record_request(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let line = format!("{} {}", request.method(), request.uri());
    state.lock().unwrap().requests.push(line);
    next.run(request).await
}

fn authorize(state: &MockState, headers: &HeaderMap) -> std::result::Result<User, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token.and_then(|t| state.user_for_token(t)) {
        Some(user) => Ok(user.clone()),
        None => Err(ApiError(
            StatusCode::UNAUTHORIZED,
            "Invalid token".to_string(),
        )),
    }
}

fn message(text: impl Into<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.into(),
    })
}

// Auth

async fn signup(
    State(state): State<SharedState>,
    Json(body): Json<SignupRequest>,
) -> ApiResult<AuthResponse> {
    let mut state = state.lock().unwrap();
    if state.users.iter().any(|u| u.user.email == body.email) {
        return Err(ApiError::bad_request("Email already registered"));
    }
    let id = state.next_id("user");
    let user = User {
        id: id.clone(),
        email: body.email,
        name: body.name,
    };
    let token = format!("token-{}", id);
    state.users.push(MockUser {
        user: user.clone(),
        password: body.password,
        token: token.clone(),
    });
    Ok(Json(AuthResponse { token, user }))
}

async fn login(
    State(state): State<SharedState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let state = state.lock().unwrap();
    state
        .users
        .iter()
        .find(|u| u.user.email == body.email && u.password == body.password)
        .map(|u| {
            Json(AuthResponse {
                token: u.token.clone(),
                user: u.user.clone(),
            })
        })
        .ok_or_else(|| ApiError(StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()))
}

async fn me(State(state): State<SharedState>, headers: HeaderMap) -> ApiResult<User> {
    let state = state.lock().unwrap();
    authorize(&state, &headers).map(Json)
}

// Categories

#[derive(Deserialize)]
struct TypeQuery {
    #[serde(rename = "type")]
    kind: Option<TransactionType>,
}

async fn list_categories(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<TypeQuery>,
) -> ApiResult<Vec<Category>> {
    let state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let categories = state
        .categories
        .iter()
        .filter(|c| query.kind.map_or(true, |k| c.kind == k))
        .cloned()
        .collect();
    Ok(Json(categories))
}

async fn create_category(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<NewCategory>,
) -> ApiResult<Category> {
    let mut state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let id = state.next_id("cat");
    let category = Category {
        id,
        name: body.name,
        kind: body.kind,
        is_predefined: false,
    };
    state.categories.push(category.clone());
    Ok(Json(category))
}

async fn update_category(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<NewCategory>,
) -> ApiResult<MessageResponse> {
    let mut state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let category = state
        .categories
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    category.name = body.name;
    category.kind = body.kind;
    Ok(message("Category updated"))
}

async fn delete_category(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    let mut state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let index = state
        .categories
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    if state.categories[index].is_predefined {
        return Err(ApiError::bad_request("Cannot delete predefined category"));
    }
    state.categories.remove(index);
    Ok(message("Category deleted"))
}

// Transactions

async fn list_transactions(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Vec<serde_json::Value>> {
    let state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let mut rows = Vec::with_capacity(state.transactions.len() + state.raw_transactions.len());
    for tx in &state.transactions {
        rows.push(serde_json::to_value(tx).map_err(|e| ApiError::bad_request(&e.to_string()))?);
    }
    rows.extend(state.raw_transactions.iter().cloned());
    Ok(Json(rows))
}

async fn create_transaction(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<NewTransaction>,
) -> ApiResult<Transaction> {
    let mut state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let id = state.next_id("txn");
    let tx = Transaction {
        id,
        date: body.date,
        amount: body.amount,
        description: body.description,
        category: body.category,
        kind: body.kind,
        is_recurring: false,
        recurring_id: None,
    };
    state.transactions.push(tx.clone());
    Ok(Json(tx))
}

async fn update_transaction(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<NewTransaction>,
) -> ApiResult<MessageResponse> {
    let mut state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let tx = state
        .transactions
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| ApiError::not_found("Transaction not found"))?;
    tx.date = body.date;
    tx.amount = body.amount;
    tx.description = body.description;
    tx.category = body.category;
    tx.kind = body.kind;
    Ok(message("Transaction updated"))
}

async fn delete_transaction(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    let mut state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let before = state.transactions.len();
    state.transactions.retain(|t| t.id != id);
    if state.transactions.len() == before {
        return Err(ApiError::not_found("Transaction not found"));
    }
    Ok(message("Transaction deleted"))
}

// Budgets

#[derive(Deserialize)]
struct BudgetQuery {
    month: Option<u32>,
    year: Option<i32>,
}

async fn list_budgets(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<BudgetQuery>,
) -> ApiResult<Vec<Budget>> {
    let state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let budgets = state
        .budgets
        .iter()
        .filter(|b| query.month.map_or(true, |m| b.month == m))
        .filter(|b| query.year.map_or(true, |y| b.year == y))
        .cloned()
        .collect();
    Ok(Json(budgets))
}

async fn save_budget(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<BudgetWrite>,
) -> ApiResult<MessageResponse> {
    let mut state = state.lock().unwrap();
    authorize(&state, &headers)?;
    if state
        .failing_budget_periods
        .contains(&(body.month, body.year))
    {
        return Err(ApiError(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Budget write failed".to_string(),
        ));
    }
    let created = upsert_budget(&mut state, body);
    Ok(message(if created {
        "Budget created"
    } else {
        "Budget updated"
    }))
}

/// Returns true when a new budget row was created
fn upsert_budget(state: &mut MockState, write: BudgetWrite) -> bool {
    if let Some(existing) = state.budgets.iter_mut().find(|b| {
        b.category == write.category && b.month == write.month && b.year == write.year
    }) {
        existing.planned_amount = write.planned_amount;
        return false;
    }
    let id = state.next_id("budget");
    state.budgets.push(Budget {
        id,
        category: write.category,
        month: write.month,
        year: write.year,
        planned_amount: write.planned_amount,
    });
    true
}

// Analytics

#[derive(Deserialize)]
struct PeriodQuery {
    month: u32,
    year: i32,
}

fn period_from(month: u32, year: i32) -> std::result::Result<CalendarPeriod, ApiError> {
    CalendarPeriod::new(month, year).map_err(|e| ApiError::bad_request(&e.to_string()))
}

async fn monthly(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Vec<BudgetEntry>> {
    let state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let period = period_from(query.month, query.year)?;

    let entries = state
        .categories
        .iter()
        .filter(|c| c.kind == TransactionType::Expense)
        .map(|c| {
            let actual: f64 = state
                .transactions
                .iter()
                .filter(|t| {
                    t.kind == TransactionType::Expense
                        && t.category == c.name
                        && period.contains(t.date)
                })
                .map(|t| t.amount)
                .sum();
            let planned = state
                .budgets
                .iter()
                .find(|b| b.category == c.name && b.month == query.month && b.year == query.year)
                .map_or(0.0, |b| b.planned_amount);
            BudgetEntry {
                category: c.name.clone(),
                actual,
                planned,
                difference: planned - actual,
            }
        })
        .collect();
    Ok(Json(entries))
}

#[derive(Deserialize)]
struct YearQuery {
    year: i32,
}

async fn yearly(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<YearQuery>,
) -> ApiResult<Vec<MonthFlow>> {
    let state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let start = period_from(1, query.year)?;
    let rows = project_from(start, 12)
        .into_iter()
        .map(|p| state.flow(SHORT_MONTHS[(p.month() - 1) as usize].to_string(), p))
        .collect();
    Ok(Json(rows))
}

#[derive(Deserialize)]
struct FiscalQuery {
    start_year: i32,
}

async fn fiscal_year(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<FiscalQuery>,
) -> ApiResult<Vec<MonthFlow>> {
    let state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let start = period_from(4, query.start_year)?;
    let rows = project_from(start, 12)
        .into_iter()
        .map(|p| state.flow(SHORT_MONTHS[(p.month() - 1) as usize].to_string(), p))
        .collect();
    Ok(Json(rows))
}

#[derive(Deserialize)]
struct TrendQuery {
    months: u32,
}

async fn trend(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<TrendQuery>,
) -> ApiResult<Vec<MonthFlow>> {
    let state = state.lock().unwrap();
    authorize(&state, &headers)?;

    // Walk back from the current month, then report oldest first
    let mut periods = Vec::new();
    let mut current = CalendarPeriod::current();
    for _ in 0..query.months {
        periods.push(current);
        current = previous(current);
    }
    periods.reverse();

    let rows = periods
        .into_iter()
        .map(|p| {
            let label = format!("{} {}", SHORT_MONTHS[(p.month() - 1) as usize], p.year());
            state.flow(label, p)
        })
        .collect();
    Ok(Json(rows))
}

fn previous(period: CalendarPeriod) -> CalendarPeriod {
    let (month, year) = if period.month() == 1 {
        (12, period.year() - 1)
    } else {
        (period.month() - 1, period.year())
    };
    CalendarPeriod::new(month, year).unwrap_or(period)
}

#[derive(Deserialize)]
struct BreakdownQuery {
    month: u32,
    year: i32,
    #[serde(rename = "type")]
    kind: TransactionType,
}

async fn category_breakdown(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<BreakdownQuery>,
) -> ApiResult<Vec<CategoryShare>> {
    let state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let period = period_from(query.month, query.year)?;

    let mut totals: Vec<(String, f64)> = Vec::new();
    for tx in state
        .transactions
        .iter()
        .filter(|t| t.kind == query.kind && period.contains(t.date))
    {
        match totals.iter_mut().find(|(name, _)| *name == tx.category) {
            Some((_, total)) => *total += tx.amount,
            None => totals.push((tx.category.clone(), tx.amount)),
        }
    }
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));

    let grand_total: f64 = totals.iter().map(|(_, t)| t).sum();
    let shares = totals
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category,
            amount,
            percentage: if grand_total > 0.0 {
                amount / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect();
    Ok(Json(shares))
}

async fn burn_rate(State(state): State<SharedState>, headers: HeaderMap) -> ApiResult<BurnRate> {
    let state = state.lock().unwrap();
    authorize(&state, &headers)?;

    let today = Local::now().date_naive();
    let mut spent = 0.0;
    let mut months_counted = 0u32;
    for i in 0..3 {
        let period = CalendarPeriod::from_date(today - Duration::days(30 * i));
        let in_month = state
            .transactions
            .iter()
            .any(|t| t.kind == TransactionType::Expense && period.contains(t.date));
        if in_month {
            spent += state.total(TransactionType::Expense, period);
            months_counted += 1;
        }
    }
    let monthly_burn_rate = if months_counted > 0 {
        spent / f64::from(months_counted)
    } else {
        0.0
    };

    let sum = |kind: TransactionType| -> f64 {
        state
            .transactions
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum()
    };
    let current_balance = sum(TransactionType::Income) - sum(TransactionType::Expense);
    let runway_months = if monthly_burn_rate > 0.0 {
        current_balance / monthly_burn_rate
    } else {
        0.0
    };

    Ok(Json(BurnRate {
        monthly_burn_rate,
        current_balance,
        runway_months,
    }))
}

// Recurring

async fn list_recurring(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Vec<RecurringRule>> {
    let state = state.lock().unwrap();
    authorize(&state, &headers)?;
    Ok(Json(state.recurring.clone()))
}

async fn create_recurring(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<NewRecurringRule>,
) -> ApiResult<RecurringRule> {
    let mut state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let id = state.next_id("rec");
    let rule = RecurringRule {
        id,
        amount: body.amount,
        description: body.description,
        category: body.category,
        kind: body.kind,
        day_of_month: body.day_of_month,
        start_date: body.start_date,
        end_date: body.end_date,
        is_active: true,
    };
    state.recurring.push(rule.clone());
    Ok(Json(rule))
}

async fn update_recurring(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<NewRecurringRule>,
) -> ApiResult<MessageResponse> {
    let mut state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let rule = state
        .recurring
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| ApiError::not_found("Recurring transaction not found"))?;
    rule.amount = body.amount;
    rule.description = body.description;
    rule.category = body.category;
    rule.kind = body.kind;
    rule.day_of_month = body.day_of_month;
    rule.start_date = body.start_date;
    rule.end_date = body.end_date;
    Ok(message("Recurring transaction updated"))
}

async fn delete_recurring(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    let mut state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let before = state.recurring.len();
    state.recurring.retain(|r| r.id != id);
    if state.recurring.len() == before {
        return Err(ApiError::not_found("Recurring transaction not found"));
    }
    Ok(message("Recurring transaction deleted"))
}

async fn toggle_recurring(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<ToggleResponse> {
    let mut state = state.lock().unwrap();
    authorize(&state, &headers)?;
    let rule = state
        .recurring
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| ApiError::not_found("Recurring transaction not found"))?;
    rule.is_active = !rule.is_active;
    let is_active = rule.is_active;
    Ok(Json(ToggleResponse {
        message: format!(
            "Recurring transaction {}",
            if is_active { "activated" } else { "deactivated" }
        ),
        is_active,
    }))
}

async fn generate_recurring(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<GenerateResponse> {
    let mut state = state.lock().unwrap();
    authorize(&state, &headers)?;

    let today = Local::now().date_naive();
    let mut count = 0u32;
    let active: Vec<RecurringRule> = state
        .recurring
        .iter()
        .filter(|r| r.is_active)
        .cloned()
        .collect();
    for rule in active {
        let Some(date) = NaiveDate::from_ymd_opt(today.year(), today.month(), rule.day_of_month)
        else {
            continue;
        };
        let exists = state
            .transactions
            .iter()
            .any(|t| t.recurring_id.as_deref() == Some(rule.id.as_str()) && t.date == date);
        if exists {
            continue;
        }
        let id = state.next_id("txn");
        state.transactions.push(Transaction {
            id,
            date,
            amount: rule.amount,
            description: rule.description.clone(),
            category: rule.category.clone(),
            kind: rule.kind,
            is_recurring: true,
            recurring_id: Some(rule.id.clone()),
        });
        count += 1;
    }

    Ok(Json(GenerateResponse {
        message: format!("Generated {} recurring transactions", count),
        count,
    }))
}

// Settings

async fn get_settings(State(state): State<SharedState>, headers: HeaderMap) -> ApiResult<Settings> {
    let state = state.lock().unwrap();
    authorize(&state, &headers)?;
    Ok(Json(Settings {
        currency: state.currency.clone(),
    }))
}

#[derive(Deserialize)]
struct CurrencyQuery {
    currency: String,
}

async fn update_settings(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<CurrencyQuery>,
) -> ApiResult<MessageResponse> {
    let mut state = state.lock().unwrap();
    authorize(&state, &headers)?;
    state.currency = query.currency;
    Ok(message("Settings updated"))
}

// Import / export

#[derive(Deserialize)]
struct ImportRow {
    date: String,
    #[serde(rename = "type")]
    kind: String,
    category: String,
    description: String,
    amount: String,
}

async fn import_csv(
    State(state): State<SharedState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<ImportReport> {
    authorize(&state.lock().unwrap(), &headers)?;

    let mut upload = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(&e.to_string()))?;
            upload = Some((file_name, bytes));
        }
    }
    let (file_name, bytes) = upload.ok_or_else(|| ApiError::bad_request("Missing file"))?;
    if !file_name.ends_with(".csv") {
        return Err(ApiError::bad_request("File must be a CSV"));
    }

    let mut reader = csv::Reader::from_reader(&bytes[..]);
    let mut parsed = Vec::new();
    let mut errors = Vec::new();
    for (index, row) in reader.deserialize::<ImportRow>().enumerate() {
        let row_num = index + 2;
        match row.map_err(|e| e.to_string()).and_then(parse_import_row) {
            Ok(tx) => parsed.push(tx),
            Err(e) => errors.push(format!("Row {}: {}", row_num, e)),
        }
    }

    let mut state = state.lock().unwrap();
    let imported = parsed.len() as u32;
    for tx in parsed {
        let id = state.next_id("txn");
        state.transactions.push(Transaction {
            id,
            date: tx.date,
            amount: tx.amount,
            description: tx.description,
            category: tx.category,
            kind: tx.kind,
            is_recurring: false,
            recurring_id: None,
        });
    }

    Ok(Json(ImportReport {
        message: format!("Imported {} transactions", imported),
        imported,
        errors: if errors.is_empty() { None } else { Some(errors) },
    }))
}

fn parse_import_row(row: ImportRow) -> std::result::Result<NewTransaction, String> {
    let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {}", row.date, e))?;
    let amount: f64 = row
        .amount
        .trim()
        .parse()
        .map_err(|_| format!("invalid amount '{}'", row.amount))?;
    let kind: TransactionType = row.kind.parse()?;
    Ok(NewTransaction {
        date,
        amount,
        description: row.description,
        category: row.category,
        kind,
    })
}

#[derive(Deserialize)]
struct ExportQuery {
    fiscal_year: Option<i32>,
}

async fn export_csv(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<ExportQuery>,
) -> std::result::Result<Response, ApiError> {
    let state = state.lock().unwrap();
    authorize(&state, &headers)?;

    let fiscal_periods: Option<Vec<CalendarPeriod>> = match query.fiscal_year {
        Some(year) => Some(project_from(period_from(4, year)?, 12)),
        None => None,
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(crate::templates::IMPORT_HEADER)
        .map_err(|e| ApiError(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    for tx in state.transactions.iter().filter(|t| {
        fiscal_periods
            .as_ref()
            .map_or(true, |ps| ps.iter().any(|p| p.contains(t.date)))
    }) {
        writer
            .write_record([
                tx.date.to_string(),
                tx.kind.as_str().to_string(),
                tx.category.clone(),
                tx.description.clone(),
                tx.amount.to_string(),
            ])
            .map_err(|e| ApiError(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    }
    let body = writer
        .into_inner()
        .map_err(|e| ApiError(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let disposition = format!(
        "attachment; filename={}",
        crate::api::export_file_name(query.fiscal_year)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// Convenience for tests that need dated transactions
pub fn new_tx(date: &str, kind: TransactionType, category: &str, amount: f64) -> NewTransaction {
    NewTransaction {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        amount,
        description: format!("{} {}", category, date),
        category: category.to_string(),
        kind,
    }
}

/// All periods the mock was asked to write budgets for, sorted
pub fn written_periods(budgets: &[Budget]) -> Vec<(u32, i32)> {
    let mut periods: Vec<(u32, i32)> = budgets
        .iter()
        .map(|b| (b.month, b.year))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    periods.sort_by_key(|(m, y)| (*y, *m));
    periods
}

/// Planned amounts keyed by (category, month, year)
pub fn planned_by_key(budgets: &[Budget]) -> HashMap<(String, u32, i32), f64> {
    budgets
        .iter()
        .map(|b| ((b.category.clone(), b.month, b.year), b.planned_amount))
        .collect()
}
