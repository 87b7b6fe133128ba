// FinWise - Dashboard API Server
// Serves transactions, dashboard aggregates, and the calculator endpoints
// the front-end widgets call.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use finwise::{
    aggregate, compare_regimes, get_all_transactions, sip_future_value, CategoryRuleSet,
    Deductions, TaxComparison, Transaction,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
    rules: Arc<CategoryRuleSet>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/transactions - All stored transactions, most recent first
async fn get_transactions(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    match get_all_transactions(&conn) {
        Ok(transactions) => {
            (StatusCode::OK, Json(ApiResponse::ok(transactions))).into_response()
        }
        Err(e) => {
            eprintln!("Error getting transactions: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::ok(Vec::<Transaction>::new())),
            )
                .into_response()
        }
    }
}

/// GET /api/dashboard - The four derived dashboard views
async fn get_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    match get_all_transactions(&conn) {
        Ok(transactions) => {
            let data = aggregate(&transactions, &state.rules);
            (StatusCode::OK, Json(ApiResponse::ok(data))).into_response()
        }
        Err(e) => {
            eprintln!("Error building dashboard: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::ok(())),
            )
                .into_response()
        }
    }
}

/// GET /api/categories - Expense share per category
async fn get_categories(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    match get_all_transactions(&conn) {
        Ok(transactions) => {
            let data = aggregate(&transactions, &state.rules);
            (StatusCode::OK, Json(ApiResponse::ok(data.expense_categories))).into_response()
        }
        Err(e) => {
            eprintln!("Error getting categories: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::ok(())),
            )
                .into_response()
        }
    }
}

/// GET /api/categories/:name - Transactions classified under one category
async fn get_category_transactions(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    // Category names carry spaces and ampersands ("Food & Dining")
    let decoded_name = urlencoding::decode(&name)
        .unwrap_or_else(|_| name.clone().into())
        .into_owned();

    match get_all_transactions(&conn) {
        Ok(transactions) => {
            let filtered: Vec<Transaction> = transactions
                .into_iter()
                .filter(|tx| state.rules.classify(tx).eq_ignore_ascii_case(&decoded_name))
                .collect();

            (StatusCode::OK, Json(ApiResponse::ok(filtered))).into_response()
        }
        Err(e) => {
            eprintln!("Error filtering category {}: {}", decoded_name, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::ok(Vec::<Transaction>::new())),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Calculator endpoints
// ============================================================================

#[derive(Deserialize)]
struct SipQuery {
    monthly_amount: f64,
    annual_rate_pct: f64,
    years: u32,
}

#[derive(Serialize)]
struct SipResponse {
    invested: f64,
    future_value: f64,
}

/// GET /api/calculators/sip?monthly_amount=..&annual_rate_pct=..&years=..
async fn calc_sip(Query(query): Query<SipQuery>) -> impl IntoResponse {
    let future_value =
        sip_future_value(query.monthly_amount, query.annual_rate_pct, query.years);

    Json(ApiResponse::ok(SipResponse {
        invested: query.monthly_amount * (query.years * 12) as f64,
        future_value,
    }))
}

#[derive(Deserialize)]
struct TaxQuery {
    income: f64,
    #[serde(default)]
    section_80c: f64,
    #[serde(default)]
    section_80d: f64,
    #[serde(default)]
    housing_loan_interest: f64,
}

/// GET /api/calculators/tax?income=..&section_80c=..
async fn calc_tax(Query(query): Query<TaxQuery>) -> Json<ApiResponse<TaxComparison>> {
    let deductions = Deductions {
        section_80c: query.section_80c,
        section_80d: query.section_80d,
        housing_loan_interest: query.housing_loan_interest,
    };

    Json(ApiResponse::ok(compare_regimes(query.income, deductions)))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 FinWise - Dashboard API Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Open database
    let db_path = std::env::var("FINWISE_DB").unwrap_or_else(|_| "finwise.db".to_string());
    let db_path = std::path::Path::new(&db_path);

    if !db_path.exists() {
        eprintln!("❌ Database not found at {:?}", db_path);
        eprintln!("   Run: finwise import <transactions.json>");
        eprintln!("   to import a feed first.");
        std::process::exit(1);
    }

    let conn = Connection::open(db_path).expect("Failed to open database");
    println!("✓ Database opened: {:?}", db_path);

    // Create shared state
    let state = AppState {
        db: Arc::new(Mutex::new(conn)),
        rules: Arc::new(CategoryRuleSet::with_defaults()),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/transactions", get(get_transactions))
        .route("/dashboard", get(get_dashboard))
        .route("/categories", get(get_categories))
        .route("/categories/:name", get(get_category_transactions))
        .route("/calculators/sip", get(calc_sip))
        .route("/calculators/tax", get(calc_tax))
        .with_state(state);

    // Build main router
    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server (the front-end expects the backend on port 5000)
    let addr = "0.0.0.0:5000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:5000");
    println!("   API: http://localhost:5000/api/dashboard");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
