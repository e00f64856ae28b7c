use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, AppState};
use crate::tracker::{AddCategoryOutcome, BudgetUpdateOutcome, Tracker};

const VERSION: &str = env!("CARGO_PKG_VERSION");

type ApiResult = Result<Json<Value>, ApiError>;

#[derive(Debug, Deserialize)]
pub(crate) struct BudgetParams {
    new_budget: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewCategoryParams {
    new_category: String,
    budget: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoveCategoryParams {
    category: String,
}

/// Runs a store call off the async runtime; rusqlite is blocking.
async fn blocking<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Tracker) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let tracker = state.tracker.clone();
    Ok(tokio::task::spawn_blocking(move || f(&tracker)).await??)
}

/// GET /health
pub(crate) async fn health() -> &'static str {
    "ok"
}

/// GET / - period totals and category names
pub(crate) async fn root(State(state): State<AppState>) -> ApiResult {
    let period = state.period();
    let overview = blocking(&state, move |t| t.overview(period)).await?;

    Ok(Json(json!({
        "description": format!(
            "Welcome to the Personal Expense Tracker API. It tracks a monthly budget, \
             currently showing {period}. You can set the budget, add and remove \
             spending categories, and view the remaining balance."
        ),
        "version": VERSION,
        "current_date": chrono::Local::now().to_rfc3339(),
        "month": overview.period.month_name(),
        "year": overview.period.year(),
        "current_budget": overview.budget,
        "current_expenditure": overview.expenditure,
        "current_remaining": overview.remaining,
        "categories": overview.categories,
    })))
}

/// GET /categories - names plus per-category figures
pub(crate) async fn list_categories(State(state): State<AppState>) -> ApiResult {
    let period = state.period();
    let summary = blocking(&state, move |t| t.category_summary(period)).await?;

    Ok(Json(json!({
        "description": format!("A list of categories and budget for {period}."),
        "version": VERSION,
        "current_date": chrono::Local::now().to_rfc3339(),
        "categories": summary.categories,
        "breakdown": summary.breakdown,
    })))
}

/// PUT /budget?new_budget=<int>
pub(crate) async fn update_budget(
    State(state): State<AppState>,
    Query(params): Query<BudgetParams>,
) -> ApiResult {
    let period = state.period();
    let outcome = blocking(&state, move |t| t.update_budget(period, params.new_budget)).await?;

    let body = match &outcome {
        BudgetUpdateOutcome::Updated { budget, allocated } => {
            let mut body = json!({
                "message": outcome.message(),
                "current_budget": budget,
                "allocated_budget": allocated,
            });
            if let Some(short) = outcome.over_allocated_by() {
                body["warning"] = json!(format!(
                    "Categories hold {allocated}, which is {short} more than the budget."
                ));
            }
            body
        }
        BudgetUpdateOutcome::Negative => json!({ "message": outcome.message() }),
    };
    Ok(Json(body))
}

/// POST /categories?new_category=<string>&budget=<int>
pub(crate) async fn add_category(
    State(state): State<AppState>,
    Query(params): Query<NewCategoryParams>,
) -> ApiResult {
    let period = state.period();
    let NewCategoryParams {
        new_category,
        budget,
    } = params;
    let outcome = blocking(&state, move |t| t.add_category(&new_category, budget, period)).await?;

    let body = match &outcome {
        AddCategoryOutcome::Added {
            category,
            current_budget,
        } => json!({
            "message": outcome.message(),
            "category": category,
            "current_budget": current_budget,
        }),
        _ => json!({ "message": outcome.message() }),
    };
    Ok(Json(body))
}

/// DELETE /categories?category=<string>
pub(crate) async fn remove_category(
    State(state): State<AppState>,
    Query(params): Query<RemoveCategoryParams>,
) -> ApiResult {
    let period = state.period();
    let outcome = blocking(&state, move |t| t.remove_category(&params.category, period)).await?;
    Ok(Json(json!({ "message": outcome.message() })))
}
