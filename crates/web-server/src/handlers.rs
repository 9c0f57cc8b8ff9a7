use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use core_types::{Dimension, OrderRecord};
use metrics::{BreakdownPolicy, BreakdownRow, SummaryReport};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Longest group label a bar chart shows before ellipsizing.
const CHART_LABEL_MAX: usize = 20;

/// Categories shown in the category bar chart.
const CATEGORY_CHART_BARS: usize = 8;

/// A plain data series for one chart: labels with their values. Figure
/// construction and styling belong to whoever renders this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
}

/// Shape of the currently loaded dataset, for the exploration view header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub rows: u64,
    pub source_file: Option<String>,
    pub first_purchase: Option<String>,
    pub last_purchase: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatesQuery {
    /// Overrides the configured top-N; the exploration view passes 15.
    pub limit: Option<usize>,
}

impl AppState {
    /// The loaded order table, or the empty table when no dataset was found.
    fn orders(&self) -> &[OrderRecord] {
        self.dataset
            .as_ref()
            .map(|loaded| loaded.orders.as_slice())
            .unwrap_or(&[])
    }

    fn category_policy(&self) -> BreakdownPolicy {
        BreakdownPolicy {
            min_orders: self.breakdowns.category_min_orders,
            top_n: Some(self.breakdowns.category_top_n),
        }
    }

    fn state_policy(&self, limit: Option<usize>) -> BreakdownPolicy {
        BreakdownPolicy {
            min_orders: self.breakdowns.state_min_orders,
            top_n: Some(limit.unwrap_or(self.breakdowns.state_top_n)),
        }
    }
}

/// # GET /api/summary
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SummaryReport>, AppError> {
    let summary = state.engine.summarize(state.orders())?;
    Ok(Json(summary))
}

/// # GET /api/categories
pub async fn get_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BreakdownRow>>, AppError> {
    let table =
        state
            .engine
            .breakdown(state.orders(), Dimension::Category, &state.category_policy())?;
    Ok(Json(table))
}

/// # GET /api/payments
pub async fn get_payments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BreakdownRow>>, AppError> {
    let table = state.engine.breakdown(
        state.orders(),
        Dimension::PaymentType,
        &BreakdownPolicy::unfiltered(),
    )?;
    Ok(Json(table))
}

/// # GET /api/states
pub async fn get_states(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatesQuery>,
) -> Result<Json<Vec<BreakdownRow>>, AppError> {
    let table = state.engine.breakdown(
        state.orders(),
        Dimension::CustomerState,
        &state.state_policy(query.limit),
    )?;
    Ok(Json(table))
}

/// # GET /api/overview
pub async fn get_overview(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DatasetOverview>, AppError> {
    let orders = state.orders();
    let timestamps = || orders.iter().filter_map(|order| order.purchased_at);

    let overview = DatasetOverview {
        rows: orders.len() as u64,
        source_file: state.dataset.as_ref().and_then(|loaded| {
            loaded
                .source
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        }),
        first_purchase: timestamps()
            .min()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
        last_purchase: timestamps()
            .max()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
    };
    Ok(Json(overview))
}

/// # GET /api/charts/abandonment_pie
///
/// Pie input is just the two outcome counts from the summary.
pub async fn abandonment_pie_chart(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChartSeries>, AppError> {
    let summary = state.engine.summarize(state.orders())?;
    Ok(Json(ChartSeries {
        title: "Order Completion vs Abandonment".to_string(),
        labels: vec![
            "Completed Orders".to_string(),
            "Abandoned Orders".to_string(),
        ],
        values: vec![
            Decimal::from(summary.completed_orders),
            Decimal::from(summary.abandoned_orders),
        ],
    }))
}

/// # GET /api/charts/category_bar
pub async fn category_bar_chart(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChartSeries>, AppError> {
    let table =
        state
            .engine
            .breakdown(state.orders(), Dimension::Category, &state.category_policy())?;

    let bars = table.iter().take(CATEGORY_CHART_BARS);
    Ok(Json(ChartSeries {
        title: "Top Categories by Abandonment Rate".to_string(),
        labels: bars.clone().map(|row| ellipsize(&row.group_key)).collect(),
        values: bars.map(|row| row.abandonment_rate).collect(),
    }))
}

/// # GET /api/charts/payment_bar
pub async fn payment_bar_chart(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChartSeries>, AppError> {
    let table = state.engine.breakdown(
        state.orders(),
        Dimension::PaymentType,
        &BreakdownPolicy::unfiltered(),
    )?;

    Ok(Json(ChartSeries {
        title: "Abandonment Rate by Payment Method".to_string(),
        labels: table.iter().map(|row| row.group_key.clone()).collect(),
        values: table.iter().map(|row| row.abandonment_rate).collect(),
    }))
}

/// # GET /reports/{filename}
///
/// Raw pass-through for generated report artifacts. Only bare filenames are
/// accepted; anything that could escape the reports directory is a 404.
pub async fn serve_report(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(AppError::NotFound(filename));
    }

    let path = state.reports_dir.join(&filename);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound(filename.clone()))?;

    let content_type = match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => "text/csv",
        Some("html") => "text/html",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    };

    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

fn ellipsize(label: &str) -> String {
    if label.chars().count() > CHART_LABEL_MAX {
        let mut short: String = label.chars().take(CHART_LABEL_MAX).collect();
        short.push_str("...");
        short
    } else {
        label.to_string()
    }
}
