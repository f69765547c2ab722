//! Faculty ratio handler
//!
//! Parameterized lookup against the graph store. The institution name
//! arrives as an explicit query parameter; the response carries the raw
//! counts alongside the computed fraction so clients can render either.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;
use scholarlens_common::errors::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct RatioParams {
    #[serde(default)]
    pub institution: String,
}

#[derive(Serialize)]
pub struct RatioResponse {
    pub institution: String,
    pub total_faculty: i64,
    pub institution_faculty: i64,
    pub ratio: f64,
}

/// The parameter is required; absent and all-whitespace are equivalent.
fn require_institution(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::MissingParameter {
            name: "institution".to_string(),
        });
    }
    Ok(trimmed)
}

/// GET /api/faculty-ratio?institution=...
pub async fn faculty_ratio(
    State(state): State<AppState>,
    Query(params): Query<RatioParams>,
) -> Result<Json<RatioResponse>> {
    let institution = require_institution(&params.institution)?;

    let ratio = state.graph.faculty_ratio(institution).await?;

    Ok(Json(RatioResponse {
        institution: institution.to_string(),
        total_faculty: ratio.total_faculty,
        institution_faculty: ratio.institution_faculty,
        ratio: ratio.ratio,
    }))
}
