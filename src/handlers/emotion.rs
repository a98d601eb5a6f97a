use axum::{extract::State, Json};

use crate::dto::ClassifyRequest;
use crate::error::AppResult;
use crate::models::emotion::ClassificationResult;
use crate::AppState;

/// Always answers; degraded results carry `method: "keywords"`.
pub async fn classify(
    State(state): State<AppState>,
    Json(body): Json<ClassifyRequest>,
) -> Json<ClassificationResult> {
    Json(state.analyzer.classify(&body.text).await)
}

pub async fn preview(
    State(state): State<AppState>,
    Json(body): Json<ClassifyRequest>,
) -> AppResult<Json<ClassificationResult>> {
    let result = state.analyzer.preview(&body.text).await?;
    Ok(Json(result))
}
