use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::DeleteResponse;
use crate::error::{AppError, AppResult};
use crate::models::habit::{
    CreateHabitRequest, Habit, HabitWithStatus, ToggleCompletionRequest, UpdateHabitRequest,
};
use crate::AppState;

fn habit_not_found() -> AppError {
    AppError::NotFound("Habit not found".into())
}

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<HabitWithStatus>> {
    let today = Utc::now().date_naive();

    let habits = state
        .store
        .list_habits()
        .await
        .into_iter()
        .map(|habit| HabitWithStatus {
            completed_today: habit.is_completed_on(today),
            habit,
        })
        .collect();

    Json(habits)
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(body): Json<CreateHabitRequest>,
) -> AppResult<Json<Habit>> {
    body.validate()?;
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("Habit name is required".into()));
    }

    let habit = Habit::new(
        body.name.trim().to_string(),
        body.description,
        body.category.unwrap_or_default(),
    );
    let habit = state.store.append_habit(habit).await?;

    Ok(Json(habit))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<Uuid>,
    Json(body): Json<UpdateHabitRequest>,
) -> AppResult<Json<Habit>> {
    body.validate()?;

    let habit = state
        .store
        .update_habit(habit_id, body)
        .await?
        .ok_or_else(habit_not_found)?;

    Ok(Json(habit))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    if !state.store.delete_habit(habit_id).await? {
        return Err(habit_not_found());
    }

    Ok(Json(DeleteResponse {
        deleted: true,
        id: habit_id,
    }))
}

/// Marks the day complete if it was not, clears it if it was.
pub async fn toggle_completion(
    State(state): State<AppState>,
    Path(habit_id): Path<Uuid>,
    body: Option<Json<ToggleCompletionRequest>>,
) -> AppResult<Json<Habit>> {
    let date = body
        .and_then(|Json(b)| b.date)
        .unwrap_or_else(|| Utc::now().date_naive());

    let habit = state
        .store
        .toggle_habit_completion(habit_id, date)
        .await?
        .ok_or_else(habit_not_found)?;

    tracing::debug!(habit_id = %habit.id, %date, completed = habit.is_completed_on(date), "Habit completion toggled");
    Ok(Json(habit))
}
