//! HTTP handlers: thin adapters from requests to [`TaskRepo`] calls.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use tasks_core::{Task, TaskFilter, TaskId, TaskInput};
use tasks_store::TaskRepo;

use crate::error::ApiErrorResponse;
use crate::server::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Raw listing query. Values are parsed by [`TaskFilter::from_query`] so that
/// malformed flags produce a 400 with field details.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub is_completed: Option<String>,
    pub sort_descending: Option<String>,
}

/// Location of a task resource.
pub fn task_location(id: TaskId) -> String {
    format!("/api/tasks/{id}")
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// `GET /api/tasks`
pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Query(query) = query?;
    let filter = TaskFilter::from_query(
        query.is_completed.as_deref(),
        query.sort_descending.as_deref(),
    )?;
    let tasks = TaskRepo::new(state.db.clone()).list(&filter)?;
    Ok(Json(tasks))
}

/// `GET /api/tasks/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    id: Result<Path<TaskId>, PathRejection>,
) -> ApiResult<Json<Task>> {
    let Path(id) = id?;
    let task = TaskRepo::new(state.db.clone()).get(id)?;
    Ok(Json(task))
}

/// `POST /api/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<TaskInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = body?;
    let fields = input.into_fields(now())?;
    let task = TaskRepo::new(state.db.clone()).create(&fields)?;
    info!(task_id = task.id, "task created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, task_location(task.id))],
        Json(task),
    ))
}

/// `PUT /api/tasks/{id}`, full replacement.
pub async fn update_task(
    State(state): State<AppState>,
    id: Result<Path<TaskId>, PathRejection>,
    body: Result<Json<TaskInput>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let Json(input) = body?;
    if input.id != id {
        return Err(ApiErrorResponse::id_mismatch(id, input.id));
    }

    let task = Task::from_fields(id, input.into_fields(now())?);
    TaskRepo::new(state.db.clone()).update(id, &task)?;
    info!(task_id = id, "task updated");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/tasks/{id}`
pub async fn delete_task(
    State(state): State<AppState>,
    id: Result<Path<TaskId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    TaskRepo::new(state.db.clone()).delete(id)?;
    info!(task_id = id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match TaskRepo::new(state.db.clone()).count() {
        Ok(count) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "tasks": count })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy" })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasks_store::Database;

    fn state() -> AppState {
        AppState {
            db: Database::in_memory().unwrap(),
        }
    }

    #[tokio::test]
    async fn list_rejects_malformed_flag() {
        let query = ListQuery {
            is_completed: Some("maybe".into()),
            sort_descending: None,
        };
        let err = list_tasks(State(state()), Ok(Query(query))).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn list_filters_incomplete() {
        let query = ListQuery {
            is_completed: Some("false".into()),
            sort_descending: None,
        };
        let Json(tasks) = list_tasks(State(state()), Ok(Query(query))).await.unwrap();
        assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn update_checks_id_before_fields() {
        // Body is invalid too, but the mismatch wins.
        let input = TaskInput {
            id: 2,
            ..TaskInput::default()
        };
        let err = update_task(State(state()), Ok(Path(1)), Ok(Json(input)))
            .await
            .unwrap_err();
        assert_eq!(err.error.code, "ID_MISMATCH");
    }

    #[tokio::test]
    async fn update_defaults_omitted_due_date() {
        let state = state();
        let input = TaskInput {
            id: 1,
            ..TaskInput::new("No date given")
        };
        let status = update_task(State(state.clone()), Ok(Path(1)), Ok(Json(input)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        let task = TaskRepo::new(state.db).get(1).unwrap();
        assert!(task.due_date.is_some());
        assert_eq!(task.description, None);
    }

    #[tokio::test]
    async fn delete_missing_is_404() {
        let err = delete_task(State(state()), Ok(Path(77))).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn location_points_at_get_by_id() {
        assert_eq!(task_location(12), "/api/tasks/12");
    }
}
