use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use scheduler_core::models::{NewTaskData, Task, TaskId, UpdateTaskData};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NextDateParams {
    #[serde(default)]
    pub now: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub repeat: String,
}

#[derive(Debug, Deserialize)]
pub struct IdParams {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

/// Task fields as they arrive in create and update bodies.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskPayload {
    pub id: String,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignInPayload {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

type ApiResult<T> = Result<T, ApiError>;

/// `GET /api/nextdate`: the rule evaluated against an explicit `now`, as plain text.
pub async fn next_date(
    State(state): State<AppState>,
    params: Result<Query<NextDateParams>, QueryRejection>,
) -> ApiResult<String> {
    let Query(params) = params?;
    Ok(state
        .service
        .next_date(&params.now, &params.date, &params.repeat)?)
}

pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(payload) = payload?;
    let id = state
        .service
        .create(NewTaskData {
            date: Some(payload.date),
            title: payload.title,
            comment: payload.comment,
            repeat: payload.repeat,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id.value() }))))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<TaskList>> {
    let Query(params) = params?;
    let tasks = state.service.list(params.search.as_deref()).await?;
    Ok(Json(TaskList { tasks }))
}

pub async fn get_task(
    State(state): State<AppState>,
    params: Result<Query<IdParams>, QueryRejection>,
) -> ApiResult<Json<Task>> {
    let id = task_id(params)?;
    Ok(Json(state.service.get(id).await?))
}

pub async fn update_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Json(payload) = payload?;
    let task = state
        .service
        .update(UpdateTaskData {
            id: payload.id.parse()?,
            date: payload.date,
            title: payload.title,
            comment: payload.comment,
            repeat: payload.repeat,
        })
        .await?;

    Ok(Json(task))
}

/// `POST /api/task/done`: one-off tasks are removed, recurring ones rescheduled.
pub async fn complete_task(
    State(state): State<AppState>,
    params: Result<Query<IdParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let id = task_id(params)?;
    state.service.complete(id).await?;
    Ok(Json(json!({})))
}

pub async fn delete_task(
    State(state): State<AppState>,
    params: Result<Query<IdParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let id = task_id(params)?;
    state.service.delete(id).await?;
    Ok(Json(json!({})))
}

pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInPayload>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(payload) = payload?;

    if payload.password != state.password {
        tracing::warn!("sign-in attempt with a wrong password");
        return Err(ApiError::WrongPassword);
    }

    let token = auth::issue_token(&state.password)?;
    Ok(Json(json!({ "token": token })))
}

fn task_id(params: Result<Query<IdParams>, QueryRejection>) -> ApiResult<TaskId> {
    let Query(params) = params?;
    Ok(params.id.parse()?)
}
