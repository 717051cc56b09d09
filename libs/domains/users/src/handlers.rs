use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};
use axum_helpers::{AppError, Invocation, JsonBody, PositiveId, TimingInterceptor, ValidatedJson};
use std::sync::Arc;

use crate::error::UserError;
use crate::models::User;
use crate::repository::UserRepository;
use crate::service::UserService;

/// Signature prefix shared by every controller operation
pub const CONTROLLER_PREFIX: &str = "UserController::";

/// Times every operation whose signature starts with [`CONTROLLER_PREFIX`]
pub fn controller_interceptor() -> TimingInterceptor {
    TimingInterceptor::matching_prefix("controller", CONTROLLER_PREFIX)
}

struct ControllerState<R: UserRepository> {
    service: UserService<R>,
    interceptor: TimingInterceptor,
}

type SharedState<R> = State<Arc<ControllerState<R>>>;

fn invocation(operation: &str) -> Invocation {
    Invocation::new(format!("{CONTROLLER_PREFIX}{operation}"))
}

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let state = Arc::new(ControllerState {
        service,
        interceptor: controller_interceptor(),
    });

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", put(update_user).delete(delete_user))
        .route("/error", get(trigger_internal_error))
        .route("/user-not-found", get(trigger_not_found_error))
        .with_state(state)
}

/// List all users
///
/// GET /users
async fn list_users<R: UserRepository>(
    State(state): SharedState<R>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = state
        .interceptor
        .around(invocation("list_users"), async {
            state.service.list_users().await.ok_or_else(UserError::absent)
        })
        .await?;
    Ok(Json(users))
}

/// Create a user from a field-validated body
///
/// POST /users
async fn create_user<R: UserRepository>(
    State(state): SharedState<R>,
    ValidatedJson(user): ValidatedJson<User>,
) -> Result<Json<User>, AppError> {
    let call = invocation("create_user").arg(&user);
    let created = state
        .interceptor
        .around(call, async {
            state.service.create_user(user).await.ok_or_else(UserError::absent)
        })
        .await?;
    Ok(Json(created))
}

/// Update a user. The body is deserialized but not field-validated.
///
/// PUT /users/{id}
async fn update_user<R: UserRepository>(
    State(state): SharedState<R>,
    PositiveId(id): PositiveId,
    JsonBody(user): JsonBody<User>,
) -> Result<Json<User>, AppError> {
    let call = invocation("update_user").arg(&id).arg(&user);
    let updated = state
        .interceptor
        .around(call, async {
            state
                .service
                .update_user(id, user)
                .await
                .ok_or_else(UserError::absent)
        })
        .await?;
    Ok(Json(updated))
}

/// Delete a user
///
/// DELETE /users/{id}
async fn delete_user<R: UserRepository>(
    State(state): SharedState<R>,
    PositiveId(id): PositiveId,
) -> Result<Json<bool>, AppError> {
    let deleted = state
        .interceptor
        .around(invocation("delete_user").arg(&id), async {
            Ok::<_, AppError>(state.service.delete_user(id).await)
        })
        .await?;
    Ok(Json(deleted))
}

/// Always fails with a generic failure
///
/// GET /users/error
async fn trigger_internal_error<R: UserRepository>(
    State(state): SharedState<R>,
) -> Result<Json<()>, AppError> {
    state
        .interceptor
        .around(invocation("trigger_internal_error"), async {
            Err(AppError::Internal("internal server error".to_string()))
        })
        .await
}

/// Always fails with a not-found failure
///
/// GET /users/user-not-found
async fn trigger_not_found_error<R: UserRepository>(
    State(state): SharedState<R>,
) -> Result<Json<()>, AppError> {
    state
        .interceptor
        .around(invocation("trigger_not_found_error"), async {
            Err(UserError::NotFound("user not found".to_string()))
        })
        .await
        .map_err(AppError::from)
}
