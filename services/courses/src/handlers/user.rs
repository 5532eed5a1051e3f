use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use learnhub_auth_types::identity::IdentityHeaders;
use learnhub_domain::id::UserId;
use learnhub_domain::role::RoleSet;

use crate::domain::authz::Caller;
use crate::domain::types::User;
use crate::error::CoursesServiceError;
use crate::state::AppState;
use crate::usecase::user::{GetUserUseCase, RegisterUserInput, RegisterUserUseCase};

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub roles: RoleSet,
    #[serde(serialize_with = "learnhub_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "learnhub_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            full_name: user.full_name(),
            id: user.id.0,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            roles: user.roles,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterUserRequest {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub roles: RoleSet,
}

pub async fn register_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), CoursesServiceError> {
    let id = body
        .id
        .parse::<UserId>()
        .map_err(|_| CoursesServiceError::InvalidUserId)?;
    let usecase = RegisterUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            &Caller::from(identity),
            RegisterUserInput {
                id,
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                roles: body.roles,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, CoursesServiceError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&identity.user_id).await?;
    Ok(Json(user.into()))
}
