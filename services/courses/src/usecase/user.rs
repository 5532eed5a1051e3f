use chrono::Utc;

use learnhub_domain::id::UserId;
use learnhub_domain::role::RoleSet;

use crate::domain::authz::Caller;
use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::CoursesServiceError;

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: RoleSet,
}

pub struct RegisterUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> RegisterUserUseCase<R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        input: RegisterUserInput,
    ) -> Result<User, CoursesServiceError> {
        caller.require_admin()?;
        self.register(input).await
    }

    /// Insert without a caller check. Used by startup seeding.
    pub async fn register(&self, input: RegisterUserInput) -> Result<User, CoursesServiceError> {
        if input.roles.is_empty() {
            return Err(CoursesServiceError::MissingRoles);
        }
        let now = Utc::now();
        let user = User {
            id: input.id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            roles: input.roles,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&user).await?;
        tracing::info!(user_id = %user.id, roles = %user.roles, "user registered");
        Ok(user)
    }
}

// ── GetMe ────────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: &UserId) -> Result<User, CoursesServiceError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(CoursesServiceError::UserNotFound)
    }
}
