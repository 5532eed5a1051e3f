//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;

use learnhub_domain::id::UserId;
use learnhub_domain::role::{Role, RoleSet};

/// Header carrying the caller's opaque user id.
pub const USER_ID_HEADER: &str = "x-learnhub-user-id";

/// Header carrying the caller's comma-separated role names.
pub const USER_ROLES_HEADER: &str = "x-learnhub-user-roles";

/// User identity injected by the gateway via `x-learnhub-user-id` and
/// `x-learnhub-user-roles` headers.
///
/// Returns 401 if the user id is absent or blank, or if the role header is
/// absent or names an unknown role. An empty role list is accepted.
/// Role enforcement (403) is done by use cases after extraction.
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    pub user_id: UserId,
    pub roles: RoleSet,
}

impl IdentityHeaders {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send`; extract
    // synchronously and return a 'static async block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<UserId>().ok());

        let roles = parts
            .headers
            .get(USER_ROLES_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(RoleSet::parse_list);

        async move {
            let user_id = user_id.ok_or(StatusCode::UNAUTHORIZED)?;
            let roles = match roles {
                Some(Ok(roles)) => roles,
                Some(Err(e)) => {
                    tracing::debug!(error = %e, "rejecting identity with unknown role");
                    return Err(StatusCode::UNAUTHORIZED);
                }
                None => return Err(StatusCode::UNAUTHORIZED),
            };
            Ok(Self { user_id, roles })
        }
    }
}
