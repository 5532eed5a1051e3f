//! Mock identity helpers for integration tests.
//!
//! Services behind the gateway receive `x-learnhub-user-id` +
//! `x-learnhub-user-roles` headers injected by the gateway. In tests,
//! `MockAuth` produces these headers directly so no real gateway is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use learnhub_auth_types::identity::{USER_ID_HEADER, USER_ROLES_HEADER};
use learnhub_domain::id::UserId;
use learnhub_domain::role::{Role, RoleSet};

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: UserId,
    pub roles: RoleSet,
}

impl MockAuth {
    pub fn new(user_id: impl Into<UserId>, roles: &[Role]) -> Self {
        Self {
            user_id: user_id.into(),
            roles: roles.iter().copied().collect(),
        }
    }

    pub fn admin(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, &[Role::Admin])
    }

    pub fn instructor(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, &[Role::Instructor])
    }

    pub fn student(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, &[Role::Student])
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(self.user_id.as_str()).unwrap(),
        );
        map.insert(
            HeaderName::from_static(USER_ROLES_HEADER),
            HeaderValue::from_str(&self.roles.to_string()).unwrap(),
        );
        map
    }
}
