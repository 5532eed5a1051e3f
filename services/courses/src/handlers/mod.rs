use learnhub_auth_types::identity::IdentityHeaders;

use crate::domain::authz::Caller;

pub mod course;
pub mod dashboard;
pub mod enrollment;
pub mod health;
pub mod user;

impl From<IdentityHeaders> for Caller {
    fn from(identity: IdentityHeaders) -> Self {
        Caller::new(identity.user_id, identity.roles)
    }
}
