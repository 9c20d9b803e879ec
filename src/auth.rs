use tracing::info;
use ulid::Ulid;

use crate::engine::{validate_email, Engine, EngineError};
use crate::model::User;
use crate::observability;

impl Engine {
    /// Log in by email. Unknown emails are provisioned on the spot; there is
    /// no credential check, the front end's password field is ignored.
    pub async fn login(&self, email: &str) -> Result<User, EngineError> {
        self.simulate_latency().await;

        let email = validate_email(email)?;
        let (user, provisioned) = self.store.find_or_provision_user(email);
        let label = if provisioned { "true" } else { "false" };
        metrics::counter!(observability::LOGINS_TOTAL, "provisioned" => label).increment(1);
        if provisioned {
            info!(user = %user.id, email, "provisioned user on first login");
        }
        Ok(user)
    }

    pub async fn get_user(&self, id: Ulid) -> Option<User> {
        self.simulate_latency().await;
        self.store.get_user(&id)
    }
}
