//! Create-admin command - bootstrap the first administrator

use crate::cli::error::{CliError, CliResult};
use crate::db::{Database, DbError, SaveOutcome, User, UserRepository};

/// Create an administrator, or promote the user if the name is taken.
pub async fn create_admin<D: Database>(
    db: &D,
    username: &str,
    email: &str,
    password: &str,
) -> CliResult<String> {
    let users = db.users();

    let outcome = match users.get_by_username(username).await {
        Ok(mut existing) => {
            if existing.is_admin {
                return Ok(format!("{} is already an administrator", username));
            }
            users.promote_to_admin(&mut existing).await?
        }
        Err(DbError::NotFound { .. }) => {
            let mut user = User::new(username, email, password)?;
            user.grant_admin();
            users.save(&user).await?
        }
        Err(e) => return Err(e.into()),
    };

    match outcome {
        SaveOutcome::Saved(user) => Ok(format!("{:?} is ready", user)),
        SaveOutcome::Rejected(rejection) => Err(CliError::Rejected {
            entity_type: rejection.entity_type,
            reason: rejection.reason,
        }),
    }
}
