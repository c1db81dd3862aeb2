//! Operator account management.
//!
//! There is no public admin signup; this command is the only way to
//! provision operator accounts.

use thiserror::Error;

use dukkan_admin::db;
use dukkan_admin::services::AdminAuthService;
use dukkan_admin::services::auth::AdminAuthError;
use dukkan_core::AdminRole;

use super::CliError;

/// Errors from operator provisioning.
#[derive(Debug, Error)]
pub enum CreateOperatorError {
    #[error(transparent)]
    Cli(#[from] CliError),

    /// Invalid role name.
    #[error("Invalid role: {0}. Valid roles: super_admin, admin")]
    InvalidRole(String),

    /// Account creation failed.
    #[error("{0}")]
    Auth(#[from] AdminAuthError),
}

fn parse_role(role: &str) -> Result<AdminRole, CreateOperatorError> {
    match role {
        "super_admin" => Ok(AdminRole::SuperAdmin),
        "admin" => Ok(AdminRole::Admin),
        other => Err(CreateOperatorError::InvalidRole(other.to_owned())),
    }
}

/// Create a new operator account.
pub async fn create_operator(
    email: &str,
    name: &str,
    password: &str,
    role: &str,
) -> Result<(), CreateOperatorError> {
    let role = parse_role(role)?;

    let database_url = super::database_url().map_err(CreateOperatorError::Cli)?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url)
        .await
        .map_err(|e| CreateOperatorError::Cli(CliError::Database(e)))?;

    let auth = AdminAuthService::new(&pool);
    let operator = auth.create_operator(email, name, password, role).await?;

    tracing::info!(
        "Created operator {} ({}) with id {}",
        operator.name,
        operator.email.as_str(),
        operator.id,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert!(matches!(parse_role("admin"), Ok(AdminRole::Admin)));
        assert!(matches!(parse_role("super_admin"), Ok(AdminRole::SuperAdmin)));
        assert!(parse_role("viewer").is_err());
    }
}
