use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{RegisterUser, Role, TokenRequest, User};
use crate::infrastructure::security::generate_token;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

/// Outcome of a registration attempt. A duplicate email is reported, not
/// treated as an error.
pub enum RegisterOutcome {
    Created(User),
    AlreadyExists,
}

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String) -> Self {
        Self {
            user_repository,
            jwt_secret,
        }
    }

    /// Signs whatever claims the client submitted. Does not check that the
    /// email belongs to a registered user; a token only proves possession of
    /// the claims, authorization happens at the gates.
    #[instrument(skip(self), fields(email = %req.email))]
    pub fn issue_token(&self, req: &TokenRequest) -> Result<String> {
        trace!("Issuing access token");
        let token = generate_token(req, &self.jwt_secret).map_err(|e| {
            error!(error = %e, "Failed to sign token");
            DomainError::Internal(format!("Failed to sign token: {}", e))
        })?;
        info!(email = %req.email, "Access token issued");
        Ok(token)
    }

    #[instrument(skip(self), fields(email = %req.email))]
    pub async fn register_user(&self, req: RegisterUser) -> Result<RegisterOutcome> {
        trace!("Starting user registration");

        if self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .is_some()
        {
            warn!(email = %req.email, "User already exists");
            return Ok(RegisterOutcome::AlreadyExists);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: req.email,
            name: req.name,
            photo: req.photo,
            role: Role::Customer,
        };

        debug!(user_id = %user.id, email = %user.email, "Saving user to repository");
        self.user_repository.save_user(user.clone()).await?;

        info!(
            user_id = %user.id,
            email = %user.email,
            "User registered successfully"
        );

        Ok(RegisterOutcome::Created(user))
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repository.find_all_users().await
    }

    /// Directory lookup behind the admin gate and the `/users/admin/{email}`
    /// status route. An unknown email is simply not an admin.
    #[instrument(skip(self), fields(email = email))]
    pub async fn admin_status(&self, email: &str) -> Result<bool> {
        let user = self.user_repository.find_user_by_email(email).await?;
        Ok(user.map(|u| u.role == Role::Admin).unwrap_or(false))
    }

    /// Admin gate. Must only be called with an email taken from a verified
    /// token; the token check always happens before this directory read.
    #[instrument(skip(self), fields(email = email))]
    pub async fn require_admin(&self, email: &str) -> Result<()> {
        if self.admin_status(email).await? {
            trace!("Admin access granted");
            Ok(())
        } else {
            warn!(email = email, "Admin access denied");
            Err(DomainError::Forbidden.into())
        }
    }

    #[instrument(skip(self), fields(user_id = id))]
    pub async fn promote_to_admin(&self, id: &str) -> Result<()> {
        let updated = self.user_repository.set_role(id, Role::Admin).await?;
        if !updated {
            warn!(user_id = id, "User not found for promotion");
            return Err(DomainError::NotFound("User not found".to_string()).into());
        }
        info!(user_id = id, "User promoted to admin");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        let deleted = self.user_repository.delete_user(id).await?;
        if !deleted {
            return Err(DomainError::NotFound("User not found".to_string()).into());
        }
        info!(user_id = id, "User deleted");
        Ok(())
    }
}
