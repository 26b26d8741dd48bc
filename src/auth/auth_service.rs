use crate::auth::auth_repository::RefreshTokenRepository;
use crate::auth::{
    create_access_token, create_refresh_token, hash_password, verify_jwt, verify_password, Claims,
};
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::state::AuthMode;
use crate::user::{User, UserRepository, UserRole};
use chrono::{Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub const BYPASS_ADMIN_EMAIL: &str = "admin@example.com";
pub const BYPASS_ADMIN_NAME: &str = "Admin User";

/// The authenticated principal returned to clients after login.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub image: Option<String>,
}

/// The fixed administrator presented by every bypass login, whatever the
/// stored row for `BYPASS_ADMIN_EMAIL` currently holds.
pub fn bypass_identity(id: Uuid) -> Identity {
    Identity {
        id,
        name: BYPASS_ADMIN_NAME.to_string(),
        email: BYPASS_ADMIN_EMAIL.to_string(),
        role: UserRole::Admin,
        image: None,
    }
}

/// A refresh token is only honoured for the account it was stored against.
pub fn ensure_token_owner(claims: &Claims, owner: &User) -> Result<()> {
    let subject = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token claims".into()))?;

    if subject != owner.id {
        return Err(AppError::Unauthorized("Invalid refresh token".into()));
    }
    Ok(())
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            image: user.image,
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    db: DbPool,
    user_repo: UserRepository,
    refresh_token_repo: RefreshTokenRepository,
    jwt_secret: String,
    mode: AuthMode,
}

impl AuthService {
    pub fn new(
        db: DbPool,
        user_repo: UserRepository,
        refresh_token_repo: RefreshTokenRepository,
        jwt_secret: String,
        mode: AuthMode,
    ) -> Self {
        Self {
            db,
            user_repo,
            refresh_token_repo,
            jwt_secret,
            mode,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        phone: &str,
    ) -> Result<(Identity, String, String)> {
        let password_hash = hash_password(password)?;

        let mut tx = self.db.begin().await?;

        let user = self
            .user_repo
            .create_with_tx(&mut tx, name, email, &password_hash, phone)
            .await
            .map_err(|e| e.on_unique_violation("users_email_key", "User with this email already exists"))?;

        let (access_token, refresh_token) = self.issue_tokens(&mut tx, &user).await?;

        tx.commit().await?;
        tracing::info!("Registered user {}", user.id);

        Ok((user.into(), access_token, refresh_token))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(Identity, String, String)> {
        let mut tx = self.db.begin().await?;

        let (user, identity) = match self.mode {
            AuthMode::Credentials => {
                let user = self
                    .user_repo
                    .find_by_email(email)
                    .await?
                    .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

                let password_hash = user
                    .password_hash
                    .as_deref()
                    .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

                if !verify_password(password, password_hash)? {
                    return Err(AppError::Unauthorized("Invalid credentials".into()));
                }
                let identity = Identity::from(user.clone());
                (user, identity)
            }
            AuthMode::Bypass => {
                tracing::warn!("Authentication bypass active: issuing administrator session");
                let user = self
                    .user_repo
                    .upsert_admin_with_tx(&mut tx, BYPASS_ADMIN_NAME, BYPASS_ADMIN_EMAIL)
                    .await?;
                let identity = bypass_identity(user.id);
                (user, identity)
            }
        };

        let (access_token, refresh_token) = self.issue_tokens(&mut tx, &user).await?;

        tx.commit().await?;

        Ok((identity, access_token, refresh_token))
    }

    /// Exchanges a valid refresh token for a new token pair, revoking the old one.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<(String, String)> {
        let claims = verify_jwt(refresh_token, &self.jwt_secret)?;

        let owner = self
            .refresh_token_repo
            .find_owner(refresh_token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".into()))?;
        ensure_token_owner(&claims, &owner)?;

        let mut tx = self.db.begin().await?;

        if !self.refresh_token_repo.revoke_with_tx(&mut tx, refresh_token).await? {
            // another request rotated it first
            return Err(AppError::Unauthorized("Invalid refresh token".into()));
        }

        let tokens = self.issue_tokens(&mut tx, &owner).await?;

        tx.commit().await?;

        Ok(tokens)
    }

    pub async fn logout(&self, refresh_token: &str) -> Result<()> {
        self.refresh_token_repo.revoke(refresh_token).await
    }

    async fn issue_tokens(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user: &User,
    ) -> Result<(String, String)> {
        let access_token = create_access_token(user.id, &user.email, user.role, &self.jwt_secret)?;
        let refresh_token = create_refresh_token(user.id, &user.email, user.role, &self.jwt_secret)?;

        let expires_at = Utc::now() + Duration::days(7);
        self.refresh_token_repo
            .store_with_tx(tx, user.id, &refresh_token, expires_at)
            .await?;

        Ok((access_token, refresh_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: &str, role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: None,
            phone: None,
            image: None,
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn claims_for(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: "someone@example.com".into(),
            role: UserRole::Student,
            exp: 0,
            jti: Uuid::new_v4().to_string(),
        }
    }

    #[test]
    fn test_identity_from_user_keeps_role() {
        let user = user("Grace Hopper", "grace@example.com", UserRole::Staff);
        let identity = Identity::from(user.clone());
        assert_eq!(identity.id, user.id);
        assert_eq!(identity.role, UserRole::Staff);
        assert_eq!(identity.email, "grace@example.com");
    }

    #[test]
    fn test_bypass_identity_is_the_fixed_admin() {
        let id = Uuid::new_v4();
        let identity = bypass_identity(id);

        assert_eq!(
            identity,
            Identity {
                id,
                name: "Admin User".into(),
                email: "admin@example.com".into(),
                role: UserRole::Admin,
                image: None,
            }
        );
    }

    #[test]
    fn test_bypass_identity_ignores_registered_admin_email_profile() {
        // someone registered the admin address in credentials mode first
        let mut stored = user("Eve", BYPASS_ADMIN_EMAIL, UserRole::Student);
        stored.image = Some("https://example.com/eve.png".into());

        let identity = bypass_identity(stored.id);

        assert_eq!(identity.id, stored.id);
        assert_eq!(identity.name, BYPASS_ADMIN_NAME);
        assert_eq!(identity.role, UserRole::Admin);
        assert!(identity.image.is_none());
    }

    #[test]
    fn test_refresh_token_must_belong_to_its_owner() {
        let owner = user("Ada", "ada@example.com", UserRole::Student);

        assert!(ensure_token_owner(&claims_for(&owner.id.to_string()), &owner).is_ok());

        let other = claims_for(&Uuid::new_v4().to_string());
        assert!(matches!(
            ensure_token_owner(&other, &owner),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            ensure_token_owner(&claims_for("not-a-uuid"), &owner),
            Err(AppError::Unauthorized(_))
        ));
    }
}
