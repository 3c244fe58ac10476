// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppConfig,
    db::{user_repo::NewUser, BarangayRepository, UserRepository},
    models::{
        auth::{
            ApprovalStatus, AuthResponse, ChangePasswordPayload, Claims, LoginPayload, Principal,
            RegisterPayload, Role, TokenKind, TokenPair, User,
        },
        tenancy::BarangayStatus,
    },
    services::notification::{dispatch, Notification, Notifier},
};

/// Hashes on the blocking pool; bcrypt is deliberately slow.
pub(crate) async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("password hashing task failed: {e}"))??;
    Ok(hashed)
}

pub(crate) async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("password verification task failed: {e}"))??;
    Ok(valid)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    barangay_repo: BarangayRepository,
    notifier: Arc<dyn Notifier>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        barangay_repo: BarangayRepository,
        notifier: Arc<dyn Notifier>,
        config: &AppConfig,
    ) -> Self {
        Self {
            user_repo,
            barangay_repo,
            notifier,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        }
    }

    pub async fn login(&self, payload: &LoginPayload) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(&payload.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&payload.password, &user.password_hash).await? {
            tracing::debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        self.ensure_may_sign_in(&user).await?;
        self.user_repo.touch_last_login(user.id).await?;

        let tokens = self.issue_tokens(&user.principal())?;
        tracing::info!(user_id = user.id, role = user.role.as_str(), "User logged in");

        Ok(AuthResponse {
            message: "Login successful".to_string(),
            token: tokens.access,
            refresh_token: tokens.refresh,
            user,
        })
    }

    /// Resident self-registration. The account waits for an official's
    /// approval before it can sign in.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<User, AppError> {
        let barangay = self
            .barangay_repo
            .find_by_id(payload.barangay_id)
            .await?
            .filter(|b| b.status == BarangayStatus::Active)
            .ok_or_else(|| AppError::BadRequest("Invalid or inactive barangay".to_string()))?;

        let password_hash = hash_password(&payload.password).await?;

        let user = self
            .user_repo
            .create(
                self.user_repo.pool(),
                &NewUser {
                    barangay_id: Some(barangay.id),
                    email: &payload.email,
                    password_hash: &password_hash,
                    first_name: &payload.first_name,
                    last_name: &payload.last_name,
                    contact_number: payload.contact_number.as_deref(),
                    role: Role::Resident,
                    approval_status: ApprovalStatus::Pending,
                },
            )
            .await?;

        tracing::info!(user_id = user.id, barangay_id = barangay.id, "Resident registered, pending approval");
        dispatch(
            self.notifier.clone(),
            Notification::RegistrationReceived {
                email: user.email.clone(),
                barangay_id: barangay.id,
            },
        );

        Ok(user)
    }

    /// Exchanges a refresh token for a new pair. The account is re-read so
    /// deactivation and role changes take effect here.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, AppError> {
        let claims = self.verify(refresh_token, TokenKind::Refresh)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;
        self.ensure_may_sign_in(&user).await?;

        let tokens = self.issue_tokens(&user.principal())?;
        Ok(AuthResponse {
            message: "Token refreshed".to_string(),
            token: tokens.access,
            refresh_token: tokens.refresh,
            user,
        })
    }

    pub async fn me(&self, principal: &Principal) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(principal.id)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    pub async fn change_password(
        &self,
        principal: &Principal,
        payload: &ChangePasswordPayload,
    ) -> Result<(), AppError> {
        let user = self.me(principal).await?;

        if !verify_password(&payload.current_password, &user.password_hash).await? {
            return Err(AppError::BadRequest("Current password is incorrect".to_string()));
        }

        let password_hash = hash_password(&payload.new_password).await?;
        self.user_repo.update_password(user.id, &password_hash).await?;
        tracing::info!(user_id = user.id, "Password changed");
        Ok(())
    }

    /// Verifies an access token and returns who is calling. Role and
    /// barangay come from the stored account, not the claims, so demotions
    /// and deactivations apply to tokens already issued.
    pub async fn authenticate(&self, token: &str) -> Result<Principal, AppError> {
        let claims = self.verify_access(token)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id = claims.sub, "Token for a user that no longer exists");
                AppError::InvalidToken
            })?;

        if !user.is_active {
            tracing::debug!(user_id = user.id, "Token for a deactivated account");
            return Err(AppError::AccountInactive);
        }
        user.may_sign_in().map_err(AppError::AccountNotApproved)?;

        Ok(user.principal())
    }

    /// Signature, expiry and kind checks of an access token.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AppError> {
        self.verify(token, TokenKind::Access)
    }

    pub fn issue_tokens(&self, principal: &Principal) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access: self.create_token(principal, TokenKind::Access, self.access_ttl)?,
            refresh: self.create_token(principal, TokenKind::Refresh, self.refresh_ttl)?,
        })
    }

    pub fn access_token_for(&self, principal: &Principal) -> Result<String, AppError> {
        self.create_token(principal, TokenKind::Access, self.access_ttl)
    }

    async fn ensure_may_sign_in(&self, user: &User) -> Result<(), AppError> {
        if !user.is_active {
            return Err(AppError::AccountInactive);
        }
        user.may_sign_in().map_err(AppError::AccountNotApproved)?;

        if let Some(barangay_id) = user.barangay_id {
            let active = self
                .barangay_repo
                .find_by_id(barangay_id)
                .await?
                .is_some_and(|b| b.status == BarangayStatus::Active);
            if !active && !user.role.is_super_admin() {
                return Err(AppError::BarangayInactive);
            }
        }
        Ok(())
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })?
            .claims;

        if claims.kind != expected {
            tracing::debug!(?expected, actual = ?claims.kind, "Token of the wrong kind");
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }

    fn create_token(
        &self,
        principal: &Principal,
        kind: TokenKind,
        ttl: chrono::Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: principal.id,
            role: principal.role,
            barangay_id: principal.barangay_id,
            kind,
            jti: Uuid::new_v4(),
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notification::LogNotifier;
    use sqlx::postgres::PgPoolOptions;

    fn service() -> AuthService {
        let config = AppConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/barangay_test".into()),
            "JWT_SECRET" => Some("test-secret".into()),
            _ => None,
        })
        .unwrap();
        let pool = PgPoolOptions::new().connect_lazy(&config.database_url).unwrap();
        AuthService::new(
            UserRepository::new(pool.clone()),
            BarangayRepository::new(pool),
            Arc::new(LogNotifier),
            &config,
        )
    }

    fn staff() -> Principal {
        Principal { id: 7, role: Role::Staff, barangay_id: Some(5) }
    }

    #[tokio::test]
    async fn access_token_carries_the_principal() {
        let auth = service();
        let token = auth.access_token_for(&staff()).unwrap();
        let claims = auth.verify_access(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, Role::Staff);
        assert_eq!(claims.barangay_id, Some(5));
    }

    #[tokio::test]
    async fn refresh_token_is_not_an_access_token() {
        let auth = service();
        let pair = auth.issue_tokens(&staff()).unwrap();
        assert!(matches!(auth.verify_access(&pair.refresh), Err(AppError::InvalidToken)));
        assert!(auth.verify(&pair.refresh, TokenKind::Refresh).is_ok());
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let auth = service();
        let past = Utc::now() - chrono::Duration::hours(2);
        let claims = Claims {
            sub: 7,
            role: Role::Staff,
            barangay_id: Some(5),
            kind: TokenKind::Access,
            jti: Uuid::new_v4(),
            exp: past.timestamp() as usize,
            iat: (past - chrono::Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &auth.encoding_key).unwrap();
        assert!(matches!(auth.verify_access(&token), Err(AppError::TokenExpired)));
    }

    #[tokio::test]
    async fn tampered_token_is_invalid() {
        let auth = service();
        let mut token = auth.access_token_for(&staff()).unwrap();
        token.push('x');
        assert!(matches!(auth.verify_access(&token), Err(AppError::InvalidToken)));
        assert!(matches!(auth.verify_access("not-a-jwt"), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn passwords_hash_and_verify() {
        let hashed = hash_password("s3cret-pass").await.unwrap();
        assert!(verify_password("s3cret-pass", &hashed).await.unwrap());
        assert!(!verify_password("wrong", &hashed).await.unwrap());
    }
}
