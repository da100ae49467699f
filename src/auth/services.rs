use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::{NewUser, User},
    },
    error::AppError,
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns the trimmed value, or `None` when absent or blank.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub async fn register(
    st: &AppState,
    email: Option<&str>,
    password: Option<&str>,
    name: Option<&str>,
) -> Result<(User, String), AppError> {
    let (Some(email), Some(password)) = (present(email), password.filter(|p| !p.is_empty()))
    else {
        return Err(AppError::validation("Email and password are required"));
    };
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }

    let hash = hash_password(password)?;
    let user = st
        .users
        .create(NewUser {
            email: &email,
            password_hash: &hash,
            name: present(name),
        })
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "email already registered");
            AppError::Conflict("User already exists".into())
        })?;

    let token = JwtKeys::from(&st.config.jwt).sign(user.id)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((user, token))
}

pub async fn login(
    st: &AppState,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<(User, String), AppError> {
    let (Some(email), Some(password)) = (present(email), password.filter(|p| !p.is_empty()))
    else {
        return Err(AppError::validation("Email and password are required"));
    };
    let email = normalize_email(email);

    let user = st.users.find_by_email(&email).await?.ok_or_else(|| {
        warn!(email = %email, "login unknown email");
        AppError::not_found("User not found")
    })?;

    if !verify_password(password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::unauthorized("Invalid password"));
    }

    let token = JwtKeys::from(&st.config.jwt).sign(user.id)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((user, token))
}

/// Resolves a verified token subject back to its user.
pub async fn current_user(st: &AppState, user_id: Uuid) -> Result<User, AppError> {
    st.users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Unauthorized"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("nobody"));
    }

    #[tokio::test]
    async fn register_returns_user_and_token_for_that_user() {
        let st = AppState::fake();
        let (user, token) = register(&st, Some("a@b.com"), Some("pw12345"), None)
            .await
            .expect("register");
        assert_eq!(user.email, "a@b.com");
        assert!(user.name.is_none());
        let claims = JwtKeys::from(&st.config.jwt).verify(&token).unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn register_requires_email_and_password() {
        let st = AppState::fake();
        for (email, password) in [(None, Some("pw")), (Some("a@b.com"), None), (Some("  "), Some("pw"))] {
            let err = register(&st, email, password, None).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{email:?}/{password:?}");
        }
    }

    #[tokio::test]
    async fn registering_same_email_twice_conflicts() {
        let st = AppState::fake();
        register(&st, Some("a@b.com"), Some("pw12345"), Some("Ann"))
            .await
            .unwrap();
        let err = register(&st, Some(" A@B.com "), Some("different"), Some("Bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn login_token_subject_matches_registered_user() {
        let st = AppState::fake();
        let (registered, _) = register(&st, Some("a@b.com"), Some("pw12345"), None)
            .await
            .unwrap();
        let (user, token) = login(&st, Some("a@b.com"), Some("pw12345")).await.unwrap();
        assert_eq!(user.id, registered.id);
        let claims = JwtKeys::from(&st.config.jwt).verify(&token).unwrap();
        assert_eq!(claims.sub, registered.id);
        assert_eq!(current_user(&st, claims.sub).await.unwrap().id, registered.id);
    }

    #[tokio::test]
    async fn login_unknown_email_is_not_found() {
        let st = AppState::fake();
        let err = login(&st, Some("ghost@b.com"), Some("pw12345")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn login_wrong_password_is_unauthorized() {
        let st = AppState::fake();
        register(&st, Some("a@b.com"), Some("pw12345"), None).await.unwrap();
        let err = login(&st, Some("a@b.com"), Some("nope")).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn current_user_rejects_unknown_subject() {
        let st = AppState::fake();
        let err = current_user(&st, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
