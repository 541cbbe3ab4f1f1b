use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::user::{self, Entity as User, Role};
use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Shape check only: one `@`, a non-empty local part, a dotted domain and
/// no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
        }
        None => false,
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalServerError(format!("password hash error: {}", e)))
}

/// Returns the user when the email exists and the password matches.
pub async fn verify_credentials(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<Option<user::Model>, AppError> {
    let Some(user) = User::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let parsed = PasswordHash::new(&user.password)
        .map_err(|e| AppError::InternalServerError(format!("hash parse error: {}", e)))?;
    let ok = Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok();
    Ok(ok.then_some(user))
}

pub async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>, AppError> {
    Ok(User::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await?)
}

/// Self-service sign-up. New accounts always get the USER role.
pub async fn register_user(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    name: &str,
) -> Result<user::Model, AppError> {
    let email = email.trim().to_lowercase();
    let name = name.trim();
    if !is_valid_email(&email) {
        return Err(AppError::BadRequest(format!("Invalid email: {}", email)));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if name.chars().count() < 2 {
        return Err(AppError::BadRequest("Name must be at least 2 characters".to_string()));
    }
    if find_by_email(db, &email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let created = user::ActiveModel {
        email: Set(email),
        password: Set(hash_password(password)?),
        name: Set(name.to_string()),
        role: Set(Role::User),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    tracing::info!(email = %created.email, "user registered");
    Ok(created)
}

/// Creates the administrator account unless a user with that email exists.
pub async fn ensure_admin_user(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<bool, AppError> {
    let email = email.trim().to_lowercase();
    let existing = User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        tracing::info!(%email, "admin user already exists");
        return Ok(false);
    }

    let admin = user::ActiveModel {
        email: Set(email.clone()),
        password: Set(hash_password(password)?),
        name: Set("Administrateur".to_string()),
        role: Set(Role::Admin),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    admin.insert(db).await?;
    tracing::info!(%email, "admin user created");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::setup_db;

    #[tokio::test]
    async fn admin_is_seeded_once_and_can_log_in() {
        let db = setup_db().await;
        assert!(ensure_admin_user(&db, "Admin@Example.com", "s3cret").await.unwrap());
        assert!(!ensure_admin_user(&db, "admin@example.com", "other").await.unwrap());

        let user = verify_credentials(&db, "admin@example.com", "s3cret")
            .await
            .unwrap()
            .expect("valid credentials");
        assert_eq!(user.role, Role::Admin);

        assert!(verify_credentials(&db, "admin@example.com", "wrong").await.unwrap().is_none());
        assert!(verify_credentials(&db, "nobody@example.com", "s3cret").await.unwrap().is_none());
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("photo@studio.fr"));
        assert!(!is_valid_email("photo@studio"));
        assert!(!is_valid_email("photo studio@x.fr"));
        assert!(!is_valid_email("@studio.fr"));
        assert!(!is_valid_email("a@b@c.fr"));
    }

    #[tokio::test]
    async fn registration_validates_and_rejects_duplicates() {
        let db = setup_db().await;

        let user = register_user(&db, " Alice@Studio.fr ", "secret1", " Alice ").await.unwrap();
        assert_eq!(user.email, "alice@studio.fr");
        assert_eq!(user.name, "Alice");
        assert_eq!(user.role, Role::User);
        assert!(verify_credentials(&db, "alice@studio.fr", "secret1").await.unwrap().is_some());

        let dup = register_user(&db, "alice@studio.fr", "another1", "Alice").await;
        assert!(matches!(dup, Err(AppError::Conflict(_))));

        for (email, password, name) in [
            ("not-an-email", "secret1", "Bob"),
            ("bob@studio.fr", "short", "Bob"),
            ("bob@studio.fr", "secret1", " B "),
        ] {
            let res = register_user(&db, email, password, name).await;
            assert!(matches!(res, Err(AppError::BadRequest(_))), "{email} {password} {name}");
        }
        assert!(find_by_email(&db, "bob@studio.fr").await.unwrap().is_none());
    }
}
