//! Authentication service.
//!
//! Email + password accounts with Argon2id hashes. Sessions are handled by
//! the caller (see [`crate::middleware::auth`]); this service only decides
//! who the user is.

mod error;

use std::sync::LazyLock;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use autoparts_core::{
    ContactInfo, Email, LoginInput, RegisterInput, Validate, ValidationErrors, non_blank,
};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::{NewUser, User};

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if any field is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, input: &RegisterInput) -> Result<User, AuthError> {
        input.validate()?;
        let email = Email::parse(&input.email)
            .map_err(|e| ValidationErrors::single("email", e.to_string()))?;

        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let new_user = NewUser {
            email,
            password_hash: hash_password(&input.password)?,
            full_name: input.full_name.trim().to_owned(),
            phone: non_blank(input.phone.as_deref()).map(str::to_owned),
            country_code: non_blank(input.country_code.as_deref()).map(str::to_owned),
            city: non_blank(input.city.as_deref()).map(str::to_owned),
        };

        self.create_user(&new_user).await
    }

    /// Create an account while placing a guest order.
    ///
    /// The profile is taken from the order's contact details.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register_from_contact(
        &self,
        email: Email,
        password: &str,
        contact: &ContactInfo,
    ) -> Result<User, AuthError> {
        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let new_user = NewUser {
            email,
            password_hash: hash_password(password)?,
            full_name: contact.name.trim().to_owned(),
            phone: non_blank(Some(&contact.phone)).map(str::to_owned),
            country_code: non_blank(Some(&contact.country_code)).map(str::to_owned),
            city: non_blank(contact.city.as_deref()).map(str::to_owned),
        };

        self.create_user(&new_user).await
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on any mismatch, including a
    /// malformed email.
    pub async fn login(&self, input: &LoginInput) -> Result<User, AuthError> {
        let credentials = match Email::parse(&input.email) {
            Ok(email) => self.users.get_password_hash(&email).await?,
            Err(_) => None,
        };

        let Some((user, password_hash)) = credentials else {
            verify_against_dummy(&input.password);
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(&input.password, &password_hash)?;

        Ok(user)
    }

    // The existence check above narrows the race; the unique index settles it.
    async fn create_user(&self, new_user: &NewUser) -> Result<User, AuthError> {
        self.users.create(new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })
    }
}

/// Hash a password using Argon2id with a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

// Hashed once with the same parameters as real accounts.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("no-such-account").ok());

/// Spend the same Argon2 work as a real check, for logins without an account.
fn verify_against_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

/// Verify a password against a stored PHC hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password doesn't match or
/// the stored hash is unreadable.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
