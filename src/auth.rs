//! Credential verification as an explicit collaborator boundary. The stores
//! never fabricate users; they take whatever identity the authenticator
//! hands back. The shipped implementation is the development double; a real
//! deployment would stand a credential authority behind the same trait.

use crate::model::{Role, User};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("email must not be empty")]
    MissingEmail,
    #[error("malformed email: {0}")]
    MalformedEmail(String),
    #[error("password must not be empty")]
    MissingPassword,
}

pub trait Authenticator {
    /// Checks credentials and returns the verified identity.
    fn verify(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Creates an account and returns its identity. The requested role is
    /// honored; on login the role comes from the verifier instead.
    fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError>;
}

/// Development double: accepts any well-formed credentials and yields a
/// deterministic identity. Login always resolves to the fixed teacher
/// account; register derives the identity from the caller's fields.
pub struct DevAuthenticator;

fn check_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() {
        return Err(AuthError::MissingEmail);
    }
    if !email.contains('@') {
        return Err(AuthError::MalformedEmail(email.to_string()));
    }
    if password.is_empty() {
        return Err(AuthError::MissingPassword);
    }
    Ok(())
}

impl Authenticator for DevAuthenticator {
    fn verify(&self, email: &str, password: &str) -> Result<User, AuthError> {
        check_credentials(email, password)?;
        Ok(User {
            id: "1".to_string(),
            name: "John".to_string(),
            family_name: "Doe".to_string(),
            email: email.to_string(),
            role: Role::Teacher,
        })
    }

    fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        check_credentials(email, password)?;
        let mut parts = name.splitn(2, ' ');
        let first = parts.next().unwrap_or("").to_string();
        let family = parts.next().unwrap_or("").to_string();
        Ok(User {
            id: "1".to_string(),
            name: first,
            family_name: family,
            email: email.to_string(),
            role,
        })
    }
}
