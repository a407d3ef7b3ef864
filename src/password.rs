//! One-way password hashing for stored user credentials.

use crate::error::AppError;
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use serde_json::{Map, Value};

/// Hash a plaintext password into a PHC string for storage.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Prepare hook for the user entity: replaces the plaintext "password" value
/// in the snake_cased body with its hash before the row is written.
pub fn hash_password_field(body: &mut Map<String, Value>) -> Result<(), AppError> {
    if let Some(Value::String(plain)) = body.get("password") {
        let hashed = hash_password(plain)?;
        body.insert("password".to_string(), Value::String(hashed));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("password123").unwrap();
        assert_ne!(hash, "password123");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("password123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn prepare_hook_replaces_password_in_place() {
        let Value::Object(mut body) = json!({"username": "testuser", "password": "password123"})
        else {
            unreachable!()
        };
        hash_password_field(&mut body).unwrap();
        let stored = body["password"].as_str().unwrap();
        assert!(stored.starts_with("$argon2"));
        assert_eq!(body["username"], "testuser");
    }

    #[test]
    fn prepare_hook_without_password_is_a_no_op() {
        let Value::Object(mut body) = json!({"username": "testuser"}) else {
            unreachable!()
        };
        hash_password_field(&mut body).unwrap();
        assert!(!body.contains_key("password"));
    }
}
