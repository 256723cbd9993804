use crate::config::app_config::AppState;
use crate::error::error_model::{AppError, ErrorType};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use secrecy::{ExposeSecret, SecretString};
use tracing::error;

fn argon2_instance(pepper: Option<&SecretString>) -> Result<Argon2<'_>, AppError> {
    match pepper {
        Some(pepper) => Argon2::new_with_secret(
            pepper.expose_secret().as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| {
            error!("Invalid argon2 configuration: {:?}", e);
            AppError::new(ErrorType::Internal, "Error hashing password")
        }),
        None => Ok(Argon2::default()),
    }
}

/// Hashes a password with Argon2id and a random salt.
///
/// The optional pepper from the configuration is mixed in as the Argon2 secret.
///
/// # Errors
///
/// Returns an internal `AppError` if the hasher cannot be built or hashing fails.
pub fn hash_password(pepper: Option<&SecretString>, password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2_instance(pepper)?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Error hashing password: {:?}", e);
            AppError::new(ErrorType::Internal, "Error hashing password")
        })
}

/// Checks a password against a stored PHC hash string.
pub fn verify_password(pepper: Option<&SecretString>, password: &str, password_hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Stored password hash is malformed: {:?}", e);
            return false;
        }
    };
    match argon2_instance(pepper) {
        Ok(argon2) => argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// Hashes with the pepper configured on the application state.
pub fn hash_user_password(state: &AppState, password: &str) -> Result<String, AppError> {
    hash_password(state.config.argon_pepper.as_ref(), password)
}

pub fn verify_user_password(state: &AppState, password: &str, password_hash: &str) -> bool {
    verify_password(state.config.argon_pepper.as_ref(), password, password_hash)
}

/// Performs a throw-away verification so an unknown email costs as much as a wrong password.
pub fn run_fake_password_hash_check(state: &AppState) {
    let _ = verify_user_password(state, "dummy", &state.config.dummy_hashed_password);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password(None, "Password123!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(None, "Password123!", &hash));
        assert!(!verify_password(None, "Password123?", &hash));
    }

    #[test]
    fn pepper_is_part_of_the_hash() {
        let pepper = SecretString::from("pepper-value".to_string());
        let hash = hash_password(Some(&pepper), "Password123!").unwrap();
        assert!(verify_password(Some(&pepper), "Password123!", &hash));
        assert!(!verify_password(None, "Password123!", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password(None, "Password123!", "not-a-hash"));
    }
}
