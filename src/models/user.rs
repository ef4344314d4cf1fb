//! Caller identity carried by bearer tokens

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Customer,
    Employee,
    Admin,
    SuperAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "CUSTOMER",
            UserRole::Employee => "EMPLOYEE",
            UserRole::Admin => "ADMIN",
            UserRole::SuperAdmin => "SUPER_ADMIN",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JWT claims for authenticated callers.
///
/// Tokens are issued by the account service; this server only verifies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a signed token (used by tooling and tests)
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// ADMIN and SUPER_ADMIN hold administrative privilege
    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::SuperAdmin)
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn claims(role: UserRole, ttl: Duration) -> UserClaims {
        let now = Utc::now();
        UserClaims {
            sub: Uuid::new_v4(),
            email: "rami@example.sy".to_string(),
            role,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let original = claims(UserRole::Customer, Duration::hours(1));
        let token = original.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.sub, original.sub);
        assert_eq!(parsed.role, UserRole::Customer);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = claims(UserRole::Admin, Duration::hours(1))
            .create_token("secret")
            .unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = claims(UserRole::Admin, Duration::hours(-2))
            .create_token("secret")
            .unwrap();
        assert!(UserClaims::from_token(&token, "secret").is_err());
    }

    #[test]
    fn test_admin_roles() {
        assert!(claims(UserRole::Admin, Duration::hours(1)).is_admin());
        assert!(claims(UserRole::SuperAdmin, Duration::hours(1)).is_admin());
        assert!(!claims(UserRole::Employee, Duration::hours(1)).is_admin());
        assert!(claims(UserRole::Customer, Duration::hours(1))
            .require_admin()
            .is_err());
    }
}
