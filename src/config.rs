//! Bank configuration
//!
//! Values the binary can override from the command line. Anything left unset
//! falls back to the defaults defined here.

/// Default administrative username
pub const DEFAULT_ADMIN_USER: &str = "admin";

/// Default administrative password
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Default number of entries in a mini statement
pub const DEFAULT_STATEMENT_LENGTH: usize = 10;

/// Credential pair guarding the administrative operations
///
/// A placeholder authorization check, not a security mechanism.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        AdminCredentials {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        AdminCredentials::new(DEFAULT_ADMIN_USER, DEFAULT_ADMIN_PASSWORD)
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Configuration for a [`crate::Bank`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankConfig {
    pub admin: AdminCredentials,
    /// Entries shown by a mini statement when the caller does not ask for a count
    pub statement_length: usize,
}

impl BankConfig {
    /// Build a configuration, replacing a zero statement length with the default
    pub fn new(admin: AdminCredentials, statement_length: usize) -> Self {
        let statement_length = if statement_length == 0 {
            tracing::warn!(
                "statement length must be positive, using default {}",
                DEFAULT_STATEMENT_LENGTH
            );
            DEFAULT_STATEMENT_LENGTH
        } else {
            statement_length
        };

        BankConfig {
            admin,
            statement_length,
        }
    }
}

impl Default for BankConfig {
    fn default() -> Self {
        BankConfig {
            admin: AdminCredentials::default(),
            statement_length: DEFAULT_STATEMENT_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = BankConfig::default();
        assert!(config.admin.matches("admin", "admin123"));
        assert_eq!(config.statement_length, 10);
    }

    #[rstest]
    #[case::custom(5, 5)]
    #[case::zero_falls_back(0, DEFAULT_STATEMENT_LENGTH)]
    fn test_statement_length(#[case] requested: usize, #[case] expected: usize) {
        let config = BankConfig::new(AdminCredentials::default(), requested);
        assert_eq!(config.statement_length, expected);
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", AdminCredentials::new("ops", "s3cret"));
        assert!(rendered.contains("ops"));
        assert!(!rendered.contains("s3cret"));
    }
}
