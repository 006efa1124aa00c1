//! Display Name Value Object
//!
//! Free-form name shown to other users. Markup-significant characters are
//! stripped rather than rejected.

use kernel::error::app_error::{AppError, AppResult};

/// Maximum name length in characters
pub const NAME_MAX_LENGTH: usize = 100;

const STRIPPED: [char; 5] = ['<', '>', '&', '"', '\''];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// Sanitize and validate a user-supplied name
    pub fn new(raw: &str) -> AppResult<Self> {
        let name = Self::sanitize(raw);

        if name.is_empty() || name.chars().count() > NAME_MAX_LENGTH {
            return Err(
                AppError::bad_request("Name must be between 1 and 100 characters")
                    .with_code("validation_error"),
            );
        }

        Ok(Self(name))
    }

    /// Trim, drop `< > & " '` and cap the length at [`NAME_MAX_LENGTH`]
    pub fn sanitize(raw: &str) -> String {
        let stripped: String = raw.trim().chars().filter(|c| !STRIPPED.contains(c)).collect();
        stripped.trim().chars().take(NAME_MAX_LENGTH).collect()
    }

    /// Create from database value (assumed already sanitized)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("  Ada Lovelace ", "Ada Lovelace")]
    #[case("<script>Bob</script>", "scriptBob/script")]
    #[case("Tom & \"Jerry\"", "Tom  Jerry")]
    #[case("O'Brien", "OBrien")]
    fn test_sanitize(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(DisplayName::new(raw).unwrap().as_str(), expected);
    }

    #[test]
    fn test_truncates_long_names() {
        let name = DisplayName::new(&"é".repeat(150)).unwrap();
        assert_eq!(name.as_str().chars().count(), NAME_MAX_LENGTH);
    }

    #[rstest]
    #[case("")]
    #[case("    ")]
    #[case("<>&")]
    fn test_empty_after_sanitizing(#[case] raw: &str) {
        let err = DisplayName::new(raw).unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }
}
