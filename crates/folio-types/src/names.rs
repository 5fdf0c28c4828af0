//! Branch name validation and reserved-name conventions.
//!
//! Valid branch names:
//! - 1 to 100 characters
//! - ASCII letters, digits, `-`, and `_` only
//!
//! Reserved branch names (`main`, `rebuttal`, `camera-ready`) are protected
//! from deletion by naming convention, not by a stored flag.

use crate::error::TypeError;

/// The implicit branch every artifact starts on.
pub const DEFAULT_BRANCH: &str = "main";

/// Branch names that cannot be deleted.
pub const RESERVED_BRANCHES: &[&str] = &["main", "rebuttal", "camera-ready"];

/// Maximum accepted branch name length in characters.
pub const MAX_BRANCH_NAME_LEN: usize = 100;

/// Validate a branch name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use folio_types::names::validate_branch_name;
///
/// assert!(validate_branch_name("main").is_ok());
/// assert!(validate_branch_name("review-round-2").is_ok());
/// assert!(validate_branch_name("").is_err());
/// assert!(validate_branch_name("has space").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> Result<(), TypeError> {
    if name.is_empty() {
        return Err(TypeError::InvalidBranchName {
            name: name.to_string(),
            reason: "branch name must not be empty".into(),
        });
    }

    if name.chars().count() > MAX_BRANCH_NAME_LEN {
        return Err(TypeError::InvalidBranchName {
            name: name.to_string(),
            reason: format!("branch name exceeds {MAX_BRANCH_NAME_LEN} characters"),
        });
    }

    for ch in name.chars() {
        if !ch.is_ascii_alphanumeric() && ch != '-' && ch != '_' {
            return Err(TypeError::InvalidBranchName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    Ok(())
}

/// Returns `true` if the branch name is reserved and protected from deletion.
pub fn is_reserved_branch(name: &str) -> bool {
    RESERVED_BRANCHES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_simple_names() {
        assert!(validate_branch_name("main").is_ok());
        assert!(validate_branch_name("rebuttal").is_ok());
        assert!(validate_branch_name("camera-ready").is_ok());
        assert!(validate_branch_name("revision_2024").is_ok());
    }

    #[test]
    fn reject_empty_name() {
        assert!(validate_branch_name("").is_err());
    }

    #[test]
    fn reject_whitespace() {
        assert!(validate_branch_name("has space").is_err());
        assert!(validate_branch_name("has\ttab").is_err());
        assert!(validate_branch_name("has\nnewline").is_err());
    }

    #[test]
    fn reject_punctuation() {
        assert!(validate_branch_name("feature/auth").is_err());
        assert!(validate_branch_name("v1.0").is_err());
        assert!(validate_branch_name("a~b").is_err());
        assert!(validate_branch_name("a:b").is_err());
    }

    #[test]
    fn reject_non_ascii() {
        assert!(validate_branch_name("résumé").is_err());
    }

    #[test]
    fn length_boundary() {
        let max = "a".repeat(MAX_BRANCH_NAME_LEN);
        assert!(validate_branch_name(&max).is_ok());
        let over = "a".repeat(MAX_BRANCH_NAME_LEN + 1);
        assert!(validate_branch_name(&over).is_err());
    }

    #[test]
    fn reserved_names() {
        assert!(is_reserved_branch("main"));
        assert!(is_reserved_branch("rebuttal"));
        assert!(is_reserved_branch("camera-ready"));
        assert!(!is_reserved_branch("review-round-2"));
    }

    #[test]
    fn reserved_names_are_valid() {
        for name in RESERVED_BRANCHES {
            assert!(validate_branch_name(name).is_ok(), "reserved name {name:?} must validate");
        }
    }
}
