//! Constraint Validation - required, minlength, pattern, custom.
//!
//! One validity check runs on every value change and every relevant
//! attribute change. Message priority when several constraints fail:
//! custom, then required, then minlength, then pattern. maxlength never
//! fails validation because the value is truncated before it is applied.

use bitflags::bitflags;
use regex::Regex;

use crate::engine::attributes;

bitflags! {
    /// Which constraints a value currently violates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ValidityFlags: u8 {
        const REQUIRED_MISSING = 1;
        const TOO_SHORT = 2;
        const PATTERN_MISMATCH = 4;
        const CUSTOM = 8;
    }
}

/// Result of a validity check.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Validity {
    pub flags: ValidityFlags,
    /// The highest-priority failure message, None when valid.
    pub message: Option<String>,
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Declarative constraints read from an element's attributes.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    pub required: bool,
    pub minlength: Option<usize>,
    pub pattern: Option<String>,
}

impl Constraints {
    pub fn from_attributes(index: usize) -> Self {
        Self {
            required: attributes::has(index, "required"),
            minlength: attributes::parse_usize(index, "minlength"),
            pattern: attributes::get(index, "pattern"),
        }
    }
}

pub(crate) const REQUIRED_MESSAGE: &str = "This field is required";
pub(crate) const PATTERN_MESSAGE: &str = "Please match the requested format";

pub(crate) fn length_message(min: usize) -> String {
    format!("Minimum length is {min} characters")
}

/// Check a value against constraints plus an optional custom validity
/// message (which wins over every declarative constraint).
pub fn check(value: &str, constraints: &Constraints, custom: Option<&str>) -> Validity {
    let mut flags = ValidityFlags::default();

    if let Some(custom) = custom {
        if !custom.is_empty() {
            flags |= ValidityFlags::CUSTOM;
        }
    }
    if constraints.required && value.is_empty() {
        flags |= ValidityFlags::REQUIRED_MISSING;
    }
    if !value.is_empty() {
        if let Some(min) = constraints.minlength {
            if value.chars().count() < min {
                flags |= ValidityFlags::TOO_SHORT;
            }
        }
        if let Some(pattern) = &constraints.pattern {
            if !matches_pattern(value, pattern) {
                flags |= ValidityFlags::PATTERN_MISMATCH;
            }
        }
    }

    let message = if flags.contains(ValidityFlags::CUSTOM) {
        custom.map(str::to_string)
    } else if flags.contains(ValidityFlags::REQUIRED_MISSING) {
        Some(REQUIRED_MESSAGE.to_string())
    } else if flags.contains(ValidityFlags::TOO_SHORT) {
        constraints.minlength.map(length_message)
    } else if flags.contains(ValidityFlags::PATTERN_MISMATCH) {
        Some(PATTERN_MESSAGE.to_string())
    } else {
        None
    };

    Validity { flags, message }
}

/// Pattern matching against the whole value. A malformed pattern is treated
/// as absent (the value passes).
fn matches_pattern(value: &str, pattern: &str) -> bool {
    let anchored = format!("^(?:{pattern})$");
    match Regex::new(&anchored) {
        Ok(regex) => regex.is_match(value),
        Err(error) => {
            tracing::warn!(pattern, %error, "ignoring malformed pattern");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_constraints_is_valid() {
        let validity = check("", &Constraints::default(), None);
        assert!(validity.is_valid());
        assert_eq!(validity.message, None);
    }

    #[test]
    fn test_required_empty_fails() {
        let constraints = Constraints {
            required: true,
            ..Default::default()
        };
        let validity = check("", &constraints, None);
        assert!(validity.flags.contains(ValidityFlags::REQUIRED_MISSING));
        assert_eq!(validity.message.as_deref(), Some(REQUIRED_MESSAGE));

        assert!(check("x", &constraints, None).is_valid());
    }

    #[test]
    fn test_minlength_skips_empty_value() {
        let constraints = Constraints {
            minlength: Some(3),
            ..Default::default()
        };
        // Empty value passes minlength (that is required's job)
        assert!(check("", &constraints, None).is_valid());
        let validity = check("ab", &constraints, None);
        assert!(validity.flags.contains(ValidityFlags::TOO_SHORT));
        assert_eq!(validity.message.as_deref(), Some("Minimum length is 3 characters"));
        assert!(check("abc", &constraints, None).is_valid());
    }

    #[test]
    fn test_pattern_anchored_whole_value() {
        let constraints = Constraints {
            pattern: Some("[0-9]+".to_string()),
            ..Default::default()
        };
        assert!(check("123", &constraints, None).is_valid());
        // Partial match is not enough
        let validity = check("a123", &constraints, None);
        assert!(validity.flags.contains(ValidityFlags::PATTERN_MISMATCH));
        assert_eq!(validity.message.as_deref(), Some(PATTERN_MESSAGE));
        // Empty value skips pattern
        assert!(check("", &constraints, None).is_valid());
    }

    #[test]
    fn test_malformed_pattern_is_ignored() {
        let constraints = Constraints {
            pattern: Some("[unclosed".to_string()),
            ..Default::default()
        };
        assert!(check("anything", &constraints, None).is_valid());
    }

    #[test]
    fn test_message_priority() {
        let constraints = Constraints {
            required: true,
            minlength: Some(3),
            pattern: Some("[0-9]+".to_string()),
        };

        // Custom beats everything
        let validity = check("", &constraints, Some("Taken"));
        assert_eq!(validity.message.as_deref(), Some("Taken"));
        assert!(validity.flags.contains(ValidityFlags::CUSTOM));
        assert!(validity.flags.contains(ValidityFlags::REQUIRED_MISSING));

        // Required beats minlength and pattern
        let validity = check("", &constraints, None);
        assert_eq!(validity.message.as_deref(), Some(REQUIRED_MESSAGE));

        // Minlength beats pattern
        let validity = check("ab", &constraints, None);
        assert_eq!(validity.message.as_deref(), Some("Minimum length is 3 characters"));

        // Pattern last
        let validity = check("abcd", &constraints, None);
        assert_eq!(validity.message.as_deref(), Some(PATTERN_MESSAGE));
    }

    #[test]
    fn test_empty_custom_clears() {
        let validity = check("x", &Constraints::default(), Some(""));
        assert!(validity.is_valid());
    }
}
