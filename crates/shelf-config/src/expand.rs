//! Environment variable expansion for configuration strings.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` is the dotted config path used in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

/// Expand an optional string in place.
pub(crate) fn expand_env_opt(
    value: &mut Option<String>,
    field: &str,
) -> Result<(), ConfigError> {
    if let Some(inner) = value.as_deref() {
        *value = Some(expand_env(inner, field)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_literal() {
        assert_eq!(expand_env("plain", "f").unwrap(), "plain");
    }

    #[test]
    fn test_expand_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SHELF_EXPAND_UNSET_TEST");
        }
        assert_eq!(
            expand_env("${SHELF_EXPAND_UNSET_TEST:-production}", "f").unwrap(),
            "production"
        );
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SHELF_EXPAND_MISSING_TEST");
        }
        let err = expand_env("${SHELF_EXPAND_MISSING_TEST}", "sanity.token").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("sanity.token"));
        assert!(msg.contains("SHELF_EXPAND_MISSING_TEST"));
    }

    #[test]
    fn test_expand_opt_none_untouched() {
        let mut value = None;
        expand_env_opt(&mut value, "f").unwrap();
        assert!(value.is_none());
    }
}
