//! Macro for implementing Display and FromStr for wire-level enums
//!
//! Several domain enums (platforms, error origins, push priorities) travel as
//! lowercase strings in logs, config files and request bodies. This macro
//! provides a single implementation for both Display and FromStr so the
//! string form stays consistent everywhere.
//!
//! # Example
//!
//! ```rust
//! use batchpush_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Push,
//!     InApp,
//! }
//!
//! impl_domain_status_conversions!(Channel {
//!     Push => "push",
//!     InApp => "in_app",
//! });
//!
//! assert_eq!(Channel::InApp.to_string(), "in_app");
//! assert_eq!("PUSH".parse::<Channel>(), Ok(Channel::Push));
//! ```

/// Implements Display and FromStr traits for string-backed enums
///
/// This macro generates:
/// - Display trait: converts enum variants to their lowercase strings
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations (lowercase literals)
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => ::std::result::Result::Ok(Self::$variant),)+
                    _ => ::std::result::Result::Err(::std::format!(
                        "Invalid {}: {}",
                        ::std::stringify!($enum_name),
                        s
                    )),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestTarget {
        Primary,
        Secondary,
    }

    impl_domain_status_conversions!(TestTarget {
        Primary => "primary",
        Secondary => "secondary",
    });

    #[test]
    fn test_display_conversion() {
        assert_eq!(TestTarget::Primary.to_string(), "primary");
        assert_eq!(TestTarget::Secondary.to_string(), "secondary");
    }

    #[test]
    fn test_fromstr_is_case_insensitive() {
        assert_eq!(TestTarget::from_str("primary").unwrap(), TestTarget::Primary);
        assert_eq!(TestTarget::from_str("SECONDARY").unwrap(), TestTarget::Secondary);
        assert_eq!(TestTarget::from_str("PrImArY").unwrap(), TestTarget::Primary);
    }

    #[test]
    fn test_fromstr_invalid() {
        let result = TestTarget::from_str("tertiary");
        assert!(result.unwrap_err().contains("Invalid TestTarget: tertiary"));
        assert!(TestTarget::from_str("").is_err());
    }

    mod shadowed_result {
        // One-argument alias in scope at the call site, as in `errors.rs`.
        #[allow(dead_code)]
        type Result<T> = std::result::Result<T, ()>;

        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum Lane {
            Fast,
            Slow,
        }

        impl_domain_status_conversions!(Lane {
            Fast => "fast",
            Slow => "slow",
        });
    }

    #[test]
    fn test_conversions_ignore_local_result_alias() {
        use shadowed_result::Lane;

        assert_eq!(Lane::Slow.to_string(), "slow");
        assert_eq!(Lane::from_str("FAST"), Ok(Lane::Fast));
        assert_eq!(Lane::from_str("idle").unwrap_err(), "Invalid Lane: idle");
    }
}
