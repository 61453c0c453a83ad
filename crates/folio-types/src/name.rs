//! Project and page name validation.
//!
//! Project names appear as hostname labels (`project.domain`), so they are
//! restricted to one or more of `[a-z0-9-]`. The label [`API_LABEL`] names
//! the API host and is never a project name.
//!
//! Page names appear as URL path segments:
//! - Must be non-empty and at most 255 bytes
//! - Must not contain `/`
//! - Must not contain whitespace or control characters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Hostname label reserved for the API host.
pub const API_LABEL: &str = "api";

/// Longest page name accepted.
const MAX_PAGE_NAME_LEN: usize = 255;

/// Validate a project name, returning `Ok(())` if it is legal.
///
/// # Examples
///
/// ```
/// use folio_types::validate_project_name;
///
/// assert!(validate_project_name("valid-name-1").is_ok());
/// assert!(validate_project_name("Has Spaces").is_err());
/// assert!(validate_project_name("").is_err());
/// ```
pub fn validate_project_name(name: &str) -> Result<(), TypeError> {
    if name.is_empty() {
        return Err(TypeError::InvalidName {
            name: name.to_string(),
            reason: "project name must not be empty".into(),
        });
    }

    if let Some(ch) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(TypeError::InvalidName {
            name: name.to_string(),
            reason: format!(
                "must be lowercase alphanumeric with dashes only, found {ch:?}"
            ),
        });
    }

    if name == API_LABEL {
        return Err(TypeError::InvalidName {
            name: name.to_string(),
            reason: format!("{API_LABEL:?} is reserved for the API host"),
        });
    }

    Ok(())
}

/// Validate a page name, returning `Ok(())` if it is legal.
pub fn validate_page_name(name: &str) -> Result<(), TypeError> {
    if name.is_empty() {
        return Err(TypeError::InvalidName {
            name: name.to_string(),
            reason: "page name must not be empty".into(),
        });
    }

    if name.len() > MAX_PAGE_NAME_LEN {
        return Err(TypeError::InvalidName {
            name: name.to_string(),
            reason: format!("page name longer than {MAX_PAGE_NAME_LEN} bytes"),
        });
    }

    if let Some(ch) = name
        .chars()
        .find(|c| *c == '/' || c.is_whitespace() || c.is_control())
    {
        return Err(TypeError::InvalidName {
            name: name.to_string(),
            reason: format!("contains forbidden character: {ch:?}"),
        });
    }

    Ok(())
}

/// A validated project name. Immutable once a project is created.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

impl ProjectName {
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        validate_project_name(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A validated page name, unique within a single version's page list.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageName(String);

impl PageName {
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        validate_page_name(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_newtype_impls {
    ($ty:ident) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($ty), self.0)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $ty {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = TypeError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_newtype_impls!(ProjectName);
string_newtype_impls!(PageName);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_project_names() {
        assert!(validate_project_name("valid-name-1").is_ok());
        assert!(validate_project_name("a").is_ok());
        assert!(validate_project_name("123").is_ok());
        assert!(validate_project_name("-").is_ok());
    }

    #[test]
    fn reject_empty_project_name() {
        assert!(validate_project_name("").is_err());
    }

    #[test]
    fn reject_spaces_and_uppercase() {
        assert!(validate_project_name("Has Spaces").is_err());
        assert!(validate_project_name("has spaces").is_err());
        assert!(validate_project_name("Upper").is_err());
    }

    #[test]
    fn reject_project_separators() {
        assert!(validate_project_name("a_b").is_err());
        assert!(validate_project_name("a.b").is_err());
        assert!(validate_project_name("a/b").is_err());
    }

    #[test]
    fn reject_non_ascii_project_name() {
        assert!(validate_project_name("café").is_err());
    }

    #[test]
    fn reject_reserved_api_label() {
        assert!(validate_project_name(API_LABEL).is_err());
        assert!(ProjectName::new("api").is_err());
        assert!(validate_project_name("api-docs").is_ok());
    }

    #[test]
    fn project_name_error_names_the_input() {
        let err = validate_project_name("Bad").unwrap_err();
        assert!(matches!(err, TypeError::InvalidName { ref name, .. } if name == "Bad"));
    }

    #[test]
    fn valid_page_names() {
        assert!(validate_page_name("index").is_ok());
        assert!(validate_page_name("About_Us.v2").is_ok());
        assert!(validate_page_name("ünïcode").is_ok());
    }

    #[test]
    fn reject_bad_page_names() {
        assert!(validate_page_name("").is_err());
        assert!(validate_page_name("a/b").is_err());
        assert!(validate_page_name("has space").is_err());
        assert!(validate_page_name("tab\there").is_err());
        assert!(validate_page_name(&"p".repeat(256)).is_err());
    }

    #[test]
    fn project_name_serde_validates() {
        let name: ProjectName = serde_json::from_str("\"docs\"").unwrap();
        assert_eq!(name.as_str(), "docs");
        assert!(serde_json::from_str::<ProjectName>("\"Has Spaces\"").is_err());
    }

    #[test]
    fn page_name_parses_from_str() {
        let page: PageName = "index".parse().unwrap();
        assert_eq!(page.to_string(), "index");
    }
}
