use std::{fmt, str::FromStr};

use convert_case::{Case, Casing};

use crate::error::{Error, Result};

/// Characters allowed in a widget name.
fn valid_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// The kind name of a widget, used in logs and tree dumps. Names are
/// lowercase snake case: ASCII letters, digits and underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WidgetName(String);

impl WidgetName {
    /// Munge an arbitrary string into a widget name: snake-case it, then drop
    /// anything that is still invalid.
    pub fn convert(name: &str) -> Self {
        let filtered: String = name
            .to_case(Case::Snake)
            .chars()
            .filter(|c| valid_char(*c))
            .collect();
        if filtered.is_empty() {
            Self("widget".into())
        } else {
            Self(filtered)
        }
    }
}

impl FromStr for WidgetName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.chars().all(valid_char) {
            return Err(Error::Invalid(format!("widget name {s:?}")));
        }
        Ok(Self(s.into()))
    }
}

impl fmt::Display for WidgetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for WidgetName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
