use crate::error::{
    Error,
    Result,
};
use derive_more::{
    Deref,
    Display,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::str::FromStr;

/// Dotted numeric identifier of one device value, e.g. `1.3.6.1.2.1.2.2.1.10.1`.
///
/// Values are only created fully resolved and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParameterId(String);

impl ParameterId {
    /// Appends the instance index to a base template: `base.index`.
    pub fn resolve(base: &str, index: u32) -> Result<Self> {
        if base.trim().is_empty() {
            return Err(Error::UnresolvedParameterId(base.to_string()));
        }
        format!("{base}.{index}").parse()
    }

    /// For templates taken from the catalog tables, which are checked by the catalog tests.
    pub(crate) fn from_template(template: &str, index: u32) -> Self {
        Self(format!("{template}.{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ParameterId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().trim_start_matches('.');
        let valid = !s.is_empty()
            && s
                .split('.')
                .all(|arc| !arc.is_empty() && arc.bytes().all(|b| b.is_ascii_digit()));
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::UnresolvedParameterId(s.to_string()))
        }
    }
}

impl TryFrom<String> for ParameterId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ParameterId> for String {
    fn from(id: ParameterId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolve_appends_index() {
        let id = ParameterId::resolve("1.3.6.1.2.1.2.2.1.10", 3).unwrap();
        assert_eq!(id.as_str(), "1.3.6.1.2.1.2.2.1.10.3");
        assert_eq!(id.to_string(), "1.3.6.1.2.1.2.2.1.10.3");
    }

    #[test]
    fn leading_dot_is_accepted() {
        let id: ParameterId = ".1.3.6.1.2.1.1.5.0".parse().unwrap();
        assert_eq!(id.as_str(), "1.3.6.1.2.1.1.5.0");
    }

    #[test]
    fn unresolved_ids_are_rejected() {
        for raw in ["", ".", "1..3", "1.3.x", "sysName.0", "1.3."] {
            assert!(
                matches!(raw.parse::<ParameterId>(), Err(Error::UnresolvedParameterId(_))),
                "{raw:?} should be rejected"
            );
        }
        assert!(ParameterId::resolve("", 0).is_err());
    }
}
