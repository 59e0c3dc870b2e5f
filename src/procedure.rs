//! Procedure names
//!
//! Names are interpolated into query text, so each dotted segment must be a
//! plain identifier. Appending a suffix always yields a new value and leaves
//! the base namespace untouched.

use std::fmt;

use crate::error::{GdsError, GdsResult};

/// Dotted identifier of a server procedure or function, e.g. `gds.pageRank.stream`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcedureName(String);

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check(name: &str) -> GdsResult<()> {
    if name.split('.').all(is_identifier) {
        Ok(())
    } else {
        Err(GdsError::InvalidProcedureName(name.to_string()))
    }
}

impl ProcedureName {
    pub fn new(name: impl Into<String>) -> GdsResult<Self> {
        let name = name.into();
        check(&name)?;
        Ok(Self(name))
    }

    /// Wrap a name known to be a valid dotted identifier at compile time.
    pub(crate) fn from_static(name: &'static str) -> Self {
        debug_assert!(check(name).is_ok(), "invalid built-in procedure name {name}");
        Self(name.to_string())
    }

    /// `self` + `.` + `suffix`; the suffix may itself be dotted.
    pub fn child(&self, suffix: &str) -> GdsResult<Self> {
        check(suffix)?;
        Ok(Self(format!("{}.{}", self.0, suffix)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last dotted segment (`stream` for `gds.pageRank.stream`)
    pub fn leaf(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ProcedureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProcedureName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_does_not_modify_base() {
        let base = ProcedureName::new("gds.alpha.linkprediction").unwrap();
        let first = base.child("adamicAdar").unwrap();
        let second = base.child("adamicAdar").unwrap();

        assert_eq!(first.as_str(), "gds.alpha.linkprediction.adamicAdar");
        assert_eq!(first, second);
        assert_eq!(base.as_str(), "gds.alpha.linkprediction");
        assert_eq!(first.leaf(), "adamicAdar");
    }

    #[test]
    fn test_dotted_suffix() {
        let base = ProcedureName::new("gds").unwrap();
        assert_eq!(base.child("pageRank.mutate").unwrap().as_str(), "gds.pageRank.mutate");
    }

    #[test]
    fn test_rejects_non_identifiers() {
        for bad in ["", "gds.", ".gds", "gds..x", "gds.page rank", "gds.x(1) //", "gds.1st"] {
            assert!(
                matches!(ProcedureName::new(bad), Err(GdsError::InvalidProcedureName(_))),
                "accepted {bad:?}"
            );
        }
        let base = ProcedureName::new("gds").unwrap();
        assert!(base.child("x') RETURN 1 //").is_err());
    }
}
