use std::fmt;

use serde::{Deserialize, Serialize};

/// A hierarchical, component-wise name.
///
/// Mirrors the named-data convention `/a/b/c`: a name is a sequence of
/// opaque components, never a string to be scanned for separators.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Name(Vec<String>);

impl Name {
    /// The empty name (the root).
    pub fn root() -> Self {
        Name(Vec::new())
    }

    /// Build a name from an ordered list of components.
    pub fn from_components<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Name(components.into_iter().map(Into::into).collect())
    }

    /// Return a new name with `component` appended.
    pub fn append<S: Into<String>>(&self, component: S) -> Self {
        let mut components = self.0.clone();
        components.push(component.into());
        Name(components)
    }

    /// Return a new name that is `self` followed by every component of `other`.
    pub fn join(&self, other: &Name) -> Self {
        let mut components = self.0.clone();
        components.extend(other.0.iter().cloned());
        Name(components)
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// `true` iff `self` is a strict or non-strict prefix of `other`.
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.0.len() <= other.0.len() && self.0.iter().zip(other.0.iter()).all(|(a, b)| a == b)
    }

    /// The sub-name obtained by dropping the first `prefix.len()` components,
    /// if `prefix` is indeed a prefix of `self`.
    pub fn strip_prefix(&self, prefix: &Name) -> Option<Name> {
        if prefix.is_prefix_of(self) {
            Some(Name(self.0[prefix.0.len()..].to_vec()))
        } else {
            None
        }
    }

    /// `self` with its last component dropped (the empty name if `self` is
    /// already empty).
    pub fn parent(&self) -> Name {
        if self.0.is_empty() {
            Name::root()
        } else {
            Name(self.0[..self.0.len() - 1].to_vec())
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for component in &self.0 {
            write!(f, "/{component}")?;
        }
        Ok(())
    }
}
