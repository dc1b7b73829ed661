//! ResourceSink trait for collecting output resources.
//!
//! The layout translation references text and images by resource name. The
//! sink is owned by the caller for the duration of one conversion run.

use std::collections::BTreeMap;
use std::fmt::Debug;
use thiserror::Error;

/// Error type for resource registration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("Invalid resource name: '{0}'")]
    InvalidName(String),

    #[error("Resource '{name}' rejected: {message}")]
    Rejected { name: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    String,
    Drawable,
    Color,
}

impl ResourceKind {
    pub fn prefix(self) -> &'static str {
        match self {
            ResourceKind::String => "@string/",
            ResourceKind::Drawable => "@drawable/",
            ResourceKind::Color => "@color/",
        }
    }
}

/// A trait for registering resources referenced from layout attributes.
pub trait ResourceSink: Debug {
    /// Registers `value` under a name derived from `hint` and returns the
    /// reference to put into an attribute (e.g. `@string/title`).
    fn add(&mut self, kind: ResourceKind, hint: &str, value: &str)
    -> Result<String, ResourceError>;

    fn get(&self, kind: ResourceKind, name: &str) -> Option<&str>;
}

/// An in-memory resource registry with deterministic naming.
///
/// Identical values share one name; a name clash with a different value gets
/// a numeric suffix.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResources {
    entries: BTreeMap<ResourceKind, BTreeMap<String, String>>,
}

impl InMemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(|e| e.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self, kind: ResourceKind) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .get(&kind)
            .into_iter()
            .flat_map(|e| e.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

/// Lowercase alphanumerics joined by single underscores, prefixed when the
/// result would start with a digit.
fn sanitize(hint: &str) -> String {
    let mut name = String::with_capacity(hint.len());
    for c in hint.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
        } else if !name.ends_with('_') && !name.is_empty() {
            name.push('_');
        }
        if name.len() >= 32 {
            break;
        }
    }
    let name = name.trim_end_matches('_').to_string();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("res_{}", name)
    } else {
        name
    }
}

impl ResourceSink for InMemoryResources {
    fn add(
        &mut self,
        kind: ResourceKind,
        hint: &str,
        value: &str,
    ) -> Result<String, ResourceError> {
        let base = sanitize(hint);
        if base.is_empty() {
            return Err(ResourceError::InvalidName(hint.to_string()));
        }
        let entries = self.entries.entry(kind).or_default();
        if let Some((name, _)) = entries.iter().find(|(_, v)| v.as_str() == value) {
            return Ok(format!("{}{}", kind.prefix(), name));
        }
        let mut name = base.clone();
        let mut suffix = 1;
        while entries.contains_key(&name) {
            name = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        entries.insert(name.clone(), value.to_string());
        Ok(format!("{}{}", kind.prefix(), name))
    }

    fn get(&self, kind: ResourceKind, name: &str) -> Option<&str> {
        self.entries
            .get(&kind)
            .and_then(|e| e.get(name))
            .map(String::as_str)
    }
}
