//! Table identity and descriptors.
//!
//! Descriptors are plain immutable configuration structs constructed
//! directly; there is no fluent builder layer around them.

use std::fmt;

/// Namespace used when the caller does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Default number of versions retained per column.
pub const DEFAULT_MAX_VERSIONS: usize = 3;

/// Fully-qualified table identity: namespace plus table name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableRef {
    namespace: String,
    name: String,
}

impl TableRef {
    /// Builds a table reference; a missing namespace falls back to
    /// [`DEFAULT_NAMESPACE`].
    pub fn new(namespace: Option<&str>, name: &str) -> Self {
        Self {
            namespace: namespace.unwrap_or(DEFAULT_NAMESPACE).to_string(),
            name: name.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `namespace:name` form used as the canonical table key.
    pub fn qualified(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// Column-family configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FamilyDescriptor {
    pub name: Vec<u8>,
    /// Number of versions the store retains per column in this family.
    pub max_versions: usize,
}

impl FamilyDescriptor {
    pub fn new(name: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            max_versions: DEFAULT_MAX_VERSIONS,
        }
    }
}

/// Table configuration: identity plus its column families.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: TableRef,
    pub families: Vec<FamilyDescriptor>,
}

impl TableDescriptor {
    pub fn new(name: TableRef, families: Vec<FamilyDescriptor>) -> Self {
        Self { name, families }
    }

    pub fn family(&self, name: &[u8]) -> Option<&FamilyDescriptor> {
        self.families.iter().find(|f| f.name == name)
    }
}
