//! Owner-scoped object keys

use std::fmt;

use uuid::Uuid;

/// Storage key of the form `{owner_id}/{unique_id}.{extension}`
///
/// The `owner_id/` prefix is what group deletion matches on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoredObjectKey {
    owner_id: String,
    unique_id: String,
    extension: &'static str,
}

impl StoredObjectKey {
    /// Character that owns the object
    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// 32 lowercase hex characters
    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// File extension, without the dot
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        self.extension
    }
}

impl fmt::Display for StoredObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}.{}", self.owner_id, self.unique_id, self.extension)
    }
}

/// Generates storage keys from random 128-bit identifiers
#[derive(Debug, Clone, Copy)]
pub struct ObjectNamer {
    extension: &'static str,
}

impl ObjectNamer {
    /// Creates a namer for objects with the given extension
    #[must_use]
    pub const fn new(extension: &'static str) -> Self {
        Self { extension }
    }

    /// Derives a fresh key under `owner_id`
    ///
    /// Every call returns a key not returned before, regardless of input.
    #[must_use]
    pub fn name(&self, owner_id: &str) -> StoredObjectKey {
        StoredObjectKey {
            owner_id: owner_id.to_string(),
            unique_id: Uuid::new_v4().simple().to_string(),
            extension: self.extension,
        }
    }
}
