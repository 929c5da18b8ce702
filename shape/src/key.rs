//! Runtime type identity.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Opaque identity of a host type, used as the cache key.
///
/// Two keys are equal exactly when they name the same type. The type name is
/// carried for diagnostics only and does not take part in equality or hashing.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key of `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[must_use]
    pub const fn id(self) -> TypeId {
        self.id
    }

    /// Returns the type name as reported by [`std::any::type_name`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equal_types_have_equal_keys() {
        assert_eq!(TypeKey::of::<Vec<u8>>(), TypeKey::of::<Vec<u8>>());
        assert_ne!(TypeKey::of::<Vec<u8>>(), TypeKey::of::<Vec<i8>>());
    }

    #[test]
    fn keys_hash_by_identity() {
        let mut set = HashSet::new();
        set.insert(TypeKey::of::<String>());
        set.insert(TypeKey::of::<String>());
        set.insert(TypeKey::of::<Option<String>>());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_uses_type_name() {
        assert_eq!(TypeKey::of::<u32>().to_string(), "u32");
        assert!(format!("{:?}", TypeKey::of::<String>()).contains("String"));
    }
}
