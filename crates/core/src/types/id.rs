//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Catalog entities are
//! keyed by slugs (`photo-1`, `landscapes`), so IDs wrap a `String`.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use photoart_core::define_id;
/// define_id!(PosterId);
/// define_id!(ShelfId);
///
/// let poster = PosterId::new("poster-1");
/// let shelf = ShelfId::new("poster-1");
///
/// // These are different types, so this won't compile:
/// // let _: PosterId = shelf;
/// assert_eq!(poster.as_str(), shelf.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(PhotoId);
define_id!(CollectionId);
define_id!(UserId);
define_id!(CartItemId);

impl CartItemId {
    /// Generate a fresh random cart line ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl CollectionId {
    /// Slug of the pseudo-collection that matches every photo.
    pub const ALL: &'static str = "all";

    /// Returns `true` if this is the "all photos" pseudo-collection.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.0 == Self::ALL
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_as_str() {
        let id = PhotoId::new("photo-7");
        assert_eq!(id.to_string(), "photo-7");
        assert_eq!(id.as_str(), "photo-7");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = CollectionId::from("wildlife");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"wildlife\"");
        let back: CollectionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_collection_all() {
        assert!(CollectionId::new("all").is_all());
        assert!(!CollectionId::new("urban").is_all());
    }

    #[test]
    fn test_cart_item_ids_are_unique() {
        assert_ne!(CartItemId::generate(), CartItemId::generate());
    }
}
