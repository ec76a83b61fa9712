//! Entity namespaces.
//!
//! An [`EntityNamespace`] maps entity names to their replacement text and is
//! consulted when resolving `&name;` references. Two process-wide defaults
//! are provided: [`DEFAULT_XML_NAMESPACE`] with the five predefined XML
//! entities, and [`HTML_NAMESPACE`] which adds the common HTML named
//! entities. Both are read-only; clone one to obtain a working copy.

mod escape;
mod html;

use std::collections::HashMap;
use std::collections::hash_map::Iter;
use std::sync::LazyLock;

use tagstream_common::{Error, Result};

pub use escape::{
    NumericEntity, escape_attribute, escape_text, parse_numeric_entity, resolve_entity, unescape,
};

/// [XML 1.0 § 4.6 Predefined Entities](https://www.w3.org/TR/xml/#sec-predefined-ent)
///
/// "The ampersand character (&) and the left angle bracket (<) must not appear
/// in their literal form ... The right angle bracket (>) may be represented
/// using the string "&gt;" ... the apostrophe or single-quote character (')
/// may be represented as "&apos;", and the double-quote character (") as
/// "&quot;"."
const XML_ENTITIES: [(&str, &str); 5] = [
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("apos", "'"),
    ("quot", "\""),
];

/// The predefined XML entities. Immutable.
pub static DEFAULT_XML_NAMESPACE: LazyLock<EntityNamespace> = LazyLock::new(EntityNamespace::xml);

/// The predefined XML entities plus the HTML named entities.
pub static HTML_NAMESPACE: LazyLock<EntityNamespace> = LazyLock::new(|| {
    let mut namespace = EntityNamespace::new();
    namespace.extend_unchecked(html::HTML_ENTITIES);
    namespace
});

/// A mapping from entity name to replacement text.
///
/// Lookups are exact: there is no fallback from one namespace to another.
#[derive(Debug, PartialEq, Eq)]
pub struct EntityNamespace {
    entities: HashMap<String, String>,
    mutable: bool,
}

impl EntityNamespace {
    /// A mutable namespace holding the predefined XML entities.
    #[must_use]
    pub fn new() -> Self {
        let mut namespace = Self::empty();
        namespace.extend_unchecked(XML_ENTITIES);
        namespace
    }

    /// A mutable namespace without any entities.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entities: HashMap::new(),
            mutable: true,
        }
    }

    /// An immutable namespace holding the predefined XML entities, equal to
    /// [`DEFAULT_XML_NAMESPACE`].
    #[must_use]
    pub fn xml() -> Self {
        let mut namespace = Self::new();
        namespace.freeze();
        namespace
    }

    /// A mutable copy of [`HTML_NAMESPACE`].
    #[must_use]
    pub fn html() -> Self {
        HTML_NAMESPACE.clone()
    }

    /// The replacement text of the entity `name`, if defined.
    #[must_use]
    pub fn get_entity(&self, name: &str) -> Option<&str> {
        self.entities.get(name).map(String::as_str)
    }

    /// Define or redefine the entity `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImmutableNamespace`] if the namespace is frozen.
    pub fn put_entity(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        if !self.mutable {
            return Err(Error::ImmutableNamespace { name });
        }
        let _ = self.entities.insert(name, value.into());
        Ok(())
    }

    /// Make this namespace reject all further definitions. Cloning it still
    /// yields a mutable copy.
    pub const fn freeze(&mut self) {
        self.mutable = false;
    }

    /// Returns true if [`EntityNamespace::put_entity`] is allowed.
    #[must_use]
    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Number of defined entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if no entity is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over `(name, replacement)` pairs in arbitrary order.
    pub fn iter(&self) -> Iter<'_, String, String> {
        self.entities.iter()
    }

    /// Insert built-in definitions regardless of the mutability flag.
    fn extend_unchecked<const N: usize>(&mut self, entities: [(&str, &str); N]) {
        self.entities.extend(
            entities
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );
    }
}

impl Default for EntityNamespace {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones are always mutable, whatever the source.
impl Clone for EntityNamespace {
    fn clone(&self) -> Self {
        Self {
            entities: self.entities.clone(),
            mutable: true,
        }
    }
}

impl From<HashMap<String, String>> for EntityNamespace {
    fn from(entities: HashMap<String, String>) -> Self {
        Self {
            entities,
            mutable: true,
        }
    }
}

impl<'a> IntoIterator for &'a EntityNamespace {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
