//! Identity types for descriptor elements.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default URL prefix for type URLs, as used by `google.protobuf.Any`.
const DEFAULT_TYPE_URL_PREFIX: &str = "type.googleapis.com";

/// Fully-qualified name of a message or enum type.
///
/// A `TypeName` identifies a type across the whole descriptor set. For a
/// nested type the enclosing message names are recorded in
/// `nesting_type_names`, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeName {
    /// Unqualified name of the type (e.g. `Journey`).
    simple_name: String,
    /// Proto package the type is declared in; empty for the default package.
    package_name: String,
    /// Names of the enclosing messages, outermost first; empty for top-level types.
    nesting_type_names: Vec<String>,
    /// Prefix used when rendering a type URL.
    type_url_prefix: String,
}

impl TypeName {
    /// Create the name of a top-level type.
    pub fn new(package_name: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self::with_nesting(package_name, Vec::new(), simple_name)
    }

    /// Create the name of a type nested under the given enclosing messages.
    pub fn with_nesting(
        package_name: impl Into<String>,
        nesting_type_names: Vec<String>,
        simple_name: impl Into<String>,
    ) -> Self {
        Self {
            simple_name: simple_name.into(),
            package_name: package_name.into(),
            nesting_type_names,
            type_url_prefix: DEFAULT_TYPE_URL_PREFIX.to_string(),
        }
    }

    /// The name of a type nested directly under this one.
    pub fn nested(&self, simple_name: impl Into<String>) -> Self {
        let mut nesting = self.nesting_type_names.clone();
        nesting.push(self.simple_name.clone());
        Self::with_nesting(self.package_name.clone(), nesting, simple_name)
    }

    /// Unqualified name of the type.
    pub fn simple_name(&self) -> &str { &self.simple_name }

    /// Proto package the type is declared in.
    pub fn package_name(&self) -> &str { &self.package_name }

    /// Names of the enclosing messages, outermost first.
    pub fn nesting_type_names(&self) -> &[String] { &self.nesting_type_names }

    /// Prefix used when rendering a type URL.
    pub fn type_url_prefix(&self) -> &str { &self.type_url_prefix }

    /// Fully-qualified name: package, nesting messages, and simple name
    /// joined with dots. The package segment is omitted when empty.
    pub fn qualified_name(&self) -> String {
        let mut segments: Vec<&str> = Vec::new();
        if !self.package_name.is_empty() {
            segments.push(&self.package_name);
        }
        segments.extend(self.nesting_type_names.iter().map(String::as_str));
        segments.push(&self.simple_name);
        segments.join(".")
    }

    /// Type URL of this type, e.g. `type.googleapis.com/acme.travel.Journey`.
    pub fn type_url(&self) -> String {
        format!("{}/{}", self.type_url_prefix, self.qualified_name())
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

/// Name of a service declared in a proto file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceName {
    /// Unqualified service name.
    simple_name: String,
    /// Proto package the service is declared in.
    package_name: String,
}

impl ServiceName {
    /// Create a new service name.
    pub fn new(package_name: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self { simple_name: simple_name.into(), package_name: package_name.into() }
    }

    /// Unqualified service name.
    pub fn simple_name(&self) -> &str { &self.simple_name }

    /// Proto package the service is declared in.
    pub fn package_name(&self) -> &str { &self.package_name }

    /// Fully-qualified service name.
    pub fn qualified_name(&self) -> String {
        if self.package_name.is_empty() {
            self.simple_name.clone()
        } else {
            format!("{}.{}", self.package_name, self.simple_name)
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

/// Name of a field within a message type.
///
/// A field is identified by the pair of its declaring [`TypeName`] and its
/// `FieldName`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldName(String);

impl FieldName {
    /// Create a new field name.
    pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }

    /// The field name as declared in the proto file.
    pub fn value(&self) -> &str { &self.0 }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifies_top_level_names() {
        let name = TypeName::new("acme.travel", "Journey");
        assert_eq!(name.qualified_name(), "acme.travel.Journey");
        assert_eq!(name.type_url(), "type.googleapis.com/acme.travel.Journey");
    }

    #[test]
    fn omits_empty_package() {
        let name = TypeName::new("", "Journey");
        assert_eq!(name.qualified_name(), "Journey");
    }

    #[test]
    fn nests_under_enclosing_messages() {
        let outer = TypeName::new("acme.travel", "Journey");
        let inner = outer.nested("Leg");
        assert_eq!(inner.qualified_name(), "acme.travel.Journey.Leg");
        assert_eq!(inner.nesting_type_names(), ["Journey"]);

        let deeper = inner.nested("Stop");
        assert_eq!(deeper.qualified_name(), "acme.travel.Journey.Leg.Stop");
    }

    #[test]
    fn service_names_qualify() {
        let name = ServiceName::new("acme.travel", "Booking");
        assert_eq!(name.qualified_name(), "acme.travel.Booking");
        assert_eq!(ServiceName::new("", "Booking").qualified_name(), "Booking");
    }
}
