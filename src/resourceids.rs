//! Azure Resource Manager resource identifiers.
//!
//! Every typed id is described by a static [`Schema`]: the ordered list of
//! key/value segments that make up its ARM path. Parsing walks the schema
//! positionally, so `/subscriptions/{a}/resourceGroups/{b}` only matches a
//! schema whose first two keys are `subscriptions` and `resourceGroups`.

mod azure;
mod ids;

pub use azure::AzureResourceId;
pub use ids::{
    CloudHsmClusterId, DeletedConfigurationStoreId, ExperimentId, ResourceGroupId, VaultId,
};

use thiserror::Error;

/// One key/value pair in an ARM path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Canonical key as rendered by `id()`, e.g. `resourceGroups`.
    pub key: &'static str,
    /// Field name used in error messages, e.g. `resourceGroupName`.
    pub name: &'static str,
    /// Set for segments whose value is part of the type, e.g. `Microsoft.KeyVault`.
    pub fixed: Option<&'static str>,
}

impl Segment {
    pub const fn user(key: &'static str, name: &'static str) -> Self {
        Self {
            key,
            name,
            fixed: None,
        }
    }

    pub const fn provider(namespace: &'static str) -> Self {
        Self {
            key: "providers",
            name: "resourceProvider",
            fixed: Some(namespace),
        }
    }
}

pub const SUBSCRIPTION: Segment = Segment::user("subscriptions", "subscriptionId");
pub const RESOURCE_GROUP: Segment = Segment::user("resourceGroups", "resourceGroupName");

#[derive(Debug)]
pub struct Schema {
    /// Human-readable type name used in errors, e.g. "Key Vault".
    pub description: &'static str,
    pub segments: &'static [Segment],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    /// Keys and fixed values must use the schema's exact casing.
    Strict,
    /// Keys and fixed values are compared with ASCII case folding.
    Insensitive,
}

impl Casing {
    fn matches(self, found: &str, expected: &str) -> bool {
        match self {
            Casing::Strict => found == expected,
            Casing::Insensitive => found.eq_ignore_ascii_case(expected),
        }
    }
}

/// Why an input string could not be parsed into a resource id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("the id was empty")]
    Empty,
    #[error("the id contained no segments")]
    NoSegments,
    #[error("expected key/value pairs but found {count} path components")]
    IncompleteSegment { count: usize },
    #[error("the segment `{key}` for {name} was missing")]
    MissingSegment {
        key: &'static str,
        name: &'static str,
    },
    #[error("the value for {name} was empty")]
    EmptyValue { name: String },
    #[error("the value {value:?} for {name} contained `/`")]
    SeparatorInValue { name: String, value: String },
    #[error("expected `{key}/{expected}` but found `{key}/{found}`")]
    UnexpectedValue {
        key: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error("unexpected trailing segments `{trailing}`")]
    TrailingSegments { trailing: String },
    #[error("the key `{key}` appeared more than once")]
    DuplicateKey { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("parsing {kind} id {input:?}: {reason}")]
    MalformedId {
        kind: &'static str,
        input: String,
        reason: MalformedReason,
    },
}

impl ParseError {
    pub(crate) fn malformed(kind: &'static str, input: &str, reason: MalformedReason) -> Self {
        ParseError::MalformedId {
            kind,
            input: input.to_string(),
            reason,
        }
    }

    pub fn reason(&self) -> &MalformedReason {
        match self {
            ParseError::MalformedId { reason, .. } => reason,
        }
    }
}

/// Splits an ARM path into `(key, value)` pairs.
///
/// A single leading `/` is optional. An odd number of components means a key
/// without its value and is rejected here, before any schema is consulted.
pub(crate) fn split_pairs<'a>(
    kind: &'static str,
    input: &'a str,
) -> Result<Vec<(&'a str, &'a str)>, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::malformed(kind, input, MalformedReason::Empty));
    }

    let path = input.strip_prefix('/').unwrap_or(input);
    if path.is_empty() {
        return Err(ParseError::malformed(kind, input, MalformedReason::NoSegments));
    }

    let components: Vec<&str> = path.split('/').collect();
    if components.len() % 2 != 0 {
        return Err(ParseError::malformed(
            kind,
            input,
            MalformedReason::IncompleteSegment {
                count: components.len(),
            },
        ));
    }

    Ok(components
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect())
}

/// Matches `input` against `schema` and returns the user-specified values in
/// schema order. Fixed segments are validated but not returned.
pub(crate) fn parse_values(
    schema: &Schema,
    input: &str,
    casing: Casing,
) -> Result<Vec<String>, ParseError> {
    let kind = schema.description;
    let pairs = split_pairs(kind, input)?;
    let mut values = Vec::with_capacity(schema.segments.len());

    for (index, segment) in schema.segments.iter().enumerate() {
        let missing = || {
            ParseError::malformed(
                kind,
                input,
                MalformedReason::MissingSegment {
                    key: segment.key,
                    name: segment.name,
                },
            )
        };

        let (key, value) = pairs.get(index).copied().ok_or_else(missing)?;
        if !casing.matches(key, segment.key) {
            return Err(missing());
        }

        if value.is_empty() {
            return Err(ParseError::malformed(
                kind,
                input,
                MalformedReason::EmptyValue {
                    name: segment.name.to_string(),
                },
            ));
        }

        match segment.fixed {
            Some(expected) if !casing.matches(value, expected) => {
                return Err(ParseError::malformed(
                    kind,
                    input,
                    MalformedReason::UnexpectedValue {
                        key: segment.key,
                        expected,
                        found: value.to_string(),
                    },
                ));
            }
            Some(_) => {}
            None => values.push(value.to_string()),
        }
    }

    if pairs.len() > schema.segments.len() {
        let trailing = pairs[schema.segments.len()..]
            .iter()
            .map(|(k, v)| format!("{}/{}", k, v))
            .collect::<Vec<_>>()
            .join("/");
        return Err(ParseError::malformed(
            kind,
            input,
            MalformedReason::TrailingSegments { trailing },
        ));
    }

    Ok(values)
}

/// Renders the canonical path for `schema` from its user-specified values.
pub(crate) fn render(schema: &Schema, values: &[&str]) -> String {
    let mut values = values.iter();
    let mut out = String::new();
    for segment in schema.segments {
        let value = match segment.fixed {
            Some(fixed) => fixed,
            None => values.next().copied().unwrap_or_default(),
        };
        out.push('/');
        out.push_str(segment.key);
        out.push('/');
        out.push_str(value);
    }
    out
}

/// A typed ARM resource identifier.
///
/// Implementors supply the schema and the mapping to and from their fields;
/// parsing and rendering come from the provided methods so that
/// `T::parse(&id.id()) == Ok(id)` holds for every type.
pub trait ResourceId: Sized {
    fn schema() -> &'static Schema;

    /// Builds the id from user-specified values in schema order.
    fn from_values(values: Vec<String>) -> Self;

    /// User-specified values in schema order.
    fn values(&self) -> Vec<&str>;

    /// Parses `input`, requiring the canonical casing for keys.
    fn parse(input: &str) -> Result<Self, ParseError> {
        parse_values(Self::schema(), input, Casing::Strict).map(Self::from_values)
    }

    /// Parses `input`, matching keys and fixed values case-insensitively.
    /// User-specified values keep the casing they were given in.
    fn parse_insensitively(input: &str) -> Result<Self, ParseError> {
        parse_values(Self::schema(), input, Casing::Insensitive).map(Self::from_values)
    }

    fn id(&self) -> String {
        render(Self::schema(), &self.values())
    }

    /// Checks values supplied through a constructor rather than `parse`.
    /// Each must be non-empty and free of `/` for `parse(&self.id())` to
    /// return `self`.
    fn validate(&self) -> Result<(), ParseError> {
        let schema = Self::schema();
        let names = schema
            .segments
            .iter()
            .filter(|segment| segment.fixed.is_none())
            .map(|segment| segment.name);

        for (name, value) in names.zip(self.values()) {
            let reason = if value.is_empty() {
                MalformedReason::EmptyValue {
                    name: name.to_string(),
                }
            } else if value.contains('/') {
                MalformedReason::SeparatorInValue {
                    name: name.to_string(),
                    value: value.to_string(),
                }
            } else {
                continue;
            };
            return Err(ParseError::malformed(schema.description, &self.id(), reason));
        }
        Ok(())
    }

    /// Ordered `(key, value)` pairs, fixed segments included.
    fn segments(&self) -> Vec<(&'static str, String)> {
        let values = self.values();
        let mut values = values.into_iter();
        Self::schema()
            .segments
            .iter()
            .map(|segment| {
                let value = match segment.fixed {
                    Some(fixed) => fixed.to_string(),
                    None => values.next().unwrap_or_default().to_string(),
                };
                (segment.key, value)
            })
            .collect()
    }
}
