use std::fmt;

use super::{MalformedReason, ParseError, split_pairs};

const KIND: &str = "Azure Resource";

/// An ARM path of any shape, for callers that don't know the resource type
/// up front. Well-known keys are matched case-insensitively; everything after
/// the provider namespace is kept in order in [`AzureResourceId::path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AzureResourceId {
    pub subscription_id: String,
    pub resource_group: Option<String>,
    pub provider: Option<String>,
    pub path: Vec<(String, String)>,
}

impl AzureResourceId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let pairs = split_pairs(KIND, input)?;

        let mut subscription_id = None;
        let mut resource_group = None;
        let mut provider = None;
        let mut path: Vec<(String, String)> = Vec::new();

        for (key, value) in pairs {
            if value.is_empty() {
                return Err(ParseError::malformed(
                    KIND,
                    input,
                    MalformedReason::EmptyValue {
                        name: key.to_string(),
                    },
                ));
            }

            let slot = if key.eq_ignore_ascii_case("subscriptions") {
                Some(&mut subscription_id)
            } else if key.eq_ignore_ascii_case("resourceGroups") {
                Some(&mut resource_group)
            } else if key.eq_ignore_ascii_case("providers") {
                Some(&mut provider)
            } else {
                None
            };

            let duplicate = match slot {
                Some(slot) if slot.is_some() => true,
                Some(slot) => {
                    *slot = Some(value.to_string());
                    false
                }
                None if path.iter().any(|(k, _)| k == key) => true,
                None => {
                    path.push((key.to_string(), value.to_string()));
                    false
                }
            };

            if duplicate {
                return Err(ParseError::malformed(
                    KIND,
                    input,
                    MalformedReason::DuplicateKey {
                        key: key.to_string(),
                    },
                ));
            }
        }

        let subscription_id = subscription_id.ok_or_else(|| {
            ParseError::malformed(
                KIND,
                input,
                MalformedReason::MissingSegment {
                    key: "subscriptions",
                    name: "subscriptionId",
                },
            )
        })?;

        Ok(Self {
            subscription_id,
            resource_group,
            provider,
            path,
        })
    }

    /// Looks up a value in the resource path by key, ignoring case.
    pub fn path_value(&self, key: &str) -> Option<&str> {
        self.path
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Ordered `(key, value)` pairs in canonical order.
    pub fn segments(&self) -> Vec<(String, String)> {
        let mut segments = vec![("subscriptions".to_string(), self.subscription_id.clone())];
        if let Some(resource_group) = &self.resource_group {
            segments.push(("resourceGroups".to_string(), resource_group.clone()));
        }
        if let Some(provider) = &self.provider {
            segments.push(("providers".to_string(), provider.clone()));
        }
        segments.extend(self.path.iter().cloned());
        segments
    }

    pub fn id(&self) -> String {
        self.segments()
            .into_iter()
            .map(|(key, value)| format!("/{}/{}", key, value))
            .collect()
    }
}

impl fmt::Display for AzureResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}
