// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use crate::Error;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr, sync::LazyLock};

static GLOBAL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2})?([0-9]+)$").expect("global id pattern is valid"));

/// Two-letter prefix of an RSpace global id, such as `IC` in `IC123`.
///
/// The prefix determines the role of the item it is attached to. Prefixes
/// are always two ASCII uppercase letters; unknown prefixes (for example
/// ELN document prefixes) are preserved but map to no inventory role.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlobalIdPrefix([u8; 2]);

impl GlobalIdPrefix {
    /// Inventory container.
    pub const CONTAINER: Self = Self(*b"IC");
    /// Subsample of a sample.
    pub const SUBSAMPLE: Self = Self(*b"SS");
    /// Sample.
    pub const SAMPLE: Self = Self(*b"SA");
    /// Sample template.
    pub const TEMPLATE: Self = Self(*b"IT");
    /// A user's workbench.
    pub const BENCH: Self = Self(*b"BE");

    fn parse(s: &str) -> Option<Self> {
        match s.as_bytes() {
            [a, b] if a.is_ascii_uppercase() && b.is_ascii_uppercase() => Some(Self([*a, *b])),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        // Only ever constructed from two ASCII uppercase letters.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl Display for GlobalIdPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of inventory entity an identifier refers to.
///
/// The serialized form is the record type tag expected by the bulk API.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "CONTAINER")]
    Container,
    #[serde(rename = "SUBSAMPLE")]
    Subsample,
    #[serde(rename = "SAMPLE")]
    Sample,
    #[serde(rename = "SAMPLE_TEMPLATE")]
    Template,
}

impl Role {
    /// Record type tag used in bulk requests.
    pub fn tag(&self) -> &'static str {
        match self {
            Role::Container => "CONTAINER",
            Role::Subsample => "SUBSAMPLE",
            Role::Sample => "SAMPLE",
            Role::Template => "SAMPLE_TEMPLATE",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One accepted input shape for building an [`Id`].
///
/// Callers rarely build this directly; the `From`/`TryFrom` conversions on
/// [`Id`] select the matching arm.
#[derive(Clone, Copy, Debug)]
pub enum IdSource<'a> {
    /// A bare numeric id. Negative values are rejected.
    Numeric(i64),
    /// A numeric string (`"1234"`) or a global id (`"SS1234"`).
    Text(&'a str),
    /// An object exposing an id and optionally a global id.
    Record {
        id: Option<i64>,
        global_id: Option<&'a str>,
    },
}

/// Identifier of an inventory item, optionally tagged with its role prefix.
///
/// Two identifiers are equal when their numeric ids match and either both
/// lack a prefix or both prefixes match.
///
/// # Examples
///
/// ```rust
/// use rspace_client::Id;
///
/// let subsample: Id = "SS1234".parse().unwrap();
/// assert_eq!(subsample.value(), 1234);
/// assert!(subsample.is_subsample(false));
///
/// // Bare numbers carry no role, so they only pass "maybe" checks.
/// let bare = Id::from(1234);
/// assert!(!bare.is_subsample(false));
/// assert!(bare.is_subsample(true));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Id {
    id: u64,
    prefix: Option<GlobalIdPrefix>,
}

impl Id {
    /// Builds an identifier from any accepted input shape.
    pub fn parse(source: IdSource<'_>) -> Result<Self, Error> {
        match source {
            IdSource::Numeric(value) => Ok(Id {
                id: non_negative(value)?,
                prefix: None,
            }),
            IdSource::Text(text) => {
                let captures = GLOBAL_ID.captures(text).ok_or_else(|| {
                    Error::InvalidIdentifier(format!("'{}' is not a valid id or global id", text))
                })?;
                let id = captures[2].parse::<u64>().map_err(|_| {
                    Error::InvalidIdentifier(format!("'{}' has an out of range id", text))
                })?;
                let prefix = captures
                    .get(1)
                    .and_then(|prefix| GlobalIdPrefix::parse(prefix.as_str()));
                Ok(Id { id, prefix })
            }
            IdSource::Record { id, global_id } => {
                let id = id.ok_or_else(|| {
                    Error::InvalidIdentifier("object does not carry an 'id'".to_string())
                })?;
                let id = non_negative(id)?;
                let prefix = match global_id {
                    Some(global_id) => Some(
                        global_id
                            .get(0..2)
                            .and_then(GlobalIdPrefix::parse)
                            .ok_or_else(|| {
                                Error::InvalidIdentifier(format!(
                                    "'{}' does not start with a two letter prefix",
                                    global_id
                                ))
                            })?,
                    ),
                    None => None,
                };
                Ok(Id { id, prefix })
            }
        }
    }

    /// Builds a prefixed identifier.
    pub fn with_prefix(id: u64, prefix: GlobalIdPrefix) -> Self {
        Id {
            id,
            prefix: Some(prefix),
        }
    }

    /// Numeric id used in API paths and request bodies.
    pub fn value(&self) -> u64 {
        self.id
    }

    pub fn prefix(&self) -> Option<GlobalIdPrefix> {
        self.prefix
    }

    /// The global id (`SS1234`), if the prefix is known.
    pub fn global_id(&self) -> Option<String> {
        self.prefix.map(|prefix| format!("{}{}", prefix, self.id))
    }

    pub fn is_container(&self, maybe: bool) -> bool {
        self.check(GlobalIdPrefix::CONTAINER, maybe)
    }

    pub fn is_subsample(&self, maybe: bool) -> bool {
        self.check(GlobalIdPrefix::SUBSAMPLE, maybe)
    }

    pub fn is_sample(&self, maybe: bool) -> bool {
        self.check(GlobalIdPrefix::SAMPLE, maybe)
    }

    pub fn is_template(&self, maybe: bool) -> bool {
        self.check(GlobalIdPrefix::TEMPLATE, maybe)
    }

    pub fn is_bench(&self, maybe: bool) -> bool {
        self.check(GlobalIdPrefix::BENCH, maybe)
    }

    /// Whether the item can be moved into a container.
    ///
    /// Only subsamples and containers are movable; samples and templates
    /// never are. With `maybe = true` an unprefixed id passes, since its
    /// role cannot be known locally.
    pub fn is_movable(&self, maybe: bool) -> bool {
        self.is_subsample(maybe) || self.is_container(maybe)
    }

    /// Maps the prefix to the inventory role it denotes.
    ///
    /// Workbenches are containers for the purposes of the bulk API.
    pub fn role(&self) -> Result<Role, Error> {
        match self.prefix {
            Some(GlobalIdPrefix::CONTAINER) | Some(GlobalIdPrefix::BENCH) => Ok(Role::Container),
            Some(GlobalIdPrefix::SUBSAMPLE) => Ok(Role::Subsample),
            Some(GlobalIdPrefix::SAMPLE) => Ok(Role::Sample),
            Some(GlobalIdPrefix::TEMPLATE) => Ok(Role::Template),
            Some(prefix) => Err(Error::InvalidIdentifier(format!(
                "'{}' is not an inventory prefix",
                prefix
            ))),
            None => Err(Error::InvalidIdentifier(format!(
                "{} has no prefix, role is unknown",
                self.id
            ))),
        }
    }

    fn check(&self, prefix: GlobalIdPrefix, maybe: bool) -> bool {
        match self.prefix {
            Some(p) => p == prefix,
            None => maybe,
        }
    }
}

fn non_negative(value: i64) -> Result<u64, Error> {
    u64::try_from(value)
        .map_err(|_| Error::InvalidIdentifier(format!("{} is not a valid id", value)))
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.prefix {
            Some(prefix) => write!(f, "{}{}", prefix, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

impl From<u64> for Id {
    fn from(id: u64) -> Self {
        Id { id, prefix: None }
    }
}

impl From<Id> for u64 {
    fn from(val: Id) -> Self {
        val.id
    }
}

impl TryFrom<i64> for Id {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Id::parse(IdSource::Numeric(value))
    }
}

impl TryFrom<&str> for Id {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Id::parse(IdSource::Text(s))
    }
}

impl TryFrom<String> for Id {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Id::parse(IdSource::Text(&s))
    }
}

impl FromStr for Id {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Id::parse(IdSource::Text(s))
    }
}

impl TryFrom<&serde_json::Value> for Id {
    type Error = Error;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Number(n) => {
                let n = n.as_i64().ok_or_else(|| {
                    Error::InvalidIdentifier(format!("{} is not an integer id", n))
                })?;
                Id::parse(IdSource::Numeric(n))
            }
            serde_json::Value::String(s) => Id::parse(IdSource::Text(s)),
            serde_json::Value::Object(map) => Id::parse(IdSource::Record {
                id: map.get("id").and_then(serde_json::Value::as_i64),
                global_id: map.get("globalId").and_then(serde_json::Value::as_str),
            }),
            other => Err(Error::InvalidIdentifier(format!(
                "cannot read an id from {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_from_numeric_and_text() {
        let id = Id::from(1234);
        assert_eq!(id.value(), 1234);
        assert_eq!(id.prefix(), None);

        let id = Id::try_from("SA1235").unwrap();
        assert_eq!(id.value(), 1235);
        assert_eq!(id.prefix(), Some(GlobalIdPrefix::SAMPLE));
        assert_eq!(id.prefix().unwrap().as_str(), "SA");

        let id: Id = "2234".parse().unwrap();
        assert_eq!(id.value(), 2234);
        assert_eq!(id.prefix(), None);
    }

    #[test]
    fn test_id_rejects_malformed_text() {
        for bad in ["!!!!", "", "SS", "ss12", "S12", "SSS12", "SS12x", "12SS", "SS-1"] {
            match Id::try_from(bad) {
                Err(Error::InvalidIdentifier(_)) => {}
                other => panic!("expected InvalidIdentifier for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_id_rejects_negative() {
        assert!(matches!(
            Id::try_from(-1i64),
            Err(Error::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_id_from_record() {
        let id = Id::try_from(&json!({"id": 1234, "globalId": "SA1234"})).unwrap();
        assert_eq!(id.value(), 1234);
        assert_eq!(id.prefix(), Some(GlobalIdPrefix::SAMPLE));

        let id = Id::try_from(&json!({"id": 77})).unwrap();
        assert_eq!(id, Id::from(77));

        let result = Id::try_from(&json!({"x_not_an_id": 23}));
        assert!(matches!(result, Err(Error::InvalidIdentifier(_))));

        let result = Id::try_from(&json!({"id": 5, "globalId": "5"}));
        assert!(matches!(result, Err(Error::InvalidIdentifier(_))));

        let result = Id::try_from(&json!([1, 2]));
        assert!(matches!(result, Err(Error::InvalidIdentifier(_))));
    }

    #[test]
    fn test_id_from_json_scalars() {
        assert_eq!(Id::try_from(&json!(12)).unwrap(), Id::from(12));
        assert_eq!(
            Id::try_from(&json!("IC12")).unwrap(),
            Id::with_prefix(12, GlobalIdPrefix::CONTAINER)
        );
        assert!(Id::try_from(&json!(1.5)).is_err());
    }

    #[test]
    fn test_id_equality() {
        let ss = Id::try_from("SS10").unwrap();
        assert_eq!(ss, Id::with_prefix(10, GlobalIdPrefix::SUBSAMPLE));
        assert_ne!(ss, Id::try_from("IC10").unwrap());
        assert_ne!(ss, Id::from(10));
        assert_eq!(Id::from(10), Id::try_from("10").unwrap());
    }

    #[test]
    fn test_role_checks_exact() {
        let ic = Id::try_from("IC1").unwrap();
        assert!(ic.is_container(false));
        assert!(ic.is_container(true));
        assert!(!ic.is_subsample(false));
        assert!(!ic.is_subsample(true));
        assert!(ic.is_movable(false));

        let sa = Id::try_from("SA1").unwrap();
        assert!(sa.is_sample(false));
        assert!(!sa.is_movable(false));
        assert!(!sa.is_movable(true));

        let it = Id::try_from("IT1").unwrap();
        assert!(it.is_template(false));
        assert!(!it.is_movable(true));

        let be = Id::try_from("BE1").unwrap();
        assert!(be.is_bench(false));
        assert!(!be.is_container(true));
    }

    #[test]
    fn test_role_checks_maybe() {
        let bare = Id::from(5);
        assert!(!bare.is_container(false));
        assert!(bare.is_container(true));
        assert!(bare.is_sample(true));
        assert!(!bare.is_movable(false));
        assert!(bare.is_movable(true));
    }

    #[test]
    fn test_role() {
        assert_eq!(Id::try_from("IC1").unwrap().role().unwrap(), Role::Container);
        assert_eq!(Id::try_from("BE1").unwrap().role().unwrap(), Role::Container);
        assert_eq!(Id::try_from("SS1").unwrap().role().unwrap(), Role::Subsample);
        assert_eq!(Id::try_from("SA1").unwrap().role().unwrap(), Role::Sample);
        assert_eq!(Id::try_from("IT1").unwrap().role().unwrap(), Role::Template);
        assert!(Id::from(1).role().is_err());
        assert!(Id::try_from("SD1").unwrap().role().is_err());
        assert_eq!(Role::Template.tag(), "SAMPLE_TEMPLATE");
        assert_eq!(
            serde_json::to_string(&Role::Subsample).unwrap(),
            "\"SUBSAMPLE\""
        );
    }

    #[test]
    fn test_display_and_global_id() {
        let id = Id::try_from("SS45").unwrap();
        assert_eq!(id.to_string(), "SS45");
        assert_eq!(id.global_id().as_deref(), Some("SS45"));
        assert_eq!(Id::from(45).to_string(), "45");
        assert_eq!(Id::from(45).global_id(), None);
    }
}
