//! Query parameter assembly and the precedence rules shared by most endpoints.
//!
//! # Design
//! Almost every pCloud method addresses its target through one of several
//! optional identifiers, e.g. `fileid` or `path`, and many take a destination
//! made of `tofolderid`, `topath` and `toname` in endpoint-specific
//! combinations. `Locator` and `Destination` carry those optional fields and
//! know how to validate and flatten themselves into a `Params` map, so the
//! endpoint wrappers only have to name their keys and rule.
//!
//! Validation never needs the network: every failure here is an
//! `ApiError::InvalidArgument` raised before the request exists.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::error::ApiError;

/// Flat, sorted query parameter set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Display) {
        self.0.insert(key.to_string(), value.to_string());
    }

    /// Inserts `value` only when present.
    pub fn opt<V: Display>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Boolean flags are sent as `1` when set and omitted otherwise.
    pub fn flag(&mut self, key: &str, on: bool) {
        if on {
            self.insert(key, 1);
        }
    }

    /// Comma-joined list; omitted when empty.
    pub fn list<V: Display>(&mut self, key: &str, values: &[V]) {
        if !values.is_empty() {
            self.insert(key, join(values));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend(&mut self, other: Params) {
        self.0.extend(other.0);
    }
}

/// Joins values with commas, the list encoding pCloud expects.
pub fn join<V: Display>(values: &[V]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Rejects an empty required string.
pub fn require_str<'a>(name: &str, value: &'a str) -> Result<&'a str, ApiError> {
    if value.is_empty() {
        return Err(ApiError::invalid(format!("parameter '{name}' is required")));
    }
    Ok(value)
}

/// Rejects a zero required id.
pub fn require_id(name: &str, value: u64) -> Result<u64, ApiError> {
    if value == 0 {
        return Err(ApiError::invalid(format!("parameter '{name}' is required")));
    }
    Ok(value)
}

/// Rejects an empty required list.
pub fn require_list<'a, V>(name: &str, values: &'a [V]) -> Result<&'a [V], ApiError> {
    if values.is_empty() {
        return Err(ApiError::invalid(format!("parameter '{name}' is required")));
    }
    Ok(values)
}

/// Sends the first present alternative, in the order given.
///
/// Fails when none of them is present.
pub fn one_of(params: &mut Params, alternatives: &[(&str, Option<String>)]) -> Result<(), ApiError> {
    for (key, value) in alternatives {
        if let Some(value) = value {
            params.insert(key, value);
            return Ok(());
        }
    }
    let names = alternatives
        .iter()
        .map(|(k, _)| format!("'{k}'"))
        .collect::<Vec<_>>()
        .join(" or ");
    Err(ApiError::invalid(format!("either {names} must be provided")))
}

/// An id-or-path pair. The id wins when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locator {
    pub id: Option<u64>,
    pub path: Option<String>,
}

impl Locator {
    pub fn by_id(id: u64) -> Self {
        Self {
            id: Some(id),
            path: None,
        }
    }

    pub fn by_path(path: impl Into<String>) -> Self {
        Self {
            id: None,
            path: Some(path.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.path.is_none()
    }

    /// Writes the id under `id_key`, or else the path under `alt_key`.
    pub fn apply(&self, params: &mut Params, id_key: &str, alt_key: &str) -> Result<(), ApiError> {
        one_of(
            params,
            &[
                (id_key, self.id.map(|id| id.to_string())),
                (alt_key, self.path.clone()),
            ],
        )
    }

    /// Like `apply`, but an empty locator sends nothing.
    pub fn apply_optional(&self, params: &mut Params, id_key: &str, alt_key: &str) {
        if let Some(id) = self.id {
            params.insert(id_key, id);
        } else if let Some(path) = &self.path {
            params.insert(alt_key, path);
        }
    }
}

impl From<u64> for Locator {
    fn from(id: u64) -> Self {
        Locator::by_id(id)
    }
}

impl From<&str> for Locator {
    fn from(path: &str) -> Self {
        Locator::by_path(path)
    }
}

impl From<String> for Locator {
    fn from(path: String) -> Self {
        Locator::by_path(path)
    }
}

/// Which destination fields an endpoint requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationRule {
    /// `topath`, or both `tofolderid` and `toname`.
    PathOrFolderAndName,
    /// `topath` or `tofolderid`.
    PathOrFolder,
    /// At least one of `topath`, `tofolderid`, `toname`.
    AnyOf,
    /// Nothing is required.
    Optional,
}

/// Target of a copy, move, save, or extract.
///
/// Every present field is sent; the rule only decides whether the
/// combination is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destination {
    pub tofolderid: Option<u64>,
    pub topath: Option<String>,
    pub toname: Option<String>,
}

impl Destination {
    pub fn path(topath: impl Into<String>) -> Self {
        Self {
            topath: Some(topath.into()),
            ..Self::default()
        }
    }

    pub fn folder(tofolderid: u64) -> Self {
        Self {
            tofolderid: Some(tofolderid),
            ..Self::default()
        }
    }

    pub fn name(toname: impl Into<String>) -> Self {
        Self {
            toname: Some(toname.into()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, toname: impl Into<String>) -> Self {
        self.toname = Some(toname.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tofolderid.is_none() && self.topath.is_none() && self.toname.is_none()
    }

    pub fn validate(&self, rule: DestinationRule) -> Result<(), ApiError> {
        let (ok, msg) = match rule {
            DestinationRule::PathOrFolderAndName => (
                self.topath.is_some() || (self.tofolderid.is_some() && self.toname.is_some()),
                "either 'topath' or both 'tofolderid' and 'toname' must be provided",
            ),
            DestinationRule::PathOrFolder => (
                self.topath.is_some() || self.tofolderid.is_some(),
                "either 'tofolderid' or 'topath' must be provided",
            ),
            DestinationRule::AnyOf => (
                !self.is_empty(),
                "at least one of 'topath', 'tofolderid' or 'toname' must be provided",
            ),
            DestinationRule::Optional => return Ok(()),
        };
        if ok {
            Ok(())
        } else {
            Err(ApiError::invalid(msg))
        }
    }

    pub fn apply(&self, params: &mut Params, rule: DestinationRule) -> Result<(), ApiError> {
        self.validate(rule)?;
        params.opt("tofolderid", self.tofolderid);
        params.opt("topath", self.topath.as_deref());
        params.opt("toname", self.toname.as_deref());
        Ok(())
    }
}
