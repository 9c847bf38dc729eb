//! Structured references to resources hosted on a Stratus cluster.
//!
//! References use the compact `[owner/][name/][id][:revision]` syntax and
//! translate into `key=value` filter expressions for the cluster API.
use std::str::FromStr;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as Json;

/// Shape of cluster-generated resource IDs: 2 hex chars, a dash, 32 hex chars.
///
/// Anchored at the start only so IDs with trailing qualifiers still match.
static ID_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-f0-9]{2}-[a-f0-9]{32}").expect("ID_SHAPE regex to compile")
});

/// Prefix the cluster assigns to project IDs.
const PROJECT_ID_PREFIX: &str = "a0-";

/// Field value leaving a filter unconstrained.
const WILDCARD: &str = "*";

/// Structured reference to a cluster resource.
///
/// Fields are plain strings with the empty string meaning "unspecified".
/// The `*` wildcard also leaves a field unconstrained when building filters
/// but stays distinct from "unspecified" when formatting a reference back.
#[derive(Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Identifier {
    /// Resource name, the last path segment before the ID.
    pub name: String,

    /// Owning user of the resource.
    pub owner: String,

    /// Cluster-generated resource ID.
    pub id: String,

    /// Revision qualifier, from a trailing `:revision` suffix.
    pub revision: String,
}

impl Identifier {
    /// Lift an identifier out of an API record.
    ///
    /// The record must carry `name`, `owner` and `id` fields; `revision` is
    /// optional and can be suppressed with `ignore_revision`.
    pub fn from_record(record: &Json, ignore_revision: bool) -> Result<Identifier> {
        let name = record_field(record, "name")?;
        let owner = record_field(record, "owner")?;
        let id = record_field(record, "id")?;
        let revision = match ignore_revision {
            true => String::new(),
            false => record
                .get("revision")
                .and_then(Json::as_str)
                .unwrap_or("")
                .to_string(),
        };
        Ok(Identifier {
            name,
            owner,
            id,
            revision,
        })
    }

    /// Filter expression selecting the referenced resource, if any field constrains it.
    ///
    /// Contributing fields are joined as comma-separated `key=value` pairs.
    /// When filtering session records (`session` set) a project-shaped ID is
    /// keyed as `project_id` so sessions can be looked up by their project.
    /// A fully unspecified or fully wildcard reference yields `None`, which
    /// callers interpret as "match everything".
    pub fn project_filter(&self, session: bool) -> Option<String> {
        let mut parts = Vec::new();
        if constrains(&self.name) {
            parts.push(format!("name={}", self.name));
        }
        if constrains(&self.owner) {
            parts.push(format!("owner={}", self.owner));
        }
        if constrains(&self.id) {
            let key = match session && self.id.starts_with(PROJECT_ID_PREFIX) {
                true => "project_id",
                false => "id",
            };
            parts.push(format!("{}={}", key, self.id));
        }
        match parts.is_empty() {
            true => None,
            false => Some(parts.join(",")),
        }
    }

    /// Filter expression selecting the referenced revision, if one is named.
    pub fn revision_filter(&self) -> Option<String> {
        match constrains(&self.revision) {
            true => Some(format!("name={}", self.revision)),
            false => None,
        }
    }

    /// Canonical string form of the reference.
    ///
    /// The most specific unambiguous form is reconstructed: `*` placeholders
    /// are only inserted where a more specific field needs the position.
    /// This is the reverse of parsing and round-trips any reference built
    /// by [`Identifier::from_str`].
    pub fn display(&self, drop_revision: bool) -> String {
        let mut result = if !self.id.is_empty() {
            if !self.owner.is_empty() || !self.name.is_empty() {
                format!(
                    "{}/{}/{}",
                    or_wildcard(&self.owner),
                    or_wildcard(&self.name),
                    self.id,
                )
            } else {
                self.id.clone()
            }
        } else if !self.owner.is_empty() {
            format!("{}/{}", self.owner, or_wildcard(&self.name))
        } else {
            self.name.clone()
        };
        if !self.revision.is_empty() && !drop_revision {
            result = format!("{}:{}", result, self.revision);
        }
        result
    }
}

impl FromStr for Identifier {
    type Err = InvalidIdentifier;

    fn from_str(value: &str) -> Result<Identifier, InvalidIdentifier> {
        // A revision suffix splits at the last colon; the prefix is the id path.
        let (path, revision) = match value.rsplit_once(':') {
            Some((path, revision)) => (path, revision),
            None => (value, ""),
        };
        let mut segments: Vec<&str> = path.split('/').collect();

        // The last segment is an ID when three segments spell it out explicitly
        // or when it is shaped like a cluster-generated ID.
        let has_id = segments.len() == 3
            || segments
                .last()
                .map(|segment| ID_SHAPE.is_match(segment))
                .unwrap_or(false);
        let id = match has_id {
            true => segments.pop().unwrap_or(""),
            false => "",
        };
        let name = segments.pop().unwrap_or("");
        let owner = segments.pop().unwrap_or("");
        if !segments.is_empty() {
            return Err(InvalidIdentifier::for_reference(value));
        }
        Ok(Identifier {
            name: name.to_string(),
            owner: owner.to_string(),
            id: id.to_string(),
            revision: revision.to_string(),
        })
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display(false))
    }
}

/// Error parsing an over-specified or malformed resource reference.
#[derive(thiserror::Error, Debug)]
#[error("invalid resource identifier '{identifier}'")]
pub struct InvalidIdentifier {
    identifier: String,
}

impl InvalidIdentifier {
    /// Create a parse error carrying the offending reference verbatim.
    pub fn for_reference<S>(identifier: S) -> InvalidIdentifier
    where
        S: Into<String>,
    {
        let identifier = identifier.into();
        InvalidIdentifier { identifier }
    }

    /// The reference that failed to parse.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// True when the field is set and not the `*` wildcard.
fn constrains(field: &str) -> bool {
    !field.is_empty() && field != WILDCARD
}

/// The field itself, or the `*` placeholder when unspecified.
fn or_wildcard(field: &str) -> &str {
    match field.is_empty() {
        true => WILDCARD,
        false => field,
    }
}

/// Extract a required string field from an API record.
fn record_field(record: &Json, field: &'static str) -> Result<String> {
    record
        .get(field)
        .and_then(Json::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| anyhow::anyhow!("record does not carry a '{}' field", field))
}
