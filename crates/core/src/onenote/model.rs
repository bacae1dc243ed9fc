//! Domain model for notebooks, section groups and sections

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use super::validation::sanitize_identifier;
use crate::error::Result;

/// Classification of a container identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerKind {
    Notebook,
    SectionGroup,
    Section,
    /// The pattern tier could not classify the identifier
    Unknown,
    /// A kind name that does not denote any container
    Invalid,
}

impl ContainerKind {
    /// Kinds that denote real entities on the remote service
    pub fn is_resolved(self) -> bool {
        matches!(self, Self::Notebook | Self::SectionGroup | Self::Section)
    }

    /// Human readable label used in error messages
    pub fn label(self) -> &'static str {
        match self {
            Self::Notebook => "notebook",
            Self::SectionGroup => "section group",
            Self::Section => "section",
            Self::Unknown => "unknown container",
            Self::Invalid => "invalid container",
        }
    }

    /// Parse a kind name as used on the wire (`notebook`, `sectionGroup`, `section`).
    ///
    /// Matching is case-insensitive and also accepts `section_group` and
    /// `section-group`. Anything else yields `Invalid`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "notebook" => Self::Notebook,
            "sectiongroup" | "section_group" | "section-group" => Self::SectionGroup,
            "section" => Self::Section,
            "unknown" => Self::Unknown,
            _ => Self::Invalid,
        }
    }
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A sanitized, non-empty container identifier.
///
/// Only obtainable through [`ContainerId::parse`], so holding one means the
/// value is safe to interpolate into a request path once encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    /// Sanitize `raw` and wrap it. `field` names the argument in error messages.
    pub fn parse(raw: &str, field: &str) -> Result<Self> {
        sanitize_identifier(raw, field).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form for path interpolation
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a parent container, projected down to id and name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub id: String,
    pub display_name: Option<String>,
}

/// The single parent of a section or section group
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Parent {
    #[default]
    None,
    Notebook(ParentRef),
    SectionGroup(ParentRef),
}

impl Parent {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn kind(&self) -> Option<ContainerKind> {
        match self {
            Self::None => None,
            Self::Notebook(_) => Some(ContainerKind::Notebook),
            Self::SectionGroup(_) => Some(ContainerKind::SectionGroup),
        }
    }

    pub fn reference(&self) -> Option<&ParentRef> {
        match self {
            Self::None => None,
            Self::Notebook(r) | Self::SectionGroup(r) => Some(r),
        }
    }

    /// Build the parent for a container of the given kind.
    ///
    /// Sections and unresolved kinds cannot be parents, so they map to `None`.
    pub fn from_container(kind: ContainerKind, reference: ParentRef) -> Self {
        match kind {
            ContainerKind::Notebook => Self::Notebook(reference),
            ContainerKind::SectionGroup => Self::SectionGroup(reference),
            _ => Self::None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParentView<'a> {
    kind: ContainerKind,
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
}

impl Serialize for Parent {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match (self.kind(), self.reference()) {
            (Some(kind), Some(reference)) => ParentView {
                kind,
                id: &reference.id,
                display_name: reference.display_name.as_deref(),
            }
            .serialize(serializer),
            _ => serializer.serialize_none(),
        }
    }
}

/// Child collections an entity may link to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChildCollection {
    Sections,
    SectionGroups,
    Pages,
}

/// Normalized representation of a listed or created entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    pub id: String,
    pub display_name: String,
    pub kind: ContainerKind,
    #[serde(skip_serializing_if = "Parent::is_none")]
    pub parent: Parent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub child_collection_refs: BTreeMap<ChildCollection, String>,
    /// Verbatim source payload, kept only by the full-preserve projection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

/// A section group together with everything nested below it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionGroupNode {
    #[serde(flatten)]
    pub record: CanonicalRecord,
    pub sections: Vec<CanonicalRecord>,
    pub section_groups: Vec<SectionGroupNode>,
}
