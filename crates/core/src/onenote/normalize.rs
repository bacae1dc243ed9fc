//! Pure transformation functions for notebook service responses
//!
//! Raw payloads are loosely shaped: optional fields come and go, parents may
//! be reported twice, and listings occasionally contain unusable elements.
//! This module turns them into [`CanonicalRecord`]s. It performs no I/O and
//! does not log; elements it drops are reported back as data.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

use super::model::{CanonicalRecord, ChildCollection, ContainerKind, Parent, ParentRef};
use crate::error::{Error, Result};

// ============================================================================
// Domain Models (Input from API)
// ============================================================================

/// Optional field that degrades to `None` when the source sends the wrong
/// JSON type, so one odd field never costs the whole element
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Parent reference as embedded in an entity payload
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawParent {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: Option<String>,
}

/// A notebook, section group or section as returned by the service.
///
/// `id` is strict: an element whose id is not a string is malformed. Every
/// other field is optional and lenient.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawEntity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_date_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_modified_date_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub parent_notebook: Option<RawParent>,
    #[serde(default, deserialize_with = "lenient")]
    pub parent_section_group: Option<RawParent>,
    #[serde(default, deserialize_with = "lenient")]
    pub sections_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub section_groups_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub pages_url: Option<String>,
}

// ============================================================================
// Normalization policy
// ============================================================================

/// How much of the source payload survives normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Parent info projected to id and name; the raw payload is discarded
    #[default]
    Filtered,
    /// Same record, plus the verbatim element for later traversal
    FullPreserve,
}

/// What a list response without its collection field means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingCollection {
    /// Malformed response, reported as `Schema`
    #[default]
    Error,
    /// Treated as a listing with no items
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizeOptions {
    pub projection: Projection,
    pub missing_collection: MissingCollection,
}

impl NormalizeOptions {
    pub fn filtered() -> Self {
        Self::default()
    }

    pub fn full_preserve() -> Self {
        Self {
            projection: Projection::FullPreserve,
            ..Self::default()
        }
    }
}

/// Field holding the items of a list response
pub const COLLECTION_FIELD: &str = "value";

// ============================================================================
// Output Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    MissingId,
    /// The element was not an object or its id was not a string
    Malformed(String),
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "missing id"),
            Self::Malformed(msg) => write!(f, "malformed element: {msg}"),
        }
    }
}

/// A list element that did not become a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedElement {
    pub index: usize,
    pub reason: DropReason,
}

/// Result of normalizing a list response
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListNormalization {
    pub records: Vec<CanonicalRecord>,
    pub dropped: Vec<DroppedElement>,
}

// ============================================================================
// Pure Helper Functions
// ============================================================================

/// Name used when the source omits `displayName`
pub fn placeholder_name(kind: ContainerKind) -> &'static str {
    match kind {
        ContainerKind::Notebook => "Unnamed Notebook",
        ContainerKind::SectionGroup => "Unnamed Section Group",
        ContainerKind::Section => "Unnamed Section",
        ContainerKind::Unknown | ContainerKind::Invalid => "Unnamed",
    }
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parent_ref(raw: Option<RawParent>) -> Option<ParentRef> {
    let raw = raw?;
    let id = raw.id.filter(|id| !id.trim().is_empty())?;
    Some(ParentRef {
        id,
        display_name: raw.display_name,
    })
}

/// Pick the immediate parent.
///
/// A section inside a section group is reported with both its notebook and
/// its group; the group is the immediate parent. Notebooks have no parent.
fn resolve_parent(kind: ContainerKind, entity: &mut RawEntity) -> Parent {
    if kind == ContainerKind::Notebook {
        return Parent::None;
    }

    if let Some(group) = parent_ref(entity.parent_section_group.take()) {
        return Parent::SectionGroup(group);
    }

    match parent_ref(entity.parent_notebook.take()) {
        Some(notebook) => Parent::Notebook(notebook),
        None => Parent::None,
    }
}

fn child_refs(entity: &mut RawEntity) -> BTreeMap<ChildCollection, String> {
    [
        (ChildCollection::Sections, entity.sections_url.take()),
        (ChildCollection::SectionGroups, entity.section_groups_url.take()),
        (ChildCollection::Pages, entity.pages_url.take()),
    ]
    .into_iter()
    .filter_map(|(child, url)| url.filter(|u| !u.is_empty()).map(|u| (child, u)))
    .collect()
}

/// Convert a typed entity into a record. `None` when the id is unusable.
fn to_record(
    mut entity: RawEntity,
    kind: ContainerKind,
    raw: Option<serde_json::Value>,
) -> Option<CanonicalRecord> {
    let id = entity.id.take().filter(|id| !id.trim().is_empty())?;

    let display_name = entity
        .display_name
        .take()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| placeholder_name(kind).to_string());

    Some(CanonicalRecord {
        id,
        display_name,
        kind,
        parent: resolve_parent(kind, &mut entity),
        created_at: parse_timestamp(entity.created_date_time.as_deref()),
        modified_at: parse_timestamp(entity.last_modified_date_time.as_deref()),
        child_collection_refs: child_refs(&mut entity),
        raw,
    })
}

fn parse_json(raw: &[u8]) -> Result<serde_json::Value> {
    serde_json::from_slice(raw).map_err(|e| Error::Parse(format!("invalid JSON payload: {e}")))
}

// ============================================================================
// Pure Transformation Functions
// ============================================================================

/// Normalize a list response (`{"value": [...]}`) into records of `kind`.
///
/// Fails with `Parse` when the payload is not JSON and with `Schema` when the
/// payload is not an object, when the collection field holds something other
/// than an array, or when it is absent and `options.missing_collection` is
/// `Error`. Elements without a usable id are dropped and listed in
/// [`ListNormalization::dropped`]. Optional fields of the wrong type are
/// treated as absent.
pub fn normalize_list(
    raw: &[u8],
    kind: ContainerKind,
    options: NormalizeOptions,
) -> Result<ListNormalization> {
    let payload = parse_json(raw)?;

    let object = payload.as_object().ok_or_else(|| {
        Error::Schema("list response must be a JSON object".to_string())
    })?;

    let items = match object.get(COLLECTION_FIELD) {
        Some(serde_json::Value::Array(items)) => items,
        Some(serde_json::Value::Null) | None => {
            return match options.missing_collection {
                MissingCollection::Empty => Ok(ListNormalization::default()),
                MissingCollection::Error => Err(Error::Schema(format!(
                    "list response has no '{COLLECTION_FIELD}' array"
                ))),
            };
        }
        Some(_) => {
            return Err(Error::Schema(format!(
                "list response field '{COLLECTION_FIELD}' is not an array"
            )))
        }
    };

    let mut output = ListNormalization::default();

    for (index, item) in items.iter().enumerate() {
        let entity: RawEntity = match serde_json::from_value(item.clone()) {
            Ok(entity) => entity,
            Err(e) => {
                output.dropped.push(DroppedElement {
                    index,
                    reason: DropReason::Malformed(e.to_string()),
                });
                continue;
            }
        };

        let preserved = match options.projection {
            Projection::FullPreserve => Some(item.clone()),
            Projection::Filtered => None,
        };

        match to_record(entity, kind, preserved) {
            Some(record) => output.records.push(record),
            None => output.dropped.push(DroppedElement {
                index,
                reason: DropReason::MissingId,
            }),
        }
    }

    Ok(output)
}

/// Normalize the response of a create request.
///
/// An identifier-less creation result is unusable, so a missing or empty
/// `id` is a `Schema` error here rather than a dropped element.
pub fn normalize_created(raw: &[u8], kind: ContainerKind) -> Result<CanonicalRecord> {
    let payload = parse_json(raw)?;

    if !payload.is_object() {
        return Err(Error::Schema(
            "create response must be a JSON object".to_string(),
        ));
    }

    let entity: RawEntity = serde_json::from_value(payload)
        .map_err(|e| Error::Schema(format!("create response is malformed: {e}")))?;

    to_record(entity, kind, None).ok_or_else(|| {
        Error::Schema(format!(
            "create response for {} has no id",
            kind.label()
        ))
    })
}

// ============================================================================
// Tests
// ============================================================================
