//! Hierarchy rules: which container kinds may hold which children
//!
//! Sections are leaves. Notebooks and section groups may contain sections
//! and further section groups.

use serde::Serialize;

use super::model::ContainerKind;
use crate::error::{Error, Result};

/// Operations that take a container as their target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateSection,
    CreateSectionGroup,
    ListSections,
    ListSectionGroups,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::CreateSection,
        Operation::CreateSectionGroup,
        Operation::ListSections,
        Operation::ListSectionGroups,
    ];

    fn describe(self) -> &'static str {
        match self {
            Self::CreateSection => "create a section",
            Self::CreateSectionGroup => "create a section group",
            Self::ListSections => "list sections",
            Self::ListSectionGroups => "list section groups",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Decision table for `(kind, operation)`
pub fn is_allowed(kind: ContainerKind, operation: Operation) -> bool {
    use ContainerKind::*;
    use Operation::*;

    match (kind, operation) {
        (
            Notebook | SectionGroup,
            CreateSection | CreateSectionGroup | ListSections | ListSectionGroups,
        ) => true,
        (Section | Unknown | Invalid, _) => false,
    }
}

/// Check the decision table and produce a descriptive error on denial.
///
/// A resolved kind that is simply the wrong one yields `PermissionDenied`;
/// an unresolved kind yields `InvalidArgument`. Both messages name the
/// offending container type.
pub fn ensure_allowed(kind: ContainerKind, operation: Operation) -> Result<()> {
    if is_allowed(kind, operation) {
        return Ok(());
    }

    if kind.is_resolved() {
        Err(Error::PermissionDenied(format!(
            "cannot {operation} inside a {}: only notebooks and section groups can contain sections or section groups",
            kind.label()
        )))
    } else {
        Err(Error::InvalidArgument(format!(
            "cannot {operation} inside an {}: the container type must be resolved first",
            kind.label()
        )))
    }
}
