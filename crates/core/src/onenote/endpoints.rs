//! Request paths for the notebook service
//!
//! Paths are relative to the configured base URL. Every identifier is
//! percent-encoded before interpolation.

use super::model::{ChildCollection, ContainerId, ContainerKind};
use crate::error::{Error, Result};

/// Root of the notebook API for the signed-in user
pub const ONENOTE_ROOT: &str = "/me/onenote";

fn collection_segment(kind: ContainerKind) -> Result<&'static str> {
    match kind {
        ContainerKind::Notebook => Ok("notebooks"),
        ContainerKind::SectionGroup => Ok("sectionGroups"),
        ContainerKind::Section => Ok("sections"),
        other => Err(Error::InvalidArgument(format!(
            "no endpoint exists for an {}",
            other.label()
        ))),
    }
}

fn child_segment(child: ChildCollection) -> &'static str {
    match child {
        ChildCollection::Sections => "sections",
        ChildCollection::SectionGroups => "sectionGroups",
        ChildCollection::Pages => "pages",
    }
}

/// Path of a single entity, used by the probe tier
pub fn entity_path(kind: ContainerKind, id: &ContainerId) -> Result<String> {
    Ok(format!(
        "{ONENOTE_ROOT}/{}/{}",
        collection_segment(kind)?,
        id.encoded()
    ))
}

/// Path of a child collection below a container
///
/// Only notebooks and section groups hold sections and section groups;
/// sections only hold pages.
pub fn child_collection_path(
    kind: ContainerKind,
    id: &ContainerId,
    child: ChildCollection,
) -> Result<String> {
    let valid = match child {
        ChildCollection::Sections | ChildCollection::SectionGroups => {
            matches!(kind, ContainerKind::Notebook | ContainerKind::SectionGroup)
        }
        ChildCollection::Pages => kind == ContainerKind::Section,
    };

    if !valid {
        return Err(Error::InvalidArgument(format!(
            "a {} has no {} collection",
            kind.label(),
            child_segment(child)
        )));
    }

    Ok(format!("{}/{}", entity_path(kind, id)?, child_segment(child)))
}

/// Path of the account-wide collection for a kind
/// (`/me/onenote/notebooks`, `/me/onenote/sections`, ...)
pub fn top_level_path(kind: ContainerKind) -> Result<String> {
    Ok(format!("{ONENOTE_ROOT}/{}", collection_segment(kind)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ContainerId {
        ContainerId::parse(raw, "container_id").unwrap()
    }

    #[test]
    fn test_entity_paths() {
        let container = id("0-ABC!12");

        assert_eq!(
            entity_path(ContainerKind::Notebook, &container).unwrap(),
            "/me/onenote/notebooks/0-ABC%2112"
        );
        assert_eq!(
            entity_path(ContainerKind::SectionGroup, &container).unwrap(),
            "/me/onenote/sectionGroups/0-ABC%2112"
        );
        assert_eq!(
            entity_path(ContainerKind::Section, &container).unwrap(),
            "/me/onenote/sections/0-ABC%2112"
        );
    }

    #[test]
    fn test_entity_path_rejects_unresolved_kinds() {
        assert!(entity_path(ContainerKind::Unknown, &id("x")).is_err());
        assert!(entity_path(ContainerKind::Invalid, &id("x")).is_err());
    }

    #[test]
    fn test_child_collection_paths() {
        assert_eq!(
            child_collection_path(
                ContainerKind::Notebook,
                &id("nb"),
                ChildCollection::SectionGroups
            )
            .unwrap(),
            "/me/onenote/notebooks/nb/sectionGroups"
        );
        assert_eq!(
            child_collection_path(
                ContainerKind::SectionGroup,
                &id("sg"),
                ChildCollection::Sections
            )
            .unwrap(),
            "/me/onenote/sectionGroups/sg/sections"
        );
        assert_eq!(
            child_collection_path(ContainerKind::Section, &id("s"), ChildCollection::Pages)
                .unwrap(),
            "/me/onenote/sections/s/pages"
        );
    }

    #[test]
    fn test_sections_have_no_section_children() {
        assert!(
            child_collection_path(ContainerKind::Section, &id("s"), ChildCollection::Sections)
                .is_err()
        );
        assert!(child_collection_path(
            ContainerKind::Notebook,
            &id("nb"),
            ChildCollection::Pages
        )
        .is_err());
    }

    #[test]
    fn test_top_level_paths() {
        assert_eq!(
            top_level_path(ContainerKind::Notebook).unwrap(),
            "/me/onenote/notebooks"
        );
        assert_eq!(
            top_level_path(ContainerKind::SectionGroup).unwrap(),
            "/me/onenote/sectionGroups"
        );
    }
}
