//! Immediate children of a container, and the shared create flow

use clap::Args;
use nbtools_core::onenote::endpoints::child_collection_path;
use nbtools_core::onenote::{
    ensure_allowed, validate_display_name, CanonicalRecord, ChildCollection, ContainerId,
    ContainerKind, NormalizeOptions, Operation, Parent, ParentRef,
};
use nbtools_core::{Error, Result};
use serde::Serialize;

use super::organizer::Organizer;
use super::transport::Transport;
use crate::prelude::{eprintln, println};

/// List the sections and section groups directly inside a container
#[derive(Args, Debug, Clone)]
pub struct ChildrenOptions {
    /// Notebook or section group ID
    pub container_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Combined view of a container's direct sections and section groups.
///
/// When the section-group half fails but sections were listed, `children`
/// holds only the sections and `warnings` says why the rest is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildrenListing {
    pub container_id: ContainerId,
    pub container_kind: ContainerKind,
    pub children: Vec<CanonicalRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

fn create_operation(child: ContainerKind) -> Result<(Operation, ChildCollection)> {
    match child {
        ContainerKind::Section => Ok((Operation::CreateSection, ChildCollection::Sections)),
        ContainerKind::SectionGroup => Ok((
            Operation::CreateSectionGroup,
            ChildCollection::SectionGroups,
        )),
        other => Err(Error::InvalidArgument(format!(
            "only sections and section groups can be created inside a container, not a {}",
            other.label()
        ))),
    }
}

impl<T: Transport> Organizer<T> {
    /// Create a section or section group inside a notebook or section group.
    ///
    /// The name is validated before anything else and the policy is checked
    /// before the create request is built, so a rejected call never reaches
    /// the create endpoint.
    pub async fn create_child(
        &self,
        container_id: &str,
        display_name: &str,
        child: ContainerKind,
    ) -> Result<CanonicalRecord> {
        validate_display_name(display_name)?;
        let (operation, collection) = create_operation(child)?;

        let container = self.resolve_container(container_id).await?;
        ensure_allowed(container.kind, operation)?;

        let path = child_collection_path(container.kind, &container.id, collection)?;
        let label = format!("creating {} in {}", child.label(), container.kind.label());

        let mut record = self.send_create(&path, child, display_name, &label).await?;

        if record.parent.is_none() {
            record.parent = Parent::from_container(
                container.kind,
                ParentRef {
                    id: container.id.as_str().to_string(),
                    display_name: container.display_name.clone(),
                },
            );
        }

        log::debug!("Created {} {} ({})", child.label(), record.id, label);

        Ok(record)
    }

    /// Direct sections followed by direct section groups of a container.
    ///
    /// A failed section listing fails the call. A failed section-group
    /// listing is downgraded to a logged warning carried in the result.
    pub async fn list_immediate_children(&self, container_id: &str) -> Result<ChildrenListing> {
        let container = self.resolve_container(container_id).await?;
        ensure_allowed(container.kind, Operation::ListSections)?;
        ensure_allowed(container.kind, Operation::ListSectionGroups)?;

        let label = format!("listing sections of {}", container.kind.label());
        let sections_path =
            child_collection_path(container.kind, &container.id, ChildCollection::Sections)?;
        let mut children = self
            .fetch_list(
                &sections_path,
                ContainerKind::Section,
                NormalizeOptions::filtered(),
                &label,
            )
            .await?;

        let mut warnings = Vec::new();

        let label = format!("listing section groups of {}", container.kind.label());
        let groups_path =
            child_collection_path(container.kind, &container.id, ChildCollection::SectionGroups)?;
        match self
            .fetch_list(
                &groups_path,
                ContainerKind::SectionGroup,
                NormalizeOptions::filtered(),
                &label,
            )
            .await
        {
            Ok(groups) => children.extend(groups),
            Err(e) => {
                log::warn!(
                    "Section groups of {} could not be listed, returning sections only: {}",
                    container.id,
                    e
                );
                warnings.push(format!(
                    "section groups omitted: {e}. Only sections are listed."
                ));
            }
        }

        Ok(ChildrenListing {
            container_id: container.id,
            container_kind: container.kind,
            children,
            warnings,
        })
    }
}

/// CLI handler for children command
pub async fn handler(options: ChildrenOptions, global: crate::Global) -> color_eyre::eyre::Result<()> {
    let organizer = Organizer::from_global(&global)?;
    let listing = organizer
        .list_immediate_children(&options.container_id)
        .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        println!(
            "{} {} ({} item(s)):\n",
            listing.container_kind.label(),
            listing.container_id,
            listing.children.len()
        );
        super::display_records(&listing.children);
        for warning in &listing.warnings {
            eprintln!("Warning: {warning}");
        }
    }

    Ok(())
}
