//! List, create and walk section groups

use clap::Args;
use colored::Colorize;
use nbtools_core::onenote::endpoints::{child_collection_path, top_level_path};
use nbtools_core::onenote::{
    ensure_allowed, CanonicalRecord, ChildCollection, ContainerId, ContainerKind,
    NormalizeOptions, Operation, SectionGroupNode,
};
use nbtools_core::Result;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use super::organizer::Organizer;
use super::transport::Transport;
use crate::prelude::println;

/// Deepest section group nesting the tree walk descends into
pub const MAX_TREE_DEPTH: usize = 8;

/// List section groups, either all of them or those directly inside a container
#[derive(Args, Debug, Clone)]
pub struct ListSectionGroupsOptions {
    /// Notebook or section group ID (lists every section group when omitted)
    #[arg(long)]
    pub container: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Create a section group inside a notebook or section group
#[derive(Args, Debug, Clone)]
pub struct CreateSectionGroupOptions {
    /// Notebook or section group ID
    pub container_id: String,

    /// Display name of the new section group
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Show every section group nested below a container, with their sections
#[derive(Args, Debug, Clone)]
pub struct TreeOptions {
    /// Notebook or section group ID
    pub container_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

type TreeFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<SectionGroupNode>>> + Send + 'a>>;

impl<T: Transport> Organizer<T> {
    /// Section groups of the whole account, or the direct ones of a container
    pub async fn list_section_groups(
        &self,
        container_id: Option<&str>,
    ) -> Result<Vec<CanonicalRecord>> {
        let (path, label) = match container_id {
            None => (
                top_level_path(ContainerKind::SectionGroup)?,
                "listing all section groups".to_string(),
            ),
            Some(raw) => {
                let container = self.resolve_container(raw).await?;
                ensure_allowed(container.kind, Operation::ListSectionGroups)?;
                (
                    child_collection_path(
                        container.kind,
                        &container.id,
                        ChildCollection::SectionGroups,
                    )?,
                    format!("listing section groups of {}", container.kind.label()),
                )
            }
        };

        self.fetch_list(
            &path,
            ContainerKind::SectionGroup,
            NormalizeOptions::filtered(),
            &label,
        )
        .await
    }

    pub async fn create_section_group(
        &self,
        container_id: &str,
        display_name: &str,
    ) -> Result<CanonicalRecord> {
        self.create_child(container_id, display_name, ContainerKind::SectionGroup)
            .await
    }

    /// Recursively list section groups below a notebook or section group.
    ///
    /// Section groups are normalized with the full-preserve projection so each
    /// node keeps its raw payload; their sections use the filtered one. The
    /// walk stops at [`MAX_TREE_DEPTH`] and never revisits an id.
    pub async fn list_section_group_tree(
        &self,
        container_id: &str,
    ) -> Result<Vec<SectionGroupNode>> {
        let container = self.resolve_container(container_id).await?;
        ensure_allowed(container.kind, Operation::ListSectionGroups)?;

        let mut visited = HashSet::from([container.id.as_str().to_string()]);
        self.walk_section_groups(container.kind, container.id, 1, &mut visited)
            .await
    }

    fn walk_section_groups<'a>(
        &'a self,
        kind: ContainerKind,
        id: ContainerId,
        depth: usize,
        visited: &'a mut HashSet<String>,
    ) -> TreeFuture<'a> {
        Box::pin(async move {
            let path = child_collection_path(kind, &id, ChildCollection::SectionGroups)?;
            let label = format!("listing section groups of {} {}", kind.label(), id);
            let groups = self
                .fetch_list(
                    &path,
                    ContainerKind::SectionGroup,
                    NormalizeOptions::full_preserve(),
                    &label,
                )
                .await?;

            let mut nodes = Vec::with_capacity(groups.len());
            for record in groups {
                if !visited.insert(record.id.clone()) {
                    log::warn!("Section group {} appears twice, skipping", record.id);
                    continue;
                }

                let group_id = ContainerId::parse(&record.id, "section_group_id")?;

                let path = child_collection_path(
                    ContainerKind::SectionGroup,
                    &group_id,
                    ChildCollection::Sections,
                )?;
                let label = format!("listing sections of section group {group_id}");
                let sections = self
                    .fetch_list(
                        &path,
                        ContainerKind::Section,
                        NormalizeOptions::filtered(),
                        &label,
                    )
                    .await?;

                let section_groups = if depth < MAX_TREE_DEPTH {
                    self.walk_section_groups(
                        ContainerKind::SectionGroup,
                        group_id,
                        depth + 1,
                        &mut *visited,
                    )
                    .await?
                } else {
                    log::warn!(
                        "Not descending below section group {} (depth limit {})",
                        record.id,
                        MAX_TREE_DEPTH
                    );
                    Vec::new()
                };

                nodes.push(SectionGroupNode {
                    record,
                    sections,
                    section_groups,
                });
            }

            Ok(nodes)
        })
    }
}

fn print_tree(nodes: &[SectionGroupNode], depth: usize) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        println!(
            "{}{} {}",
            indent,
            node.record.display_name.bold().cyan(),
            node.record.id.bright_black()
        );
        for section in &node.sections {
            println!(
                "{}  • {} {}",
                indent,
                section.display_name,
                section.id.bright_black()
            );
        }
        print_tree(&node.section_groups, depth + 1);
    }
}

/// CLI handler for section-groups command
pub async fn list_handler(
    options: ListSectionGroupsOptions,
    global: crate::Global,
) -> color_eyre::eyre::Result<()> {
    let organizer = Organizer::from_global(&global)?;
    let groups = organizer
        .list_section_groups(options.container.as_deref())
        .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        println!("Found {} section group(s):\n", groups.len());
        super::display_records(&groups);
    }

    Ok(())
}

/// CLI handler for create-section-group command
pub async fn create_handler(
    options: CreateSectionGroupOptions,
    global: crate::Global,
) -> color_eyre::eyre::Result<()> {
    let organizer = Organizer::from_global(&global)?;
    let group = organizer
        .create_section_group(&options.container_id, &options.name)
        .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&group)?);
    } else {
        println!(
            "\n{}",
            format!("Created section group: {}", group.display_name)
                .green()
                .bold()
        );
        super::display_records(std::slice::from_ref(&group));
    }

    Ok(())
}

/// CLI handler for tree command
pub async fn tree_handler(options: TreeOptions, global: crate::Global) -> color_eyre::eyre::Result<()> {
    let organizer = Organizer::from_global(&global)?;
    let tree = organizer
        .list_section_group_tree(&options.container_id)
        .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else if tree.is_empty() {
        println!("No section groups found.");
    } else {
        print_tree(&tree, 0);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onenote::testing::SpyTransport;
    use crate::onenote::transport::Method;
    use nbtools_core::Error;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_section_groups_of_notebook() {
        let spy = SpyTransport::new()
            .on(
                Method::Get,
                "/me/onenote/notebooks/nb-1",
                200,
                json!({"id": "nb-1"}),
            )
            .on(
                Method::Get,
                "/me/onenote/notebooks/nb-1/sectionGroups",
                200,
                json!({"value": [
                    {"id": "sg-1", "displayName": "Research", "parentNotebook": {"id": "nb-1"}},
                    {"id": "sg-2"}
                ]}),
            );
        let organizer = Organizer::new(spy);

        let groups = organizer.list_section_groups(Some("nb-1")).await.unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].parent.kind(), Some(ContainerKind::Notebook));
        assert_eq!(groups[1].display_name, "Unnamed Section Group");
        assert!(groups.iter().all(|g| g.raw.is_none()));
    }

    #[tokio::test]
    async fn test_missing_collection_is_schema_error() {
        let spy = SpyTransport::new().on(
            Method::Get,
            "/me/onenote/sectionGroups",
            200,
            json!({"@odata.context": "https://graph"}),
        );
        let organizer = Organizer::new(spy);

        let err = organizer.list_section_groups(None).await.unwrap_err();

        assert!(matches!(err, Error::Schema(_)));
    }

    #[tokio::test]
    async fn test_create_section_group_in_section_never_posts() {
        let spy = SpyTransport::new().on(
            Method::Get,
            "/me/onenote/sections/s-1",
            200,
            json!({"id": "s-1"}),
        );
        let organizer = Organizer::new(spy);

        let err = organizer
            .create_section_group("s-1", "Project Alpha")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::PermissionDenied(_)));
        assert_eq!(organizer.transport.count(Method::Post), 0);
    }

    #[tokio::test]
    async fn test_tree_walks_nested_groups() {
        let spy = SpyTransport::new()
            .on(
                Method::Get,
                "/me/onenote/notebooks/nb-1/sectionGroups",
                200,
                json!({"value": [{"id": "sg-1", "displayName": "Research", "sectionsUrl": "u"}]}),
            )
            .on(
                Method::Get,
                "/me/onenote/sectionGroups/sg-1/sections",
                200,
                json!({"value": [{"id": "s-1", "displayName": "Papers"}]}),
            )
            .on(
                Method::Get,
                "/me/onenote/sectionGroups/sg-1/sectionGroups",
                200,
                json!({"value": [{"id": "sg-2", "displayName": "Archive"}]}),
            )
            .on(
                Method::Get,
                "/me/onenote/sectionGroups/sg-2/sections",
                200,
                json!({"value": []}),
            )
            .on(
                Method::Get,
                "/me/onenote/sectionGroups/sg-2/sectionGroups",
                200,
                json!({"value": []}),
            );
        let organizer = Organizer::new(spy);

        let tree = organizer
            .list_section_group_tree("notebook:nb-1")
            .await
            .unwrap();

        assert_eq!(tree.len(), 1);
        let research = &tree[0];
        assert_eq!(research.record.display_name, "Research");
        assert!(research.record.raw.is_some());
        assert_eq!(research.sections.len(), 1);
        assert_eq!(research.sections[0].display_name, "Papers");
        assert_eq!(research.section_groups.len(), 1);
        assert_eq!(research.section_groups[0].record.id, "sg-2");
        assert!(research.section_groups[0].section_groups.is_empty());
    }

    fn tree_depth(nodes: &[SectionGroupNode]) -> usize {
        nodes
            .iter()
            .map(|node| 1 + tree_depth(&node.section_groups))
            .max()
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_tree_stops_at_max_depth() {
        // Arrange: nb-1 > g1 > g2 > ... > g12
        let mut spy = SpyTransport::new().on(
            Method::Get,
            "/me/onenote/notebooks/nb-1/sectionGroups",
            200,
            json!({"value": [{"id": "g1"}]}),
        );
        for level in 1..=12 {
            let children = if level < 12 {
                json!({"value": [{"id": format!("g{}", level + 1)}]})
            } else {
                json!({"value": []})
            };
            spy = spy
                .on(
                    Method::Get,
                    &format!("/me/onenote/sectionGroups/g{level}/sections"),
                    200,
                    json!({"value": []}),
                )
                .on(
                    Method::Get,
                    &format!("/me/onenote/sectionGroups/g{level}/sectionGroups"),
                    200,
                    children,
                );
        }
        let organizer = Organizer::new(spy);

        // Act
        let tree = organizer
            .list_section_group_tree("notebook:nb-1")
            .await
            .unwrap();

        // Assert
        assert_eq!(tree_depth(&tree), MAX_TREE_DEPTH);

        let mut deepest = &tree[0];
        while let Some(next) = deepest.section_groups.first() {
            deepest = next;
        }
        assert_eq!(deepest.record.id, format!("g{MAX_TREE_DEPTH}"));
        assert!(!organizer.transport.paths().contains(&format!(
            "/me/onenote/sectionGroups/g{MAX_TREE_DEPTH}/sectionGroups"
        )));
    }

    #[tokio::test]
    async fn test_tree_skips_repeated_ids() {
        let spy = SpyTransport::new()
            .on(
                Method::Get,
                "/me/onenote/sectionGroups/sg-1/sectionGroups",
                200,
                json!({"value": [{"id": "sg-1"}]}),
            );
        let organizer = Organizer::new(spy);

        let tree = organizer
            .list_section_group_tree("sectionGroup:sg-1")
            .await
            .unwrap();

        assert!(tree.is_empty());
    }
}
