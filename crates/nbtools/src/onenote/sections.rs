//! List and create sections

use clap::Args;
use colored::Colorize;
use nbtools_core::onenote::endpoints::{child_collection_path, top_level_path};
use nbtools_core::onenote::{
    ensure_allowed, CanonicalRecord, ChildCollection, ContainerKind, NormalizeOptions, Operation,
};
use nbtools_core::Result;

use super::organizer::Organizer;
use super::transport::Transport;
use crate::prelude::println;

/// List sections, either all of them or those directly inside a container
#[derive(Args, Debug, Clone)]
pub struct ListSectionsOptions {
    /// Notebook or section group ID (lists every section when omitted)
    #[arg(long)]
    pub container: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Create a section inside a notebook or section group
#[derive(Args, Debug, Clone)]
pub struct CreateSectionOptions {
    /// Notebook or section group ID
    pub container_id: String,

    /// Display name of the new section
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl<T: Transport> Organizer<T> {
    /// Sections of the whole account, or the direct sections of a container
    pub async fn list_sections(&self, container_id: Option<&str>) -> Result<Vec<CanonicalRecord>> {
        let (path, label) = match container_id {
            None => (
                top_level_path(ContainerKind::Section)?,
                "listing all sections".to_string(),
            ),
            Some(raw) => {
                let container = self.resolve_container(raw).await?;
                ensure_allowed(container.kind, Operation::ListSections)?;
                (
                    child_collection_path(container.kind, &container.id, ChildCollection::Sections)?,
                    format!("listing sections of {}", container.kind.label()),
                )
            }
        };

        self.fetch_list(
            &path,
            ContainerKind::Section,
            NormalizeOptions::filtered(),
            &label,
        )
        .await
    }

    pub async fn create_section(
        &self,
        container_id: &str,
        display_name: &str,
    ) -> Result<CanonicalRecord> {
        self.create_child(container_id, display_name, ContainerKind::Section)
            .await
    }
}

/// CLI handler for sections command
pub async fn list_handler(
    options: ListSectionsOptions,
    global: crate::Global,
) -> color_eyre::eyre::Result<()> {
    let organizer = Organizer::from_global(&global)?;
    let sections = organizer.list_sections(options.container.as_deref()).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
    } else {
        println!("Found {} section(s):\n", sections.len());
        super::display_records(&sections);
    }

    Ok(())
}

/// CLI handler for create-section command
pub async fn create_handler(
    options: CreateSectionOptions,
    global: crate::Global,
) -> color_eyre::eyre::Result<()> {
    let organizer = Organizer::from_global(&global)?;
    let section = organizer
        .create_section(&options.container_id, &options.name)
        .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&section)?);
    } else {
        println!(
            "\n{}",
            format!("Created section: {}", section.display_name)
                .green()
                .bold()
        );
        super::display_records(std::slice::from_ref(&section));
    }

    Ok(())
}
