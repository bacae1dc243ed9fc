pub mod children;
pub mod config;
pub mod notebooks;
pub mod organizer;
pub mod resolve;
pub mod section_groups;
pub mod sections;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

use colored::Colorize;
use nbtools_core::onenote::{CanonicalRecord, Parent};

use crate::prelude::{println, *};

pub use organizer::Organizer;

/// OneNote module app - root command
#[derive(Debug, clap::Parser)]
#[command(name = "onenote")]
#[command(about = "Notebook, section group and section operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List notebooks
    #[clap(name = "notebooks")]
    Notebooks(notebooks::ListNotebooksOptions),

    /// Create a notebook
    #[clap(name = "create-notebook")]
    CreateNotebook(notebooks::CreateNotebookOptions),

    /// List sections
    #[clap(name = "sections")]
    Sections(sections::ListSectionsOptions),

    /// Create a section inside a notebook or section group
    #[clap(name = "create-section")]
    CreateSection(sections::CreateSectionOptions),

    /// List section groups
    #[clap(name = "section-groups")]
    SectionGroups(section_groups::ListSectionGroupsOptions),

    /// Create a section group inside a notebook or section group
    #[clap(name = "create-section-group")]
    CreateSectionGroup(section_groups::CreateSectionGroupOptions),

    /// List the sections and section groups directly inside a container
    #[clap(name = "children")]
    Children(children::ChildrenOptions),

    /// Show the section group tree below a container
    #[clap(name = "tree")]
    Tree(section_groups::TreeOptions),

    /// Show whether an ID is a notebook, section group or section
    #[clap(name = "resolve")]
    Resolve(resolve::ResolveOptions),
}

/// Module entry point
pub async fn run(app: App, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Running OneNote command...");
    }

    match app.command {
        Commands::Notebooks(options) => notebooks::list_handler(options, global).await,
        Commands::CreateNotebook(options) => notebooks::create_handler(options, global).await,
        Commands::Sections(options) => sections::list_handler(options, global).await,
        Commands::CreateSection(options) => sections::create_handler(options, global).await,
        Commands::SectionGroups(options) => section_groups::list_handler(options, global).await,
        Commands::CreateSectionGroup(options) => {
            section_groups::create_handler(options, global).await
        }
        Commands::Children(options) => children::handler(options, global).await,
        Commands::Tree(options) => section_groups::tree_handler(options, global).await,
        Commands::Resolve(options) => resolve::handler(options, global).await,
    }
}

fn parent_label(parent: &Parent) -> String {
    match (parent.kind(), parent.reference()) {
        (Some(kind), Some(reference)) => {
            let name = reference.display_name.as_deref().unwrap_or(&reference.id);
            format!("{}: {}", kind.label(), name)
        }
        _ => "-".to_string(),
    }
}

/// Display records as a formatted CLI table
fn display_records(records: &[CanonicalRecord]) {
    if records.is_empty() {
        println!("No items found.");
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Name".bold().cyan(),
        "Kind".bold().cyan(),
        "ID".bold().cyan(),
        "Parent".bold().cyan(),
        "Modified".bold().cyan()
    ]);

    for record in records {
        let modified = record
            .modified_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "N/A".to_string());

        table.add_row(prettytable::row![
            record.display_name.bright_white().to_string(),
            record.kind.label().green().to_string(),
            record.id.bright_black().to_string(),
            parent_label(&record.parent),
            modified
        ]);
    }

    table.printstd();
}
