//! List and create notebooks

use clap::Args;
use colored::Colorize;
use nbtools_core::onenote::endpoints::top_level_path;
use nbtools_core::onenote::{
    validate_display_name, CanonicalRecord, ContainerKind, NormalizeOptions,
};
use nbtools_core::Result;

use super::organizer::Organizer;
use super::transport::Transport;
use crate::prelude::println;

/// List every notebook of the signed-in user
#[derive(Args, Debug, Clone)]
pub struct ListNotebooksOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Create a new notebook
#[derive(Args, Debug, Clone)]
pub struct CreateNotebookOptions {
    /// Display name of the new notebook
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl<T: Transport> Organizer<T> {
    pub async fn list_notebooks(&self) -> Result<Vec<CanonicalRecord>> {
        self.fetch_list(
            &top_level_path(ContainerKind::Notebook)?,
            ContainerKind::Notebook,
            NormalizeOptions::filtered(),
            "listing notebooks",
        )
        .await
    }

    /// Notebooks are top level, so no container is resolved
    pub async fn create_notebook(&self, display_name: &str) -> Result<CanonicalRecord> {
        validate_display_name(display_name)?;

        self.send_create(
            &top_level_path(ContainerKind::Notebook)?,
            ContainerKind::Notebook,
            display_name,
            "creating notebook",
        )
        .await
    }
}

/// CLI handler for notebooks command
pub async fn list_handler(
    options: ListNotebooksOptions,
    global: crate::Global,
) -> color_eyre::eyre::Result<()> {
    let organizer = Organizer::from_global(&global)?;
    let notebooks = organizer.list_notebooks().await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&notebooks)?);
    } else {
        println!("Found {} notebook(s):\n", notebooks.len());
        super::display_records(&notebooks);
    }

    Ok(())
}

/// CLI handler for create-notebook command
pub async fn create_handler(
    options: CreateNotebookOptions,
    global: crate::Global,
) -> color_eyre::eyre::Result<()> {
    let organizer = Organizer::from_global(&global)?;
    let notebook = organizer.create_notebook(&options.name).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&notebook)?);
    } else {
        println!(
            "\n{}",
            format!("Created notebook: {}", notebook.display_name)
                .green()
                .bold()
        );
        super::display_records(std::slice::from_ref(&notebook));
    }

    Ok(())
}
