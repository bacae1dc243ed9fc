//! Resolve a container identifier to its kind

use clap::Args;
use colored::Colorize;
use nbtools_core::onenote::resolver::{
    probe_plan, probed_display_name, unresolved_error, ResolutionSource,
};
use nbtools_core::onenote::{ContainerId, ContainerKind};
use nbtools_core::Result;
use serde::Serialize;

use super::organizer::Organizer;
use super::transport::{Method, Transport};
use crate::prelude::println;

/// Resolve a container ID to a notebook, section group or section
#[derive(Args, Debug, Clone)]
pub struct ResolveOptions {
    /// Container ID (optionally prefixed with notebook:, sectionGroup: or section:)
    pub container_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub id: ContainerId,
    pub kind: ContainerKind,
    pub source: ResolutionSource,
    /// Known only when a probe answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl<T: Transport> Organizer<T> {
    /// Determine what an identifier denotes.
    ///
    /// The pattern tier answers first; only an `Unknown` from it triggers the
    /// probe tier, which requests each entity endpoint in probe order and
    /// takes the first success. Transport failures abort immediately.
    pub async fn resolve_container(&self, raw: &str) -> Result<Resolution> {
        let id = ContainerId::parse(raw, "container_id")?;
        let hinted = self.patterns.classify(&id)?;

        if hinted.kind.is_resolved() {
            log::debug!("{} classified as {} by pattern", hinted.id, hinted.kind);
            return Ok(Resolution {
                id: hinted.id,
                kind: hinted.kind,
                source: ResolutionSource::Pattern,
                display_name: None,
            });
        }

        let mut statuses = Vec::new();
        for step in probe_plan(&hinted.id)? {
            let response = self.transport.request(Method::Get, &step.path, None).await?;

            if response.is_success() {
                log::debug!("{} resolved as {} by probe", hinted.id, step.kind);
                return Ok(Resolution {
                    id: hinted.id,
                    kind: step.kind,
                    source: ResolutionSource::Probe,
                    display_name: probed_display_name(&response.body),
                });
            }

            log::debug!(
                "{} probe for {} answered {}",
                step.kind,
                hinted.id,
                response.status
            );
            statuses.push(response.status);
        }

        log::warn!(
            "No probe matched container {} (statuses: {:?})",
            hinted.id,
            statuses
        );
        Err(unresolved_error(&hinted.id, &statuses))
    }
}

/// CLI handler for resolve command
pub async fn handler(options: ResolveOptions, global: crate::Global) -> color_eyre::eyre::Result<()> {
    let organizer = Organizer::from_global(&global)?;
    let resolution = organizer.resolve_container(&options.container_id).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else {
        let name = resolution
            .display_name
            .as_deref()
            .map(|name| format!(" \"{name}\""))
            .unwrap_or_default();
        println!(
            "{} is a {}{} (resolved by {})",
            resolution.id.as_str().bold().cyan(),
            resolution.kind.label().green(),
            name,
            match resolution.source {
                ResolutionSource::Pattern => "pattern",
                ResolutionSource::Probe => "probe",
            }
        );
    }

    Ok(())
}
