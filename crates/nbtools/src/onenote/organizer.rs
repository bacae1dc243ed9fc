//! The organizer: orchestration over a [`Transport`]
//!
//! Each operation follows the same pipeline: validate input, resolve the
//! container kind, check the hierarchy policy, build the endpoint, perform
//! one round trip, normalize. No state survives between calls.

use nbtools_core::onenote::{
    normalize_created, normalize_list, CanonicalRecord, ContainerKind, NormalizeOptions,
    PatternTier,
};
use nbtools_core::Result;

use super::config::GraphConfig;
use super::transport::{GraphTransport, Method, Transport};

pub struct Organizer<T> {
    pub(crate) transport: T,
    pub(crate) patterns: PatternTier,
}

impl<T: Transport> Organizer<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            patterns: PatternTier::default(),
        }
    }

    pub fn with_patterns(mut self, patterns: PatternTier) -> Self {
        self.patterns = patterns;
        self
    }

    /// GET a collection and normalize it, logging every dropped element
    pub(crate) async fn fetch_list(
        &self,
        path: &str,
        kind: ContainerKind,
        options: NormalizeOptions,
        label: &str,
    ) -> Result<Vec<CanonicalRecord>> {
        let response = self.transport.request(Method::Get, path, None).await?;
        self.transport.handle_status(response.status, label)?;

        let output = normalize_list(&response.body, kind, options)?;
        for dropped in &output.dropped {
            log::warn!(
                "Skipped {} #{} while {}: {}",
                kind.label(),
                dropped.index,
                label,
                dropped.reason
            );
        }

        Ok(output.records)
    }

    /// POST a `displayName` payload and normalize the created entity
    pub(crate) async fn send_create(
        &self,
        path: &str,
        kind: ContainerKind,
        name: &str,
        label: &str,
    ) -> Result<CanonicalRecord> {
        let payload = serde_json::json!({ "displayName": name.trim() });

        let response = self
            .transport
            .request(Method::Post, path, Some(&payload))
            .await?;
        self.transport.handle_status(response.status, label)?;

        normalize_created(&response.body, kind)
    }
}

impl Organizer<GraphTransport> {
    /// Build an organizer from the environment plus CLI overrides
    pub fn from_global(global: &crate::Global) -> color_eyre::eyre::Result<Self> {
        let config = GraphConfig::from_env()?.with_overrides(global.base_url.clone());
        let patterns = config.pattern_tier()?;
        let transport = GraphTransport::new(&config)?;

        Ok(Self::new(transport).with_patterns(patterns))
    }
}
