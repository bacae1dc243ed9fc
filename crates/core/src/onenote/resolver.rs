//! Container type resolution, pure half
//!
//! Resolution is two-tier. The pattern tier inspects the identifier and
//! either classifies it with confidence or answers `Unknown`. The probe tier
//! (driven by the shell) requests each entity endpoint in [`PROBE_ORDER`] and
//! takes the first success. This module owns the pattern tier, the probe
//! plan, and the terminal not-found error.

use regex::Regex;
use serde::Serialize;

use super::endpoints::entity_path;
use super::model::{ContainerId, ContainerKind};
use crate::error::{Error, Result, StatusClass};

/// Kinds probed, in order, when the pattern tier is inconclusive
pub const PROBE_ORDER: [ContainerKind; 3] = [
    ContainerKind::Notebook,
    ContainerKind::SectionGroup,
    ContainerKind::Section,
];

/// A single pattern-tier rule
#[derive(Debug, Clone)]
pub enum PatternRule {
    /// Explicit kind hint such as `section:0-ABC`. The prefix is stripped
    /// from the identifier and matched case-insensitively.
    Hint {
        prefix: &'static str,
        kind: ContainerKind,
    },
    /// Identifier shape known to belong to one kind on this tenant
    Shape { regex: Regex, kind: ContainerKind },
}

impl PatternRule {
    /// Compile a shape rule. Only resolved kinds are accepted.
    pub fn shape(pattern: &str, kind: ContainerKind) -> Result<Self> {
        if !kind.is_resolved() {
            return Err(Error::InvalidArgument(format!(
                "pattern rules must target a notebook, section group or section, not an {}",
                kind.label()
            )));
        }

        let regex = Regex::new(pattern).map_err(|e| {
            Error::InvalidArgument(format!("invalid identifier pattern '{pattern}': {e}"))
        })?;

        Ok(Self::Shape { regex, kind })
    }

    fn kind(&self) -> ContainerKind {
        match self {
            Self::Hint { kind, .. } | Self::Shape { kind, .. } => *kind,
        }
    }

    /// Returns the (possibly stripped) identifier when the rule matches
    fn apply<'a>(&self, id: &'a str) -> Option<&'a str> {
        match self {
            Self::Hint { prefix, .. } => {
                let head = id.get(..prefix.len())?;
                head.eq_ignore_ascii_case(prefix)
                    .then(|| &id[prefix.len()..])
            }
            Self::Shape { regex, .. } => regex.is_match(id).then_some(id),
        }
    }
}

/// Where a resolved kind came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Pattern,
    Probe,
}

/// Outcome of the pattern tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub kind: ContainerKind,
    /// Identifier to use from here on, with any hint prefix removed
    pub id: ContainerId,
}

/// Ordered rule table for the pattern tier
#[derive(Debug, Clone)]
pub struct PatternTier {
    rules: Vec<PatternRule>,
}

impl Default for PatternTier {
    fn default() -> Self {
        Self {
            rules: vec![
                PatternRule::Hint {
                    prefix: "notebook:",
                    kind: ContainerKind::Notebook,
                },
                PatternRule::Hint {
                    prefix: "sectionGroup:",
                    kind: ContainerKind::SectionGroup,
                },
                PatternRule::Hint {
                    prefix: "section:",
                    kind: ContainerKind::Section,
                },
            ],
        }
    }
}

impl PatternTier {
    /// A tier that never matches; every identifier goes to the probe tier
    pub fn disabled() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = PatternRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Classify an identifier by its shape.
    ///
    /// An explicit hint wins outright and is stripped from the identifier. A
    /// hint that leaves an empty identifier behind fails with
    /// `InvalidArgument`. Otherwise shape rules decide; the answer is
    /// `Unknown` when none matches or when matching rules disagree on kind.
    pub fn classify(&self, id: &ContainerId) -> Result<PatternMatch> {
        let hinted = self
            .rules
            .iter()
            .filter(|rule| matches!(rule, PatternRule::Hint { .. }))
            .find_map(|rule| rule.apply(id.as_str()).map(|rest| (rule.kind(), rest)));

        if let Some((kind, rest)) = hinted {
            return Ok(PatternMatch {
                kind,
                id: ContainerId::parse(rest, "container_id")?,
            });
        }

        let mut kinds = self
            .rules
            .iter()
            .filter(|rule| matches!(rule, PatternRule::Shape { .. }))
            .filter(|rule| rule.apply(id.as_str()).is_some())
            .map(PatternRule::kind);

        let kind = match kinds.next() {
            None => ContainerKind::Unknown,
            Some(first) => {
                if kinds.all(|other| other == first) {
                    first
                } else {
                    ContainerKind::Unknown
                }
            }
        };

        Ok(PatternMatch {
            kind,
            id: id.clone(),
        })
    }
}

/// Parse extra shape rules from `kind=regex` entries separated by `;`.
///
/// Used for tenant-specific identifier shapes supplied through configuration.
/// Empty entries are ignored.
pub fn parse_pattern_rules(rules: &str) -> Result<Vec<PatternRule>> {
    rules.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (kind, pattern) = entry.split_once('=').ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "pattern rule '{entry}' must look like kind=regex"
                ))
            })?;
            PatternRule::shape(pattern.trim(), ContainerKind::from_name(kind))
        })
        .collect()
}

/// One request of the probe tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeStep {
    pub kind: ContainerKind,
    pub path: String,
}

/// The probe requests for an identifier, in [`PROBE_ORDER`]
pub fn probe_plan(id: &ContainerId) -> Result<Vec<ProbeStep>> {
    PROBE_ORDER
        .iter()
        .map(|&kind| {
            Ok(ProbeStep {
                kind,
                path: entity_path(kind, id)?,
            })
        })
        .collect()
}

/// Error returned when no probe succeeded.
///
/// `statuses` are the probe answers in order. When any of them was an auth
/// rejection, the message names that status.
pub fn unresolved_error(id: &ContainerId, statuses: &[u16]) -> Error {
    let message =
        format!("container ID '{id}' is not a valid notebook, section group, or section");

    let rejected = statuses
        .iter()
        .find(|&&status| StatusClass::from_status(status) == Some(StatusClass::Auth));

    match rejected {
        Some(status) => Error::NotFound(format!(
            "{message} (probes were rejected with status {status}; check that the access token is valid)"
        )),
        None => Error::NotFound(message),
    }
}

/// Display name from a successful probe body, if it carries one
pub fn probed_display_name(raw: &[u8]) -> Option<String> {
    let payload: serde_json::Value = serde_json::from_slice(raw).ok()?;
    payload
        .get("displayName")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ContainerId {
        ContainerId::parse(raw, "container_id").unwrap()
    }

    #[test]
    fn test_probe_order_is_notebook_group_section() {
        let plan = probe_plan(&id("0-ABC")).unwrap();
        let kinds: Vec<_> = plan.iter().map(|s| s.kind).collect();

        assert_eq!(
            kinds,
            vec![
                ContainerKind::Notebook,
                ContainerKind::SectionGroup,
                ContainerKind::Section
            ]
        );
        assert_eq!(plan[0].path, "/me/onenote/notebooks/0-ABC");
        assert_eq!(plan[2].path, "/me/onenote/sections/0-ABC");
    }

    #[test]
    fn test_plain_identifier_is_unknown() {
        let tier = PatternTier::default();
        let result = tier.classify(&id("1-9a8b7c!42-aa")).unwrap();

        assert_eq!(result.kind, ContainerKind::Unknown);
        assert_eq!(result.id.as_str(), "1-9a8b7c!42-aa");
    }

    #[test]
    fn test_hint_prefix_is_classified_and_stripped() {
        let tier = PatternTier::default();

        let nb = tier.classify(&id("notebook:0-NB")).unwrap();
        assert_eq!(nb.kind, ContainerKind::Notebook);
        assert_eq!(nb.id.as_str(), "0-NB");

        let sg = tier.classify(&id("SectionGroup:0-SG")).unwrap();
        assert_eq!(sg.kind, ContainerKind::SectionGroup);
        assert_eq!(sg.id.as_str(), "0-SG");

        let s = tier.classify(&id("section:0-S")).unwrap();
        assert_eq!(s.kind, ContainerKind::Section);
        assert_eq!(s.id.as_str(), "0-S");
    }

    #[test]
    fn test_hint_with_empty_remainder_fails() {
        let err = PatternTier::default()
            .classify(&id("notebook:"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_conflicting_shapes_are_unknown() {
        let tier = PatternTier::disabled().with_rules(vec![
            PatternRule::shape("^nb-", ContainerKind::Notebook).unwrap(),
            PatternRule::shape("-x$", ContainerKind::Section).unwrap(),
        ]);

        assert_eq!(
            tier.classify(&id("nb-1")).unwrap().kind,
            ContainerKind::Notebook
        );
        assert_eq!(
            tier.classify(&id("nb-1-x")).unwrap().kind,
            ContainerKind::Unknown
        );
    }

    #[test]
    fn test_hint_wins_over_disagreeing_shape() {
        let tier = PatternTier::default()
            .with_rules(vec![PatternRule::shape("nb-", ContainerKind::SectionGroup).unwrap()]);

        let result = tier.classify(&id("notebook:nb-x")).unwrap();

        assert_eq!(result.kind, ContainerKind::Notebook);
        assert_eq!(result.id.as_str(), "nb-x");
        assert_eq!(
            tier.classify(&id("nb-x")).unwrap().kind,
            ContainerKind::SectionGroup
        );
    }

    #[test]
    fn test_disabled_tier_never_matches() {
        let result = PatternTier::disabled()
            .classify(&id("notebook:0-NB"))
            .unwrap();
        assert_eq!(result.kind, ContainerKind::Unknown);
    }

    #[test]
    fn test_parse_pattern_rules() {
        let rules = parse_pattern_rules("notebook=^nb-; sectionGroup=^sg-;;").unwrap();
        assert_eq!(rules.len(), 2);

        assert!(parse_pattern_rules("notebook").is_err());
        assert!(parse_pattern_rules("page=^p-").is_err());
        assert!(parse_pattern_rules("section=(").is_err());
    }

    #[test]
    fn test_unresolved_error_message() {
        let err = unresolved_error(&id("0-X"), &[404, 404, 404]);
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err
            .to_string()
            .contains("is not a valid notebook, section group, or section"));
        assert!(!err.to_string().contains("access token"));
    }

    #[test]
    fn test_unresolved_error_mentions_auth_rejection() {
        let err = unresolved_error(&id("0-X"), &[401, 401, 404]);

        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("status 401"));
        assert!(err.to_string().contains("access token"));
    }

    #[test]
    fn test_probed_display_name() {
        assert_eq!(
            probed_display_name(br#"{"id": "nb-1", "displayName": " Work "}"#),
            Some("Work".to_string())
        );
        assert_eq!(probed_display_name(br#"{"id": "nb-1", "displayName": 3}"#), None);
        assert_eq!(probed_display_name(b"not json"), None);
    }
}
