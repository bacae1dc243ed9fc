//! Notebook service transformations (notebooks, section groups, sections)
//!
//! Everything here is free of I/O. The shell crate supplies the transport
//! and drives the probe tier; this module decides what to request, whether
//! a request is allowed, and how to read the answer.

pub mod endpoints;
pub mod model;
pub mod normalize;
pub mod policy;
pub mod resolver;
pub mod validation;

pub use model::{
    CanonicalRecord, ChildCollection, ContainerId, ContainerKind, Parent, ParentRef,
    SectionGroupNode,
};
pub use normalize::{
    normalize_created, normalize_list, ListNormalization, MissingCollection, NormalizeOptions,
    Projection,
};
pub use policy::{ensure_allowed, is_allowed, Operation};
pub use resolver::{PatternTier, ResolutionSource, PROBE_ORDER};
pub use validation::{sanitize_identifier, validate_display_name};
