//! Core library for nbtools
//!
//! This crate implements the **Functional Core** of the nbtools application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`nbtools_core`** (this crate): identifier and name validation, container
//!   kind classification, hierarchy rules, endpoint building and response
//!   normalization. Zero I/O.
//! - **`nbtools`**: the HTTP transport, probe execution, orchestration, CLI and
//!   MCP server (the Imperative Shell).
//!
//! ## Functional Core Principles
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no logging, no global state
//! - **Testable**: Fixture JSON in, records or typed errors out
//!
//! # Module Organization
//!
//! - [`error`]: The error taxonomy shared with the shell
//! - [`onenote`]: Notebooks, section groups and sections
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use nbtools_core::onenote::{normalize_list, ContainerKind, NormalizeOptions};
//!
//! let payload = br#"{"value": [{"id": "0-1", "displayName": "Inbox"}]}"#;
//! let output = normalize_list(payload, ContainerKind::Section, NormalizeOptions::filtered())?;
//!
//! assert_eq!(output.records.len(), 1);
//! assert_eq!(output.records[0].display_name, "Inbox");
//! ```

pub mod error;
pub mod onenote;

pub use error::{Error, Result, StatusClass};
