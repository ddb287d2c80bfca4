// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # driftcheck
//!
//! Detects configuration drift between declared resource manifests and the
//! objects a live store actually holds.
//!
//! ## Overview
//!
//! For every declared resource, driftcheck fetches its live counterpart,
//! renders both as canonical JSON text and prints a line diff:
//!
//! - Resources are processed in a fixed order, so the report is stable
//! - `subset` mode masks server-populated fields before comparing
//! - Secret values can be redacted from the report
//! - The exit code tells clean runs (0), drift (10) and failures (1) apart
//!
//! ## Modules
//!
//! - [`config`]: Settings, environment overrides, manifest loading
//! - [`resource`]: Resource identity, ordering and kind naming
//! - [`live`]: Live stores (exported snapshot, HTTP API)
//! - [`diff`]: Masking, canonical text, line diff, rendering, classification
//! - [`runner`]: Ordered run over all resources and report output
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! strategy: subset
//! omit_secrets: true
//! default_namespace: staging
//! server:
//!   url: https://cluster.example.com:6443
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod live;
pub mod resource;
pub mod runner;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{DiffSettings, DiffStrategy, ManifestLoader, SettingsParser, SettingsValidator};
pub use diff::{Classification, CompareOptions, Comparator, ComparisonResult, Outcome};
pub use error::{DriftError, Result};
pub use live::{ApiStore, LiveStore, SnapshotStore};
pub use resource::{KindNamer, Resource, ResourceId};
pub use runner::{DiffReport, DiffRunner, RunOutcome};
