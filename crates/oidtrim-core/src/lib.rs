//! # oidtrim-core
//!
//! A library for trimming OpenSSL's object identifier tables down to a
//! whitelisted subset for size-constrained firmware builds.
//!
//! This crate provides the core functionality for:
//! - Renumbering whitelisted objects while keeping their upstream order
//! - Regenerating `obj_mac.h` and `obj_dat.h` from the trimmed numbering
//! - Backfilling removed symbols with `NID_undef`/`SN_undef` placeholders
//! - Publishing normalized (CRLF, tab-free) artifacts
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`invoker`]: Running the upstream generator scripts
//! - [`numbering`]: Numbering tables and renumbering
//! - [`generator`]: Header and lookup table regeneration
//! - [`compat`]: Merging compatibility aliases
//! - [`backfill`]: Placeholder definitions for removed symbols
//! - [`materialize`]: Normalizing and publishing artifacts
//! - [`pipeline`]: The end-to-end run
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use oidtrim_core::{Layout, Pipeline, ProcessInvoker};
//!
//! let layout = Layout::new("CryptoPkg/Library/OpensslLib/OpensslStub");
//! let report = Pipeline::new(layout, ProcessInvoker::new()).run()?;
//!
//! for artifact in &report.artifacts {
//!     println!("{}", artifact.path.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Extensibility
//!
//! The [`Invoker`] trait decides how generator commands are executed, which
//! lets tests replace the upstream scripts with an in-process fake.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod backfill;
pub mod compat;
pub mod error;
pub mod generator;
pub mod invoker;
pub mod layout;
pub mod materialize;
pub mod numbering;
pub mod pipeline;
pub mod scratch;

// Re-export primary types for convenience
pub use backfill::{backfill, Backfill};
pub use error::{Error, Result};
pub use generator::{GenerationMode, Generator};
pub use invoker::{Invocation, InvocationOutput, Invoker, ProcessInvoker};
pub use layout::Layout;
pub use numbering::{renumber, NumberingTable, OidEntry};
pub use pipeline::{Artifact, ArtifactKind, Pipeline, RunReport};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
