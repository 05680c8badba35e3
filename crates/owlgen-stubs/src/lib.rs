//! owlgen-stubs - Python interface stubs from a binding's export registry
//!
//! The compiled binding module describes its exports in an
//! [`ExportRegistry`]; the [`StubExtractor`] turns that description into a
//! typed `.pyi` package:
//!
//! ```text
//! <package>/
//!   py.typed
//!   __init__.py      re-export shim
//!   __init__.pyi     classes, members, functions
//!   model/
//!     __init__.py
//!     __init__.pyi   hooked classes and type aliases
//! ```
//!
//! Member signatures come from structured documentation (see [`docs`]).
//!
//! # Example
//!
//! ```no_run
//! use owlgen_stubs::{ExportRegistry, StubExtractor, StubOptions};
//!
//! let registry = ExportRegistry::from_file("target/owlgen/exports.json")?;
//! let report = StubExtractor::new(StubOptions::new(".", "pyhornedowl")).extract(&registry.root)?;
//!
//! for degraded in &report.degraded {
//!     eprintln!("untyped member: {degraded}");
//! }
//! # Ok::<(), owlgen_core::ExtractError>(())
//! ```

pub mod docs;
pub mod extractor;
pub mod keywords;
pub mod registry;

pub use extractor::{ExtractReport, StubExtractor, StubOptions};
pub use registry::{
    ExportRegistry, Exported, ExportedMember, ExportedModule, ExportedType, Introspect, MemberKind,
    ModuleStyle, TypeAlias,
};
