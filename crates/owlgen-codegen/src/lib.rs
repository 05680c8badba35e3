//! owlgen-codegen - Schema-driven model and type-stub generation
//!
//! One schema document drives two artifacts:
//! - native Rust struct/enum declarations used by the binding layer
//! - Python stub declarations used as input for the interface stubs
//!
//! # Architecture
//!
//! ```text
//! model.json
//!     ↓
//!  [Schema Loader]
//!     ↓
//!  ModelSchema ──→ [Name Resolver] ──┐
//!     ↓                              ↓
//!  [Template Renderer] ← filters ← [Type Mapper]
//!     ↓
//!  [Output Emitter] → model_generated.rs, model.pyi.in
//! ```
//!
//! Generation is a pure function of the schema and the template set:
//! rendering the same inputs twice yields byte-identical artifacts.
//!
//! # Example
//!
//! ```
//! use owlgen_codegen::render::{RenderOptions, TemplateSet};
//! use owlgen_codegen::{ModelSchema, build_artifacts};
//!
//! let schema = ModelSchema::from_json(
//!     r#"[{"name": "Point", "kind": "struct", "fields": {"x": "u32", "y": "u32"}}]"#,
//! )?;
//! let artifacts = build_artifacts(&schema, &TemplateSet::builtin(), &RenderOptions::default())?;
//!
//! assert!(artifacts.native.contains("pub struct Point {"));
//! assert!(artifacts.stub.contains("class Point:"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod emit;
pub mod filters;
pub mod naming;
pub mod pipeline;
pub mod render;
pub mod schema;
pub mod types;

pub use pipeline::{
    Artifacts, GenerateOptions, GenerateSummary, build_artifacts, generate, stub_hooks,
    verify_native,
};
pub use render::{RenderedEntry, Renderer};
pub use schema::{EntryKind, FieldSet, FieldSpec, ModelEntry, ModelSchema, TypeRef, WrapperKind};
pub use types::Target;
