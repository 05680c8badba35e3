//! Reflective stub extraction.
//!
//! Walks an export registry and writes a `.pyi` stub package: one
//! `__init__.pyi` and one `__init__.py` re-export shim per module, plus a
//! `py.typed` marker at the package root. Members whose documentation does
//! not follow the structured format degrade to untyped placeholders; the
//! pass continues and the failures are reported.

use crate::docs::{MemberDoc, parse_member_doc, split_variant_docs};
use crate::keywords::{escape_declaration, escape_name, is_keyword};
use crate::registry::{ExportedMember, ExportedType, Introspect, MemberKind, ModuleStyle};
use owlgen_core::{ExtractError, ReflectionFormatError, StubSection};
use std::path::{Path, PathBuf};

/// Underscore-prefixed members the binding implements and stubs keep.
pub const VISIBLE_MAGIC: &[&str] = &[
    "__getitem__",
    "__setitem__",
    "__delitem__",
    "__iter__",
    "__contains__",
    "__len__",
    "__invert__",
    "__and__",
    "__or__",
];

const REFLECTIVE_HEADER: &str =
    "import typing\nfrom typing import *\nfrom typing_extensions import deprecated\n\n";

const HOOKED_HEADER: &str =
    "import typing\nfrom typing import (Any)\nfrom typing_extensions import deprecated\n\n";

const INDENT: &str = "    ";

/// Whether a member shows up in stubs.
pub fn is_visible(name: &str) -> bool {
    !name.starts_with('_') || VISIBLE_MAGIC.contains(&name)
}

/// Where and under which names the stub package is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubOptions {
    /// Directory that receives the package directory
    pub output_dir: PathBuf,

    /// Python package name
    pub package: String,

    /// Compiled extension module inside the package
    pub native_module: String,
}

impl StubOptions {
    pub fn new(output_dir: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        let package = package.into();
        Self {
            output_dir: output_dir.into(),
            native_module: package.clone(),
            package,
        }
    }

    pub fn with_native_module(mut self, native_module: impl Into<String>) -> Self {
        self.native_module = native_module.into();
        self
    }

    pub fn from_config(section: &StubSection) -> Self {
        Self {
            output_dir: section.output_dir.clone(),
            package: section.package.clone(),
            native_module: section.native_module.clone(),
        }
    }

    /// Root directory of the stub package.
    pub fn package_dir(&self) -> PathBuf {
        self.output_dir.join(&self.package)
    }
}

/// Outcome of an extraction pass.
#[derive(Debug, Default)]
pub struct ExtractReport {
    /// Files written, in write order
    pub files: Vec<PathBuf>,

    /// Stale `__init__` files removed before writing
    pub cleared: usize,

    /// Members that fell back to untyped placeholders
    pub degraded: Vec<ReflectionFormatError>,
}

impl ExtractReport {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// Writes stub packages from an export registry.
pub struct StubExtractor {
    options: StubOptions,
}

impl StubExtractor {
    pub fn new(options: StubOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StubOptions {
        &self.options
    }

    /// Write the stub package for `root`, the compiled extension module.
    pub fn extract(&self, root: &dyn Introspect) -> Result<ExtractReport, ExtractError> {
        let package_dir = self.options.package_dir();
        let mut report = ExtractReport {
            cleared: clear_stale(&package_dir)?,
            ..ExtractReport::default()
        };
        if report.cleared > 0 {
            tracing::debug!(dir = %package_dir.display(), count = report.cleared, "cleared stale stub files");
        }

        create_dir(&package_dir)?;
        let marker = package_dir.join("py.typed");
        write_file(&marker, "", &mut report)?;

        self.extract_module(root, &[], &mut report)?;

        tracing::info!(
            package = %self.options.package,
            files = report.files.len(),
            degraded = report.degraded.len(),
            "stub package written"
        );
        Ok(report)
    }

    fn extract_module(
        &self,
        module: &dyn Introspect,
        path: &[&str],
        report: &mut ExtractReport,
    ) -> Result<(), ExtractError> {
        let dir = path
            .iter()
            .fold(self.options.package_dir(), |dir, part| dir.join(part));
        create_dir(&dir)?;

        let shim = self.render_shim(module, path);
        write_file(&dir.join("__init__.py"), &shim, report)?;

        let stub = self.render_stub(module, path, &mut report.degraded);
        write_file(&dir.join("__init__.pyi"), &stub, report)?;

        for submodule in module.submodules() {
            let mut child = path.to_vec();
            child.push(submodule.module_name());
            self.extract_module(submodule, &child, report)?;
        }
        Ok(())
    }

    /// Re-export shim (`__init__.py`) of one module.
    pub fn render_shim(&self, module: &dyn Introspect, path: &[&str]) -> String {
        let mut out = String::new();

        let Some((top, _)) = path.split_first() else {
            let names: Vec<&str> = module
                .exported_types()
                .iter()
                .map(|t| t.name.as_str())
                .chain(module.exported_functions().iter().map(|f| f.name.as_str()))
                .collect();

            out.push_str("from __future__ import annotations\n");
            if !names.is_empty() {
                out.push_str(&format!(
                    "from .{} import {}\n",
                    self.options.native_module,
                    names.join(", ")
                ));
            }
            out.push('\n');
            out.push_str(&format!("__all__ = [{}]\n", quoted_list(&names)));
            return out;
        };

        let dots = ".".repeat(path.len() + 1);
        let qualified = path.join(".");
        let names: Vec<&str> = module
            .exported_types()
            .iter()
            .map(|t| t.name.as_str())
            .chain(module.exported_aliases().iter().map(|a| a.name.as_str()))
            .collect();

        out.push_str(&format!(
            "from {dots}{} import {top}\nimport typing\n\n",
            self.options.native_module
        ));
        for name in &names {
            out.push_str(&format!("{name} = {qualified}.{name}\n"));
        }
        out.push('\n');
        out.push_str(&format!("__all__ = [{}]\n", quoted_list(&names)));
        out
    }

    /// Interface stub (`__init__.pyi`) of one module.
    ///
    /// Members that fall back to placeholders are appended to `degraded`.
    pub fn render_stub(
        &self,
        module: &dyn Introspect,
        path: &[&str],
        degraded: &mut Vec<ReflectionFormatError>,
    ) -> String {
        let mut out = String::new();

        match module.style() {
            ModuleStyle::Reflective => {
                out.push_str(REFLECTIVE_HEADER);
                let submodules = module.submodules();
                for submodule in &submodules {
                    out.push_str(&format!("from . import {}\n", submodule.module_name()));
                }
                if !submodules.is_empty() {
                    out.push('\n');
                }

                for ty in module.exported_types() {
                    render_reflective_type(&mut out, ty, degraded);
                    out.push('\n');
                }
            }
            ModuleStyle::Hooked => {
                out.push_str(HOOKED_HEADER);
                for ty in module.exported_types() {
                    render_hooked_type(&mut out, ty, degraded);
                    out.push('\n');
                }
            }
        }

        for function in module.exported_functions() {
            if is_visible(&function.name) {
                render_function(&mut out, function, degraded);
            }
        }

        // Alias values are captured fully qualified; stubs refer to siblings.
        let prefix = match path {
            [] => format!("{}.", self.options.package),
            _ => format!("{}.{}.", self.options.package, path.join(".")),
        };
        for alias in module.exported_aliases() {
            let value = alias.value.replace(&prefix, "");
            out.push_str(&format!("{} = {}\n", alias.name, value));
        }
        if !module.exported_aliases().is_empty() {
            out.push('\n');
        }

        out
    }
}

fn render_reflective_type(
    out: &mut String,
    ty: &ExportedType,
    degraded: &mut Vec<ReflectionFormatError>,
) {
    out.push_str(&format!("class {}:\n", ty.name));
    let body_start = out.len();

    let split = split_variant_docs(ty.doc.as_deref().unwrap_or_default(), ty.variant_names());
    if split.lines.iter().any(|line| !line.trim().is_empty()) {
        push_docstring(out, INDENT, split.lines.iter().map(String::as_str));
    }

    for member in ty.members.iter().filter(|m| is_visible(&m.name)) {
        match &member.kind {
            MemberKind::Value(type_name) => {
                let annotation = if *type_name == ty.name {
                    "typing.Self"
                } else {
                    type_name.as_str()
                };
                out.push_str(&format!(
                    "{INDENT}{}: {annotation}\n",
                    escape_name(&member.name)
                ));

                let doc = split
                    .variants
                    .get(&member.name)
                    .map(String::as_str)
                    .or(member.doc.as_deref());
                if let Some(doc) = doc {
                    push_docstring(out, INDENT, doc.lines());
                }
            }
            MemberKind::Method | MemberKind::Attribute => {
                match parse_member_doc(&member.name, member.doc.as_deref()) {
                    Ok(doc) => render_member(out, &member.kind, &doc),
                    Err(err) => {
                        tracing::warn!(class = %ty.name, member = %member.name, error = %err, "degraded stub member");
                        render_placeholder(out, member);
                        degraded.push(err);
                    }
                }
            }
        }
    }

    if out.len() == body_start {
        out.push_str(&format!("{INDENT}...\n"));
    }
}

fn render_hooked_type(
    out: &mut String,
    ty: &ExportedType,
    degraded: &mut Vec<ReflectionFormatError>,
) {
    let Some(hook) = &ty.stub_hook else {
        out.push_str(&format!("class {}:\n", ty.name));
        for member in &ty.members {
            if member.name.starts_with('_') || is_keyword(&member.name) {
                continue;
            }
            out.push_str(&format!("{INDENT}{}: typing.Any\n", member.name));
        }
        out.push_str(&format!("{INDENT}...\n"));
        return;
    };

    out.push_str(&escape_declaration(hook));
    if !hook.ends_with('\n') {
        out.push('\n');
    }

    let methods = ty
        .members
        .iter()
        .filter(|m| m.kind.is_callable() && is_visible(&m.name) && m.doc.is_some());
    for member in methods {
        match parse_member_doc(&member.name, member.doc.as_deref()) {
            Ok(doc) => render_member(out, &member.kind, &doc),
            Err(err) => {
                tracing::warn!(class = %ty.name, member = %member.name, error = %err, "degraded stub member");
                render_placeholder(out, member);
                degraded.push(err);
            }
        }
    }
}

fn render_member(out: &mut String, kind: &MemberKind, doc: &MemberDoc) {
    for annotation in &doc.annotations {
        out.push_str(&format!("{INDENT}{annotation}\n"));
    }

    let signature = escape_declaration(&doc.signature);
    if kind.is_callable() {
        out.push_str(&format!("{INDENT}def {signature}:\n"));
        push_docstring(out, "        ", doc.body.iter().map(String::as_str));
        out.push_str("        ...\n\n");
    } else {
        out.push_str(&format!("{INDENT}{signature}\n"));
        push_docstring(out, INDENT, doc.body.iter().map(String::as_str));
        out.push('\n');
    }
}

fn render_placeholder(out: &mut String, member: &ExportedMember) {
    let name = escape_name(&member.name);
    if member.kind.is_callable() {
        out.push_str(&format!(
            "{INDENT}def {name}(self, *args, **kwargs) -> typing.Any: ...\n\n"
        ));
    } else {
        out.push_str(&format!("{INDENT}{name}: typing.Any\n\n"));
    }
}

fn render_function(
    out: &mut String,
    function: &ExportedMember,
    degraded: &mut Vec<ReflectionFormatError>,
) {
    match parse_member_doc(&function.name, function.doc.as_deref()) {
        Ok(doc) => {
            for annotation in &doc.annotations {
                out.push_str(&format!("{annotation}\n"));
            }
            out.push_str(&format!("def {}:\n", escape_declaration(&doc.signature)));
            push_docstring(out, INDENT, doc.body.iter().map(String::as_str));
            out.push_str(&format!("{INDENT}...\n\n"));
        }
        Err(err) => {
            tracing::warn!(function = %function.name, error = %err, "degraded stub function");
            out.push_str(&format!(
                "def {}(*args, **kwargs) -> typing.Any: ...\n\n",
                escape_name(&function.name)
            ));
            degraded.push(err);
        }
    }
}

fn push_docstring<'a>(out: &mut String, indent: &str, lines: impl IntoIterator<Item = &'a str>) {
    out.push_str(&format!("{indent}\"\"\"\n"));
    for line in lines {
        if line.trim().is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("{indent}{line}\n"));
        }
    }
    out.push_str(&format!("{indent}\"\"\"\n"));
}

fn quoted_list(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Remove generated `__init__.py` / `__init__.pyi` files below `dir`.
fn clear_stale(dir: &Path) -> Result<usize, ExtractError> {
    if !dir.is_dir() {
        return Ok(0);
    }

    let io_err = |source: std::io::Error| ExtractError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut removed = 0;
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            removed += clear_stale(&path)?;
            continue;
        }

        let generated = matches!(
            path.file_name().and_then(|n| n.to_str()),
            Some("__init__.py" | "__init__.pyi")
        );
        if generated {
            std::fs::remove_file(&path).map_err(|source| ExtractError::Io {
                path: path.clone(),
                source,
            })?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn create_dir(dir: &Path) -> Result<(), ExtractError> {
    std::fs::create_dir_all(dir).map_err(|source| ExtractError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, content: &str, report: &mut ExtractReport) -> Result<(), ExtractError> {
    std::fs::write(path, content).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = content.len(), "wrote stub file");
    report.files.push(path.to_path_buf());
    Ok(())
}

#[cfg(test)]
#[path = "extractor/extractor_tests.rs"]
mod extractor_tests;
