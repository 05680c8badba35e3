//! Export registry of a binding module.
//!
//! The registry is a static description of everything the compiled binding
//! module exports: classes, their members, module-level functions, type
//! aliases and submodules. The binding build step writes it as a JSON export
//! manifest; tests and build scripts can also assemble it in code.

use owlgen_core::ExtractError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the stubs of a module are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStyle {
    /// Every member is declared from its structured documentation.
    #[default]
    Reflective,

    /// Types provide a pre-rendered stub hook; others get a fallback class.
    Hooked,
}

/// What a member is, as far as stubs are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// Callable member
    Method,

    /// Data member (property or getter/setter pair)
    Attribute,

    /// Class-level constant holding an instance of the named type
    Value(String),
}

impl MemberKind {
    pub fn is_callable(&self) -> bool {
        matches!(self, MemberKind::Method)
    }

    /// Type of the held instance, for class-level constants.
    pub fn instance_of(&self) -> Option<&str> {
        match self {
            MemberKind::Value(type_name) => Some(type_name),
            _ => None,
        }
    }
}

/// A member of an exported type, or a module-level function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedMember {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    pub kind: MemberKind,
}

impl ExportedMember {
    pub fn method(name: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: Some(doc.into()),
            kind: MemberKind::Method,
        }
    }

    pub fn attribute(name: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: Some(doc.into()),
            kind: MemberKind::Attribute,
        }
    }

    pub fn value(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            kind: MemberKind::Value(type_name.into()),
        }
    }

    /// Same member without documentation.
    pub fn undocumented(mut self) -> Self {
        self.doc = None;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// An exported class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedType {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<ExportedMember>,

    /// Pre-rendered stub declaration for the type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stub_hook: Option<String>,
}

impl ExportedType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            members: Vec::new(),
            stub_hook: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_member(mut self, member: ExportedMember) -> Self {
        self.members.push(member);
        self
    }

    /// Add a class-level constant holding an instance of this type.
    pub fn with_variant(mut self, name: impl Into<String>) -> Self {
        let member = ExportedMember::value(name, self.name.clone());
        self.members.push(member);
        self
    }

    pub fn with_stub_hook(mut self, hook: impl Into<String>) -> Self {
        self.stub_hook = Some(hook.into());
        self
    }

    /// Names of the members that are instances of this type.
    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.members
            .iter()
            .filter(|m| m.kind.instance_of() == Some(self.name.as_str()))
            .map(|m| m.name.as_str())
    }
}

/// A type alias such as `ClassExpression = typing.Union[...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAlias {
    pub name: String,
    pub value: String,
}

/// Implemented by binding types that describe their own exports.
pub trait Exported {
    fn export() -> ExportedType;
}

/// An exported module and everything below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedModule {
    pub name: String,

    #[serde(default)]
    pub style: ModuleStyle,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<ExportedType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<ExportedMember>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<TypeAlias>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submodules: Vec<ExportedModule>,
}

impl ExportedModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            style: ModuleStyle::default(),
            types: Vec::new(),
            functions: Vec::new(),
            aliases: Vec::new(),
            submodules: Vec::new(),
        }
    }

    pub fn with_style(mut self, style: ModuleStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_type(mut self, ty: ExportedType) -> Self {
        self.types.push(ty);
        self
    }

    /// Add a type that describes itself through [`Exported`].
    pub fn with_exported<T: Exported>(self) -> Self {
        self.with_type(T::export())
    }

    pub fn with_function(mut self, function: ExportedMember) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_alias(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.aliases.push(TypeAlias {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_submodule(mut self, module: ExportedModule) -> Self {
        self.submodules.push(module);
        self
    }

    /// Find a module by dotted path relative to this one, e.g. `model`.
    pub fn find(&self, path: &str) -> Option<&ExportedModule> {
        let mut current = self;
        for part in path.split('.').filter(|p| !p.is_empty()) {
            current = current.submodules.iter().find(|m| m.name == part)?;
        }
        Some(current)
    }

    fn find_mut(&mut self, path: &str) -> Option<&mut ExportedModule> {
        let mut current = self;
        for part in path.split('.').filter(|p| !p.is_empty()) {
            current = current.submodules.iter_mut().find(|m| m.name == part)?;
        }
        Some(current)
    }
}

/// Query interface over exported modules.
///
/// The stub extractor only sees modules through this trait.
pub trait Introspect {
    fn module_name(&self) -> &str;

    fn style(&self) -> ModuleStyle;

    fn exported_types(&self) -> &[ExportedType];

    fn exported_functions(&self) -> &[ExportedMember];

    fn exported_aliases(&self) -> &[TypeAlias];

    fn submodules(&self) -> Vec<&dyn Introspect>;
}

impl Introspect for ExportedModule {
    fn module_name(&self) -> &str {
        &self.name
    }

    fn style(&self) -> ModuleStyle {
        self.style
    }

    fn exported_types(&self) -> &[ExportedType] {
        &self.types
    }

    fn exported_functions(&self) -> &[ExportedMember] {
        &self.functions
    }

    fn exported_aliases(&self) -> &[TypeAlias] {
        &self.aliases
    }

    fn submodules(&self) -> Vec<&dyn Introspect> {
        self.submodules
            .iter()
            .map(|m| m as &dyn Introspect)
            .collect()
    }
}

/// The export manifest of a binding module.
///
/// Serialized as its root module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportRegistry {
    /// The compiled extension module
    pub root: ExportedModule,
}

impl ExportRegistry {
    pub fn new(root: ExportedModule) -> Self {
        Self { root }
    }

    /// Load an export manifest written by the binding build step.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ExtractError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;

        let registry = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), module = %registry.root.name, "loaded export manifest");
        Ok(registry)
    }

    pub fn from_json(content: &str) -> Result<Self, ExtractError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json(&self) -> Result<String, ExtractError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn module(&self, path: &str) -> Result<&ExportedModule, ExtractError> {
        self.root
            .find(path)
            .ok_or_else(|| ExtractError::UnknownModule(path.to_string()))
    }

    /// Attach pre-rendered stub hooks to types of one module.
    ///
    /// Hooks whose name matches no exported type are ignored. Returns the
    /// number of hooks attached.
    pub fn attach_stub_hooks<'a>(
        &mut self,
        module: &str,
        hooks: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<usize, ExtractError> {
        let module = self
            .root
            .find_mut(module)
            .ok_or_else(|| ExtractError::UnknownModule(module.to_string()))?;

        let mut attached = 0;
        for (name, hook) in hooks {
            if let Some(ty) = module.types.iter_mut().find(|t| t.name == name) {
                ty.stub_hook = Some(hook.to_string());
                attached += 1;
            }
        }
        Ok(attached)
    }
}
