//! Declaration model: passive data structures describing a parsed project.
//!
//! Built once per run by the extractor and read-only afterwards. Every list
//! preserves source order; absent constructs are empty strings or empty
//! lists, never sentinels.

use std::path::PathBuf;

/// The whole parsed project, one entry per analyzed source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectModel {
    pub files: Vec<SourceFile>,
}

/// One parsed source file. The path is the sole identity key used for
/// documentation naming and artifact bucketing downstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub raw_content: String,
    /// Using directives in source order.
    pub usings: Vec<String>,
    /// Assembly-targeted attribute lists.
    pub file_attributes: Vec<Attribute>,
    pub namespaces: Vec<Namespace>,
    /// Type declarations sitting outside every namespace block.
    pub top_level: Vec<Declaration>,
}

/// A namespace block (regular or file-scoped) and its direct type members.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    pub name: String,
    pub members: Vec<Declaration>,
}

/// One type-level declaration, tagged by syntactic kind. Each variant
/// carries exactly the member lists that kind can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Class(ClassDecl),
    Struct(StructDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
    Record(RecordDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Class(d) => &d.name,
            Declaration::Struct(d) => &d.name,
            Declaration::Interface(d) => &d.name,
            Declaration::Enum(d) => &d.name,
            Declaration::Record(d) => &d.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub modifiers: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub base_types: Vec<String>,
    pub fields: Vec<Field>,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    pub constructors: Vec<Constructor>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDecl {
    pub name: String,
    pub modifiers: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub base_types: Vec<String>,
    pub fields: Vec<Field>,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    pub constructors: Vec<Constructor>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub modifiers: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub fields: Vec<Field>,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    pub constructors: Vec<Constructor>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub modifiers: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub base_interfaces: Vec<String>,
    pub methods: Vec<Method>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub modifiers: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumMember {
    pub name: String,
    /// Literal value text, empty when the member has no explicit value.
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    pub name: String,
    pub type_name: String,
    pub modifiers: Vec<String>,
    /// Initializer expression text, empty when none.
    pub initializer: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Property {
    pub name: String,
    pub type_name: String,
    pub modifiers: Vec<String>,
    /// Block body of the get accessor, empty when absent or expression-bodied.
    pub getter: String,
    /// Block body of the set accessor, empty when absent or expression-bodied.
    pub setter: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Method {
    pub name: String,
    pub return_type: String,
    pub modifiers: Vec<String>,
    pub parameters: Vec<Parameter>,
    /// Exact source text of the block or expression body, empty when none.
    pub body: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constructor {
    pub modifiers: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub body: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub name: String,
    pub type_name: String,
    pub modifiers: Vec<String>,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    /// Default value expression text, empty when none.
    pub default_value: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attribute {
    pub name: String,
    /// Argument expressions captured as raw text.
    pub arguments: Vec<String>,
}
