//! Source model extractor: walks a C# project directory and builds the
//! read-only declaration model.
//!
//! This is a declaration-level scanner on top of tree-sitter, not a semantic
//! compiler: it captures names, modifiers, signatures, attributes and raw
//! body text, and never resolves types or cross-file references. A missing
//! solution file under the project root is reported as `NotFound`; any
//! unreadable or unparseable file fails the whole run, because a malformed
//! file means the scanner's assumptions no longer hold.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};
use tree_sitter::{Node, Parser};

use crate::error::Error;
use crate::model::{
    Attribute, ClassDecl, Constructor, Declaration, EnumDecl, EnumMember, Event, Field,
    InterfaceDecl, Method, Namespace, Parameter, ProjectModel, Property, RecordDecl, SourceFile,
    StructDecl,
};

/// Path segments never descended into during enumeration.
const EXCLUDED_DIRS: [&str; 5] = ["bin", "obj", ".git", "packages", "node_modules"];

const TYPE_DECLARATION_KINDS: [&str; 5] = [
    "class_declaration",
    "struct_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
];

/// Node kinds that can spell a type name in a signature position.
const TYPE_NAME_KINDS: [&str; 10] = [
    "predefined_type",
    "identifier",
    "qualified_name",
    "generic_name",
    "nullable_type",
    "array_type",
    "pointer_type",
    "tuple_type",
    "function_pointer_type",
    "ref_type",
];

/// Analyzes every C# file under `project_root` and returns the project model.
pub fn extract(project_root: &Path) -> Result<ProjectModel, Error> {
    if !has_solution_file(project_root) {
        warn!(path = %project_root.display(), "No .sln file under project root");
        return Err(Error::not_found("record.not.found", "Solution file not found"));
    }

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
        .map_err(|e| Error::failure("file.analyze", format!("Failed to load C# grammar: {e}")))?;

    let mut files = Vec::new();
    for path in source_files(project_root) {
        match analyze_file(&mut parser, &path) {
            Ok(file) => {
                debug!(path = %path.display(), "Analyzed source file");
                files.push(file);
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Error analyzing file");
                return Err(e);
            }
        }
    }

    Ok(ProjectModel { files })
}

fn has_solution_file(root: &Path) -> bool {
    let Ok(entries) = fs::read_dir(root) else {
        return false;
    };
    entries
        .filter_map(|e| e.ok())
        .any(|e| e.path().extension().is_some_and(|ext| ext == "sln"))
}

/// Recursively enumerates `*.cs` files, skipping the excluded directories.
/// Entries are sorted per directory so two runs visit files identically,
/// though later stages must not rely on any particular order.
fn source_files(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    visit_dir(root, &mut found);
    found
}

fn visit_dir(dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    paths.sort();
    for path in paths {
        if path.is_dir() {
            let excluded = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| EXCLUDED_DIRS.contains(&name));
            if !excluded {
                visit_dir(&path, found);
            }
        } else if path.extension().is_some_and(|ext| ext == "cs") {
            found.push(path);
        }
    }
}

fn analyze_file(parser: &mut Parser, path: &Path) -> Result<SourceFile, Error> {
    let code = fs::read_to_string(path).map_err(|e| {
        Error::failure(
            "file.analyze",
            format!("Error analyzing file {}: {e}", path.display()),
        )
    })?;

    let tree = parser.parse(&code, None).ok_or_else(|| {
        Error::failure(
            "file.analyze",
            format!("Error analyzing file {}: parser produced no tree", path.display()),
        )
    })?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(Error::failure(
            "file.analyze",
            format!("Error analyzing file {}: syntax errors in source", path.display()),
        ));
    }

    let mut file = SourceFile {
        path: path.to_path_buf(),
        raw_content: code.clone(),
        usings: collect_usings(root, &code),
        file_attributes: collect_assembly_attributes(root, &code),
        ..Default::default()
    };

    // Block-form namespaces anywhere in the tree, flattened in source order.
    let mut namespace_nodes = Vec::new();
    collect_descendants(root, "namespace_declaration", &mut namespace_nodes);
    for ns in namespace_nodes {
        file.namespaces.push(parse_namespace(ns, &code));
    }

    // The file-scoped shorthand form: at most one per file, owning every
    // type declared in it. Without one, root-level types stay top-level.
    let mut file_scoped = Vec::new();
    collect_descendants(root, "file_scoped_namespace_declaration", &mut file_scoped);
    match file_scoped.into_iter().next() {
        Some(ns) => {
            let mut namespace = Namespace {
                name: declared_name(ns, &code),
                members: Vec::new(),
            };
            collect_root_declarations(root, &code, &mut namespace.members);
            file.namespaces.push(namespace);
        }
        None => collect_root_declarations(root, &code, &mut file.top_level),
    }

    Ok(file)
}

fn collect_usings(root: Node, code: &str) -> Vec<String> {
    let mut nodes = Vec::new();
    collect_descendants(root, "using_directive", &mut nodes);
    nodes
        .into_iter()
        .filter_map(|u| {
            named_children(u)
                .into_iter()
                .filter(|c| TYPE_NAME_KINDS.contains(&c.kind()))
                .last()
                .map(|n| node_text(n, code).to_string())
        })
        .collect()
}

fn collect_assembly_attributes(root: Node, code: &str) -> Vec<Attribute> {
    let mut lists = Vec::new();
    collect_descendants(root, "attribute_list", &mut lists);
    let mut attrs = Vec::new();
    for list in lists {
        let targets_assembly = children(list).into_iter().any(|c| {
            c.kind() == "attribute_target_specifier" && node_text(c, code).starts_with("assembly")
        });
        if targets_assembly {
            attrs.extend(parse_attribute_list(list, code));
        }
    }
    attrs
}

/// Type declarations sitting directly under the compilation unit. These
/// are siblings of a file-scoped namespace node when one is present, so
/// the caller decides which list they belong to.
fn collect_root_declarations(root: Node, code: &str, out: &mut Vec<Declaration>) {
    for child in named_children(root) {
        if TYPE_DECLARATION_KINDS.contains(&child.kind()) {
            if let Some(decl) = parse_declaration(child, code) {
                out.push(decl);
            }
        }
    }
}

/// A block-form namespace; members live in its declaration_list body.
fn parse_namespace(ns: Node, code: &str) -> Namespace {
    let mut namespace = Namespace {
        name: declared_name(ns, code),
        members: Vec::new(),
    };
    let body = ns
        .child_by_field_name("body")
        .or_else(|| child_of_kind(ns, "declaration_list"));
    for member in body.map(named_children).unwrap_or_default() {
        if TYPE_DECLARATION_KINDS.contains(&member.kind()) {
            if let Some(decl) = parse_declaration(member, code) {
                namespace.members.push(decl);
            }
        }
    }
    namespace
}

fn parse_declaration(node: Node, code: &str) -> Option<Declaration> {
    match node.kind() {
        "class_declaration" => Some(Declaration::Class(parse_class(node, code))),
        "struct_declaration" => Some(Declaration::Struct(parse_struct(node, code))),
        "interface_declaration" => Some(Declaration::Interface(parse_interface(node, code))),
        "enum_declaration" => Some(Declaration::Enum(parse_enum(node, code))),
        "record_declaration" => Some(Declaration::Record(parse_record(node, code))),
        _ => None,
    }
}

fn parse_class(node: Node, code: &str) -> ClassDecl {
    let mut decl = ClassDecl {
        name: declared_name(node, code),
        modifiers: modifiers(node, code),
        attributes: own_attributes(node, code),
        base_types: base_type_names(node, code),
        ..Default::default()
    };
    for member in body_members(node) {
        match member.kind() {
            "field_declaration" => decl.fields.extend(parse_fields(member, code)),
            "property_declaration" => decl.properties.push(parse_property(member, code)),
            "method_declaration" => decl.methods.push(parse_method(member, code)),
            "constructor_declaration" => decl.constructors.push(parse_constructor(member, code)),
            "event_declaration" => decl.events.push(parse_event(member, code)),
            _ => {}
        }
    }
    decl
}

fn parse_record(node: Node, code: &str) -> RecordDecl {
    let mut decl = RecordDecl {
        name: declared_name(node, code),
        modifiers: modifiers(node, code),
        attributes: own_attributes(node, code),
        base_types: base_type_names(node, code),
        ..Default::default()
    };
    for member in body_members(node) {
        match member.kind() {
            "field_declaration" => decl.fields.extend(parse_fields(member, code)),
            "property_declaration" => decl.properties.push(parse_property(member, code)),
            "method_declaration" => decl.methods.push(parse_method(member, code)),
            "constructor_declaration" => decl.constructors.push(parse_constructor(member, code)),
            _ => {}
        }
    }
    decl
}

fn parse_struct(node: Node, code: &str) -> StructDecl {
    let mut decl = StructDecl {
        name: declared_name(node, code),
        modifiers: modifiers(node, code),
        attributes: own_attributes(node, code),
        ..Default::default()
    };
    for member in body_members(node) {
        match member.kind() {
            "field_declaration" => decl.fields.extend(parse_fields(member, code)),
            "property_declaration" => decl.properties.push(parse_property(member, code)),
            "method_declaration" => decl.methods.push(parse_method(member, code)),
            "constructor_declaration" => decl.constructors.push(parse_constructor(member, code)),
            _ => {}
        }
    }
    decl
}

fn parse_interface(node: Node, code: &str) -> InterfaceDecl {
    let mut decl = InterfaceDecl {
        name: declared_name(node, code),
        modifiers: modifiers(node, code),
        attributes: own_attributes(node, code),
        base_interfaces: base_type_names(node, code),
        ..Default::default()
    };
    for member in body_members(node) {
        match member.kind() {
            "method_declaration" => decl.methods.push(parse_method(member, code)),
            "property_declaration" => decl.properties.push(parse_property(member, code)),
            _ => {}
        }
    }
    decl
}

fn parse_enum(node: Node, code: &str) -> EnumDecl {
    let mut decl = EnumDecl {
        name: declared_name(node, code),
        modifiers: modifiers(node, code),
        attributes: own_attributes(node, code),
        ..Default::default()
    };
    for member in body_members(node) {
        if member.kind() == "enum_member_declaration" {
            decl.members.push(EnumMember {
                name: declared_name(member, code),
                value: value_after_equals(member, code),
            });
        }
    }
    decl
}

/// One syntactic field statement expands into one entry per declared
/// variable name; type, modifiers and attributes are shared, initializers
/// stay per declarator.
fn parse_fields(node: Node, code: &str) -> Vec<Field> {
    let shared_modifiers = modifiers(node, code);
    let shared_attributes = own_attributes(node, code);

    let Some(var_decl) = child_of_kind(node, "variable_declaration") else {
        return Vec::new();
    };
    let type_name = var_decl
        .child_by_field_name("type")
        .or_else(|| {
            named_children(var_decl)
                .into_iter()
                .find(|c| TYPE_NAME_KINDS.contains(&c.kind()))
        })
        .map(|n| node_text(n, code).to_string())
        .unwrap_or_default();

    children_of_kind(var_decl, "variable_declarator")
        .into_iter()
        .map(|declarator| Field {
            name: declared_name(declarator, code),
            type_name: type_name.clone(),
            modifiers: shared_modifiers.clone(),
            initializer: value_after_equals(declarator, code),
            attributes: shared_attributes.clone(),
        })
        .collect()
}

fn parse_property(node: Node, code: &str) -> Property {
    let mut prop = Property {
        name: declared_name(node, code),
        type_name: signature_type(node, code),
        modifiers: modifiers(node, code),
        attributes: own_attributes(node, code),
        ..Default::default()
    };
    if let Some(accessors) = child_of_kind(node, "accessor_list") {
        for accessor in children_of_kind(accessors, "accessor_declaration") {
            let body = child_of_kind(accessor, "block")
                .map(|b| node_text(b, code).to_string())
                .unwrap_or_default();
            if has_token(accessor, "get") && prop.getter.is_empty() {
                prop.getter = body;
            } else if has_token(accessor, "set") && prop.setter.is_empty() {
                prop.setter = body;
            }
        }
    }
    prop
}

fn parse_method(node: Node, code: &str) -> Method {
    Method {
        name: declared_name(node, code),
        return_type: signature_type(node, code),
        modifiers: modifiers(node, code),
        parameters: parse_parameters(node, code),
        body: body_text(node, code),
        attributes: own_attributes(node, code),
    }
}

fn parse_constructor(node: Node, code: &str) -> Constructor {
    Constructor {
        modifiers: modifiers(node, code),
        parameters: parse_parameters(node, code),
        body: body_text(node, code),
        attributes: own_attributes(node, code),
    }
}

fn parse_event(node: Node, code: &str) -> Event {
    Event {
        name: declared_name(node, code),
        type_name: signature_type(node, code),
        modifiers: modifiers(node, code),
        attributes: own_attributes(node, code),
    }
}

fn parse_parameters(node: Node, code: &str) -> Vec<Parameter> {
    let Some(list) = node
        .child_by_field_name("parameters")
        .or_else(|| child_of_kind(node, "parameter_list"))
    else {
        return Vec::new();
    };
    children_of_kind(list, "parameter")
        .into_iter()
        .map(|p| Parameter {
            name: declared_name(p, code),
            type_name: p
                .child_by_field_name("type")
                .map(|t| node_text(t, code).to_string())
                .unwrap_or_default(),
            default_value: value_after_equals(p, code),
            attributes: own_attributes(p, code),
        })
        .collect()
}

// --- tree helpers ---

fn node_text<'a>(node: Node, code: &'a str) -> &'a str {
    &code[node.byte_range()]
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    named_children(node).into_iter().find(|c| c.kind() == kind)
}

fn children_of_kind<'a>(node: Node<'a>, kind: &str) -> Vec<Node<'a>> {
    named_children(node)
        .into_iter()
        .filter(|c| c.kind() == kind)
        .collect()
}

fn collect_descendants<'a>(node: Node<'a>, kind: &str, out: &mut Vec<Node<'a>>) {
    for child in named_children(node) {
        if child.kind() == kind {
            out.push(child);
        }
        collect_descendants(child, kind, out);
    }
}

fn has_token(node: Node, token: &str) -> bool {
    children(node).into_iter().any(|c| c.kind() == token)
}

fn declared_name(node: Node, code: &str) -> String {
    node.child_by_field_name("name")
        .map(|n| node_text(n, code).to_string())
        .unwrap_or_default()
}

fn modifiers(node: Node, code: &str) -> Vec<String> {
    children_of_kind(node, "modifier")
        .into_iter()
        .map(|m| node_text(m, code).to_string())
        .collect()
}

/// Direct attribute lists of the declaration itself. Member attributes are
/// collected on the members, never bubbled up to the enclosing type.
fn own_attributes(node: Node, code: &str) -> Vec<Attribute> {
    children_of_kind(node, "attribute_list")
        .into_iter()
        .flat_map(|list| parse_attribute_list(list, code))
        .collect()
}

fn parse_attribute_list(list: Node, code: &str) -> Vec<Attribute> {
    children_of_kind(list, "attribute")
        .into_iter()
        .map(|attr| Attribute {
            name: declared_name(attr, code),
            arguments: child_of_kind(attr, "attribute_argument_list")
                .map(|args| {
                    named_children(args)
                        .into_iter()
                        .map(|a| node_text(a, code).to_string())
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}

fn base_type_names(node: Node, code: &str) -> Vec<String> {
    child_of_kind(node, "base_list")
        .map(|list| {
            named_children(list)
                .into_iter()
                .map(|t| node_text(t, code).to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn body_members(node: Node) -> Vec<Node> {
    node.child_by_field_name("body")
        .or_else(|| child_of_kind(node, "declaration_list"))
        .or_else(|| child_of_kind(node, "enum_member_declaration_list"))
        .map(named_children)
        .unwrap_or_default()
}

/// Block body or expression-bodied form, whichever is present, verbatim.
fn body_text(node: Node, code: &str) -> String {
    node.child_by_field_name("body")
        .or_else(|| child_of_kind(node, "block"))
        .or_else(|| child_of_kind(node, "arrow_expression_clause"))
        .map(|b| node_text(b, code).to_string())
        .unwrap_or_default()
}

/// The declared type in a signature position: the `type` field when the
/// grammar names one, otherwise the last type-shaped node before the name.
fn signature_type(node: Node, code: &str) -> String {
    if let Some(t) = node
        .child_by_field_name("type")
        .or_else(|| node.child_by_field_name("returns"))
    {
        return node_text(t, code).to_string();
    }
    let name_start = node
        .child_by_field_name("name")
        .map(|n| n.start_byte())
        .unwrap_or(usize::MAX);
    named_children(node)
        .into_iter()
        .filter(|c| TYPE_NAME_KINDS.contains(&c.kind()) && c.end_byte() <= name_start)
        .last()
        .map(|t| node_text(t, code).to_string())
        .unwrap_or_default()
}

/// Text of the expression following an `=` token, empty when there is none.
/// Handles both inline initializers and `equals_value_clause` wrappers.
fn value_after_equals(node: Node, code: &str) -> String {
    if let Some(clause) = child_of_kind(node, "equals_value_clause") {
        return named_children(clause)
            .into_iter()
            .last()
            .map(|v| node_text(v, code).to_string())
            .unwrap_or_default();
    }
    let mut seen_equals = false;
    for child in children(node) {
        if seen_equals && child.is_named() {
            return node_text(child, code).to_string();
        }
        if child.kind() == "=" {
            seen_equals = true;
        }
    }
    String::new()
}
