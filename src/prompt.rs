//! Prompt assembler: renders one parsed source file into a deterministic
//! text prompt for the generation service.
//!
//! Pure function of its input. Rendering order is fixed so identical input
//! always yields byte-identical prompts: file header, imports, file-level
//! attributes, then one block per declaration in source order. Every member
//! section label is emitted only when that member list is non-empty; the
//! rule is applied uniformly across all declaration kinds.

use std::fmt::Write;

use tracing::error;

use crate::error::Error;
use crate::model::{
    Attribute, Constructor, Declaration, EnumDecl, Event, Field, Method, Parameter, Property,
    SourceFile,
};

/// Renders the prompt text for one file.
pub fn assemble(file: &SourceFile) -> Result<String, Error> {
    render(file).map_err(|e: std::fmt::Error| {
        error!(path = %file.path.display(), error = %e, "Error while generating prompt for file");
        Error::failure("generation.prompt", "Error while generating prompt")
    })
}

fn render(file: &SourceFile) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    let file_name = file
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    writeln!(out, "File: {file_name}")?;
    writeln!(out, "Location: {}", file.path.display())?;
    writeln!(out)?;

    if !file.usings.is_empty() {
        writeln!(out, "Imported namespaces:")?;
        for using in &file.usings {
            writeln!(out, "- {using}")?;
        }
        writeln!(out)?;
    }

    if !file.file_attributes.is_empty() {
        writeln!(out, "Assembly attributes:")?;
        write_attribute_items(&mut out, &file.file_attributes)?;
        writeln!(out)?;
    }

    for namespace in &file.namespaces {
        writeln!(out, "Namespace: {}", namespace.name)?;
        for member in &namespace.members {
            write_declaration(&mut out, member)?;
            writeln!(out)?;
        }
    }

    for declaration in &file.top_level {
        write_declaration(&mut out, declaration)?;
        writeln!(out)?;
    }

    Ok(out)
}

/// One type-kind block. Canonical order for every kind: name, modifiers,
/// attributes, base list, fields, properties, constructors, methods,
/// events, enum members.
fn write_declaration(out: &mut String, decl: &Declaration) -> std::fmt::Result {
    match decl {
        Declaration::Class(c) => {
            writeln!(out, "Class: {}", c.name)?;
            write_modifiers(out, &c.modifiers)?;
            write_attributes(out, &c.attributes)?;
            write_base_types(out, &c.base_types, "Inherits")?;
            write_fields(out, &c.fields)?;
            write_properties(out, &c.properties)?;
            write_constructors(out, &c.constructors, &c.name)?;
            write_methods(out, &c.methods)?;
            write_events(out, &c.events)?;
        }
        Declaration::Record(r) => {
            writeln!(out, "Record: {}", r.name)?;
            write_modifiers(out, &r.modifiers)?;
            write_attributes(out, &r.attributes)?;
            write_base_types(out, &r.base_types, "Inherits")?;
            write_fields(out, &r.fields)?;
            write_properties(out, &r.properties)?;
            write_constructors(out, &r.constructors, &r.name)?;
            write_methods(out, &r.methods)?;
        }
        Declaration::Struct(s) => {
            writeln!(out, "Struct: {}", s.name)?;
            write_modifiers(out, &s.modifiers)?;
            write_attributes(out, &s.attributes)?;
            write_fields(out, &s.fields)?;
            write_properties(out, &s.properties)?;
            write_constructors(out, &s.constructors, &s.name)?;
            write_methods(out, &s.methods)?;
        }
        Declaration::Interface(i) => {
            writeln!(out, "Interface: {}", i.name)?;
            write_modifiers(out, &i.modifiers)?;
            write_attributes(out, &i.attributes)?;
            write_base_types(out, &i.base_interfaces, "Implements")?;
            write_properties(out, &i.properties)?;
            write_methods(out, &i.methods)?;
        }
        Declaration::Enum(e) => write_enum(out, e)?,
    }
    Ok(())
}

fn write_enum(out: &mut String, decl: &EnumDecl) -> std::fmt::Result {
    writeln!(out, "Enum: {}", decl.name)?;
    write_modifiers(out, &decl.modifiers)?;
    write_attributes(out, &decl.attributes)?;
    if !decl.members.is_empty() {
        writeln!(out)?;
        writeln!(out, "Members:")?;
        for member in &decl.members {
            writeln!(out, "- {} = {}", member.name, member.value)?;
        }
    }
    Ok(())
}

fn write_modifiers(out: &mut String, modifiers: &[String]) -> std::fmt::Result {
    if !modifiers.is_empty() {
        writeln!(out, "Modifiers: {}", modifiers.join(" "))?;
    }
    Ok(())
}

fn write_attributes(out: &mut String, attributes: &[Attribute]) -> std::fmt::Result {
    if attributes.is_empty() {
        return Ok(());
    }
    writeln!(out, "Attributes:")?;
    write_attribute_items(out, attributes)
}

fn write_attribute_items(out: &mut String, attributes: &[Attribute]) -> std::fmt::Result {
    for attr in attributes {
        writeln!(out, "- {}", attr.name)?;
        if !attr.arguments.is_empty() {
            writeln!(out, "  Arguments: {}", attr.arguments.join(", "))?;
        }
    }
    Ok(())
}

fn write_base_types(out: &mut String, base_types: &[String], label: &str) -> std::fmt::Result {
    if !base_types.is_empty() {
        writeln!(out, "{label}: {}", base_types.join(", "))?;
    }
    Ok(())
}

fn write_fields(out: &mut String, fields: &[Field]) -> std::fmt::Result {
    if fields.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Fields:")?;
    for field in fields {
        writeln!(out, "- {} {}", field.type_name, field.name)?;
        if !field.initializer.is_empty() {
            writeln!(out, "  Initializer: {}", field.initializer)?;
        }
    }
    Ok(())
}

fn write_properties(out: &mut String, properties: &[Property]) -> std::fmt::Result {
    if properties.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Properties:")?;
    for prop in properties {
        writeln!(
            out,
            "- {} {} {{ {}/{} }}",
            prop.type_name, prop.name, prop.getter, prop.setter
        )?;
    }
    Ok(())
}

fn write_constructors(
    out: &mut String,
    constructors: &[Constructor],
    type_name: &str,
) -> std::fmt::Result {
    if constructors.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Constructors:")?;
    for ctor in constructors {
        writeln!(out, "- {type_name}({})", signature(&ctor.parameters))?;
        if !ctor.parameters.is_empty() {
            writeln!(out, "  Parameters:")?;
            for param in &ctor.parameters {
                writeln!(out, "  - {} {}", param.type_name, param.name)?;
                if !param.default_value.is_empty() {
                    writeln!(out, "    Default: {}", param.default_value)?;
                }
            }
        }
    }
    Ok(())
}

fn write_methods(out: &mut String, methods: &[Method]) -> std::fmt::Result {
    if methods.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Methods:")?;
    for method in methods {
        writeln!(
            out,
            "- {} {}({})",
            method.return_type,
            method.name,
            signature(&method.parameters)
        )?;
        if !method.parameters.is_empty() {
            writeln!(out, "  Parameters:")?;
            for param in &method.parameters {
                writeln!(out, "  - {} {}", param.type_name, param.name)?;
            }
        }
        writeln!(out, "  Body:")?;
        writeln!(out, "{}", method.body)?;
    }
    Ok(())
}

fn write_events(out: &mut String, events: &[Event]) -> std::fmt::Result {
    if events.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Events:")?;
    for event in events {
        writeln!(out, "- {} {}", event.type_name, event.name)?;
    }
    Ok(())
}

fn signature(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|p| format!("{} {}", p.type_name, p.name))
        .collect::<Vec<_>>()
        .join(", ")
}
