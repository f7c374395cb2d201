use std::fs;
use std::path::Path;

use tempfile::tempdir;

use docsmith::error::ErrorKind;
use docsmith::extract::extract;
use docsmith::model::Declaration;
use docsmith::prompt::assemble;

fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn write_solution_marker(root: &Path) {
    write_file(root, "Sample.sln", "Microsoft Visual Studio Solution File\n");
}

const GREETER_CS: &str = r#"using System;
using System.Collections.Generic;

namespace Sample.App
{
    public class Greeter : IGreeter
    {
        private readonly string _name;
        private int _count = 0;
        private double _x, _y;

        public string Name { get; set; }

        public Greeter(string name)
        {
            _name = name;
        }

        public string Greet(string subject)
        {
            return "Hello, " + subject;
        }
    }
}
"#;

const IGREETER_CS: &str = r#"namespace Sample.App
{
    public interface IGreeter
    {
        string Greet(string subject);
    }
}
"#;

const COLOR_CS: &str = r#"namespace Sample.Colors;

public enum Color
{
    Red = 1,
    Green,
    Blue = 4
}
"#;

const PERSON_CS: &str = r#"namespace Sample.People;

public record Person
{
    private int _age;

    public string Name { get; set; }

    public Person(string name)
    {
        Name = name;
    }

    public string Describe()
    {
        return Name;
    }
}
"#;

const SENSOR_CS: &str = r#"using System;

namespace Sample.Devices
{
    public class Sensor
    {
        private double _reading;

        public double Reading
        {
            get { return _reading; }
            set { _reading = value; }
        }

        public event EventHandler Changed
        {
            add { }
            remove { }
        }
    }
}
"#;

const POINT_CS: &str = r#"using System;

public struct Point
{
    public int X;
    public int Y;
}
"#;

#[test]
fn missing_solution_file_yields_not_found() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "Program.cs", "public class Program { }\n");

    let err = extract(dir.path()).expect_err("extraction should fail without a .sln");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.code(), "record.not.found");
}

#[test]
fn extracts_usings_namespace_and_class_members() {
    let dir = tempdir().unwrap();
    write_solution_marker(dir.path());
    write_file(dir.path(), "Greeter.cs", GREETER_CS);

    let project = extract(dir.path()).expect("extraction should succeed");
    assert_eq!(project.files.len(), 1);

    let file = &project.files[0];
    assert_eq!(file.usings, vec!["System", "System.Collections.Generic"]);
    assert_eq!(file.namespaces.len(), 1);
    assert_eq!(file.namespaces[0].name, "Sample.App");

    let Declaration::Class(class) = &file.namespaces[0].members[0] else {
        panic!("expected a class declaration");
    };
    assert_eq!(class.name, "Greeter");
    assert_eq!(class.modifiers, vec!["public"]);
    assert_eq!(class.base_types, vec!["IGreeter"]);
    assert_eq!(class.properties.len(), 1);
    assert_eq!(class.properties[0].name, "Name");
    assert_eq!(class.properties[0].type_name, "string");
    assert_eq!(class.constructors.len(), 1);
    assert_eq!(class.constructors[0].parameters.len(), 1);
    assert_eq!(class.constructors[0].parameters[0].name, "name");
    assert_eq!(class.methods.len(), 1);
    assert_eq!(class.methods[0].name, "Greet");
    assert_eq!(class.methods[0].return_type, "string");
    assert!(class.methods[0].body.contains("return \"Hello, \" + subject;"));
}

#[test]
fn multi_declarator_field_expands_to_one_entry_per_name() {
    let dir = tempdir().unwrap();
    write_solution_marker(dir.path());
    write_file(dir.path(), "Greeter.cs", GREETER_CS);

    let project = extract(dir.path()).unwrap();
    let Declaration::Class(class) = &project.files[0].namespaces[0].members[0] else {
        panic!("expected a class declaration");
    };

    let names: Vec<&str> = class.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["_name", "_count", "_x", "_y"]);

    let x = class.fields.iter().find(|f| f.name == "_x").unwrap();
    let y = class.fields.iter().find(|f| f.name == "_y").unwrap();
    assert_eq!(x.type_name, "double");
    assert_eq!(y.type_name, "double");
    assert_eq!(x.modifiers, y.modifiers);

    let count = class.fields.iter().find(|f| f.name == "_count").unwrap();
    assert_eq!(count.initializer, "0");
}

#[test]
fn file_scoped_namespace_and_enum_values_are_captured() {
    let dir = tempdir().unwrap();
    write_solution_marker(dir.path());
    write_file(dir.path(), "Color.cs", COLOR_CS);

    let project = extract(dir.path()).unwrap();
    let file = &project.files[0];
    assert_eq!(file.namespaces.len(), 1);
    assert_eq!(file.namespaces[0].name, "Sample.Colors");

    let Declaration::Enum(decl) = &file.namespaces[0].members[0] else {
        panic!("expected an enum declaration");
    };
    assert_eq!(decl.name, "Color");
    let members: Vec<(&str, &str)> = decl
        .members
        .iter()
        .map(|m| (m.name.as_str(), m.value.as_str()))
        .collect();
    assert_eq!(members, vec![("Red", "1"), ("Green", ""), ("Blue", "4")]);
}

#[test]
fn file_scoped_namespace_owns_its_record() {
    let dir = tempdir().unwrap();
    write_solution_marker(dir.path());
    write_file(dir.path(), "Person.cs", PERSON_CS);

    let project = extract(dir.path()).unwrap();
    let file = &project.files[0];
    assert!(
        file.top_level.is_empty(),
        "a file-scoped namespace owns every type in the file"
    );
    assert_eq!(file.namespaces.len(), 1);
    assert_eq!(file.namespaces[0].name, "Sample.People");

    let Declaration::Record(record) = &file.namespaces[0].members[0] else {
        panic!("expected a record declaration");
    };
    assert_eq!(record.name, "Person");
    assert_eq!(record.modifiers, vec!["public"]);
    assert_eq!(record.fields.len(), 1);
    assert_eq!(record.fields[0].name, "_age");
    assert_eq!(record.properties.len(), 1);
    assert_eq!(record.properties[0].name, "Name");
    assert_eq!(record.constructors.len(), 1);
    assert_eq!(record.constructors[0].parameters[0].name, "name");
    assert_eq!(record.methods.len(), 1);
    assert_eq!(record.methods[0].name, "Describe");
}

#[test]
fn accessor_form_event_is_extracted() {
    let dir = tempdir().unwrap();
    write_solution_marker(dir.path());
    write_file(dir.path(), "Sensor.cs", SENSOR_CS);

    let project = extract(dir.path()).unwrap();
    let Declaration::Class(class) = &project.files[0].namespaces[0].members[0] else {
        panic!("expected a class declaration");
    };
    assert_eq!(class.events.len(), 1);
    assert_eq!(class.events[0].name, "Changed");
    assert_eq!(class.events[0].type_name, "EventHandler");
    assert_eq!(class.events[0].modifiers, vec!["public"]);
}

#[test]
fn property_accessor_bodies_are_captured() {
    let dir = tempdir().unwrap();
    write_solution_marker(dir.path());
    write_file(dir.path(), "Sensor.cs", SENSOR_CS);

    let project = extract(dir.path()).unwrap();
    let Declaration::Class(class) = &project.files[0].namespaces[0].members[0] else {
        panic!("expected a class declaration");
    };
    let reading = &class.properties[0];
    assert_eq!(reading.name, "Reading");
    assert_eq!(reading.type_name, "double");
    assert_eq!(reading.getter, "{ return _reading; }");
    assert_eq!(reading.setter, "{ _reading = value; }");
}

#[test]
fn interface_members_are_extracted() {
    let dir = tempdir().unwrap();
    write_solution_marker(dir.path());
    write_file(dir.path(), "IGreeter.cs", IGREETER_CS);

    let project = extract(dir.path()).unwrap();
    let Declaration::Interface(decl) = &project.files[0].namespaces[0].members[0] else {
        panic!("expected an interface declaration");
    };
    assert_eq!(decl.name, "IGreeter");
    assert_eq!(decl.methods.len(), 1);
    assert_eq!(decl.methods[0].name, "Greet");
    assert_eq!(decl.methods[0].body, "");
}

#[test]
fn types_outside_namespaces_are_top_level() {
    let dir = tempdir().unwrap();
    write_solution_marker(dir.path());
    write_file(dir.path(), "Point.cs", POINT_CS);

    let project = extract(dir.path()).unwrap();
    let file = &project.files[0];
    assert!(file.namespaces.is_empty());
    assert_eq!(file.top_level.len(), 1);
    let Declaration::Struct(decl) = &file.top_level[0] else {
        panic!("expected a struct declaration");
    };
    assert_eq!(decl.name, "Point");
    assert_eq!(decl.fields.len(), 2);
}

#[test]
fn excluded_directories_are_not_scanned() {
    let dir = tempdir().unwrap();
    write_solution_marker(dir.path());
    write_file(dir.path(), "Greeter.cs", GREETER_CS);
    write_file(dir.path(), "bin/Generated.cs", "public class Generated { }\n");
    write_file(dir.path(), "obj/Cache.cs", "public class Cache { }\n");
    write_file(dir.path(), "node_modules/Dep.cs", "public class Dep { }\n");

    let project = extract(dir.path()).unwrap();
    assert_eq!(project.files.len(), 1);
    assert!(project.files[0].path.ends_with("Greeter.cs"));
}

#[test]
fn unreadable_syntax_fails_the_whole_run() {
    let dir = tempdir().unwrap();
    write_solution_marker(dir.path());
    write_file(dir.path(), "Broken.cs", "public class {{{ nope\n");

    let err = extract(dir.path()).expect_err("malformed file should fail the run");
    assert_eq!(err.kind(), ErrorKind::Failure);
    assert_eq!(err.code(), "file.analyze");
    assert!(err.message().contains("Broken.cs"));
}

#[test]
fn extract_then_assemble_is_deterministic() {
    let dir = tempdir().unwrap();
    write_solution_marker(dir.path());
    write_file(dir.path(), "Greeter.cs", GREETER_CS);
    write_file(dir.path(), "IGreeter.cs", IGREETER_CS);
    write_file(dir.path(), "Color.cs", COLOR_CS);

    let first: Vec<String> = extract(dir.path())
        .unwrap()
        .files
        .iter()
        .map(|f| assemble(f).unwrap())
        .collect();
    let second: Vec<String> = extract(dir.path())
        .unwrap()
        .files
        .iter()
        .map(|f| assemble(f).unwrap())
        .collect();
    assert_eq!(first, second);
}
