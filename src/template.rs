//! Fixed instruction template sent once per run, before any per-file prompt.

/// Literal heading the model is instructed to start every reply with. The
/// synchronizer trims stored documents on the same string.
pub const DOC_START_MARKER: &str = "# File Overview";

/// The documentation template enumerating the required output sections.
pub fn instruction_template() -> String {
    let mut t = String::new();
    t.push_str(
        "You need to generate documentation for several C# files in .md format. \
         Follow the template exactly and do not add anything extra. \
         Do not forget to add a description for each method. \
         If you cannot fill some points, just skip them. \
         I want your answer to start with \"# File Overview\":\n",
    );
    t.push('\n');
    t.push_str("1. File Overview\n");
    t.push_str("   - File Name: [filename]\n");
    t.push_str("   - Location: [path]\n");
    t.push_str("   - Purpose: [brief description of file's purpose]\n");
    t.push('\n');
    t.push_str("2. Dependencies\n");
    t.push_str("   - Namespaces: [list of used namespaces]\n");
    t.push_str("   - Assembly Attributes: [if any]\n");
    t.push('\n');
    t.push_str("3. Code Structure\n");
    t.push_str("   For each class/struct/interface/enum/record:\n");
    t.push_str("   - Name: [name]\n");
    t.push_str("   - Type: [class/struct/interface/enum/record]\n");
    t.push_str("   - Modifiers: [public/private/etc]\n");
    t.push_str("   - Inheritance: [base types/interfaces]\n");
    t.push_str("   - Description: [detailed description of purpose and functionality]\n");
    t.push('\n');
    t.push_str("4. Members\n");
    t.push_str("   - Fields: [name, type, description]\n");
    t.push_str("   - Properties: [name, type, get/set accessors, description]\n");
    t.push_str("   - Methods: [name, parameters, return type, description]\n");
    t.push_str("   - Events: [name, type, description]\n");
    t.push('\n');
    t.push_str("5. Usage Examples\n");
    t.push_str("   - Please provide typical usage scenarios, code examples if applicable\n");
    t.push('\n');
    t.push_str("Now analyzing the following code:\n");
    t.push_str("==================================\n");
    t.push('\n');
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_instructs_the_marker_heading() {
        let template = instruction_template();
        assert!(template.contains(DOC_START_MARKER));
        assert!(template.contains("5. Usage Examples"));
    }
}
