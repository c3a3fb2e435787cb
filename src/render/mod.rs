//! Document rendering: Markdown plus a JSON twin for every processed file.
//!
//! Pure string formatting over an already-built structural record. Output
//! file names are the source file's relative path with path separators
//! flattened, so same-named files from different directories never collide.

use std::fmt::Write as _;
use std::path::Path;

use crate::extract::StructuralRecord;

/// Flatten a relative path into a single output file name.
pub fn sanitize_relative_path(relative_path: &str) -> String {
    relative_path.replace(['/', '\\'], "_")
}

/// Render the per-file Markdown document.
pub fn render_markdown(record: &StructuralRecord) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# File Name\n\n{}\n", record.file_name);

    let summary = record.summary.as_deref().unwrap_or("No summary provided.");
    let _ = writeln!(md, "# Summary\n\n{summary}\n");

    md.push_str("## Imports\n\n");
    if record.imports.is_empty() {
        md.push_str("No imports found.\n");
    } else {
        md.push_str("This script imports the following modules:\n");
        for import in &record.imports {
            let _ = writeln!(md, "- `{import}`");
        }
    }
    md.push('\n');

    md.push_str("## Functions\n\n");
    if record.functions.is_empty() {
        md.push_str("No functions found.\n");
    } else {
        for function in &record.functions {
            let arguments = if function.parameters.is_empty() {
                "None".to_string()
            } else {
                function.parameters.join(", ")
            };
            let returns = function
                .return_annotation
                .as_deref()
                .unwrap_or("No return value specified");
            let description = record
                .docstrings
                .functions
                .get(&function.name)
                .and_then(|d| d.as_deref())
                .unwrap_or("No description provided.");

            let _ = writeln!(md, "### {}()\n", function.name);
            let _ = writeln!(md, "- **Arguments:** {arguments}");
            let _ = writeln!(md, "- **Returns:** {returns}");
            let _ = writeln!(md, "- **Description:** {description}\n");
        }
    }
    md.push('\n');

    md.push_str("## Classes\n\n");
    if record.classes.is_empty() {
        md.push_str("No classes found.\n");
    } else {
        for class in &record.classes {
            let description = record
                .docstrings
                .classes
                .get(&class.name)
                .and_then(|d| d.as_deref())
                .unwrap_or("No description provided.");

            let _ = writeln!(md, "### {}\n", class.name);
            if !class.bases.is_empty() {
                let _ = writeln!(md, "- **Bases:** {}", class.bases.join(", "));
            }
            if !class.methods.is_empty() {
                let _ = writeln!(md, "- **Methods:** {}", class.methods.join(", "));
            }
            let _ = writeln!(md, "- **Description:** {description}\n");
        }
    }
    md.push('\n');

    md.push_str("## Constants\n\n");
    if record.constants.is_empty() {
        md.push_str("No constants found.\n");
    } else {
        md.push_str("This script defines the following constants:\n");
        for constant in &record.constants {
            let _ = writeln!(md, "- `{} = {}`", constant.name, constant.value_repr);
        }
    }
    md.push('\n');

    md
}

/// Render the JSON twin of the document.
pub fn render_json(record: &StructuralRecord) -> serde_json::Result<String> {
    serde_json::to_string_pretty(record)
}

/// Write both documents. The second write is attempted even when the first
/// fails; the first error (if any) is reported after both attempts so a
/// failure on one path never silently suppresses the other output.
pub fn persist_pair(
    markdown_path: &Path,
    json_path: &Path,
    markdown: &str,
    json: &str,
) -> std::io::Result<()> {
    let markdown_result = std::fs::write(markdown_path, markdown);
    if let Err(e) = &markdown_result {
        tracing::error!("failed to write {}: {}", markdown_path.display(), e);
    }
    let json_result = std::fs::write(json_path, json);
    if let Err(e) = &json_result {
        tracing::error!("failed to write {}: {}", json_path.display(), e);
    }
    markdown_result.and(json_result)
}
