//! Python syntax-tree walking for the structural extractor.
//!
//! Imports and functions are collected by a whole-tree walk (nested
//! definitions included); classes, type hints and constants read direct
//! module children only. The asymmetry is part of the extraction contract.

use std::collections::BTreeMap;

use tree_sitter::{Node, Parser, Tree};

use super::{ClassInfo, ConstantInfo, FunctionInfo, TypeHints};

/// Parse source with the Python grammar. Returns `None` when the source does
/// not produce a clean tree, the malformed-input case every accessor must
/// tolerate.
pub(super) fn parse(source: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_python::LANGUAGE.into()).ok()?;
    let tree = parser.parse(source, None)?;
    if tree.root_node().has_error() {
        return None;
    }
    Some(tree)
}

fn text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Depth-first preorder walk over every node in the tree.
fn walk<'t>(node: Node<'t>, visit: &mut dyn FnMut(Node<'t>)) {
    visit(node);
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            walk(child, visit);
        }
    }
}

/// A decorated definition is transparent: extraction sees the wrapped
/// function or class, as the original walk did.
fn unwrap_decorated(node: Node<'_>) -> Node<'_> {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition").unwrap_or(node)
    } else {
        node
    }
}

// ---------------------------------------------------------------------------
// Imports
// ---------------------------------------------------------------------------

/// Collect import entries over the whole tree, in traversal order, duplicates
/// preserved. `import a.b` yields `a.b`; `from x import y` yields `x.y`.
pub(super) fn collect_imports(root: Node<'_>, source: &str) -> Vec<String> {
    let mut imports = Vec::new();
    walk(root, &mut |node| match node.kind() {
        "import_statement" => {
            for child in named_children(node) {
                match child.kind() {
                    "dotted_name" => imports.push(text(child, source).to_string()),
                    // `import a.b as c` records the module path, not the alias
                    "aliased_import" => {
                        if let Some(name) = child.child_by_field_name("name") {
                            imports.push(text(name, source).to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
        "import_from_statement" => {
            let Some(module) = node
                .child_by_field_name("module_name")
                .and_then(|m| module_path(m, source))
            else {
                // `from . import x` has no module path and is skipped
                return;
            };
            let mut cursor = node.walk();
            for child in node.children_by_field_name("name", &mut cursor) {
                let imported = match child.kind() {
                    "dotted_name" => Some(text(child, source)),
                    "aliased_import" => {
                        child.child_by_field_name("name").map(|n| text(n, source))
                    }
                    _ => None,
                };
                if let Some(name) = imported {
                    imports.push(format!("{module}.{name}"));
                }
            }
            if named_children(node).iter().any(|c| c.kind() == "wildcard_import") {
                imports.push(format!("{module}.*"));
            }
        }
        _ => {}
    });
    imports
}

fn module_path<'a>(module: Node<'_>, source: &'a str) -> Option<&'a str> {
    match module.kind() {
        "dotted_name" => Some(text(module, source)),
        "relative_import" => named_children(module)
            .into_iter()
            .find(|c| c.kind() == "dotted_name")
            .map(|c| text(c, source)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

/// Collect every function definition in the tree, nested ones and methods
/// included, in traversal order.
pub(super) fn collect_functions(root: Node<'_>, source: &str) -> Vec<FunctionInfo> {
    let mut functions = Vec::new();
    walk(root, &mut |node| {
        if node.kind() == "function_definition" {
            functions.push(function_info(node, source));
        }
    });
    functions
}

fn function_info(node: Node<'_>, source: &str) -> FunctionInfo {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(n, source).to_string())
        .unwrap_or_default();
    let parameters = node
        .child_by_field_name("parameters")
        .map(|p| parameter_names(p, source))
        .unwrap_or_default();
    let return_annotation = node
        .child_by_field_name("return_type")
        .map(|r| text(r, source).to_string());
    let docstring = node
        .child_by_field_name("body")
        .and_then(|b| block_docstring(b, source));
    FunctionInfo {
        name,
        parameters,
        return_annotation,
        docstring,
    }
}

/// Plain positional/keyword parameter names. `*args`, `**kwargs` and
/// keyword-only parameters are not plain names and end the list; a `/`
/// separator reclassifies everything before it as positional-only, which the
/// extraction contract excludes.
fn parameter_names(params: Node<'_>, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for child in named_children(params) {
        match child.kind() {
            "identifier" => names.push(text(child, source).to_string()),
            // `*args: int` is a typed_parameter wrapping a splat pattern and
            // ends the plain-parameter list just like a bare `*args`
            "typed_parameter" => match child.named_child(0) {
                Some(inner) if inner.kind() == "identifier" => {
                    names.push(text(inner, source).to_string());
                }
                Some(inner)
                    if matches!(
                        inner.kind(),
                        "list_splat_pattern" | "dictionary_splat_pattern"
                    ) =>
                {
                    break
                }
                _ => {}
            },
            "default_parameter" | "typed_default_parameter" => {
                if let Some(name) = child.child_by_field_name("name") {
                    if name.kind() == "identifier" {
                        names.push(text(name, source).to_string());
                    }
                }
            }
            "positional_separator" => names.clear(),
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
            _ => {}
        }
    }
    names
}

// ---------------------------------------------------------------------------
// Classes
// ---------------------------------------------------------------------------

/// Collect top-level class definitions only. Nested classes are deliberately
/// not captured, unlike nested functions.
pub(super) fn collect_classes(root: Node<'_>, source: &str) -> Vec<ClassInfo> {
    let mut classes = Vec::new();
    for child in named_children(root) {
        let node = unwrap_decorated(child);
        if node.kind() == "class_definition" {
            classes.push(class_info(node, source));
        }
    }
    classes
}

fn class_info(node: Node<'_>, source: &str) -> ClassInfo {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(n, source).to_string())
        .unwrap_or_default();

    let bases = node
        .child_by_field_name("superclasses")
        .map(|args| {
            named_children(args)
                .into_iter()
                .filter(|c| c.kind() != "keyword_argument" && c.kind() != "comment")
                .map(|c| text(c, source).to_string())
                .collect()
        })
        .unwrap_or_default();

    let (methods, docstring) = match node.child_by_field_name("body") {
        Some(body) => {
            let methods = named_children(body)
                .into_iter()
                .map(unwrap_decorated)
                .filter(|c| c.kind() == "function_definition")
                .filter_map(|c| c.child_by_field_name("name"))
                .map(|n| text(n, source).to_string())
                .collect();
            (methods, block_docstring(body, source))
        }
        None => (Vec::new(), None),
    };

    ClassInfo {
        name,
        bases,
        methods,
        docstring,
    }
}

// ---------------------------------------------------------------------------
// Type hints
// ---------------------------------------------------------------------------

/// Per-parameter and return annotations for top-level functions only.
pub(super) fn collect_type_hints(root: Node<'_>, source: &str) -> BTreeMap<String, TypeHints> {
    let mut hints = BTreeMap::new();
    for child in named_children(root) {
        let node = unwrap_decorated(child);
        if node.kind() != "function_definition" {
            continue;
        }
        let Some(name) = node.child_by_field_name("name") else {
            continue;
        };

        let mut parameters = BTreeMap::new();
        if let Some(params) = node.child_by_field_name("parameters") {
            for param in named_children(params) {
                match param.kind() {
                    "identifier" => {
                        parameters.insert(text(param, source).to_string(), None);
                    }
                    "typed_parameter" => match param.named_child(0) {
                        Some(inner) if inner.kind() == "identifier" => {
                            let annotation = param
                                .child_by_field_name("type")
                                .map(|t| text(t, source).to_string());
                            parameters.insert(text(inner, source).to_string(), annotation);
                        }
                        Some(inner)
                            if matches!(
                                inner.kind(),
                                "list_splat_pattern" | "dictionary_splat_pattern"
                            ) =>
                        {
                            break
                        }
                        _ => {}
                    },
                    "default_parameter" | "typed_default_parameter" => {
                        if let Some(pname) = param.child_by_field_name("name") {
                            if pname.kind() == "identifier" {
                                let annotation = param
                                    .child_by_field_name("type")
                                    .map(|t| text(t, source).to_string());
                                parameters.insert(text(pname, source).to_string(), annotation);
                            }
                        }
                    }
                    "positional_separator" => parameters.clear(),
                    "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => {
                        break
                    }
                    _ => {}
                }
            }
        }

        let returns = node
            .child_by_field_name("return_type")
            .map(|r| text(r, source).to_string());

        hints.insert(
            text(name, source).to_string(),
            TypeHints {
                parameters,
                returns,
            },
        );
    }
    hints
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Top-level `NAME = <literal>` assignments. The recorded value is the
/// literal's source text: a display string, never evaluated.
pub(super) fn collect_constants(root: Node<'_>, source: &str) -> Vec<ConstantInfo> {
    const LITERAL_KINDS: &[&str] = &[
        "string",
        "concatenated_string",
        "integer",
        "float",
        "true",
        "false",
        "none",
    ];

    let mut constants = Vec::new();
    for child in named_children(root) {
        if child.kind() != "expression_statement" {
            continue;
        }
        let Some(assign) = child.named_child(0) else {
            continue;
        };
        if assign.kind() != "assignment" {
            continue;
        }
        // annotated assignments (`X: int = 5`) are not simple constants
        if assign.child_by_field_name("type").is_some() {
            continue;
        }
        let Some(left) = assign.child_by_field_name("left") else {
            continue;
        };
        if left.kind() != "identifier" {
            continue;
        }
        let Some(right) = assign.child_by_field_name("right") else {
            continue;
        };
        if !LITERAL_KINDS.contains(&right.kind()) {
            continue;
        }
        constants.push(ConstantInfo {
            name: text(left, source).to_string(),
            value_repr: text(right, source).to_string(),
        });
    }
    constants
}

// ---------------------------------------------------------------------------
// Docstrings
// ---------------------------------------------------------------------------

/// Docstring of a block (module body, function body, class body): the first
/// statement when it is a bare string literal.
pub(super) fn block_docstring(body: Node<'_>, source: &str) -> Option<String> {
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let expr = first.named_child(0)?;
    if expr.kind() != "string" {
        return None;
    }
    Some(clean_docstring(string_content(expr, source)))
}

/// The text between a string's opening and closing quote tokens.
fn string_content<'a>(string: Node<'_>, source: &'a str) -> &'a str {
    let mut start = string.start_byte();
    let mut end = string.end_byte();
    for i in 0..string.child_count() {
        if let Some(child) = string.child(i) {
            match child.kind() {
                "string_start" => start = child.end_byte(),
                "string_end" => end = child.start_byte(),
                _ => {}
            }
        }
    }
    source.get(start..end.max(start)).unwrap_or("")
}

/// Normalize a docstring: dedent continuation lines by their common indent
/// and strip surrounding blank lines.
fn clean_docstring(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();
    if lines.is_empty() {
        return String::new();
    }

    let indent = lines[1..]
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    cleaned.push(lines[0].trim());
    for line in &lines[1..] {
        if line.trim().is_empty() {
            cleaned.push("");
        } else {
            cleaned.push(line[indent..].trim_end());
        }
    }

    while cleaned.first().is_some_and(|l| l.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.is_empty()) {
        cleaned.pop();
    }

    cleaned.join("\n")
}
