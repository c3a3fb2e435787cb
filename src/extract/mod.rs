//! Structural extraction from source text.
//!
//! Every accessor parses the source on its own, so each is independently
//! callable and gives the same answer alone or as part of [`extract`]. An
//! accessor returns `None` when the source does not parse cleanly, the
//! explicit "no data" signal; [`extract`] flattens that to empty fields so
//! the pipeline always has a record to carry forward.

mod python;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One extracted function definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub parameters: Vec<String>,
    pub return_annotation: Option<String>,
    pub docstring: Option<String>,
}

/// One extracted top-level class definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub bases: Vec<String>,
    pub methods: Vec<String>,
    pub docstring: Option<String>,
}

/// Module, function and class docstrings in one view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocstringMap {
    pub module: Option<String>,
    pub functions: BTreeMap<String, Option<String>>,
    pub classes: BTreeMap<String, Option<String>>,
}

/// Annotations of a single top-level function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeHints {
    pub parameters: BTreeMap<String, Option<String>>,
    pub returns: Option<String>,
}

/// One top-level constant assignment. `value_repr` is the literal's source
/// text, kept only for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantInfo {
    pub name: String,
    pub value_repr: String,
}

/// The full structural metadata record for one file.
///
/// `file_name` is attached by the orchestrator after extraction; `summary`
/// stays unset until the summarization step resolves (successfully or not).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralRecord {
    pub imports: Vec<String>,
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub docstrings: DocstringMap,
    pub type_hints: BTreeMap<String, TypeHints>,
    pub constants: Vec<ConstantInfo>,
    #[serde(default)]
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Import entries over the whole tree, in traversal order, duplicates
/// preserved. `from A import B` is normalized to `A.B`.
pub fn imports(source: &str) -> Option<Vec<String>> {
    let tree = python::parse(source)?;
    Some(python::collect_imports(tree.root_node(), source))
}

/// Every function definition in the tree, nested ones included.
pub fn functions(source: &str) -> Option<Vec<FunctionInfo>> {
    let tree = python::parse(source)?;
    Some(python::collect_functions(tree.root_node(), source))
}

/// Top-level class definitions only.
pub fn classes(source: &str) -> Option<Vec<ClassInfo>> {
    let tree = python::parse(source)?;
    Some(python::collect_classes(tree.root_node(), source))
}

/// Module docstring plus per-function and per-class docstrings, re-derived
/// from the function and class walks (duplicate names: the later wins).
pub fn docstrings(source: &str) -> Option<DocstringMap> {
    let tree = python::parse(source)?;
    let root = tree.root_node();

    let functions = python::collect_functions(root, source)
        .into_iter()
        .map(|f| (f.name, f.docstring))
        .collect();
    let classes = python::collect_classes(root, source)
        .into_iter()
        .map(|c| (c.name, c.docstring))
        .collect();

    Some(DocstringMap {
        module: python::block_docstring(root, source),
        functions,
        classes,
    })
}

/// Parameter and return annotations for top-level functions only.
pub fn type_hints(source: &str) -> Option<BTreeMap<String, TypeHints>> {
    let tree = python::parse(source)?;
    Some(python::collect_type_hints(tree.root_node(), source))
}

/// Top-level single-target `NAME = literal` assignments.
pub fn constants(source: &str) -> Option<Vec<ConstantInfo>> {
    let tree = python::parse(source)?;
    Some(python::collect_constants(tree.root_node(), source))
}

/// Build the combined structural record for one file's text.
///
/// Never fails: unparsable input yields a record with every sequence and
/// mapping empty, and the file still flows through the rest of the pipeline.
pub fn extract(source: &str) -> StructuralRecord {
    StructuralRecord {
        imports: imports(source).unwrap_or_default(),
        functions: functions(source).unwrap_or_default(),
        classes: classes(source).unwrap_or_default(),
        docstrings: docstrings(source).unwrap_or_default(),
        type_hints: type_hints(source).unwrap_or_default(),
        constants: constants(source).unwrap_or_default(),
        file_name: String::new(),
        summary: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#""""Module docs."""
import os
import os.path as osp
from typing import Dict, Optional

GREETING = "hello"
LIMIT = 42
DEBUG = False

def add(a: int, b: int) -> int:
    """adds two numbers"""
    return a + b

def outer():
    def inner(x):
        return x
    return inner

class Greeter(Base, mixin=Thing):
    """Says hello."""

    def greet(self, name):
        """Greet someone."""
        return GREETING + name

    def _quiet(self):
        pass
"#;

    #[test]
    fn test_malformed_input_yields_none() {
        assert!(imports("def broken(:").is_none());
        assert!(functions("def broken(:").is_none());
        assert!(classes("class :").is_none());
        assert!(docstrings("def broken(:").is_none());
        assert!(type_hints("def broken(:").is_none());
        assert!(constants("x = = 3").is_none());
    }

    #[test]
    fn test_malformed_input_extracts_empty_record() {
        let record = extract("def broken(:");
        assert!(record.imports.is_empty());
        assert!(record.functions.is_empty());
        assert!(record.classes.is_empty());
        assert!(record.type_hints.is_empty());
        assert!(record.constants.is_empty());
        assert_eq!(record.docstrings, DocstringMap::default());
        assert!(record.summary.is_none());
    }

    #[test]
    fn test_empty_and_binary_garbage_never_panic() {
        let _ = extract("");
        let _ = extract("\u{0}\u{1}\u{fffd}garbage\u{7f}");
        assert!(extract("").functions.is_empty());
    }

    #[test]
    fn test_import_normalization() {
        let imports = imports(
            "import os\nimport os.path\nfrom a.b import c, d\nfrom x import y as z\nimport os\n",
        )
        .unwrap();
        assert_eq!(imports, vec!["os", "os.path", "a.b.c", "a.b.d", "x.y", "os"]);
    }

    #[test]
    fn test_relative_and_wildcard_imports() {
        let imports = imports("from . import a\nfrom .mod import b\nfrom pkg import *\n").unwrap();
        // `from . import a` has no module path and is dropped
        assert_eq!(imports, vec!["mod.b", "pkg.*"]);
    }

    #[test]
    fn test_imports_found_inside_functions() {
        let imports = imports("def f():\n    import json\n    return json\n").unwrap();
        assert_eq!(imports, vec!["json"]);
    }

    #[test]
    fn test_function_extraction() {
        let functions = functions(SAMPLE).unwrap();
        let add = &functions[0];
        assert_eq!(add.name, "add");
        assert_eq!(add.parameters, vec!["a", "b"]);
        assert_eq!(add.return_annotation.as_deref(), Some("int"));
        assert_eq!(add.docstring.as_deref(), Some("adds two numbers"));
    }

    #[test]
    fn test_nested_definitions_asymmetry() {
        // Functions are collected by a whole-tree walk; classes are not.
        let functions = functions(SAMPLE).unwrap();
        let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["add", "outer", "inner", "greet", "_quiet"]);

        let nested_class = "class Top:\n    class Inner:\n        pass\n";
        let classes = classes(nested_class).unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "Top");
    }

    #[test]
    fn test_class_extraction() {
        let classes = classes(SAMPLE).unwrap();
        assert_eq!(classes.len(), 1);
        let greeter = &classes[0];
        assert_eq!(greeter.name, "Greeter");
        // keyword arguments (metaclass etc.) are not bases
        assert_eq!(greeter.bases, vec!["Base"]);
        assert_eq!(greeter.methods, vec!["greet", "_quiet"]);
        assert_eq!(greeter.docstring.as_deref(), Some("Says hello."));
    }

    #[test]
    fn test_docstring_map() {
        let docs = docstrings(SAMPLE).unwrap();
        assert_eq!(docs.module.as_deref(), Some("Module docs."));
        assert_eq!(
            docs.functions.get("add").and_then(|d| d.as_deref()),
            Some("adds two numbers")
        );
        assert_eq!(docs.functions.get("outer"), Some(&None));
        assert_eq!(
            docs.classes.get("Greeter").and_then(|d| d.as_deref()),
            Some("Says hello.")
        );
    }

    #[test]
    fn test_multiline_docstring_dedented() {
        let source = "def f():\n    \"\"\"First line.\n\n        Indented body.\n    \"\"\"\n    pass\n";
        let functions = functions(source).unwrap();
        let doc = functions[0].docstring.as_deref().unwrap();
        assert_eq!(doc, "First line.\n\nIndented body.");
    }

    #[test]
    fn test_type_hints_top_level_only() {
        let hints = type_hints(SAMPLE).unwrap();
        assert!(hints.contains_key("add"));
        assert!(hints.contains_key("outer"));
        // `inner` and methods are not top-level
        assert!(!hints.contains_key("inner"));
        assert!(!hints.contains_key("greet"));

        let add = &hints["add"];
        assert_eq!(add.parameters.get("a").unwrap().as_deref(), Some("int"));
        assert_eq!(add.returns.as_deref(), Some("int"));

        let outer = &hints["outer"];
        assert!(outer.parameters.is_empty());
        assert_eq!(outer.returns, None);
    }

    #[test]
    fn test_unannotated_parameters_map_to_none() {
        let hints = type_hints("def f(a, b: str, c=1):\n    pass\n").unwrap();
        let f = &hints["f"];
        assert_eq!(f.parameters.get("a"), Some(&None));
        assert_eq!(f.parameters.get("b").unwrap().as_deref(), Some("str"));
        assert_eq!(f.parameters.get("c"), Some(&None));
    }

    #[test]
    fn test_splat_parameters_excluded() {
        let functions = functions("def f(a, *args, **kwargs):\n    pass\n").unwrap();
        assert_eq!(functions[0].parameters, vec!["a"]);
    }

    #[test]
    fn test_constants() {
        let constants = constants(SAMPLE).unwrap();
        let pairs: Vec<(&str, &str)> = constants
            .iter()
            .map(|c| (c.name.as_str(), c.value_repr.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("GREETING", "\"hello\""), ("LIMIT", "42"), ("DEBUG", "False")]
        );
    }

    #[test]
    fn test_non_literal_assignments_skipped() {
        let constants =
            constants("A = [1, 2]\nB = foo()\nC: int = 3\na, b = 1, 2\nD = None\n").unwrap();
        let names: Vec<&str> = constants.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["D"]);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let first = extract(SAMPLE);
        let second = extract(SAMPLE);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_summary_absent_from_json_until_set() {
        let record = extract(SAMPLE);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("\"summary\""));
    }
}
