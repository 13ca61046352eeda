//! Python declaration extraction using tree-sitter

use super::common::{Declaration, ParsedUnit, Parser, IMPLICIT_RECEIVERS};
use crate::discovery::SourceUnit;
use crate::error::ExtractError;
use std::collections::HashSet;
use tree_sitter::{Node, Tree};

/// Extracts function declarations from Python 3 source. Units that are
/// not valid Python 3 are rejected with [`ExtractError::Syntax`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract declarations from already-loaded text
    pub fn parse_source(&self, unit: &SourceUnit, source: &str) -> Result<ParsedUnit, ExtractError> {
        let tree = self.parse_tree(source)?;
        let root = tree.root_node();

        let invalid = if root.has_error() {
            Some(first_error_line(root).unwrap_or(1))
        } else {
            first_rejected_line(root, source.as_bytes())
        };
        if let Some(line) = invalid {
            return Err(ExtractError::Syntax {
                path: unit.path.clone(),
                line,
            });
        }

        let mut extractor = Extractor::new(unit.module_name(), source.as_bytes());
        extractor.walk(root);
        Ok(extractor.parsed)
    }

    fn parse_tree(&self, source: &str) -> Result<Tree, ExtractError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ExtractError::Grammar(e.to_string()))?;

        parser
            .parse(source, None)
            .ok_or_else(|| ExtractError::Grammar("parser produced no tree".to_string()))
    }
}

impl Parser for PythonParser {
    fn parse(&self, unit: &SourceUnit) -> Result<ParsedUnit, ExtractError> {
        let source = unit.read()?;
        self.parse_source(unit, &source)
    }
}

struct Extractor<'a> {
    module: String,
    source: &'a [u8],
    seen: HashSet<String>,
    parsed: ParsedUnit,
}

impl<'a> Extractor<'a> {
    fn new(module: String, source: &'a [u8]) -> Self {
        Self {
            module,
            source,
            seen: HashSet::new(),
            parsed: ParsedUnit::default(),
        }
    }

    /// Pre-order walk, so declarations come out in file order. Each entry
    /// carries the innermost class enclosing it.
    fn walk(&mut self, root: Node<'_>) {
        let mut stack: Vec<(Node<'_>, Option<String>)> = vec![(root, None)];

        while let Some((node, class)) = stack.pop() {
            let mut inner_class = class.clone();

            match node.kind() {
                "class_definition" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        inner_class = Some(self.text(name).to_string());
                    }
                }
                "function_definition" => self.record_function(node, class.as_deref()),
                "call" => self.record_call(node),
                _ => {}
            }

            let mut cursor = node.walk();
            let children: Vec<_> = node.named_children(&mut cursor).collect();
            for child in children.into_iter().rev() {
                stack.push((child, inner_class.clone()));
            }
        }
    }

    fn record_function(&mut self, node: Node<'_>, class: Option<&str>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };

        let mut decl = Declaration::new(
            self.module.as_str(),
            class.map(str::to_string),
            self.text(name),
        );
        decl.line = node.start_position().row + 1;
        decl.has_return_annotation = node
            .child_by_field_name("return_type")
            .is_some_and(|ty| self.is_present(ty));

        if let Some(params) = node.child_by_field_name("parameters") {
            let mut cursor = params.walk();
            for param in params.named_children(&mut cursor) {
                let Some((name, annotated)) = self.parameter(param) else {
                    continue;
                };
                if IMPLICIT_RECEIVERS.contains(&name) {
                    continue;
                }
                decl.parameter_count += 1;
                if annotated {
                    decl.annotated_parameter_count += 1;
                }
            }
        }

        // First definition in the file wins
        if self.seen.insert(decl.qualified_name()) {
            self.parsed.declarations.push(decl);
        }
    }

    /// Name and annotation presence of one entry in a parameter list.
    /// Separators (`*`, `/`) and comments yield nothing.
    fn parameter(&self, param: Node<'_>) -> Option<(&'a str, bool)> {
        match param.kind() {
            "identifier" => Some((self.text(param), false)),
            "default_parameter" => param
                .child_by_field_name("name")
                .map(|name| (self.text(name), false)),
            "typed_default_parameter" => {
                let name = param.child_by_field_name("name")?;
                let annotated = param
                    .child_by_field_name("type")
                    .is_some_and(|ty| self.is_present(ty));
                Some((self.text(name), annotated))
            }
            "typed_parameter" => {
                let name = param.named_child(0)?;
                let annotated = param
                    .child_by_field_name("type")
                    .is_some_and(|ty| self.is_present(ty));
                Some((self.binding_name(name), annotated))
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                Some((self.binding_name(param), false))
            }
            _ => None,
        }
    }

    /// Identifier bound by a parameter, looking through `*`/`**` patterns
    fn binding_name(&self, node: Node<'_>) -> &'a str {
        match node.kind() {
            "list_splat_pattern" | "dictionary_splat_pattern" => node
                .named_child(0)
                .map(|inner| self.text(inner))
                .unwrap_or(""),
            _ => self.text(node),
        }
    }

    fn record_call(&mut self, node: Node<'_>) {
        let Some(function) = node.child_by_field_name("function") else {
            return;
        };
        if function.kind() != "identifier" {
            return;
        }

        match self.text(function) {
            "hasattr" => self.parsed.hasattr_calls += 1,
            "getattr" => {
                if positional_arguments(node) == 3 {
                    self.parsed.getattr_default_calls += 1;
                }
            }
            _ => {}
        }
    }

    fn is_present(&self, annotation: Node<'_>) -> bool {
        !self.text(annotation).trim().is_empty()
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.source).unwrap_or("")
    }
}

fn positional_arguments(call: Node<'_>) -> usize {
    let Some(args) = call.child_by_field_name("arguments") else {
        return 0;
    };
    if args.kind() != "argument_list" {
        return 0;
    }

    let mut cursor = args.walk();
    args.named_children(&mut cursor)
        .filter(|arg| !matches!(arg.kind(), "comment" | "keyword_argument"))
        .count()
}

/// Line of the first ERROR or MISSING node, descending only into subtrees
/// that contain one.
fn first_error_line(root: Node<'_>) -> Option<usize> {
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row + 1);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    None
}

/// Line of the first construct the grammar accepts but Python 3 does not:
/// Python 2 statements and literals, required parameters after defaults,
/// and statements indented differently within one block.
fn first_rejected_line(root: Node<'_>, source: &[u8]) -> Option<usize> {
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if let Some(line) = rejected_line(node, source) {
            return Some(line);
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    None
}

fn rejected_line(node: Node<'_>, source: &[u8]) -> Option<usize> {
    let line = node.start_position().row + 1;

    match node.kind() {
        "print_statement" | "exec_statement" => Some(line),
        // `except E, e:` and `raise E, "message"`
        "except_clause" | "raise_statement" => {
            (has_token(node, ",") || has_named(node, "expression_list")).then_some(line)
        }
        "comparison_operator" => has_token(node, "<>").then_some(line),
        "integer" => {
            let text = node.utf8_text(source).unwrap_or("");
            is_python2_integer(text).then_some(line)
        }
        "parameters" | "lambda_parameters" => invalid_parameter_line(node),
        "block" => misindented_line(node),
        _ => None,
    }
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token);
    found
}

fn has_named(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).any(|child| child.kind() == kind);
    found
}

/// Octal literals without `0o` (`0777`) and long literals (`10L`)
fn is_python2_integer(text: &str) -> bool {
    if text.ends_with(['l', 'L']) {
        return true;
    }
    if text.ends_with(['j', 'J']) {
        return false;
    }

    let bytes = text.as_bytes();
    bytes.len() > 1
        && bytes[0] == b'0'
        && (bytes[1].is_ascii_digit() || bytes[1] == b'_')
        && bytes.iter().any(|b| (b'1'..=b'9').contains(b))
}

/// Tuple parameters, or a required positional parameter after one with a
/// default. Everything after `*`, `*args` or `**kwargs` is keyword-only and
/// may omit its default.
fn invalid_parameter_line(params: Node<'_>) -> Option<usize> {
    let mut seen_default = false;
    let mut cursor = params.walk();

    for param in params.named_children(&mut cursor) {
        let line = param.start_position().row + 1;
        match param.kind() {
            "tuple_pattern" => return Some(line),
            "default_parameter" | "typed_default_parameter" => seen_default = true,
            "identifier" if seen_default => return Some(line),
            "typed_parameter" => {
                let splat = param.named_child(0).is_some_and(|name| {
                    matches!(name.kind(), "list_splat_pattern" | "dictionary_splat_pattern")
                });
                if splat {
                    return None;
                }
                if seen_default {
                    return Some(line);
                }
            }
            "keyword_separator" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                return None
            }
            _ => {}
        }
    }

    None
}

/// Line of the first statement in `block` that starts a line at a column
/// other than the block's first statement. Statements sharing a line
/// (`a = 1; b = 2`) and comments are not checked.
fn misindented_line(block: Node<'_>) -> Option<usize> {
    let mut column = None;
    let mut last_row = None;
    let mut cursor = block.walk();

    for statement in block.named_children(&mut cursor) {
        if statement.kind() == "comment" {
            continue;
        }
        let start = statement.start_position();
        let starts_line = match last_row {
            Some(row) => start.row > row,
            None => true,
        };
        last_row = Some(statement.end_position().row);
        if !starts_line {
            continue;
        }

        match column {
            None => column = Some(start.column),
            Some(expected) if expected != start.column => return Some(start.row + 1),
            Some(_) => {}
        }
    }

    None
}
