use crate::discovery::SourceUnit;
use crate::error::ExtractError;

/// Parameter names bound implicitly by the interpreter; never counted
pub const IMPLICIT_RECEIVERS: &[&str] = &["self", "cls", "mcls", "metacls"];

/// Instance initializer; excluded from return-type statistics
pub const INITIALIZER_NAME: &str = "__init__";

/// One function or method signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Module the declaration lives in (file stem)
    pub module: String,
    /// Innermost enclosing class, if any
    pub enclosing_type: Option<String>,
    pub name: String,
    /// Parameters excluding implicit receivers
    pub parameter_count: usize,
    pub annotated_parameter_count: usize,
    pub has_return_annotation: bool,
    pub is_initializer: bool,
    /// 1-based line of the `def`
    pub line: usize,
}

impl Declaration {
    pub fn new(module: impl Into<String>, enclosing_type: Option<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        let is_initializer = name == INITIALIZER_NAME;
        Self {
            module: module.into(),
            enclosing_type,
            name,
            parameter_count: 0,
            annotated_parameter_count: 0,
            has_return_annotation: false,
            is_initializer,
            line: 0,
        }
    }

    /// `module.Class.name` or `module.name`
    pub fn qualified_name(&self) -> String {
        match &self.enclosing_type {
            Some(class) => format!("{}.{}.{}", self.module, class, self.name),
            None => format!("{}.{}", self.module, self.name),
        }
    }

    /// Whether the declaration counts toward the public surface: no part of
    /// its path is underscore-private. Dunder names are public.
    pub fn is_public(&self) -> bool {
        let is_private = |part: &str| part.starts_with('_') && !is_dunder(part);
        !is_private(&self.module)
            && !self.enclosing_type.as_deref().is_some_and(is_private)
            && !is_private(&self.name)
    }
}

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// Everything extracted from one source unit
#[derive(Debug, Clone, Default)]
pub struct ParsedUnit {
    /// One entry per fully-qualified name, in file order
    pub declarations: Vec<Declaration>,
    /// `hasattr(...)` call sites
    pub hasattr_calls: usize,
    /// `getattr(obj, name, default)` call sites
    pub getattr_default_calls: usize,
}

/// Extracts declarations from a source unit
pub trait Parser: Sync {
    fn parse(&self, unit: &SourceUnit) -> Result<ParsedUnit, ExtractError>;
}
