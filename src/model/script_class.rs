//! Documentation model extracted from annotated script source.
//!
//! Order of appearance in source is preserved everywhere; it is the
//! documentation order.

/// An exported variable or a function argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    /// Declared type; empty when the source leaves it implicit.
    pub var_type: String,
    /// Description attached by a `#VAR` marker, if any.
    pub short_desc: String,
}

/// A named group of exported variables opened by `@export_category`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportCategory {
    /// Category name; empty for the implicit default category.
    pub name: String,
    pub variables: Vec<Variable>,
}

/// A function extracted from script source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    /// Description attached by a `#FUNC` marker, if any.
    pub short_desc: String,
    pub arguments: Vec<Variable>,
    /// Declared return type; `"void"` when absent.
    pub return_type: String,
}

/// The documentation model of one script file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptClass {
    /// Whether the script declares a global class name.
    pub is_public: bool,
    /// Name declared by `class_name`, if any.
    pub name: String,
    /// Extended class, from `extends`.
    pub parent: String,
    /// Tags from a `#TAGS` marker, in source order.
    pub tags: Vec<String>,
    /// Short description from a `#CLASS` marker.
    pub short_desc: String,
    /// Export categories in source order.
    pub categories: Vec<ExportCategory>,
    /// Functions in source order.
    pub functions: Vec<Function>,
}
