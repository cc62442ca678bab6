//! Grammar configuration.
//!
//! The language drafts disagree on a handful of points. Each of them is a knob
//! here instead of a hard-coded choice in the parser.

use crate::builtins::BuiltinTable;

/// Whether an `if`/`while` head may, must or must not carry a `|name|`
/// null-unwrap binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingPolicy {
    #[default]
    Optional,
    Required,
    Forbidden,
}

/// Which raw bytes a string literal may contain between its quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringBytes {
    /// Control characters must be written as escapes.
    #[default]
    Printable,
    /// Anything except `"`, `\` and a line break.
    Any,
}

#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// `if (a < b)` style heads: a relational operator and a second expression
    /// after the condition.
    pub relational_tail: bool,
    /// Relational operators are ordinary binary operators everywhere, binding
    /// looser than `+` and `-`.
    pub relational_in_expressions: bool,
    pub binding: BindingPolicy,
    pub string_bytes: StringBytes,
    /// Identifiers are accepted as type names.
    pub user_defined_types: bool,
    /// The `@import` prolog must be present.
    pub require_prolog: bool,
    /// Deepest nesting of expressions and blocks before parsing gives up on a
    /// construct. The default keeps a debug build inside a 2 MiB thread stack.
    pub max_depth: usize,
    pub builtins: BuiltinTable,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            relational_tail: true,
            relational_in_expressions: false,
            binding: BindingPolicy::Optional,
            string_bytes: StringBytes::Printable,
            user_defined_types: true,
            require_prolog: false,
            max_depth: 64,
            builtins: BuiltinTable::ifj24(),
        }
    }
}

impl ParserConfig {
    /// The profile the IFJ24 assignment describes: the prolog is mandatory and
    /// only the built-in types exist.
    pub fn strict() -> Self {
        ParserConfig {
            user_defined_types: false,
            require_prolog: true,
            ..ParserConfig::default()
        }
    }

    pub fn with_relational_tail(mut self, enabled: bool) -> Self {
        self.relational_tail = enabled;
        self
    }

    pub fn with_relational_in_expressions(mut self, enabled: bool) -> Self {
        self.relational_in_expressions = enabled;
        self
    }

    pub fn with_binding(mut self, binding: BindingPolicy) -> Self {
        self.binding = binding;
        self
    }

    pub fn with_string_bytes(mut self, string_bytes: StringBytes) -> Self {
        self.string_bytes = string_bytes;
        self
    }

    pub fn with_user_defined_types(mut self, enabled: bool) -> Self {
        self.user_defined_types = enabled;
        self
    }

    pub fn with_require_prolog(mut self, required: bool) -> Self {
        self.require_prolog = required;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_builtins(mut self, builtins: BuiltinTable) -> Self {
        self.builtins = builtins;
        self
    }
}
