//! Error codes for all reflection diagnostics.
//!
//! Each code is a unique identifier (e.g., `E2001`) whose first digit names
//! the component that rejected the program.

use std::fmt;

/// Error codes for all reflection diagnostics.
///
/// Format: E#### where the first digit indicates the component:
/// - E1xxx: Construct resolution (`reflect`)
/// - E2xxx: Metafunction queries
/// - E3xxx: Splices
/// - E4xxx: Substitution and instantiation
/// - E5xxx: Generative declarations
/// - E6xxx: Evaluation sequencing
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Resolution (E1xxx)
    /// Overload set does not resolve to exactly one function
    E1001,
    /// Looked-up construct cannot be reflected
    E1002,
    /// Name lookup found nothing
    E1003,

    // Queries (E2xxx)
    /// Metafunction precondition not met
    E2001,
    /// Evaluation budget exhausted
    E2002,
    /// Evaluation nesting too deep
    E2003,
    /// Malformed handle in a non-constant library call (warning)
    E2099,

    // Splices (E3xxx)
    /// Splice of a constructor or destructor
    E3001,
    /// Splice used to open a namespace definition
    E3002,
    /// Dependent splice in a using-directive
    E3003,
    /// Dependent splice in a using-enum-declaration
    E3004,
    /// Concept splice in a template parameter declaration
    E3005,
    /// Splice used as a designator
    E3006,
    /// Splice does not denote a construct valid in this position
    E3007,
    /// Splice of a null reflection
    E3008,
    /// Address of a spliced bit-field
    E3009,

    // Substitution (E4xxx)
    /// Substitution failed in the immediate context
    E4001,
    /// Instantiation failed outside the immediate context
    E4002,

    // Generative declarations (E5xxx)
    /// Declaration injected outside a plainly-evaluated expression
    E5001,
    /// Aggregate redefined with a different member list
    E5002,
    /// Invalid data member description
    E5003,
    /// Target cannot be defined by injection
    E5004,

    // Evaluation sequencing (E6xxx)
    /// Plain evaluation requested out of lexical order
    E6001,
    /// Plainly-evaluated expression is not constant
    E6002,

    // Internal (E9xxx)
    /// Internal invariant violated
    E9001,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E2001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2099 => "E2099",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            ErrorCode::E3008 => "E3008",
            ErrorCode::E3009 => "E3009",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
            ErrorCode::E5003 => "E5003",
            ErrorCode::E5004 => "E5004",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line description for `--explain`-style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "overload set does not resolve to exactly one function",
            ErrorCode::E1002 => "construct cannot be reflected",
            ErrorCode::E1003 => "name not found",
            ErrorCode::E2001 => "metafunction precondition not met",
            ErrorCode::E2002 => "evaluation budget exhausted",
            ErrorCode::E2003 => "evaluation nesting too deep",
            ErrorCode::E2099 => "malformed reflection in a non-constant call",
            ErrorCode::E3001 => "constructors and destructors cannot be spliced",
            ErrorCode::E3002 => "a splice cannot open a namespace definition",
            ErrorCode::E3003 => "dependent splice in a using-directive",
            ErrorCode::E3004 => "dependent splice in a using-enum-declaration",
            ErrorCode::E3005 => "concept splice in a template parameter declaration",
            ErrorCode::E3006 => "a splice cannot be used as a designator",
            ErrorCode::E3007 => "splice does not fit this grammar position",
            ErrorCode::E3008 => "splice of a null reflection",
            ErrorCode::E3009 => "cannot take the address of a bit-field",
            ErrorCode::E4001 => "template argument substitution failed",
            ErrorCode::E4002 => "template instantiation failed",
            ErrorCode::E5001 => "declaration injected outside a plainly-evaluated expression",
            ErrorCode::E5002 => "aggregate redefined with a different member list",
            ErrorCode::E5003 => "invalid data member description",
            ErrorCode::E5004 => "target cannot be defined by injection",
            ErrorCode::E6001 => "plain evaluation out of lexical order",
            ErrorCode::E6002 => "plainly-evaluated expression is not constant",
            ErrorCode::E9001 => "internal error",
        }
    }

    /// Check if this is a splice error (E3xxx).
    pub fn is_splice_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }

    /// Check if this is a generative declaration error (E5xxx).
    pub fn is_generative_error(&self) -> bool {
        self.as_str().starts_with("E5")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests;
