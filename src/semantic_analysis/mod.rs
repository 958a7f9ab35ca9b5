mod datatype;
mod symbol_table;

use crate::ast::{DataType, Identifier};
use thiserror::Error;

pub use datatype::{annotate, infer_type, infer_value_type, resolve_call, Scope, TypedModule};
pub use symbol_table::{
    build_symbol_table, mangle, Signature, Symbol, SymbolKind, SymbolTable, BUILTIN_TYPES,
};

pub type Result<T> = std::result::Result<T, SemAnalysisError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SemAnalysisError {
    #[error("unknown function {0}")]
    UnknownFunction(Identifier),
    #[error("unknown identifier {0}")]
    UnknownIdentifier(Identifier),
    #[error("type {0} is not implemented")]
    UnknownType(DataType),
    #[error("function {0} does not return a value")]
    VoidValue(Identifier),
    #[error("function {name} called with {got} arguments, but expected {expected}")]
    ArgumentCountMismatch {
        name: Identifier,
        expected: usize,
        got: usize,
    },
    #[error("no overload of {name} takes ({args})")]
    NoMatchingOverload { name: Identifier, args: String },
    #[error("unsupported callee of kind {0}, only identifiers can be called")]
    UnsupportedCallee(&'static str),
}
