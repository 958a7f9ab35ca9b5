use crate::ast::{DataType, Identifier, NodeId};
use crate::semantic_analysis::SemAnalysisError;

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error(transparent)]
    Semantic(#[from] SemAnalysisError),
    #[error("constant {name} is initialized with a {kind}, only literals are supported")]
    UnsupportedConstant { name: Identifier, kind: &'static str },
    #[error("function {0} returns a value but has no return type")]
    ReturnValueInVoidFunction(Identifier),
    #[error("variable {name} is redeclared as {new}, but was {previous}")]
    ConflictingDeclaration {
        name: Identifier,
        previous: DataType,
        new: DataType,
    },
    #[error("{0} is reserved for generated code and can't name a variable or parameter")]
    ReservedName(Identifier),
    #[error("function {0} starts with an uppercase letter, which is reserved for struct constructors")]
    UppercaseFunction(Identifier),
    #[error("struct {0} contains itself through its fields")]
    RecursiveStruct(Identifier),
    #[error("no entry point: a function start() without parameters is required")]
    MissingEntryPoint,
    #[error("expression {0:?} has no slot")]
    MissingSlot(NodeId),
}
