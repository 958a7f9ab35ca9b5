use crate::codegen::{self, CodegenError};
use crate::lexer::{self, LexError};
use crate::parser::{self, ParseError};
use crate::semantic_analysis::{annotate, build_symbol_table, SemAnalysisError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Semantic(#[from] SemAnalysisError),
    #[error(transparent)]
    Codegen(CodegenError),
}

/// Name lookups that only fail while lowering are still semantic errors.
impl From<CodegenError> for CompileError {
    fn from(e: CodegenError) -> Self {
        match e {
            CodegenError::Semantic(e) => Self::Semantic(e),
            other => Self::Codegen(other),
        }
    }
}

/// Translate one Mis module into a complete C translation unit.
///
/// Nothing is produced on error; the first failing stage wins.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = lexer::lex(source)?;
    let module = parser::parse(&tokens, source)?;
    let symbols = build_symbol_table(&module);
    let typed = annotate(&module, &symbols)?;
    let program = codegen::codegen(&typed, &symbols)?;
    log::debug!("emitting {} functions", program.functions.len());
    Ok(program.to_string())
}
