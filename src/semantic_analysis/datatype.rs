use super::symbol_table::check_arity;
use super::{Result, SemAnalysisError, Symbol, SymbolTable};
use crate::ast::*;

use std::collections::HashMap;

/// Variables visible while typing an expression.
pub trait Scope {
    fn variable_type(&self, name: &str) -> Option<&DataType>;
}

/// A parsed module together with the datatype of every variable
/// declaration and assignment, keyed by statement id.
#[derive(Debug, Clone)]
pub struct TypedModule<'a> {
    module: &'a Module,
    types: HashMap<NodeId, DataType>,
}

impl<'a> TypedModule<'a> {
    pub fn module(&self) -> &'a Module {
        self.module
    }

    pub fn datatype_of(&self, id: NodeId) -> Option<&DataType> {
        self.types.get(&id)
    }

    pub fn annotated_count(&self) -> usize {
        self.types.len()
    }
}

struct FunctionScope<'g> {
    globals: &'g HashMap<Identifier, DataType>,
    locals: HashMap<Identifier, DataType>,
}

impl Scope for FunctionScope<'_> {
    fn variable_type(&self, name: &str) -> Option<&DataType> {
        self.locals.get(name).or_else(|| self.globals.get(name))
    }
}

fn callee_name(call: &Call) -> Result<&Identifier> {
    call.callee_name()
        .ok_or_else(|| SemAnalysisError::UnsupportedCallee(call.callee.kind_name()))
}

/// Find the symbol a call refers to.
///
/// Arguments are only typed when the callee is overloaded.
pub fn resolve_call<'s>(
    call: &Call,
    scope: &impl Scope,
    symbols: &'s SymbolTable,
) -> Result<&'s Symbol> {
    let name = callee_name(call)?;
    let candidates = symbols.candidates(name)?;
    if let [single] = candidates {
        return check_arity(name, single, call.args.len());
    }

    let arg_types = call
        .args
        .iter()
        .map(|arg| infer_value_type(arg, scope, symbols))
        .collect::<Result<Vec<_>>>()?;
    symbols.resolve(name, &arg_types)
}

/// Type of the value `exp` evaluates to, `None` for calls of void functions.
pub fn infer_type(
    exp: &Exp,
    scope: &impl Scope,
    symbols: &SymbolTable,
) -> Result<Option<DataType>> {
    match &exp.kind {
        ExpKind::Number(_) => Ok(Some(DataType::int())),
        ExpKind::Str(_) => Ok(Some(DataType::string())),
        ExpKind::Identifier(name) => scope
            .variable_type(name)
            .cloned()
            .map(Some)
            .ok_or_else(|| SemAnalysisError::UnknownIdentifier(name.clone())),
        ExpKind::Call(call) => {
            let symbol = resolve_call(call, scope, symbols)?;
            match &symbol.signature.return_type {
                Some(t) if !symbols.is_known_type(t) => Err(SemAnalysisError::UnknownType(t.clone())),
                rtype => Ok(rtype.clone()),
            }
        }
    }
}

/// Like [infer_type], but a void call is an error.
pub fn infer_value_type(exp: &Exp, scope: &impl Scope, symbols: &SymbolTable) -> Result<DataType> {
    infer_type(exp, scope, symbols)?.ok_or_else(|| {
        let name = exp
            .get_call()
            .and_then(Call::callee_name)
            .cloned()
            .unwrap_or_default();
        SemAnalysisError::VoidValue(name)
    })
}

struct Annotator<'s> {
    symbols: &'s SymbolTable,
    types: HashMap<NodeId, DataType>,
}

impl Annotator<'_> {
    fn annotate_block(&mut self, block: &Block, scope: &mut FunctionScope) -> Result<()> {
        for statement in block {
            self.annotate_statement(statement, scope)?;
        }
        Ok(())
    }

    fn annotate_statement(&mut self, statement: &Statement, scope: &mut FunctionScope) -> Result<()> {
        match &statement.kind {
            StatementKind::VarDec(VarDec { name, init, .. }) => {
                let datatype = infer_value_type(init, &*scope, self.symbols)?;
                scope.locals.insert(name.clone(), datatype.clone());
                self.types.insert(statement.id, datatype);
            }
            StatementKind::Assign(Assign { name, value }) => {
                let datatype = infer_value_type(value, &*scope, self.symbols)?;
                if let Some(declared) = scope.variable_type(name).filter(|&d| *d != datatype) {
                    log::warn!("{name} is declared as {declared} but assigned a {datatype}");
                }
                self.types.insert(statement.id, datatype);
            }
            StatementKind::If(If { then, els, .. }) => {
                self.annotate_block(then, scope)?;
                if let Some(els) = els {
                    self.annotate_block(els, scope)?;
                }
            }
            StatementKind::For(For { body, .. }) => self.annotate_block(body, scope)?,
            StatementKind::Return(_) | StatementKind::Call(_) => (),
        }
        Ok(())
    }

    fn annotate_function(&mut self, f: &FunDec, globals: &HashMap<Identifier, DataType>) -> Result<()> {
        let locals = f
            .params
            .iter()
            .map(|p| (p.name.clone(), p.param_type.clone()))
            .collect();
        let mut scope = FunctionScope { globals, locals };
        self.annotate_block(&f.body, &mut scope)
    }
}

/// Record the datatype of every variable declaration and assignment.
///
/// `module` is only borrowed; the result refers back to it.
pub fn annotate<'a>(module: &'a Module, symbols: &SymbolTable) -> Result<TypedModule<'a>> {
    let globals: HashMap<_, _> = module
        .constants()
        .map(|c| (c.name.clone(), c.const_type.clone()))
        .collect();
    let mut annotator = Annotator {
        symbols,
        types: HashMap::new(),
    };

    for declaration in &module.declarations {
        match declaration {
            Declaration::Fun(f) => annotator.annotate_function(f, &globals)?,
            Declaration::Struct(_) | Declaration::Const(_) => (),
        }
    }

    log::debug!("annotated {} statements", annotator.types.len());
    Ok(TypedModule {
        module,
        types: annotator.types,
    })
}
