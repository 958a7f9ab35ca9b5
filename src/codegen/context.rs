use super::c_ast::{CDecl, CLiteral, RESULT_PARAM};
use super::{CodegenError, Result};
use crate::ast::*;
use crate::semantic_analysis::{
    infer_value_type, resolve_call, Scope, SemAnalysisError, SymbolTable, TypedModule,
};

use std::collections::HashMap;

/// Storage an expression's value ends up in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Temp(Identifier),
    Const(Identifier),
}

impl Binding {
    pub fn name(&self) -> &Identifier {
        match self {
            Self::Temp(name) | Self::Const(name) => name,
        }
    }
}

/// Scratch state for lowering one function.
///
/// Filled by [LoweringContext::scan_block] before any statement is lowered,
/// then only read.
pub struct LoweringContext<'g> {
    function: Identifier,
    return_type: Option<DataType>,
    globals: &'g HashMap<Identifier, DataType>,
    params: HashMap<Identifier, DataType>,
    variables: HashMap<Identifier, DataType>,
    variable_order: Vec<Identifier>,
    temps: Vec<CDecl>,
    constants: Vec<(CDecl, CLiteral)>,
    bindings: HashMap<NodeId, Binding>,
    callees: HashMap<NodeId, Identifier>,
    stack_slots: HashMap<NodeId, Identifier>,
}

impl Scope for LoweringContext<'_> {
    fn variable_type(&self, name: &str) -> Option<&DataType> {
        self.variables
            .get(name)
            .or_else(|| self.params.get(name))
            .or_else(|| self.globals.get(name))
    }
}

pub fn is_constructor_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// `__result`, `tmp_<digits>` and `const_<digits>` belong to generated slots.
fn is_reserved_name(name: &str) -> bool {
    let numbered = |prefix: &str| {
        name.strip_prefix(prefix)
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
    };
    name == RESULT_PARAM || numbered("tmp_") || numbered("const_")
}

fn check_not_reserved(name: &Identifier) -> Result<()> {
    if is_reserved_name(name) {
        Err(CodegenError::ReservedName(name.clone()))
    } else {
        Ok(())
    }
}

impl<'g> LoweringContext<'g> {
    pub fn new(f: &FunDec, globals: &'g HashMap<Identifier, DataType>) -> Result<Self> {
        for param in &f.params {
            check_not_reserved(&param.name)?;
        }
        Ok(Self {
            function: f.name.clone(),
            return_type: f.return_type.clone(),
            globals,
            params: f
                .params
                .iter()
                .map(|p| (p.name.clone(), p.param_type.clone()))
                .collect(),
            variables: HashMap::new(),
            variable_order: Vec::new(),
            temps: Vec::new(),
            constants: Vec::new(),
            bindings: HashMap::new(),
            callees: HashMap::new(),
            stack_slots: HashMap::new(),
        })
    }

    pub fn function(&self) -> &Identifier {
        &self.function
    }

    pub fn return_type(&self) -> Option<&DataType> {
        self.return_type.as_ref()
    }

    pub fn binding(&self, id: NodeId) -> Option<&Binding> {
        self.bindings.get(&id)
    }

    pub fn callee(&self, id: NodeId) -> Result<&Identifier> {
        self.callees.get(&id).ok_or(CodegenError::MissingSlot(id))
    }

    pub fn stack_slot(&self, id: NodeId) -> Result<&Identifier> {
        self.stack_slots.get(&id).ok_or(CodegenError::MissingSlot(id))
    }

    /// Locals in declaration order: variables as pointers, then temps and
    /// constants as values.
    pub fn locals(&self) -> Vec<CDecl> {
        let variables = self
            .variable_order
            .iter()
            .map(|name| CDecl::new(name.clone(), self.variables[name].pointer()));
        variables
            .chain(self.temps.iter().cloned())
            .chain(self.constants.iter().map(|(decl, _)| decl.clone()))
            .collect()
    }

    pub fn const_inits(&self) -> Vec<(Identifier, CLiteral)> {
        self.constants
            .iter()
            .map(|(decl, value)| (decl.name.clone(), value.clone()))
            .collect()
    }

    fn new_temp(&mut self, datatype: DataType) -> Identifier {
        let name = format!("tmp_{}", self.temps.len());
        log::trace!("{}: {name} holds a {datatype}", self.function);
        self.temps.push(CDecl::new(name.clone(), datatype));
        name
    }

    fn new_const(&mut self, value: CLiteral) -> Identifier {
        let datatype = match value {
            CLiteral::Int(_) => DataType::int(),
            CLiteral::Str(_) => DataType::string(),
        };
        let name = format!("const_{}", self.constants.len());
        log::trace!("{}: {name} holds a {datatype}", self.function);
        self.constants.push((CDecl::new(name.clone(), datatype), value));
        name
    }

    fn declare_variable(&mut self, name: &Identifier, datatype: DataType) -> Result<()> {
        check_not_reserved(name)?;
        let previous = self.variables.get(name).or_else(|| self.params.get(name));
        match previous {
            Some(previous) if *previous != datatype => Err(CodegenError::ConflictingDeclaration {
                name: name.clone(),
                previous: previous.clone(),
                new: datatype,
            }),
            Some(_) => Ok(()),
            None => {
                self.variable_order.push(name.clone());
                self.variables.insert(name.clone(), datatype);
                Ok(())
            }
        }
    }

    fn check_visible(&self, name: &Identifier) -> Result<()> {
        match self.variable_type(name) {
            Some(_) => Ok(()),
            None => Err(SemAnalysisError::UnknownIdentifier(name.clone()).into()),
        }
    }

    pub fn scan_block(&mut self, block: &Block, typed: &TypedModule, symbols: &SymbolTable) -> Result<()> {
        for statement in block {
            self.scan_statement(statement, typed, symbols)?;
        }
        Ok(())
    }

    fn scan_statement(&mut self, statement: &Statement, typed: &TypedModule, symbols: &SymbolTable) -> Result<()> {
        match &statement.kind {
            StatementKind::VarDec(VarDec {
                name,
                init,
                binding,
            }) => {
                let datatype = match typed.datatype_of(statement.id) {
                    Some(datatype) => datatype.clone(),
                    None => infer_value_type(init, &*self, symbols)?,
                };
                self.declare_variable(name, datatype.clone())?;
                self.scan_exp(init, symbols)?;
                if *binding == VarBinding::Stack {
                    let slot = self.new_temp(datatype);
                    self.stack_slots.insert(statement.id, slot);
                }
            }
            StatementKind::Assign(Assign { name, value }) => {
                self.check_visible(name)?;
                self.scan_exp(value, symbols)?;
            }
            StatementKind::If(If {
                condition,
                then,
                els,
            }) => {
                self.scan_exp(condition, symbols)?;
                self.scan_block(then, typed, symbols)?;
                if let Some(els) = els {
                    self.scan_block(els, typed, symbols)?;
                }
            }
            StatementKind::For(For { condition, body }) => {
                self.scan_exp(condition, symbols)?;
                self.scan_block(body, typed, symbols)?;
            }
            StatementKind::Return(Some(exp)) | StatementKind::Call(exp) => self.scan_exp(exp, symbols)?,
            StatementKind::Return(None) => (),
        }
        Ok(())
    }

    fn scan_exp(&mut self, exp: &Exp, symbols: &SymbolTable) -> Result<()> {
        match &exp.kind {
            ExpKind::Number(n) => {
                let name = self.new_const(CLiteral::Int(*n));
                self.bindings.insert(exp.id, Binding::Const(name));
            }
            ExpKind::Str(s) => {
                let name = self.new_const(CLiteral::Str(s.clone()));
                self.bindings.insert(exp.id, Binding::Const(name));
            }
            ExpKind::Identifier(name) => self.check_visible(name)?,
            ExpKind::Call(call) => {
                let symbol = resolve_call(call, &*self, symbols)?;
                let callee = match call.callee_name() {
                    Some(name) if is_constructor_name(name) => format!("{name}_init"),
                    _ => symbol.external_name.clone(),
                };
                if let Some(return_type) = symbol.signature.return_type.clone() {
                    let tmp = self.new_temp(return_type);
                    self.bindings.insert(exp.id, Binding::Temp(tmp));
                }
                self.callees.insert(exp.id, callee);
                for arg in &call.args {
                    self.scan_exp(arg, symbols)?;
                }
            }
        }
        Ok(())
    }
}
