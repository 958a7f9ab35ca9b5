use std::fmt;

pub type Identifier = String;
pub type Block = Vec<Statement>;

/// Identity of a statement or expression inside one [Module].
///
/// Assigned by the parser and never reused, so later stages can keep their
/// own data about a node in side tables instead of mutating the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataType {
    pub name: Identifier,
    pub is_pointer: bool,
}

impl DataType {
    pub fn simple(name: impl Into<Identifier>) -> Self {
        Self {
            name: name.into(),
            is_pointer: false,
        }
    }

    pub fn int() -> Self {
        Self::simple("Int")
    }

    pub fn string() -> Self {
        Self::simple("String")
    }

    #[must_use]
    pub fn pointer(&self) -> Self {
        Self {
            name: self.name.clone(),
            is_pointer: true,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let star = if self.is_pointer { "*" } else { "" };
        write!(f, "{}{star}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Module {
    pub imports: Vec<Identifier>,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Fun(FunDec),
    Struct(StructDec),
    Const(ConstDec),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunDec {
    pub name: Identifier,
    pub params: Vec<Param>,
    pub return_type: Option<DataType>,
    pub body: Block,
}

/// Named and typed slot, used for both function parameters and struct fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Identifier,
    pub param_type: DataType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDec {
    pub name: Identifier,
    pub fields: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstDec {
    pub name: Identifier,
    pub const_type: DataType,
    pub init: Exp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub id: NodeId,
    pub kind: StatementKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    VarDec(VarDec),
    Assign(Assign),
    If(If),
    For(For),
    Return(Option<Exp>),
    Call(Exp),
}

/// How a declared variable gets its storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarBinding {
    /// `x := e`: `x` points straight at the slot holding the result of `e`.
    Alias,
    /// `x ::= e`: `x` points at its own stack slot, initialized from `e`.
    Stack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDec {
    pub name: Identifier,
    pub init: Exp,
    pub binding: VarBinding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assign {
    pub name: Identifier,
    pub value: Exp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct If {
    pub condition: Exp,
    pub then: Block,
    pub els: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct For {
    pub condition: Exp,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exp {
    pub id: NodeId,
    pub kind: ExpKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpKind {
    Number(i64),
    Str(String),
    Identifier(Identifier),
    Call(Call),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub callee: Box<Exp>,
    pub args: Vec<Exp>,
}

impl Exp {
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, ExpKind::Number(_) | ExpKind::Str(_))
    }

    pub fn is_call(&self) -> bool {
        matches!(self.kind, ExpKind::Call(_))
    }

    pub fn get_call(&self) -> Option<&Call> {
        match &self.kind {
            ExpKind::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}

impl ExpKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Number(_) => "Number",
            Self::Str(_) => "String",
            Self::Identifier(_) => "Identifier",
            Self::Call(_) => "FunctionCall",
        }
    }
}

impl Call {
    /// Name of the called function when the callee is a plain identifier.
    pub fn callee_name(&self) -> Option<&Identifier> {
        match &self.callee.kind {
            ExpKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

impl Module {
    pub fn functions(&self) -> impl Iterator<Item = &FunDec> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Fun(f) => Some(f),
            _ => None,
        })
    }

    pub fn structs(&self) -> impl Iterator<Item = &StructDec> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Struct(s) => Some(s),
            _ => None,
        })
    }

    pub fn constants(&self) -> impl Iterator<Item = &ConstDec> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Const(c) => Some(c),
            _ => None,
        })
    }
}
