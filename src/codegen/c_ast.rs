use crate::ast::{DataType, Identifier};

/// One C translation unit, minus the fixed prelude and `main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CProgram {
    pub structs: Vec<CStruct>,
    pub globals: Vec<CGlobal>,
    pub prototypes: Vec<CPrototype>,
    pub functions: Vec<CFunction>,
    pub entry: CEntry,
}

pub type CBlock = Vec<CStatement>;

/// `<type> <name>`, used for locals, parameters and struct fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CDecl {
    pub name: Identifier,
    pub c_type: DataType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CStruct {
    pub name: Identifier,
    pub fields: Vec<CDecl>,
}

/// Module constant: a static value plus a constant pointer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CGlobal {
    pub name: Identifier,
    pub c_type: DataType,
    pub value: CLiteral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CLiteral {
    Int(i64),
    Str(String),
}

/// Every generated function returns `void`; results travel through
/// the leading `__result` out-parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CPrototype {
    pub name: Identifier,
    pub params: Vec<CDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CFunction {
    pub prototype: CPrototype,
    pub locals: Vec<CDecl>,
    pub const_inits: Vec<(Identifier, CLiteral)>,
    pub body: CBlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CStatement {
    Call { name: Identifier, args: Vec<COperand> },
    Assign { dst: COperand, src: COperand },
    If {
        condition: COperand,
        then: CBlock,
        els: Option<CBlock>,
    },
    /// `while (1) { ... }`
    Loop(CBlock),
    /// `if (!<operand>) { break; }`
    BreakUnless(COperand),
    Return,
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum COperand {
    Name(Identifier),
    AddressOf(Identifier),
    Deref(Identifier),
}

/// What `main` calls: the external name of `start`, plus the type of the
/// scratch slot it writes to when it returns a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CEntry {
    pub name: Identifier,
    pub result: Option<DataType>,
}

pub const RESULT_PARAM: &str = "__result";

impl CDecl {
    pub fn new(name: impl Into<Identifier>, c_type: DataType) -> Self {
        Self {
            name: name.into(),
            c_type,
        }
    }
}

impl CPrototype {
    /// Prototype of a lowered function: `__result` first when it returns a
    /// value, then every parameter as a pointer.
    pub fn new<'p>(
        name: Identifier,
        return_type: Option<&DataType>,
        params: impl IntoIterator<Item = (&'p Identifier, &'p DataType)>,
    ) -> Self {
        let result = return_type.map(|t| CDecl::new(RESULT_PARAM, t.pointer()));
        let params = result
            .into_iter()
            .chain(params.into_iter().map(|(n, t)| CDecl::new(n.clone(), t.pointer())))
            .collect();
        Self { name, params }
    }
}
