use super::{Result, SemAnalysisError};
use crate::ast::*;

use std::collections::{HashMap, HashSet};

/// Types every module knows without declaring them.
pub const BUILTIN_TYPES: [&str; 2] = ["Int", "String"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<DataType>,
    pub return_type: Option<DataType>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Function,
    Constructor,
    Builtin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub external_name: Identifier,
    pub kind: SymbolKind,
    pub signature: Signature,
}

/// Callable names of one module, keyed by source name.
///
/// A name maps to several symbols only when the module overloads it.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<Identifier, Vec<Symbol>>,
    types: HashSet<Identifier>,
    overloaded: HashSet<Identifier>,
}

impl Signature {
    fn new(params: Vec<DataType>, return_type: Option<DataType>) -> Self {
        Self {
            params,
            return_type,
        }
    }
}

impl SymbolTable {
    pub fn get(&self, name: &str) -> Option<&[Symbol]> {
        self.symbols.get(name).map(Vec::as_slice)
    }

    pub fn candidates(&self, name: &str) -> Result<&[Symbol]> {
        self.get(name)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| SemAnalysisError::UnknownFunction(name.to_owned()))
    }

    /// Pick the overload of `name` whose parameter types are exactly `args`.
    pub fn resolve(&self, name: &str, args: &[DataType]) -> Result<&Symbol> {
        let candidates = self.candidates(name)?;
        if let [single] = candidates {
            return check_arity(name, single, args.len());
        }
        candidates
            .iter()
            .find(|s| s.signature.params == args)
            .ok_or_else(|| {
                let args = args
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                SemAnalysisError::NoMatchingOverload {
                    name: name.to_owned(),
                    args,
                }
            })
    }

    pub fn is_known_type(&self, t: &DataType) -> bool {
        self.types.contains(&t.name)
    }

    pub fn is_overloaded(&self, name: &str) -> bool {
        self.overloaded.contains(name)
    }

    /// Name under which `f` is emitted.
    pub fn external_name(&self, f: &FunDec) -> Identifier {
        if self.is_overloaded(&f.name) {
            mangle(&f.name, &param_types(&f.params))
        } else {
            f.name.clone()
        }
    }

    fn insert(&mut self, name: Identifier, symbols: Vec<Symbol>) {
        if let Some(previous) = self.symbols.insert(name.clone(), symbols) {
            let kinds: Vec<_> = previous.iter().map(|s| s.kind).collect();
            log::warn!("{name} shadows earlier declaration(s) {kinds:?}");
        }
    }
}

pub(super) fn check_arity<'s>(name: &str, symbol: &'s Symbol, got: usize) -> Result<&'s Symbol> {
    let expected = symbol.signature.params.len();
    if expected == got {
        Ok(symbol)
    } else {
        Err(SemAnalysisError::ArgumentCountMismatch {
            name: name.to_owned(),
            expected,
            got,
        })
    }
}

/// External name of one overload, e.g. `area__Int_Int`.
pub fn mangle(name: &str, params: &[DataType]) -> Identifier {
    if params.is_empty() {
        return format!("{name}__void");
    }
    let suffix = params
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join("_");
    format!("{name}__{suffix}")
}

fn param_types(params: &[Param]) -> Vec<DataType> {
    params.iter().map(|p| p.param_type.clone()).collect()
}

fn builtin(name: &str, params: Vec<DataType>, return_type: Option<DataType>) -> (Identifier, Symbol) {
    let symbol = Symbol {
        external_name: name.to_owned(),
        kind: SymbolKind::Builtin,
        signature: Signature::new(params, return_type),
    };
    (name.to_owned(), symbol)
}

fn builtins() -> Vec<(Identifier, Symbol)> {
    let int = DataType::int;
    let mut result = vec![
        builtin("printString", vec![DataType::string()], None),
        builtin("printInt", vec![int()], None),
        builtin("printNewLine", vec![], None),
    ];
    let operators = [
        "isEqualInt",
        "isLessInt",
        "isGreaterInt",
        "minusInt",
        "plusInt",
        "multiplyInt",
    ];
    for op in operators {
        result.push(builtin(op, vec![int(), int()], Some(int())));
    }
    result
}

fn collect_functions(module: &Module) -> Vec<(Identifier, Vec<Symbol>)> {
    let mut groups: Vec<(Identifier, Vec<&FunDec>)> = Vec::new();
    for f in module.functions() {
        match groups.iter_mut().find(|(name, _)| *name == f.name) {
            Some((_, group)) => group.push(f),
            None => groups.push((f.name.clone(), vec![f])),
        }
    }

    groups
        .into_iter()
        .map(|(name, group)| {
            let overloaded = group.len() > 1;
            let symbols = group
                .into_iter()
                .map(|f| {
                    let params = param_types(&f.params);
                    let external_name = if overloaded {
                        mangle(&f.name, &params)
                    } else {
                        f.name.clone()
                    };
                    Symbol {
                        external_name,
                        kind: SymbolKind::Function,
                        signature: Signature::new(params, f.return_type.clone()),
                    }
                })
                .collect();
            (name, symbols)
        })
        .collect()
}

pub fn build_symbol_table(module: &Module) -> SymbolTable {
    let mut table = SymbolTable::default();
    table.types.extend(BUILTIN_TYPES.map(String::from));

    for (name, symbols) in collect_functions(module) {
        if symbols.len() > 1 {
            let mut seen = HashSet::new();
            for symbol in symbols.iter().filter(|s| !seen.insert(&s.external_name)) {
                log::warn!("{name} is declared twice as {}", symbol.external_name);
            }
            table.overloaded.insert(name.clone());
        }
        table.insert(name, symbols);
    }

    for s in module.structs() {
        table.types.insert(s.name.clone());
        let constructor = Symbol {
            external_name: format!("{}_init", s.name),
            kind: SymbolKind::Constructor,
            signature: Signature::new(vec![], Some(DataType::simple(s.name.clone()))),
        };
        table.insert(s.name.clone(), vec![constructor]);
    }

    for (name, symbol) in builtins() {
        table.insert(name, vec![symbol]);
    }

    log::debug!("symbol table holds {} names", table.symbols.len());
    table
}
