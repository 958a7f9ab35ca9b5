pub mod c_ast;
#[cfg(test)]
mod codegen_tests;
mod codegen_error;
mod context;
mod lower;

use crate::ast::*;
use crate::semantic_analysis::{SymbolKind, SymbolTable, TypedModule};

pub use c_ast::*;
pub use codegen_error::CodegenError;

use context::{is_constructor_name, LoweringContext};
use lower::lower_block;

use std::collections::{HashMap, HashSet};

pub type Result<T> = std::result::Result<T, CodegenError>;

const ENTRY_POINT: &str = "start";

fn gen_prototype(f: &FunDec, symbols: &SymbolTable) -> CPrototype {
    let params = f.params.iter().map(|p| (&p.name, &p.param_type));
    CPrototype::new(symbols.external_name(f), f.return_type.as_ref(), params)
}

fn gen_init_prototype(s: &StructDec) -> CPrototype {
    CPrototype::new(
        format!("{}_init", s.name),
        Some(&DataType::simple(s.name.clone())),
        [],
    )
}

fn gen_function(
    f: &FunDec,
    typed: &TypedModule,
    symbols: &SymbolTable,
    globals: &HashMap<Identifier, DataType>,
) -> Result<CFunction> {
    let mut ctx = LoweringContext::new(f, globals)?;
    ctx.scan_block(&f.body, typed, symbols)?;
    let body = lower_block(&f.body, &ctx)?;

    let function = CFunction {
        prototype: gen_prototype(f, symbols),
        locals: ctx.locals(),
        const_inits: ctx.const_inits(),
        body,
    };
    log::debug!(
        "generated {} with {} locals",
        function.prototype.name,
        function.locals.len()
    );
    Ok(function)
}

fn gen_struct(s: &StructDec) -> (CStruct, CFunction) {
    let fields = s
        .fields
        .iter()
        .map(|p| CDecl::new(p.name.clone(), p.param_type.clone()))
        .collect();
    let init = CFunction {
        prototype: gen_init_prototype(s),
        locals: vec![],
        const_inits: vec![],
        body: vec![CStatement::Comment(format!(
            "fields of {} are left uninitialized",
            s.name
        ))],
    };
    (
        CStruct {
            name: s.name.clone(),
            fields,
        },
        init,
    )
}

fn is_shadowed_by_builtin(f: &FunDec, symbols: &SymbolTable) -> bool {
    symbols
        .get(&f.name)
        .is_some_and(|s| s.iter().any(|s| s.kind == SymbolKind::Builtin))
}

/// Reorder struct definitions so every struct-typed field refers to a
/// struct defined earlier. Source order is kept where it is already valid.
fn order_structs(structs: Vec<CStruct>) -> Result<Vec<CStruct>> {
    fn visit(
        index: usize,
        structs: &[CStruct],
        done: &mut HashSet<usize>,
        visiting: &mut HashSet<usize>,
        order: &mut Vec<usize>,
    ) -> Result<()> {
        if done.contains(&index) {
            return Ok(());
        }
        if !visiting.insert(index) {
            return Err(CodegenError::RecursiveStruct(structs[index].name.clone()));
        }
        for field in &structs[index].fields {
            let dependency = structs
                .iter()
                .position(|s| s.name == field.c_type.name && !field.c_type.is_pointer);
            if let Some(dependency) = dependency {
                visit(dependency, structs, done, visiting, order)?;
            }
        }
        visiting.remove(&index);
        done.insert(index);
        order.push(index);
        Ok(())
    }

    let mut done = HashSet::new();
    let mut visiting = HashSet::new();
    let mut order = Vec::with_capacity(structs.len());
    for index in 0..structs.len() {
        visit(index, &structs, &mut done, &mut visiting, &mut order)?;
    }

    let mut slots: Vec<_> = structs.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

fn gen_global(c: &ConstDec) -> Result<CGlobal> {
    let value = match &c.init.kind {
        ExpKind::Number(n) => CLiteral::Int(*n),
        ExpKind::Str(s) => CLiteral::Str(s.clone()),
        _ => {
            return Err(CodegenError::UnsupportedConstant {
                name: c.name.clone(),
                kind: c.init.kind_name(),
            })
        }
    };
    Ok(CGlobal {
        name: c.name.clone(),
        c_type: c.const_type.clone(),
        value,
    })
}

fn gen_entry(module: &Module, symbols: &SymbolTable) -> Result<CEntry> {
    module
        .functions()
        .find(|f| f.name == ENTRY_POINT && f.params.is_empty())
        .map(|f| CEntry {
            name: symbols.external_name(f),
            result: f.return_type.clone(),
        })
        .ok_or(CodegenError::MissingEntryPoint)
}

/// Lower an annotated module into a C syntax tree.
///
/// Prototypes cover every function and struct initializer, so bodies can be
/// emitted in declaration order.
pub fn codegen(typed: &TypedModule, symbols: &SymbolTable) -> Result<CProgram> {
    let module = typed.module();
    for import in &module.imports {
        log::debug!("import {import} has no effect on generated code");
    }

    let globals = module
        .constants()
        .map(gen_global)
        .collect::<Result<Vec<_>>>()?;
    let global_types: HashMap<_, _> = module
        .constants()
        .map(|c| (c.name.clone(), c.const_type.clone()))
        .collect();

    let mut structs = Vec::new();
    let mut prototypes = Vec::new();
    let mut functions = Vec::new();
    for declaration in &module.declarations {
        match declaration {
            Declaration::Fun(f) if is_shadowed_by_builtin(f, symbols) => {
                log::warn!("{} is not generated, calls go to the builtin", f.name);
            }
            Declaration::Fun(f) => {
                if is_constructor_name(&f.name) {
                    return Err(CodegenError::UppercaseFunction(f.name.clone()));
                }
                prototypes.push(gen_prototype(f, symbols));
                functions.push(gen_function(f, typed, symbols, &global_types)?);
            }
            Declaration::Struct(s) => {
                let (c_struct, init) = gen_struct(s);
                prototypes.push(init.prototype.clone());
                structs.push(c_struct);
                functions.push(init);
            }
            Declaration::Const(_) => (),
        }
    }

    let structs = order_structs(structs)?;
    let entry = gen_entry(module, symbols)?;
    log::debug!("generated {} functions", functions.len());
    Ok(CProgram {
        structs,
        globals,
        prototypes,
        functions,
        entry,
    })
}
