use super::c_ast::*;
use super::context::LoweringContext;
use super::{CodegenError, Result};
use crate::ast::*;
use crate::semantic_analysis::SemAnalysisError;

fn slot(exp: &Exp, ctx: &LoweringContext) -> Result<Identifier> {
    match ctx.binding(exp.id) {
        Some(binding) => Ok(binding.name().clone()),
        None => match exp.get_call().and_then(Call::callee_name) {
            Some(callee) => Err(SemAnalysisError::VoidValue(callee.clone()).into()),
            None => Err(CodegenError::MissingSlot(exp.id)),
        },
    }
}

/// `exp` as a value: `const_N`, `tmp_N` or `*x`.
fn value_of(exp: &Exp, ctx: &LoweringContext) -> Result<COperand> {
    match &exp.kind {
        ExpKind::Identifier(name) => Ok(COperand::Deref(name.clone())),
        _ => slot(exp, ctx).map(COperand::Name),
    }
}

/// `exp` as a pointer: `&const_N`, `&tmp_N` or `x`.
fn address_of(exp: &Exp, ctx: &LoweringContext) -> Result<COperand> {
    match &exp.kind {
        ExpKind::Identifier(name) => Ok(COperand::Name(name.clone())),
        _ => slot(exp, ctx).map(COperand::AddressOf),
    }
}

fn lower_call(exp: &Exp, call: &Call, ctx: &LoweringContext, out: &mut CBlock) -> Result<()> {
    for arg in &call.args {
        lower_dependencies(arg, ctx, out)?;
    }

    let mut args = Vec::with_capacity(call.args.len() + 1);
    if let Some(binding) = ctx.binding(exp.id) {
        args.push(COperand::AddressOf(binding.name().clone()));
    }
    for arg in &call.args {
        args.push(address_of(arg, ctx)?);
    }

    out.push(CStatement::Call {
        name: ctx.callee(exp.id)?.clone(),
        args,
    });
    Ok(())
}

/// Emit the calls `exp` needs evaluated before its value can be read.
fn lower_dependencies(exp: &Exp, ctx: &LoweringContext, out: &mut CBlock) -> Result<()> {
    match &exp.kind {
        ExpKind::Call(call) => lower_call(exp, call, ctx, out),
        ExpKind::Number(_) | ExpKind::Str(_) | ExpKind::Identifier(_) => Ok(()),
    }
}

fn lower_statement(statement: &Statement, ctx: &LoweringContext, out: &mut CBlock) -> Result<()> {
    match &statement.kind {
        StatementKind::VarDec(VarDec {
            name,
            init,
            binding,
        }) => {
            lower_dependencies(init, ctx, out)?;
            let target = match binding {
                VarBinding::Alias => address_of(init, ctx)?,
                VarBinding::Stack => COperand::AddressOf(ctx.stack_slot(statement.id)?.clone()),
            };
            out.push(CStatement::Assign {
                dst: COperand::Name(name.clone()),
                src: target,
            });
            out.push(CStatement::Assign {
                dst: COperand::Deref(name.clone()),
                src: value_of(init, ctx)?,
            });
        }
        StatementKind::Assign(Assign { name, value }) => {
            lower_dependencies(value, ctx, out)?;
            out.push(CStatement::Assign {
                dst: COperand::Deref(name.clone()),
                src: value_of(value, ctx)?,
            });
        }
        StatementKind::If(If {
            condition,
            then,
            els,
        }) => {
            lower_dependencies(condition, ctx, out)?;
            let then = lower_block(then, ctx)?;
            let els = els.as_ref().map(|els| lower_block(els, ctx)).transpose()?;
            out.push(CStatement::If {
                condition: value_of(condition, ctx)?,
                then,
                els,
            });
        }
        StatementKind::For(For { condition, body }) => {
            let mut inner = CBlock::new();
            lower_dependencies(condition, ctx, &mut inner)?;
            inner.push(CStatement::BreakUnless(value_of(condition, ctx)?));
            for statement in body {
                lower_statement(statement, ctx, &mut inner)?;
            }
            out.push(CStatement::Loop(inner));
        }
        StatementKind::Return(Some(value)) => {
            if ctx.return_type().is_none() {
                return Err(CodegenError::ReturnValueInVoidFunction(ctx.function().clone()));
            }
            lower_dependencies(value, ctx, out)?;
            out.push(CStatement::Assign {
                dst: COperand::Deref(RESULT_PARAM.to_owned()),
                src: value_of(value, ctx)?,
            });
            out.push(CStatement::Return);
        }
        StatementKind::Return(None) => out.push(CStatement::Return),
        StatementKind::Call(exp) => lower_dependencies(exp, ctx, out)?,
    }
    Ok(())
}

pub fn lower_block(block: &Block, ctx: &LoweringContext) -> Result<CBlock> {
    let mut out = CBlock::new();
    for statement in block {
        lower_statement(statement, ctx, &mut out)?;
    }
    Ok(out)
}
