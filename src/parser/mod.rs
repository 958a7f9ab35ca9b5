mod cursor;
mod parse_error;
#[cfg(test)]
mod parser_tests;

use crate::ast::*;
use crate::lexer::{PositionedToken, Token};
use cursor::Cursor;
pub use parse_error::{InnerParseError, ParseError, Result};

fn parse_identifier(cursor: &mut Cursor) -> Result<Identifier> {
    let next = cursor.next_or_error()?;
    if let Token::Identifier(name) = next {
        Ok(name.to_owned())
    } else {
        let err = InnerParseError::ExpectedIdentifierButGot(next.clone());
        Err(cursor.error_at_previous(err))
    }
}

fn parse_type(cursor: &mut Cursor) -> Result<DataType> {
    parse_identifier(cursor).map(DataType::simple)
}

fn parse_typed_name(cursor: &mut Cursor) -> Result<Param> {
    let name = parse_identifier(cursor)?;
    cursor.expect(&Token::Colon)?;
    let param_type = parse_type(cursor)?;
    Ok(Param { name, param_type })
}

fn parse_params(cursor: &mut Cursor) -> Result<Vec<Param>> {
    let mut params = Vec::new();
    cursor.expect(&Token::OpenParanth)?;

    while !cursor.bump_if(&Token::CloseParanth) {
        let param = parse_typed_name(cursor)?;
        params.push(param);
        cursor.bump_if(&Token::Comma);
    }

    Ok(params)
}

fn parse_arguments(cursor: &mut Cursor) -> Result<Vec<Exp>> {
    let mut args = Vec::new();
    cursor.expect(&Token::OpenParanth)?;

    if cursor.bump_if(&Token::CloseParanth) {
        return Ok(args);
    }

    loop {
        let exp = parse_exp(cursor)?;
        args.push(exp);
        if cursor.bump_if(&Token::CloseParanth) {
            break;
        }
        cursor.expect(&Token::Comma)?;
    }

    Ok(args)
}

fn parse_primary(cursor: &mut Cursor) -> Result<Exp> {
    let next = cursor.next_or_error()?;
    let kind = match next {
        Token::Number(n) => ExpKind::Number(*n),
        Token::Str(s) => ExpKind::Str(s.clone()),
        Token::Identifier(name) => ExpKind::Identifier(name.clone()),
        Token::OpenParanth => {
            let exp = parse_exp(cursor)?;
            cursor.expect(&Token::CloseParanth)?;
            return Ok(exp);
        }
        t => {
            let err = InnerParseError::UnexpectedToken(t.clone());
            return Err(cursor.error_at_previous(err));
        }
    };
    let id = cursor.fresh_id();
    Ok(Exp { id, kind })
}

fn parse_exp(cursor: &mut Cursor) -> Result<Exp> {
    let mut exp = parse_primary(cursor)?;

    while cursor.peek_is(&Token::OpenParanth) {
        let args = parse_arguments(cursor)?;
        let call = Call {
            callee: Box::new(exp),
            args,
        };
        let id = cursor.fresh_id();
        exp = Exp {
            id,
            kind: ExpKind::Call(call),
        };
    }

    Ok(exp)
}

fn parse_block(cursor: &mut Cursor) -> Result<Block> {
    let mut statements = Vec::new();

    cursor.expect(&Token::OpenCurly)?;

    while !cursor.bump_if(&Token::CloseCurly) {
        let statement = parse_statement(cursor)?;
        statements.push(statement);
        cursor.bump_if(&Token::Semicolon);
    }

    Ok(statements)
}

fn parse_if(cursor: &mut Cursor) -> Result<StatementKind> {
    cursor.expect(&Token::If)?;
    let condition = parse_exp(cursor)?;
    let then = parse_block(cursor)?;
    let els = if cursor.bump_if(&Token::Else) {
        if cursor.peek_is(&Token::If) {
            let nested = parse_statement(cursor)?;
            Some(vec![nested])
        } else {
            Some(parse_block(cursor)?)
        }
    } else {
        None
    };

    Ok(StatementKind::If(If {
        condition,
        then,
        els,
    }))
}

fn parse_for(cursor: &mut Cursor) -> Result<StatementKind> {
    cursor.expect(&Token::For)?;
    let condition = parse_exp(cursor)?;
    let body = parse_block(cursor)?;
    Ok(StatementKind::For(For { condition, body }))
}

fn parse_return(cursor: &mut Cursor) -> Result<StatementKind> {
    cursor.expect(&Token::Return)?;
    let has_value = cursor.peek().is_some_and(|t| !t.is_statement_end());
    let exp = has_value.then(|| parse_exp(cursor)).transpose()?;
    Ok(StatementKind::Return(exp))
}

fn parse_binding(cursor: &mut Cursor) -> Result<StatementKind> {
    let name = parse_identifier(cursor)?;
    let op = cursor.next_or_error()?;
    let value = parse_exp(cursor)?;

    let kind = match op {
        Token::Declare => StatementKind::VarDec(VarDec {
            name,
            init: value,
            binding: VarBinding::Alias,
        }),
        Token::StackDeclare => StatementKind::VarDec(VarDec {
            name,
            init: value,
            binding: VarBinding::Stack,
        }),
        _ => StatementKind::Assign(Assign { name, value }),
    };
    Ok(kind)
}

fn parse_call_statement(cursor: &mut Cursor) -> Result<StatementKind> {
    let start = cursor.get_position();
    let first = cursor.peek_or_error()?.clone();
    let exp = parse_exp(cursor)?;
    if exp.is_call() {
        Ok(StatementKind::Call(exp))
    } else {
        let err = InnerParseError::ExpectedStatement(first);
        Err(cursor.error_at(err, start))
    }
}

fn parse_statement(cursor: &mut Cursor) -> Result<Statement> {
    let peek = cursor.peek_or_error()?;
    let kind = match peek {
        Token::If => parse_if(cursor)?,
        Token::For => parse_for(cursor)?,
        Token::Return => parse_return(cursor)?,
        Token::Identifier(_) if cursor.peek_nth(1).is_some_and(Token::is_declaration_op) => {
            parse_binding(cursor)?
        }
        _ => parse_call_statement(cursor)?,
    };
    let id = cursor.fresh_id();
    Ok(Statement { id, kind })
}

fn parse_function(cursor: &mut Cursor) -> Result<FunDec> {
    cursor.expect(&Token::Func)?;
    let name = parse_identifier(cursor)?;
    let params = parse_params(cursor)?;
    let return_type = cursor
        .bump_if(&Token::Arrow)
        .then(|| parse_type(cursor))
        .transpose()?;
    let body = parse_block(cursor)?;

    Ok(FunDec {
        name,
        params,
        return_type,
        body,
    })
}

fn parse_struct(cursor: &mut Cursor) -> Result<StructDec> {
    cursor.expect(&Token::Struct)?;
    let name = parse_identifier(cursor)?;
    cursor.expect(&Token::OpenCurly)?;

    let mut fields = Vec::new();
    while !cursor.bump_if(&Token::CloseCurly) {
        let field = parse_typed_name(cursor)?;
        fields.push(field);
        cursor.bump_if(&Token::Comma);
    }

    Ok(StructDec { name, fields })
}

fn parse_const(cursor: &mut Cursor) -> Result<ConstDec> {
    cursor.expect(&Token::Const)?;
    let Param { name, param_type } = parse_typed_name(cursor)?;
    cursor.expect(&Token::Assign)?;
    let init = parse_exp(cursor)?;
    cursor.bump_if(&Token::Semicolon);

    Ok(ConstDec {
        name,
        const_type: param_type,
        init,
    })
}

fn parse_declaration(cursor: &mut Cursor) -> Result<Declaration> {
    let peek = cursor.peek_or_error()?;
    match peek {
        Token::Func => parse_function(cursor).map(Declaration::Fun),
        Token::Struct => parse_struct(cursor).map(Declaration::Struct),
        Token::Const => parse_const(cursor).map(Declaration::Const),
        t => {
            let err = InnerParseError::ExpectedDeclaration(t.clone());
            Err(cursor.error(err))
        }
    }
}

fn parse_imports(cursor: &mut Cursor) -> Result<Vec<Identifier>> {
    let mut imports = Vec::new();
    while cursor.bump_if(&Token::Import) {
        let name = parse_identifier(cursor)?;
        imports.push(name);
        cursor.bump_if(&Token::Semicolon);
    }
    Ok(imports)
}

pub fn parse(tokens: &[PositionedToken], source: &str) -> Result<Module> {
    let mut cursor = Cursor::new(tokens, source);
    let imports = parse_imports(&mut cursor)?;

    let mut declarations = Vec::new();
    while !cursor.at_end() {
        let declaration = parse_declaration(&mut cursor)?;
        declarations.push(declaration);
    }

    log::debug!(
        "parsed {} imports and {} declarations",
        imports.len(),
        declarations.len()
    );
    Ok(Module {
        imports,
        declarations,
    })
}
