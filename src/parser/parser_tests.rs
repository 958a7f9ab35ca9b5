use super::*;
use crate::lexer::{self, Position};
use std::collections::HashSet;

fn parse_source(source: &str) -> Result<Module> {
    let tokens = lexer::lex(source).unwrap();
    parse(&tokens, source)
}

fn single_function(source: &str) -> FunDec {
    let module = parse_source(source).unwrap();
    let mut functions = module.functions().cloned();
    let f = functions.next().unwrap();
    assert!(functions.next().is_none());
    f
}

fn collect_ids(block: &Block, ids: &mut Vec<NodeId>) {
    fn exp_ids(exp: &Exp, ids: &mut Vec<NodeId>) {
        ids.push(exp.id);
        if let ExpKind::Call(call) = &exp.kind {
            exp_ids(&call.callee, ids);
            call.args.iter().for_each(|a| exp_ids(a, ids));
        }
    }
    for statement in block {
        ids.push(statement.id);
        match &statement.kind {
            StatementKind::VarDec(VarDec { init: e, .. })
            | StatementKind::Assign(Assign { value: e, .. })
            | StatementKind::Call(e)
            | StatementKind::Return(Some(e)) => exp_ids(e, ids),
            StatementKind::If(If {
                condition,
                then,
                els,
            }) => {
                exp_ids(condition, ids);
                collect_ids(then, ids);
                if let Some(els) = els {
                    collect_ids(els, ids);
                }
            }
            StatementKind::For(For { condition, body }) => {
                exp_ids(condition, ids);
                collect_ids(body, ids);
            }
            StatementKind::Return(None) => (),
        }
    }
}

#[test]
fn test_function_signature() {
    let f = single_function("func add(a: Int, b: Int) -> Int { return plusInt(a, b) }");
    assert_eq!("add", f.name);
    let names: Vec<_> = f.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(vec!["a", "b"], names);
    assert!(f.params.iter().all(|p| p.param_type == DataType::int()));
    assert_eq!(Some(DataType::int()), f.return_type);
    assert_eq!(1, f.body.len());
}

#[test]
fn test_params_without_commas() {
    let f = single_function("func greet(name: String times: Int) {}");
    assert_eq!(2, f.params.len());
    assert_eq!(DataType::string(), f.params[0].param_type);
    assert_eq!(None, f.return_type);
}

#[test]
fn test_bindings() {
    let f = single_function("func start() { x ::= 1\n y := x\n x = 2 }");
    let kinds: Vec<_> = f.body.iter().map(|s| &s.kind).collect();
    match kinds.as_slice() {
        [StatementKind::VarDec(x), StatementKind::VarDec(y), StatementKind::Assign(a)] => {
            assert_eq!(VarBinding::Stack, x.binding);
            assert_eq!(ExpKind::Number(1), x.init.kind);
            assert_eq!(VarBinding::Alias, y.binding);
            assert_eq!(ExpKind::Identifier("x".into()), y.init.kind);
            assert_eq!("x", a.name);
            assert_eq!(ExpKind::Number(2), a.value.kind);
        }
        other => panic!("unexpected statements {other:?}"),
    }
}

#[test]
fn test_nested_calls() {
    let f = single_function("func start() { printInt(plusInt(1, plusInt(2, 3))) }");
    let StatementKind::Call(outer) = &f.body[0].kind else {
        panic!("expected a call statement");
    };
    let print = outer.get_call().unwrap();
    assert_eq!(Some(&"printInt".to_string()), print.callee_name());
    let plus = print.args[0].get_call().unwrap();
    assert_eq!(2, plus.args.len());
    assert!(plus.args[1].is_call());
}

#[test]
fn test_else_if_chain() {
    let f = single_function(
        "func start() { if a { printNewLine() } else if b { printNewLine() } else { return } }",
    );
    let StatementKind::If(outer) = &f.body[0].kind else {
        panic!("expected if");
    };
    let els = outer.els.as_ref().unwrap();
    assert_eq!(1, els.len());
    let StatementKind::If(inner) = &els[0].kind else {
        panic!("expected nested if");
    };
    assert_eq!(
        Some(vec![StatementKind::Return(None)]),
        inner
            .els
            .as_ref()
            .map(|b| b.iter().map(|s| s.kind.clone()).collect())
    );
}

#[test]
fn test_for_loop() {
    let f = single_function("func start() { i ::= 0; for isLessInt(i, 3) { i = plusInt(i, 1) } }");
    let StatementKind::For(for_st) = &f.body[1].kind else {
        panic!("expected for");
    };
    assert!(for_st.condition.is_call());
    assert_eq!(1, for_st.body.len());
}

#[test]
fn test_module_level_items() {
    let source = "import io\nimport strings\n\
                  const answer: Int = 42\n\
                  struct Point { x: Int, y: Int }\n\
                  func start() {}";
    let module = parse_source(source).unwrap();
    assert_eq!(vec!["io".to_string(), "strings".to_string()], module.imports);
    let point = module.structs().next().unwrap();
    assert_eq!("Point", point.name);
    assert_eq!(2, point.fields.len());
    let answer = module.constants().next().unwrap();
    assert_eq!(DataType::int(), answer.const_type);
    assert_eq!(ExpKind::Number(42), answer.init.kind);
}

#[test]
fn test_node_ids_are_unique() {
    let source = "func start() { x := plusInt(1, 2)\n if isLessInt(x, 3) { printInt(x) } else { x = 4 }\n for x { return } }";
    let f = single_function(source);
    let mut ids = Vec::new();
    collect_ids(&f.body, &mut ids);
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len());
}

#[test]
fn test_unexpected_token_reports_position() {
    let source = "func start() {\n  x := )\n}";
    let err = parse_source(source).unwrap_err();
    assert_eq!(&InnerParseError::UnexpectedToken(Token::CloseParanth), err.get_inner());
    assert_eq!(Position { ln: 2, col: 8 }, err.get_position());
    let rendered = err.to_string();
    assert!(rendered.starts_with("2:8: Parser error: unexpected token"));
    assert!(rendered.ends_with("  x := )\n       ^"));
}

#[test]
fn test_bare_identifier_is_not_a_statement() {
    let err = parse_source("func start() { x }").unwrap_err();
    assert!(matches!(err.get_inner(), InnerParseError::ExpectedStatement(_)));
    assert_eq!(Position { ln: 1, col: 16 }, err.get_position());
}

#[test]
fn test_unexpected_eof() {
    let err = parse_source("func start() {").unwrap_err();
    assert_eq!(&InnerParseError::UnexpectedEof, err.get_inner());
    assert_eq!(Position { ln: 1, col: 15 }, err.get_position());
}

#[test]
fn test_declaration_expected() {
    let err = parse_source("start()").unwrap_err();
    assert!(matches!(err.get_inner(), InnerParseError::ExpectedDeclaration(_)));
}
