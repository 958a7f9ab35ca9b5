use super::*;
use crate::semantic_analysis::{annotate, build_symbol_table, SemAnalysisError};
use crate::{lexer, parser};

fn generate(source: &str) -> Result<CProgram> {
    let tokens = lexer::lex(source).unwrap();
    let module = parser::parse(&tokens, source).unwrap();
    let symbols = build_symbol_table(&module);
    let typed = annotate(&module, &symbols)?;
    codegen(&typed, &symbols)
}

fn function<'p>(program: &'p CProgram, name: &str) -> &'p CFunction {
    program
        .functions
        .iter()
        .find(|f| f.prototype.name == name)
        .unwrap()
}

fn name(s: &str) -> COperand {
    COperand::Name(s.into())
}

fn addr(s: &str) -> COperand {
    COperand::AddressOf(s.into())
}

fn deref(s: &str) -> COperand {
    COperand::Deref(s.into())
}

fn assign(dst: COperand, src: COperand) -> CStatement {
    CStatement::Assign { dst, src }
}

fn call(callee: &str, args: Vec<COperand>) -> CStatement {
    CStatement::Call {
        name: callee.into(),
        args,
    }
}

fn local_names(f: &CFunction) -> Vec<String> {
    f.locals.iter().map(ToString::to_string).collect()
}

#[test]
fn test_stack_binding_and_assignment() {
    let program = generate("func start() { x ::= 1\n x = 2 }").unwrap();
    let start = function(&program, "start");
    assert_eq!(vec!["Int* x", "Int tmp_0", "Int const_0", "Int const_1"], local_names(start));
    assert_eq!(
        vec![
            ("const_0".to_string(), CLiteral::Int(1)),
            ("const_1".to_string(), CLiteral::Int(2))
        ],
        start.const_inits
    );
    assert_eq!(
        vec![
            assign(name("x"), addr("tmp_0")),
            assign(deref("x"), name("const_0")),
            assign(deref("x"), name("const_1")),
        ],
        start.body
    );
}

#[test]
fn test_alias_binding() {
    let program = generate("func start() { x := \"hi\"\n y := x }").unwrap();
    let start = function(&program, "start");
    assert_eq!(vec!["String* x", "String* y", "String const_0"], local_names(start));
    assert_eq!(
        vec![
            assign(name("x"), addr("const_0")),
            assign(deref("x"), name("const_0")),
            assign(name("y"), name("x")),
            assign(deref("y"), deref("x")),
        ],
        start.body
    );
}

#[test]
fn test_nested_calls_are_lowered_depth_first() {
    let program = generate("func start() { printInt(plusInt(1, plusInt(2, 3))) }").unwrap();
    let start = function(&program, "start");
    assert_eq!(
        vec!["Int tmp_0", "Int tmp_1", "Int const_0", "Int const_1", "Int const_2"],
        local_names(start)
    );
    assert_eq!(
        vec![
            call("plusInt", vec![addr("tmp_1"), addr("const_1"), addr("const_2")]),
            call("plusInt", vec![addr("tmp_0"), addr("const_0"), addr("tmp_1")]),
            call("printInt", vec![addr("tmp_0")]),
        ],
        start.body
    );
}

#[test]
fn test_for_becomes_infinite_loop_with_break() {
    let program =
        generate("func start() { i ::= 0\n for isLessInt(i, 3) { i = plusInt(i, 1) } }").unwrap();
    let start = function(&program, "start");
    let CStatement::Loop(body) = &start.body[2] else {
        panic!("expected a loop, got {:?}", start.body[2]);
    };
    assert_eq!(
        vec![
            call("isLessInt", vec![addr("tmp_1"), name("i"), addr("const_1")]),
            CStatement::BreakUnless(name("tmp_1")),
            call("plusInt", vec![addr("tmp_2"), name("i"), addr("const_2")]),
            assign(deref("i"), name("tmp_2")),
        ],
        *body
    );
}

#[test]
fn test_if_else() {
    let program = generate(
        "func start() { if isEqualInt(1, 2) { printInt(1) } else { printNewLine() } }",
    )
    .unwrap();
    let start = function(&program, "start");
    assert_eq!(
        vec![
            call("isEqualInt", vec![addr("tmp_0"), addr("const_0"), addr("const_1")]),
            CStatement::If {
                condition: name("tmp_0"),
                then: vec![call("printInt", vec![addr("const_2")])],
                els: Some(vec![call("printNewLine", vec![])]),
            },
        ],
        start.body
    );
}

#[test]
fn test_return_through_result_pointer() {
    let program = generate(
        "func twice(n: Int) -> Int { return plusInt(n, n) }\nfunc start() { printInt(twice(4)) }",
    )
    .unwrap();
    let twice = function(&program, "twice");
    let params: Vec<_> = twice.prototype.params.iter().map(ToString::to_string).collect();
    assert_eq!(vec!["Int* __result", "Int* n"], params);
    assert_eq!(
        vec![
            call("plusInt", vec![addr("tmp_0"), name("n"), name("n")]),
            assign(deref("__result"), name("tmp_0")),
            CStatement::Return,
        ],
        twice.body
    );
}

#[test]
fn test_return_value_in_void_function() {
    let err = generate("func start() { return 1 }").unwrap_err();
    assert_eq!(CodegenError::ReturnValueInVoidFunction("start".into()), err);
}

#[test]
fn test_conflicting_redeclaration() {
    let err = generate("func start() { x := 1\n x := \"one\" }").unwrap_err();
    assert_eq!(
        CodegenError::ConflictingDeclaration {
            name: "x".into(),
            previous: DataType::int(),
            new: DataType::string(),
        },
        err
    );
}

#[test]
fn test_redeclaring_a_parameter_reuses_it() {
    let program = generate("func show(n: Int) { n ::= 5\n printInt(n) }\nfunc start() {}").unwrap();
    let show = function(&program, "show");
    assert_eq!(vec!["Int tmp_0", "Int const_0"], local_names(show));
}

#[test]
fn test_struct_constructor_and_stub() {
    let program = generate("struct Point { x: Int y: Int }\nfunc start() { p := Point() }").unwrap();
    assert_eq!(1, program.structs.len());
    let fields: Vec<_> = program.structs[0].fields.iter().map(ToString::to_string).collect();
    assert_eq!(vec!["Int x", "Int y"], fields);

    let init = function(&program, "Point_init");
    assert!(init.locals.is_empty());
    assert!(matches!(init.body.as_slice(), [CStatement::Comment(_)]));

    let start = function(&program, "start");
    assert_eq!(
        vec![
            call("Point_init", vec![addr("tmp_0")]),
            assign(name("p"), addr("tmp_0")),
            assign(deref("p"), name("tmp_0")),
        ],
        start.body
    );
}

#[test]
fn test_module_constants() {
    let program = generate("const answer: Int = 42\nfunc start() { printInt(answer) }").unwrap();
    assert_eq!(
        vec![CGlobal {
            name: "answer".into(),
            c_type: DataType::int(),
            value: CLiteral::Int(42),
        }],
        program.globals
    );
    let start = function(&program, "start");
    assert_eq!(vec![call("printInt", vec![name("answer")])], start.body);
}

#[test]
fn test_unsupported_constant() {
    let err = generate("const sum: Int = plusInt(1, 2)\nfunc start() {}").unwrap_err();
    assert_eq!(
        CodegenError::UnsupportedConstant {
            name: "sum".into(),
            kind: "FunctionCall",
        },
        err
    );
}

#[test]
fn test_missing_entry_point() {
    let err = generate("func begin() {}").unwrap_err();
    assert_eq!(CodegenError::MissingEntryPoint, err);
    let err = generate("func start(n: Int) {}").unwrap_err();
    assert_eq!(CodegenError::MissingEntryPoint, err);
}

#[test]
fn test_unknown_callee() {
    let err = generate("func start() { frobnicate(1) }").unwrap_err();
    assert_eq!(
        CodegenError::Semantic(SemAnalysisError::UnknownFunction("frobnicate".into())),
        err
    );
}

#[test]
fn test_overloads_use_external_names() {
    let source = "func show(v: Int) { printInt(v) }\n\
                  func show(v: String) { printString(v) }\n\
                  func start() { show(\"a\")\n show(1) }";
    let program = generate(source).unwrap();
    let prototypes: Vec<_> = program.prototypes.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(vec!["show__Int", "show__String", "start"], prototypes);
    let start = function(&program, "start");
    assert_eq!(
        vec![
            call("show__String", vec![addr("const_0")]),
            call("show__Int", vec![addr("const_1")]),
        ],
        start.body
    );
}

#[test]
fn test_entry_point_with_result() {
    let program = generate("func start() -> Int { return 0 }").unwrap();
    assert_eq!(
        CEntry {
            name: "start".into(),
            result: Some(DataType::int()),
        },
        program.entry
    );
}

#[test]
fn test_counters_reset_per_function() {
    let program = generate("func one() { printInt(1) }\nfunc start() { printInt(2) }").unwrap();
    assert_eq!(vec!["Int const_0"], local_names(function(&program, "one")));
    assert_eq!(vec!["Int const_0"], local_names(function(&program, "start")));
}

#[test]
fn test_generated_slot_names_are_reserved() {
    let err = generate("func start() { tmp_0 ::= 1 }").unwrap_err();
    assert_eq!(CodegenError::ReservedName("tmp_0".into()), err);
    let err = generate("func start() { const_0 := 5 }").unwrap_err();
    assert_eq!(CodegenError::ReservedName("const_0".into()), err);
    let err = generate("func f() -> Int { __result ::= 1\n return 0 }\nfunc start() {}").unwrap_err();
    assert_eq!(CodegenError::ReservedName("__result".into()), err);
    let err = generate("func show(tmp_3: Int) { printInt(tmp_3) }\nfunc start() {}").unwrap_err();
    assert_eq!(CodegenError::ReservedName("tmp_3".into()), err);
}

#[test]
fn test_names_resembling_slots_are_allowed() {
    let program = generate("func start() { tmp_x ::= 1\n tmpl_0 := 2\n const_ := 3 }").unwrap();
    let start = function(&program, "start");
    let locals = local_names(start);
    for declared in ["Int* tmp_x", "Int* tmpl_0", "Int* const_"] {
        assert!(locals.iter().any(|l| l == declared), "{declared} missing from {locals:?}");
    }
}

#[test]
fn test_function_shadowed_by_builtin_is_skipped() {
    let program =
        generate("func printInt(s: String) { printString(s) }\nfunc start() { printInt(1) }").unwrap();
    assert!(program.prototypes.iter().all(|p| p.name != "printInt"));
    assert!(program.functions.iter().all(|f| f.prototype.name != "printInt"));
    let start = function(&program, "start");
    assert_eq!(vec![call("printInt", vec![addr("const_0")])], start.body);
}

#[test]
fn test_uppercase_function_is_rejected() {
    let err = generate("func Greet() { printNewLine() }\nfunc start() { Greet() }").unwrap_err();
    assert_eq!(CodegenError::UppercaseFunction("Greet".into()), err);
}

#[test]
fn test_struct_fields_are_defined_first() {
    let program = generate(
        "struct Line { from: Point to: Point }\n\
         struct Point { x: Int y: Int }\n\
         struct Unit { n: Int }\n\
         func start() {}",
    )
    .unwrap();
    let order: Vec<_> = program.structs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(vec!["Point", "Line", "Unit"], order);
}

#[test]
fn test_recursive_struct_is_rejected() {
    let err = generate("struct A { b: B }\nstruct B { a: A }\nfunc start() {}").unwrap_err();
    assert_eq!(CodegenError::RecursiveStruct("A".into()), err);
    let err = generate("struct Node { next: Node }\nfunc start() {}").unwrap_err();
    assert_eq!(CodegenError::RecursiveStruct("Node".into()), err);
}
