//! Code emission using [Display]
//!
//! Dummy module containing implementation of [Display] for [CProgram](crate::codegen::CProgram) which allows to use [to_string] method or as a formatting arg in any formatting context(e.g. [format!], [write!], [println!], ..)
//!
//! [Display]: https://doc.rust-lang.org/std/fmt/trait.Display.html
//! [to_string]: https://doc.rust-lang.org/std/string/trait.ToString.html#tymethod.to_string
//! [format!]: https://doc.rust-lang.org/std/macro.format.html
//! [write!]: https://doc.rust-lang.org/std/macro.write.html
//! [println!]: https://doc.rust-lang.org/std/macro.println.html

use crate::codegen::*;

use std::fmt;

const INDENT: &str = "    ";

const INT_OPERATORS: [(&str, &str); 6] = [
    ("isEqualInt", "=="),
    ("isLessInt", "<"),
    ("isGreaterInt", ">"),
    ("minusInt", "-"),
    ("plusInt", "+"),
    ("multiplyInt", "*"),
];

fn write_prelude(f: &mut fmt::Formatter) -> fmt::Result {
    writeln!(f, "#include <stdio.h>")?;
    writeln!(f)?;
    writeln!(f, "typedef long long Int;")?;
    writeln!(f, "typedef const char* String;")?;
    writeln!(f)?;
    writeln!(f, "void printString(String* value) {{")?;
    writeln!(f, "{INDENT}printf(\"%s\", *value);")?;
    writeln!(f, "}}")?;
    writeln!(f)?;
    writeln!(f, "void printInt(Int* value) {{")?;
    writeln!(f, "{INDENT}printf(\"%lld\", *value);")?;
    writeln!(f, "}}")?;
    writeln!(f)?;
    writeln!(f, "void printNewLine() {{")?;
    writeln!(f, "{INDENT}printf(\"\\n\");")?;
    writeln!(f, "}}")?;
    for (name, op) in INT_OPERATORS {
        writeln!(f)?;
        writeln!(f, "void {name}(Int* __result, Int* a, Int* b) {{")?;
        writeln!(f, "{INDENT}*__result = *a {op} *b;")?;
        writeln!(f, "}}")?;
    }
    Ok(())
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 2);
    escaped.push('"');
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\0' => escaped.push_str("\\0"),
            c => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

impl fmt::Display for CLiteral {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{}", escape(s)),
        }
    }
}

impl fmt::Display for COperand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::AddressOf(name) => write!(f, "&{name}"),
            Self::Deref(name) => write!(f, "*{name}"),
        }
    }
}

impl fmt::Display for CDecl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.c_type, self.name)
    }
}

impl fmt::Display for CPrototype {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let params = self
            .params
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "void {}({params})", self.name)
    }
}

fn write_block(f: &mut fmt::Formatter, block: &CBlock, depth: usize) -> fmt::Result {
    for statement in block {
        write_statement(f, statement, depth)?;
    }
    Ok(())
}

fn write_statement(f: &mut fmt::Formatter, statement: &CStatement, depth: usize) -> fmt::Result {
    let indent = INDENT.repeat(depth);
    match statement {
        CStatement::Call { name, args } => {
            let args = args
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "{indent}{name}({args});")
        }
        CStatement::Assign { dst, src } => writeln!(f, "{indent}{dst} = {src};"),
        CStatement::If {
            condition,
            then,
            els,
        } => {
            writeln!(f, "{indent}if ({condition}) {{")?;
            write_block(f, then, depth + 1)?;
            if let Some(els) = els {
                writeln!(f, "{indent}}} else {{")?;
                write_block(f, els, depth + 1)?;
            }
            writeln!(f, "{indent}}}")
        }
        CStatement::Loop(body) => {
            writeln!(f, "{indent}while (1) {{")?;
            write_block(f, body, depth + 1)?;
            writeln!(f, "{indent}}}")
        }
        CStatement::BreakUnless(condition) => {
            writeln!(f, "{indent}if (!{condition}) {{")?;
            writeln!(f, "{indent}{INDENT}break;")?;
            writeln!(f, "{indent}}}")
        }
        CStatement::Return => writeln!(f, "{indent}return;"),
        CStatement::Comment(text) => writeln!(f, "{indent}/* {text} */"),
    }
}

impl fmt::Display for CFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} {{", self.prototype)?;
        for local in &self.locals {
            writeln!(f, "{INDENT}{local};")?;
        }
        if !self.locals.is_empty() {
            writeln!(f)?;
        }
        for (name, value) in &self.const_inits {
            writeln!(f, "{INDENT}{name} = {value};")?;
        }
        if !self.const_inits.is_empty() {
            writeln!(f)?;
        }
        write_block(f, &self.body, 1)?;
        writeln!(f, "}}")
    }
}

impl fmt::Display for CStruct {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "struct {} {{", self.name)?;
        for field in &self.fields {
            writeln!(f, "{INDENT}{field};")?;
        }
        writeln!(f, "}};")
    }
}

impl fmt::Display for CGlobal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Self {
            name,
            c_type,
            value,
        } = self;
        writeln!(f, "static {c_type} {name}__value = {value};")?;
        writeln!(f, "static {} const {name} = &{name}__value;", c_type.pointer())
    }
}

impl fmt::Display for CEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "int main() {{")?;
        match &self.result {
            Some(result_type) => {
                writeln!(f, "{INDENT}{result_type} result;")?;
                writeln!(f, "{INDENT}{}(&result);", self.name)?;
            }
            None => writeln!(f, "{INDENT}{}();", self.name)?,
        }
        writeln!(f, "{INDENT}return 0;")?;
        writeln!(f, "}}")
    }
}

impl fmt::Display for CProgram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_prelude(f)?;
        writeln!(f)?;

        if !self.structs.is_empty() {
            for s in &self.structs {
                writeln!(f, "typedef struct {0} {0};", s.name)?;
            }
            writeln!(f)?;
            for s in &self.structs {
                writeln!(f, "{s}")?;
            }
        }

        if !self.globals.is_empty() {
            for global in &self.globals {
                write!(f, "{global}")?;
            }
            writeln!(f)?;
        }

        if !self.prototypes.is_empty() {
            for prototype in &self.prototypes {
                writeln!(f, "{prototype};")?;
            }
            writeln!(f)?;
        }

        for function in &self.functions {
            writeln!(f, "{function}")?;
        }

        write!(f, "{}", self.entry)
    }
}
