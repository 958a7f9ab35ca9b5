mod args;
mod driver_error;
#[cfg(test)]
mod driver_tests;

use anyhow::Context;
use args::Args;
use clap::Parser;
use driver_error::DriverError;
use misc::*;

use std::fs;
use std::path::Path;
use std::process::Command;

fn tokenize(source: &str, args: &Args) -> anyhow::Result<lexer::Tokens> {
    let tokens = lexer::lex(source)?;
    if args.lex {
        dbg!(&tokens);
    }
    Ok(tokens)
}

fn parse(tokens: &[lexer::PositionedToken], source: &str, args: &Args) -> anyhow::Result<ast::Module> {
    let module = parser::parse(tokens, source)?;
    if args.parse {
        dbg!(&module);
    }
    Ok(module)
}

fn validate(module: &ast::Module, args: &Args) -> anyhow::Result<()> {
    let symbols = semantic_analysis::build_symbol_table(module);
    let typed = semantic_analysis::annotate(module, &symbols)?;
    if args.validate {
        dbg!(&symbols);
        log::info!("annotated {} statements", typed.annotated_count());
    }
    Ok(())
}

fn build_executable(c_file: &Path, args: &Args) -> anyhow::Result<()> {
    let executable = args.executable_path();
    let status = Command::new("cc")
        .arg(c_file)
        .arg("-o")
        .arg(&executable)
        .status()
        .context("failed to run cc")?;
    if !status.success() {
        return Err(DriverError::CCompilerFailed(status).into());
    }
    log::info!("wrote {}", executable.display());
    Ok(())
}

/// Compile `args.input`. The output file is only written once compilation succeeded.
fn run(args: &Args) -> anyhow::Result<()> {
    if !fs::exists(&args.input)? {
        return Err(DriverError::InputFileDoesNotExist(args.input.clone()).into());
    }
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("can't read {}", args.input.display()))?;

    if args.lex || args.parse || args.validate {
        let tokens = tokenize(&source, args)?;
        if args.lex {
            return Ok(());
        }
        let module = parse(&tokens, &source, args)?;
        if args.parse {
            return Ok(());
        }
        return validate(&module, args);
    }

    let c_source = compile(&source)?;
    let c_file = args.output_path();
    fs::write(&c_file, c_source).with_context(|| format!("can't write {}", c_file.display()))?;
    log::info!("wrote {}", c_file.display());

    if args.cc {
        build_executable(&c_file, args)?;
    }
    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    env_logger::init();
    run(&Args::parse())
}
