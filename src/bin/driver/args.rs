use clap::Parser;
use std::path::PathBuf;

#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(version, about = "Mis to C compiler", long_about = None)]
pub struct Args {
    /// Stop after lexing and dump the tokens
    #[arg(long)]
    pub lex: bool,

    /// Stop after parsing and dump the syntax tree
    #[arg(long)]
    pub parse: bool,

    /// Stop after semantic analysis and dump the symbol table
    #[arg(long)]
    pub validate: bool,

    /// Where to write the generated C (defaults to FILE with a .c extension)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also build an executable from the generated C with `cc`
    #[arg(long)]
    pub cc: bool,

    pub input: PathBuf,
}

impl Args {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("c"))
    }

    pub fn executable_path(&self) -> PathBuf {
        self.input.with_extension("")
    }
}
