//! Command-line interface definitions.
//!
//! This module contains only clap struct definitions - no business logic.
//! All command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use verdict_core::syntax::DEFAULT_MAX_DEPTH;

use crate::common::vars::{VarAssignment, parse_assignment};

/// Verdict - evaluate boolean rule expressions
#[derive(Parser, Debug)]
#[command(name = "verdict", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate an expression and print `true` or `false`
    Eval(EvalArgs),

    /// Parse and validate expressions stored in files without evaluating them
    Check(CheckArgs),
}

/// Arguments for the `eval` command.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Expression to evaluate
    pub expression: String,

    /// Bind a variable, e.g. `--var speed=87` or `--var car='byd'`
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub vars: Vec<VarAssignment>,

    /// Maximum nesting depth accepted by the parser
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files to check, one expression per file (`-` reads stdin)
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Only report through the exit status
    #[arg(short, long)]
    pub quiet: bool,

    /// Maximum nesting depth accepted by the parser
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}
