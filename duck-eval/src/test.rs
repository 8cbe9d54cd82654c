use crate::{Config, Console, Context, Interpreter, MemOutput, Program, Unit, EXECUTING};
use duck_base::Result;
use duck_lang::{split_statements, tokenize, Token};
use std::sync::Arc;

mod engine;

/// An interpreter over `source` whose console reads `input` and records
/// output in memory.
pub(crate) fn interp(source: &str, input: &str) -> (Interpreter, MemOutput) {
    let (console, out) = Console::memory(input);
    (Interpreter::with_console(source, Config::new(), console), out)
}

/// A running context with no statements, for executing statements directly.
pub(crate) fn context(input: &str) -> (Arc<Context>, MemOutput) {
    let (console, out) = Console::memory(input);
    let ctx = Arc::new(Context::new(Program::default(), console));
    ctx.set_flag(EXECUTING, true);
    (ctx, out)
}

pub(crate) fn toks(text: &str) -> Vec<Token> {
    tokenize(text)
}

/// Executes each `;`-separated statement in one unit.
pub(crate) fn exec_all(ctx: &Arc<Context>, source: &str) -> Result<()> {
    let mut unit = Unit::new(ctx.clone());
    for (i, stmt) in split_statements(source).into_iter().enumerate() {
        unit.execute(&tokenize(stmt), i)?;
    }
    Ok(())
}
