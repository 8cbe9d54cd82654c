use std::{collections::HashMap, sync::Arc};
use duck_base::Result;
use duck_lang::{split_statements, tokenize, Opcode, Token};
use tracing::debug;

use crate::{
    context::{Context, EXECUTING},
    engine::Unit,
};

/// A tokenized program: every statement, with `label` statements indexed by
/// name. Fixed once loaded.
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub statements: Vec<Vec<Token>>,
    pub labels: HashMap<String, usize>,
}

impl Program {
    /// First pass: tokenize each statement and register labels. A label
    /// defined twice points at its later definition.
    pub fn load(source: &str) -> Program {
        let statements: Vec<Vec<Token>> = split_statements(source)
            .into_iter()
            .map(tokenize)
            .collect();
        let mut labels = HashMap::new();
        for (i, stmt) in statements.iter().enumerate() {
            if let [Token::Op(Opcode::Define), name, ..] = stmt.as_slice() {
                labels.insert(name.text().to_string(), i);
            }
        }
        debug!(
            target: "duck",
            statements = statements.len(),
            labels = labels.len(),
            "loaded program"
        );
        Program { statements, labels }
    }
}

/// Second pass: skip everything up to the first `start`, then execute each
/// statement in order while the program is running. `exit` stops the scan
/// for good; a later `start` does not resume it.
pub fn run(ctx: &Arc<Context>) -> Result<()> {
    let mut unit = Unit::new(ctx.clone());
    let mut started = false;
    ctx.set_flag(EXECUTING, false);
    for (i, stmt) in ctx.statements().iter().enumerate() {
        if ctx.flag(EXECUTING) {
            unit.execute(stmt, i)?;
        } else if !started && stmt.first().is_some_and(|t| t.is_op(Opcode::Main)) {
            started = true;
            ctx.set_flag(EXECUTING, true);
        }
    }
    if !started {
        debug!(target: "duck", "program has no start statement, nothing ran");
    }
    Ok(())
}
