use std::{
    process::{Command, Stdio},
    sync::Arc,
    thread,
    time::Duration,
};
use duck_base::{script_err, Error, ErrorKind, Result};
use duck_lang::{tokenize, Opcode, Token, TypedValue};
use tracing::{debug, trace, warn};

use crate::{
    arith::{calc, render},
    context::{Context, EXECUTING},
    relational::cond,
    resolve::{resolve, resolve_text},
};

/// What the caller of [`Unit::execute`] should do next.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Flow {
    Next,
    /// A `goto` named the label of the innermost loop running in this unit.
    /// That loop rewinds to its label instead of nesting a second loop.
    Restart(String),
}

fn starts_block(stmt: &[Token]) -> bool {
    stmt.first()
        .and_then(Token::opcode)
        .is_some_and(Opcode::is_structural)
}

fn invalid_assignment(found: Option<&Token>) -> Error {
    script_err(ErrorKind::InvalidAssignmentOperator {
        found: found.map(Token::to_string).unwrap_or_default(),
    })
}

// A Unit is one line of execution: the main program, or a statement handed
// to `thread`. Units share the Context and nothing else; the stack of labels
// a unit is currently looping over is its own.
pub struct Unit {
    ctx: Arc<Context>,
    looping: Vec<String>,
}

impl Unit {
    pub fn new(ctx: Arc<Context>) -> Self {
        Unit {
            ctx,
            looping: Vec::new(),
        }
    }

    /// Runs one statement. `index` is the statement's position in the
    /// program, used for diagnostics and thread names.
    pub fn execute(&mut self, tokens: &[Token], index: usize) -> Result<Flow> {
        let Some(first) = tokens.first() else {
            return Ok(Flow::Next);
        };
        let Token::Op(op) = first else {
            return Ok(Flow::Next);
        };
        trace!(target: "duck", index, statement = ?render(tokens), "execute");
        match op {
            Opcode::Out => self.print(tokens)?,
            Opcode::Var => self.assign(tokens)?,
            Opcode::Cond => return self.branch(tokens, index),
            Opcode::Timeout => self.sleep(tokens),
            Opcode::Break => self.ctx.set_flag(EXECUTING, false),
            Opcode::Thread => self.spawn(tokens, index)?,
            Opcode::Jmp => {
                if let Some(label) = tokens.get(1) {
                    return self.jump(label.text());
                }
            }
            Opcode::End => {
                if let Some(label) = tokens.get(1) {
                    self.ctx.set_flag(label.text(), false);
                }
            }
            Opcode::In => return self.input(tokens, index),
            Opcode::Exec => return self.invoke(tokens, index),
            Opcode::Main
            | Opcode::Define
            | Opcode::Great
            | Opcode::Less
            | Opcode::GreatE
            | Opcode::LessE
            | Opcode::Not
            | Opcode::Equal
            | Opcode::Then
            | Opcode::Val
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div => {}
        }
        Ok(Flow::Next)
    }

    fn print(&self, tokens: &[Token]) -> Result<()> {
        let Some(operand) = tokens.get(1) else {
            return Ok(());
        };
        let val = resolve(&self.ctx, operand);
        let text = if val.is_int() {
            calc(&self.ctx, &tokens[1..])?.to_string()
        } else {
            val.text
        };
        self.ctx.console().write(&text)
    }

    fn assign(&self, tokens: &[Token]) -> Result<()> {
        match tokens.get(2) {
            Some(tok) if tok.is_op(Opcode::Val) => {}
            other => return Err(invalid_assignment(other)),
        }
        let rhs = &tokens[3..];
        let Some(first) = rhs.first() else {
            return Err(script_err(ErrorKind::MalformedExpression {
                tokens: render(tokens),
            }));
        };
        let mut val = resolve(&self.ctx, first);
        if val.is_int() {
            val = TypedValue::integer(calc(&self.ctx, rhs)?);
        }
        self.ctx.set_symbol(tokens[1].text(), val);
        Ok(())
    }

    fn branch(&mut self, tokens: &[Token], index: usize) -> Result<Flow> {
        match tokens.iter().position(|t| t.is_op(Opcode::Then)) {
            Some(then) if cond(&self.ctx, &tokens[1..then]) => {
                self.execute(&tokens[then + 1..], index)
            }
            _ => Ok(Flow::Next),
        }
    }

    fn sleep(&self, tokens: &[Token]) {
        let millis = tokens.get(1).and_then(|t| t.text().parse::<u64>().ok());
        match millis {
            Some(ms) => thread::sleep(Duration::from_millis(ms)),
            None => debug!(target: "duck", "sleep without a millisecond count, skipped"),
        }
    }

    fn spawn(&self, tokens: &[Token], index: usize) -> Result<()> {
        let body = tokens[1..].to_vec();
        let ctx = self.ctx.clone();
        let handle = thread::Builder::new()
            .name(format!("duck-{}", index))
            .spawn(move || {
                let mut unit = Unit::new(ctx);
                if let Err(e) = unit.execute(&body, index) {
                    warn!(target: "duck", index, "thread unit aborted: {}", e);
                }
            })?;
        debug!(target: "duck", index, "spawned thread unit");
        self.ctx.push_thread(handle);
        Ok(())
    }

    fn jump(&mut self, label: &str) -> Result<Flow> {
        let Some(target) = self.ctx.label(label) else {
            debug!(target: "duck", label, "goto unknown label, ignored");
            return Ok(Flow::Next);
        };
        self.ctx.set_flag(label, true);
        if self.looping.last().is_some_and(|l| l == label) {
            return Ok(Flow::Restart(label.to_string()));
        }
        self.looping.push(label.to_string());
        let flow = self.run_loop(label, target);
        self.looping.pop();
        flow
    }

    // Runs the statements after the label until the label's flag is cleared
    // (by `end`, possibly from another unit), the program is stopped by
    // `exit`, or the cursor reaches a `start`, a `label` or the end of the
    // program.
    fn run_loop(&mut self, label: &str, target: usize) -> Result<Flow> {
        let ctx = self.ctx.clone();
        let mut cursor = target;
        while ctx.flag(label) && ctx.flag(EXECUTING) {
            cursor += 1;
            let stmt = match ctx.statement(cursor) {
                Some(stmt) if !starts_block(stmt) => stmt,
                _ => {
                    ctx.set_flag(label, false);
                    break;
                }
            };
            match self.execute(stmt, cursor)? {
                Flow::Next => {}
                Flow::Restart(l) if l == label => cursor = target,
                outer => return Ok(outer),
            }
        }
        Ok(Flow::Next)
    }

    // `input` and `invoke` store what they capture by running the statement
    // `set NAME = 'CAPTURED'`, so the text is classified like any literal.
    fn capture(&mut self, tokens: &[Token], captured: &str, index: usize) -> Result<Flow> {
        match tokens.get(2) {
            None => Ok(Flow::Next),
            Some(tok) if tok.is_op(Opcode::Val) => {
                let Some(name) = tokens.get(3) else {
                    return Err(script_err(ErrorKind::MalformedExpression {
                        tokens: render(tokens),
                    }));
                };
                let text = resolve_text(&self.ctx, captured).text;
                let stmt = format!(
                    "{} {} {} '{}'",
                    Opcode::Var.spelling(),
                    name.text(),
                    Opcode::Val.spelling(),
                    text
                );
                self.execute(&tokenize(&stmt), index)
            }
            other => Err(invalid_assignment(other)),
        }
    }

    fn input(&mut self, tokens: &[Token], index: usize) -> Result<Flow> {
        if let Some(prompt) = tokens.get(1) {
            let prompt = resolve(&self.ctx, prompt);
            self.ctx.console().write(&prompt.text)?;
        }
        let line = self.ctx.console().read_line()?;
        self.capture(tokens, line.trim(), index)
    }

    fn invoke(&mut self, tokens: &[Token], index: usize) -> Result<Flow> {
        let Some(operand) = tokens.get(1) else {
            return Ok(Flow::Next);
        };
        let line = resolve(&self.ctx, operand).text;
        let mut words = line.split_whitespace();
        let Some(program) = words.next() else {
            return Ok(Flow::Next);
        };
        let mut command = Command::new(program);
        command.args(words);
        match tokens.get(2) {
            None => {
                let started = command
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn();
                match started {
                    Ok(child) => {
                        debug!(target: "duck", program, pid = child.id(), "started process")
                    }
                    Err(e) => {
                        debug!(target: "duck", program, "process failed to start: {}", e)
                    }
                }
                Ok(Flow::Next)
            }
            Some(tok) if tok.is_op(Opcode::Val) => {
                let stdout = match command.output() {
                    Ok(out) => String::from_utf8_lossy(&out.stdout).into_owned(),
                    Err(e) => {
                        debug!(target: "duck", program, "process failed to start: {}", e);
                        String::new()
                    }
                };
                self.capture(tokens, stdout.trim(), index)
            }
            other => Err(invalid_assignment(other)),
        }
    }
}
