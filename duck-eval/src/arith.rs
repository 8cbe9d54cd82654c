use duck_base::{script_err, Error, ErrorKind, Result};
use duck_lang::{Opcode, Token};

use crate::{context::Context, resolve::resolve};

pub(crate) fn render(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(Token::to_string).collect()
}

fn malformed(tokens: &[Token]) -> Error {
    script_err(ErrorKind::MalformedExpression {
        tokens: render(tokens),
    })
}

fn apply(op: Opcode, lhs: i64, rhs: i64) -> Option<i64> {
    match op {
        Opcode::Add => Some(lhs.wrapping_add(rhs)),
        Opcode::Sub => Some(lhs.wrapping_sub(rhs)),
        Opcode::Mul => Some(lhs.wrapping_mul(rhs)),
        Opcode::Div if rhs == 0 => None,
        Opcode::Div => Some(lhs.wrapping_div(rhs)),
        _ => None,
    }
}

// Folds every occurrence of the pass's operators left to right, replacing
// each `lhs op rhs` with its result in place.
fn fold(
    vals: &mut Vec<i64>,
    ops: &mut Vec<Opcode>,
    pass: [Opcode; 2],
    tokens: &[Token],
) -> Result<()> {
    let mut i = 0;
    while i < ops.len() {
        if !pass.contains(&ops[i]) {
            i += 1;
            continue;
        }
        let rhs = vals.remove(i + 1);
        let op = ops.remove(i);
        let folded = apply(op, vals[i], rhs).ok_or_else(|| {
            script_err(ErrorKind::DivisionByZero {
                tokens: render(tokens),
            })
        })?;
        vals[i] = folded;
    }
    Ok(())
}

/// Evaluates `operand (op operand)*` with `*` and `/` binding tighter than
/// `+` and `-`. There is no grouping. Every operand must read as an integer.
pub fn calc(ctx: &Context, tokens: &[Token]) -> Result<i64> {
    if tokens.len() % 2 == 0 {
        return Err(malformed(tokens));
    }
    let mut vals = Vec::with_capacity(tokens.len() / 2 + 1);
    let mut ops = Vec::with_capacity(tokens.len() / 2);
    for (i, token) in tokens.iter().enumerate() {
        if i % 2 == 0 {
            let val = resolve(ctx, token).as_int().ok_or_else(|| malformed(tokens))?;
            vals.push(val);
        } else {
            match token.opcode() {
                Some(op) if op.is_arithmetic() => ops.push(op),
                _ => return Err(malformed(tokens)),
            }
        }
    }
    fold(&mut vals, &mut ops, [Opcode::Mul, Opcode::Div], tokens)?;
    fold(&mut vals, &mut ops, [Opcode::Add, Opcode::Sub], tokens)?;
    match vals.as_slice() {
        [val] => Ok(*val),
        _ => Err(malformed(tokens)),
    }
}
