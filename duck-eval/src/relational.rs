use duck_lang::{Opcode, Token};

use crate::{context::Context, resolve::resolve};

// Operands and opcodes are separated into two sequences; the operator at
// position i compares values i and i+1. Only the first relational operator
// is ever evaluated: `5 > 3 < 1` is just `5 > 3`.
pub fn cond(ctx: &Context, tokens: &[Token]) -> bool {
    let mut vals = Vec::new();
    let mut ops = Vec::new();
    for token in tokens {
        match token {
            Token::Op(op) => ops.push(*op),
            Token::Operand(_) => vals.push(resolve(ctx, token)),
        }
    }
    let Some(i) = ops.iter().position(|op| op.is_relational()) else {
        return false;
    };
    let (Some(lhs), Some(rhs)) = (vals.get(i), vals.get(i + 1)) else {
        return false;
    };
    match (ops[i], lhs.as_int(), rhs.as_int()) {
        (Opcode::Not, _, _) => lhs.text != rhs.text,
        (Opcode::Equal, _, _) => lhs.text == rhs.text,
        (Opcode::Great, Some(l), Some(r)) => l > r,
        (Opcode::Less, Some(l), Some(r)) => l < r,
        (Opcode::GreatE, Some(l), Some(r)) => l >= r,
        (Opcode::LessE, Some(l), Some(r)) => l <= r,
        _ => false,
    }
}
