use duck_lang::{Token, TypedValue};

use crate::context::Context;

/// Reads a token as a value. Never fails: a token that is neither a literal
/// nor a known symbol reads as Null carrying its own text.
pub fn resolve(ctx: &Context, token: &Token) -> TypedValue {
    match token {
        Token::Operand(text) => resolve_text(ctx, text),
        Token::Op(op) => TypedValue::null(op.tag()),
    }
}

// Literals classify directly. A symbol is followed to its stored text, which
// is classified again, so aliases chain (`set b = a` then reading `b` reads
// whatever `a` reads). The chain stops at a literal, at text naming no
// symbol (keeping the kind it was stored with), at a symbol storing its own
// name, or at a name already followed on this chain.
pub fn resolve_text(ctx: &Context, text: &str) -> TypedValue {
    let mut current = TypedValue::null(text);
    let mut followed: Vec<String> = Vec::new();
    loop {
        if let Some(lit) = TypedValue::literal(&current.text) {
            return lit;
        }
        match ctx.symbol(&current.text) {
            Some(stored) if stored.text != current.text && !followed.contains(&current.text) => {
                followed.push(std::mem::replace(&mut current, stored).text);
            }
            _ => return current,
        }
    }
}
