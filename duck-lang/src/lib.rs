// The duck language has no grammar beyond flat token sequences: a program is
// a list of `;`-separated statements, each statement a list of tokens, and
// the first token of a statement picks the operation. This crate owns the
// vocabulary (Opcode), the tokenizer, the statement splitter and the typed
// values the evaluator passes around. Nothing here touches the environment.


mod source;
mod token;
mod value;

pub use source::{split_statements, STATEMENT_DELIMITER};
pub use token::{tokenize, Opcode, Token};
pub use value::{Kind, TypedValue};
