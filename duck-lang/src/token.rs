use serde::{Deserialize, Serialize};
use std::fmt;

// An opcode is drawn from a closed vocabulary of punctuation and keywords.
// Some opcodes start statements (Out, Var, Cond, ...); the rest only ever
// appear inside one (operators, Then, Val). Main and Define are structural:
// they mark the program start and jump targets, and do nothing when run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Opcode {
    Great,
    Less,
    GreatE,
    LessE,
    Not,
    Equal,
    Then,
    Val,

    Add,
    Sub,
    Mul,
    Div,

    Cond,
    Var,
    Jmp,
    Define,
    End,
    Break,
    Out,
    In,
    Exec,
    Main,
    Timeout,
    Thread,
}

const VOCABULARY: &[(&str, Opcode)] = &[
    (">", Opcode::Great),
    ("<", Opcode::Less),
    (">=", Opcode::GreatE),
    ("<=", Opcode::LessE),
    ("!=", Opcode::Not),
    ("==", Opcode::Equal),
    (":", Opcode::Then),
    ("=", Opcode::Val),
    ("+", Opcode::Add),
    ("-", Opcode::Sub),
    ("*", Opcode::Mul),
    ("/", Opcode::Div),
    ("case", Opcode::Cond),
    ("set", Opcode::Var),
    ("goto", Opcode::Jmp),
    ("label", Opcode::Define),
    ("end", Opcode::End),
    ("exit", Opcode::Break),
    ("print", Opcode::Out),
    ("input", Opcode::In),
    ("invoke", Opcode::Exec),
    ("start", Opcode::Main),
    ("sleep", Opcode::Timeout),
    ("thread", Opcode::Thread),
];

impl Opcode {
    pub fn from_spelling(word: &str) -> Option<Opcode> {
        VOCABULARY
            .iter()
            .find(|(spelling, _)| *spelling == word)
            .map(|(_, op)| *op)
    }

    /// The source text that lexes to this opcode.
    pub fn spelling(self) -> &'static str {
        VOCABULARY
            .iter()
            .find(|(_, op)| *op == self)
            .map(|(spelling, _)| *spelling)
            .unwrap_or("")
    }

    /// The tag used when printing token sequences in diagnostics.
    pub fn tag(self) -> &'static str {
        match self {
            Opcode::Great => "GREAT",
            Opcode::Less => "LESS",
            Opcode::GreatE => "GREATE",
            Opcode::LessE => "LESSE",
            Opcode::Not => "NOT",
            Opcode::Equal => "EQUAL",
            Opcode::Then => "THEN",
            Opcode::Val => "VAL",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Cond => "COND",
            Opcode::Var => "VAR",
            Opcode::Jmp => "JMP",
            Opcode::Define => "DEFINE",
            Opcode::End => "END",
            Opcode::Break => "BREAK",
            Opcode::Out => "OUT",
            Opcode::In => "IN",
            Opcode::Exec => "EXEC",
            Opcode::Main => "MAIN",
            Opcode::Timeout => "TIMEOUT",
            Opcode::Thread => "THREAD",
        }
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            Opcode::Great
                | Opcode::Less
                | Opcode::GreatE
                | Opcode::LessE
                | Opcode::Not
                | Opcode::Equal
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div)
    }

    /// Statements starting with one of these bound a jump loop.
    pub fn is_structural(self) -> bool {
        matches!(self, Opcode::Main | Opcode::Define)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Token {
    Op(Opcode),
    Operand(String),
}

impl Token {
    pub fn opcode(&self) -> Option<Opcode> {
        match self {
            Token::Op(op) => Some(*op),
            Token::Operand(_) => None,
        }
    }

    pub fn is_op(&self, op: Opcode) -> bool {
        self.opcode() == Some(op)
    }

    /// Operand text, or the opcode's tag for an opcode.
    pub fn text(&self) -> &str {
        match self {
            Token::Op(op) => op.tag(),
            Token::Operand(s) => s,
        }
    }
}

impl From<&str> for Token {
    fn from(word: &str) -> Token {
        match Opcode::from_spelling(word) {
            Some(op) => Token::Op(op),
            None => Token::Operand(word.to_string()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

// Splits on whitespace, except that a token starting with a quote runs to
// the next quote when there is one. Unterminated quotes and quotes in the
// middle of a word get no special treatment.
fn words(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = text.trim_start();
    while !rest.is_empty() {
        let len = match rest.strip_prefix('\'').and_then(|tail| tail.find('\'')) {
            Some(close) => close + 2,
            None => rest.find(char::is_whitespace).unwrap_or(rest.len()),
        };
        out.push(&rest[..len]);
        rest = rest[len..].trim_start();
    }
    out
}

pub fn tokenize(text: &str) -> Vec<Token> {
    words(text).into_iter().map(Token::from).collect()
}
