//! Filter expression tokenizer
//!
//! Splits on whitespace. Single- or double-quoted runs form one token and may hold
//! spaces or the word `and`; a doubled quote inside a quoted run is a literal quote.
//! Clauses are separated by a standalone `and` token (any case).

use super::ast::CompareOp;

/// One lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bare word
    Word(String),
    /// Quoted literal, quotes removed
    Quoted(String),
    /// Quoted literal missing its closing quote
    Unterminated(String),
}

impl Token {
    /// Source-like rendering, used when reporting skipped clauses
    pub fn render(&self) -> String {
        match self {
            Token::Word(w) => w.clone(),
            Token::Quoted(q) => format!("'{}'", q.replace('\'', "''")),
            Token::Unterminated(q) => format!("'{}", q),
        }
    }

    fn is_conjunction(&self) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case("and"))
    }

    fn as_operator(&self) -> Option<CompareOp> {
        match self {
            Token::Word(w) => CompareOp::from_token(w),
            _ => None,
        }
    }
}

/// Tokenizes an expression
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '\'' || c == '"' {
            let quote = c;
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some(ch) = chars.next() {
                if ch == quote {
                    if chars.peek() == Some(&quote) {
                        text.push(quote);
                        chars.next();
                    } else {
                        closed = true;
                        break;
                    }
                } else {
                    text.push(ch);
                }
            }
            tokens.push(if closed {
                Token::Quoted(text)
            } else {
                Token::Unterminated(text)
            });
            continue;
        }

        let mut word = String::new();
        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() {
                break;
            }
            word.push(ch);
            chars.next();
        }
        tokens.push(Token::Word(word));
    }

    tokens
}

/// Groups tokens into clauses. Empty clauses (leading, trailing or doubled `and`)
/// are dropped.
pub fn split_clauses(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut clauses = Vec::new();
    let mut current = Vec::new();

    for token in tokens {
        if token.is_conjunction() {
            if !current.is_empty() {
                clauses.push(std::mem::take(&mut current));
            }
        } else {
            current.push(token);
        }
    }
    if !current.is_empty() {
        clauses.push(current);
    }

    clauses
}

/// A syntactically well-formed clause, literal not yet coerced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawClause {
    pub field: String,
    pub op: CompareOp,
    pub literal: String,
}

/// Parses one clause: exactly one field word, one operator, a non-empty literal.
/// A literal may span several bare words, which are joined by single spaces.
pub fn parse_clause(tokens: &[Token]) -> Result<RawClause, String> {
    let op_positions: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.as_operator().is_some())
        .map(|(i, _)| i)
        .collect();

    let pos = match op_positions.as_slice() {
        [] => return Err("no comparison operator".to_string()),
        [pos] => *pos,
        _ => return Err("more than one comparison operator".to_string()),
    };
    let op = match tokens[pos].as_operator() {
        Some(op) => op,
        None => return Err("no comparison operator".to_string()),
    };

    let field = match &tokens[..pos] {
        [Token::Word(w)] => w.clone(),
        [] => return Err("missing field name".to_string()),
        _ => return Err("field name must be a single word".to_string()),
    };

    let rhs = &tokens[pos + 1..];
    if rhs.is_empty() {
        return Err("missing literal".to_string());
    }
    if rhs.iter().any(|t| matches!(t, Token::Unterminated(_))) {
        return Err("unterminated quote".to_string());
    }

    let literal = rhs
        .iter()
        .map(|t| match t {
            Token::Word(w) | Token::Quoted(w) | Token::Unterminated(w) => w.as_str(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    if literal.is_empty() && !matches!(rhs, [Token::Quoted(_)]) {
        return Err("missing literal".to_string());
    }

    Ok(RawClause {
        field,
        op,
        literal,
    })
}

/// Renders a clause's tokens back to text
pub fn render_clause(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::render)
        .collect::<Vec<_>>()
        .join(" ")
}
