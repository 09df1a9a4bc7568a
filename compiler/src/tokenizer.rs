use regex::Regex;
use lazy_static::lazy_static;
use crate::utils::{quote, error};
use crate::error::DtoError;

lazy_static! {
    pub static ref TOKEN_REGEX: Regex = Regex::new(concat!(
        r"(//[^\n]*",
        r"|/\*(?s:.*?)\*/",
        r"|/\*",
        r"|`[^`]*`",
        r#"|"(?:[^"\\\n]|\\.)*""#,
        r"|'(?:[^'\\\n]|\\.)*'",
        r"|\.\d(?:[eEpP][+-]|[\w.])*",
        r"|\d(?:[eEpP][+-]|[\w.])*",
        r"|[\p{L}_][\p{L}\p{Nd}_]*",
        r"|\.\.\.|<<=|>>=|&\^=|&&|\|\||<-|\+\+|--|==|!=|<=|>=|:=|<<|>>|&\^|[-+*/%&|^]=",
        r"|[-+*/%&|^<>=!~().,;:\[\]{}]",
        r"|\s+)",
    )).unwrap();
    pub static ref WHITESPACE_RX: Regex = Regex::new(r"^(//.*|(?s:/\*.*\*/)|\s+)$").unwrap();
}

pub const KEYWORDS: [&str; 25] = [
    "break", "case", "chan", "const", "continue", "default", "defer", "else",
    "fallthrough", "for", "func", "go", "goto", "if", "import", "interface",
    "map", "package", "range", "return", "select", "struct", "switch", "type",
    "var",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Keyword,
    Number,
    String,
    RawString,
    Rune,
    Operator,
    Semicolon,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind:   TokenKind,
    pub text:   String,
    pub line:   usize,
    pub column: usize,
}

impl Token {
    pub fn is(&self, text: &str) -> bool {
        self.kind != TokenKind::String && self.kind != TokenKind::RawString && self.text == text
    }
}

fn classify(part: &str) -> TokenKind {
    let first = part.chars().next().unwrap_or(' ');
    match first {
        '"' => TokenKind::String,
        '`' => TokenKind::RawString,
        '\'' => TokenKind::Rune,
        ';' => TokenKind::Semicolon,
        c if c.is_ascii_digit() => TokenKind::Number,
        '.' if part.len() > 1 && part.as_bytes()[1].is_ascii_digit() => TokenKind::Number,
        c if c == '_' || c.is_alphabetic() => {
            if KEYWORDS.contains(&part) {
                TokenKind::Keyword
            } else {
                TokenKind::Ident
            }
        }
        _ => TokenKind::Operator,
    }
}

/// Whether a line break after `token` ends the statement.
fn ends_statement(token: &Token) -> bool {
    match token.kind {
        TokenKind::Ident
        | TokenKind::Number
        | TokenKind::String
        | TokenKind::RawString
        | TokenKind::Rune => true,
        TokenKind::Keyword => matches!(
            token.text.as_str(),
            "break" | "continue" | "fallthrough" | "return"
        ),
        TokenKind::Operator => matches!(token.text.as_str(), "++" | "--" | ")" | "]" | "}"),
        TokenKind::Semicolon | TokenKind::Eof => false,
    }
}

fn describe_unexpected(unexpected: &str) -> String {
    match unexpected.chars().next() {
        Some('"') => "Unterminated string literal".to_string(),
        Some('`') => "Unterminated raw string literal".to_string(),
        Some('\'') => "Unterminated rune literal".to_string(),
        _ => format!("Syntax error: {}", quote(unexpected)),
    }
}

/// Splits Go source into tokens, inserting semicolons at line breaks the
/// way the Go grammar does. The last token is always `Eof`.
pub fn tokenize_source(text: &str) -> Result<Vec<Token>, DtoError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut line = 1;
    let mut column = 1;
    let mut last_end = 0;

    let needs_semicolon = |tokens: &Vec<Token>| tokens.last().map_or(false, ends_statement);

    for mat in TOKEN_REGEX.find_iter(text) {
        let start = mat.start();
        let end   = mat.end();
        let part  = mat.as_str();

        if start > last_end {
            let unexpected = &text[last_end..start];
            return Err(error(&describe_unexpected(unexpected), line, column));
        }

        // A complete comment always wins, so a bare opener never closes.
        if part == "/*" {
            return Err(error("Unterminated comment", line, column));
        }

        if WHITESPACE_RX.is_match(part) {
            if part.contains('\n') && needs_semicolon(&tokens) {
                tokens.push(Token {
                    kind: TokenKind::Semicolon,
                    text: "\n".to_string(),
                    line,
                    column,
                });
            }
        } else {
            tokens.push(Token {
                kind: classify(part),
                text: part.to_string(),
                line,
                column,
            });
        }

        // Update line/column
        let newline_count = part.matches('\n').count();
        if newline_count > 0 {
            line += newline_count;
            if let Some(last_line_part) = part.split('\n').last() {
                column = last_line_part.len() + 1;
            }
        } else {
            column += part.len();
        }

        last_end = end;
    }

    if last_end != text.len() {
        let unexpected = &text[last_end..];
        return Err(error(&describe_unexpected(unexpected), line, column));
    }

    if needs_semicolon(&tokens) {
        tokens.push(Token {
            kind: TokenKind::Semicolon,
            text: "\n".to_string(),
            line,
            column,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        text: "".to_string(),
        line,
        column,
    });
    Ok(tokens)
}
