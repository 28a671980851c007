//! Support for AMD-style script resource files.
//!
//! The input is lexed as an ECMAScript program, then a single pass over the
//! token stream recovers `"key": "value"` properties from object literals at
//! any nesting depth, including inside module wrappers and function bodies.
//! Only statically determinable string-key to string-literal pairs are
//! collected; computed keys, template values, non-string values, calls, and
//! spreads are skipped silently. A program that cannot be lexed, or whose
//! brackets do not balance, is a malformed script.

use crate::{
    error::{Error, ParseErrorKind},
    traits::FormatParser,
    types::ResourceMapping,
};

/// The string-literal pairs recovered from one script file.
///
/// Pair order follows traversal (document) order; converting into a
/// [`ResourceMapping`] applies last-wins on duplicate keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    /// All recovered key-value pairs in traversal order.
    pub pairs: Vec<(String, String)>,
}

impl FormatParser for Format {
    fn from_reader<R: std::io::BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut source = String::new();
        reader.read_to_string(&mut source).map_err(Error::Io)?;
        let tokens = Lexer::new(&source).tokenize()?;
        let pairs = extract_pairs(&tokens)?;
        Ok(Format { pairs })
    }

    /// Writes the pairs back out as an AMD `define` module.
    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        writeln!(writer, "define({{").map_err(Error::Io)?;
        for (key, value) in &self.pairs {
            writeln!(
                writer,
                "    {}: {},",
                serde_json::to_string(key)?,
                serde_json::to_string(value)?
            )
            .map_err(Error::Io)?;
        }
        writeln!(writer, "}});").map_err(Error::Io)?;
        Ok(())
    }
}

impl From<Format> for ResourceMapping {
    fn from(value: Format) -> Self {
        value.pairs.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// A single- or double-quoted string literal, escapes decoded.
    Str(String),
    /// A template literal; contents are never extracted.
    Template,
    /// A numeric literal.
    Number,
    /// An identifier or keyword.
    Ident(String),
    /// A regular expression literal.
    Regex,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semi,
    Colon,
    /// A run of operator characters (`=`, `=>`, `&&`, `...`, ...).
    Op(String),
}

fn err(message: impl Into<String>) -> Error {
    Error::parse(ParseErrorKind::MalformedScript, message)
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn tokenize(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
                continue;
            }
            match c {
                '/' => match self.peek_at(1) {
                    Some('/') => self.skip_line_comment(),
                    Some('*') => self.skip_block_comment()?,
                    _ if regex_allowed(tokens.last()) => {
                        self.lex_regex()?;
                        tokens.push(Token::Regex);
                    }
                    _ => {
                        self.pos += 1;
                        tokens.push(Token::Op("/".to_string()));
                    }
                },
                '"' | '\'' => {
                    let text = self.lex_string(c)?;
                    tokens.push(Token::Str(text));
                }
                '`' => {
                    self.lex_template()?;
                    tokens.push(Token::Template);
                }
                '{' => {
                    self.pos += 1;
                    tokens.push(Token::LBrace);
                }
                '}' => {
                    self.pos += 1;
                    tokens.push(Token::RBrace);
                }
                '(' => {
                    self.pos += 1;
                    tokens.push(Token::LParen);
                }
                ')' => {
                    self.pos += 1;
                    tokens.push(Token::RParen);
                }
                '[' => {
                    self.pos += 1;
                    tokens.push(Token::LBracket);
                }
                ']' => {
                    self.pos += 1;
                    tokens.push(Token::RBracket);
                }
                ',' => {
                    self.pos += 1;
                    tokens.push(Token::Comma);
                }
                ';' => {
                    self.pos += 1;
                    tokens.push(Token::Semi);
                }
                ':' => {
                    self.pos += 1;
                    tokens.push(Token::Colon);
                }
                _ if c.is_ascii_digit() => {
                    while self
                        .peek()
                        .is_some_and(|c| c.is_alphanumeric() || c == '.' || c == '_')
                    {
                        self.pos += 1;
                    }
                    tokens.push(Token::Number);
                }
                _ if is_ident_start(c) => {
                    let start = self.pos;
                    while self.peek().is_some_and(is_ident_continue) {
                        self.pos += 1;
                    }
                    let name: String = self.chars[start..self.pos].iter().collect();
                    tokens.push(Token::Ident(name));
                }
                _ if is_op_char(c) => {
                    let start = self.pos;
                    while self.peek().is_some_and(is_op_char) {
                        self.pos += 1;
                    }
                    let op: String = self.chars[start..self.pos].iter().collect();
                    tokens.push(Token::Op(op));
                }
                other => return Err(err(format!("illegal character `{other}`"))),
            }
        }
        Ok(tokens)
    }

    fn skip_line_comment(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), Error> {
        self.pos += 2;
        while self.pos < self.chars.len() {
            if self.peek() == Some('*') && self.peek_at(1) == Some('/') {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }
        Err(err("unterminated block comment"))
    }

    fn lex_string(&mut self, quote: char) -> Result<String, Error> {
        self.pos += 1;
        let mut text = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(err("unterminated string literal"));
            };
            if c == quote {
                self.pos += 1;
                return Ok(text);
            }
            if c == '\n' || c == '\r' {
                return Err(err("unterminated string literal"));
            }
            if c != '\\' {
                text.push(c);
                self.pos += 1;
                continue;
            }
            self.pos += 1;
            let Some(esc) = self.peek() else {
                return Err(err("unterminated string literal"));
            };
            self.pos += 1;
            match esc {
                'n' => text.push('\n'),
                't' => text.push('\t'),
                'r' => text.push('\r'),
                'b' => text.push('\x08'),
                'f' => text.push('\x0c'),
                'v' => text.push('\x0b'),
                '0' => text.push('\0'),
                // escaped line terminator: line continuation
                '\n' => {}
                '\r' => {
                    if self.peek() == Some('\n') {
                        self.pos += 1;
                    }
                }
                'x' => {
                    let code = self.read_hex_digits(2)?;
                    text.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                'u' => {
                    let code = self.read_unicode_escape()?;
                    if (0xD800..=0xDBFF).contains(&code)
                        && self.peek() == Some('\\')
                        && self.peek_at(1) == Some('u')
                    {
                        self.pos += 2;
                        let low = self.read_unicode_escape()?;
                        if (0xDC00..=0xDFFF).contains(&low) {
                            let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                            text.push(
                                char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER),
                            );
                            continue;
                        }
                        // not a low surrogate: decode both independently
                        text.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                        text.push(char::from_u32(low).unwrap_or(char::REPLACEMENT_CHARACTER));
                        continue;
                    }
                    text.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                other => text.push(other),
            }
        }
    }

    fn read_hex_digits(&mut self, count: usize) -> Result<u32, Error> {
        let mut code = 0u32;
        for _ in 0..count {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| err("malformed hexadecimal escape"))?;
            code = code * 16 + digit;
            self.pos += 1;
        }
        Ok(code)
    }

    /// Reads the body of a `\u` escape, either `XXXX` or `{X..XXXXXX}`.
    fn read_unicode_escape(&mut self) -> Result<u32, Error> {
        if self.peek() == Some('{') {
            self.pos += 1;
            let mut code = 0u32;
            let mut digits = 0;
            while let Some(c) = self.peek() {
                if c == '}' {
                    self.pos += 1;
                    if digits == 0 || code > 0x10FFFF {
                        return Err(err("malformed unicode escape"));
                    }
                    return Ok(code);
                }
                let digit = c.to_digit(16).ok_or_else(|| err("malformed unicode escape"))?;
                code = code * 16 + digit;
                digits += 1;
                if digits > 6 {
                    return Err(err("malformed unicode escape"));
                }
                self.pos += 1;
            }
            Err(err("malformed unicode escape"))
        } else {
            self.read_hex_digits(4)
        }
    }

    fn lex_template(&mut self) -> Result<(), Error> {
        self.pos += 1;
        loop {
            let Some(c) = self.peek() else {
                return Err(err("unterminated template literal"));
            };
            match c {
                '`' => {
                    self.pos += 1;
                    return Ok(());
                }
                '\\' => self.pos += 2,
                '$' if self.peek_at(1) == Some('{') => {
                    self.pos += 2;
                    self.skip_template_substitution()?;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn skip_template_substitution(&mut self) -> Result<(), Error> {
        let mut depth = 1usize;
        while depth > 0 {
            let Some(c) = self.peek() else {
                return Err(err("unterminated template literal"));
            };
            match c {
                '{' => {
                    depth += 1;
                    self.pos += 1;
                }
                '}' => {
                    depth -= 1;
                    self.pos += 1;
                }
                '"' | '\'' => {
                    self.lex_string(c)?;
                }
                '`' => {
                    self.lex_template()?;
                }
                _ => self.pos += 1,
            }
        }
        Ok(())
    }

    fn lex_regex(&mut self) -> Result<(), Error> {
        self.pos += 1;
        let mut in_class = false;
        loop {
            let Some(c) = self.peek() else {
                return Err(err("unterminated regular expression"));
            };
            match c {
                '\n' | '\r' => return Err(err("unterminated regular expression")),
                '\\' => self.pos += 2,
                '[' => {
                    in_class = true;
                    self.pos += 1;
                }
                ']' => {
                    in_class = false;
                    self.pos += 1;
                }
                '/' if !in_class => {
                    self.pos += 1;
                    // flags
                    while self.peek().is_some_and(is_ident_continue) {
                        self.pos += 1;
                    }
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_op_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '=' | '<' | '>' | '!' | '&' | '|' | '^' | '~' | '%' | '?' | '.'
    )
}

/// Whether a `/` following `prev` starts a regex literal rather than a
/// division. The usual heuristic: regex after operators, openers, and
/// expression-introducing keywords.
fn regex_allowed(prev: Option<&Token>) -> bool {
    match prev {
        None => true,
        Some(Token::Op(_)) => true,
        Some(
            Token::LBrace
            | Token::LParen
            | Token::LBracket
            | Token::Comma
            | Token::Semi
            | Token::Colon,
        ) => true,
        Some(Token::Ident(name)) => is_expression_keyword(name),
        _ => false,
    }
}

fn is_expression_keyword(name: &str) -> bool {
    matches!(
        name,
        "return"
            | "case"
            | "typeof"
            | "new"
            | "in"
            | "of"
            | "do"
            | "else"
            | "void"
            | "delete"
            | "instanceof"
            | "yield"
            | "throw"
    )
}

/// Whether a `{` following `prev` opens an object literal rather than a
/// statement block.
fn object_literal_position(prev: Option<&Token>) -> bool {
    match prev {
        None => false,
        Some(Token::Op(op)) => !matches!(op.as_str(), "=>" | "++" | "--"),
        Some(Token::LParen | Token::LBracket | Token::Comma | Token::Colon) => true,
        Some(Token::Ident(name)) => is_expression_keyword(name),
        _ => false,
    }
}

#[derive(Debug)]
enum Frame {
    Block,
    Paren,
    Bracket,
    Object { expect_key: bool },
}

fn property_key(token: &Token) -> Option<String> {
    match token {
        Token::Str(text) => Some(text.clone()),
        Token::Ident(name) => Some(name.clone()),
        _ => None,
    }
}

fn clear_expect_key(stack: &mut [Frame]) {
    if let Some(Frame::Object { expect_key }) = stack.last_mut() {
        *expect_key = false;
    }
}

/// One pass over the token stream, tracking bracket nesting. Whenever the
/// innermost frame is an object literal and the scan is at a property-key
/// position, a `string-or-identifier key : string literal` sequence whose
/// value is immediately terminated by `,` or `}` is recorded as a pair.
fn extract_pairs(tokens: &[Token]) -> Result<Vec<(String, String)>, Error> {
    let mut pairs = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let prev = if i == 0 { None } else { Some(&tokens[i - 1]) };
        match &tokens[i] {
            Token::LBrace => {
                let frame = if object_literal_position(prev) {
                    Frame::Object { expect_key: true }
                } else {
                    Frame::Block
                };
                stack.push(frame);
            }
            Token::RBrace => {
                if !matches!(stack.pop(), Some(Frame::Object { .. } | Frame::Block)) {
                    return Err(err("unbalanced braces"));
                }
            }
            Token::LParen => {
                clear_expect_key(&mut stack);
                stack.push(Frame::Paren);
            }
            Token::RParen => {
                if !matches!(stack.pop(), Some(Frame::Paren)) {
                    return Err(err("unbalanced parentheses"));
                }
            }
            Token::LBracket => {
                clear_expect_key(&mut stack);
                stack.push(Frame::Bracket);
            }
            Token::RBracket => {
                if !matches!(stack.pop(), Some(Frame::Bracket)) {
                    return Err(err("unbalanced brackets"));
                }
            }
            Token::Comma => {
                if let Some(Frame::Object { expect_key }) = stack.last_mut() {
                    *expect_key = true;
                }
            }
            token => {
                if let Some(Frame::Object { expect_key: true }) = stack.last() {
                    if let Some(key) = property_key(token) {
                        if matches!(tokens.get(i + 1), Some(Token::Colon)) {
                            clear_expect_key(&mut stack);
                            if let (Some(Token::Str(value)), Some(Token::Comma | Token::RBrace)) =
                                (tokens.get(i + 2), tokens.get(i + 3))
                            {
                                pairs.push((key, value.clone()));
                                i += 3;
                                continue;
                            }
                            // key with a non-literal value: skip past the
                            // colon so the value is scanned normally
                            i += 2;
                            continue;
                        }
                    }
                    clear_expect_key(&mut stack);
                }
            }
        }
        i += 1;
    }
    if !stack.is_empty() {
        return Err(err("unbalanced brackets at end of input"));
    }
    Ok(pairs)
}
