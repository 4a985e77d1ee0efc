//! Streaming tokenizer for the C++ subset used by reference models.
//!
//! The reference implementations only ever contain comments, preprocessor
//! lines, top-level variable declarations, and a single function definition
//! with an arithmetic body. The lexer tolerates arbitrary operators inside
//! bodies since the body text is carried through verbatim.

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
    /// Byte offset of the first character in the source. Needed to extract
    /// verbatim body spans.
    pub offset: usize,
}

impl Token {
    /// Byte offset one past the last character of the token.
    pub fn end_offset(&self) -> usize {
        self.offset + self.lexeme.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Number,
    String,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Equals,
    /// Any other single-character operator (`*`, `%`, `+`, `>`, ...).
    Punct,
    Eof,
}

pub struct Lexer<'src> {
    src: &'src str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    /// Tokenizes the remaining input, excluding the trailing EOF token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, String> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token.kind == TokenKind::Eof {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }

    pub fn next_token(&mut self) -> Result<Token, String> {
        self.skip_trivia()?;
        let Some(ch) = self.peek() else {
            return Ok(self.token_here(TokenKind::Eof, String::new()));
        };

        if ch.is_ascii_alphabetic() || ch == '_' {
            let lexeme = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
            return Ok(self.token_at(TokenKind::Identifier, lexeme));
        }
        if ch.is_ascii_digit() {
            let lexeme = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
            return Ok(self.token_at(TokenKind::Number, lexeme));
        }
        if ch == '"' || ch == '\'' {
            return self.string_literal(ch);
        }

        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '=' => TokenKind::Equals,
            _ => TokenKind::Punct,
        };
        let start = self.pos;
        let start_column = self.column;
        self.advance(ch);
        Ok(Token {
            kind,
            lexeme: ch.to_string(),
            line: self.line,
            column: start_column,
            offset: start,
        })
    }

    fn skip_trivia(&mut self) -> Result<(), String> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance(c);
                }
                Some('#') => {
                    // Preprocessor line; the subset never uses continuations.
                    self.take_while(|c| c != '\n');
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    self.take_while(|c| c != '\n');
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let start_line = self.line;
                    self.advance('/');
                    self.advance('*');
                    loop {
                        match self.peek() {
                            Some('*') if self.peek_at(1) == Some('/') => {
                                self.advance('*');
                                self.advance('/');
                                break;
                            }
                            Some(c) => self.advance(c),
                            None => {
                                return Err(format!(
                                    "unterminated block comment starting at line {start_line}"
                                ));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn string_literal(&mut self, quote: char) -> Result<Token, String> {
        let start = self.pos;
        let start_line = self.line;
        let start_column = self.column;
        self.advance(quote);
        loop {
            match self.peek() {
                Some('\\') => {
                    self.advance('\\');
                    if let Some(c) = self.peek() {
                        self.advance(c);
                    }
                }
                Some(c) if c == quote => {
                    self.advance(c);
                    return Ok(Token {
                        kind: TokenKind::String,
                        lexeme: self.src[start..self.pos].to_string(),
                        line: start_line,
                        column: start_column,
                        offset: start,
                    });
                }
                Some(c) => self.advance(c),
                None => {
                    return Err(format!(
                        "unterminated literal starting at line {start_line}"
                    ));
                }
            }
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance(c);
        }
        self.src[start..self.pos].to_string()
    }

    fn token_at(&self, kind: TokenKind, lexeme: String) -> Token {
        Token {
            kind,
            line: self.line,
            column: self.column - lexeme.chars().count(),
            offset: self.pos - lexeme.len(),
            lexeme,
        }
    }

    fn token_here(&self, kind: TokenKind, lexeme: String) -> Token {
        Token {
            kind,
            lexeme,
            line: self.line,
            column: self.column,
            offset: self.pos,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_at(&self, nth: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(nth)
    }

    fn advance(&mut self, c: char) {
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}
