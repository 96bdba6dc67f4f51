mod token;

pub use token::{Token, TokenKind};

use crate::error::LexError;
use crate::position::Position;

/// Turns source text into a flat list of tokens. The header grammar backtracks a lot
/// (a declaration's shape is often only clear several tokens in) so the lexer commits
/// fully up front rather than being driven lazily by the parser.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    lexer.run()
}

struct Lexer<'a> {
    chars: Vec<char>,
    source: &'a str,
    idx: usize,
    pos: Position,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().collect(),
            source,
            idx: 0,
            pos: Position::start(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.idx + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.idx += 1;
        self.pos.advance(c);
        Some(c)
    }

    fn run(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let start = self.pos;
            let Some(c) = self.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    position: start,
                });
                break;
            };
            let token = if c == '\n' {
                self.bump();
                Token { kind: TokenKind::Newline, text: "\n".to_string(), position: start }
            } else if c.is_whitespace() {
                self.lex_whitespace(start)
            } else if c == '#' && self.at_line_start() {
                self.lex_preprocessor(start)
            } else if c == '/' && self.peek_at(1) == Some('/') {
                self.lex_line_comment(start)
            } else if c == '/' && self.peek_at(1) == Some('*') {
                self.lex_block_comment(start)?
            } else if c == '"' {
                self.lex_string_literal(start)?
            } else if c == '\'' {
                self.lex_char_literal(start)?
            } else if c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit())) {
                self.lex_number(start)
            } else if is_ident_start(c) {
                self.lex_identifier(start)
            } else {
                self.lex_punctuator(start)?
            };
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Whether only whitespace precedes us on the current line, i.e. a `#` here starts
    /// a preprocessor directive rather than appearing mid-expression.
    fn at_line_start(&self) -> bool {
        let mut i = self.idx;
        while i > 0 {
            i -= 1;
            match self.chars[i] {
                ' ' | '\t' | '\r' => continue,
                '\n' => return true,
                _ => return false,
            }
        }
        true
    }

    fn lex_whitespace(&mut self, start: Position) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' || !c.is_whitespace() {
                break;
            }
            text.push(c);
            self.bump();
        }
        Token { kind: TokenKind::Whitespace, text, position: start }
    }

    fn lex_preprocessor(&mut self, start: Position) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            if c == '\\' && self.peek_at(1) == Some('\n') {
                text.push(c);
                self.bump();
                text.push('\n');
                self.bump();
                continue;
            }
            text.push(c);
            self.bump();
        }
        Token { kind: TokenKind::PreprocessorDirective, text, position: start }
    }

    fn lex_line_comment(&mut self, start: Position) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.bump();
        }
        Token { kind: TokenKind::LineComment, text, position: start }
    }

    fn lex_block_comment(&mut self, start: Position) -> Result<Token, LexError> {
        let mut text = String::new();
        text.push(self.bump().unwrap());
        text.push(self.bump().unwrap());
        loop {
            match self.peek() {
                None => return Err(LexError::UnterminatedComment { offset: start.offset }),
                Some('*') if self.peek_at(1) == Some('/') => {
                    text.push(self.bump().unwrap());
                    text.push(self.bump().unwrap());
                    break;
                }
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
            }
        }
        Ok(Token { kind: TokenKind::BlockComment, text, position: start })
    }

    fn lex_string_literal(&mut self, start: Position) -> Result<Token, LexError> {
        let mut text = String::new();
        text.push(self.bump().unwrap());
        loop {
            match self.peek() {
                None | Some('\n') => return Err(LexError::UnterminatedLiteral { offset: start.offset }),
                Some('\\') => {
                    text.push(self.bump().unwrap());
                    if let Some(escaped) = self.bump() {
                        text.push(escaped);
                    }
                }
                Some('"') => {
                    text.push(self.bump().unwrap());
                    break;
                }
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
            }
        }
        Ok(Token { kind: TokenKind::StringLiteral, text, position: start })
    }

    fn lex_char_literal(&mut self, start: Position) -> Result<Token, LexError> {
        let mut text = String::new();
        text.push(self.bump().unwrap());
        loop {
            match self.peek() {
                None | Some('\n') => return Err(LexError::UnterminatedLiteral { offset: start.offset }),
                Some('\\') => {
                    text.push(self.bump().unwrap());
                    if let Some(escaped) = self.bump() {
                        text.push(escaped);
                    }
                }
                Some('\'') => {
                    text.push(self.bump().unwrap());
                    break;
                }
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
            }
        }
        Ok(Token { kind: TokenKind::CharacterLiteral, text, position: start })
    }

    fn lex_number(&mut self, start: Position) -> Token {
        let mut text = String::new();
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                text.push(c);
                self.bump();
            } else if c == '.' && !is_float {
                is_float = true;
                text.push(c);
                self.bump();
            } else if (c == '+' || c == '-') && matches!(text.chars().last(), Some('e') | Some('E')) {
                is_float = true;
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let kind = if is_float { TokenKind::FloatingLiteral } else { TokenKind::IntegerLiteral };
        Token { kind, text, position: start }
    }

    fn lex_identifier(&mut self, start: Position) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Token { kind: TokenKind::Identifier, text, position: start }
    }

    /// The multi-character punctuators the grammar actually needs to tell apart from
    /// their single-character prefixes (`::`, `->`, `<<`, `>>`, `...`, `==`, `!=`,
    /// `<=`, `>=`, `&&`, `||`, `+=`, `-=`).
    const MULTI_CHAR_PUNCTUATORS: &'static [&'static str] =
        &["...", "::", "->", "<<", ">>", "==", "!=", "<=", ">=", "&&", "||", "+=", "-="];

    fn lex_punctuator(&mut self, start: Position) -> Result<Token, LexError> {
        for candidate in Self::MULTI_CHAR_PUNCTUATORS {
            if self.matches_ahead(candidate) {
                for _ in 0..candidate.chars().count() {
                    self.bump();
                }
                return Ok(Token { kind: TokenKind::Punctuator, text: candidate.to_string(), position: start });
            }
        }
        match self.bump() {
            Some(c) if c.is_ascii_graphic() => {
                Ok(Token { kind: TokenKind::Punctuator, text: c.to_string(), position: start })
            }
            Some(c) => Err(LexError::UnexpectedCharacter { offset: start.offset, found: c }),
            None => unreachable!("lex_punctuator called at end of input"),
        }
    }

    fn matches_ahead(&self, candidate: &str) -> bool {
        candidate
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// A read-only cursor over a token list that lets the parser look ahead, backtrack to
/// a checkpoint when a speculative parse fails, and skip trivia on demand. Mirrors how
/// the lexed form of an Org document is handed to `parser.rs` as a simple slice there
/// is no need to reinvent per-parser-call.
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Returns the `k`-th non-trivia token from the current position (0 = next token).
    pub fn peek(&self, k: usize) -> &'a Token {
        let mut seen = 0;
        let mut i = self.pos;
        loop {
            let tok = &self.tokens[i.min(self.tokens.len() - 1)];
            if tok.kind == TokenKind::Eof {
                return tok;
            }
            if !tok.is_trivia() {
                if seen == k {
                    return tok;
                }
                seen += 1;
            }
            i += 1;
        }
    }

    pub fn bump(&mut self) -> &'a Token {
        loop {
            let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
            if tok.kind == TokenKind::Eof {
                return tok;
            }
            self.pos = (self.pos + 1).min(self.tokens.len() - 1);
            if !tok.is_trivia() {
                return tok;
            }
        }
    }

    /// Collects and returns every trivia token (whitespace, newlines, comments) lying
    /// strictly between the current position and the next significant token, without
    /// consuming the significant token itself. Used by the parser's comment-attachment
    /// pass to find leading/trailing comment text.
    pub fn take_trivia(&mut self) -> Vec<&'a Token> {
        let mut out = Vec::new();
        while self.pos < self.tokens.len() {
            let tok = &self.tokens[self.pos];
            if tok.is_trivia() {
                out.push(tok);
                self.pos += 1;
            } else {
                break;
            }
        }
        out
    }

    pub fn checkpoint(&self) -> usize {
        self.pos
    }

    pub fn rewind(&mut self, checkpoint: usize) {
        self.pos = checkpoint;
    }

    pub fn position(&self) -> Position {
        self.tokens[self.pos.min(self.tokens.len() - 1)].position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_a_simple_function_declaration() {
        let tokens = tokenize("IMGUI_API void ImGui_Foo(int bar);\n").unwrap();
        let significant: Vec<_> = tokens.iter().filter(|t| !t.is_trivia() && t.kind != TokenKind::Eof).collect();
        assert_eq!(significant.len(), 8);
        assert_eq!(significant[0].kind, TokenKind::Identifier);
        assert_eq!(significant[0].text, "IMGUI_API");
        assert_eq!(significant.last().unwrap().text, ";");
    }

    #[test]
    fn recognizes_preprocessor_directives_only_at_line_start() {
        let tokens = tokenize("#define FOO 1\n").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::PreprocessorDirective);
    }

    #[test]
    fn lexes_double_colon_as_a_single_punctuator() {
        let tokens = tokenize("ImVector<int>::iterator").unwrap();
        let punct: Vec<_> = tokens.iter().filter(|t| t.kind == TokenKind::Punctuator).collect();
        assert!(punct.iter().any(|t| t.text == "::"));
    }

    #[test]
    fn rejects_unterminated_block_comments() {
        let err = tokenize("/* never closes").unwrap_err();
        assert!(matches!(err, LexError::UnterminatedComment { .. }));
    }

    #[test]
    fn cursor_peek_skips_trivia_without_consuming_it() {
        let tokens = tokenize("a   b").unwrap();
        let cur = TokenCursor::new(&tokens);
        assert_eq!(cur.peek(0).text, "a");
        assert_eq!(cur.peek(1).text, "b");
    }
}
