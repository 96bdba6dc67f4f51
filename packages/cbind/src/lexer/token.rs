use crate::position::Position;

/// The kind of a single lexical token. Whitespace, newlines and comments are kept as
/// first-class kinds (not discarded) so the parser can attach comments to adjacent
/// declarations and so raw passthrough text can be reconstructed faithfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    IntegerLiteral,
    FloatingLiteral,
    CharacterLiteral,
    StringLiteral,
    /// Each distinct punctuator (or punctuator pair, e.g. `::`, `->`, `<<`) is its own
    /// token kind rather than a single generic "punctuator" bucket, so the parser can
    /// match on it directly.
    Punctuator,
    /// From `#` through end-of-line, preserving interior spacing verbatim.
    PreprocessorDirective,
    LineComment,
    BlockComment,
    Whitespace,
    Newline,
    Eof,
}

/// A single lexical token: its kind, the literal source text it came from, and the
/// position its first character was found at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}
impl Token {
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::LineComment | TokenKind::BlockComment
        )
    }
}
