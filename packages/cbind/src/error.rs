use crate::position::Position;
use thiserror::Error;

/// Errors that can occur while tokenizing source text.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("unexpected character '{found}' at byte offset {offset}")]
    UnexpectedCharacter { offset: usize, found: char },
    #[error("unterminated string or character literal starting at byte offset {offset}")]
    UnterminatedLiteral { offset: usize },
    #[error("unterminated block comment starting at byte offset {offset}")]
    UnterminatedComment { offset: usize },
}

/// Errors that can occur while parsing a token stream into a DOM.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{position}: unexpected token {found}, expected {expected}")]
    UnexpectedToken {
        position: Position,
        found: String,
        expected: String,
    },
    #[error("{position}: unbalanced braces (missing closing '}}')")]
    UnbalancedBraces { position: Position },
    #[error("{position}: unexpected end of file")]
    UnexpectedEof { position: Position },
    #[error("{position}: could not make sense of declaration shape starting here")]
    UnknownDeclarationShape { position: Position },
    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Errors reflecting a modifier's unmet precondition.
#[derive(Debug, Error)]
pub enum ModifierError {
    #[error("modifier '{modifier}': target '{target}' not found")]
    TargetNotFound { modifier: &'static str, target: String },
    #[error("modifier '{modifier}': ambiguous match for '{target}' ({count} candidates, expected exactly one)")]
    AmbiguousMatch {
        modifier: &'static str,
        target: String,
        count: usize,
    },
    #[error("modifier '{modifier}': template flattening did not converge after {iterations} iterations")]
    TemplateFlattenLimitExceeded {
        modifier: &'static str,
        iterations: u32,
    },
    #[error("modifier '{modifier}': {message}")]
    Invalid {
        modifier: &'static str,
        message: String,
    },
}

/// Errors that can occur while emitting one of the three output artifacts.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("could not resolve type '{name}' to a known declaration, built-in, or function pointer")]
    UnresolvedType { name: String },
    #[error("header file node has no destination filename set")]
    MissingDestFilename,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// The top-level error type for the whole parse -> modify -> emit pipeline.
#[derive(Debug, Error)]
pub enum BindgenError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Modifier(#[from] ModifierError),
    #[error(transparent)]
    Emit(#[from] EmitError),
    #[error("DOM invariant violated: {0}")]
    InvalidDom(String),
}
