use crate::dom::{Dom, NodeId, NodeKind};
use crate::lexer::{Token, TokenKind};

/// Turns a run of trivia tokens (whitespace, newlines, comments) collected between two
/// significant tokens into floating `Comment` and `BlankLines` nodes appended as the
/// last children of `parent`. Comments start out unattached (`is_attached_to: None`);
/// the `comments::attach_preceding` modifier later folds them into the declaration
/// that follows into a leading/trailing [`NodeCommon`](crate::dom::NodeCommon) entry
/// and removes the floating node.
pub fn harvest_trivia(dom: &mut Dom, parent: NodeId, trivia: &[&Token]) {
    let mut newline_run = 0u32;
    let mut saw_any_newline = false;
    for token in trivia {
        match token.kind {
            TokenKind::Newline => {
                newline_run += 1;
                saw_any_newline = true;
            }
            TokenKind::Whitespace => {}
            TokenKind::LineComment | TokenKind::BlockComment => {
                if newline_run >= 2 {
                    dom.append_child(parent, NodeKind::BlankLines { count: newline_run - 1 });
                }
                newline_run = 0;
                let text = strip_comment_delimiters(&token.kind, &token.text);
                // A comment reached before any newline in this trivia run sits on the
                // same line as whatever preceded it, so it is a trailing comment of
                // the previous declaration rather than a leading comment of the next.
                dom.append_child(
                    parent,
                    NodeKind::Comment { text, is_preceding: saw_any_newline, is_attached_to: None },
                );
                saw_any_newline = true;
            }
            _ => {}
        }
    }
    if newline_run >= 2 {
        dom.append_child(parent, NodeKind::BlankLines { count: newline_run - 1 });
    }
}

fn strip_comment_delimiters(kind: &TokenKind, text: &str) -> String {
    match kind {
        TokenKind::LineComment => text.trim_start_matches("//").trim().to_string(),
        TokenKind::BlockComment => text
            .trim_start_matches("/*")
            .trim_end_matches("*/")
            .trim()
            .to_string(),
        _ => text.to_string(),
    }
}
