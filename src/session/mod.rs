//! Building blocks for REPL-transcript lexers.
//!
//!     Console transcripts interleave three kinds of text: prompts, the
//!     command being typed (possibly across several prompt-prefixed lines),
//!     and program output. The console lexers in `languages` segment a
//!     transcript line by line, run the command text through an ordinary
//!     lexer, and then splice the prompt tokens back into the command's
//!     token stream at the positions they came from. This module holds the
//!     two generic pieces of that dance: an offset-tracking line reader with
//!     one line of pushback, and the insertion merge.

use crate::token::Token;

/// Externally produced tokens to splice into a token stream at a recorded
/// offset of the stream's underlying text.
#[derive(Debug, Clone)]
pub struct InsertionSpan {
    /// Byte offset into the tokenized text where the insertion belongs.
    pub offset: usize,
    /// Tokens to insert; their own offsets are ignored.
    pub tokens: Vec<Token>,
}

/// Splice `insertions` into `tokens` at their recorded offsets.
///
/// Inserted tokens take up space: every output token carries a running
/// offset in the combined coordinate system, so the merged stream is again
/// contiguous and lossless over prompt-text-plus-command-text. A token
/// sitting across an insertion offset is split around the insertion.
/// Insertions must be ordered by offset, which is how the console adapters
/// record them.
pub fn merge_insertions(insertions: Vec<InsertionSpan>, tokens: Vec<Token>) -> Vec<Token> {
    debug_assert!(insertions.windows(2).all(|w| w[0].offset <= w[1].offset));

    let mut iter = insertions.into_iter();
    let mut current = iter.next();
    if current.is_none() {
        return tokens;
    }

    let mut out = Vec::new();
    let mut realpos: Option<usize> = None;
    for token in tokens {
        let start = token.offset;
        let text = token.text;
        let mut pos = *realpos.get_or_insert(start);
        let mut consumed = 0;

        while let Some(span) = current.take() {
            if span.offset > start + text.len() {
                current = Some(span);
                break;
            }
            let cut = span.offset - start;
            let before = &text[consumed..cut];
            if !before.is_empty() {
                out.push(Token::new(pos, token.kind, before));
                pos += before.len();
            }
            for inserted in span.tokens {
                let len = inserted.text.len();
                out.push(Token::new(pos, inserted.kind, inserted.text));
                pos += len;
            }
            consumed = cut;
            current = iter.next();
        }

        if consumed < text.len() {
            let rest = &text[consumed..];
            out.push(Token::new(pos, token.kind, rest));
            pos += rest.len();
        }
        realpos = Some(pos);
    }

    // insertions past the last token
    let mut pos = realpos.unwrap_or(0);
    while let Some(span) = current.take() {
        for inserted in span.tokens {
            let len = inserted.text.len();
            out.push(Token::new(pos, inserted.kind, inserted.text));
            pos += len;
        }
        current = iter.next();
    }
    out
}

/// Iterator over the lines of a transcript, each with its byte offset, with
/// room to push one line back.
///
/// Lines keep their trailing `\n`; a final line without one is still
/// yielded. Pushback is what lets the output scan "un-consume" the line on
/// which it spotted the next prompt.
#[derive(Debug)]
pub struct Lines<'a> {
    text: &'a str,
    pos: usize,
    pushed: Option<(usize, &'a str)>,
}

impl<'a> Lines<'a> {
    pub fn new(text: &'a str) -> Lines<'a> {
        Lines {
            text,
            pos: 0,
            pushed: None,
        }
    }

    /// Hand a line back; the next call to `next` returns it again.
    pub fn push_back(&mut self, start: usize, line: &'a str) {
        self.pushed = Some((start, line));
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<(usize, &'a str)> {
        if let Some(line) = self.pushed.take() {
            return Some(line);
        }
        if self.pos >= self.text.len() {
            return None;
        }
        let start = self.pos;
        let end = match self.text[start..].find('\n') {
            Some(i) => start + i + 1,
            None => self.text.len(),
        };
        self.pos = end;
        Some((start, &self.text[start..end]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind::*;

    fn token(offset: usize, kind: crate::token::TokenKind, text: &str) -> Token {
        Token::new(offset, kind, text)
    }

    fn dump(tokens: &[Token]) -> Vec<(usize, std::string::String)> {
        tokens.iter().map(|t| (t.offset, t.text.clone())).collect()
    }

    #[test]
    fn test_lines_keep_newlines_and_offsets() {
        let mut lines = Lines::new("a\nbb\nc");
        assert_eq!(lines.next(), Some((0, "a\n")));
        assert_eq!(lines.next(), Some((2, "bb\n")));
        assert_eq!(lines.next(), Some((5, "c")));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_lines_push_back() {
        let mut lines = Lines::new("a\nb\n");
        assert_eq!(lines.next(), Some((0, "a\n")));
        let (start, line) = lines.next().unwrap();
        lines.push_back(start, line);
        assert_eq!(lines.next(), Some((2, "b\n")));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_merge_without_insertions_is_identity() {
        let tokens = vec![token(0, Name, "ab"), token(2, Whitespace, " ")];
        assert_eq!(merge_insertions(vec![], tokens.clone()), tokens);
    }

    #[test]
    fn test_merge_inserts_at_front_and_shifts() {
        let merged = merge_insertions(
            vec![InsertionSpan {
                offset: 0,
                tokens: vec![token(0, GenericPrompt, "db=> ")],
            }],
            vec![token(0, Keyword, "SELECT"), token(6, Punctuation, ";")],
        );
        assert_eq!(
            dump(&merged),
            vec![
                (0, "db=> ".to_string()),
                (5, "SELECT".to_string()),
                (11, ";".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_splits_token_across_insertion() {
        let merged = merge_insertions(
            vec![InsertionSpan {
                offset: 2,
                tokens: vec![token(0, GenericPrompt, "**")],
            }],
            vec![token(0, Name, "abcd")],
        );
        assert_eq!(
            dump(&merged),
            vec![
                (0, "ab".to_string()),
                (2, "**".to_string()),
                (4, "cd".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_multiline_command_with_two_prompts() {
        // "db=> SELECT 1,\n db-> 2;\n" style: prompts recorded at the
        // lengths the command buffer had when each line arrived
        let merged = merge_insertions(
            vec![
                InsertionSpan {
                    offset: 0,
                    tokens: vec![token(0, GenericPrompt, "p1 ")],
                },
                InsertionSpan {
                    offset: 3,
                    tokens: vec![token(0, GenericPrompt, "p2 ")],
                },
            ],
            vec![token(0, Name, "ab\ncd")],
        );
        assert_eq!(
            dump(&merged),
            vec![
                (0, "p1 ".to_string()),
                (3, "ab\n".to_string()),
                (6, "p2 ".to_string()),
                (9, "cd".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_trailing_insertion_after_all_tokens() {
        let merged = merge_insertions(
            vec![InsertionSpan {
                offset: 1,
                tokens: vec![token(0, GenericPrompt, "p")],
            }],
            vec![token(0, Name, "a")],
        );
        assert_eq!(dump(&merged), vec![(0, "a".to_string()), (1, "p".to_string())]);
    }

    #[test]
    fn test_merge_with_no_tokens_emits_insertions_at_zero() {
        let merged = merge_insertions(
            vec![InsertionSpan {
                offset: 0,
                tokens: vec![token(0, GenericPrompt, "db=> ")],
            }],
            vec![],
        );
        assert_eq!(dump(&merged), vec![(0, "db=> ".to_string())]);
    }

    #[test]
    fn test_merged_stream_is_contiguous() {
        let merged = merge_insertions(
            vec![
                InsertionSpan {
                    offset: 0,
                    tokens: vec![token(0, GenericPrompt, ">> ")],
                },
                InsertionSpan {
                    offset: 4,
                    tokens: vec![token(0, GenericPrompt, ".. ")],
                },
            ],
            vec![
                token(0, Name, "ab"),
                token(2, Whitespace, "\n\n"),
                token(4, Name, "cd"),
            ],
        );
        let mut expected = merged[0].offset;
        for t in &merged {
            assert_eq!(t.offset, expected, "gap before {:?}", t);
            expected += t.text.len();
        }
    }
}
