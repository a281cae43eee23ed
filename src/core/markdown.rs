//! Line-level Markdown scanning shared by the linkifiers.
//!
//! Only two structures matter here: fenced code blocks, which are passed
//! through untouched, and protected spans (links and inline code) inside a
//! prose line, which no linkifier may rewrite.
//!
//! A code span opened by N backticks closes only at the next run of exactly
//! N, and link text may nest brackets, so spans come from a byte scanner.

use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;

const FENCE: &str = "```";

/// Outcome of rewriting a single prose line.
pub struct LineEdit<'a> {
    pub text: Cow<'a, str>,
    pub edits: usize,
}

impl<'a> LineEdit<'a> {
    pub fn unchanged(line: &'a str) -> Self {
        Self {
            text: Cow::Borrowed(line),
            edits: 0,
        }
    }
}

/// Splits `text` into lines, each keeping its terminator.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
}

pub fn is_fence_delimiter(line: &str) -> bool {
    line.trim_start().starts_with(FENCE)
}

pub fn is_heading(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Applies `f` to every line outside fenced code blocks and reassembles the
/// document. Returns the new text and the summed edit count.
pub fn map_prose_lines<'a, F>(text: &'a str, mut f: F) -> (String, usize)
where
    F: FnMut(&'a str) -> LineEdit<'a>,
{
    let mut out = String::with_capacity(text.len());
    let mut in_code = false;
    let mut edits = 0;

    for line in split_lines(text) {
        if is_fence_delimiter(line) {
            in_code = !in_code;
            out.push_str(line);
            continue;
        }
        if in_code {
            out.push_str(line);
            continue;
        }
        let edit = f(line);
        edits += edit.edits;
        out.push_str(&edit.text);
    }

    (out, edits)
}

/// Byte ranges of `line` covered by links or code spans.
///
/// A balanced bracketed run is protected together with a directly following
/// `(destination)` or `[label]`, which covers inline links, images, full and
/// collapsed reference links, and shortcut references like `[Chapter 3]`.
/// Backtick runs without a closing run of the same length are literal text.
pub fn protected_spans(line: &str) -> Vec<Range<usize>> {
    let bytes = line.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => match code_span_end(bytes, i) {
                Some(end) => {
                    spans.push(i..end);
                    i = end;
                }
                None => i += run_length(bytes, i, b'`'),
            },
            b'[' => match bracketed_end(bytes, i) {
                Some(end) => {
                    let start = if i > 0 && bytes[i - 1] == b'!' { i - 1 } else { i };
                    spans.push(start..end);
                    i = end;
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }

    spans
}

fn run_length(bytes: &[u8], start: usize, byte: u8) -> usize {
    bytes[start..].iter().take_while(|&&b| b == byte).count()
}

/// End of the code span whose opening backtick run starts at `start`.
fn code_span_end(bytes: &[u8], start: usize) -> Option<usize> {
    let open = run_length(bytes, start, b'`');
    let mut i = start + open;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = run_length(bytes, i, b'`');
            if run == open {
                return Some(i + run);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

/// Index just past the delimiter that closes the `open` byte at `start`.
/// Nested pairs, escapes and code spans are stepped over.
fn matching_close(bytes: &[u8], start: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'`' => {
                i = code_span_end(bytes, i).unwrap_or(i + run_length(bytes, i, b'`'));
                continue;
            }
            b if b == open => depth += 1,
            b if b == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// End of the bracketed run at `start`, including a trailing `(...)` or `[...]`.
fn bracketed_end(bytes: &[u8], start: usize) -> Option<usize> {
    let text_end = matching_close(bytes, start, b'[', b']')?;
    let tail_end = match bytes.get(text_end) {
        Some(b'(') => matching_close(bytes, text_end, b'(', b')'),
        Some(b'[') => matching_close(bytes, text_end, b'[', b']'),
        _ => None,
    };
    Some(tail_end.unwrap_or(text_end))
}

pub fn is_protected(spans: &[Range<usize>], offset: usize) -> bool {
    spans.iter().any(|span| span.contains(&offset))
}

/// Replaces every match of `re` in `line` that does not start inside a
/// protected span. `replacement` may decline a match by returning `None`.
pub fn replace_unprotected<'a, F>(re: &Regex, line: &'a str, mut replacement: F) -> LineEdit<'a>
where
    F: FnMut(&regex::Captures<'_>) -> Option<String>,
{
    if !re.is_match(line) {
        return LineEdit::unchanged(line);
    }

    let spans = protected_spans(line);
    let mut edits = 0;
    let text = re.replace_all(line, |caps: &regex::Captures<'_>| {
        let whole = caps.get(0).map(|m| (m.start(), m.as_str()));
        let Some((start, original)) = whole else {
            return String::new();
        };
        if is_protected(&spans, start) {
            return original.to_string();
        }
        match replacement(caps) {
            Some(linked) => {
                edits += 1;
                linked
            }
            None => original.to_string(),
        }
    });

    if edits == 0 {
        LineEdit::unchanged(line)
    } else {
        LineEdit { text, edits }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_keeps_terminators() {
        let lines: Vec<_> = split_lines("a\r\nb\nc").collect();
        assert_eq!(lines, vec!["a\r\n", "b\n", "c"]);
    }

    #[test]
    fn test_map_prose_lines_skips_fences() {
        let text = "one\n```rust\ntwo\n```\nthree\n";
        let mut seen = Vec::new();
        let (out, edits) = map_prose_lines(text, |line| {
            seen.push(line.trim_end().to_string());
            LineEdit {
                text: Cow::Owned(line.to_uppercase()),
                edits: 1,
            }
        });
        assert_eq!(seen, vec!["one", "three"]);
        assert_eq!(out, "ONE\n```rust\ntwo\n```\nTHREE\n");
        assert_eq!(edits, 2);
    }

    #[test]
    fn test_unterminated_fence_protects_rest() {
        let text = "a\n  ```\nb\nc\n";
        let (out, edits) = map_prose_lines(text, |line| LineEdit {
            text: Cow::Owned(format!("x{line}")),
            edits: 1,
        });
        assert_eq!(out, "xa\n  ```\nb\nc\n");
        assert_eq!(edits, 1);
    }

    #[test]
    fn test_protected_spans() {
        let line = "see [Chapter 1](./CHAPTER-001.md), `Chapter 2` and [x][ref] Chapter 3";
        let spans = protected_spans(line);
        assert_eq!(spans.len(), 3);
        assert!(is_protected(&spans, line.find("Chapter 1").unwrap()));
        assert!(is_protected(&spans, line.find("Chapter 2").unwrap()));
        assert!(!is_protected(&spans, line.find("Chapter 3").unwrap()));
    }

    #[test]
    fn test_code_spans_match_backtick_run_length() {
        let line = "``a ` b`` then `c` and ```d`` e``` f";
        let spans = protected_spans(line);
        assert_eq!(
            spans,
            vec![0..9, 15..18, line.find("```d").unwrap()..line.find(" f").unwrap()]
        );
    }

    #[test]
    fn test_unclosed_backticks_are_literal() {
        let line = "a `` b ` c";
        assert!(protected_spans(line).is_empty());
    }

    #[test]
    fn test_nested_brackets_and_shortcut_references() {
        let line = "[a [b] Chapter 1](x) [Chapter 2] ![img [1]](p.png) [Chapter 3][] Chapter 4";
        let spans = protected_spans(line);
        assert_eq!(spans.len(), 4);
        for n in 1..=3 {
            assert!(is_protected(&spans, line.find(&format!("Chapter {n}")).unwrap()));
        }
        assert!(!is_protected(&spans, line.find("Chapter 4").unwrap()));
        assert_eq!(spans[2].start, line.find("![img").unwrap());
    }

    #[test]
    fn test_unbalanced_bracket_protects_nothing() {
        let line = "see [Chapter 1 and `x]` (Chapter 2)";
        let spans = protected_spans(line);
        assert_eq!(spans.len(), 1);
        assert!(!is_protected(&spans, line.find("Chapter 1").unwrap()));
    }

    #[test]
    fn test_escaped_brackets_are_plain_text() {
        let line = r"\[Chapter 1\] and \`Chapter 2\`";
        assert!(protected_spans(line).is_empty());
    }

    #[test]
    fn test_is_heading() {
        assert!(is_heading("# Title\n"));
        assert!(is_heading("   ## Sub"));
        assert!(!is_heading("Not # a heading"));
    }
}
