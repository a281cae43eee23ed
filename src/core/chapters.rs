use crate::config::toml_config::ChaptersConfig;
use crate::core::markdown::{self, LineEdit};
use crate::domain::model::Rewrite;
use crate::domain::ports::Rewriter;
use crate::utils::error::Result;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static CHAPTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[Cc]hapter\s+([1-9][0-9]*)\b").expect("valid chapter regex"));

/// Turns bare "Chapter N" mentions into links to per-chapter files, e.g.
/// `see Chapter 3.` becomes `see [Chapter 3](./CHAPTER-003.md).`
///
/// Headings, fenced code, existing links and inline code are left alone.
#[derive(Debug, Clone)]
pub struct ChapterLinkifier {
    max_chapter: u32,
    link_prefix: String,
    file_prefix: String,
    number_width: usize,
}

impl ChapterLinkifier {
    pub fn new(config: &ChaptersConfig) -> Self {
        Self {
            max_chapter: config.max_chapter,
            link_prefix: config.link_prefix.clone(),
            file_prefix: config.file_prefix.clone(),
            number_width: config.number_width,
        }
    }

    pub fn chapter_file(&self, number: u32) -> String {
        format!(
            "{}{:0width$}.md",
            self.file_prefix,
            number,
            width = self.number_width
        )
    }

    pub fn linkify_line<'a>(&self, line: &'a str) -> LineEdit<'a> {
        if markdown::is_heading(line) {
            return LineEdit::unchanged(line);
        }

        markdown::replace_unprotected(&CHAPTER_RE, line, |caps| {
            let number: u32 = caps.get(1)?.as_str().parse().ok()?;
            if number > self.max_chapter {
                return None;
            }
            Some(format!(
                "[Chapter {}]({}{})",
                number,
                self.link_prefix,
                self.chapter_file(number)
            ))
        })
    }

    pub fn linkify(&self, text: &str) -> Rewrite {
        let (output, edits) = markdown::map_prose_lines(text, |line| self.linkify_line(line));
        Rewrite { output, edits }
    }
}

impl Default for ChapterLinkifier {
    fn default() -> Self {
        Self::new(&ChaptersConfig::default())
    }
}

impl Rewriter for ChapterLinkifier {
    fn name(&self) -> &'static str {
        "chapters"
    }

    fn extension(&self) -> &'static str {
        "md"
    }

    fn rewrite(&self, _path: &Path, text: &str) -> Result<Rewrite> {
        Ok(self.linkify(text))
    }
}
