use crate::config::toml_config::RefsConfig;
use crate::core::markdown::{self, LineEdit};
use crate::domain::model::Rewrite;
use crate::domain::ports::Rewriter;
use crate::utils::error::Result;
use regex::Regex;
use std::path::Path;

/// Turns "SPEC §5" / "TECH-SPEC §7.1" style mentions into anchored links:
///
/// ```text
/// SPEC §5         -> [SPEC §5](/SPEC#5)
/// TECH-SPEC §7.1  -> [TECH-SPEC §7.1](/TECH-SPEC#7.1)
/// ```
///
/// Unlike chapter links these are applied in headings as well.
#[derive(Debug, Clone)]
pub struct RefLinkifier {
    pattern: Regex,
    base: String,
}

impl RefLinkifier {
    pub fn new(config: &RefsConfig) -> Result<Self> {
        let mut documents: Vec<&str> = config.documents.iter().map(String::as_str).collect();
        documents.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        documents.dedup();

        let alternatives = documents
            .iter()
            .map(|doc| regex::escape(doc))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(
            r"\b({})\s*§\s*([0-9]+(?:\.[0-9]+)*)\b",
            alternatives
        ))?;

        Ok(Self {
            pattern,
            base: config.base.clone(),
        })
    }

    pub fn target(&self, document: &str, section: &str) -> String {
        format!("{}{}#{}", self.base, document, section)
    }

    pub fn linkify_line<'a>(&self, line: &'a str) -> LineEdit<'a> {
        markdown::replace_unprotected(&self.pattern, line, |caps| {
            let document = caps.get(1)?.as_str();
            let section = caps.get(2)?.as_str();
            Some(format!(
                "[{} §{}]({})",
                document,
                section,
                self.target(document, section)
            ))
        })
    }

    pub fn linkify(&self, text: &str) -> Rewrite {
        let (output, edits) = markdown::map_prose_lines(text, |line| self.linkify_line(line));
        Rewrite { output, edits }
    }
}

impl Rewriter for RefLinkifier {
    fn name(&self) -> &'static str {
        "refs"
    }

    fn extension(&self) -> &'static str {
        "md"
    }

    fn rewrite(&self, _path: &Path, text: &str) -> Result<Rewrite> {
        Ok(self.linkify(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linkifier() -> RefLinkifier {
        RefLinkifier::new(&RefsConfig::default()).unwrap()
    }

    fn linkify(text: &str) -> String {
        linkifier().linkify(text).output
    }

    #[test]
    fn test_section_links_for_both_documents() {
        assert_eq!(linkify("See SPEC §5."), "See [SPEC §5](/SPEC#5).");
        assert_eq!(
            linkify("See TECH-SPEC §7.1 for details"),
            "See [TECH-SPEC §7.1](/TECH-SPEC#7.1) for details"
        );
    }

    #[test]
    fn test_whitespace_around_section_sign_is_normalised() {
        assert_eq!(linkify("SPEC§2 and SPEC  §  3.4.5"), "[SPEC §2](/SPEC#2) and [SPEC §3.4.5](/SPEC#3.4.5)");
    }

    #[test]
    fn test_headings_are_linkified() {
        assert_eq!(
            linkify("## Notes on SPEC §9\n"),
            "## Notes on [SPEC §9](/SPEC#9)\n"
        );
    }

    #[test]
    fn test_non_matches() {
        let text = "SPECS §1, SPEC 5, MYSPEC §2, SPEC §\n";
        assert_eq!(linkify(text), text);
    }

    #[test]
    fn test_fenced_code_untouched() {
        let text = "SPEC §1\n```md\nSPEC §2\n```\nTECH-SPEC §3\n";
        assert_eq!(
            linkify(text),
            "[SPEC §1](/SPEC#1)\n```md\nSPEC §2\n```\n[TECH-SPEC §3](/TECH-SPEC#3)\n"
        );
    }

    #[test]
    fn test_existing_links_untouched_and_idempotent() {
        let text = "Per SPEC §5 and TECH-SPEC §7.1, also `SPEC §8`.\n";
        let once = linkify(text);
        assert_eq!(
            once,
            "Per [SPEC §5](/SPEC#5) and [TECH-SPEC §7.1](/TECH-SPEC#7.1), also `SPEC §8`.\n"
        );
        let second = linkifier().linkify(&once);
        assert_eq!(second.output, once);
        assert_eq!(second.edits, 0);
    }

    #[test]
    fn test_multi_backtick_code_spans_untouched() {
        let text = "Write ``SPEC §5`` or ``TECH-SPEC §7.1 uses ` quotes``.\n";
        assert_eq!(linkify(text), text);
    }

    #[test]
    fn test_nested_and_shortcut_link_text_untouched() {
        let text = "[see [notes] SPEC §5](x.md) and [TECH-SPEC §7.1] apply, SPEC §2 too\n";
        assert_eq!(
            linkify(text),
            "[see [notes] SPEC §5](x.md) and [TECH-SPEC §7.1] apply, [SPEC §2](/SPEC#2) too\n"
        );
    }

    #[test]
    fn test_custom_base_and_documents() {
        let config = RefsConfig {
            base: "/gatos/".to_string(),
            documents: vec!["RFC".to_string(), "RFC-X".to_string()],
            ..RefsConfig::default()
        };
        let linkifier = RefLinkifier::new(&config).unwrap();
        assert_eq!(
            linkifier.linkify("RFC-X §2 and RFC §1").output,
            "[RFC-X §2](/gatos/RFC-X#2) and [RFC §1](/gatos/RFC#1)"
        );
    }
}
