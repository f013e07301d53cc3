// Copyright (c) 2025 - Cowboy AI, Inc.
//! Structural check for Mermaid markup
//!
//! Only block structure is checked: a leading `graph`/`flowchart` directive
//! and balanced `subgraph` / `end` pairs. Node and edge syntax is not parsed.
//!
//! An unclosed block is localized with indentation: an `end` at a shallower
//! indent than the innermost open `subgraph` cannot belong to it, so that
//! `subgraph` is the one missing its `end`. Without such a hint the outermost
//! block still open at the end of input is reported.

use thiserror::Error;

/// Block-structure errors, with 1-based line numbers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("line {line}: markup must start with a `graph` or `flowchart` directive")]
    MissingDirective { line: usize },

    #[error("line {line}: `end` without an open subgraph")]
    UnmatchedEnd { line: usize },

    #[error("line {opened_at}: subgraph is never closed")]
    UnclosedSubgraph {
        opened_at: usize,
        /// Line whose indentation exposed the missing `end`
        detected_at: Option<usize>,
    },
}

impl SyntaxError {
    /// Line the error points at
    pub fn line(&self) -> usize {
        match self {
            Self::MissingDirective { line } | Self::UnmatchedEnd { line } => *line,
            Self::UnclosedSubgraph { opened_at, .. } => *opened_at,
        }
    }

    /// Same error with every line number shifted down by `lines`
    pub fn offset(self, lines: usize) -> Self {
        match self {
            Self::MissingDirective { line } => Self::MissingDirective { line: line + lines },
            Self::UnmatchedEnd { line } => Self::UnmatchedEnd { line: line + lines },
            Self::UnclosedSubgraph {
                opened_at,
                detected_at,
            } => Self::UnclosedSubgraph {
                opened_at: opened_at + lines,
                detected_at: detected_at.map(|l| l + lines),
            },
        }
    }
}

/// What a successful check saw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkupSummary {
    pub subgraphs: usize,
    pub max_depth: usize,
}

struct OpenBlock {
    line: usize,
    indent: usize,
}

/// Check the block structure of Mermaid markup
pub fn validate_markup(markup: &str) -> Result<MarkupSummary, SyntaxError> {
    let mut lines = markup
        .lines()
        .enumerate()
        .map(|(i, text)| (i + 1, text))
        .filter(|(_, text)| {
            let trimmed = text.trim();
            !trimmed.is_empty() && !trimmed.starts_with("%%")
        });

    let Some((first_line, first)) = lines.next() else {
        return Err(SyntaxError::MissingDirective { line: 1 });
    };
    let directive = first.trim_start();
    if !(is_keyword(directive, "graph") || is_keyword(directive, "flowchart")) {
        return Err(SyntaxError::MissingDirective { line: first_line });
    }

    let mut open: Vec<OpenBlock> = Vec::new();
    let mut summary = MarkupSummary::default();

    for (line, text) in lines {
        let trimmed = text.trim();
        let indent = text.len() - text.trim_start().len();

        if is_keyword(trimmed, "subgraph") {
            open.push(OpenBlock { line, indent });
            summary.subgraphs += 1;
            summary.max_depth = summary.max_depth.max(open.len());
        } else if trimmed == "end" {
            let Some(innermost) = open.last() else {
                return Err(SyntaxError::UnmatchedEnd { line });
            };
            if indent < innermost.indent {
                return Err(SyntaxError::UnclosedSubgraph {
                    opened_at: innermost.line,
                    detected_at: Some(line),
                });
            }
            open.pop();
        }
    }

    match open.first() {
        Some(outermost) => Err(SyntaxError::UnclosedSubgraph {
            opened_at: outermost.line,
            detected_at: None,
        }),
        None => Ok(summary),
    }
}

/// Check raw markup, or the first ```` ```mermaid ```` block of a Markdown
/// document; line numbers always refer to `document`
pub fn validate_document(document: &str) -> Result<MarkupSummary, SyntaxError> {
    let lines: Vec<&str> = document.lines().collect();
    let Some(fence) = lines
        .iter()
        .position(|l| l.trim_start().starts_with("```mermaid"))
    else {
        return validate_markup(document);
    };
    let body: Vec<&str> = lines[fence + 1..]
        .iter()
        .take_while(|l| !l.trim_start().starts_with("```"))
        .copied()
        .collect();
    validate_markup(&body.join("\n")).map_err(|err| err.offset(fence + 1))
}

/// `text` starts with `keyword` as a whole word
fn is_keyword(text: &str, keyword: &str) -> bool {
    text.strip_prefix(keyword)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NESTED: &str = "graph TB
    subgraph region[\"Region\"]
        subgraph vpc[\"VPC\"]
            a[\"a\"]
        end
        subgraph other[\"Other\"]
            b[\"b\"]
        end
    end
    a --> b
";

    fn without_line(markup: &str, line: usize) -> String {
        markup
            .lines()
            .enumerate()
            .filter(|(i, _)| i + 1 != line)
            .map(|(_, l)| format!("{l}\n"))
            .collect()
    }

    #[test]
    fn test_balanced_markup() {
        let summary = validate_markup(NESTED).unwrap();
        assert_eq!(summary, MarkupSummary { subgraphs: 3, max_depth: 2 });
    }

    #[test]
    fn test_missing_directive() {
        assert_eq!(
            validate_markup("\n  a --> b\n"),
            Err(SyntaxError::MissingDirective { line: 2 })
        );
        assert_eq!(validate_markup(""), Err(SyntaxError::MissingDirective { line: 1 }));
        assert!(validate_markup("flowchart LR\n").is_ok());
        assert!(validate_markup("graphs TB\n").is_err());
    }

    #[test]
    fn test_init_directive_before_graph() {
        let markup = "%%{init: {'theme': 'dark'}}%%\n%% generated\ngraph TB\n    subgraph a\n    end\n";
        assert_eq!(validate_markup(markup).unwrap().subgraphs, 1);

        // Line numbers still count the skipped lines
        let err = validate_markup("%%{init: {}}%%\n  a --> b\n").unwrap_err();
        assert_eq!(err, SyntaxError::MissingDirective { line: 2 });
        assert_eq!(
            validate_markup("%% only a comment\n"),
            Err(SyntaxError::MissingDirective { line: 1 })
        );
    }

    #[test]
    fn test_unmatched_end() {
        let err = validate_markup("graph TB\n    a\n    end\n").unwrap_err();
        assert_eq!(err, SyntaxError::UnmatchedEnd { line: 3 });
    }

    #[test]
    fn test_missing_inner_end_reports_inner_subgraph() {
        // Drop the `end` closing "vpc" (line 5)
        let err = validate_markup(&without_line(NESTED, 5)).unwrap_err();
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn test_missing_outer_end_reports_outer_subgraph() {
        // Drop the `end` closing "region" (line 9)
        let err = validate_markup(&without_line(NESTED, 9)).unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnclosedSubgraph {
                opened_at: 2,
                detected_at: None
            }
        );
    }

    #[test]
    fn test_markdown_document_lines_are_absolute() {
        let doc = "# Title\n\n```mermaid\ngraph TB\n    subgraph a\n```\n";
        let err = validate_document(doc).unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnclosedSubgraph {
                opened_at: 5,
                detected_at: None
            }
        );
        assert!(validate_document("graph TB\n").is_ok());
    }

    #[test]
    fn test_subgraph_word_boundary() {
        assert!(validate_markup("graph TB\n    subgraphs --> end_node\n").is_ok());
    }
}
