//! Recursive boundary-aware text splitter.
//!
//! Text is cut on the first separator of a language-specific list that
//! occurs in it, keeping each separator at the start of the piece that
//! follows. Pieces that are still too long are cut again with the
//! remaining separators. Adjacent small pieces are then merged into
//! chunks of at most `chunk_size` characters, with up to `chunk_overlap`
//! characters of trailing pieces repeated at the start of the next
//! chunk.
//!
//! All lengths are measured in characters. Pieces are tracked as byte
//! ranges into the original text, so chunk boundaries always fall on
//! UTF-8 character boundaries and every chunk knows its offsets.

use crate::core::error::{Result, StrataError};
use crate::core::types::Chunk;
use std::collections::VecDeque;
use std::ops::Range;
use std::path::Path;

const JAVA: &[&str] = &[
    "\nclass ",
    "\npublic ",
    "\nprotected ",
    "\nprivate ",
    "\nstatic ",
    "\nif ",
    "\nfor ",
    "\nwhile ",
    "\nswitch ",
    "\ncase ",
    "\n\n",
    "\n",
    " ",
    "",
];

const KOTLIN: &[&str] = &[
    "\nclass ",
    "\npublic ",
    "\nprotected ",
    "\nprivate ",
    "\ninternal ",
    "\ncompanion ",
    "\nfun ",
    "\nval ",
    "\nvar ",
    "\nif ",
    "\nfor ",
    "\nwhile ",
    "\nwhen ",
    "\ncase ",
    "\nelse ",
    "\n\n",
    "\n",
    " ",
    "",
];

const RUST: &[&str] = &[
    "\nfn ",
    "\nconst ",
    "\nlet ",
    "\nif ",
    "\nwhile ",
    "\nfor ",
    "\nloop ",
    "\nmatch ",
    "\n\n",
    "\n",
    " ",
    "",
];

const PYTHON: &[&str] = &["\nclass ", "\ndef ", "\n\tdef ", "\n\n", "\n", " ", ""];

const JAVASCRIPT: &[&str] = &[
    "\nfunction ",
    "\nconst ",
    "\nlet ",
    "\nvar ",
    "\nclass ",
    "\nif ",
    "\nfor ",
    "\nwhile ",
    "\nswitch ",
    "\ncase ",
    "\ndefault ",
    "\n\n",
    "\n",
    " ",
    "",
];

const GO: &[&str] = &[
    "\nfunc ",
    "\nvar ",
    "\nconst ",
    "\ntype ",
    "\nif ",
    "\nfor ",
    "\nswitch ",
    "\ncase ",
    "\n\n",
    "\n",
    " ",
    "",
];

const MARKUP: &[&str] = &[
    "\n</", "\n<", "<body", "<div", "<p", "<li", "<table", "<tr", "\n\n", "\n", " ", "",
];

const MARKDOWN: &[&str] = &[
    "\n# ", "\n## ", "\n### ", "\n#### ", "\n```\n", "\n***\n", "\n---\n", "\n\n", "\n", " ", "",
];

const GENERIC: &[&str] = &["\n\n", "\n", " ", ""];

/// Source language, selecting the separator list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Java,
    Kotlin,
    Rust,
    Python,
    JavaScript,
    Go,
    Markup,
    Markdown,
    Generic,
}

impl Language {
    /// Language for a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "java" => Language::Java,
            "kt" | "kts" => Language::Kotlin,
            "rs" => Language::Rust,
            "py" => Language::Python,
            "js" | "jsx" | "mjs" | "ts" | "tsx" => Language::JavaScript,
            "go" => Language::Go,
            "xml" | "html" | "htm" | "xhtml" => Language::Markup,
            "md" | "markdown" => Language::Markdown,
            _ => Language::Generic,
        }
    }

    /// Language for a path, by its extension
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Generic)
    }

    /// Separators in preference order, always ending with `""`
    pub fn separators(self) -> &'static [&'static str] {
        match self {
            Language::Java => JAVA,
            Language::Kotlin => KOTLIN,
            Language::Rust => RUST,
            Language::Python => PYTHON,
            Language::JavaScript => JAVASCRIPT,
            Language::Go => GO,
            Language::Markup => MARKUP,
            Language::Markdown => MARKDOWN,
            Language::Generic => GENERIC,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
    chars: usize,
}

/// Recursive splitter with a character budget and overlap
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveSplitter {
    /// # Errors
    ///
    /// Returns `Config` if `chunk_size` is 0 or `chunk_overlap >= chunk_size`
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(StrataError::Config("chunk_size must be > 0".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(StrataError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into chunks attributed to `source`
    pub fn split(&self, text: &str, source: &str, language: Language) -> Vec<Chunk> {
        let mut ranges = Vec::new();
        self.split_range(text, 0..text.len(), language.separators(), &mut ranges);

        ranges
            .into_iter()
            .filter_map(|range| trim_range(text, range))
            .enumerate()
            .map(|(chunk_index, range)| Chunk {
                text: text[range.clone()].to_string(),
                source: source.to_string(),
                chunk_index,
                start_offset: range.start,
                end_offset: range.end,
            })
            .collect()
    }

    fn split_range(
        &self,
        text: &str,
        range: Range<usize>,
        separators: &[&str],
        out: &mut Vec<Range<usize>>,
    ) {
        let segment = &text[range.clone()];
        let (separator, remaining) = pick_separator(segment, separators);

        let mut small: Vec<Span> = Vec::new();
        for piece in split_keeping_separator(segment, separator) {
            let piece = (piece.start + range.start)..(piece.end + range.start);
            let chars = text[piece.clone()].chars().count();

            if chars < self.chunk_size {
                small.push(Span {
                    start: piece.start,
                    end: piece.end,
                    chars,
                });
                continue;
            }

            if !small.is_empty() {
                self.merge(&small, out);
                small.clear();
            }
            if remaining.is_empty() {
                out.push(piece);
            } else {
                self.split_range(text, piece, remaining, out);
            }
        }

        if !small.is_empty() {
            self.merge(&small, out);
        }
    }

    /// Greedily merge contiguous pieces, carrying overlap forward
    fn merge(&self, pieces: &[Span], out: &mut Vec<Range<usize>>) {
        let mut current: VecDeque<Span> = VecDeque::new();
        let mut total = 0;

        for &piece in pieces {
            if total + piece.chars > self.chunk_size {
                if let (Some(first), Some(last)) = (current.front(), current.back()) {
                    out.push(first.start..last.end);
                }
                while total > self.chunk_overlap
                    || (total > 0 && total + piece.chars > self.chunk_size)
                {
                    match current.pop_front() {
                        Some(dropped) => total -= dropped.chars,
                        None => break,
                    }
                }
            }
            current.push_back(piece);
            total += piece.chars;
        }

        if let (Some(first), Some(last)) = (current.front(), current.back()) {
            out.push(first.start..last.end);
        }
    }
}

fn pick_separator<'s>(text: &str, separators: &'s [&'s str]) -> (&'s str, &'s [&'s str]) {
    for (i, separator) in separators.iter().enumerate() {
        if separator.is_empty() {
            return ("", &[]);
        }
        if text.contains(separator) {
            return (separator, &separators[i + 1..]);
        }
    }
    (separators.last().copied().unwrap_or(""), &[])
}

/// Byte ranges of `text` cut before every occurrence of `separator`
fn split_keeping_separator(text: &str, separator: &str) -> Vec<Range<usize>> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| i..i + c.len_utf8())
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(start..idx);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(start..text.len());
    }
    pieces
}

/// Shrink a range to exclude surrounding whitespace; `None` if blank
fn trim_range(text: &str, range: Range<usize>) -> Option<Range<usize>> {
    let slice = &text[range.clone()];
    let start = range.start + (slice.len() - slice.trim_start().len());
    let end = range.start + slice.trim_end().len();
    (start < end).then_some(start..end)
}
