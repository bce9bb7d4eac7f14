use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use fancy_regex::Regex;
use linkify::{LinkFinder, LinkKind};
use tracing::warn;

use crate::detector::LinkDetector;
use crate::error::{LinkLabelError, Result};
use crate::grapheme::GraphemeIndex;
use crate::link::{LinkCallback, link_callback};

/// `@name` mentions not preceded by a word character.
pub const MENTION_PATTERN: &str = r"(?<!\w)@([\w_]+)?";

/// `#tag` hashtags not preceded by a word character.
pub const HASHTAG_PATTERN: &str = r"(?<!\w)#([\w_]+)?";

static MENTION: LazyLock<Regex> =
    LazyLock::new(|| compile_static(MENTION_PATTERN, PatternOptions::case_insensitive()));

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| compile_static(HASHTAG_PATTERN, PatternOptions::case_insensitive()));

/// Matching flags applied when a pattern is compiled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternOptions {
    pub case_insensitive: bool,
    /// `^` and `$` match at line boundaries.
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    /// Verbose syntax: whitespace and `#` comments in the pattern are ignored.
    pub ignore_whitespace: bool,
}

impl PatternOptions {
    pub fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
            ..Self::default()
        }
    }

    fn inline_flags(&self) -> String {
        let mut flags = String::new();
        if self.case_insensitive {
            flags.push('i');
        }
        if self.multi_line {
            flags.push('m');
        }
        if self.dot_matches_new_line {
            flags.push('s');
        }
        if self.ignore_whitespace {
            flags.push('x');
        }
        flags
    }
}

enum Matcher {
    Regex(Regex),
    Url(LinkFinder),
}

/// Detector that links every non-overlapping match of a pattern, first to
/// last.
pub struct PatternDetector {
    matcher: Matcher,
    callback: Option<LinkCallback>,
}

impl PatternDetector {
    /// Compile `pattern` with `options`.
    ///
    /// # Panics
    ///
    /// Panics when the pattern is malformed. Patterns handed to this
    /// constructor are expected to be constants; use [`Self::try_new`] for
    /// patterns assembled at runtime.
    pub fn new(pattern: &str, options: PatternOptions) -> Self {
        match Self::try_new(pattern, options) {
            Ok(detector) => detector,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(pattern: &str, options: PatternOptions) -> Result<Self> {
        Ok(Self::from_regex(compile(pattern, options)?))
    }

    pub fn from_regex(regex: Regex) -> Self {
        Self {
            matcher: Matcher::Regex(regex),
            callback: None,
        }
    }

    /// `@mention` detector, case-insensitive.
    pub fn mention() -> Self {
        Self::from_regex(MENTION.clone())
    }

    /// `#hashtag` detector, case-insensitive.
    pub fn hashtag() -> Self {
        Self::from_regex(HASHTAG.clone())
    }

    /// URL detector. Accepts URLs with a scheme as well as bare `www.` and
    /// domain forms; trailing sentence punctuation is left out of the link.
    pub fn url() -> Self {
        let mut finder = LinkFinder::new();
        finder.kinds(&[LinkKind::Url]);
        finder.url_must_have_scheme(false);
        Self {
            matcher: Matcher::Url(finder),
            callback: None,
        }
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.callback = Some(link_callback(callback));
        self
    }

    /// Source of the compiled regular expression; `None` for the URL finder.
    pub fn pattern(&self) -> Option<&str> {
        match &self.matcher {
            Matcher::Regex(regex) => Some(regex.as_str()),
            Matcher::Url(_) => None,
        }
    }

    fn byte_matches(&self, text: &str) -> Vec<Range<usize>> {
        match &self.matcher {
            Matcher::Regex(regex) => {
                let mut found = Vec::new();
                for result in regex.find_iter(text) {
                    match result {
                        Ok(m) => found.push(m.start()..m.end()),
                        Err(err) => {
                            warn!(pattern = regex.as_str(), error = %err, "link pattern aborted");
                            break;
                        }
                    }
                }
                found
            }
            Matcher::Url(finder) => finder
                .links(text)
                .filter_map(|link| {
                    let trimmed = strip_trailing_punctuation(link.as_str());
                    (!trimmed.is_empty()).then(|| link.start()..link.start() + trimmed.len())
                })
                .collect(),
        }
    }
}

impl LinkDetector for PatternDetector {
    fn detect_links(&self, text: &str) -> Vec<Range<usize>> {
        let index = GraphemeIndex::new(text);
        let mut ranges: Vec<Range<usize>> = Vec::new();
        for bytes in self.byte_matches(text) {
            let range = index.grapheme_range(bytes);
            if range.is_empty() {
                continue;
            }
            // Two byte matches inside one cluster can snap to overlapping
            // grapheme ranges; keep the first.
            if ranges.last().is_some_and(|last| range.start < last.end) {
                continue;
            }
            ranges.push(range);
        }
        ranges
    }

    fn callback(&self) -> Option<&LinkCallback> {
        self.callback.as_ref()
    }
}

impl fmt::Debug for PatternDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternDetector")
            .field("pattern", &self.pattern().unwrap_or("<url>"))
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

fn compile(pattern: &str, options: PatternOptions) -> Result<Regex> {
    let flags = options.inline_flags();
    let source = if flags.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{flags}){pattern}")
    };
    Regex::new(&source).map_err(|err| LinkLabelError::InvalidPattern {
        pattern: pattern.to_string(),
        source: Box::new(err),
    })
}

fn compile_static(pattern: &str, options: PatternOptions) -> Regex {
    match compile(pattern, options) {
        Ok(regex) => regex,
        Err(err) => panic!("built-in {err}"),
    }
}

// `linkify` already excludes most sentence punctuation, but closing quotes
// and stray brackets after a URL still slip through in prose. A closing
// bracket is only trimmed when the match has no opener left for it.
fn strip_trailing_punctuation(s: &str) -> &str {
    let mut current = s;
    loop {
        let trimmed = current.trim_end_matches(['.', ',', '?', '!', ':', ';', '\'', '"']);
        let trimmed = match trimmed.chars().next_back() {
            Some(')') if has_unmatched_closer(trimmed, '(', ')') => &trimmed[..trimmed.len() - 1],
            Some(']') if has_unmatched_closer(trimmed, '[', ']') => &trimmed[..trimmed.len() - 1],
            _ => trimmed,
        };
        if trimmed.len() == current.len() {
            return current;
        }
        current = trimmed;
    }
}

fn has_unmatched_closer(s: &str, open: char, close: char) -> bool {
    s.matches(close).count() > s.matches(open).count()
}
