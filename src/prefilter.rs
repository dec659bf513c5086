//! Literal prefilter for checkpoint batch application.
//!
//! Applying N queued patterns to a D-entity snapshot costs N regex
//! evaluations per name. The prefilter conservatively extracts a required
//! literal fragment from each pattern's source text; a snapshot name that
//! does not contain a pattern's fragment cannot match it, so the regex is
//! skipped. Patterns with no usable fragment are evaluated for every name.
//!
//! Strategy selection mirrors pattern-count thresholds: a plain substring
//! scan for small sets, an AhoCorasick automaton for large ones. The
//! prefilter is an optimization only: enabling or disabling it never
//! changes which names match which patterns.

use crate::pattern::Pattern;
use aho_corasick::AhoCorasick;

/// Pattern-count threshold for switching the scan strategy.
const AHOCORASICK_THRESHOLD: usize = 20;

/// Conservative literal index over a fixed set of patterns.
#[derive(Debug)]
pub struct LiteralPrefilter {
    strategy: Strategy,
    /// Indices of patterns that must be evaluated for every name.
    unfiltered: Vec<usize>,
    pattern_count: usize,
}

#[derive(Debug)]
enum Strategy {
    /// Every pattern is unfiltered; no index built.
    Passthrough,
    /// Substring scan over (fragment, owner) pairs.
    Simple { literals: Vec<(String, usize)> },
    /// Automaton over the fragments; `owners[i]` is the pattern owning
    /// automaton pattern `i`.
    AhoCorasick {
        automaton: AhoCorasick,
        owners: Vec<usize>,
    },
}

/// Construction summary, logged by the scheduler at debug level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefilterStats {
    /// Total patterns covered by the prefilter.
    pub pattern_count: usize,
    /// Patterns with a usable literal fragment.
    pub filtered: usize,
    /// Patterns evaluated for every name.
    pub unfiltered: usize,
}

impl LiteralPrefilter {
    /// Build an index over `patterns`, ignoring fragments shorter than
    /// `min_literal_length`.
    pub fn build(patterns: &[&Pattern], min_literal_length: usize) -> Self {
        let mut literals = Vec::new();
        let mut unfiltered = Vec::new();

        for (idx, pattern) in patterns.iter().enumerate() {
            match extract_literal(pattern.as_str(), min_literal_length) {
                Some(fragment) => literals.push((fragment, idx)),
                None => unfiltered.push(idx),
            }
        }

        let strategy = if literals.is_empty() {
            Strategy::Passthrough
        } else if patterns.len() < AHOCORASICK_THRESHOLD {
            Strategy::Simple { literals }
        } else {
            let (fragments, owners): (Vec<String>, Vec<usize>) = literals.into_iter().unzip();
            match AhoCorasick::new(&fragments) {
                Ok(automaton) => Strategy::AhoCorasick { automaton, owners },
                // Automaton limits exceeded: fall back to the scan.
                Err(_) => Strategy::Simple {
                    literals: fragments.into_iter().zip(owners).collect(),
                },
            }
        };

        Self {
            strategy,
            unfiltered,
            pattern_count: patterns.len(),
        }
    }

    /// Build a prefilter that marks every pattern as a candidate.
    pub fn passthrough(pattern_count: usize) -> Self {
        Self {
            strategy: Strategy::Passthrough,
            unfiltered: (0..pattern_count).collect(),
            pattern_count,
        }
    }

    /// Mark the patterns worth evaluating against `name`.
    ///
    /// `marks` is resized to the pattern count and filled; a `true` entry
    /// means the pattern may match and must be evaluated. The marked set
    /// is always a superset of the truly matching set.
    pub fn mark_candidates(&self, name: &str, marks: &mut Vec<bool>) {
        marks.clear();
        marks.resize(self.pattern_count, false);
        for &idx in &self.unfiltered {
            marks[idx] = true;
        }

        match &self.strategy {
            Strategy::Passthrough => {
                // Everything already marked via `unfiltered`, unless the
                // passthrough was built empty on purpose.
                if self.unfiltered.is_empty() {
                    marks.iter_mut().for_each(|m| *m = true);
                }
            }
            Strategy::Simple { literals } => {
                for (fragment, owner) in literals {
                    if name.contains(fragment.as_str()) {
                        marks[*owner] = true;
                    }
                }
            }
            Strategy::AhoCorasick { automaton, owners } => {
                for hit in automaton.find_overlapping_iter(name) {
                    marks[owners[hit.pattern().as_usize()]] = true;
                }
            }
        }
    }

    /// Candidate marks for one name; convenience over
    /// [`mark_candidates`](Self::mark_candidates).
    pub fn candidates(&self, name: &str) -> Vec<bool> {
        let mut marks = Vec::new();
        self.mark_candidates(name, &mut marks);
        marks
    }

    /// Construction summary.
    pub fn stats(&self) -> PrefilterStats {
        PrefilterStats {
            pattern_count: self.pattern_count,
            filtered: self.pattern_count - self.unfiltered.len(),
            unfiltered: self.unfiltered.len(),
        }
    }
}

/// Extract the longest literal run a name must contain to match `pattern`.
///
/// Deliberately conservative: alternation or inline `(?` groups disable
/// extraction entirely, group bodies contribute nothing (the group as a
/// whole may be optional), escapes and character classes break runs, and
/// a `*`/`?`/`{` quantifier retracts the character it quantifies. Returns
/// `None` when no run reaches `min_len`.
fn extract_literal(pattern: &str, min_len: usize) -> Option<String> {
    if min_len == 0 || pattern.contains('|') || pattern.contains("(?") {
        return None;
    }

    let mut runs: Vec<String> = Vec::new();
    let mut run = String::new();
    let mut depth = 0usize;
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if depth > 0 {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                '\\' => {
                    chars.next();
                }
                '[' => skip_class(&mut chars),
                _ => {}
            }
            continue;
        }
        match c {
            '(' => {
                flush_run(&mut runs, &mut run);
                depth = 1;
            }
            '\\' => {
                chars.next();
                flush_run(&mut runs, &mut run);
            }
            '[' => {
                skip_class(&mut chars);
                flush_run(&mut runs, &mut run);
            }
            '*' | '?' => {
                run.pop();
                flush_run(&mut runs, &mut run);
            }
            '{' => {
                run.pop();
                flush_run(&mut runs, &mut run);
                for d in chars.by_ref() {
                    if d == '}' {
                        break;
                    }
                }
            }
            '+' => {
                // The quantified character occurs at least once.
                flush_run(&mut runs, &mut run);
            }
            '.' | '^' | '$' | ')' => flush_run(&mut runs, &mut run),
            _ => run.push(c),
        }
    }
    flush_run(&mut runs, &mut run);

    runs.into_iter()
        .filter(|r| r.len() >= min_len)
        .max_by_key(String::len)
}

/// Skip a character class body; a leading `]` is literal.
fn skip_class(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    let mut first = true;
    while let Some(d) = chars.next() {
        if d == '\\' {
            chars.next();
            first = false;
            continue;
        }
        if d == ']' && !first {
            break;
        }
        first = false;
    }
}

fn flush_run(runs: &mut Vec<String>, run: &mut String) {
    if !run.is_empty() {
        runs.push(std::mem::take(run));
    }
}
