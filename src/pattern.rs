//! Pattern compilation and capture-group substitution.
//!
//! A [`Pattern`] pairs an immutable compiled regular expression with a
//! replacement template. Matching uses whole-name semantics: a record name
//! matches only when the pattern covers the entire name. Back-references in
//! the template are positional (`$1`, `$2`, ..., or `${1}`); a digit run
//! ends the reference, so `$1_X` is group 1 followed by the literal `_X`.

use crate::error::{Result, RetoolsError};
use regex::Regex;

/// A compiled name pattern plus its replacement template.
///
/// Created per request via [`Pattern::compile`], immutable afterwards.
/// Queued requests keep their `Pattern` alive inside the scheduler until
/// the checkpoint consumes them.
///
/// # Examples
///
/// ```rust
/// use retools_engine::Pattern;
///
/// let pattern = Pattern::compile("(.*):A", "$1:X")?;
/// assert_eq!(
///     pattern.substitute("PS1:CH0:A").as_deref(),
///     Some("PS1:CH0:X"),
/// );
/// assert_eq!(pattern.substitute("PS1:CH0:B"), None);
/// # Ok::<(), retools_engine::RetoolsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    anchored: Regex,
    source: String,
    template: String,
    parts: Vec<TemplatePart>,
}

/// One parsed segment of a replacement template.
#[derive(Debug, Clone, PartialEq)]
enum TemplatePart {
    Literal(String),
    Group(usize),
}

impl Pattern {
    /// Compile a pattern and its replacement template.
    ///
    /// Fails with [`RetoolsError::CompilationError`] carrying the regex
    /// crate's rendered diagnostic when the expression is malformed. Never
    /// partially succeeds.
    pub fn compile(pattern: &str, template: &str) -> Result<Self> {
        // Validate the user's text on its own so diagnostics point at it,
        // then compile the anchored program actually used for matching.
        Regex::new(pattern).map_err(|e| RetoolsError::CompilationError(e.to_string()))?;
        let anchored = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|e| RetoolsError::CompilationError(e.to_string()))?;

        Ok(Self {
            anchored,
            source: pattern.to_string(),
            template: template.to_string(),
            parts: parse_template(template),
        })
    }

    /// True when `name` matches the whole pattern.
    pub fn is_match(&self, name: &str) -> bool {
        self.anchored.is_match(name)
    }

    /// Apply the replacement template to `name`.
    ///
    /// Returns `None` when the name does not match. On a match, positional
    /// back-references expand to the corresponding capture group's text;
    /// unmatched or out-of-range groups expand to the empty string. The
    /// result is deterministic: no state survives between calls.
    pub fn substitute(&self, name: &str) -> Option<String> {
        let caps = self.anchored.captures(name)?;
        let mut out = String::with_capacity(self.template.len());
        for part in &self.parts {
            match part {
                TemplatePart::Literal(text) => out.push_str(text),
                TemplatePart::Group(idx) => {
                    if let Some(m) = caps.get(*idx) {
                        out.push_str(m.as_str());
                    }
                }
            }
        }
        Some(out)
    }

    /// The pattern text as given by the caller, without anchoring.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The replacement template as given by the caller.
    pub fn template(&self) -> &str {
        &self.template
    }
}

/// Split a template into literal runs and positional group references.
///
/// `$$` is a literal dollar; `$` not followed by a digit or `{` is kept
/// verbatim; `${n}` must close its brace to count as a reference.
fn parse_template(template: &str) -> Vec<TemplatePart> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            literal.push(c);
            continue;
        }
        match chars.peek() {
            Some((_, '$')) => {
                chars.next();
                literal.push('$');
            }
            Some((_, '{')) => {
                let brace_start = chars.clone();
                chars.next();
                let mut digits = String::new();
                while let Some((_, d)) = chars.peek() {
                    if d.is_ascii_digit() {
                        digits.push(*d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if !digits.is_empty() && matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    flush_literal(&mut parts, &mut literal);
                    parts.push(TemplatePart::Group(digits.parse().unwrap_or(0)));
                } else {
                    // Not a well-formed ${n}: keep the dollar and rescan.
                    literal.push('$');
                    chars = brace_start;
                }
            }
            Some((_, d)) if d.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some((_, d)) = chars.peek() {
                    if d.is_ascii_digit() {
                        digits.push(*d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                flush_literal(&mut parts, &mut literal);
                parts.push(TemplatePart::Group(digits.parse().unwrap_or(0)));
            }
            _ => literal.push('$'),
        }
    }
    flush_literal(&mut parts, &mut literal);
    parts
}

fn flush_literal(parts: &mut Vec<TemplatePart>, literal: &mut String) {
    if !literal.is_empty() {
        parts.push(TemplatePart::Literal(std::mem::take(literal)));
    }
}
