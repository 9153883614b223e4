//! Escaping output stream.
//!
//! [`EscapeOStream`] writes text to any [`fmt::Write`] sink while substituting
//! characters according to a stack of active [`RuleSet`]s. Rule sets compose:
//! content appended under `HtmlAttribute` + `JsStringLiteralDQuote` is first
//! escaped as a script string, and the result is escaped again for the
//! attribute it will live in.

use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// The closed set of escaping contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleSet {
    /// Inside a double-quoted HTML attribute value (also used for text content).
    HtmlAttribute,
    /// Inside a single-quoted script string literal.
    JsStringLiteralSQuote,
    /// Inside a double-quoted script string literal.
    JsStringLiteralDQuote,
}

const HTML_ATTRIBUTE: &[(char, &str)] = &[('&', "&amp;"), ('"', "&#34;"), ('<', "&lt;")];

const JS_SQUOTE: &[(char, &str)] = &[
    ('\\', "\\\\"),
    ('\n', "\\n"),
    ('\r', "\\r"),
    ('\t', "\\t"),
    ('\'', "\\'"),
];

const JS_DQUOTE: &[(char, &str)] = &[
    ('\\', "\\\\"),
    ('\n', "\\n"),
    ('\r', "\\r"),
    ('\t', "\\t"),
    ('"', "\\\""),
];

impl RuleSet {
    /// The substitution entries of this rule set.
    pub fn entries(self) -> &'static [(char, &'static str)] {
        match self {
            RuleSet::HtmlAttribute => HTML_ATTRIBUTE,
            RuleSet::JsStringLiteralSQuote => JS_SQUOTE,
            RuleSet::JsStringLiteralDQuote => JS_DQUOTE,
        }
    }
}

/// Apply a single rule set's substitutions to `text`.
fn apply_entries(entries: &[(char, &str)], text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match entries.iter().find(|(c, _)| *c == ch) {
            Some((_, replacement)) => out.push_str(replacement),
            None => out.push(ch),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// EscapeOStream
// ---------------------------------------------------------------------------

/// A text stream that escapes characters according to the active rule stack.
///
/// Changing the stack only affects text appended afterwards; content already
/// written is never revisited.
#[derive(Debug, Clone)]
pub struct EscapeOStream<W: fmt::Write = String> {
    sink: W,
    rule_sets: Vec<RuleSet>,
    /// Merged substitution table for the current stack, innermost first.
    mixed: Vec<(char, String)>,
}

impl EscapeOStream<String> {
    /// A stream writing into a fresh `String`.
    pub fn new() -> Self {
        Self::with_sink(String::new())
    }
}

impl Default for EscapeOStream<String> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: fmt::Write> EscapeOStream<W> {
    /// Wrap an existing sink. The rule stack starts empty (pure passthrough).
    pub fn with_sink(sink: W) -> Self {
        Self {
            sink,
            rule_sets: Vec::new(),
            mixed: Vec::new(),
        }
    }

    /// A new stream over `sink` that starts with a copy of this stream's rule
    /// stack.
    pub fn fork<V: fmt::Write>(&self, sink: V) -> EscapeOStream<V> {
        EscapeOStream {
            sink,
            rule_sets: self.rule_sets.clone(),
            mixed: self.mixed.clone(),
        }
    }

    /// Push a rule set on top of the stack.
    pub fn push_escape(&mut self, rules: RuleSet) {
        self.rule_sets.push(rules);
        self.mix_rules();
    }

    /// Pop the most recently pushed rule set.
    ///
    /// Popping an empty stack is a caller bug; it trips a debug assertion and
    /// is otherwise ignored.
    pub fn pop_escape(&mut self) {
        debug_assert!(!self.rule_sets.is_empty(), "unbalanced pop_escape");
        self.rule_sets.pop();
        self.mix_rules();
    }

    /// Push `rules` for the lifetime of the returned guard.
    pub fn scoped(&mut self, rules: RuleSet) -> EscapeGuard<'_, W> {
        self.push_escape(rules);
        EscapeGuard { stream: self }
    }

    /// The active rule sets, outermost first.
    pub fn rule_sets(&self) -> &[RuleSet] {
        &self.rule_sets
    }

    /// Append `text`, escaping it with the merged rule table.
    pub fn append(&mut self, text: &str) -> fmt::Result {
        if self.mixed.is_empty() {
            return self.sink.write_str(text);
        }
        let mut run_start = 0;
        for (pos, ch) in text.char_indices() {
            if let Some((_, replacement)) = self.mixed.iter().find(|(c, _)| *c == ch) {
                self.sink.write_str(&text[run_start..pos])?;
                self.sink.write_str(replacement)?;
                run_start = pos + ch.len_utf8();
            }
        }
        self.sink.write_str(&text[run_start..])
    }

    /// Append a single character, escaping it if needed.
    pub fn append_char(&mut self, ch: char) -> fmt::Result {
        match self.mixed.iter().find(|(c, _)| *c == ch) {
            Some((_, replacement)) => self.sink.write_str(replacement),
            None => self.sink.write_char(ch),
        }
    }

    /// Append an integer. Digits never need escaping.
    pub fn append_int(&mut self, value: i64) -> fmt::Result {
        write!(self.sink, "{value}")
    }

    /// Append `text` verbatim, bypassing every active rule.
    pub fn append_raw(&mut self, text: &str) -> fmt::Result {
        self.sink.write_str(text)
    }

    /// Borrow the underlying sink.
    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Consume the stream and return the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Recompute the merged table from the stack.
    ///
    /// Walks from the innermost rule set outwards. Replacement text gathered so
    /// far is re-escaped by each outer set before that set's own entries are
    /// added; for a character claimed by several sets the innermost wins.
    fn mix_rules(&mut self) {
        let mut mixed: Vec<(char, String)> = Vec::new();
        for rules in self.rule_sets.iter().rev() {
            let entries = rules.entries();
            for (_, replacement) in mixed.iter_mut() {
                *replacement = apply_entries(entries, replacement);
            }
            for (ch, replacement) in entries {
                if !mixed.iter().any(|(c, _)| c == ch) {
                    mixed.push((*ch, (*replacement).to_owned()));
                }
            }
        }
        self.mixed = mixed;
    }
}

impl<W: fmt::Write> fmt::Write for EscapeOStream<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s)
    }
}

// ---------------------------------------------------------------------------
// EscapeGuard
// ---------------------------------------------------------------------------

/// Keeps one rule set pushed until dropped, so push/pop stay balanced.
pub struct EscapeGuard<'a, W: fmt::Write> {
    stream: &'a mut EscapeOStream<W>,
}

impl<W: fmt::Write> Deref for EscapeGuard<'_, W> {
    type Target = EscapeOStream<W>;

    fn deref(&self) -> &Self::Target {
        self.stream
    }
}

impl<W: fmt::Write> DerefMut for EscapeGuard<'_, W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stream
    }
}

impl<W: fmt::Write> Drop for EscapeGuard<'_, W> {
    fn drop(&mut self) {
        self.stream.pop_escape();
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Escape text for use as HTML content or a double-quoted attribute value.
pub fn escape_text(text: &str) -> String {
    apply_entries(HTML_ATTRIBUTE, text)
}

/// Escape text for embedding in a single-quoted script string literal.
pub fn escape_js_single(text: &str) -> String {
    apply_entries(JS_SQUOTE, text)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    fn escaped(rules: &[RuleSet], text: &str) -> String {
        let mut out = EscapeOStream::new();
        for r in rules {
            out.push_escape(*r);
        }
        out.append(text).unwrap();
        out.into_inner()
    }

    #[test]
    fn empty_stack_is_passthrough() {
        assert_eq!(escaped(&[], "a\"<&\\'b"), "a\"<&\\'b");
    }

    #[test]
    fn html_attribute_rules() {
        assert_eq!(
            escaped(&[RuleSet::HtmlAttribute], "a & \"b\" <c>"),
            "a &amp; &#34;b&#34; &lt;c>"
        );
    }

    #[test]
    fn js_single_quote_rules() {
        assert_eq!(
            escaped(&[RuleSet::JsStringLiteralSQuote], "it's\n\\\"x\""),
            "it\\'s\\n\\\\\"x\""
        );
    }

    #[test]
    fn js_double_quote_rules() {
        assert_eq!(
            escaped(&[RuleSet::JsStringLiteralDQuote], "say \"hi\"\t'x'"),
            "say \\\"hi\\\"\\t'x'"
        );
    }

    #[test]
    fn stacked_attribute_then_dquote() {
        let rules = [RuleSet::HtmlAttribute, RuleSet::JsStringLiteralDQuote];
        assert_eq!(escaped(&rules, "a\"b"), "a\\&#34;b");
        assert_eq!(escaped(&rules, "<"), "&lt;");
        assert_eq!(escaped(&rules, "\\"), "\\\\");
        assert_eq!(escaped(&rules, "x&y"), "x&amp;y");
    }

    #[test]
    fn stacked_dquote_then_attribute_order_matters() {
        // Attribute escaping innermost: the entity's characters are not
        // special to the outer script rules, so only the quote rule differs.
        let rules = [RuleSet::JsStringLiteralDQuote, RuleSet::HtmlAttribute];
        assert_eq!(escaped(&rules, "a\"b"), "a&#34;b");
        assert_eq!(escaped(&rules, "a\\b"), "a\\\\b");
    }

    #[test]
    fn rule_change_only_affects_later_content() {
        let mut out = EscapeOStream::new();
        out.append("\"first\"").unwrap();
        out.push_escape(RuleSet::HtmlAttribute);
        out.append("\"second\"").unwrap();
        out.pop_escape();
        out.append("\"third\"").unwrap();
        assert_eq!(out.into_inner(), "\"first\"&#34;second&#34;\"third\"");
    }

    #[test]
    fn scoped_guard_pops_on_drop() {
        let mut out = EscapeOStream::new();
        {
            let mut guard = out.scoped(RuleSet::JsStringLiteralSQuote);
            guard.append("'").unwrap();
            assert_eq!(guard.rule_sets(), &[RuleSet::JsStringLiteralSQuote]);
        }
        assert!(out.rule_sets().is_empty());
        out.append("'").unwrap();
        assert_eq!(out.into_inner(), "\\''");
    }

    #[test]
    fn append_char_and_int() {
        let mut out = EscapeOStream::new();
        out.push_escape(RuleSet::HtmlAttribute);
        out.append_char('<').unwrap();
        out.append_char('x').unwrap();
        out.append_int(-42).unwrap();
        out.append_raw("<raw>").unwrap();
        assert_eq!(out.into_inner(), "&lt;x-42<raw>");
    }

    #[test]
    fn fmt_write_is_escaped() {
        let mut out = EscapeOStream::new();
        out.push_escape(RuleSet::HtmlAttribute);
        write!(out, "{}<{}", 1, 2).unwrap();
        assert_eq!(out.into_inner(), "1&lt;2");
    }

    #[test]
    fn fork_copies_rule_stack() {
        let mut parent = EscapeOStream::new();
        parent.push_escape(RuleSet::JsStringLiteralDQuote);
        let mut child = parent.fork(String::new());
        child.append("\"").unwrap();
        assert_eq!(child.into_inner(), "\\\"");
    }

    #[test]
    fn multibyte_text_is_preserved() {
        assert_eq!(
            escaped(&[RuleSet::HtmlAttribute], "héllo \"wörld\" ✓"),
            "héllo &#34;wörld&#34; ✓"
        );
    }

    #[test]
    fn helpers() {
        assert_eq!(escape_text("<b>&"), "&lt;b>&amp;");
        assert_eq!(escape_js_single("a'b\\"), "a\\'b\\\\");
    }
}
