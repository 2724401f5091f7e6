//! Heading identifier generation.
//!
//! Outline entries and rendered heading anchors must agree on ids exactly,
//! otherwise navigation and active-section tracking silently miss. Anything
//! that renders headings should allocate ids through a [`Slugger`] fed the
//! same heading texts in the same order.

use std::collections::{HashMap, HashSet};

/// Derive the base identifier for a heading text.
///
/// The text is lowercased, every run of characters that is neither a word
/// character (`[a-z0-9_]`) nor a CJK unified ideograph becomes a single `-`,
/// and separators at either end are trimmed.
///
/// # Examples
///
/// ```
/// use tocnav::parser::slug::base_id;
///
/// assert_eq!(base_id("Hello World"), "hello-world");
/// assert_eq!(base_id("API 设计!!"), "api-设计");
/// assert_eq!(base_id("  --snake_case--  "), "snake_case");
/// ```
pub fn base_id(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_separator = false;

    for ch in lowered.chars() {
        if is_id_char(ch) {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(ch);
        } else {
            pending_separator = true;
        }
    }

    out
}

fn is_id_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ('\u{4e00}'..='\u{9fa5}').contains(&ch)
}

/// Allocates unique heading ids for a single parse pass.
///
/// The first heading with a given base id keeps it bare; repeats get `-1`,
/// `-2`, ... appended. A fresh `Slugger` must be used for every document
/// render so counters never leak between passes.
#[derive(Debug, Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the id for the next heading with this text.
    ///
    /// ```
    /// use tocnav::parser::slug::Slugger;
    ///
    /// let mut slugger = Slugger::new();
    /// assert_eq!(slugger.slug("Setup"), "setup");
    /// assert_eq!(slugger.slug("Setup"), "setup-1");
    /// assert_eq!(slugger.slug("Setup"), "setup-2");
    /// ```
    pub fn slug(&mut self, text: &str) -> String {
        let base = base_id(text);
        let count = self.counts.entry(base.clone()).or_insert(0);

        let mut id = if *count == 0 {
            base.clone()
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;

        // A literal "setup-1" heading may already own the suffixed form
        while self.issued.contains(&id) {
            id = format!("{}-{}", base, count);
            *count += 1;
        }

        self.issued.insert(id.clone());
        id
    }
}
