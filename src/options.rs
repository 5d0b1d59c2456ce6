//! Option lists as written between `[` and `]` in TikZ/pgfplots commands.
//!
//! An option list is a comma separated sequence of `name=value` pairs. Values may
//! themselves contain commas as long as they are wrapped in braces, e.g.
//! `group style={group size=2 by 1, vertical sep=2cm}`. The store keeps the
//! entries ordered by name so the emitted markup is identical from run to run.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

/// Characters stripped from both ends of option names and values.
const WHITESPACE: &[char] = &[' ', '\t', '\n', '\r'];

/// Ordered `name -> value` store of TikZ options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionStore {
    entries: BTreeMap<String, String>,
}

impl OptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an option string such as `"xmin=0, xlabel={Energy}"`.
    pub fn parse(options: &str) -> Self {
        let mut store = Self::new();
        store.add(options);
        store
    }

    /// Parse `options` and merge them in. Later values replace earlier ones.
    pub fn add(&mut self, options: &str) {
        for token in split_options(options) {
            let (name, value) = parse_option(token);
            if name.is_empty() {
                continue;
            }
            self.entries.insert(name, value);
        }
    }

    /// Merge every entry of `other` into this store, replacing existing names.
    pub fn merge(&mut self, other: &OptionStore) {
        for (name, value) in other.iter() {
            self.entries.insert(name.to_string(), value.to_string());
        }
    }

    /// Whether `name` has an entry. Never inserts.
    pub fn is_defined(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Value stored for `name`, if any. Never inserts.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Mutable access to the value of `name`, inserting an empty value first when
    /// the name is not present yet.
    ///
    /// Callers use this for the "read, then fill if empty" pattern; use
    /// [`OptionStore::get`] or [`OptionStore::is_defined`] for plain queries.
    pub fn get_or_insert_default(&mut self, name: &str) -> &mut String {
        self.entries.entry(name.to_string()).or_default()
    }

    pub fn set<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// One `name=value,` line per entry, each prefixed with `indent`.
    ///
    /// Flag options (empty value) are written as the bare name.
    pub fn render(&self, indent: &str) -> String {
        let mut out = String::new();
        for (name, value) in self.iter() {
            out.push_str(indent);
            out.push_str(&format_entry(name, value));
            out.push_str(",\n");
        }
        out
    }

    /// Single-line form, suitable for wrapping in braces as the value of another option.
    pub fn to_inline(&self) -> String {
        self.iter()
            .map(|(name, value)| format_entry(name, value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for OptionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}

impl From<&str> for OptionStore {
    fn from(options: &str) -> Self {
        Self::parse(options)
    }
}

impl<'a> IntoIterator for &'a OptionStore {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn format_entry(name: &str, value: &str) -> String {
    if value.is_empty() {
        name.to_string()
    } else {
        format!("{name}={value}")
    }
}

/// Split an option string on the commas that are not enclosed in braces.
///
/// Input with an unclosed `{` is not rejected: everything after the last top-level
/// comma becomes one final token. A `}` without a matching `{` is ignored.
pub fn split_options(options: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in options.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    log::warn!("ignoring unmatched '}}' in option list {options:?}");
                }
                depth = depth.saturating_sub(1);
            }
            ',' if depth == 0 => {
                tokens.push(&options[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth > 0 {
        log::warn!(
            "unclosed '{{' in option list, keeping {:?} as a single option",
            &options[start..]
        );
    }
    tokens.push(&options[start..]);
    tokens
}

/// Split one option on its first `=` into trimmed name and value.
pub fn parse_option(option: &str) -> (String, String) {
    match option.split_once('=') {
        Some((name, value)) => (
            name.trim_matches(WHITESPACE).to_string(),
            value.trim_matches(WHITESPACE).to_string(),
        ),
        None => (option.trim_matches(WHITESPACE).to_string(), String::new()),
    }
}

/// Strip one pair of enclosing braces, if present: `{a, b}` -> `a, b`.
pub fn unwrap_group(value: &str) -> &str {
    let value = value.trim_matches(WHITESPACE);
    value
        .strip_prefix('{')
        .and_then(|v| v.strip_suffix('}'))
        .unwrap_or(value)
}

/// Wrap a value in braces: `a, b` -> `{a, b}`.
pub fn wrap_group(value: &str) -> String {
    format!("{{{value}}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braces_protect_commas() {
        let opts = OptionStore::parse("a={1,2,3}, b=4");
        assert_eq!(opts.len(), 2);
        assert_eq!(opts.get("a"), Some("{1,2,3}"));
        assert_eq!(opts.get("b"), Some("4"));
    }

    #[test]
    fn group_style_is_one_option() {
        let opts = OptionStore::parse("group style={rows=2, columns=3}, xmin=0");
        assert_eq!(opts.get("group style"), Some("{rows=2, columns=3}"));
        assert_eq!(opts.get("xmin"), Some("0"));
    }

    #[test]
    fn names_and_values_are_trimmed() {
        let opts = OptionStore::parse(" a = 1 ,\tb= 2\n");
        assert_eq!(opts.get("a"), Some("1"));
        assert_eq!(opts.get("b"), Some("2"));
    }

    #[test]
    fn later_value_wins() {
        let mut opts = OptionStore::new();
        opts.add("x=1");
        opts.add("x=2");
        assert_eq!(opts.get("x"), Some("2"));
        assert_eq!(opts.len(), 1);

        let same_call = OptionStore::parse("x=1, x=3");
        assert_eq!(same_call.get("x"), Some("3"));
    }

    #[test]
    fn flag_without_value_and_empty_tokens() {
        let opts = OptionStore::parse("colorbar, , only marks,");
        assert_eq!(opts.len(), 2);
        assert_eq!(opts.get("colorbar"), Some(""));
        assert!(opts.is_defined("only marks"));
        assert_eq!(opts.render(""), "colorbar,\nonly marks,\n");
    }

    #[test]
    fn unclosed_brace_keeps_remainder() {
        let opts = OptionStore::parse("a=1, b={2, c=3");
        assert_eq!(opts.len(), 2);
        assert_eq!(opts.get("b"), Some("{2, c=3"));
    }

    #[test]
    fn lookups_do_not_insert() {
        let mut opts = OptionStore::parse("a=1");
        assert!(!opts.is_defined("ymin"));
        assert_eq!(opts.get("ymin"), None);
        assert_eq!(opts.len(), 1);

        assert_eq!(opts.get_or_insert_default("ymin"), "");
        assert!(opts.is_defined("ymin"));
        opts.get_or_insert_default("ymin").push_str("4");
        assert_eq!(opts.get("ymin"), Some("4"));
    }

    #[test]
    fn render_is_sorted_and_verbatim() {
        let opts = OptionStore::parse("ylabel={Counts}, colorbar style={title={E, T}}, xmin=0");
        assert_eq!(
            opts.render("\t"),
            "\tcolorbar style={title={E, T}},\n\txmin=0,\n\tylabel={Counts},\n"
        );
        assert_eq!(
            opts.to_inline(),
            "colorbar style={title={E, T}}, xmin=0, ylabel={Counts}"
        );
    }

    #[test]
    fn unwrap_and_wrap_groups() {
        assert_eq!(unwrap_group(" {a=1, b=2} "), "a=1, b=2");
        assert_eq!(unwrap_group("plain"), "plain");
        assert_eq!(wrap_group("a=1"), "{a=1}");
    }
}
