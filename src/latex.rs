//! Conversion of ROOT-style label markup (`#eta`, `p_{T}`, `#sqrt{s}`) into LaTeX.

use std::iter::Peekable;
use std::str::Chars;

/// Convert a ROOT TLatex style string into LaTeX suitable for an axis label.
///
/// `#name` becomes `\name`, sub/superscripts are kept, and every run of such
/// math is wrapped in a single pair of `$`. Strings that already contain `$`
/// are assumed to be LaTeX and returned unchanged.
pub fn to_latex(label: &str) -> String {
    if label.contains('$') {
        return label.to_string();
    }

    let mut runs = Runs::default();
    let mut chars = label.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '#' => {
                let name = take_letters(&mut chars);
                if name.is_empty() {
                    runs.push(false, "\\#");
                    continue;
                }
                runs.push(true, &format!("\\{name}"));
                if chars.peek() == Some(&'{') {
                    let group = take_group(&mut chars);
                    runs.push(true, &format!("{{{}}}", group.replace('#', "\\")));
                }
            }
            '^' | '_' => match chars.peek().copied() {
                Some('{') => {
                    let group = take_group(&mut chars);
                    runs.push(true, &format!("{ch}{{{}}}", group.replace('#', "\\")));
                }
                Some(next) if !next.is_whitespace() => {
                    chars.next();
                    runs.push(true, &format!("{ch}{next}"));
                }
                _ => runs.push(false, &ch.to_string()),
            },
            _ => runs.push(false, &ch.to_string()),
        }
    }
    runs.finish()
}

/// Alternating text/math runs; adjacent runs of the same kind are merged.
#[derive(Default)]
struct Runs {
    runs: Vec<(bool, String)>,
}

impl Runs {
    fn push(&mut self, math: bool, text: &str) {
        match self.runs.last_mut() {
            Some((last_math, buf)) if *last_math == math => buf.push_str(text),
            _ => self.runs.push((math, text.to_string())),
        }
    }

    fn finish(self) -> String {
        self.runs
            .into_iter()
            .map(|(math, text)| if math { format!("${text}$") } else { text })
            .collect()
    }
}

fn take_letters(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_alphabetic() {
            break;
        }
        name.push(c);
        chars.next();
    }
    name
}

/// Consume a `{...}` group (the opening brace must be next) and return its inner text.
fn take_group(chars: &mut Peekable<Chars<'_>>) -> String {
    chars.next();
    let mut depth = 1usize;
    let mut inner = String::new();
    for c in chars.by_ref() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
        inner.push(c);
    }
    inner
}
