//! Python reserved-word escaping.
//!
//! A binding member or parameter literally named like a Python keyword (the
//! classic case is `from`) cannot appear as-is in a stub. It is renamed with
//! a trailing underscore, leaving the rest of the declaration untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

const DOCSTRING_QUOTES: &str = "\"\"\"";

// Keywords that can name a member. `None`, `True` and `False` only occur as
// values in a stub.
fn escapable_alternation() -> String {
    PYTHON_KEYWORDS
        .iter()
        .filter(|k| !matches!(**k, "False" | "None" | "True"))
        .copied()
        .collect::<Vec<_>>()
        .join("|")
}

// `from: IRI` as an attribute declaration at the start of a line.
#[allow(clippy::expect_used)] // Safe: pattern built from a fixed word list
static ATTRIBUTE_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(\s*)({})(\s*:)", escapable_alternation()))
        .expect("attribute keyword pattern")
});

// `from: IRI` in a parameter list, after `(`, `,` or `*`.
#[allow(clippy::expect_used)] // Safe: pattern built from a fixed word list
static PARAMETER_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"([(,*]\s*)({})(\s*:)", escapable_alternation()))
        .expect("parameter keyword pattern")
});

// `from(self, ...)` at the start of a signature.
#[allow(clippy::expect_used)] // Safe: pattern built from a fixed word list
static CALLED_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^({})(\s*\()", escapable_alternation()))
        .expect("called keyword pattern")
});

pub fn is_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}

/// Escape a bare member name.
pub fn escape_name(name: &str) -> Cow<'_, str> {
    if is_keyword(name) {
        Cow::Owned(format!("{name}_"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Escape keyword names inside a signature line or a multi-line stub hook.
///
/// Renames annotated names in declaration position (an attribute at the
/// start of a line, a parameter after `(`, `,` or `*`) and a keyword used as
/// the callable's own name. Docstring lines are copied verbatim.
pub fn escape_declaration(text: &str) -> String {
    let text = CALLED_KEYWORD.replace(text, "${1}_${2}");
    let mut escaped = String::with_capacity(text.len() + 8);
    let mut in_docstring = false;

    for line in text.split_inclusive('\n') {
        let quotes = line.matches(DOCSTRING_QUOTES).count();
        if in_docstring || quotes > 0 {
            escaped.push_str(line);
            if quotes % 2 == 1 {
                in_docstring = !in_docstring;
            }
            continue;
        }
        let line = ATTRIBUTE_KEYWORD.replace(line, "${1}${2}_${3}");
        escaped.push_str(&PARAMETER_KEYWORD.replace_all(&line, "${1}${2}_${3}"));
    }

    escaped
}
