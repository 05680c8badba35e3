//! Structured member documentation.
//!
//! Binding members document themselves as
//!
//! ```text
//! @annotation
//! signature(self, arg: Type) -> Return
//!
//! Body text.
//! ```
//!
//! Annotation lines start with `@` and are optional. The signature is the
//! first non-annotation line and must be followed by a blank line.

use once_cell::sync::Lazy;
use owlgen_core::ReflectionFormatError;
use regex::Regex;
use std::collections::{HashMap, HashSet};

#[allow(clippy::expect_used)] // Safe: literal pattern
static VARIANT_DOC_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+): (.*)$").expect("variant doc pattern"));

/// Parsed structured documentation of a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDoc {
    pub annotations: Vec<String>,
    pub signature: String,
    pub body: Vec<String>,
}

/// Parse the documentation of `member`.
pub fn parse_member_doc(member: &str, doc: Option<&str>) -> Result<MemberDoc, ReflectionFormatError> {
    let doc = doc
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ReflectionFormatError::Undocumented {
            member: member.to_string(),
        })?;

    let lines: Vec<&str> = doc.lines().collect();
    if lines.len() < 3 {
        return Err(ReflectionFormatError::TooShort {
            member: member.to_string(),
            lines: lines.len(),
        });
    }

    let signature_at = lines
        .iter()
        .position(|line| !line.starts_with('@'))
        .ok_or_else(|| ReflectionFormatError::MissingSignature {
            member: member.to_string(),
        })?;

    match lines.get(signature_at + 1) {
        Some(line) if line.trim().is_empty() => {}
        _ => {
            return Err(ReflectionFormatError::MissingSeparator {
                member: member.to_string(),
            });
        }
    }

    let signature = lines[signature_at].trim();
    if signature.is_empty() {
        return Err(ReflectionFormatError::MissingSignature {
            member: member.to_string(),
        });
    }

    Ok(MemberDoc {
        annotations: lines[..signature_at].iter().map(|l| l.to_string()).collect(),
        signature: signature.to_string(),
        body: lines[signature_at + 2..].iter().map(|l| l.to_string()).collect(),
    })
}

/// A type's documentation with per-variant lines split out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitDoc {
    /// Lines that stay on the type
    pub lines: Vec<String>,
    /// Recovered documentation keyed by variant name
    pub variants: HashMap<String, String>,
}

/// Split `<Variant>: <description>` lines out of a type's documentation.
///
/// Only lines naming one of `variants` are taken; anything else that happens
/// to look like `word: text` stays in the type's documentation.
pub fn split_variant_docs<'a>(doc: &str, variants: impl IntoIterator<Item = &'a str>) -> SplitDoc {
    let variants: HashSet<&str> = variants.into_iter().collect();
    let mut split = SplitDoc::default();

    for line in doc.lines() {
        let recovered = VARIANT_DOC_LINE
            .captures(line)
            .and_then(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
            .filter(|(name, _)| variants.contains(name));

        match recovered {
            Some((name, description)) => {
                split.variants.insert(name.to_string(), description.to_string());
            }
            None => split.lines.push(line.to_string()),
        }
    }

    split
}
