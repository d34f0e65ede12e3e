//! Soul templates: path patterns with named key placeholders.
//!
//! Pattern syntax:
//! - literal text is copied verbatim
//! - `:name` is a key that matches a non-empty run without `/`
//! - `*name` is a rest key that matches everything to the end of the soul
//!   and must be the last part of the template
//!
//! When a placeholder is followed by the template's final literal, that
//! literal must be a suffix of the soul; otherwise the placeholder ends at
//! the first occurrence of the following literal.

use std::collections::BTreeMap;
use std::fmt;

use nab_types::Soul;

use crate::error::{Result, SchemaError};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Part {
    Literal(String),
    Key(String),
    Rest(String),
}

/// A parsed soul pattern.
#[derive(Clone, PartialEq, Eq)]
pub struct SoulTemplate {
    pattern: String,
    parts: Vec<Part>,
}

impl SoulTemplate {
    /// Parse a template pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use nab_schema::SoulTemplate;
    ///
    /// let t = SoulTemplate::parse("nab/things/:thingid").unwrap();
    /// assert_eq!(t.soul(&[("thingid", "abc")]).unwrap().as_str(), "nab/things/abc");
    /// assert!(t.is_match("nab/things/abc"));
    /// assert!(!t.is_match("nab/t/abc"));
    /// ```
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: &str| SchemaError::InvalidTemplate {
            template: pattern.to_string(),
            reason: reason.to_string(),
        };
        if pattern.is_empty() {
            return Err(invalid("template must not be empty"));
        }

        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch != ':' && ch != '*' {
                literal.push(ch);
                continue;
            }
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    name.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                return Err(invalid("placeholder name must not be empty"));
            }
            if !literal.is_empty() {
                parts.push(Part::Literal(std::mem::take(&mut literal)));
            } else if matches!(parts.last(), Some(Part::Key(_) | Part::Rest(_))) {
                return Err(invalid("placeholders must be separated by a literal"));
            }
            let taken = parts
                .iter()
                .any(|p| matches!(p, Part::Key(n) | Part::Rest(n) if *n == name));
            if taken {
                return Err(invalid(&format!("duplicate placeholder {name:?}")));
            }
            parts.push(if ch == ':' {
                Part::Key(name)
            } else {
                Part::Rest(name)
            });
        }
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        let rest_position = parts.iter().position(|p| matches!(p, Part::Rest(_)));
        if let Some(pos) = rest_position {
            if pos != parts.len() - 1 {
                return Err(invalid("rest placeholder must be last"));
            }
        }

        Ok(Self {
            pattern: pattern.to_string(),
            parts,
        })
    }

    /// The pattern this template was parsed from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Names of the key fields this template requires, in pattern order.
    pub fn keys(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Key(n) | Part::Rest(n) => Some(n.as_str()),
                Part::Literal(_) => None,
            })
            .collect()
    }

    /// Fill the template from key fields.
    ///
    /// Values are inserted verbatim; the soul is fully determined by them.
    pub fn soul(&self, keys: &[(&str, &str)]) -> Result<Soul> {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(l) => out.push_str(l),
                Part::Key(name) | Part::Rest(name) => {
                    let value = keys
                        .iter()
                        .find(|(k, _)| k == name)
                        .map(|(_, v)| *v)
                        .ok_or_else(|| SchemaError::MissingKey {
                            template: self.pattern.clone(),
                            key: name.clone(),
                        })?;
                    if value.is_empty() {
                        return Err(SchemaError::EmptyKey {
                            template: self.pattern.clone(),
                            key: name.clone(),
                        });
                    }
                    out.push_str(value);
                }
            }
        }
        Ok(Soul::new(out))
    }

    /// Returns `true` if `soul` could have been built from this template.
    pub fn is_match(&self, soul: &str) -> bool {
        self.extract(soul).is_some()
    }

    /// Recover the key fields of a soul built from this template.
    pub fn extract(&self, soul: &str) -> Option<BTreeMap<String, String>> {
        let mut keys = BTreeMap::new();
        let mut rest = soul;
        for (i, part) in self.parts.iter().enumerate() {
            match part {
                Part::Literal(l) => {
                    rest = rest.strip_prefix(l.as_str())?;
                }
                Part::Rest(name) => {
                    if rest.is_empty() {
                        return None;
                    }
                    keys.insert(name.clone(), rest.to_string());
                    rest = "";
                }
                Part::Key(name) => {
                    let end = match self.parts.get(i + 1) {
                        None => rest.len(),
                        Some(Part::Literal(next)) if i + 2 == self.parts.len() => {
                            if !rest.ends_with(next.as_str()) {
                                return None;
                            }
                            rest.len() - next.len()
                        }
                        Some(Part::Literal(next)) => rest.find(next.as_str())?,
                        Some(_) => return None,
                    };
                    let value = &rest[..end];
                    if value.is_empty() || value.contains('/') {
                        return None;
                    }
                    keys.insert(name.clone(), value.to_string());
                    rest = &rest[end..];
                }
            }
        }
        rest.is_empty().then_some(keys)
    }
}

impl fmt::Debug for SoulTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SoulTemplate({})", self.pattern)
    }
}

impl fmt::Display for SoulTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
