use crate::error::{Result, TagSemverError};
use regex::Regex;
use semver::Version;
use serde::ser::{Serialize, Serializer};
use std::fmt;

/// The three tags published for a release: `vMAJOR`, `vMAJOR.MINOR` and the
/// full `vMAJOR.MINOR.PATCH`. All three always point at the same commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTriple {
    pub major: String,
    pub minor: String,
    pub full: String,
}

impl TagTriple {
    /// Builds the triple from the numeric components of `version`.
    pub fn from_version(version: &Version) -> Self {
        TagTriple {
            major: format!("v{}", version.major),
            minor: format!("v{}.{}", version.major, version.minor),
            full: format!("v{}.{}.{}", version.major, version.minor, version.patch),
        }
    }

    /// Tag names in publish order.
    pub fn names(&self) -> [&str; 3] {
        [&self.major, &self.minor, &self.full]
    }
}

impl fmt::Display for TagTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.major, self.minor, self.full)
    }
}

impl Serialize for TagTriple {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// Ref glob as understood by `git ls-remote <pattern>`.
///
/// The pattern is matched against the tail of the full ref name, starting at
/// the beginning or right after a `/`, so `v*` matches `refs/tags/v1.2.3` but
/// `1*` does not.
#[derive(Debug, Clone)]
pub struct TagGlob {
    pattern: String,
    regex: Regex,
}

impl TagGlob {
    pub fn new(pattern: &str) -> Result<Self> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut translated = String::with_capacity(pattern.len() * 2);
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '*' => translated.push_str(".*"),
                '?' => translated.push('.'),
                '[' => match translate_class(&chars[i..]) {
                    Some((class, consumed)) => {
                        translated.push_str(&class);
                        i += consumed;
                        continue;
                    }
                    None => translated.push_str(r"\["),
                },
                '\\' if i + 1 < chars.len() => {
                    i += 1;
                    translated.push_str(&regex::escape(&chars[i].to_string()));
                }
                other => translated.push_str(&regex::escape(&other.to_string())),
            }
            i += 1;
        }
        let regex = Regex::new(&format!("^(?:.*/)?{}$", translated)).map_err(|e| {
            TagSemverError::config(format!("Invalid tag pattern '{}': {}", pattern, e))
        })?;

        Ok(TagGlob {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether a full ref name such as `refs/tags/v1.0.0` matches.
    pub fn matches_ref(&self, reference: &str) -> bool {
        self.regex.is_match(reference)
    }

    /// Whether the tag `name` (without `refs/tags/`) matches.
    pub fn matches_tag(&self, name: &str) -> bool {
        self.matches_ref(&format!("refs/tags/{}", name))
    }
}

/// Translate a bracket expression starting at `chars[0] == '['`.
///
/// Supports `[abc]`, ranges, `[!...]`/`[^...]` negation, a leading `]` as a
/// literal and POSIX classes such as `[[:digit:]]`. Returns the regex class
/// and the number of pattern characters consumed, or `None` when the bracket
/// is never closed (git then treats `[` literally).
fn translate_class(chars: &[char]) -> Option<(String, usize)> {
    let mut class = String::from("[");
    let mut i = 1;
    if matches!(chars.get(i), Some('!') | Some('^')) {
        class.push('^');
        i += 1;
    }
    let first = i;
    while i < chars.len() {
        let c = chars[i];
        if c == ']' && i > first {
            class.push(']');
            return Some((class, i + 1));
        }
        if c == '[' && chars.get(i + 1) == Some(&':') {
            let rest: String = chars[i..].iter().collect();
            if let Some(end) = rest[2..].find(":]") {
                let posix = &rest[..end + 4];
                class.push_str(posix);
                i += posix.chars().count();
                continue;
            }
        }
        match c {
            '\\' | '[' | ']' | '^' | '&' | '~' => {
                class.push('\\');
                class.push(c);
            }
            _ => class.push(c),
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_from_version() {
        let triple = TagTriple::from_version(&Version::new(2, 0, 0));
        assert_eq!(triple.names(), ["v2", "v2.0", "v2.0.0"]);
    }

    #[test]
    fn test_triple_prefixes_nest() {
        let triple = TagTriple::from_version(&Version::new(10, 4, 17));
        assert!(triple.minor.starts_with(&triple.major));
        assert!(triple.full.starts_with(&triple.minor));
    }

    #[test]
    fn test_triple_serializes_as_array() {
        let triple = TagTriple::from_version(&Version::new(1, 2, 4));
        let json = serde_json::to_string(&triple).unwrap();
        assert_eq!(json, r#"["v1","v1.2","v1.2.4"]"#);
    }

    #[test]
    fn test_triple_display() {
        let triple = TagTriple::from_version(&Version::new(0, 1, 0));
        assert_eq!(triple.to_string(), "v0, v0.1, v0.1.0");
    }

    #[test]
    fn test_glob_matches_tag_tail() {
        let glob = TagGlob::new("v*").unwrap();
        assert!(glob.matches_tag("v1.2.3"));
        assert!(glob.matches_tag("v"));
        assert!(glob.matches_tag("vfoo"));
        assert!(!glob.matches_tag("release-1.0.0"));
        assert!(!glob.matches_tag("1.0.0"));
    }

    #[test]
    fn test_glob_matches_full_ref() {
        let glob = TagGlob::new("refs/tags/v1.*").unwrap();
        assert!(glob.matches_ref("refs/tags/v1.0.0"));
        assert!(!glob.matches_ref("refs/tags/v2.0.0"));
    }

    #[test]
    fn test_glob_bracket_classes() {
        let glob = TagGlob::new("v[0-9]*").unwrap();
        assert!(glob.matches_tag("v1.2.3"));
        assert!(!glob.matches_tag("vnext"));

        let negated = TagGlob::new("v[!0-9]*").unwrap();
        assert!(negated.matches_tag("vnext"));
        assert!(!negated.matches_tag("v1.2.3"));

        let posix = TagGlob::new("v[[:digit:]].*").unwrap();
        assert!(posix.matches_tag("v2.0.0"));
        assert!(!posix.matches_tag("vx.0.0"));
    }

    #[test]
    fn test_glob_unclosed_bracket_is_literal() {
        let glob = TagGlob::new("v[1").unwrap();
        assert!(glob.matches_tag("v[1"));
        assert!(!glob.matches_tag("v1"));
    }

    #[test]
    fn test_glob_escaped_wildcard_is_literal() {
        let glob = TagGlob::new(r"v\*").unwrap();
        assert!(glob.matches_tag("v*"));
        assert!(!glob.matches_tag("v1"));
    }

    #[test]
    fn test_glob_escapes_regex_metacharacters() {
        let glob = TagGlob::new("v1.?").unwrap();
        assert!(glob.matches_tag("v1.2"));
        assert!(!glob.matches_tag("v1x2"));
        assert_eq!(glob.pattern(), "v1.?");
    }
}
