// Pattern Matching Utilities
// Shell-glob to regex translation for table and file name filtering

use log::debug;
use regex::Regex;

/// Translate a shell glob pattern into an anchored regular expression.
///
/// `*` matches any run of characters except `/`, `?` matches a single
/// character except `/`, and `[...]` / `[!...]` are character classes.
/// There is no way to quote metacharacters. An unterminated `[` degrades
/// to a literal `[` instead of failing, so any pattern translates.
pub fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let n = chars.len();
    let mut res = String::from("\\A");
    let mut i = 0;
    while i < n {
        let c = chars[i];
        i += 1;
        match c {
            '*' => res.push_str("[^/]*"),
            '?' => res.push_str("[^/]"),
            '[' => {
                let mut j = i;
                // A `]` directly after `[` or `[!` belongs to the class.
                if j < n && chars[j] == '!' {
                    j += 1;
                }
                if j < n && chars[j] == ']' {
                    j += 1;
                }
                while j < n && chars[j] != ']' {
                    j += 1;
                }
                if j >= n {
                    res.push_str("\\[");
                } else {
                    let stuff: String = chars[i..j].iter().collect();
                    let stuff = stuff.replace('\\', "\\\\");
                    i = j + 1;
                    res.push('[');
                    if let Some(rest) = stuff.strip_prefix('!') {
                        res.push('^');
                        push_class_content(&mut res, rest);
                    } else if let Some(rest) = stuff.strip_prefix('^') {
                        res.push_str("\\^");
                        push_class_content(&mut res, rest);
                    } else {
                        push_class_content(&mut res, &stuff);
                    }
                    res.push(']');
                }
            }
            _ => res.push_str(&regex::escape(&c.to_string())),
        }
    }
    res.push_str("\\z");
    res
}

// The regex crate does not follow the POSIX rule that a leading `]` is a
// literal class member, and it gives `[`, `&&` and `~~` a meaning inside
// classes. Escaping those characters keeps the plain shell semantics.
fn push_class_content(res: &mut String, content: &str) {
    for (k, ch) in content.chars().enumerate() {
        match ch {
            ']' if k == 0 => res.push_str("\\]"),
            '[' | '&' | '~' => {
                res.push('\\');
                res.push(ch);
            }
            _ => res.push(ch),
        }
    }
}

/// Check whether `name` fully matches the glob pattern.
pub fn glob_match(name: &str, pattern: &str) -> bool {
    match Regex::new(&glob_to_regex(pattern)) {
        Ok(re) => re.is_match(name),
        Err(e) => {
            debug!("Unusable glob pattern '{pattern}': {e}");
            false
        }
    }
}

/// Filter names down to those fully matching the glob pattern,
/// preserving the original order.
pub fn glob_filter<S: AsRef<str>>(names: &[S], pattern: &str) -> Vec<String> {
    let re = match Regex::new(&glob_to_regex(pattern)) {
        Ok(re) => re,
        Err(e) => {
            debug!("Unusable glob pattern '{pattern}': {e}");
            return Vec::new();
        }
    };
    names
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| re.is_match(name))
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern_matches_only_itself() {
        assert!(glob_match("layer.name+x", "layer.name+x"));
        assert!(!glob_match("layerxname+x", "layer.name+x"));
        assert!(!glob_match("layer.name+x!", "layer.name+x"));
        assert!(!glob_match("", "layer.name+x"));
    }

    #[test]
    fn test_empty_pattern_matches_only_empty_string() {
        assert!(glob_match("", ""));
        assert!(!glob_match("a", ""));
    }

    #[test]
    fn test_star_filter() {
        let names = ["a.txt", "b.txt", "c.csv"];
        assert_eq!(glob_filter(&names, "*.txt"), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_question_mark_filter() {
        let names = ["layer1", "layer2", "other"];
        assert_eq!(glob_filter(&names, "layer?"), vec!["layer1", "layer2"]);
    }

    #[test]
    fn test_star_does_not_cross_slashes() {
        assert!(glob_match("data.shp", "*"));
        assert!(!glob_match("dir/data.shp", "*"));
        assert!(!glob_match("a/b", "a?b"));
    }

    #[test]
    fn test_character_class() {
        assert!(glob_match("a", "[abc]"));
        assert!(glob_match("b", "[abc]"));
        assert!(glob_match("c", "[abc]"));
        assert!(!glob_match("d", "[abc]"));
        assert!(!glob_match("ab", "[abc]"));
    }

    #[test]
    fn test_negated_character_class() {
        assert!(glob_match("d", "[!abc]"));
        assert!(glob_match("/", "[!abc]"));
        assert!(!glob_match("a", "[!abc]"));
        assert!(!glob_match("", "[!abc]"));
        assert!(!glob_match("dd", "[!abc]"));
    }

    #[test]
    fn test_character_class_range() {
        assert!(glob_match("layer5", "layer[0-9]"));
        assert!(!glob_match("layerx", "layer[0-9]"));
    }

    #[test]
    fn test_unterminated_class_is_literal() {
        assert!(glob_match("[unterminated", "[unterminated"));
        assert!(!glob_match("u", "[unterminated"));
        assert!(!glob_match("unterminated", "[unterminated"));
    }

    #[test]
    fn test_bracket_directly_after_open_is_content() {
        // The first `]` after `[` or `[!` is part of the class.
        assert!(glob_match("]", "[]a]"));
        assert!(glob_match("a", "[]a]"));
        assert!(!glob_match("b", "[]a]"));
        assert!(glob_match("b", "[!]a]"));
        assert!(!glob_match("]", "[!]a]"));
    }

    #[test]
    fn test_leading_caret_in_class_is_literal() {
        assert!(glob_match("^", "[^]"));
        assert!(!glob_match("a", "[^]"));
    }

    #[test]
    fn test_backslash_in_class_is_literal() {
        assert!(glob_match("\\", "[\\]"));
        assert!(!glob_match("n", "[\\]"));
    }

    #[test]
    fn test_filter_preserves_order() {
        let names = ["c1", "a1", "b1", "x"];
        assert_eq!(glob_filter(&names, "?1"), vec!["c1", "a1", "b1"]);
    }

    #[test]
    fn test_translation_is_anchored() {
        let re = glob_to_regex("*.txt");
        assert!(re.starts_with("\\A"));
        assert!(re.ends_with("\\z"));
        assert!(!glob_match("a.txt.bak", "*.txt"));
        assert!(!glob_match("xa.txt", "a.txt"));
    }
}
