//! Anchored glob matching for channel and nick filters.
//!
//! Only two metacharacters are recognised:
//! - `*` matches zero or more characters
//! - `?` matches exactly one character
//!
//! Everything else is compared literally and case-sensitively. There is no
//! escaping and no character classes, so a filter like `#chan[1]` matches the
//! literal text `#chan[1]`.

/// Match `text` in full against `pattern`.
///
/// # Examples
///
/// ```
/// use slircd_push::state::glob_match;
///
/// assert!(glob_match("#team*", "#team-eng"));
/// assert!(glob_match("nick?", "nick1"));
/// assert!(!glob_match("nick?", "nickk2"));
/// assert!(!glob_match("#Team*", "#team"));
/// ```
pub fn glob_match(pattern: &str, text: &str) -> bool {
    // Fast path: most filters are plain names.
    if !pattern.contains(['*', '?']) {
        return pattern == text;
    }

    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position of the last `*` seen and the text offset it is currently absorbing up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, absorbed)) => {
                    // Let the star swallow one more character and retry.
                    p = star + 1;
                    t = absorbed + 1;
                    backtrack = Some((star, t));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_patterns_need_exact_match() {
        assert!(glob_match("#general", "#general"));
        assert!(!glob_match("#general", "#general2"));
        assert!(!glob_match("#general", "#GENERAL"));
        assert!(glob_match("", ""));
        assert!(!glob_match("", "x"));
    }

    #[test]
    fn star_matches_any_run() {
        assert!(glob_match("#team*", "#team-eng"));
        assert!(glob_match("#team*", "#teamx"));
        assert!(glob_match("#team*", "#team"));
        assert!(!glob_match("#team*", "#other"));
        assert!(glob_match("*", ""));
        assert!(glob_match("*bot", "irc-bot"));
        assert!(glob_match("a*b*c", "aXXbYYc"));
        assert!(!glob_match("a*b*c", "aXXbYY"));
    }

    #[test]
    fn question_mark_matches_one_char() {
        assert!(glob_match("nick?", "nick1"));
        assert!(!glob_match("nick?", "nickk2"));
        assert!(!glob_match("nick?", "nick"));
        assert!(glob_match("?ob", "bob"));
    }

    #[test]
    fn star_backtracks() {
        assert!(glob_match("*ab", "aab"));
        assert!(glob_match("*a*a", "banana"));
        assert!(!glob_match("*a*x", "banana"));
    }

    #[test]
    fn multibyte_text() {
        assert!(glob_match("caf?", "café"));
        assert!(glob_match("*é", "café"));
    }
}
