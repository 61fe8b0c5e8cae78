//! Character-class helpers shared by validators, parsers and serializers.

/// Hiragana letters `ぁ`..`ゖ` plus the iteration marks `ゝ`/`ゞ`.
pub fn is_hiragana(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{3096}' | '\u{309D}' | '\u{309E}')
}

/// Katakana letters `ァ`..`ヺ` plus the iteration marks `ヽ`/`ヾ`.
pub fn is_katakana(c: char) -> bool {
    matches!(c, '\u{30A1}'..='\u{30FA}' | '\u{30FD}' | '\u{30FE}')
}

/// Marks that appear inside kana words without being letters.
pub fn is_kana_mark(c: char) -> bool {
    matches!(c, 'ー' | '〜' | '・')
}

/// Hiragana, katakana or one of the kana-word marks.
pub fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_katakana(c) || is_kana_mark(c)
}

/// Whether every character of `s` is kana. Empty strings are not.
pub fn is_kana_str(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_kana)
}

/// Folds katakana letters that have a hiragana counterpart into hiragana.
pub fn to_hiragana(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{30A1}'..='\u{30F6}' | '\u{30FD}' | '\u{30FE}' => {
                char::from_u32(c as u32 - 0x60).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// Case- and kana-unified form of a character, used when comparing
/// which characters a dictionary distinguishes.
pub fn unify_char(c: char) -> char {
    let folded = match c {
        '\u{30A1}'..='\u{30F6}' | '\u{30FD}' | '\u{30FE}' => {
            char::from_u32(c as u32 - 0x60).unwrap_or(c)
        }
        _ => c,
    };
    folded.to_lowercase().next().unwrap_or(folded)
}

/// Whether `value` is delimited as a regex pattern (`/…/`).
pub fn is_regex_value(value: &str) -> bool {
    value.len() >= 2 && value.starts_with('/') && value.ends_with('/')
}

/// Strips the `/…/` delimiters of a regex value.
pub fn regex_interior(value: &str) -> &str {
    if is_regex_value(value) {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Characters a CSV/text source may carry: every C0 control except LF is dropped.
pub fn strip_control_characters(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{0}'..='\u{9}' | '\u{B}'..='\u{1F}' | '\u{7F}'))
        .collect()
}

/// Normalizes CRLF and lone CR to LF.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Splits `text` on LF, dropping the empty tail produced by a final newline.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Joins lines with CRLF, terminating the last one as well.
pub fn join_crlf<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push_str("\r\n");
    }
    out
}

/// Collapses runs of whitespace (including newlines) into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
