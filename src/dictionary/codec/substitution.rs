//! Safety reduction for legacy targets.
//!
//! A reduction folds characters a target cannot hold into representable
//! equivalents using a fixed table, then probes every remaining character.
//! Answers that still fail the probe are rejected by the serializers; other
//! text gets [`SUBSTITUTE`] in place of each unrepresentable character.

use encoding_rs::SHIFT_JIS;

use crate::dictionary::utils::to_hiragana;

/// Stand-in for characters that survive the table but cannot be encoded.
pub const SUBSTITUTE: char = '〓';

/// Folds toward Shift_JIS (JIS X 0208). Kana without a JIS X 0208 form
/// become katakana.
pub const SHIFT_JIS_TABLE: &[(char, &str)] = &[
    ('ゔ', "ヴ"),
    ('ゕ', "ヵ"),
    ('ゖ', "ヶ"),
    ('ヷ', "ヴァ"),
    ('ヸ', "ヴィ"),
    ('ヹ', "ヴェ"),
    ('ヺ', "ヴォ"),
    ('ゟ', "より"),
    ('ヿ', "コト"),
    ('ㇰ', "ク"),
    ('ㇱ', "シ"),
    ('ㇲ', "ス"),
    ('ㇳ', "ト"),
    ('ㇴ', "ヌ"),
    ('ㇵ', "ハ"),
    ('ㇶ', "ヒ"),
    ('ㇷ', "フ"),
    ('ㇸ', "ヘ"),
    ('ㇹ', "ホ"),
    ('ㇺ', "ム"),
    ('ㇻ', "ラ"),
    ('ㇼ', "リ"),
    ('ㇽ', "ル"),
    ('ㇾ', "レ"),
    ('ㇿ', "ロ"),
    ('～', "〜"),
    ('−', "－"),
    ('—', "―"),
    ('‖', "∥"),
    ('¢', "￠"),
    ('£', "￡"),
    ('¬', "￢"),
];

/// Folds toward the hiragana-only picture-game alphabet. `ゔ` has no
/// Shift_JIS form and is written as the katakana letter the alphabet
/// folds back on input.
pub const HIRAGANA_TABLE: &[(char, &str)] = &[
    ('ゔ', "ヴ"),
    ('ゕ', "か"),
    ('ゖ', "け"),
    ('ヷ', "ヴぁ"),
    ('ヸ', "ヴぃ"),
    ('ヹ', "ヴぇ"),
    ('ヺ', "ヴぉ"),
    ('〜', "ー"),
    ('～', "ー"),
];

/// A character a target can represent.
pub type Probe = fn(char) -> bool;

/// Whether `c` encodes to Shift_JIS without errors.
pub fn shift_jis_probe(c: char) -> bool {
    let mut buf = [0u8; 4];
    let (_, _, had_errors) = SHIFT_JIS.encode(c.encode_utf8(&mut buf));
    !had_errors
}

/// A target: its substitution table, its probe, and whether kana are first
/// folded to hiragana.
#[derive(Debug, Clone, Copy)]
pub struct Reduction {
    pub table: &'static [(char, &'static str)],
    pub probe: Probe,
    pub fold_to_hiragana: bool,
}

impl Reduction {
    pub const SHIFT_JIS: Reduction = Reduction {
        table: SHIFT_JIS_TABLE,
        probe: shift_jis_probe,
        fold_to_hiragana: false,
    };

    /// Applies the substitution table.
    pub fn apply_table(&self, text: &str) -> String {
        let text = if self.fold_to_hiragana {
            to_hiragana(text)
        } else {
            text.to_string()
        };
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match self.table.iter().find(|(from, _)| *from == c) {
                Some((_, to)) => out.push_str(to),
                None => out.push(c),
            }
        }
        out
    }

    /// The reduced form of `text`, or `None` if a character remains
    /// unrepresentable.
    pub fn reduce(&self, text: &str) -> Option<String> {
        let reduced = self.apply_table(text);
        reduced.chars().all(self.probe).then_some(reduced)
    }

    /// The reduced form of `text` with [`SUBSTITUTE`] in place of every
    /// unrepresentable character.
    pub fn reduce_lossy(&self, text: &str) -> String {
        self.apply_table(text)
            .chars()
            .map(|c| if (self.probe)(c) { c } else { SUBSTITUTE })
            .collect()
    }
}
