//! Latin transliteration used by the archive file name corrector.

use crate::dictionary::utils::{is_kana, to_hiragana};

/// Transliterates Japanese text into ASCII, separating words with hyphens.
///
/// Characters the implementation cannot transliterate may be returned
/// unchanged; the file name corrector replaces them afterwards.
pub trait Romanizer {
    fn transliterate(&self, text: &str) -> String;
}

/// Hepburn-style kana transliteration. Kanji and other scripts pass through.
#[derive(Debug, Default, Clone, Copy)]
pub struct KanaRomanizer;

const DIGRAPHS: &[(&str, &str)] = &[
    ("きゃ", "kya"), ("きゅ", "kyu"), ("きょ", "kyo"),
    ("しゃ", "sha"), ("しゅ", "shu"), ("しょ", "sho"), ("しぇ", "she"),
    ("ちゃ", "cha"), ("ちゅ", "chu"), ("ちょ", "cho"), ("ちぇ", "che"),
    ("にゃ", "nya"), ("にゅ", "nyu"), ("にょ", "nyo"),
    ("ひゃ", "hya"), ("ひゅ", "hyu"), ("ひょ", "hyo"),
    ("みゃ", "mya"), ("みゅ", "myu"), ("みょ", "myo"),
    ("りゃ", "rya"), ("りゅ", "ryu"), ("りょ", "ryo"),
    ("ぎゃ", "gya"), ("ぎゅ", "gyu"), ("ぎょ", "gyo"),
    ("じゃ", "ja"), ("じゅ", "ju"), ("じょ", "jo"), ("じぇ", "je"),
    ("びゃ", "bya"), ("びゅ", "byu"), ("びょ", "byo"),
    ("ぴゃ", "pya"), ("ぴゅ", "pyu"), ("ぴょ", "pyo"),
    ("ふぁ", "fa"), ("ふぃ", "fi"), ("ふぇ", "fe"), ("ふぉ", "fo"),
    ("てぃ", "ti"), ("でぃ", "di"), ("とぅ", "tu"), ("どぅ", "du"),
    ("うぃ", "wi"), ("うぇ", "we"), ("うぉ", "wo"),
    ("ゔぁ", "va"), ("ゔぃ", "vi"), ("ゔぇ", "ve"), ("ゔぉ", "vo"),
];

const MONOGRAPHS: &[(char, &str)] = &[
    ('あ', "a"), ('い', "i"), ('う', "u"), ('え', "e"), ('お', "o"),
    ('か', "ka"), ('き', "ki"), ('く', "ku"), ('け', "ke"), ('こ', "ko"),
    ('さ', "sa"), ('し', "shi"), ('す', "su"), ('せ', "se"), ('そ', "so"),
    ('た', "ta"), ('ち', "chi"), ('つ', "tsu"), ('て', "te"), ('と', "to"),
    ('な', "na"), ('に', "ni"), ('ぬ', "nu"), ('ね', "ne"), ('の', "no"),
    ('は', "ha"), ('ひ', "hi"), ('ふ', "fu"), ('へ', "he"), ('ほ', "ho"),
    ('ま', "ma"), ('み', "mi"), ('む', "mu"), ('め', "me"), ('も', "mo"),
    ('や', "ya"), ('ゆ', "yu"), ('よ', "yo"),
    ('ら', "ra"), ('り', "ri"), ('る', "ru"), ('れ', "re"), ('ろ', "ro"),
    ('わ', "wa"), ('ゐ', "i"), ('ゑ', "e"), ('を', "o"), ('ん', "n"),
    ('が', "ga"), ('ぎ', "gi"), ('ぐ', "gu"), ('げ', "ge"), ('ご', "go"),
    ('ざ', "za"), ('じ', "ji"), ('ず', "zu"), ('ぜ', "ze"), ('ぞ', "zo"),
    ('だ', "da"), ('ぢ', "ji"), ('づ', "zu"), ('で', "de"), ('ど', "do"),
    ('ば', "ba"), ('び', "bi"), ('ぶ', "bu"), ('べ', "be"), ('ぼ', "bo"),
    ('ぱ', "pa"), ('ぴ', "pi"), ('ぷ', "pu"), ('ぺ', "pe"), ('ぽ', "po"),
    ('ぁ', "a"), ('ぃ', "i"), ('ぅ', "u"), ('ぇ', "e"), ('ぉ', "o"),
    ('ゃ', "ya"), ('ゅ', "yu"), ('ょ', "yo"), ('ゎ', "wa"),
    ('ゕ', "ka"), ('ゖ', "ke"), ('ゔ', "vu"),
];

fn transliterate_kana_run(run: &[char]) -> String {
    let mut out = String::new();
    let mut geminate = false;
    let mut i = 0;
    while i < run.len() {
        let c = run[i];
        if c == 'っ' {
            geminate = true;
            i += 1;
            continue;
        }
        if c == 'ー' {
            if let Some(vowel) = out.chars().last().filter(|v| "aiueo".contains(*v)) {
                out.push(vowel);
            }
            i += 1;
            continue;
        }

        let syllable = run
            .get(i + 1)
            .and_then(|next| {
                let pair: String = [c, *next].iter().collect();
                DIGRAPHS.iter().find(|(k, _)| *k == pair).map(|(_, v)| (*v, 2))
            })
            .or_else(|| MONOGRAPHS.iter().find(|(k, _)| *k == c).map(|(_, v)| (*v, 1)));

        match syllable {
            Some((latin, width)) => {
                if geminate {
                    if let Some(first) = latin.chars().next().filter(|f| !"aiueon".contains(*f)) {
                        out.push(if latin.starts_with("ch") { 't' } else { first });
                    }
                    geminate = false;
                }
                out.push_str(latin);
                i += width;
            }
            None => {
                out.push('-');
                i += 1;
            }
        }
    }
    out
}

impl Romanizer for KanaRomanizer {
    fn transliterate(&self, text: &str) -> String {
        let hiragana = to_hiragana(text);
        let mut words: Vec<String> = Vec::new();
        let mut run: Vec<char> = Vec::new();
        let mut other = String::new();

        let flush_run = |run: &mut Vec<char>, words: &mut Vec<String>| {
            if !run.is_empty() {
                words.push(transliterate_kana_run(run));
                run.clear();
            }
        };

        for c in hiragana.chars() {
            if is_kana(c) && c != '・' && c != '〜' {
                if !other.is_empty() {
                    words.push(std::mem::take(&mut other));
                }
                run.push(c);
            } else {
                flush_run(&mut run, &mut words);
                other.push(c);
            }
        }
        flush_run(&mut run, &mut words);
        if !other.is_empty() {
            words.push(other);
        }

        words.join("-")
    }
}
