//! Inteligenceω serializer.

use log::{debug, info};

use super::{
    ensure_not_empty, finish_lines, reduce_answers, reduce_answers_with_bonuses, reduce_text, report_unserializable,
};
use crate::dictionary::codec::substitution::Reduction;
use crate::dictionary::context::Context;
use crate::dictionary::format::inteligenceo::{is_allowed_reading, AnswerType, QuestionType, QUESTION_OPTIONS};
use crate::dictionary::types::error::Result;
use crate::dictionary::types::formats::{FormatType, InteligenceoMode, SerializeOptions, SerializedDictionary};
use crate::dictionary::types::models::{Dictionary, Word};
use crate::dictionary::utils::is_regex_value;
use crate::dictionary::validate::file_location::LOCAL_TAG_PREFIX;

pub const MIME: &str = "text/plain; charset=Shift_JIS";

/// Quiz when any word needs a question line, shiritori otherwise.
pub fn infer_mode(dictionary: &Dictionary) -> InteligenceoMode {
    let needs_quiz = dictionary.words().iter().any(|w| {
        w.question().is_some() || w.image().is_some() || w.audio().is_some() || w.is_selection()
    });
    if needs_quiz {
        InteligenceoMode::Quiz
    } else {
        InteligenceoMode::Shiritori
    }
}

/// Commas separate tokens; a literal one becomes its full-width form.
fn escape_commas(text: &str) -> String {
    text.replace(',', "，")
}

pub fn serialize(
    dictionary: &Dictionary,
    options: &SerializeOptions,
    ctx: &mut Context,
) -> Result<SerializedDictionary> {
    info!("Serializing {} words as Inteligenceω", dictionary.len());
    ensure_not_empty(dictionary)?;
    let mode = options.inteligenceo_mode.unwrap_or_else(|| infer_mode(dictionary));
    debug!("Inteligenceω mode: {:?}", mode);

    let reduction = Reduction::SHIFT_JIS;
    let mut lines = Vec::new();
    for word in dictionary.words() {
        let rendered = match mode {
            InteligenceoMode::Shiritori => shiritori_line(word, &reduction).map(|l| vec![l]),
            InteligenceoMode::Quiz => quiz_lines(word, &reduction, ctx),
        };
        match rendered {
            Some(rendered) => lines.extend(rendered),
            None => report_unserializable(word, ctx),
        }
    }

    finish_lines(lines, dictionary, FormatType::Inteligenceo, MIME)
}

// ---------------------------------------------------------------------------
// Shiritori
// ---------------------------------------------------------------------------

fn is_shiritori_reading(reading: &str) -> bool {
    !reading.contains([',', '[', '|', ']'])
        && !reading.starts_with('@')
        && !reading.chars().all(|c| c.is_ascii_digit())
        && !is_regex_value(reading)
        && is_allowed_reading(reading)
}

/// The level whose inverse is closest to `weight`.
pub fn weight_to_level(weight: &str) -> Option<u32> {
    let weight: f64 = weight.parse().ok()?;
    (weight > 0.0).then(|| (1.0 / weight).round().max(1.0) as u32)
}

fn shiritori_line(word: &Word, reduction: &Reduction) -> Option<String> {
    let readings = reduce_answers(word, reduction, is_shiritori_reading);
    if readings.is_empty() {
        return None;
    }

    let headword = escape_commas(&reduce_text(word.text(), reduction));
    let mut tokens = vec![headword.clone()];
    if readings != [headword] {
        tokens.extend(readings);
    }
    if let Some(level) = word.weight().and_then(weight_to_level) {
        tokens.push(level.to_string());
    }
    if let Some(description) = word.description() {
        let note = escape_commas(&reduce_text(&description.source, reduction));
        if !note.is_empty() {
            tokens.push(format!("@{}", note));
        }
    }
    Some(tokens.join(","))
}

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

/// A media reference as written on a question line.
fn media_token(location: &str, reduction: &Reduction) -> String {
    let name = location.strip_prefix(LOCAL_TAG_PREFIX).unwrap_or(location);
    reduction.reduce_lossy(&name.replace(',', "%2C"))
}

fn question_line(word: &Word, reduction: &Reduction, ctx: &mut Context) -> String {
    let question = word.question().unwrap_or_else(|| word.text());
    let question = escape_commas(&reduce_text(question, reduction));

    let (kind, media) = match (word.image(), word.audio()) {
        (Some(image), _) => (QuestionType::Image, Some(image)),
        (None, Some(audio)) => (QuestionType::Audio, Some(audio)),
        (None, None) => (QuestionType::Text, None),
    };
    if word.image().is_some() && word.audio().is_some() {
        ctx.diagnostics.notice(format!(
            "`{}`: only one media file fits a question; the audio was omitted",
            word.text()
        ));
    }
    if word.video().is_some() {
        ctx.diagnostics
            .notice(format!("`{}`: video cannot be represented; it was omitted", word.text()));
    }

    let mut tokens = vec!["Q".to_string(), (kind as u8).to_string(), question];
    if let Some(media) = media {
        tokens.push(media_token(media, reduction));
    }
    if let Some(specifics) = word.specifics() {
        for (name, key) in QUESTION_OPTIONS {
            for value in specifics.get_all(key) {
                tokens.push(if value.is_empty() {
                    name.to_string()
                } else {
                    format!("{}={}", name, value)
                });
            }
        }
    }
    tokens.join(",")
}

fn is_free_text_token(answer: &str) -> bool {
    !answer.contains(',')
        && (is_regex_value(answer) || (!answer.contains(['[', ']']) && !answer.starts_with('\\')))
}

fn free_text_answer(word: &Word, reduction: &Reduction) -> Option<String> {
    let answers = reduce_answers_with_bonuses(word, reduction, is_free_text_token);
    if answers.is_empty() {
        return None;
    }
    let mut tokens = vec!["A".to_string(), (AnswerType::FreeText as u8).to_string()];
    tokens.extend(answers.iter().map(|(answer, _)| answer.clone()));

    let bonuses: Vec<i64> = answers.iter().map(|(_, bonus)| *bonus).collect();
    if let Some(last) = bonuses.iter().rposition(|b| *b != 0) {
        tokens.extend(bonuses[..=last].iter().map(|b| format!("\\{}", b)));
    }
    Some(tokens.join(","))
}

fn selection_answer(word: &Word, reduction: &Reduction) -> Option<String> {
    let render = |value: &str| escape_commas(&reduction.reduce_lossy(value));
    let options: Vec<String> = word.options().iter().map(|o| render(o)).collect();
    let answers: Vec<String> = word.answers().iter().map(|a| render(a)).collect();
    if answers.is_empty() {
        return None;
    }
    let require_all = word
        .specifics()
        .is_some_and(|s| s.contains("require-all-right"));

    let (kind, tokens) = if require_all && answers == options {
        (AnswerType::OrderedChoice, options)
    } else if require_all || answers.len() > 1 {
        let distractors: Vec<String> = options.into_iter().filter(|o| !answers.contains(o)).collect();
        let mut tokens = answers;
        if !distractors.is_empty() {
            tokens.push(String::new());
            tokens.extend(distractors);
        }
        (AnswerType::MustAll, tokens)
    } else {
        let correct = answers[0].clone();
        let mut tokens = answers;
        tokens.extend(options.into_iter().filter(|o| *o != correct));
        (AnswerType::SingleChoice, tokens)
    };

    let mut line = vec!["A".to_string(), (kind as u8).to_string()];
    line.extend(tokens);
    Some(line.join(","))
}

fn quiz_lines(word: &Word, reduction: &Reduction, ctx: &mut Context) -> Option<Vec<String>> {
    let answer = if word.is_selection() {
        selection_answer(word, reduction)
    } else {
        free_text_answer(word, reduction)
    }?;
    Some(vec![question_line(word, reduction, ctx), answer])
}
