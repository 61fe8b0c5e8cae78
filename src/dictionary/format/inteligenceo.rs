//! Inteligenceω parser.
//!
//! Two sub-grammars share the file extension:
//!
//! - **Shiritori**: `headword,tag,tag,...`. A numeric tag is a level (its
//!   inverse becomes `weight`), `@note` becomes `description`, and `[`, `|`,
//!   `]` switch later tags into the prefix, infix or suffix set. Answers are
//!   the product prefix × infix × suffix.
//! - **Quiz**: a `Q,` line followed by its `A,` line. The question type code
//!   selects text, audio or image; the answer type code selects free text,
//!   single choice, ordered choice or must-all choice.
//!
//! Lines starting with `//` are comments in both.

use log::{debug, info, trace};
use regex::escape;

use super::finish;
use crate::dictionary::codec::encoding::decode_legacy;
use crate::dictionary::context::Context;
use crate::dictionary::types::error::{DictionaryError, Result};
use crate::dictionary::types::formats::{InteligenceoMode, ParseOptions};
use crate::dictionary::types::models::{Dictionary, FieldMap, FieldName, SELECTION};
use crate::dictionary::utils::{is_regex_value, normalize_newlines, regex_interior, split_lines, to_hiragana};
use crate::dictionary::validate::number::{self, NumberKind};
use crate::dictionary::validate::specifics::Specifics;

/// Readings may not start with these.
pub const FORBIDDEN_STARTS: &[&str] = &["ん", "ー"];
/// Readings may not end with these.
pub const FORBIDDEN_ENDS: &[&str] = &["っー", "ゎー", "んー", "ーー"];

/// Question option names and the `specifics` keys they map to.
pub const QUESTION_OPTIONS: &[(&str, &str)] = &[
    ("start", "start"),
    ("repeat", "repeat"),
    ("length", "length"),
    ("speed", "speed"),
    ("zoom", "magnification"),
    ("last-zoom", "last-magnification"),
    ("pixelization", "pixelization"),
    ("score", "score"),
    ("last-score", "last-score"),
];

/// A numbered, comment-free input line.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    no: usize,
    text: &'a str,
}

fn content_lines(text: &str) -> Vec<Line<'_>> {
    split_lines(text)
        .into_iter()
        .enumerate()
        .map(|(idx, text)| Line { no: idx + 1, text: text.trim() })
        .filter(|l| !l.text.is_empty() && !l.text.starts_with("//"))
        .collect()
}

fn syntax(line: usize, message: impl std::fmt::Display) -> DictionaryError {
    DictionaryError::Syntax(format!("line {}: {}", line, message))
}

fn has_prefix_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Quiz when the first content line is a `Q,` or `A,` line.
pub fn sniff_mode(lines: &[&str]) -> InteligenceoMode {
    match lines.first() {
        Some(line) if has_prefix_ignore_case(line, "Q,") || has_prefix_ignore_case(line, "A,") => {
            InteligenceoMode::Quiz
        }
        _ => InteligenceoMode::Shiritori,
    }
}

pub fn parse(input: &[u8], options: &ParseOptions, ctx: &mut Context) -> Result<Dictionary> {
    info!("Parsing Inteligenceω dictionary ({} bytes)", input.len());
    let text = normalize_newlines(&decode_legacy(input)?);
    let lines = content_lines(&text);

    let mode = options.inteligenceo_mode.unwrap_or_else(|| {
        let texts: Vec<&str> = lines.iter().map(|l| l.text).collect();
        sniff_mode(&texts)
    });
    debug!("Inteligenceω mode: {:?}", mode);

    let mut dictionary = Dictionary::new();
    match mode {
        InteligenceoMode::Shiritori => parse_shiritori(&lines, &mut dictionary, ctx)?,
        InteligenceoMode::Quiz => parse_quiz(&lines, &mut dictionary, ctx)?,
    }

    finish(&mut dictionary, options, ctx)?;
    info!("Parsed {} words", dictionary.len());
    Ok(dictionary)
}

// ---------------------------------------------------------------------------
// Shiritori
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AffixSet {
    Prefix,
    Infix,
    Suffix,
}

/// Whether a reading passes the start/end restrictions.
pub fn is_allowed_reading(reading: &str) -> bool {
    let hiragana = to_hiragana(reading);
    !FORBIDDEN_STARTS.iter().any(|s| hiragana.starts_with(s))
        && !FORBIDDEN_ENDS.iter().any(|s| hiragana.ends_with(s))
}

/// Level `n` as a weight of `1/n`.
pub fn level_to_weight(level: u32) -> String {
    number::render(1.0 / f64::from(level), NumberKind::Real)
}

fn parse_shiritori(lines: &[Line], dictionary: &mut Dictionary, ctx: &mut Context) -> Result<()> {
    for line in lines {
        let mut tokens = line.text.split(',').map(str::trim);
        let headword = tokens.next().unwrap_or_default();
        if headword.is_empty() {
            return Err(syntax(line.no, "missing headword"));
        }

        let mut prefixes: Vec<&str> = Vec::new();
        let mut infixes: Vec<&str> = Vec::new();
        let mut suffixes: Vec<&str> = Vec::new();
        let mut current = AffixSet::Infix;
        let mut weight = None;
        let mut note = None;

        for token in tokens.filter(|t| !t.is_empty()) {
            match token {
                "[" => current = AffixSet::Prefix,
                "|" => current = AffixSet::Infix,
                "]" => current = AffixSet::Suffix,
                _ if token.starts_with('@') => {
                    note.get_or_insert(token[1..].trim());
                }
                _ if token.chars().all(|c| c.is_ascii_digit()) => match token.parse::<u32>() {
                    Ok(level) if level > 0 => weight = Some(level_to_weight(level)),
                    _ => ctx.diagnostics.error(format!(
                        "line {}: level `{}` is not a positive integer; it was ignored",
                        line.no, token
                    )),
                },
                _ => match current {
                    AffixSet::Prefix => prefixes.push(token),
                    AffixSet::Infix => infixes.push(token),
                    AffixSet::Suffix => suffixes.push(token),
                },
            }
        }

        if infixes.is_empty() {
            infixes.push(headword);
        }
        if prefixes.is_empty() {
            prefixes.push("");
        }
        if suffixes.is_empty() {
            suffixes.push("");
        }

        let mut answers: Vec<String> = Vec::new();
        for prefix in &prefixes {
            for infix in &infixes {
                for suffix in &suffixes {
                    let reading = format!("{}{}{}", prefix, infix, suffix);
                    if !answers.contains(&reading) && is_allowed_reading(&reading) {
                        answers.push(reading);
                    }
                }
            }
        }
        if answers.is_empty() {
            return Err(syntax(line.no, "no reading is usable"));
        }
        trace!("line {}: {} readings", line.no, answers.len());

        let mut fields = FieldMap::new().with(FieldName::Text.as_str(), headword);
        for answer in answers {
            fields.push(FieldName::Answer.as_str(), answer);
        }
        if let Some(weight) = weight {
            fields.push(FieldName::Weight.as_str(), weight);
        }
        if let Some(note) = note {
            fields.push(FieldName::Description.as_str(), note);
        }
        dictionary
            .add_word(&fields, ctx)
            .map_err(|e| syntax(line.no, e))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

/// Question type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    Text = 0,
    Audio = 1,
    Image = 2,
}

impl QuestionType {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(QuestionType::Text),
            "1" => Some(QuestionType::Audio),
            "2" => Some(QuestionType::Image),
            _ => None,
        }
    }
}

/// Answer type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerType {
    FreeText = 0,
    SingleChoice = 1,
    OrderedChoice = 2,
    MustAll = 3,
}

impl AnswerType {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(AnswerType::FreeText),
            "1" => Some(AnswerType::SingleChoice),
            "2" => Some(AnswerType::OrderedChoice),
            "3" => Some(AnswerType::MustAll),
            _ => None,
        }
    }
}

/// A parsed `Q,` line awaiting its answer.
#[derive(Debug)]
struct PendingQuestion {
    line: usize,
    kind: QuestionType,
    question: String,
    media: Option<String>,
    specifics: Specifics,
}

/// Quiz parser state.
#[derive(Debug)]
enum QuizState {
    Idle,
    AwaitingAnswer(PendingQuestion),
}

/// Joins `A,` lines ending in `,` with the lines that follow them.
fn join_continuations<'a>(lines: &[Line<'a>]) -> Vec<(usize, String)> {
    let mut joined = Vec::new();
    let mut iter = lines.iter().peekable();
    while let Some(line) = iter.next() {
        let mut text = line.text.to_string();
        if has_prefix_ignore_case(&text, "A,") {
            while text.ends_with(',') {
                match iter.next_if(|next| !has_prefix_ignore_case(next.text, "Q,")) {
                    Some(next) => text.push_str(next.text),
                    None => break,
                }
            }
        }
        joined.push((line.no, text));
    }
    joined
}

fn parse_question(no: usize, text: &str, ctx: &mut Context) -> Result<PendingQuestion> {
    let tokens: Vec<&str> = text.split(',').map(str::trim).collect();
    let kind = tokens
        .get(1)
        .and_then(|code| QuestionType::from_code(code))
        .ok_or_else(|| syntax(no, "unknown question type"))?;
    let question = tokens.get(2).copied().unwrap_or_default().to_string();

    let mut rest = tokens.iter().skip(3).copied();
    let media = match kind {
        QuestionType::Text => None,
        QuestionType::Audio | QuestionType::Image => {
            let media = rest.next().filter(|m| !m.is_empty());
            Some(media.ok_or_else(|| syntax(no, "the question names no media file"))?.to_string())
        }
    };

    let mut specifics = Specifics::new();
    for option in rest.filter(|o| !o.is_empty()) {
        let (name, value) = option.split_once('=').unwrap_or((option, ""));
        match QUESTION_OPTIONS.iter().find(|(n, _)| n.eq_ignore_ascii_case(name.trim())) {
            Some((_, key)) => specifics.push(*key, value.trim()),
            None => ctx.diagnostics.warning(format!(
                "line {}: unknown question option `{}` was ignored",
                no, option
            )),
        }
    }

    Ok(PendingQuestion {
        line: no,
        kind,
        question,
        media,
        specifics,
    })
}

/// A free-text answer token split into its affix groups.
#[derive(Debug, PartialEq, Eq)]
struct AffixToken<'a> {
    prefixes: Vec<&'a str>,
    body: &'a str,
    suffixes: Vec<&'a str>,
}

fn split_affixes(token: &str) -> AffixToken<'_> {
    let mut rest = token;
    let mut prefixes = Vec::new();
    let mut suffixes = Vec::new();

    if rest.starts_with('[') {
        if let Some(end) = rest.find(']') {
            prefixes = rest[1..end].split('|').collect();
            rest = &rest[end + 1..];
        }
    }
    if rest.ends_with(']') {
        if let Some(start) = rest.rfind('[') {
            suffixes = rest[start + 1..rest.len() - 1].split('|').collect();
            rest = &rest[..start];
        }
    }

    AffixToken {
        prefixes,
        body: rest,
        suffixes,
    }
}

fn quote(piece: &str, as_regex: bool) -> String {
    if as_regex {
        regex_interior(piece).to_string()
    } else {
        escape(piece)
    }
}

/// Expands one free-text token into answers.
///
/// Literal affixes expand into the product of plain answers, each affix
/// group being optional. A group containing a `/regex/` alternative turns
/// the whole token into a single regex answer.
pub fn expand_free_text(token: &str) -> Vec<String> {
    if is_regex_value(token) {
        return vec![token.to_string()];
    }

    let AffixToken {
        prefixes,
        body,
        suffixes,
    } = split_affixes(token);
    if prefixes.is_empty() && suffixes.is_empty() {
        return vec![body.to_string()];
    }

    let any_regex = prefixes.iter().chain(&suffixes).any(|p| is_regex_value(p));
    if !any_regex {
        let mut answers = Vec::new();
        for prefix in std::iter::once("").chain(prefixes.iter().copied()) {
            for suffix in std::iter::once("").chain(suffixes.iter().copied()) {
                let answer = format!("{}{}{}", prefix, body, suffix);
                if !answers.contains(&answer) {
                    answers.push(answer);
                }
            }
        }
        return answers;
    }

    let mut pattern = String::new();
    let mut prefix_is_regex = false;
    if !prefixes.is_empty() {
        let alternatives: Vec<String> = prefixes
            .iter()
            .map(|p| {
                prefix_is_regex = is_regex_value(p);
                quote(p, prefix_is_regex)
            })
            .collect();
        pattern.push_str(&format!("(?:{})?", alternatives.join("|")));
    }
    pattern.push_str(&escape(body));
    if !suffixes.is_empty() {
        // Suffix quoting reuses the flag left by the last prefix alternative.
        let alternatives: Vec<String> = suffixes.iter().map(|s| quote(s, prefix_is_regex)).collect();
        pattern.push_str(&format!("(?:{})?", alternatives.join("|")));
    }
    vec![format!("/{}/", pattern)]
}

fn parse_bonus(token: &str) -> Option<i64> {
    token.strip_prefix('\\')?.trim().parse().ok()
}

/// Builds the word for a question and its joined answer line.
fn answer_fields(pending: PendingQuestion, no: usize, text: &str) -> Result<FieldMap> {
    let mut tokens: Vec<&str> = text.split(',').map(str::trim).collect();
    let kind = tokens
        .get(1)
        .and_then(|code| AnswerType::from_code(code))
        .ok_or_else(|| syntax(no, "unknown answer type"))?;
    let mut tokens: Vec<&str> = tokens.drain(2..).collect();
    if kind != AnswerType::MustAll {
        tokens.retain(|t| !t.is_empty());
    } else {
        while tokens.last().is_some_and(|t| t.is_empty()) {
            tokens.pop();
        }
    }
    if tokens.is_empty() {
        return Err(syntax(no, "the answer line has no answers"));
    }

    let mut specifics = pending.specifics;
    let mut fields = FieldMap::new();
    let mut answers: Vec<String> = Vec::new();
    let mut options: Vec<String> = Vec::new();

    match kind {
        AnswerType::FreeText => {
            let bonus_start = tokens
                .iter()
                .rposition(|t| parse_bonus(t).is_none())
                .map_or(0, |idx| idx + 1);
            let token_bonuses: Vec<i64> = tokens[bonus_start..].iter().filter_map(|t| parse_bonus(t)).collect();
            if token_bonuses.len() > bonus_start {
                return Err(syntax(no, "more bonus tokens than answers"));
            }
            // an affix token's bonus applies to each answer it expands to
            let mut bonuses = Vec::new();
            for (idx, token) in tokens[..bonus_start].iter().enumerate() {
                let expanded = expand_free_text(token);
                let bonus = token_bonuses.get(idx).copied().unwrap_or(0);
                bonuses.extend(std::iter::repeat(bonus).take(expanded.len()));
                answers.extend(expanded);
            }
            specifics.set_bonuses(&bonuses);
        }
        AnswerType::SingleChoice => {
            answers.push(tokens[0].to_string());
            options.extend(tokens.iter().map(|t| t.to_string()));
        }
        AnswerType::OrderedChoice => {
            answers.extend(tokens.iter().map(|t| t.to_string()));
            options.extend(tokens.iter().map(|t| t.to_string()));
            specifics.push("require-all-right", "");
        }
        AnswerType::MustAll => {
            let split = tokens.iter().position(|t| t.is_empty()).unwrap_or(tokens.len());
            answers.extend(tokens[..split].iter().map(|t| t.to_string()));
            options.extend(answers.iter().cloned());
            options.extend(tokens[split..].iter().filter(|t| !t.is_empty()).map(|t| t.to_string()));
            specifics.push("require-all-right", "");
        }
    }

    let headline = match kind {
        AnswerType::FreeText => answers.iter().find(|a| !is_regex_value(a)).cloned(),
        _ => answers.first().cloned(),
    }
    .unwrap_or_else(|| pending.question.clone());
    fields.push(FieldName::Text.as_str(), headline);
    if !pending.question.is_empty() {
        fields.push(FieldName::Question.as_str(), pending.question);
    }
    match (pending.kind, pending.media) {
        (QuestionType::Audio, Some(media)) => fields.push(FieldName::Audio.as_str(), media),
        (QuestionType::Image, Some(media)) => fields.push(FieldName::Image.as_str(), media),
        _ => {}
    }
    for answer in answers {
        fields.push(FieldName::Answer.as_str(), answer);
    }
    if kind != AnswerType::FreeText {
        fields.push(FieldName::Type.as_str(), SELECTION);
        for option in options {
            fields.push(FieldName::Option.as_str(), option);
        }
    }
    if !specifics.is_empty() {
        fields.push(FieldName::Specifics.as_str(), specifics.to_query());
    }
    Ok(fields)
}

fn parse_quiz(lines: &[Line], dictionary: &mut Dictionary, ctx: &mut Context) -> Result<()> {
    let mut state = QuizState::Idle;

    for (no, text) in join_continuations(lines) {
        let is_question = has_prefix_ignore_case(&text, "Q,");
        let is_answer = has_prefix_ignore_case(&text, "A,");

        state = match (state, is_question, is_answer) {
            (QuizState::Idle, true, _) => QuizState::AwaitingAnswer(parse_question(no, &text, ctx)?),
            (QuizState::Idle, _, true) => {
                return Err(syntax(no, "answer line without a preceding question"));
            }
            (QuizState::AwaitingAnswer(pending), true, _) => {
                return Err(syntax(
                    no,
                    format!("question on line {} has no answer line", pending.line),
                ));
            }
            (QuizState::AwaitingAnswer(pending), _, true) => {
                let fields = answer_fields(pending, no, &text)?;
                dictionary.add_word(&fields, ctx).map_err(|e| syntax(no, e))?;
                QuizState::Idle
            }
            (_, false, false) => {
                return Err(syntax(no, "expected a `Q,` or `A,` line"));
            }
        };
    }

    match state {
        QuizState::Idle => Ok(()),
        QuizState::AwaitingAnswer(pending) => Err(syntax(
            pending.line,
            "the question has no answer line before the end of input",
        )),
    }
}
