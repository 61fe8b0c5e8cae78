//! Canonical dictionary model.
//!
//! This module defines the format-independent representation every parser
//! builds and every serializer reads:
//! - [`FieldName`]: the recognized fields
//! - [`FieldMap`]: raw, unvalidated field values as read from a source
//! - [`Word`]: one validated entry, immutable once built
//! - [`Dictionary`]: ordered words, metadata on the first word, bundled media

use std::fmt;

use regex::Regex;

use super::diagnostics::{Diagnostic, Diagnostics};
use super::error::WordError;
use crate::dictionary::collab::markup::Whitelist;
use crate::dictionary::collab::Collaborators;
use crate::dictionary::context::Context;
use crate::dictionary::utils::{collapse_whitespace, is_regex_value, strip_control_characters};
use crate::dictionary::validate::markup::{self, MarkupValue};
use crate::dictionary::validate::number::{self, NumberKind};
use crate::dictionary::validate::specifics::{self, Specifics};
use crate::dictionary::validate::{answer, file_location, Correction};

/// The `type` value of multiple-choice words.
pub const SELECTION: &str = "selection";

/// A recognized field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Text,
    Image,
    ImageSource,
    Audio,
    AudioSource,
    Video,
    VideoSource,
    Answer,
    Description,
    Weight,
    Specifics,
    Question,
    Option,
    Type,
    Title,
    Summary,
    Regard,
}

impl FieldName {
    /// All fields, in generic-format column order.
    pub const ALL: [FieldName; 17] = [
        FieldName::Text,
        FieldName::Image,
        FieldName::ImageSource,
        FieldName::Audio,
        FieldName::AudioSource,
        FieldName::Video,
        FieldName::VideoSource,
        FieldName::Answer,
        FieldName::Description,
        FieldName::Weight,
        FieldName::Specifics,
        FieldName::Question,
        FieldName::Option,
        FieldName::Type,
        FieldName::Title,
        FieldName::Summary,
        FieldName::Regard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Text => "text",
            FieldName::Image => "image",
            FieldName::ImageSource => "image-source",
            FieldName::Audio => "audio",
            FieldName::AudioSource => "audio-source",
            FieldName::Video => "video",
            FieldName::VideoSource => "video-source",
            FieldName::Answer => "answer",
            FieldName::Description => "description",
            FieldName::Weight => "weight",
            FieldName::Specifics => "specifics",
            FieldName::Question => "question",
            FieldName::Option => "option",
            FieldName::Type => "type",
            FieldName::Title => "@title",
            FieldName::Summary => "@summary",
            FieldName::Regard => "@regard",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }

    /// Metadata fields describe the whole dictionary and live on the first word.
    pub fn is_meta(&self) -> bool {
        matches!(self, FieldName::Title | FieldName::Summary | FieldName::Regard)
    }

    /// Fields whose every occurrence is kept, in order.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, FieldName::Answer | FieldName::Option)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a bundled media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    pub fn name(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }

    /// Archive member extensions allowed for this kind.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => &["png", "jpg", "gif", "webp", "svg"],
            MediaKind::Audio => &["mp3", "m4a", "ogg"],
            MediaKind::Video => &["mp4", "webm"],
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.split('/').next() {
            Some("image") => Some(MediaKind::Image),
            Some("audio") => Some(MediaKind::Audio),
            Some("video") => Some(MediaKind::Video),
            _ => None,
        }
    }
}

/// A media file bundled with a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Raw field values of one record, in source order. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, Vec<String>)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups `(name, value)` pairs by name, keeping first-seen name order.
    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (name, value) in pairs {
            map.push(name, value);
        }
        map
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    pub fn get(&self, name: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One validated dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Word {
    text: String,
    answers: Vec<String>,
    image: Option<String>,
    image_source: Option<MarkupValue>,
    audio: Option<String>,
    audio_source: Option<MarkupValue>,
    video: Option<String>,
    video_source: Option<MarkupValue>,
    description: Option<MarkupValue>,
    weight: Option<String>,
    specifics: Option<Specifics>,
    question: Option<String>,
    options: Vec<String>,
    word_type: Option<String>,
    title: Option<String>,
    summary: Option<MarkupValue>,
    regard: Option<String>,
    extra: Vec<(String, String)>,
}

/// Plain single-line text: control characters removed, whitespace collapsed.
fn correct_plain_text(value: &str) -> String {
    collapse_whitespace(&strip_control_characters(value))
}

/// Validation state shared by [`Word::build`] and metadata merging.
struct FieldValidator<'a> {
    collaborators: &'a Collaborators,
    bundled: &'a [String],
    diagnostics: &'a mut Diagnostics,
    /// Positions of `answer` values that failed validation.
    dropped_answers: Vec<usize>,
}

impl FieldValidator<'_> {
    fn take(&mut self, correction: Correction) -> Option<String> {
        self.diagnostics.extend(correction.diagnostics);
        (!correction.value.is_empty()).then_some(correction.value)
    }

    fn markup(&mut self, value: &str, whitelist: Whitelist) -> Option<MarkupValue> {
        let (markup, diagnostics) = markup::validate(
            value,
            whitelist,
            self.bundled,
            self.collaborators.markup.as_ref(),
        );
        self.diagnostics.extend(diagnostics);
        markup
    }

    fn plain(&mut self, field: FieldName, value: &str) -> Option<String> {
        let corrected = correct_plain_text(value);
        if !corrected.is_empty() && corrected != value {
            self.diagnostics.push(Diagnostic::notice(format!(
                "`{}`: whitespace and control characters were normalized in `{}`",
                field, value
            )));
        }
        (!corrected.is_empty()).then_some(corrected)
    }

    fn weight(&mut self, value: &str) -> Option<String> {
        let corrected = self.take(number::correct(value, NumberKind::Real))?;
        if corrected.starts_with('-') || corrected == "0" {
            self.diagnostics.push(Diagnostic::error(format!(
                "`weight` must be positive; `{}` was dropped",
                value
            )));
            return None;
        }
        Some(corrected)
    }

    fn word_type(&mut self, value: &str) -> Option<String> {
        let lowered = value.trim().to_ascii_lowercase();
        if lowered == SELECTION {
            if lowered != value {
                self.diagnostics
                    .push(Diagnostic::error(format!("`type` `{}` was corrected to `{}`", value, SELECTION)));
            }
            Some(lowered)
        } else {
            self.diagnostics
                .push(Diagnostic::error(format!("`type` `{}` is not recognized; it was dropped", value)));
            None
        }
    }

    fn regard(&mut self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        let is_class = trimmed.len() > 2 && trimmed.starts_with('[') && trimmed.ends_with(']');
        if is_class && Regex::new(trimmed).is_ok() {
            return Some(trimmed.to_string());
        }
        self.diagnostics.push(Diagnostic::error(format!(
            "`@regard` `{}` is not a character class; it was dropped",
            value
        )));
        None
    }

    fn specifics(&mut self, value: &str) -> Option<Specifics> {
        self.take(specifics::correct(value))
            .map(|query| Specifics::parse(&query))
    }

    /// Validates every occurrence of `field` into `word`.
    fn apply(&mut self, word: &mut Word, field: FieldName, values: &[String]) {
        let values: Vec<&String> = values.iter().filter(|v| !v.trim().is_empty()).collect();
        if values.is_empty() {
            return;
        }

        if field.is_repeatable() {
            let mut corrected = Vec::new();
            for (idx, value) in values.iter().enumerate() {
                match self.take(answer::correct(value)) {
                    Some(value) => corrected.push(value),
                    None if field == FieldName::Answer => self.dropped_answers.push(idx),
                    None => {}
                }
            }
            match field {
                FieldName::Answer => word.answers.extend(corrected),
                _ => word.options.extend(corrected),
            }
            return;
        }

        if values.len() > 1 {
            self.diagnostics.push(Diagnostic::error(format!(
                "`{}` may occur only once; {} extra value(s) were dropped",
                field,
                values.len() - 1
            )));
        }
        let value = values[0].as_str();

        match field {
            FieldName::Text => word.text = self.plain(field, value).unwrap_or_default(),
            FieldName::Image => word.image = self.take(file_location::correct(value, self.bundled)),
            FieldName::Audio => word.audio = self.take(file_location::correct(value, self.bundled)),
            FieldName::Video => word.video = self.take(file_location::correct(value, self.bundled)),
            FieldName::ImageSource => word.image_source = self.markup(value, Whitelist::Source),
            FieldName::AudioSource => word.audio_source = self.markup(value, Whitelist::Source),
            FieldName::VideoSource => word.video_source = self.markup(value, Whitelist::Source),
            FieldName::Description => word.description = self.markup(value, Whitelist::Rich),
            FieldName::Summary => word.summary = self.markup(value, Whitelist::Rich),
            FieldName::Weight => word.weight = self.weight(value),
            FieldName::Specifics => word.specifics = self.specifics(value),
            FieldName::Question => word.question = self.plain(field, value),
            FieldName::Type => word.word_type = self.word_type(value),
            FieldName::Title => word.title = self.plain(field, value),
            FieldName::Regard => word.regard = self.regard(value),
            FieldName::Answer | FieldName::Option => {}
        }
    }
}

impl Word {
    /// Validates `fields` and enforces the word invariants.
    ///
    /// `is_first` permits metadata fields; on any other word they are
    /// reported and ignored.
    pub fn build(
        fields: &FieldMap,
        is_first: bool,
        bundled: &[String],
        collaborators: &Collaborators,
        diagnostics: &mut Diagnostics,
    ) -> Result<Word, WordError> {
        let mut word = Word::default();
        let mut validator = FieldValidator {
            collaborators,
            bundled,
            diagnostics,
            dropped_answers: Vec::new(),
        };

        for (name, values) in fields.iter() {
            let field = FieldName::from_name(name);
            let is_meta = field.map(|f| f.is_meta()).unwrap_or_else(|| name.starts_with('@'));
            if is_meta && !is_first {
                validator.diagnostics.error(format!(
                    "Metadata field `{}` is only allowed on the first word; it was ignored",
                    name
                ));
                continue;
            }
            match field {
                Some(field) => validator.apply(&mut word, field, values),
                None => word.extra.extend(
                    values
                        .iter()
                        .filter(|v| !v.is_empty())
                        .map(|v| (name.to_string(), v.clone())),
                ),
            }
        }

        word.enforce_invariants(&validator.dropped_answers, validator.diagnostics)?;
        Ok(word)
    }

    fn enforce_invariants(&mut self, dropped_answers: &[usize], diagnostics: &mut Diagnostics) -> Result<(), WordError> {
        if self.text.is_empty() {
            return Err(WordError::MissingText);
        }

        if self.is_selection() {
            if self.options.is_empty() {
                return Err(WordError::MissingOptions(self.text.clone()));
            }
            if let Some(stray) = self.answers.iter().find(|a| !self.options.contains(a)) {
                return Err(WordError::AnswerNotInOptions {
                    text: self.text.clone(),
                    answer: stray.clone(),
                });
            }
        }

        // `bonus` values follow their answers through drops and reordering.
        let had_bonuses = self.specifics.as_ref().is_some_and(|s| s.contains("bonus"));
        let mut bonuses: Vec<i64> = self
            .specifics
            .as_ref()
            .map(Specifics::bonuses)
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| !dropped_answers.contains(idx))
            .map(|(_, bonus)| bonus)
            .collect();

        if self.answers.first().is_some_and(|a| is_regex_value(a)) {
            match self.answers.iter().position(|a| !is_regex_value(a)) {
                Some(idx) => {
                    let plain = self.answers.remove(idx);
                    self.answers.insert(0, plain);
                    if !bonuses.is_empty() {
                        let bonus = if idx < bonuses.len() { bonuses.remove(idx) } else { 0 };
                        bonuses.insert(0, bonus);
                    }
                    diagnostics.notice(format!(
                        "`{}`: a regex cannot be the first answer; `{}` was moved first",
                        self.text, self.answers[0]
                    ));
                }
                None => {
                    diagnostics.error(format!(
                        "`{}`: regex answers need at least one plain answer; they were dropped",
                        self.text
                    ));
                    self.answers.clear();
                    bonuses.clear();
                }
            }
        }

        if self.answers.is_empty() && !self.is_selection() {
            let derived = answer::correct(&self.text);
            if derived.is_dropped() || is_regex_value(&derived.value) {
                return Err(WordError::NoDerivableAnswer(self.text.clone()));
            }
            if derived.value != self.text {
                diagnostics.extend(derived.diagnostics);
                diagnostics.notice(format!(
                    "`{}`: answer `{}` was derived from the text",
                    self.text, derived.value
                ));
                self.answers.push(derived.value);
            }
        }

        if had_bonuses {
            let answer_count = self.effective_answers().len();
            if bonuses.len() > answer_count {
                diagnostics.error(format!(
                    "`{}`: {} `bonus` value(s) have no answer; they were dropped",
                    self.text,
                    bonuses.len() - answer_count
                ));
                bonuses.truncate(answer_count);
            }
            if let Some(specifics) = self.specifics.as_mut() {
                specifics.set_bonuses(&bonuses);
                if specifics.is_empty() {
                    self.specifics = None;
                }
            }
        }

        Ok(())
    }

    /// Overwrites metadata fields with the validated values of `fields`.
    pub(crate) fn merge_meta(
        &mut self,
        fields: &FieldMap,
        bundled: &[String],
        collaborators: &Collaborators,
        diagnostics: &mut Diagnostics,
    ) {
        let mut validator = FieldValidator {
            collaborators,
            bundled,
            diagnostics,
            dropped_answers: Vec::new(),
        };
        for (name, values) in fields.iter() {
            match FieldName::from_name(name) {
                Some(field) if field.is_meta() => validator.apply(self, field, values),
                _ if name.starts_with('@') => {
                    self.extra.retain(|(n, _)| n != name);
                    self.extra
                        .extend(values.iter().map(|v| (name.to_string(), v.clone())));
                }
                _ => validator.diagnostics.error(format!(
                    "`{}` is not a metadata field; it was ignored",
                    name
                )),
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Answers in order. Empty when `text` itself is the answer.
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// One `bonus` per effective answer, zero where none was given.
    pub fn bonuses(&self) -> Vec<i64> {
        let mut bonuses = self.specifics.as_ref().map(Specifics::bonuses).unwrap_or_default();
        bonuses.resize(self.effective_answers().len(), 0);
        bonuses
    }

    /// Answers, or `text` when none were given.
    pub fn effective_answers(&self) -> Vec<&str> {
        if self.answers.is_empty() && !self.is_selection() {
            vec![self.text.as_str()]
        } else {
            self.answers.iter().map(String::as_str).collect()
        }
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn image_source(&self) -> Option<&MarkupValue> {
        self.image_source.as_ref()
    }

    pub fn audio(&self) -> Option<&str> {
        self.audio.as_deref()
    }

    pub fn audio_source(&self) -> Option<&MarkupValue> {
        self.audio_source.as_ref()
    }

    pub fn video(&self) -> Option<&str> {
        self.video.as_deref()
    }

    pub fn video_source(&self) -> Option<&MarkupValue> {
        self.video_source.as_ref()
    }

    pub fn description(&self) -> Option<&MarkupValue> {
        self.description.as_ref()
    }

    pub fn weight(&self) -> Option<&str> {
        self.weight.as_deref()
    }

    pub fn specifics(&self) -> Option<&Specifics> {
        self.specifics.as_ref()
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn word_type(&self) -> Option<&str> {
        self.word_type.as_deref()
    }

    pub fn is_selection(&self) -> bool {
        self.word_type.as_deref() == Some(SELECTION)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn summary(&self) -> Option<&MarkupValue> {
        self.summary.as_ref()
    }

    pub fn regard(&self) -> Option<&str> {
        self.regard.as_deref()
    }

    /// Unrecognized fields, passed through unchanged.
    pub fn extra(&self) -> &[(String, String)] {
        &self.extra
    }

    /// String values of `field`, as they are written by the generic format.
    pub fn values(&self, field: FieldName) -> Vec<String> {
        let one = |v: Option<&str>| v.map(|s| vec![s.to_string()]).unwrap_or_default();
        let markup = |v: Option<&MarkupValue>| v.map(|m| vec![m.source.clone()]).unwrap_or_default();
        match field {
            FieldName::Text => vec![self.text.clone()],
            FieldName::Image => one(self.image()),
            FieldName::ImageSource => markup(self.image_source()),
            FieldName::Audio => one(self.audio()),
            FieldName::AudioSource => markup(self.audio_source()),
            FieldName::Video => one(self.video()),
            FieldName::VideoSource => markup(self.video_source()),
            FieldName::Answer => self.answers.clone(),
            FieldName::Description => markup(self.description()),
            FieldName::Weight => one(self.weight()),
            FieldName::Specifics => self
                .specifics
                .as_ref()
                .map(|s| vec![s.to_query()])
                .unwrap_or_default(),
            FieldName::Question => one(self.question()),
            FieldName::Option => self.options.clone(),
            FieldName::Type => one(self.word_type()),
            FieldName::Title => one(self.title()),
            FieldName::Summary => markup(self.summary()),
            FieldName::Regard => one(self.regard()),
        }
    }
}

/// Dictionary-wide metadata, read from the first word.
#[derive(Debug, Clone, Copy, Default)]
pub struct Metadata<'a> {
    pub title: Option<&'a str>,
    pub summary: Option<&'a MarkupValue>,
    pub regard: Option<&'a str>,
}

/// An ordered sequence of words plus optional bundled media.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: Vec<Word>,
    files: Vec<MediaFile>,
    file_names: Vec<String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dictionary bundling `files`; their names become valid file locations.
    pub fn with_files(files: Vec<MediaFile>) -> Self {
        let file_names = files.iter().map(|f| f.name.clone()).collect();
        Self {
            words: Vec::new(),
            files,
            file_names,
        }
    }

    /// Validates `fields` into a word and appends it.
    pub fn add_word(&mut self, fields: &FieldMap, ctx: &mut Context) -> Result<(), WordError> {
        let is_first = self.words.is_empty();
        let word = Word::build(
            fields,
            is_first,
            &self.file_names,
            &ctx.collaborators,
            &mut ctx.diagnostics,
        )?;
        self.words.push(word);
        Ok(())
    }

    /// Groups `(name, value)` pairs into a [`FieldMap`] and adds the word.
    pub fn add_word_from_raw_fields<N, V>(
        &mut self,
        pairs: impl IntoIterator<Item = (N, V)>,
        ctx: &mut Context,
    ) -> Result<(), WordError>
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.add_word(&FieldMap::from_pairs(pairs), ctx)
    }

    /// Merges metadata fields into the first word, overwriting same-named fields.
    pub fn set_meta_fields(&mut self, fields: &FieldMap, ctx: &mut Context) -> Result<(), WordError> {
        let first = self.words.first_mut().ok_or(WordError::MetadataWithoutWords)?;
        first.merge_meta(fields, &self.file_names, &ctx.collaborators, &mut ctx.diagnostics);
        Ok(())
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn metadata(&self) -> Metadata<'_> {
        self.words
            .first()
            .map(|w| Metadata {
                title: w.title(),
                summary: w.summary(),
                regard: w.regard(),
            })
            .unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata().title
    }

    pub fn files(&self) -> &[MediaFile] {
        &self.files
    }

    pub fn file_names(&self) -> &[String] {
        &self.file_names
    }
}
