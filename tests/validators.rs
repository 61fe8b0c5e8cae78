use pretty_assertions::assert_eq;
use quickcheck_macros::quickcheck;
use rstest::rstest;
use wordgame_dict::dictionary::collab::markup::{CommonMarkRenderer, Whitelist};
use wordgame_dict::dictionary::collab::romanize::KanaRomanizer;
use wordgame_dict::dictionary::validate::number::NumberKind;
use wordgame_dict::dictionary::validate::{answer, file_location, filename, markup, number, specifics};
use wordgame_dict::Severity;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "gif", "webp", "svg"];

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn error_count(diagnostics: &[wordgame_dict::Diagnostic]) -> usize {
    diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count()
}

// ---------------------------------------------------------------------------
// answer
// ---------------------------------------------------------------------------

#[rstest]
#[case("る〜こと", "る〜こと", 0)]
#[case("る～こと", "る〜こと", 1)]
#[case("ねこ ", "ねこ", 1)]
#[case("/[a-z]+/", "/[a-z]+/", 0)]
#[case("/ABC/", "ABC", 1)]
#[case("\u{200B}", "", 1)]
#[case("/////(/////", "(", 1)]
fn answer_correction(#[case] input: &str, #[case] expected: &str, #[case] errors: usize) {
    let correction = answer::correct(input);
    assert_eq!(correction.value, expected, "correcting {:?}", input);
    assert_eq!(
        error_count(&correction.diagnostics),
        errors,
        "errors for {:?}: {:?}",
        input,
        correction.diagnostics
    );
}

#[test]
fn answer_outside_kana_gets_an_advisory() {
    let correction = answer::correct("cat");
    assert_eq!(correction.value, "cat");
    assert!(
        correction.diagnostics.iter().any(|d| d.severity == Severity::Notice),
        "expected a notice, got {:?}",
        correction.diagnostics
    );
}

#[rstest]
#[case("/////(/////")]
#[case("//ABC//")]
#[case("/(/")]
fn nested_regex_delimiters_correct_in_one_call(#[case] input: &str) {
    let once = answer::correct(input).value;
    assert!(answer::is_valid(&once) || once.is_empty(), "{:?} corrected to {:?}", input, once);
    assert_eq!(answer::correct(&once).value, once);
}

#[quickcheck]
fn answer_correction_is_idempotent(input: String) -> bool {
    let once = answer::correct(&input).value;
    answer::correct(&once).value == once
}

// ---------------------------------------------------------------------------
// number
// ---------------------------------------------------------------------------

#[rstest]
#[case("1", NumberKind::Integer, "1")]
#[case("01", NumberKind::Integer, "1")]
#[case("+3", NumberKind::Integer, "3")]
#[case("-0", NumberKind::Integer, "0")]
#[case("2.50", NumberKind::Real, "2.5")]
#[case("1.0", NumberKind::Real, "1")]
#[case("１２", NumberKind::Integer, "12")]
#[case("abc", NumberKind::Real, "")]
fn number_correction(#[case] input: &str, #[case] kind: NumberKind, #[case] expected: &str) {
    assert_eq!(number::correct(input, kind).value, expected, "correcting {:?}", input);
}

#[quickcheck]
fn number_correction_is_canonical(input: String) -> bool {
    let once = number::correct(&input, NumberKind::Real).value;
    let shaped = once != "-0" && !once.starts_with('+') && !once.ends_with(".0");
    shaped && number::correct(&once, NumberKind::Real).value == once
}

#[quickcheck]
fn rendered_floats_are_canonical(n: f64) -> bool {
    !n.is_finite() || number::is_canonical(&number::render(n, NumberKind::Real), NumberKind::Real)
}

// ---------------------------------------------------------------------------
// specifics
// ---------------------------------------------------------------------------

#[test]
fn specifics_drop_invalid_values_and_orphans() {
    let correction = specifics::correct("magnification=2.50&last-score=3&repeat=0&foo=bar");
    assert_eq!(correction.value, "magnification=2.5&foo=bar");
    assert_eq!(error_count(&correction.diagnostics), 2, "{:?}", correction.diagnostics);
}

#[rstest]
#[case("require-all-right", "require-all-right")]
#[case("pixelization=1", "")]
#[case("bonus=0&bonus=5", "bonus=0&bonus=5")]
#[case("score=2&last-score=3", "score=2&last-score=3")]
#[case("last-magnification=2", "")]
fn specifics_correction(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(specifics::correct(input).value, expected, "correcting {:?}", input);
}

// ---------------------------------------------------------------------------
// file location
// ---------------------------------------------------------------------------

#[rstest]
#[case("sun.png", &[], "tag:pokemori.jp,2016:local:sun.png", 1)]
#[case("https://example.com/a.png", &[], "https://example.com/a.png", 0)]
#[case("SUN.PNG", &["sun.png"], "sun.png", 1)]
#[case("images/sun.png", &["sun.png"], "sun.png", 1)]
#[case("sun.png", &["sun.png"], "sun.png", 0)]
#[case("http://example.com/a.png", &[], "https://example.com/a.png", 0)]
fn file_location_correction(
    #[case] input: &str,
    #[case] bundled: &[&str],
    #[case] expected: &str,
    #[case] errors: usize,
) {
    let correction = file_location::correct(input, &names(bundled));
    assert_eq!(correction.value, expected, "correcting {:?}", input);
    assert_eq!(
        error_count(&correction.diagnostics),
        errors,
        "errors for {:?}: {:?}",
        input,
        correction.diagnostics
    );
}

#[test]
fn http_location_is_upgraded_silently() {
    let correction = file_location::correct("http://example.com/sound.mp3", &[]);
    assert_eq!(correction.value, "https://example.com/sound.mp3");
    assert!(correction.diagnostics.is_empty(), "{:?}", correction.diagnostics);
}

// ---------------------------------------------------------------------------
// file name
// ---------------------------------------------------------------------------

#[rstest]
#[case("neko.png", &[], "neko.png")]
#[case("ねこ.jpeg", &[], "neko.jpg")]
#[case("Sun Photo.PNG", &[], "sun-photo.png")]
#[case("con.png", &[], "con-.png")]
#[case("ねこ.jpeg", &["neko.jpg"], "neko-.jpg")]
fn file_name_correction(#[case] input: &str, #[case] existing: &[&str], #[case] expected: &str) {
    let correction = filename::correct(input, IMAGE_EXTENSIONS, &names(existing), &KanaRomanizer);
    assert_eq!(correction.value, expected, "correcting {:?}", input);
}

#[test]
fn untransliterable_file_name_falls_back_to_a_token() {
    let correction = filename::correct("太陽.PNG", IMAGE_EXTENSIONS, &[], &KanaRomanizer);
    assert!(correction.value.ends_with(".png"), "got {}", correction.value);
    assert!(
        filename::is_valid(&correction.value, IMAGE_EXTENSIONS, &[]),
        "fallback `{}` is not a valid name",
        correction.value
    );
}

// ---------------------------------------------------------------------------
// markup
// ---------------------------------------------------------------------------

#[test]
fn markup_renders_emphasis() {
    let (value, diagnostics) = markup::validate("**bold** text", Whitelist::Rich, &[], &CommonMarkRenderer);
    let value = value.expect("markup should survive");
    assert!(value.html.contains("<strong>bold</strong>"), "html: {}", value.html);
    assert_eq!(value.source, "**bold** text");
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
}

#[test]
fn markup_strips_scripts() {
    let (value, diagnostics) = markup::validate(
        "<script>alert(1)</script>hello",
        Whitelist::Rich,
        &[],
        &CommonMarkRenderer,
    );
    let value = value.expect("text content should survive");
    assert_eq!(value.source, "hello");
    assert!(!value.html.contains("script"), "html: {}", value.html);
    assert!(error_count(&diagnostics) >= 1, "{:?}", diagnostics);
}

#[test]
fn source_markup_rejects_images() {
    let (value, diagnostics) = markup::validate(
        "![x](https://example.com/a.png)",
        Whitelist::Source,
        &[],
        &CommonMarkRenderer,
    );
    assert_eq!(value, None);
    assert!(error_count(&diagnostics) >= 1, "{:?}", diagnostics);
}
