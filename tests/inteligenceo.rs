use encoding_rs::SHIFT_JIS;
use pretty_assertions::assert_eq;
use rstest::rstest;
use wordgame_dict::dictionary::format::inteligenceo::expand_free_text;
use wordgame_dict::{
    parse, serialize, Context, Dictionary, DictionaryError, FormatType, InteligenceoMode, ParseOptions,
    SerializeOptions, Severity,
};

fn parse_text(input: &str, ctx: &mut Context) -> wordgame_dict::Result<Dictionary> {
    parse(input.as_bytes(), FormatType::Inteligenceo, &ParseOptions::default(), ctx)
}

fn round_trip(input: &str) -> String {
    let mut ctx = Context::new();
    let dictionary = parse_text(input, &mut ctx)
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", input, e));
    let serialized = serialize(&dictionary, FormatType::Inteligenceo, &SerializeOptions::default(), &mut ctx)
        .unwrap_or_else(|e| panic!("failed to serialize {:?}: {}", input, e));
    let (text, _, had_errors) = SHIFT_JIS.decode(&serialized.bytes);
    assert!(!had_errors, "output is not valid Shift_JIS");
    text.into_owned()
}

// ---------------------------------------------------------------------------
// Shiritori
// ---------------------------------------------------------------------------

#[test]
fn shiritori_level_and_note() {
    let mut ctx = Context::new();
    let dictionary = parse_text("林檎,りんご,2,@果物\n", &mut ctx).expect("valid shiritori input");
    let word = &dictionary.words()[0];
    assert_eq!(word.text(), "林檎");
    assert_eq!(word.answers(), ["りんご"]);
    assert_eq!(word.weight(), Some("0.5"));
    assert_eq!(word.description().map(|d| d.source.as_str()), Some("果物"));
}

#[test]
fn shiritori_affixes_expand_to_products() {
    let mut ctx = Context::new();
    let dictionary = parse_text("猫,[,こ,|,ねこ,],ちゃん,さん\n", &mut ctx).expect("valid shiritori input");
    assert_eq!(dictionary.words()[0].answers(), ["こねこちゃん", "こねこさん"]);
}

#[test]
fn shiritori_drops_forbidden_readings() {
    let mut ctx = Context::new();
    let dictionary = parse_text("拉麺,らーめん,らーめんー\n", &mut ctx).expect("valid shiritori input");
    assert_eq!(dictionary.words()[0].answers(), ["らーめん"]);

    let result = parse_text("ん,ん\n", &mut ctx);
    assert!(matches!(result, Err(DictionaryError::Syntax(_))), "got {:?}", result);
}

#[rstest]
#[case("林檎,りんご,2,@果物\r\n")]
#[case("ねこ\r\nいぬ\r\n")]
#[case("猫,ねこ,にゃんこ,3\r\n")]
fn shiritori_round_trip(#[case] input: &str) {
    assert_eq!(round_trip(input), input);
}

// ---------------------------------------------------------------------------
// Quiz state machine
// ---------------------------------------------------------------------------

#[rstest]
#[case::answer_without_question("A,0,ねこ\n")]
#[case::question_twice("Q,0,なに？\nQ,0,だれ？\nA,0,ねこ\n")]
#[case::trailing_question("Q,0,なに？\nA,0,ねこ\nQ,0,だれ？\n")]
#[case::stray_line("Q,0,なに？\nA,0,ねこ\nねこ\n")]
#[case::image_without_file("Q,2,これは？\nA,0,ねこ\n")]
#[case::unknown_answer_type("Q,0,なに？\nA,9,ねこ\n")]
fn malformed_quiz_is_rejected(#[case] input: &str) {
    let mut ctx = Context::new();
    let result = parse_text(input, &mut ctx);
    assert!(matches!(result, Err(DictionaryError::Syntax(_))), "got {:?} for {:?}", result, input);
}

#[test]
fn image_single_choice() {
    let mut ctx = Context::new();
    let dictionary = parse_text("Q,2,この動物は？,cat.png,zoom=2,pixelization\nA,1,ねこ,いぬ,とり\n", &mut ctx)
        .expect("valid quiz input");
    let word = &dictionary.words()[0];
    assert_eq!(word.text(), "ねこ");
    assert_eq!(word.question(), Some("この動物は？"));
    assert_eq!(word.image(), Some("tag:pokemori.jp,2016:local:cat.png"));
    assert!(word.is_selection());
    assert_eq!(word.answers(), ["ねこ"]);
    assert_eq!(word.options(), ["ねこ", "いぬ", "とり"]);

    let specifics = word.specifics().expect("question options become specifics");
    assert_eq!(specifics.get("magnification"), Some("2"));
    assert!(specifics.contains("pixelization"));
}

#[test]
fn free_text_with_bonuses() {
    let mut ctx = Context::new();
    let dictionary = parse_text("Q,0,果物は？\nA,0,りんご,みかん,\\0,\\5\n", &mut ctx).expect("valid quiz input");
    let word = &dictionary.words()[0];
    assert!(!word.is_selection());
    assert_eq!(word.answers(), ["りんご", "みかん"]);
    assert_eq!(word.specifics().map(|s| s.to_query()), Some("bonus=0&bonus=5".to_string()));
}

#[test]
fn bonuses_follow_expanded_answers() {
    let mut ctx = Context::new();
    let dictionary = parse_text("Q,0,おやつ\nA,0,[お]かし,ケーキ,\\1,\\2\n", &mut ctx).expect("valid quiz input");
    let word = &dictionary.words()[0];
    assert_eq!(word.answers(), ["かし", "おかし", "ケーキ"]);
    assert_eq!(word.bonuses(), [1, 1, 2]);

    assert_eq!(
        round_trip("Q,0,おやつ\r\nA,0,[お]かし,ケーキ,\\1,\\2\r\n"),
        "Q,0,おやつ\r\nA,0,かし,おかし,ケーキ,\\1,\\1,\\2\r\n"
    );
}

#[test]
fn bonuses_stay_paired_when_an_answer_is_omitted() {
    let mut ctx = Context::new();
    let mut dictionary = Dictionary::new();
    dictionary
        .add_word_from_raw_fields(
            [
                ("text", "果物"),
                ("question", "果物は？"),
                ("answer", "りんご"),
                ("answer", "🍎"),
                ("answer", "みかん"),
                ("specifics", "bonus=1&bonus=2&bonus=3"),
            ],
            &mut ctx,
        )
        .expect("valid word");
    let serialized = serialize(&dictionary, FormatType::Inteligenceo, &SerializeOptions::default(), &mut ctx)
        .expect("dictionary should serialize");
    let (text, _, _) = SHIFT_JIS.decode(&serialized.bytes);
    assert_eq!(text, "Q,0,果物は？\r\nA,0,りんご,みかん,\\1,\\3\r\n");
}

#[test]
fn more_bonuses_than_answers_is_rejected() {
    let mut ctx = Context::new();
    let result = parse_text("Q,0,なに？\nA,0,ねこ,\\1,\\2\n", &mut ctx);
    assert!(matches!(result, Err(DictionaryError::Syntax(_))), "got {:?}", result);
}

#[test]
fn answer_lines_continue_after_trailing_comma() {
    let mut ctx = Context::new();
    let dictionary = parse_text("Q,0,色は？\nA,0,あか,\nあお\n", &mut ctx).expect("valid quiz input");
    assert_eq!(dictionary.words()[0].answers(), ["あか", "あお"]);
}

#[test]
fn must_all_separates_distractors() {
    let mut ctx = Context::new();
    let dictionary = parse_text("Q,0,なかまは？\nA,3,あ,い,,う\n", &mut ctx).expect("valid quiz input");
    let word = &dictionary.words()[0];
    assert_eq!(word.answers(), ["あ", "い"]);
    assert_eq!(word.options(), ["あ", "い", "う"]);
    assert!(word.specifics().is_some_and(|s| s.contains("require-all-right")));
}

#[test]
fn unknown_question_option_is_a_warning() {
    let mut ctx = Context::new();
    parse_text("Q,0,なに？,blur\nA,0,ねこ\n", &mut ctx).expect("valid quiz input");
    assert_eq!(ctx.diagnostics.count(Severity::Warning), 1);
}

#[test]
fn mode_can_be_forced() {
    let options = ParseOptions {
        inteligenceo_mode: Some(InteligenceoMode::Shiritori),
        ..Default::default()
    };
    let mut ctx = Context::new();
    let dictionary = parse("Q,ねこ\n".as_bytes(), FormatType::Inteligenceo, &options, &mut ctx)
        .expect("valid shiritori input");
    assert_eq!(dictionary.words()[0].text(), "Q");
}

#[rstest]
#[case("Q,2,この動物は？,cat.png,zoom=2,pixelization\r\nA,1,ねこ,いぬ,とり\r\n")]
#[case("Q,0,果物は？\r\nA,0,りんご,みかん,\\0,\\5\r\n")]
#[case("Q,0,じゅんばん\r\nA,2,いち,に,さん\r\n")]
#[case("Q,0,なかまは？\r\nA,3,あ,い,,う\r\n")]
fn quiz_round_trip(#[case] input: &str) {
    assert_eq!(round_trip(input), input);
}

// ---------------------------------------------------------------------------
// Free-text affixes
// ---------------------------------------------------------------------------

#[rstest]
#[case("ねこ", &["ねこ"])]
#[case("[お]かし", &["かし", "おかし"])]
#[case("[こ|お]ねこ[ちゃん]", &["ねこ", "ねこちゃん", "こねこ", "こねこちゃん", "おねこ", "おねこちゃん"])]
#[case("/ねこ+/", &["/ねこ+/"])]
#[case("[/ご?/]はん", &["/(?:ご?)?はん/"])]
fn free_text_expansion(#[case] token: &str, #[case] expected: &[&str]) {
    assert_eq!(expand_free_text(token), expected);
}

#[test]
fn suffix_quoting_follows_last_prefix_alternative() {
    assert_eq!(expand_free_text("[/ご?/]はん[.]"), ["/(?:ご?)?はん(?:.)?/"]);
    assert_eq!(expand_free_text("[お]かし[/ら?/]"), ["/(?:お)?かし(?:/ら\\?/)?/"]);
}
