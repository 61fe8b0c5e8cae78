use encoding_rs::SHIFT_JIS;
use pretty_assertions::assert_eq;
use rstest::rstest;
use wordgame_dict::dictionary::serialize::tier;
use wordgame_dict::{
    convert, parse, serialize, Context, Dictionary, DictionaryError, FormatType, ParseOptions,
    SerializeOptions, Severity,
};

fn parse_as(format: FormatType, input: &str, ctx: &mut Context) -> wordgame_dict::Result<Dictionary> {
    parse(input.as_bytes(), format, &ParseOptions::default(), ctx)
}

fn texts(dictionary: &Dictionary) -> Vec<&str> {
    dictionary.words().iter().map(|w| w.text()).collect()
}

fn decode_sjis(bytes: &[u8]) -> String {
    let (text, _, had_errors) = SHIFT_JIS.decode(bytes);
    assert!(!had_errors, "output is not valid Shift_JIS");
    text.into_owned()
}

// ---------------------------------------------------------------------------
// Catchfeeling
// ---------------------------------------------------------------------------

#[test]
fn catchfeeling_reads_comments_as_descriptions() {
    let mut ctx = Context::new();
    let dictionary = parse_as(FormatType::Catchfeeling, "ねこ // かわいい\r\nいぬ\r\n", &mut ctx)
        .expect("valid Catchfeeling input");
    assert_eq!(texts(&dictionary), ["ねこ", "いぬ"]);
    assert_eq!(
        dictionary.words()[0].description().map(|d| d.source.as_str()),
        Some("かわいい")
    );
    assert_eq!(dictionary.metadata().regard, Some("[ぁ-ゖー]"));
}

#[test]
fn catchfeeling_blank_line_is_fatal() {
    let mut ctx = Context::new();
    let result = parse_as(FormatType::Catchfeeling, "ねこ\n\nいぬ\n", &mut ctx);
    assert!(matches!(result, Err(DictionaryError::Syntax(_))), "got {:?}", result);
}

#[test]
fn catchfeeling_skips_rejected_lines() {
    let mut ctx = Context::new();
    let dictionary = parse_as(FormatType::Catchfeeling, "ねこ\n// memo\nいぬ\n", &mut ctx)
        .expect("valid Catchfeeling input");
    assert_eq!(texts(&dictionary), ["ねこ", "いぬ"]);
    assert_eq!(ctx.diagnostics.count(Severity::Error), 1);
}

#[test]
fn catchfeeling_reads_shift_jis() {
    let (encoded, _, _) = SHIFT_JIS.encode("ねこ // 猫\r\n");
    let mut ctx = Context::new();
    let dictionary = parse(&encoded, FormatType::Catchfeeling, &ParseOptions::default(), &mut ctx)
        .expect("valid Catchfeeling input");
    assert_eq!(texts(&dictionary), ["ねこ"]);
}

#[test]
fn catchfeeling_round_trip() {
    let input = "ねこ // かわいい\r\nいぬ\r\n";
    let mut ctx = Context::new();
    let serialized = convert(
        input.as_bytes(),
        FormatType::Catchfeeling,
        FormatType::Catchfeeling,
        &ParseOptions::default(),
        &SerializeOptions::default(),
        &mut ctx,
    )
    .expect("conversion succeeds");
    assert_eq!(serialized.mime, "text/plain; charset=Shift_JIS");
    assert_eq!(decode_sjis(&serialized.bytes), input);
}

// ---------------------------------------------------------------------------
// Catchm
// ---------------------------------------------------------------------------

#[test]
fn catchm_ignores_blank_and_comment_lines() {
    let mut ctx = Context::new();
    let dictionary = parse_as(FormatType::Catchm, "ねこ # なく\n\n# memo\nいぬ // ほえる\n", &mut ctx)
        .expect("valid Catchm input");
    assert_eq!(texts(&dictionary), ["ねこ", "いぬ"]);
    assert_eq!(
        dictionary.words()[1].description().map(|d| d.source.as_str()),
        Some("ほえる")
    );
    assert_eq!(ctx.diagnostics.count(Severity::Error), 0);
}

#[test]
fn catchm_discards_rejected_lines() {
    let mut ctx = Context::new();
    let dictionary = parse_as(FormatType::Catchm, "ねこ\n\u{200B} // memo\nいぬ\n", &mut ctx)
        .expect("valid Catchm input");
    assert_eq!(texts(&dictionary), ["ねこ", "いぬ"]);
    assert!(dictionary.words().iter().all(|w| w.description().is_none()));
    assert_eq!(ctx.diagnostics.count(Severity::Error), 1);
    assert!(
        ctx.diagnostics.entries()[0].message.contains("line 2"),
        "{:?}",
        ctx.diagnostics.entries()
    );
}

#[rstest]
#[case("ねこ\nいぬ\n", "[ぁ-ゖー]")]
#[case("cat\nDog\n", "[a-z]")]
#[case("ネコ\n3びき\n", "[ぁ-ゖー0-9]")]
#[case("ねこ\n猫\n", "[こね猫]")]
fn regard_is_derived_from_texts(#[case] input: &str, #[case] expected: &str) {
    let mut ctx = Context::new();
    let dictionary = parse_as(FormatType::Catchm, input, &mut ctx).expect("valid Catchm input");
    assert_eq!(dictionary.metadata().regard, Some(expected));
}

#[test]
fn empty_catchm_is_rejected() {
    let mut ctx = Context::new();
    let result = parse_as(FormatType::Catchm, "# only a comment\n", &mut ctx);
    assert!(matches!(result, Err(DictionaryError::Syntax(_))), "got {:?}", result);
}

// ---------------------------------------------------------------------------
// Shift_JIS reduction
// ---------------------------------------------------------------------------

#[test]
fn unrepresentable_words_are_dropped() {
    let mut ctx = Context::new();
    let dictionary = parse_as(FormatType::Catchm, "ねこ\n🐱\n", &mut ctx).expect("valid Catchm input");
    ctx.diagnostics.clear();

    let serialized = serialize(&dictionary, FormatType::Catchfeeling, &SerializeOptions::default(), &mut ctx)
        .expect("one word is representable");
    assert_eq!(decode_sjis(&serialized.bytes), "ねこ\r\n");
    assert_eq!(ctx.diagnostics.count(Severity::Error), 1);
    assert!(
        ctx.diagnostics.entries()[0].message.contains("unserializable"),
        "{:?}",
        ctx.diagnostics.entries()
    );
}

#[test]
fn nothing_representable_is_an_error() {
    let mut ctx = Context::new();
    let dictionary = parse_as(FormatType::Catchm, "🐱\n", &mut ctx).expect("valid Catchm input");
    let result = serialize(&dictionary, FormatType::Catchm, &SerializeOptions::default(), &mut ctx);
    assert!(matches!(result, Err(DictionaryError::EmptyOutput(_))), "got {:?}", result);
}

#[test]
fn substitution_table_rescues_answers() {
    let mut ctx = Context::new();
    let dictionary = parse_as(FormatType::Catchm, "ゔぁいおりん\n", &mut ctx).expect("valid Catchm input");
    let serialized = serialize(&dictionary, FormatType::Catchm, &SerializeOptions::default(), &mut ctx)
        .expect("word is representable");
    assert_eq!(decode_sjis(&serialized.bytes), "ヴぁいおりん\r\n");
}

#[test]
fn kana_answers_are_preferred() {
    let mut ctx = Context::new();
    let mut dictionary = Dictionary::new();
    dictionary
        .add_word_from_raw_fields([("text", "猫"), ("answer", "neko"), ("answer", "ねこ")], &mut ctx)
        .expect("valid word");
    let serialized = serialize(&dictionary, FormatType::Catchfeeling, &SerializeOptions::default(), &mut ctx)
        .expect("word is representable");
    assert_eq!(decode_sjis(&serialized.bytes), "ねこ\r\n");
}

#[rstest]
#[case("ねこ", 0)]
#[case("3びき", 1)]
#[case("abc", 3)]
#[case("abc1", 4)]
#[case("猫2", 4)]
#[case("猫!", 5)]
fn answers_are_ranked_by_character_class(#[case] answer: &str, #[case] expected: usize) {
    assert_eq!(tier(answer), expected, "tier of {:?}", answer);
}

// ---------------------------------------------------------------------------
// Pictsense
// ---------------------------------------------------------------------------

const FIVE_WORDS: &str = "ねこ\nいぬ\nとり\nうま\nヴぁいおりん\n";

#[test]
fn pictsense_folds_vu_and_reads_words() {
    let mut ctx = Context::new();
    let dictionary = parse_as(FormatType::Pictsense, FIVE_WORDS, &mut ctx).expect("valid Pictsense input");
    assert_eq!(texts(&dictionary), ["ねこ", "いぬ", "とり", "うま", "ゔぁいおりん"]);
}

#[rstest]
#[case("ねこ\nいぬ\nとり\nうま\n")]
#[case("ねこ\nいぬ\nとり\nうま\nネコ\n")]
#[case("ねこ\nいぬ\nとり\nうま\nあいうえおかきくけこさしすせそたちつてとな\n")]
fn pictsense_parser_enforces_bounds(#[case] input: &str) {
    let mut ctx = Context::new();
    let result = parse_as(FormatType::Pictsense, input, &mut ctx);
    assert!(matches!(result, Err(DictionaryError::Syntax(_))), "got {:?}", result);
}

#[test]
fn pictsense_serializer_reports_bounds() {
    let mut ctx = Context::new();
    let dictionary = parse_as(FormatType::Catchm, "ネコ\nイヌ\nトリ\nねこ\n", &mut ctx).expect("valid Catchm input");
    ctx.diagnostics.clear();

    let serialized = serialize(&dictionary, FormatType::Pictsense, &SerializeOptions::default(), &mut ctx)
        .expect("output is still produced");
    assert_eq!(serialized.mime, "text/plain; charset=Shift_JIS");
    assert_eq!(serialized.bytes, SHIFT_JIS.encode("ねこ\r\nいぬ\r\nとり\r\n").0.into_owned());
    assert_eq!(ctx.diagnostics.count(Severity::Critical), 1);
    assert_eq!(ctx.diagnostics.count(Severity::Notice), 1);
}

#[test]
fn pictsense_writes_vu_in_shift_jis() {
    let mut ctx = Context::new();
    let dictionary = parse_as(FormatType::Pictsense, FIVE_WORDS, &mut ctx).expect("valid Pictsense input");
    let serialized = serialize(&dictionary, FormatType::Pictsense, &SerializeOptions::default(), &mut ctx)
        .expect("dictionary should serialize");
    assert_eq!(
        decode_sjis(&serialized.bytes),
        "ねこ\r\nいぬ\r\nとり\r\nうま\r\nヴぁいおりん\r\n"
    );

    let reparsed = parse(&serialized.bytes, FormatType::Pictsense, &ParseOptions::default(), &mut ctx)
        .expect("serialized output parses");
    assert_eq!(reparsed.words(), dictionary.words());
}
