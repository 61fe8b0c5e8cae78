use encoding_rs::SHIFT_JIS;
use pretty_assertions::assert_eq;
use rstest::rstest;
use wordgame_dict::dictionary::codec::archive::{read_members, write_members};
use wordgame_dict::dictionary::collab::media::{SizeLimits, SniffingMediaValidator};
use wordgame_dict::{
    parse, serialize, Collaborators, Context, Dictionary, DictionaryError, FormatType, MediaError,
    ParseOptions, SerializeOptions, Severity,
};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

const SUN_CSV: &str = "text,image,answer,answer,description,weight\r\n太陽,sun.png,たいよう,おひさま,恒星。,2\r\n";

fn parse_generic(input: &[u8], options: &ParseOptions, ctx: &mut Context) -> wordgame_dict::Result<Dictionary> {
    parse(input, FormatType::Generic, options, ctx)
}

fn serialize_generic(dictionary: &Dictionary, ctx: &mut Context) -> Vec<u8> {
    serialize(dictionary, FormatType::Generic, &SerializeOptions::default(), ctx)
        .expect("dictionary should serialize")
        .bytes
}

#[test]
fn csv_round_trip() {
    let mut ctx = Context::new();
    let dictionary = parse_generic(SUN_CSV.as_bytes(), &ParseOptions::default(), &mut ctx).expect("valid CSV");

    let word = &dictionary.words()[0];
    assert_eq!(word.text(), "太陽");
    assert_eq!(word.answers(), ["たいよう", "おひさま"]);
    assert_eq!(word.image(), Some("tag:pokemori.jp,2016:local:sun.png"));
    assert_eq!(word.description().map(|d| d.source.as_str()), Some("恒星。"));
    assert_eq!(word.weight(), Some("2"));

    let bytes = serialize_generic(&dictionary, &mut ctx);
    assert_eq!(
        String::from_utf8(bytes.clone()).expect("UTF-8 output"),
        "text,image,answer,answer,description,weight\r\n\
         太陽,\"tag:pokemori.jp,2016:local:sun.png\",たいよう,おひさま,恒星。,2\r\n"
    );

    let mut ctx = Context::new();
    let reparsed = parse_generic(&bytes, &ParseOptions::default(), &mut ctx).expect("serialized CSV parses");
    assert_eq!(reparsed.words(), dictionary.words());
    assert!(ctx.diagnostics.is_empty(), "{:?}", ctx.diagnostics.entries());
}

#[test]
fn headerless_records_are_text_then_answers() {
    let mut ctx = Context::new();
    let dictionary = parse_generic("ねこ,ねこちゃん\nいぬ\n".as_bytes(), &ParseOptions::default(), &mut ctx)
        .expect("valid CSV");
    assert_eq!(dictionary.len(), 2);
    assert_eq!(dictionary.words()[0].answers(), ["ねこちゃん"]);
    assert_eq!(dictionary.words()[1].text(), "いぬ");
}

#[rstest]
#[case(Some(true), 1)]
#[case(Some(false), 2)]
#[case(None, 2)]
fn header_option_overrides_detection(#[case] header: Option<bool>, #[case] expected: usize) {
    let options = ParseOptions {
        header,
        ..Default::default()
    };
    let mut ctx = Context::new();
    let dictionary = parse_generic("answer\nねこ\n".as_bytes(), &options, &mut ctx);
    match header {
        // a header of only `answer` leaves the word without text
        Some(true) => assert!(matches!(dictionary, Err(DictionaryError::Syntax(_)))),
        _ => assert_eq!(dictionary.expect("valid CSV").len(), expected),
    }
}

#[test]
fn record_longer_than_header_is_rejected() {
    let mut ctx = Context::new();
    let result = parse_generic("text,answer\nねこ,ねこ,ねこ\n".as_bytes(), &ParseOptions::default(), &mut ctx);
    assert!(matches!(result, Err(DictionaryError::Syntax(_))), "got {:?}", result);
}

#[test]
fn shift_jis_csv_is_detected() {
    let (encoded, _, _) = SHIFT_JIS.encode("text,answer\r\n猫,ねこ\r\n");
    let mut ctx = Context::new();
    let dictionary = parse_generic(&encoded, &ParseOptions::default(), &mut ctx).expect("valid CSV");
    assert_eq!(dictionary.words()[0].text(), "猫");
    assert_eq!(dictionary.words()[0].answers(), ["ねこ"]);
}

#[test]
fn file_name_becomes_title() {
    let options = ParseOptions {
        file_name: Some("どうぶつ.csv".to_string()),
        ..Default::default()
    };
    let mut ctx = Context::new();
    let dictionary = parse_generic("ねこ\n".as_bytes(), &options, &mut ctx).expect("valid CSV");
    assert_eq!(dictionary.title(), Some("どうぶつ"));

    let serialized = serialize(&dictionary, FormatType::Generic, &SerializeOptions::default(), &mut ctx)
        .expect("dictionary should serialize");
    assert_eq!(serialized.file_name, "どうぶつ.csv");
}

#[test]
fn archive_round_trip() {
    let csv = "text,image\r\n太陽,Sun.png\r\n";
    let archive = write_members([
        ("dictionary.csv", csv.as_bytes()),
        ("Sun.png", PNG),
        ("__MACOSX/._Sun.png", b"junk".as_slice()),
    ])
    .expect("archive should be written");

    let mut ctx = Context::new();
    let dictionary = parse_generic(&archive, &ParseOptions::default(), &mut ctx).expect("valid archive");
    assert_eq!(dictionary.file_names(), ["sun.png"]);
    assert_eq!(dictionary.words()[0].image(), Some("sun.png"));
    assert_eq!(ctx.diagnostics.count(Severity::Notice), 1);

    let serialized = serialize(&dictionary, FormatType::Generic, &SerializeOptions::default(), &mut ctx)
        .expect("dictionary should serialize");
    assert_eq!(serialized.mime, "application/zip");
    assert_eq!(serialized.file_name, "dictionary.zip");

    let members = read_members(&serialized.bytes).expect("output is a ZIP");
    let paths: Vec<&str> = members.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(paths, ["dictionary.csv", "sun.png"]);
    assert_eq!(members[1].bytes, PNG);
}

#[test]
fn archive_without_csv_is_rejected() {
    let archive = write_members([("sun.png", PNG)]).expect("archive should be written");
    let mut ctx = Context::new();
    let result = parse_generic(&archive, &ParseOptions::default(), &mut ctx);
    assert!(matches!(result, Err(DictionaryError::Syntax(_))), "got {:?}", result);
}

#[test]
fn declared_member_size_is_not_trusted() {
    let mut archive = write_members([("dictionary.csv", "ねこ\n".as_bytes())]).expect("archive should be written");
    let central = archive
        .windows(4)
        .position(|w| w == b"PK\x01\x02")
        .expect("archive has a central directory");
    // uncompressed size of the first central directory entry
    archive[central + 24..central + 28].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());

    match read_members(&archive) {
        Ok(members) => assert_eq!(members[0].bytes, "ねこ\n".as_bytes()),
        Err(e) => assert!(
            matches!(e, DictionaryError::Zip(_) | DictionaryError::Io(_)),
            "got {:?}",
            e
        ),
    }
}

#[test]
fn oversized_media_is_rejected() {
    let archive = write_members([("dictionary.csv", "ねこ\n".as_bytes()), ("sun.png", PNG)])
        .expect("archive should be written");
    let media = SniffingMediaValidator {
        image: SizeLimits { soft: 4, hard: 8 },
        ..Default::default()
    };
    let mut ctx = Context::with_collaborators(Collaborators {
        media: Box::new(media),
        ..Default::default()
    });
    let result = parse_generic(&archive, &ParseOptions::default(), &mut ctx);
    assert!(
        matches!(result, Err(DictionaryError::Media(MediaError::TooLarge { .. }))),
        "got {:?}",
        result
    );
}

#[test]
fn empty_input_is_rejected() {
    let mut ctx = Context::new();
    let result = parse_generic(b"\n\n", &ParseOptions::default(), &mut ctx);
    assert!(matches!(result, Err(DictionaryError::Syntax(_))), "got {:?}", result);
}

#[test]
fn serialized_file_reopens_by_extension() {
    let mut ctx = Context::new();
    let dictionary = parse_generic(SUN_CSV.as_bytes(), &ParseOptions::default(), &mut ctx).expect("valid CSV");
    let serialized = serialize(&dictionary, FormatType::Generic, &SerializeOptions::default(), &mut ctx)
        .expect("dictionary should serialize");

    let dir = tempfile::tempdir().expect("temporary directory");
    let path = dir.path().join(&serialized.file_name);
    std::fs::write(&path, &serialized.bytes).expect("output is written");

    let format = FormatType::from_extension(&path).expect("extension is recognized");
    assert_eq!(format, FormatType::Generic);
    let bytes = std::fs::read(&path).expect("output is readable");
    let reopened = parse(&bytes, format, &ParseOptions::default(), &mut ctx).expect("output parses");
    assert_eq!(reopened.words(), dictionary.words());
}

#[rstest]
#[case("generic", FormatType::Generic)]
#[case("CatchM", FormatType::Catchm)]
#[case(" pictsense ", FormatType::Pictsense)]
fn formats_are_looked_up_by_name(#[case] name: &str, #[case] expected: FormatType) {
    assert_eq!(FormatType::from_name(name).expect("known format"), expected);
}
