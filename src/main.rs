use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use wordgame_dict::{
    convert, Context, FormatType, InteligenceoMode, ParseOptions, SerializeOptions, Severity,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Generic,
    Catchfeeling,
    Catchm,
    Inteligenceo,
    Pictsense,
}

impl From<Format> for FormatType {
    fn from(format: Format) -> Self {
        match format {
            Format::Generic => FormatType::Generic,
            Format::Catchfeeling => FormatType::Catchfeeling,
            Format::Catchm => FormatType::Catchm,
            Format::Inteligenceo => FormatType::Inteligenceo,
            Format::Pictsense => FormatType::Pictsense,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Quiz,
    Shiritori,
}

impl From<Mode> for InteligenceoMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Quiz => InteligenceoMode::Quiz,
            Mode::Shiritori => InteligenceoMode::Shiritori,
        }
    }
}

#[derive(Parser)]
#[command(name = "wordgame-dict")]
#[command(about = "Convert word-game dictionaries between formats", long_about = None)]
#[command(version)]
struct Cli {
    /// Source dictionary file
    input: PathBuf,

    /// Source format (inferred from the extension when omitted)
    #[arg(long, value_enum)]
    from: Option<Format>,

    /// Target format
    #[arg(long, value_enum)]
    to: Format,

    /// Output file or directory (defaults to the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Treat the first CSV record as a header
    #[arg(long, conflicts_with = "no_header")]
    header: bool,

    /// Treat the first CSV record as data
    #[arg(long)]
    no_header: bool,

    /// Inteligenceω sub-grammar, for both reading and writing
    #[arg(long, value_enum)]
    mode: Option<Mode>,
}

fn output_path(output: Option<&Path>, file_name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let from = match cli.from {
        Some(format) => FormatType::from(format),
        None => match FormatType::from_extension(&cli.input) {
            Ok(format) => format,
            Err(e) => {
                eprintln!("ERROR: {} (use --from)", e);
                process::exit(2);
            }
        },
    };
    let to = FormatType::from(cli.to);

    let input = match fs::read(&cli.input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("ERROR: cannot read {}: {}", cli.input.display(), e);
            process::exit(1);
        }
    };

    let header = match (cli.header, cli.no_header) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    let mode = cli.mode.map(InteligenceoMode::from);
    let parse_options = ParseOptions {
        header,
        inteligenceo_mode: mode,
        file_name: cli
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned()),
    };
    let serialize_options = SerializeOptions {
        inteligenceo_mode: mode,
    };

    println!("Converting {} ({} → {})", cli.input.display(), from, to);
    let mut ctx = Context::new();
    let result = convert(&input, from, to, &parse_options, &serialize_options, &mut ctx);

    for diagnostic in ctx.diagnostics.entries() {
        eprintln!("{}", diagnostic);
    }

    match result {
        Ok(serialized) => {
            let path = output_path(cli.output.as_deref(), &serialized.file_name);
            if let Err(e) = fs::write(&path, &serialized.bytes) {
                eprintln!("ERROR: cannot write {}: {}", path.display(), e);
                process::exit(1);
            }
            println!("Wrote {} ({} bytes, {})", path.display(), serialized.bytes.len(), serialized.mime);
            println!(
                "Diagnostics: {} critical, {} error, {} warning, {} notice",
                ctx.diagnostics.count(Severity::Critical),
                ctx.diagnostics.count(Severity::Error),
                ctx.diagnostics.count(Severity::Warning),
                ctx.diagnostics.count(Severity::Notice),
            );
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    }
}
