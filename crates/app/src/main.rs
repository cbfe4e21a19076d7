use std::fmt;
use std::sync::Arc;

use quiz_core::model::Profile;
use services::{
    CachedQuestionSource, Clock, GeneratedQuestionSource, GenerationConfig, QuestionSource,
    QuizService, StaticQuestionSource, DEFAULT_QUESTION_COUNT,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod terminal;

use terminal::Terminal;

const DEFAULT_AGE: u8 = 8;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSource { raw: String },
    InvalidAge { raw: String },
    InvalidCount { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSource { raw } => {
                write!(f, "invalid --source value: {raw} (expected static or generated)")
            }
            ArgsError::InvalidAge { raw } => write!(f, "invalid --age value: {raw}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [--source static|generated] [--age <n>] [--interest <tag>]...");
    eprintln!("       [--count <n>] [--cache] [--shuffle]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --source static");
    eprintln!("  --age {DEFAULT_AGE}");
    eprintln!("  --count {DEFAULT_QUESTION_COUNT}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_SOURCE, QUIZ_AGE, QUIZ_INTERESTS (comma separated)");
    eprintln!("  QUIZ_AI_API_KEY (required for generated), QUIZ_AI_BASE_URL, QUIZ_AI_MODEL,");
    eprintln!("  QUIZ_AI_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Static,
    Generated,
}

impl SourceKind {
    fn from_arg(arg: &str) -> Result<Self, ArgsError> {
        match arg {
            "static" => Ok(Self::Static),
            "generated" => Ok(Self::Generated),
            _ => Err(ArgsError::InvalidSource {
                raw: arg.to_string(),
            }),
        }
    }
}

#[derive(Debug)]
struct Args {
    source: SourceKind,
    age: u8,
    interests: Vec<String>,
    count: usize,
    cache: bool,
    shuffle: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut source = match std::env::var("QUIZ_SOURCE") {
            Ok(raw) => SourceKind::from_arg(&raw)?,
            Err(_) => SourceKind::Static,
        };
        let mut age = match std::env::var("QUIZ_AGE") {
            Ok(raw) => parse_age(raw)?,
            Err(_) => DEFAULT_AGE,
        };
        let mut interests: Vec<String> = std::env::var("QUIZ_INTERESTS")
            .map(|raw| raw.split(',').map(str::to_string).collect())
            .unwrap_or_default();
        let mut count = DEFAULT_QUESTION_COUNT;
        let mut cache = false;
        let mut shuffle = false;
        let mut cli_interests = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--source" => source = SourceKind::from_arg(&require_value(args, "--source")?)?,
                "--age" => age = parse_age(require_value(args, "--age")?)?,
                "--interest" => cli_interests.push(require_value(args, "--interest")?),
                "--count" => {
                    let value = require_value(args, "--count")?;
                    count = match value.parse::<usize>() {
                        Ok(n) if n > 0 => n,
                        _ => return Err(ArgsError::InvalidCount { raw: value }),
                    };
                }
                "--cache" => cache = true,
                "--shuffle" => shuffle = true,
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        // Flags replace the environment list rather than extend it.
        if !cli_interests.is_empty() {
            interests = cli_interests;
        }

        Ok(Some(Self {
            source,
            age,
            interests,
            count,
            cache,
            shuffle,
        }))
    }
}

fn parse_age(raw: String) -> Result<u8, ArgsError> {
    raw.trim()
        .parse::<u8>()
        .map_err(|_| ArgsError::InvalidAge { raw })
}

fn build_source(args: &Args) -> Result<Arc<dyn QuestionSource>, Box<dyn std::error::Error>> {
    let source: Arc<dyn QuestionSource> = match args.source {
        SourceKind::Static => Arc::new(StaticQuestionSource::canned().with_shuffle(args.shuffle)),
        SourceKind::Generated => {
            // A missing key is a startup failure, before any quiz is attempted.
            let config = GenerationConfig::from_env()?;
            tracing::info!(model = %config.model, base_url = %config.base_url, "using generated questions");
            Arc::new(GeneratedQuestionSource::from_config(config))
        }
    };

    if args.cache {
        return Ok(Arc::new(CachedQuestionSource::new(source)));
    }
    Ok(source)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app=info,services=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let mut argv = std::env::args().skip(1);
    let args = match Args::parse(&mut argv) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            return Err(e.into());
        }
    };

    let profile = Profile::new(args.age, args.interests.clone())?;
    let source = build_source(&args)?;
    let service = QuizService::new(Clock::system(), source).with_question_count(args.count);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut terminal = Terminal::new(stdin.lock(), stdout.lock());
    terminal.play(&service, profile).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
