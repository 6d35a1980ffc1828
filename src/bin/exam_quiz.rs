use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use exam_quiz::clients::{ClientType, FlexibleClient};
use exam_quiz::config::DEFAULT_QUESTION_COUNT;
use exam_quiz::error::ConfigError;
use exam_quiz::{render, GeneratorConfig, QuizError, QuizGenerator, QuizSession, Unit, UnitCatalog};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Exam-pattern MCQ generator and quiz runner", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    GOOGLE_API_KEY     API key for Gemini
    ANTHROPIC_API_KEY  API key for Claude
    DEEPSEEK_API_KEY   API key for DeepSeek
    RUST_LOG           Log filter (overrides --verbose)

COMMANDS (during a quiz):
    <n> <label>   select an answer, e.g. `2 B`
    submit        lock answers and show results
    show          print the quiz again
    generate      ask for a fresh quiz
    reset         discard the current quiz
    quit          exit")]
struct Args {
    /// Completion provider: gemini, claude, deepseek, mock [default: auto-detect]
    #[arg(short, long, value_parser = parse_client)]
    client: Option<ClientType>,

    /// Unit name from the catalog [default: first unit]
    #[arg(short, long)]
    unit: Option<String>,

    /// JSON file of units to use instead of the built-in catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Notes file, overriding the unit's notes
    #[arg(long)]
    notes: Option<PathBuf>,

    /// Prior-year questions file, overriding the unit's PYQs
    #[arg(long)]
    pyqs: Option<PathBuf>,

    /// HTTP timeout for provider requests, in seconds [default: none]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Number of questions to request
    #[arg(short = 'n', long, default_value_t = DEFAULT_QUESTION_COUNT)]
    count: usize,

    /// Append the question JSON Schema to the prompt
    #[arg(long)]
    schema_guidance: bool,

    /// Save every prompt/response pair under this directory
    #[arg(long)]
    transcripts: Option<PathBuf>,

    /// Print the catalog's unit names and exit
    #[arg(long)]
    list_units: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_client(s: &str) -> Result<ClientType, ConfigError> {
    s.parse()
}

enum Command {
    Select(usize, String),
    Submit,
    Show,
    Generate,
    Reset,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let first = words.next()?;
    let command = match first.to_lowercase().as_str() {
        "submit" | "s" => Command::Submit,
        "show" => Command::Show,
        "generate" | "g" => Command::Generate,
        "reset" | "r" => Command::Reset,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        number => {
            let n: usize = number.parse().ok()?;
            let label = words.next()?;
            Command::Select(n.checked_sub(1)?, label.to_string())
        }
    };
    Some(command)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "exam_quiz=debug" } else { "exam_quiz=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn resolve_unit(args: &Args, catalog: &UnitCatalog) -> Result<Unit> {
    let base = match &args.unit {
        Some(name) => catalog.get(name).cloned().with_context(|| {
            format!("Unknown unit '{}'. Available: {}", name, catalog.names().collect::<Vec<_>>().join(", "))
        })?,
        None => match catalog.first() {
            Some(unit) => unit.clone(),
            None if args.notes.is_some() && args.pyqs.is_some() => Unit::new("Custom", "", ""),
            None => bail!("The catalog is empty; pass --notes and --pyqs"),
        },
    };

    let mut unit = base;
    if let Some(path) = &args.notes {
        unit.notes = std::fs::read_to_string(path).with_context(|| format!("Reading notes {}", path.display()))?;
    }
    if let Some(path) = &args.pyqs {
        unit.prior_questions =
            std::fs::read_to_string(path).with_context(|| format!("Reading PYQs {}", path.display()))?;
    }
    Ok(unit)
}

/// Map a typed label onto the question's own label, ignoring case.
fn canonical_label(session: &QuizSession, index: usize, typed: &str) -> String {
    session
        .question_set()
        .and_then(|set| set.get(index))
        .and_then(|q| q.labels().find(|l| l.eq_ignore_ascii_case(typed)))
        .map_or_else(|| typed.to_string(), str::to_string)
}

async fn generate(generator: &QuizGenerator<FlexibleClient>, session: &mut QuizSession, unit: &Unit) {
    println!("Setting the exam for '{}'...", unit.name);
    match generator.generate_into(session, &unit.notes, &unit.prior_questions).await {
        Ok(count) => {
            println!("Generated {} question(s).\n", count);
            print!("{}", render::quiz(session));
        }
        Err(e) => eprintln!("Generation failed: {}\nType `generate` to try again.", e),
    }
}

fn submit(session: &mut QuizSession) {
    match session.submit() {
        Ok(()) => match render::results(session) {
            Ok(text) => print!("\n{}", text),
            Err(e) => eprintln!("{}", e),
        },
        Err(QuizError::IncompleteAnswers { missing }) => println!("{}", render::incomplete_warning(&missing)),
        Err(e) => println!("{}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let catalog = match &args.catalog {
        Some(path) => UnitCatalog::from_json_file(path)?,
        None => UnitCatalog::builtin(),
    };

    if args.list_units {
        for name in catalog.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let unit = resolve_unit(&args, &catalog)?;

    let client_type = args.client.unwrap_or_else(ClientType::detect);
    println!("Using {} client", client_type);
    let client = FlexibleClient::from_type(client_type, args.timeout.map(Duration::from_secs))?;

    let mut config = GeneratorConfig::default()
        .with_question_count(args.count)
        .with_schema_guidance(args.schema_guidance);
    if let Some(dir) = &args.transcripts {
        config = config.with_transcript_dir(dir);
    }
    let generator = QuizGenerator::new(client, config);

    let mut session = QuizSession::new();
    generate(&generator, &mut session, &unit).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("[{}] command (help for options):", render::status(&session));
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let Some(command) = parse_command(&line) else {
            if !line.trim().is_empty() {
                println!("Unrecognized command. Type `help`.");
            }
            continue;
        };

        match command {
            Command::Select(index, typed) => {
                let label = canonical_label(&session, index, &typed);
                if let Err(e) = session.select_answer(index, label) {
                    println!("{}", e);
                }
            }
            Command::Submit => submit(&mut session),
            Command::Show => print!("{}", render::quiz(&session)),
            Command::Generate => generate(&generator, &mut session, &unit).await,
            Command::Reset => {
                session.reset();
                println!("Quiz cleared. Type `generate` for a new one.");
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    Ok(())
}

const HELP: &str = "<n> <label>  select answer (e.g. `1 B`)
submit       lock answers and show results
show         print the quiz
generate     ask for a fresh quiz
reset        discard the current quiz
quit         exit";
