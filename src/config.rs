use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    terminal,
};
use tracing::{info, warn};

use crate::error::ConfigError;

const KEY_INPUT_TIMEOUT: Duration = Duration::from_secs(15);
const SAVE_PROMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of questions requested per generation.
pub const DEFAULT_QUESTION_COUNT: usize = 3;

/// Settings for a [`QuizGenerator`](crate::core::QuizGenerator).
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// How many questions to ask the model for. A request, not a guarantee.
    pub question_count: usize,
    /// Append a JSON Schema of the question grammar to the prompt.
    pub schema_guidance: bool,
    /// Directory for prompt/response transcripts, if any.
    pub transcript_dir: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            schema_guidance: false,
            transcript_dir: None,
        }
    }
}

impl GeneratorConfig {
    #[must_use]
    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count;
        self
    }

    #[must_use]
    pub fn with_schema_guidance(mut self, enabled: bool) -> Self {
        self.schema_guidance = enabled;
        self
    }

    #[must_use]
    pub fn with_transcript_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.transcript_dir = Some(dir.into());
        self
    }
}

/// Types whose API key lives in an environment variable.
pub trait KeyFromEnv {
    const KEY_NAME: &'static str;

    /// Look the key up in the environment after loading `.env`, if present.
    fn find_key() -> Option<String> {
        let _ = dotenvy::dotenv();
        env::var(Self::KEY_NAME).ok().filter(|k| !k.trim().is_empty())
    }

    fn require_key() -> Result<String, ConfigError> {
        Self::find_key().ok_or(ConfigError::MissingKey(Self::KEY_NAME))
    }

    /// Like [`find_key`](Self::find_key), but asks on the terminal when the key
    /// is missing and offers to persist the answer to `.env`.
    fn find_key_with_user() -> Result<String, ConfigError> {
        if let Some(key) = Self::find_key() {
            return Ok(key);
        }

        print!(
            "Environment variable {} not found. Please enter the API key ({}s timeout): ",
            Self::KEY_NAME,
            KEY_INPUT_TIMEOUT.as_secs()
        );
        io::stdout().flush().map_err(ConfigError::Terminal)?;

        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let mut input = String::new();
            if io::stdin().read_line(&mut input).is_ok() {
                let _ = sender.send(input.trim().to_string());
            }
        });

        let api_key = match receiver.recv_timeout(KEY_INPUT_TIMEOUT) {
            Ok(input) if !input.is_empty() => input,
            _ => {
                warn!(key = Self::KEY_NAME, "No API key entered");
                return Err(ConfigError::MissingKey(Self::KEY_NAME));
            }
        };

        if Self::prompt_save_to_env() {
            match Self::save_to_env_file(&api_key) {
                Ok(()) => println!("API key saved to .env file"),
                Err(e) => eprintln!("Warning: {}", e),
            }
        }

        Ok(api_key)
    }

    fn prompt_save_to_env() -> bool {
        print!("Add {} to .env file? (y/N): ", Self::KEY_NAME);
        if io::stdout().flush().is_err() {
            return false;
        }

        if let Ok(answer) = read_single_key() {
            println!("{}", if answer { "y" } else { "n" });
            return answer;
        }

        let mut input = String::new();
        io::stdin().read_line(&mut input).is_ok() && input.trim().eq_ignore_ascii_case("y")
    }

    /// Append `KEY=value` to `.env` unless the key is already there.
    fn save_to_env_file(api_key: &str) -> Result<(), ConfigError> {
        if let Ok(content) = std::fs::read_to_string(".env") {
            if content.lines().any(|l| l.starts_with(&format!("{}=", Self::KEY_NAME))) {
                return Ok(());
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(".env")?;
        writeln!(file, "{}={}", Self::KEY_NAME, api_key)?;
        info!(key = Self::KEY_NAME, "Appended API key to .env");
        Ok(())
    }
}

/// Single keystroke y/N answer; anything but `y` (or a timeout) is no.
fn read_single_key() -> io::Result<bool> {
    terminal::enable_raw_mode()?;

    let answer = match event::poll(SAVE_PROMPT_TIMEOUT) {
        Ok(true) => matches!(
            event::read(),
            Ok(Event::Key(KeyEvent { code: KeyCode::Char('y' | 'Y'), .. }))
        ),
        Ok(false) => false,
        Err(e) => {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
    };

    terminal::disable_raw_mode()?;
    Ok(answer)
}
