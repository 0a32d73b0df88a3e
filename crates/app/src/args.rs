use std::fmt;
use std::path::PathBuf;

use relic_core::model::{QuizSettings, SettingsError};
use storage::sqlite::DatabaseLocation;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidDbUrl { raw: String },
    InvalidSettings(SettingsError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSettings(err) => write!(f, "invalid settings: {err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<SettingsError> for ArgsError {
    fn from(err: SettingsError) -> Self {
        ArgsError::InvalidSettings(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(flag: &'static str, raw: String) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--pool <path>] [--db <sqlite_url>] [--profile <name>] \
         [--rounds <n>] [--timed] [--time-limit <secs>] [--lives <n>] [--seed <n>] [--json]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --pool data/artifacts.json");
    eprintln!("  --db sqlite:relic.sqlite3");
    eprintln!("  --profile default");
    eprintln!("  --rounds 5 --lives 2 --time-limit 90 (untimed unless --timed)");
    eprintln!("  --json prints every event as one JSON line");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RELIC_POOL, RELIC_DB_URL, RELIC_PROFILE, RELIC_TIME_LIMIT, RUST_LOG");
}

/// What the binary was asked to do.
#[derive(Debug)]
pub enum Invocation {
    Play(Args),
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub pool_path: PathBuf,
    pub db: DatabaseLocation,
    pub profile: String,
    pub settings: QuizSettings,
    pub seed: Option<u64>,
    pub json: bool,
}

/// Environment fallbacks, read once so parsing stays testable.
#[derive(Debug, Clone, Default)]
pub struct Env {
    pub pool: Option<String>,
    pub db_url: Option<String>,
    pub profile: Option<String>,
    pub time_limit: Option<String>,
    /// Base for relative database paths.
    pub cwd: PathBuf,
}

impl Env {
    pub fn from_process() -> Self {
        Self {
            pool: std::env::var("RELIC_POOL").ok(),
            db_url: std::env::var("RELIC_DB_URL").ok(),
            profile: std::env::var("RELIC_PROFILE").ok(),
            time_limit: std::env::var("RELIC_TIME_LIMIT").ok(),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl Args {
    pub fn parse(
        args: impl IntoIterator<Item = String>,
        env: &Env,
    ) -> Result<Invocation, ArgsError> {
        let mut args = args.into_iter();

        let mut pool_path = env
            .pool
            .clone()
            .map_or_else(|| PathBuf::from("data/artifacts.json"), PathBuf::from);
        let raw_db = env.db_url.as_deref().unwrap_or("sqlite://relic.sqlite3");
        let mut db = parse_db(raw_db, env)?;
        let mut profile = env
            .profile
            .clone()
            .unwrap_or_else(|| services::DEFAULT_PROFILE.to_owned());
        let mut settings = QuizSettings::default();
        if let Some(raw) = env.time_limit.clone() {
            settings = settings.with_time_limit_secs(parse_number("RELIC_TIME_LIMIT", raw)?)?;
        }
        let mut seed = None;
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--pool" => pool_path = PathBuf::from(require_value(&mut args, "--pool")?),
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    db = parse_db(&value, env)?;
                }
                "--profile" => profile = require_value(&mut args, "--profile")?,
                "--rounds" => {
                    let value = require_value(&mut args, "--rounds")?;
                    settings = settings.with_session_length(parse_number("--rounds", value)?)?;
                }
                "--timed" => settings = settings.with_timed_mode(true),
                "--time-limit" => {
                    let value = require_value(&mut args, "--time-limit")?;
                    settings = settings.with_time_limit_secs(parse_number("--time-limit", value)?)?;
                }
                "--lives" => {
                    let value = require_value(&mut args, "--lives")?;
                    settings = settings.with_lives_per_round(parse_number("--lives", value)?)?;
                }
                "--seed" => {
                    let value = require_value(&mut args, "--seed")?;
                    seed = Some(parse_number("--seed", value)?);
                }
                "--json" => json = true,
                "--help" | "-h" => return Ok(Invocation::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Invocation::Play(Self {
            pool_path,
            db,
            profile,
            settings,
            seed,
            json,
        }))
    }
}

fn parse_db(raw: &str, env: &Env) -> Result<DatabaseLocation, ArgsError> {
    DatabaseLocation::parse(raw, &env.cwd).map_err(|_| ArgsError::InvalidDbUrl {
        raw: raw.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    fn play(raw: &[&str], env: &Env) -> Args {
        match Args::parse(argv(raw), env).unwrap() {
            Invocation::Play(args) => args,
            Invocation::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn defaults_without_flags() {
        let args = play(&[], &Env::default());
        assert_eq!(args.pool_path, PathBuf::from("data/artifacts.json"));
        assert_eq!(
            args.db,
            DatabaseLocation::File(PathBuf::from("relic.sqlite3"))
        );
        assert_eq!(args.profile, "default");
        assert_eq!(args.settings, QuizSettings::default());
        assert_eq!(args.seed, None);
        assert!(!args.json);
    }

    #[test]
    fn flags_override_settings() {
        let args = play(
            &[
                "--rounds", "3", "--timed", "--time-limit", "30", "--lives", "4", "--db",
                "sqlite::memory:", "--profile", "ada", "--seed", "9", "--json",
            ],
            &Env::default(),
        );
        assert_eq!(args.settings.session_length(), 3);
        assert!(args.settings.timed_mode());
        assert_eq!(args.settings.time_limit_secs(), 30);
        assert_eq!(args.settings.lives_per_round(), 4);
        assert_eq!(args.db, DatabaseLocation::Memory("sqlite::memory:".into()));
        assert_eq!(args.profile, "ada");
        assert_eq!(args.seed, Some(9));
        assert!(args.json);
    }

    #[test]
    fn env_fallbacks_apply_before_flags() {
        let env = Env {
            pool: Some("/tmp/pool.json".into()),
            db_url: None,
            profile: Some("grace".into()),
            time_limit: Some("45".into()),
            ..Env::default()
        };
        let args = play(&["--profile", "ada"], &env);
        assert_eq!(args.pool_path, PathBuf::from("/tmp/pool.json"));
        assert_eq!(args.profile, "ada");
        assert_eq!(args.settings.time_limit_secs(), 45);
    }

    #[test]
    fn rejects_bad_input() {
        let env = Env::default();
        assert!(matches!(
            Args::parse(argv(&["--rounds"]), &env).unwrap_err(),
            ArgsError::MissingValue { flag: "--rounds" }
        ));
        assert!(matches!(
            Args::parse(argv(&["--lives", "many"]), &env).unwrap_err(),
            ArgsError::InvalidNumber { .. }
        ));
        assert!(matches!(
            Args::parse(argv(&["--time-limit", "1"]), &env).unwrap_err(),
            ArgsError::InvalidSettings(SettingsError::InvalidTimeLimit(1))
        ));
        assert!(matches!(
            Args::parse(argv(&["--bogus"]), &env).unwrap_err(),
            ArgsError::UnknownArg(_)
        ));
        assert!(matches!(
            Args::parse(argv(&["--help"]), &env).unwrap(),
            Invocation::Help
        ));
    }

    #[test]
    fn database_paths_resolve_against_working_directory() {
        let env = Env {
            db_url: Some("sqlite:data/env.sqlite3".into()),
            cwd: PathBuf::from("/home/ada"),
            ..Env::default()
        };
        let args = play(&[], &env);
        assert_eq!(
            args.db,
            DatabaseLocation::File(PathBuf::from("/home/ada/data/env.sqlite3"))
        );

        let args = play(&["--db", "quiz.db"], &env);
        assert_eq!(args.db.url(), "sqlite:///home/ada/quiz.db");

        assert!(matches!(
            Args::parse(argv(&["--db", " "]), &env).unwrap_err(),
            ArgsError::InvalidDbUrl { .. }
        ));
    }
}
