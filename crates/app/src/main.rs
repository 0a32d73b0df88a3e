use std::sync::Arc;
use std::time::Duration;

use relic_core::QuizEvent;
use services::{Clock, QuizLoopService, QuizSession, SessionError};
use storage::pool::JsonFilePoolLoader;
use storage::repository::Storage;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

mod args;
mod command;
mod render;

use args::{Args, Env, Invocation, print_usage};
use command::{Command, print_help};
use render::{format_year, render_event, render_history};

const HISTORY_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    RoundStarted,
    Quit,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Drives one session from stdin lines and the one-second ticker.
struct Terminal {
    svc: QuizLoopService,
    json: bool,
}

impl Terminal {
    fn emit(&self, events: &[QuizEvent]) -> Result<(), serde_json::Error> {
        for event in events {
            if self.json {
                println!("{}", serde_json::to_string(event)?);
            } else if let Some(text) = render_event(event) {
                println!("{text}");
            }
        }
        Ok(())
    }

    fn open_round(&self, session: &mut QuizSession) -> Result<Flow, Box<dyn std::error::Error>> {
        let ready = self.svc.start_round(session)?;
        self.emit(&[QuizEvent::RoundReady(ready)])?;
        Ok(Flow::RoundStarted)
    }

    async fn handle(
        &self,
        session: &mut QuizSession,
        command: Command,
    ) -> Result<Flow, Box<dyn std::error::Error>> {
        match command {
            Command::Choose(index) => {
                let choice = session
                    .attempt()
                    .and_then(|a| a.choices().get(index - 1).cloned());
                match choice {
                    Some(choice) => {
                        self.svc.select_answer(session, &choice)?;
                        println!("Selected: {choice}");
                    }
                    None => println!("No choice {index}."),
                }
            }
            Command::Year(year) => {
                self.svc.set_year_guess(session, year)?;
                println!("Year guess: {}", format_year(year));
            }
            Command::Submit => {
                let events = self.svc.submit_current(session).await?;
                self.emit(&events)?;
            }
            Command::Next => return self.open_round(session),
            Command::PlayAgain => {
                self.svc.play_again(session).await?;
                return self.open_round(session);
            }
            Command::History => {
                let rows = self.svc.history(HISTORY_LIMIT).await?;
                println!("{}", render_history(&rows));
            }
            Command::Help => print_help(),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn tick(&self, session: &mut QuizSession) -> Result<(), Box<dyn std::error::Error>> {
        let events = self.svc.tick(session).await?;
        self.emit(&events)?;
        Ok(())
    }

    async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut session = self.svc.start_session().await?;
        if session.is_resumed() {
            println!(
                "Welcome back: round {} of {}, score {}.",
                session.state().round_count + 1,
                session.settings().session_length(),
                session.state().score
            );
        }
        print_help();
        self.open_round(&mut session)?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.reset();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    let flow = match Command::parse(&line) {
                        Ok(command) => report(self.handle(&mut session, command).await)?,
                        Err(err) => {
                            println!("{err}");
                            Flow::Continue
                        }
                    };
                    match flow {
                        Flow::Quit => break,
                        Flow::RoundStarted => ticker.reset(),
                        Flow::Continue => {}
                    }
                }
                _ = ticker.tick(), if session.has_live_timer() => {
                    report(self.tick(&mut session).await.map(|()| Flow::Continue))?;
                }
            }
        }

        Ok(())
    }
}

/// Engine errors are reported to the player and play continues. Anything
/// else ends the program.
fn report(
    result: Result<Flow, Box<dyn std::error::Error>>,
) -> Result<Flow, Box<dyn std::error::Error>> {
    match result {
        Err(err) => match err.downcast_ref::<SessionError>() {
            Some(SessionError::Engine(engine_err)) => {
                println!("{engine_err}");
                Ok(Flow::Continue)
            }
            _ => Err(err),
        },
        ok => ok,
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = match Args::parse(std::env::args().skip(1), &Env::from_process()) {
        Ok(Invocation::Play(args)) => args,
        Ok(Invocation::Help) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return Err(err.into());
        }
    };

    init_tracing();
    tracing::info!(
        pool = %args.pool_path.display(),
        db = %args.db,
        profile = %args.profile,
        "starting relic quiz"
    );

    let storage = Storage::open(&args.db).await?;

    let loader = Arc::new(JsonFilePoolLoader::new(&args.pool_path));
    let mut svc = QuizLoopService::from_storage(Clock::system(), loader, &storage, args.settings)
        .with_profile(args.profile);
    if let Some(seed) = args.seed {
        svc = svc.with_seed(seed);
    }

    Terminal {
        svc,
        json: args.json,
    }
    .run()
    .await
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relic_core::EngineError;

    #[test]
    fn engine_errors_do_not_end_the_program() {
        let err: Box<dyn std::error::Error> =
            Box::new(SessionError::from(EngineError::NoAnswerSelected));
        assert_eq!(report(Err(err)).unwrap(), Flow::Continue);

        let fatal: Box<dyn std::error::Error> =
            Box::new(SessionError::from(storage::repository::StorageError::NotFound));
        assert!(report(Err(fatal)).is_err());
    }
}
