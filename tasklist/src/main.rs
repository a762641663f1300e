//! Terminal front end for the task list.
//!
//! Renders the page after every change and reads one command per line from
//! stdin. Logs go to stderr so they never interleave with the page.
//!
//! # Usage
//!
//! ```bash
//! TASKLIST_DATA_DIR=~/.tasklist RUST_LOG=tasklist=debug cargo run --bin tasklist
//! ```

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tasklist::command::{self, Command, HELP, Outcome};
use tasklist::{AppEnvironment, Config, FileStore, TaskApp};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let storage = Arc::new(FileStore::new(&config.data_dir));
    tracing::info!(data_dir = %storage.dir().display(), "Configuration loaded");

    let app = TaskApp::open(AppEnvironment::production(storage));

    app.on_render(|page| println!("\n{page}\n"));

    println!("\n{}\n", app.view());
    println!("Type `help` for commands.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let outcome = line
            .parse::<Command>()
            .and_then(|cmd| command::execute(&app, cmd));

        match outcome {
            Ok(Outcome::Applied) => {},
            Ok(Outcome::Show) => println!("\n{}\n", app.view()),
            Ok(Outcome::Help) => println!("{HELP}"),
            Ok(Outcome::Quit) => break,
            Err(error) => println!("{error}"),
        }
    }

    tracing::info!("Bye");
    Ok(())
}
