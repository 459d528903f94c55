use crate::app::{App, AppError};
use crate::config::Config;
use crate::console::{parse_command, render_auth, render_session, Command, HELP};
use actix_rt::signal::unix;
use futures_lite::{FutureExt, StreamExt};
use session_processors::{AuthState, Credential, StepOutcome, TransitionError};
use std::sync::Arc;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{error, info, warn};

mod app;
mod config;
mod console;
mod impls;
mod services;
mod storage;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[actix_rt::main]
async fn main() -> Result<(), AppError> {
    let mut terminate = unix::signal(unix::SignalKind::terminate())?;
    let mut interrupt = unix::signal(unix::SignalKind::interrupt())?;

    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;

    info!(version = VERSION, backend_url = %config.backend_url, "Starting application...");

    let app = Arc::new(App::create(&config)?);

    println!(
        "Downloads go to {}",
        app.download_directory.path().display()
    );

    let state = match app.auth_gate.restore().await {
        Ok(state) => state,
        Err(error) => {
            warn!(%error, "Stored access code is no longer valid");
            AuthState::Unauthenticated
        }
    };
    println!("{}", render_auth(state));

    let shutdown = async {
        interrupt.recv().or(terminate.recv()).await;
        info!("Received shutdown signal. Shutting down...");
    };

    run_console(Arc::clone(&app)).or(shutdown).await;

    info!("Application stopped");

    Ok(())
}

async fn run_console(app: Arc<App>) {
    let mut lines = FramedRead::new(tokio::io::stdin(), LinesCodec::new());

    println!("{}", HELP);

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                error!(%error, "Unable to read from stdin");
                break;
            }
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                println!("{}", error);
                continue;
            }
        };

        if !handle_command(&app, command).await {
            break;
        }
    }
}

/// Returns `false` once the user asked to quit.
async fn handle_command(app: &Arc<App>, command: Command) -> bool {
    let protected = matches!(
        command,
        Command::Fetch(_) | Command::Format(_) | Command::Download
    );

    if protected {
        let state = app.auth_gate.state().await;

        if state != AuthState::Authenticated {
            println!("{}", render_auth(state));
            return true;
        }
    }

    match command {
        Command::Login(code) => {
            let app = Arc::clone(app);
            actix_rt::spawn(async move {
                match app.auth_gate.verify(Credential::new(code)).await {
                    Ok(state) => println!("{}", render_auth(state)),
                    Err(error) => println!("{}", error),
                }
            });
        }
        Command::Logout => {
            app.auth_gate.sign_out().await;
            app.session.reset().await;
            println!("{}", render_auth(AuthState::Unauthenticated));
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
        Command::Status => {
            println!("{}", render_auth(app.auth_gate.state().await));
            println!("{}", render_session(&app.session.snapshot().await));
        }
        Command::Fetch(url) => {
            let app = Arc::clone(app);
            actix_rt::spawn(async move {
                let outcome = app.session.submit(&url).await;
                report_step(&app, outcome).await;
            });
        }
        Command::Format(format_id) => match app.session.choose_format(format_id).await {
            Ok(()) => println!("{}", render_session(&app.session.snapshot().await)),
            Err(error) => println!("{}", error),
        },
        Command::Download => {
            let app = Arc::clone(app);
            actix_rt::spawn(async move {
                let outcome = app.session.download().await;
                report_step(&app, outcome).await;
            });
        }
    }

    true
}

async fn report_step(app: &App, outcome: Result<StepOutcome, TransitionError>) {
    match outcome {
        Ok(StepOutcome::Applied(_)) => {
            println!("{}", render_session(&app.session.snapshot().await));

            if app.auth_gate.state().await == AuthState::Unauthenticated {
                println!("{}", render_auth(AuthState::Unauthenticated));
            }
        }
        Ok(StepOutcome::Stale) => {}
        Err(error) => println!("{}", error),
    }
}
