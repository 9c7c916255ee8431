//! Command-line front end for the form completion engine.
//!
//! Runs a single case as an interactive terminal session: plain lines are
//! chat messages, slash commands drive the rest of the event surface.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use formclerk::adapters::{MarkdownFormRenderer, OpenAiConfig, OpenAiExtractor};
use formclerk::application::{CaseEvent, DispatchError, Dispatcher, EventOutcome};
use formclerk::config::AppConfig;
use formclerk::domain::case::CaseSession;
use formclerk::domain::schema::{registry, ServiceId};
use formclerk::ports::{ContinuationSignal, ImageEvidence};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let extractor = Arc::new(OpenAiExtractor::new(
        OpenAiConfig::new(config.ai.api_key.clone())
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    ));
    let renderer = Arc::new(MarkdownFormRenderer::new(&config.output.dir));
    let dispatcher = Dispatcher::new(extractor.clone(), extractor, renderer, registry());

    let context = registry()
        .default_service()
        .ok_or("no services registered")?
        .clone();
    let mut session = CaseSession::new(context);

    info!(service = %session.context().id, "case started");
    println!("{}", greeting(&session));
    print_help();

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match parse_command(line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => {
                print_help();
                continue;
            }
            Ok(Some(Command::Services)) => {
                for service in registry().iter() {
                    println!("  {} - {}", service.id, service.name);
                }
                continue;
            }
            Ok(Some(Command::Status)) => {
                print_status(&session);
                continue;
            }
            Ok(Some(Command::Event(event))) => event,
            Ok(None) => CaseEvent::UserMessage(line.to_string()),
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match dispatcher.dispatch(&mut session, event).await {
            Ok(outcome) => print_outcome(&outcome),
            Err(DispatchError::UnknownService(id)) => {
                println!("Unknown service '{id}'. Use /services to list them.");
            }
            Err(err) => {
                error!(error = %err, "event failed");
                println!("That did not work: {err}");
            }
        }
    }

    println!("Goodbye.");
    Ok(())
}

enum Command {
    Event(CaseEvent),
    Services,
    Status,
    Help,
    Quit,
}

/// Parses a slash command. `Ok(None)` means the line is a chat message.
fn parse_command(line: &str) -> Result<Option<Command>, String> {
    if !line.starts_with('/') {
        return Ok(None);
    }
    let mut parts = line.splitn(2, ' ');
    let head = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match head {
        "/quit" | "/exit" => Ok(Some(Command::Quit)),
        "/help" => Ok(Some(Command::Help)),
        "/services" => Ok(Some(Command::Services)),
        "/status" => Ok(Some(Command::Status)),
        "/reset" => Ok(Some(Command::Event(CaseEvent::ResetRequested))),
        "/service" => {
            if arg.is_empty() {
                Err("Usage: /service <id>".to_string())
            } else {
                Ok(Some(Command::Event(CaseEvent::ServiceSwitched(
                    ServiceId::new(arg),
                ))))
            }
        }
        "/scan" => {
            if arg.is_empty() {
                return Err("Usage: /scan <image path>".to_string());
            }
            let bytes = std::fs::read(arg)
                .map_err(|err| format!("Could not read '{arg}': {err}"))?;
            let evidence = if arg.to_ascii_lowercase().ends_with(".png") {
                ImageEvidence::png(bytes)
            } else {
                ImageEvidence::jpeg(bytes)
            };
            Ok(Some(Command::Event(CaseEvent::DocumentSubmitted(evidence))))
        }
        "/render" => {
            let output_name = if arg.is_empty() {
                "Application.md".to_string()
            } else {
                arg.to_string()
            };
            Ok(Some(Command::Event(CaseEvent::RenderRequested {
                output_name,
            })))
        }
        other => Err(format!("Unknown command '{other}'. Use /help.")),
    }
}

fn greeting(session: &CaseSession) -> String {
    session
        .transcript()
        .turns()
        .last()
        .map(|turn| turn.text.clone())
        .unwrap_or_default()
}

fn print_help() {
    println!("Commands:");
    println!("  /services        list available services");
    println!("  /service <id>    switch service (starts the case over)");
    println!("  /scan <path>     submit a document image");
    println!("  /render [name]   write the filled document");
    println!("  /status          show collected fields and progress");
    println!("  /reset           start the case over");
    println!("  /quit            exit");
}

fn print_status(session: &CaseSession) {
    let status = session.completion_status();
    println!(
        "Service: {} ({}/{} fields)",
        session.context().name,
        status.filled,
        status.total
    );
    for spec in session.context().schema.iter() {
        let value = session
            .known_data()
            .get(&spec.id)
            .map(|v| v.as_str().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {}: {}", spec.label, value);
    }
}

fn print_outcome(outcome: &EventOutcome) {
    if let Some(reply) = &outcome.reply {
        println!("{reply}");
    }
    if let Some(rendered) = &outcome.rendered {
        println!("Document written to {}", rendered.path.display());
    }
    println!(
        "[{}/{} fields{}]",
        outcome.status.filled,
        outcome.status.total,
        if outcome.signal == Some(ContinuationSignal::Done) {
            ", ready to render"
        } else {
            ""
        }
    );
}
