//! Interactive console client for the dispatcher.
//!
//! Runs the full dialogue loop in-process, no server required. Useful for
//! trying out slot-filling and the approval gate by hand:
//!
//! ```text
//! you> I want to book an appointment
//! concierge> To run `appointment_book`, I still need: ...
//! ```
//!
//! Type `exit` or `quit` to leave.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use care_concierge::bootstrap::{build_dispatcher, init_tracing};
use care_concierge::config::AppConfig;
use care_concierge::domain::outcome::TurnOutcome;
use care_concierge::domain::session::SessionState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    // Keep the console readable; RUST_LOG still turns logging on.
    init_tracing("warn");

    let dispatcher = Arc::new(build_dispatcher(&config));
    let mut session = SessionState::with_generated_id();

    println!(
        "care-concierge console ({} tools loaded). Type `exit` to leave.",
        dispatcher.catalog().len()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("you> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "exit" || message == "quit" {
            break;
        }

        match dispatcher
            .process_message(&mut session, message, None, None)
            .await
        {
            Ok(outcome) => {
                println!("concierge> {}", outcome.assistant_message());
                if let TurnOutcome::Executed { tool_result, .. } = &outcome {
                    println!("  result: {tool_result}");
                }
            }
            Err(err) => {
                eprintln!("error: {err}");
            }
        }
    }

    Ok(())
}
