use stock_research_advisor::{
    config::Config,
    console::{Console, TerminalConsole},
    display,
    questions::QuestionGenerator,
    StockAgent,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Diagnostics go to stderr so they never interleave with the conversation
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_session());

    // The stdin reader may still be parked in a blocking read after Ctrl-C
    runtime.shutdown_background();
    Ok(())
}

async fn run_session() {
    println!("🚀 Initializing Dynamic Stock Research Agent...");

    let config = Config::from_env();
    let questions = QuestionGenerator::new(config.clone());
    println!("{}", display::ai_status(questions.is_ai_enabled()));

    let mut agent = StockAgent::new(config, questions, TerminalConsole::new());

    // Reads handle Ctrl-C themselves and finish the run in the same poll, so
    // the run branch goes first; this one only fires during the Gemini call.
    let result = tokio::select! {
        biased;
        result = agent.run() => result,
        _ = interrupted() => {
            println!("{}", display::goodbye());
            return;
        }
    };

    match result {
        Ok(outcome) => {
            info!(session_id = %outcome.session_id, "Session finished");

            let console = agent.console_mut();
            let mut report = Vec::new();
            if outcome.complete {
                report.push(display::success());
            }
            report.push(display::final_results(&outcome));

            for text in report {
                if let Err(e) = console.write(&text) {
                    warn!("Failed to write final report: {}", e);
                    break;
                }
            }
        }
        Err(e) => {
            eprintln!("{}", display::error(&e.to_string()));
        }
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}
