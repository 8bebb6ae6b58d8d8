use crate::interact::Console;
use crate::output::print_json;
use bob_core::workflow;
use bob_llm::Complete;
use std::io::{BufRead, Write};
use std::path::Path;

const EXIT_COMMAND: &str = ":exit";

pub fn run(root: &Path, message: &str, provider: Option<&str>, json: bool) -> anyhow::Result<()> {
    if json && message.trim().is_empty() {
        anyhow::bail!("--json needs a message; the interactive session has no JSON output");
    }
    let llm = super::open_provider(root, provider)?;

    if !message.trim().is_empty() {
        let reply = workflow::ask(&llm, message)?;
        if json {
            return print_json(&serde_json::json!({
                "provider": llm.kind().as_str(),
                "model": llm.model(),
                "response": reply,
            }));
        }
        println!("{reply}");
        return Ok(());
    }

    println!(
        "Chatting with {} ({}). Type {EXIT_COMMAND} to quit.",
        llm.kind(),
        llm.model()
    );
    session(&mut Console::stdio(), &llm)
}

/// Prompt/response loop until `:exit` or end of input. A failed call is
/// reported and the session continues.
fn session<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    llm: &dyn Complete,
) -> anyhow::Result<()> {
    while let Some(line) = console.ask("you> ")? {
        let line = line.trim();
        if line == EXIT_COMMAND {
            break;
        }
        if line.is_empty() {
            continue;
        }
        match workflow::ask(llm, line) {
            Ok(reply) => console.say(&format!("\n{reply}\n"))?,
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                console.say(&format!("error: {e}"))?;
            }
        }
    }
    Ok(())
}
