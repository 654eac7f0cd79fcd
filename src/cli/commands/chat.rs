//! Interactive chat about a stored document.

use std::io::Write;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::Context;
use crate::actions::ChatSession;
use crate::cli::helpers::print_json;
use crate::cli::icons::{error, info, speaker};
use crate::models::Sender;

const QUIT: &[&str] = &["/quit", "/exit"];
const RESET: &str = "/reset";

/// Run a read-eval loop until EOF or `/quit`.
///
/// The transcript lives only for this session. `/reset` clears it.
pub async fn cmd_chat(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let doc = ctx.document(id)?;
    let actions = ctx.actions()?;
    let session = ChatSession::new(doc.content.clone());

    if !ctx.json {
        println!(
            "{} Chatting about {}. {} clears the conversation, {} leaves.",
            info(),
            style(&doc.name).bold(),
            style(RESET).cyan(),
            style(QUIT[0]).cyan()
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if !ctx.json {
            print!("{} ", speaker(Sender::User));
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if QUIT.contains(&question) {
            break;
        }
        if question == RESET {
            session.reset();
            if !ctx.json {
                println!("{} Conversation cleared", info());
            }
            continue;
        }

        match session.ask(&actions, question).await {
            Ok(Some(reply)) if ctx.json => print_json(&reply)?,
            Ok(Some(reply)) => println!("{} {}\n", speaker(reply.sender), reply.text),
            Ok(None) => {}
            Err(e) => eprintln!("{} {}", error(), e.message()),
        }
    }

    if ctx.json {
        print_json(&session.messages())?;
    }
    Ok(())
}
