//! Analysis commands over stored documents.

use std::path::Path;

use console::style;

use super::Context;
use crate::analysis::{
    DocumentInput, ExtractOutput, Findings, GlossaryEntry, IntoFindings, MediaInput,
    QuestionInput, SpeechInput,
};
use crate::cli::helpers::{audio_path, load_file, print_json, save_audio, LoadedFile};
use crate::cli::icons::{bullet, error, info, severity, success};
use crate::models::Document;

fn document_input(doc: &Document) -> DocumentInput {
    DocumentInput::new(doc.content.clone())
}

fn header(doc: &Document, title: &str) {
    println!(
        "{} {} {}",
        info(),
        style(title).bold(),
        style(format!("({})", doc.name)).dim()
    );
    println!();
}

pub async fn cmd_summarize(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let doc = ctx.document(id)?;
    let output = ctx.actions()?.summarize(&document_input(&doc)).await?;

    if ctx.json {
        return print_json(&output);
    }
    header(&doc, "Clause summaries");
    for (i, item) in output.clause_summaries.iter().enumerate() {
        println!("{}. {}", i + 1, style(&item.clause).italic());
        println!("   {}", item.summary);
        println!();
    }
    Ok(())
}

pub async fn cmd_glossary(ctx: &Context, id: &str, speak: Option<&Path>) -> anyhow::Result<()> {
    let doc = ctx.document(id)?;
    let actions = ctx.actions()?;
    let entries = actions.glossary(&document_input(&doc)).await?;

    if let Some(dir) = speak {
        speak_glossary(&actions, &entries, dir).await?;
    }

    if ctx.json {
        return print_json(&entries);
    }
    header(&doc, "Glossary");
    match entries.into_findings() {
        Findings::NoneFound => println!("No legal terms needing explanation were found."),
        Findings::Found(entries) => {
            for entry in entries {
                println!("{} {}: {}", bullet(), style(&entry.term).bold(), entry.definition);
            }
        }
    }
    Ok(())
}

/// One audio file per entry. A failed entry is reported and skipped.
async fn speak_glossary(
    actions: &crate::actions::Actions,
    entries: &[GlossaryEntry],
    dir: &Path,
) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", dir.display(), e))?;

    for entry in entries {
        let path = audio_path(dir, &entry.term);
        match actions
            .text_to_speech(&SpeechInput::for_glossary_entry(entry))
            .await
        {
            Ok(output) => {
                save_audio(&output.audio_data_uri, &path).await?;
                eprintln!("{} {}", success(), path.display());
            }
            Err(e) => eprintln!("{} {}: {}", error(), entry.term, e),
        }
    }
    Ok(())
}

pub async fn cmd_speak(ctx: &Context, text: &str, output: &Path) -> anyhow::Result<()> {
    let speech = ctx.actions()?.text_to_speech(&SpeechInput::new(text)).await?;
    save_audio(&speech.audio_data_uri, output).await?;

    if ctx.json {
        return print_json(&serde_json::json!({ "output": output }));
    }
    println!("{} Saved audio to {}", success(), output.display());
    Ok(())
}

pub async fn cmd_benchmark(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let doc = ctx.document(id)?;
    let actions = ctx.actions()?;
    let output = actions.benchmark_fairness(&document_input(&doc)).await?;

    if ctx.json {
        return print_json(&output);
    }
    header(
        &doc,
        &format!(
            "Fairness benchmark ({})",
            actions.analyzer().settings().jurisdiction
        ),
    );
    match output.into_findings() {
        Findings::NoneFound => println!("No potentially unfair clauses were found."),
        Findings::Found(flagged) => {
            for item in flagged {
                println!("[{}] {}", severity(item.severity), style(&item.clause).italic());
                println!("   {}", item.reason);
                println!();
            }
        }
    }
    Ok(())
}

pub async fn cmd_contradictions(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let doc = ctx.document(id)?;
    let output = ctx
        .actions()?
        .detect_contradictions(&document_input(&doc))
        .await?;

    if ctx.json {
        return print_json(&output);
    }
    header(&doc, "Contradictions");
    match output.into_findings() {
        Findings::NoneFound => println!("No contradictions were found."),
        Findings::Found(found) => {
            for item in found {
                let [first, second] = &item.contradictory_clauses;
                println!("{} {}", bullet(), style(first).italic());
                println!("{} {}", bullet(), style(second).italic());
                println!("   {}", item.explanation);
                println!();
            }
        }
    }
    Ok(())
}

/// Reverse Q&A: list the clauses relevant to a question.
pub async fn cmd_ask(ctx: &Context, id: &str, question: &str) -> anyhow::Result<()> {
    let doc = ctx.document(id)?;
    let input = QuestionInput::new(doc.content.clone(), question);
    let output = ctx.actions()?.reverse_q_and_a(&input).await?;

    if ctx.json {
        return print_json(&output);
    }
    header(&doc, question);
    if output.relevant_clauses.is_empty() {
        println!("No clauses in this document relate to that question.");
    }
    for clause in &output.relevant_clauses {
        println!("{}", clause);
        println!();
    }
    Ok(())
}

/// Extract text from a media file without storing it.
pub async fn cmd_extract(ctx: &Context, file: &Path, ocr: bool) -> anyhow::Result<()> {
    let uri = match load_file(file).await? {
        LoadedFile::Media(uri) => uri,
        // Already text: nothing to extract
        LoadedFile::Text(text) if ctx.json => return print_json(&ExtractOutput { text }),
        LoadedFile::Text(text) => {
            println!("{}", text);
            return Ok(());
        }
    };

    let actions = ctx.actions()?;
    let input = MediaInput::new(uri.to_string());
    let output = if ocr {
        actions.ocr(&input).await?
    } else {
        actions.extract_text(&input).await?
    };

    if ctx.json {
        return print_json(&output);
    }
    println!("{}", output.text);
    Ok(())
}
