//! Recent-documents commands.

use std::path::PathBuf;

use console::style;
use tokio::io::AsyncReadExt;

use super::Context;
use crate::analysis::MediaInput;
use crate::cli::helpers::{load_file, print_json, truncate, LoadedFile};
use crate::cli::icons::{bullet, info, success};

/// Where `docs add` takes its content from.
#[derive(Debug)]
pub enum AddSource {
    Text(String),
    File(PathBuf),
    Stdin,
}

impl AddSource {
    pub fn from_args(
        text: Option<String>,
        file: Option<PathBuf>,
        stdin: bool,
    ) -> anyhow::Result<Self> {
        match (text, file, stdin) {
            (Some(text), None, false) => Ok(AddSource::Text(text)),
            (None, Some(file), false) => Ok(AddSource::File(file)),
            (None, None, true) => Ok(AddSource::Stdin),
            _ => anyhow::bail!("Provide exactly one of --text, --file or --stdin"),
        }
    }
}

/// Add a document to the store.
///
/// Media files are converted to text first; the original is kept as a data
/// URI alongside the extracted text.
pub async fn cmd_docs_add(
    ctx: &Context,
    source: AddSource,
    name: Option<&str>,
    ocr: bool,
) -> anyhow::Result<()> {
    let documents = ctx.documents()?;

    let (content, file_name, data_uri, file_type) = match source {
        AddSource::Text(text) => (text, None, None, None),
        AddSource::Stdin => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            (text, None, None, None)
        }
        AddSource::File(path) => {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned());

            match load_file(&path).await? {
                LoadedFile::Text(text) => (text, file_name, None, None),
                LoadedFile::Media(uri) => {
                    if !ctx.json {
                        eprintln!(
                            "{} Extracting text from {} ({})",
                            info(),
                            path.display(),
                            uri.mime_type
                        );
                    }
                    let actions = ctx.actions()?;
                    let input = MediaInput::new(uri.to_string());
                    let output = if ocr && uri.is_image() {
                        actions.ocr(&input).await?
                    } else {
                        actions.extract_text(&input).await?
                    };
                    let mime = uri.mime_type.clone();
                    (output.text, file_name, Some(uri.to_string()), Some(mime))
                }
            }
        }
    };

    let name = name.or(file_name.as_deref());
    let document = documents.add(&content, name, data_uri, file_type)?;

    if ctx.json {
        return print_json(&document);
    }
    println!(
        "{} Added {} {}",
        success(),
        style(&document.name).bold(),
        style(&document.id).dim()
    );
    Ok(())
}

/// List documents, newest first.
pub fn cmd_docs_list(ctx: &Context) -> anyhow::Result<()> {
    let list = ctx.documents()?.list();

    if ctx.json {
        return print_json(&list);
    }
    if list.is_empty() {
        println!("No documents yet. Add one with 'nomiko docs add'.");
        return Ok(());
    }

    for doc in &list {
        println!(
            "{} {}  {}  {}",
            bullet(),
            style(&doc.id).dim(),
            doc.created_at.format("%Y-%m-%d %H:%M"),
            truncate(&doc.name, 60)
        );
    }
    Ok(())
}

pub fn cmd_docs_show(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let doc = ctx.document(id)?;

    if ctx.json {
        return print_json(&doc);
    }
    println!("{}", style(&doc.name).bold());
    println!("  ID:      {}", doc.id);
    println!("  Added:   {}", doc.created_at.to_rfc3339());
    if let Some(ref file_type) = doc.file_type {
        println!("  Type:    {}", file_type);
    }
    println!();
    println!("{}", doc.content);
    Ok(())
}

/// Delete a document. Deleting an unknown ID is not an error.
pub fn cmd_docs_delete(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let documents = ctx.documents()?;
    let existed = documents.get(id).is_some();
    documents.delete(id)?;

    if ctx.json {
        return print_json(&serde_json::json!({ "id": id, "deleted": existed }));
    }
    if existed {
        println!("{} Deleted {}", success(), id);
    } else {
        println!("{} No document with ID {}", info(), id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_source_requires_exactly_one() {
        assert!(matches!(
            AddSource::from_args(Some("x".into()), None, false),
            Ok(AddSource::Text(_))
        ));
        assert!(matches!(
            AddSource::from_args(None, None, true),
            Ok(AddSource::Stdin)
        ));
        assert!(AddSource::from_args(None, None, false).is_err());
        assert!(AddSource::from_args(Some("x".into()), None, true).is_err());
    }
}
