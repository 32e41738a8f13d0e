//! Tessera command-line driver.
//!
//! Reads and writes `FormattedDocument` JSON, so saved editor content can be
//! checked, restyled and inspected outside the editor.
//!
//! Usage:
//!   # Re-encode a document through the style model, reporting dropped entries
//!   tessera normalize doc.json
//!
//!   # Apply a JSON array of toolbar commands, print the saved document
//!   tessera apply --doc doc.json script.json
//!
//!   # Show the merged CSS effect of every styled run
//!   tessera effects doc.json
//!
//! `-` reads from stdin. Set `RUST_LOG=debug` for per-command logging.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

use tessera_style::{
    Command, ContentState, EditorConfig, EditorSession, ImportReport, RenderEffect, StyleRegistry, ToolbarView,
};
use tessera_types::FormattedDocument;

#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(about = "Inspect and restyle Tessera formatted documents", long_about = None)]
struct Args {
    /// Editor config (RON) with palette and font-size ladder
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import and re-export a document
    Normalize {
        /// Document to read (`-` for stdin)
        input: PathBuf,

        /// Print the import report instead of the document
        #[arg(long)]
        report: bool,
    },
    /// Run a command script against a document
    Apply {
        /// JSON array of commands (`-` for stdin)
        script: PathBuf,

        /// Starting document; an empty editor when omitted
        #[arg(short, long, value_name = "FILE")]
        doc: Option<PathBuf>,

        /// Print the toolbar state after the script instead of the document
        #[arg(long)]
        toolbar: bool,
    },
    /// List styled runs with their CSS
    Effects {
        /// Document to read (`-` for stdin)
        input: PathBuf,
    },
    /// Print the plain text of a document
    Text {
        /// Document to read (`-` for stdin)
        input: PathBuf,
    },
}

/// A maximal run of characters in one block sharing one effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct EffectRun {
    block: usize,
    start: usize,
    end: usize,
    css: String,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let registry = load_registry(args.config.as_deref())?;

    let out = match args.command {
        Commands::Normalize { input, report } => {
            let doc = read_document(&input)?;
            let (doc, import_report) = normalize(&doc, &registry);
            if report {
                to_json(&import_report, args.pretty)?
            } else {
                to_json(&doc, args.pretty)?
            }
        }
        Commands::Apply { script, doc, toolbar } => {
            let start = doc.as_deref().map(read_document).transpose()?;
            let commands = read_script(&script)?;
            let (saved, view) = apply_script(registry, start.as_ref(), commands);
            if toolbar {
                to_json(&view, args.pretty)?
            } else {
                to_json(&saved, args.pretty)?
            }
        }
        Commands::Effects { input } => {
            let doc = read_document(&input)?;
            let content = tessera_style::import(&doc, &registry);
            to_json(&effect_runs(&content, &registry), args.pretty)?
        }
        Commands::Text { input } => read_document(&input)?.plain_text(),
    };

    println!("{out}");
    Ok(())
}

fn load_registry(path: Option<&Path>) -> Result<Arc<StyleRegistry>> {
    let Some(path) = path else {
        return Ok(StyleRegistry::standard());
    };
    let config = EditorConfig::load(path).with_context(|| format!("loading config {}", path.display()))?;
    Ok(Arc::new(StyleRegistry::from_config(&config)?))
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn read_document(path: &Path) -> Result<FormattedDocument> {
    let text = read_input(path)?;
    FormattedDocument::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}

fn read_script(path: &Path) -> Result<Vec<Command>> {
    let text = read_input(path)?;
    serde_json::from_str(&text).with_context(|| format!("parsing command script {}", path.display()))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}

/// Round-trip a document through the style model.
fn normalize(doc: &FormattedDocument, registry: &StyleRegistry) -> (FormattedDocument, ImportReport) {
    let (content, report) = tessera_style::import_with_report(doc, registry);
    if !report.is_clean() {
        tracing::info!(
            skipped = report.skipped.len(),
            inconsistent = report.inconsistent_blocks.len(),
            "document did not import cleanly"
        );
    }
    (tessera_style::export(&content), report)
}

/// Run `commands` in a fresh session, optionally starting from `start`.
///
/// Returns the document as saved after the last command, and the toolbar.
fn apply_script(
    registry: Arc<StyleRegistry>,
    start: Option<&FormattedDocument>,
    commands: Vec<Command>,
) -> (FormattedDocument, ToolbarView) {
    let mut session = EditorSession::with_registry(registry);
    if let Some(doc) = start {
        session.load(doc);
    }
    for command in commands {
        session.dispatch(command);
    }
    (session.save(), session.toolbar())
}

fn effect_runs(content: &ContentState, registry: &StyleRegistry) -> Vec<EffectRun> {
    let mut runs = Vec::new();
    for (block_idx, block) in content.blocks().enumerate() {
        let mut current: Option<(usize, RenderEffect)> = None;
        for (i, set) in block.styles().iter().enumerate() {
            let effect = registry.resolve_effect(set);
            if current.as_ref().is_some_and(|(_, prev)| *prev == effect) {
                continue;
            }
            if let Some((start, prev)) = current.take() {
                push_run(&mut runs, block_idx, start, i, &prev);
            }
            current = Some((i, effect));
        }
        if let Some((start, prev)) = current {
            push_run(&mut runs, block_idx, start, block.len(), &prev);
        }
    }
    runs
}

fn push_run(runs: &mut Vec<EffectRun>, block: usize, start: usize, end: usize, effect: &RenderEffect) {
    if effect.is_plain() {
        return;
    }
    runs.push(EffectRun {
        block,
        start,
        end,
        css: effect.to_css(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tessera_style::{Alignment, Position, SkipReason, WireBlock};

    fn doc() -> FormattedDocument {
        FormattedDocument::new(
            Alignment::Left,
            vec![
                WireBlock::new("Hello", Alignment::Left)
                    .with_style(0, "BOLD")
                    .with_style(1, "BOLD")
                    .with_style(3, "COLOR_#FF0000"),
                WireBlock::new("plain", Alignment::Right),
            ],
        )
    }

    #[test]
    fn test_normalize_reports_dropped_entries() {
        let input = doc();
        let mut dirty = input.clone();
        dirty.blocks[1] = dirty.blocks[1].clone().with_style(99, "ITALIC");

        let (out, report) = normalize(&dirty, &StyleRegistry::default());
        assert_eq!(out, input);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::IndexOutOfRange);
    }

    #[test]
    fn test_apply_script_from_empty_editor() {
        let (saved, view) = apply_script(
            StyleRegistry::standard(),
            None,
            vec![Command::SetAlignment {
                alignment: Alignment::Justify,
            }],
        );
        assert_eq!(saved.alignment, Alignment::Justify);
        assert_eq!(saved.blocks.len(), 1);
        assert!(view.is_empty);
    }

    #[test]
    fn test_apply_script_restyles() {
        let start = doc();
        let script: Vec<Command> = serde_json::from_str(
            r##"[
                {"command": "select", "anchor": {"block": 0, "offset": 0}, "focus": {"block": 0, "offset": 5}},
                {"command": "toggle_italic"},
                {"command": "set_color", "hex": "#0000ff"},
                {"command": "set_font_size", "size": 13}
            ]"##,
        )
        .unwrap();
        let (saved, view) = apply_script(StyleRegistry::standard(), Some(&start), script);

        let block = &saved.blocks[0];
        assert_eq!(block.styles_at(3).count(), 2);
        assert!(block.styles.iter().all(|s| s.style != "COLOR_#FF0000"));
        assert!(!block.styles.iter().any(|s| s.style.starts_with("FONTSIZE_")));
        assert_eq!(view.current_color, "#0000FF");
        assert_eq!(view.current_font_size, 12);
        assert_eq!(view.active_styles, vec!["ITALIC", "COLOR_#0000FF"]);
    }

    #[test]
    fn test_effect_runs() {
        let registry = StyleRegistry::default();
        let content = tessera_style::import(&doc(), &registry);
        let runs = effect_runs(&content, &registry);
        assert_eq!(
            runs,
            vec![
                EffectRun {
                    block: 0,
                    start: 0,
                    end: 2,
                    css: "font-weight: bold".into(),
                },
                EffectRun {
                    block: 0,
                    start: 3,
                    end: 4,
                    css: "color: #ff0000".into(),
                },
            ]
        );
    }

    #[test]
    fn test_read_document_and_config_from_disk() {
        let mut doc_file = tempfile::NamedTempFile::new().unwrap();
        write!(doc_file, "{}", doc().to_json().unwrap()).unwrap();
        assert_eq!(read_document(doc_file.path()).unwrap(), doc());

        let mut cfg = tempfile::NamedTempFile::new().unwrap();
        write!(cfg, "(font_sizes: [10, 12, 14], default_font_size: 12)").unwrap();
        let registry = load_registry(Some(cfg.path())).unwrap();
        assert_eq!(registry.font_sizes(), &[10, 12, 14]);

        let (saved, _) = apply_script(
            registry,
            Some(&doc()),
            vec![
                Command::Select {
                    anchor: Position::new(tessera_style::BlockKey::new(0), 0),
                    focus: Position::new(tessera_style::BlockKey::new(0), 1),
                },
                Command::IncreaseFontSize,
                Command::IncreaseFontSize,
                Command::IncreaseFontSize,
            ],
        );
        assert_eq!(saved.blocks[0].styles_at(0).last(), Some("FONTSIZE_14"));
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let mut cfg = tempfile::NamedTempFile::new().unwrap();
        write!(cfg, "(font_sizes: [])").unwrap();
        assert!(load_registry(Some(cfg.path())).is_err());
    }
}
