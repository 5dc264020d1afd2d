//! User actions for the command line front ends.
//!
//! Both the one-shot subcommands and the interactive shell turn input into a
//! [`Command`] and run it through [`execute`]. Rejected actions are printed as
//! notices; only I/O on the output side is an error.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use crate::application::editor::{CopyOutcome, Editor, Notice};
use crate::generator::ComponentKind;
use crate::infra::clipboard::ClipboardSink;
use crate::infra::storage::Storage;

/// Line that ends a multi-line content block in the shell.
pub const CONTENT_TERMINATOR: &str = ".";

pub const SHELL_HELP: &str = "\
Commands:
  list                 show tabs (* marks the active one)
  add                  append a tab and select it
  remove               remove the active tab
  select N             select the tab at position N (1-based)
  title TEXT           rename the active tab (empty TEXT clears it)
  content TEXT         replace the active tab's content with TEXT
  content              read content lines until a line with a single '.'
  generate [PATH]      generate the document (print it, or write it to PATH)
  preview              print the last generated document
  copy                 copy the last generated document to the clipboard
  reset                forget saved tabs and start over
  help                 show this help
  quit                 leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add,
    Remove,
    /// 1-based position.
    Select(usize),
    Title(String),
    Content(String),
    /// Content follows on the next input lines.
    ReadContent,
    Generate {
        output: Option<PathBuf>,
        component: ComponentKind,
    },
    Preview,
    Copy,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    /// Parses one shell line. Text arguments keep their inner whitespace.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        let (verb, rest) = match trimmed.split_once(' ') {
            Some((verb, rest)) => (verb, rest),
            None => (trimmed, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "list" | "ls" => Ok(Command::List),
            "add" => Ok(Command::Add),
            "remove" | "rm" => Ok(Command::Remove),
            "select" => rest
                .trim()
                .parse::<usize>()
                .map(Command::Select)
                .map_err(|_| format!("select expects a tab position, got '{}'", rest.trim())),
            "title" => Ok(Command::Title(rest.to_string())),
            "content" if rest.is_empty() => Ok(Command::ReadContent),
            "content" => Ok(Command::Content(rest.to_string())),
            "generate" => Ok(Command::Generate {
                output: Some(rest.trim())
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from),
                component: ComponentKind::default(),
            }),
            "preview" => Ok(Command::Preview),
            "copy" => Ok(Command::Copy),
            "reset" => Ok(Command::Reset),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

/// Runs one command against the editor, printing results to `out`.
pub fn execute<S, C, W>(editor: &mut Editor<S, C>, command: Command, out: &mut W) -> Result<Flow>
where
    S: Storage,
    C: ClipboardSink,
    W: Write,
{
    let outcome = match command {
        Command::List => {
            print_tabs(editor, out)?;
            Ok(())
        }
        Command::Add => editor.add_tab(),
        Command::Remove => editor.remove_active(),
        Command::Select(position) => select_position(editor, position),
        Command::Title(title) => editor.rename_active(title),
        Command::Content(content) => editor.set_active_content(content),
        Command::ReadContent => Err(Notice::new(
            "content expects text (or a block in the interactive shell)",
        )),
        Command::Generate { output, component } => {
            editor.set_component(component);
            let html = editor.generate()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, html)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    writeln!(out, "Wrote {}", path.display())?;
                }
                None => out.write_all(html.as_bytes())?,
            }
            Ok(())
        }
        Command::Preview => {
            writeln!(out, "{}", editor.preview())?;
            Ok(())
        }
        Command::Copy => match editor.copy(Instant::now()) {
            CopyOutcome::Copied => {
                writeln!(out, "✅ Copied!")?;
                Ok(())
            }
            CopyOutcome::Failed(notice) => {
                writeln!(out, "notice: {notice}")?;
                writeln!(out, "Generated HTML:")?;
                let html = match editor.last_generated() {
                    Some(html) => html.to_string(),
                    None => editor.render()?,
                };
                out.write_all(html.as_bytes())?;
                Ok(())
            }
        },
        Command::Reset => {
            editor.reset();
            writeln!(out, "Tabs reset.")?;
            Ok(())
        }
        Command::Help => {
            writeln!(out, "{SHELL_HELP}")?;
            Ok(())
        }
        Command::Quit => return Ok(Flow::Quit),
    };

    if let Err(notice) = outcome {
        writeln!(out, "notice: {notice}")?;
    }
    Ok(Flow::Continue)
}

/// Interactive loop: one command per line until `quit` or end of input.
pub fn run_shell<S, C, R, W>(editor: &mut Editor<S, C>, input: R, out: &mut W) -> Result<()>
where
    S: Storage,
    C: ClipboardSink,
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write_prompt(editor, out)?;
        let Some(line) = lines.next() else {
            writeln!(out)?;
            return Ok(());
        };
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(Command::ReadContent) => {
                let mut block = Vec::new();
                for next in lines.by_ref() {
                    let next = next.context("Failed to read content")?;
                    if next == CONTENT_TERMINATOR {
                        break;
                    }
                    block.push(next);
                }
                Command::Content(block.join("\n"))
            }
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                continue;
            }
        };

        log::debug!("shell command: {:?}", command);
        if execute(editor, command, out)? == Flow::Quit {
            return Ok(());
        }
    }
}

fn write_prompt<S: Storage, C: ClipboardSink, W: Write>(
    editor: &Editor<S, C>,
    out: &mut W,
) -> Result<()> {
    if editor.copied_indicator_visible(Instant::now()) {
        write!(out, "tabsmith (copied)> ")?;
    } else {
        write!(out, "tabsmith> ")?;
    }
    out.flush()?;
    Ok(())
}

fn select_position<S: Storage, C: ClipboardSink>(
    editor: &mut Editor<S, C>,
    position: usize,
) -> Result<(), Notice> {
    let len = editor.tabs().len();
    if position == 0 || position > len {
        return Err(Notice::new(format!(
            "No tab at position {position} (choose 1-{len})."
        )));
    }
    editor.select(position - 1)
}

fn print_tabs<S: Storage, C: ClipboardSink, W: Write>(
    editor: &Editor<S, C>,
    out: &mut W,
) -> Result<()> {
    let active = editor.tabs().active_index();
    for (i, label) in editor.tab_labels().iter().enumerate() {
        let marker = if i == active { '*' } else { ' ' };
        writeln!(out, "{marker} {}. {label}", i + 1)?;
    }
    let tab = editor.tabs().active_tab();
    writeln!(out, "--- content of tab {} ---", active + 1)?;
    writeln!(out, "{}", tab.content)?;
    Ok(())
}
