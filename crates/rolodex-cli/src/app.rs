//! The interactive session: read a line, dispatch it, print the reply.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use crossterm::style::{Color, Stylize};
use rolodex_core::{directory::Directory, store::DirectoryStore};
use strum::IntoEnumIterator;

use crate::{
  commands::{self, Command, Reply},
  render,
};

const PROMPT: &str = "Enter a command: ";

const PALETTE: [Color; 6] = [
  Color::Green,
  Color::Yellow,
  Color::Blue,
  Color::Magenta,
  Color::Cyan,
  Color::Red,
];

/// How replies are written out.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
  pub json:  bool,
  pub color: bool,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Session state: the directory being edited and where it is persisted.
pub struct App<S: DirectoryStore> {
  book:    Directory,
  store:   S,
  options: OutputOptions,
}

impl<S: DirectoryStore> App<S> {
  /// Load the directory from `store`. A store with no snapshot starts empty.
  pub fn load(store: S, options: OutputOptions) -> Result<Self> {
    let book = store.load().context("loading address book")?;
    tracing::info!(records = book.len(), "address book loaded");
    Ok(Self { book, store, options })
  }

  pub fn save(&self) -> Result<()> {
    self.store.save(&self.book).context("saving address book")?;
    tracing::info!(records = self.book.len(), "address book saved");
    Ok(())
  }

  /// Write the greeting and the list of available commands.
  pub fn print_banner(&self, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Welcome to the assistant!")?;
    writeln!(out, "Available commands:")?;
    for (i, command) in Command::iter().enumerate() {
      let usage = command.usage();
      if self.options.color {
        writeln!(out, "  {}", usage.with(PALETTE[i % PALETTE.len()]))?;
      } else {
        writeln!(out, "  {usage}")?;
      }
    }
    Ok(())
  }

  /// Run until `close`/`exit` or end of input, then save.
  ///
  /// Command errors are printed and the loop continues; only I/O failures and
  /// a failed save end the session with an error.
  pub fn run(&mut self, mut input: impl BufRead, out: &mut impl Write) -> Result<()> {
    let mut line = String::new();
    loop {
      write!(out, "{PROMPT}")?;
      out.flush()?;

      line.clear();
      if input.read_line(&mut line)? == 0 {
        tracing::debug!("end of input");
        writeln!(out)?;
        self.save()?;
        writeln!(out, "{}", render::FAREWELL)?;
        return Ok(());
      }

      match commands::dispatch(&line, &mut self.book) {
        Ok(Reply::Exit) => {
          self.save()?;
          writeln!(out, "{}", render::FAREWELL)?;
          return Ok(());
        }
        Ok(reply) => self.write_reply(&reply, out)?,
        Err(e) => {
          tracing::debug!(error = %e, "command failed");
          let text = e.to_string();
          if self.options.color {
            writeln!(out, "{}", text.red())?;
          } else {
            writeln!(out, "{text}")?;
          }
        }
      }
    }
  }

  fn write_reply(&self, reply: &Reply, out: &mut impl Write) -> Result<()> {
    let text = if self.options.json {
      render::render_json(reply).context("encoding reply as JSON")?
    } else {
      render::render_text(reply)
    };
    if !text.is_empty() {
      writeln!(out, "{text}")?;
    }
    Ok(())
  }
}
