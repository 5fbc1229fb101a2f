use std::io::{self, Write};
use std::process::{Command, Stdio};

use thiserror::Error;

/// Failure to place text on a clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard command '{program}' could not be started")]
    Spawn { program: String, source: io::Error },
    #[error("clipboard command '{program}' exited with {status}")]
    Status { program: String, status: String },
    #[error("failed to write to clipboard")]
    Io(#[from] io::Error),
    #[error("clipboard is unavailable")]
    Unavailable,
}

/// Destination for copied example code.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard that records every write.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: Vec<String>,
    fail: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose writes always fail.
    pub fn failing() -> Self {
        MemoryClipboard {
            writes: Vec::new(),
            fail: true,
        }
    }

    pub fn last(&self) -> Option<&str> {
        self.writes.last().map(String::as_str)
    }

    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Unavailable);
        }
        self.writes.push(text.to_string());
        Ok(())
    }
}

/// Pipes text into an external program such as `wl-copy` or `pbcopy`.
#[derive(Clone, Debug)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Build from an argv list. Returns `None` for an empty list.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(CommandClipboard {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|source| ClipboardError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Dropping stdin closes the pipe; the child is always waited on.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };
        let status = child.wait()?;
        written?;
        if !status.success() {
            return Err(ClipboardError::Status {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Writes copied text to any writer, typically stdout.
pub struct WriterClipboard<W: Write> {
    writer: W,
}

impl<W: Write> WriterClipboard<W> {
    pub fn new(writer: W) -> Self {
        WriterClipboard { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterClipboard<io::Stdout> {
    pub fn stdout() -> Self {
        WriterClipboard::new(io::stdout())
    }
}

impl<W: Write> Clipboard for WriterClipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.writer.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
