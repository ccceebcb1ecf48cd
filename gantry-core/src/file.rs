use std::{
    io,
    path::{Path, PathBuf},
};

use miette::Diagnostic;
use thiserror::Error;

/// Marker placed on the first line of every machine-owned file.
///
/// Its presence is the sole signal that licenses an unconditional overwrite;
/// the byte sequence must never change or existing generated trees stop
/// being recognized.
pub const SENTINEL: &str = "// Code generated by gantry. DO NOT EDIT.";

/// Errors raised while reconciling a rendered file against disk state.
#[derive(Debug, Error, Diagnostic)]
pub enum WriteError {
    #[error("refusing to overwrite '{path}': file is not machine-owned")]
    #[diagnostic(
        code(gantry::foreign_file_conflict),
        help(
            "the file lacks the generation sentinel on its first line; move it aside or delete it, then re-run"
        )
    )]
    ForeignFileConflict { path: PathBuf },

    #[error("failed to write '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of a reconciled write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was created or overwritten.
    Written,
    /// Scaffold already existed; left untouched.
    Skipped,
    /// Machine-owned file already had identical bytes; no write performed.
    Unchanged,
}

/// Ownership classification of an existing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    /// No file at the path.
    Absent,
    /// First line carries the sentinel; safe to overwrite.
    MachineOwned,
    /// Hand-written or otherwise unmarked; never overwritten.
    Foreign,
}

/// Classify an existing file by its leading sentinel comment.
pub fn classify(path: &Path) -> Result<FileClass, WriteError> {
    if !path.exists() {
        return Ok(FileClass::Absent);
    }
    let content = std::fs::read_to_string(path).map_err(|e| WriteError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    match content.lines().next() {
        Some(first) if first.trim_end() == SENTINEL => Ok(FileClass::MachineOwned),
        _ => Ok(FileClass::Foreign),
    }
}

/// How to handle existing files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Regenerate every run (machine-owned output).
    Always,
    /// Create once, never overwrite (hand-editable scaffolds).
    IfMissing,
}

/// Rules that determine how a file is written.
#[derive(Debug, Clone, Copy)]
pub struct FileRules {
    pub overwrite: Overwrite,
}

impl Default for FileRules {
    fn default() -> Self {
        Self {
            overwrite: Overwrite::Always,
        }
    }
}

/// Trait for types that represent a generated file.
///
/// Implementors render content fully in memory; `write` then performs a
/// single classify-then-write step per path so a run either produces the
/// whole file or leaves the previous bytes intact.
pub trait GeneratedFile {
    /// File path relative to the output base directory.
    fn path(&self, base: &Path) -> PathBuf;

    /// Rules for writing this file.
    fn rules(&self) -> FileRules;

    /// Render the full file content.
    fn render(&self) -> String;

    /// Write the file to disk according to its rules.
    fn write(&self, base: &Path) -> Result<WriteResult, WriteError> {
        let path = self.path(base);
        match self.rules().overwrite {
            Overwrite::Always => match classify(&path)? {
                FileClass::Foreign => Err(WriteError::ForeignFileConflict { path }),
                FileClass::MachineOwned => {
                    let content = self.render();
                    let existing = std::fs::read_to_string(&path).map_err(|e| WriteError::Io {
                        path: path.clone(),
                        source: e,
                    })?;
                    if existing == content {
                        Ok(WriteResult::Unchanged)
                    } else {
                        write_file(&path, &content)?;
                        Ok(WriteResult::Written)
                    }
                }
                FileClass::Absent => {
                    write_file(&path, &self.render())?;
                    Ok(WriteResult::Written)
                }
            },
            Overwrite::IfMissing => {
                if path.exists() {
                    Ok(WriteResult::Skipped)
                } else {
                    write_file(&path, &self.render())?;
                    Ok(WriteResult::Written)
                }
            }
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), WriteError> {
    let io_err = |e| WriteError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, content).map_err(io_err)
}
