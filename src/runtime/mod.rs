//! Runtime abstraction for system operations.
//!
//! This module provides a trait-based abstraction over the filesystem and
//! the operator's terminal, enabling dependency injection and testability.
//!
//! # Structure
//!
//! - `fs` - File system operations (inspect, read first line, list directories)
//! - `user` - User interaction (line prompts)

mod fs;
mod user;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use user::prompt_with_io;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // File System
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    /// True for a symbolic link itself, whatever it points at.
    fn is_symlink(&self, path: &Path) -> bool;

    /// Raw bytes of the first line, without the line terminator.
    /// Nothing past the first newline is read.
    fn read_first_line(&self, path: &Path) -> Result<Vec<u8>>;

    /// List the entries of a directory in the order the operating system
    /// returns them.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    // User interaction
    /// Show `prompt` and read one line of input.
    /// Returns `None` once the input source is exhausted.
    fn prompt(&self, prompt: &str) -> Result<Option<String>>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn is_file(&self, path: &Path) -> bool {
        self.is_file_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.is_symlink_impl(path)
    }

    fn read_first_line(&self, path: &Path) -> Result<Vec<u8>> {
        self.read_first_line_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn prompt(&self, prompt: &str) -> Result<Option<String>> {
        self.prompt_impl(prompt)
    }
}
