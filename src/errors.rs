// src/errors.rs

//! Crate-wide error type.
//!
//! Command implementations report failures as `anyhow::Error`; everything the
//! crate itself can fail on is a [`CmdError`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmdError {
    #[error("cannot determine working directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("context directory must be absolute: {0:?}")]
    RelativeDir(PathBuf),

    #[error("cannot open log file {path:?}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Flag(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("hosted command did not complete: {0}")]
    Hosted(String),
}

pub type Result<T> = std::result::Result<T, CmdError>;
