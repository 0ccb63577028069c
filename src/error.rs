use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    /// Overlay state was requested while no activation is open.
    #[error("overlay state requested outside an open activation")]
    NoActiveActivation,
    #[error("unknown popover position `{0}` (expected one of top-center, bottom-center, left-center, right-center, window-center)")]
    InvalidPosition(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
