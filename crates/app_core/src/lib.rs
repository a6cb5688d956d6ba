//! PlotView Core Domain Logic
//!
//! This crate contains:
//! - The file picker session (dialog controller and its actions)
//! - File name field parsing
//! - Directory navigation history
//! - Configuration
//! - Error types

pub mod action;
pub mod config;
pub mod dialog;
pub mod error;
pub mod navigation;
pub mod options;
pub mod tokenizer;

pub use action::{DialogAction, DialogEvent};
pub use config::{AppConfig, DialogConfig, ViewConfig, ViewMode};
pub use dialog::{DialogController, DialogState, SelectionResult};
pub use error::DialogError;
pub use navigation::{HistoryError, NavigationHistory};
pub use options::{DialogMode, DialogOptions};
pub use tokenizer::{quote_names, tokenize, ParseError};
