//! Shell history analysis: commands and keywords are pulled out of raw
//! history text, each command is put in one category, and the results are
//! counted and ranked for reporting.

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod interactive;
pub mod mistype;
pub mod report;
pub mod search;
pub mod tokenizer;

pub use aggregator::{Analysis, FrequencyTable, Summary, DEFAULT_TOP_N};
pub use classifier::{categorize_command, Category, Language};
pub use error::{EmptyInputError, HistoryError, Result};
pub use tokenizer::{process_history, Tokenized};

/// Tokenizes, classifies and counts one history text.
pub fn analyze(history_text: &str, top_n: usize) -> std::result::Result<Analysis, EmptyInputError> {
    Analysis::new(process_history(history_text), top_n)
}
