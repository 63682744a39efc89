//! Frequency statistics over tokenized, categorized history.

use std::hash::Hash;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::classifier::{categorize_command, Category};
use crate::error::EmptyInputError;
use crate::mistype::count_potential_mistypes;
use crate::tokenizer::Tokenized;

pub const DEFAULT_TOP_N: usize = 15;

/// Occurrence counts keyed in first-seen order.
#[derive(Debug, Clone)]
pub struct FrequencyTable<T: Hash + Eq> {
    counts: IndexMap<T, usize>,
    total: usize,
}

impl<T: Hash + Eq> Default for FrequencyTable<T> {
    fn default() -> Self {
        FrequencyTable { counts: IndexMap::new(), total: 0 }
    }
}

impl<T: Hash + Eq> FromIterator<T> for FrequencyTable<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut counts = IndexMap::new();
        let mut total = 0;
        for value in iter {
            *counts.entry(value).or_insert(0) += 1;
            total += 1;
        }
        FrequencyTable { counts, total }
    }
}

impl<T: Hash + Eq> FrequencyTable<T> {
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn unique(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn count(&self, value: &T) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, usize)> {
        self.counts.iter().map(|(value, &count)| (value, count))
    }

    /// Highest counts first; equal counts keep first-seen order.
    /// `None` returns every entry.
    pub fn most_common(&self, n: Option<usize>) -> Vec<(&T, usize)> {
        let mut ranked: Vec<(&T, usize)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(n) = n {
            ranked.truncate(n);
        }
        ranked
    }

    /// `unique / total`, or an error when the table is empty.
    pub fn variety(&self, when_empty: EmptyInputError) -> Result<f64, EmptyInputError> {
        ratio(self.unique(), self.total(), when_empty)
    }
}

pub fn ratio(numerator: usize, denominator: usize, when_empty: EmptyInputError) -> Result<f64, EmptyInputError> {
    if denominator == 0 {
        return Err(when_empty);
    }
    Ok(numerator as f64 / denominator as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_commands: usize,
    pub unique_commands: usize,
    pub command_variety: f64,
    pub total_keywords: usize,
    pub unique_keywords: usize,
    pub keyword_variety: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Complexity {
    pub average_length: f64,
    pub shortest: usize,
    pub longest: usize,
}

/// Everything the reporters need, derived once per run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub commands: Vec<String>,
    pub command_counts: FrequencyTable<String>,
    pub token_counts: FrequencyTable<String>,
    pub category_counts: FrequencyTable<Category>,
    pub top_n: usize,
}

impl Analysis {
    /// Fails with `NoCommands` when the history yielded nothing.
    pub fn new(tokenized: Tokenized, top_n: usize) -> Result<Self, EmptyInputError> {
        if tokenized.is_empty() {
            return Err(EmptyInputError::NoCommands);
        }

        let Tokenized { commands, tokens } = tokenized;
        let command_counts: FrequencyTable<String> = commands.iter().cloned().collect();
        let token_counts: FrequencyTable<String> = tokens.into_iter().collect();
        let category_counts: FrequencyTable<Category> =
            commands.iter().map(|cmd| categorize_command(cmd)).collect();

        debug!(
            commands = command_counts.total(),
            tokens = token_counts.total(),
            categories = category_counts.unique(),
            "built frequency tables"
        );

        Ok(Analysis { commands, command_counts, token_counts, category_counts, top_n })
    }

    pub fn summary(&self) -> Result<Summary, EmptyInputError> {
        Ok(Summary {
            total_commands: self.command_counts.total(),
            unique_commands: self.command_counts.unique(),
            command_variety: self.command_counts.variety(EmptyInputError::NoCommands)?,
            total_keywords: self.token_counts.total(),
            unique_keywords: self.token_counts.unique(),
            keyword_variety: self.token_counts.variety(EmptyInputError::NoTokens)?,
        })
    }

    pub fn top_commands(&self) -> Vec<(&String, usize)> {
        self.command_counts.most_common(Some(self.top_n))
    }

    pub fn top_tokens(&self) -> Vec<(&String, usize)> {
        self.token_counts.most_common(Some(self.top_n))
    }

    pub fn top_categories(&self) -> Vec<(&Category, usize)> {
        self.category_counts.most_common(Some(self.top_n))
    }

    /// Every category with its count and share of all commands, largest first.
    pub fn category_distribution(&self) -> Result<Vec<(Category, usize, f64)>, EmptyInputError> {
        let total = self.category_counts.total();
        self.category_counts
            .most_common(None)
            .into_iter()
            .map(|(&category, count)| {
                Ok((category, count, ratio(count, total, EmptyInputError::NoCommands)?))
            })
            .collect()
    }

    pub fn complexity(&self) -> Result<Complexity, EmptyInputError> {
        let lengths: Vec<usize> = self.commands.iter().map(|c| c.chars().count()).collect();
        Ok(Complexity {
            average_length: ratio(lengths.iter().sum(), lengths.len(), EmptyInputError::NoCommands)?,
            shortest: lengths.iter().copied().min().unwrap_or(0),
            longest: lengths.iter().copied().max().unwrap_or(0),
        })
    }

    pub fn potential_mistypes(&self) -> usize {
        count_potential_mistypes(&self.command_counts)
    }
}
