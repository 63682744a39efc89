use indexmap::IndexSet;
use regex::{Regex, RegexBuilder};

use crate::aggregator::Analysis;
use crate::classifier::{categorize_command, Category};
use crate::error::Result;

fn build_pattern(pattern: &str, case_sensitive: bool) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()?)
}

#[derive(Debug, Default, PartialEq)]
pub struct KeywordMatches {
    pub commands: Vec<String>,
    pub words: Vec<String>,
}

#[derive(Debug, Default, PartialEq)]
pub struct CategoryMatches {
    pub categories: Vec<Category>,
    pub commands: Vec<String>,
}

/// Commands in history order (duplicates kept) and distinct keywords in
/// first-seen order.
pub fn search_keyword(analysis: &Analysis, pattern: &str, case_sensitive: bool) -> Result<KeywordMatches> {
    let re = build_pattern(pattern, case_sensitive)?;

    let commands = analysis
        .commands
        .iter()
        .filter(|cmd| re.is_match(cmd))
        .cloned()
        .collect();
    let words = analysis
        .token_counts
        .iter()
        .map(|(word, _)| word)
        .filter(|word| re.is_match(word))
        .cloned()
        .collect();

    Ok(KeywordMatches { commands, words })
}

/// Matches the pattern against both the long and the short category label.
pub fn search_category(analysis: &Analysis, pattern: &str, case_sensitive: bool) -> Result<CategoryMatches> {
    let re = build_pattern(pattern, case_sensitive)?;
    let label_matches =
        |category: &Category| re.is_match(&category.to_string()) || re.is_match(&category.short_label());

    let categories: IndexSet<Category> = analysis
        .category_counts
        .iter()
        .map(|(&category, _)| category)
        .filter(|category| label_matches(category))
        .collect();

    let commands = analysis
        .commands
        .iter()
        .filter(|cmd| categories.contains(&categorize_command(cmd)))
        .cloned()
        .collect();

    Ok(CategoryMatches { categories: categories.into_iter().collect(), commands })
}

pub fn format_keyword_results(matches: &KeywordMatches) -> Vec<String> {
    let mut lines = vec!["=== KEYWORD SEARCH RESULTS ===".to_string()];
    push_numbered(&mut lines, "Matching Commands:", &matches.commands);
    push_numbered(&mut lines, "Matching Keywords:", &matches.words);
    if matches.commands.is_empty() && matches.words.is_empty() {
        lines.push(String::new());
        lines.push("No matches found.".to_string());
    }
    lines
}

pub fn format_category_results(matches: &CategoryMatches) -> Vec<String> {
    let mut lines = vec!["=== CATEGORY SEARCH RESULTS ===".to_string()];
    let labels: Vec<String> = matches.categories.iter().map(ToString::to_string).collect();
    push_numbered(&mut lines, "Matching Categories:", &labels);
    push_numbered(&mut lines, "Matching Commands:", &matches.commands);
    if matches.commands.is_empty() && matches.categories.is_empty() {
        lines.push(String::new());
        lines.push("No matches found.".to_string());
    }
    lines
}

fn push_numbered(lines: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(heading.to_string());
    for (i, item) in items.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::DEFAULT_TOP_N;
    use crate::error::HistoryError;
    use crate::tokenizer::process_history;

    fn analysis() -> Analysis {
        let text = "git status\nGit Push origin\ncd /tmp\ngit status\nhtop";
        Analysis::new(process_history(text), DEFAULT_TOP_N).unwrap()
    }

    #[test]
    fn keyword_search_is_case_insensitive_by_default() {
        let m = search_keyword(&analysis(), "^git", false).unwrap();
        assert_eq!(m.commands, vec!["git status", "Git Push origin", "git status"]);
        assert_eq!(m.words, vec!["git"]);

        let m = search_keyword(&analysis(), "^Git", true).unwrap();
        assert_eq!(m.commands, vec!["Git Push origin"]);
        assert!(m.words.is_empty());
    }

    #[test]
    fn category_search_uses_either_label() {
        let m = search_category(&analysis(), "version ctrl", false).unwrap();
        assert_eq!(m.categories, vec![Category::VersionControl]);
        assert_eq!(m.commands.len(), 3);

        let m = search_category(&analysis(), "monitor", false).unwrap();
        assert_eq!(m.commands, vec!["htop"]);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = search_keyword(&analysis(), "(", false).unwrap_err();
        assert!(matches!(err, HistoryError::Pattern(_)));
    }

    #[test]
    fn empty_results() {
        let lines = format_keyword_results(&KeywordMatches::default());
        assert_eq!(lines.last().unwrap(), "No matches found.");

        let lines = format_category_results(&search_category(&analysis(), "network", false).unwrap());
        assert_eq!(lines.last().unwrap(), "No matches found.");
    }
}
