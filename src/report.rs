//! Text, JSON and CSV renderings of an [`Analysis`].

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use thousands::Separable;

use crate::aggregator::{ratio, Analysis, Summary};
use crate::error::{EmptyInputError, Result};

const RULE_TOP: &str = "╔════════════════════════════════════════════╗";
const RULE_MID: &str = "╟────────────────────────────────────────────╢";
const RULE_BOTTOM: &str = "╚════════════════════════════════════════════╝";
const LABEL_WIDTH: usize = 30;
const INNER_WIDTH: usize = 42;

fn truncate(label: &str, width: usize) -> String {
    label.chars().take(width.min(LABEL_WIDTH)).collect()
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn ranked_lines<T: Display>(items: &[(T, usize)]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            let rank = format!("{:>2}. ", i + 1);
            let count = count.separate_with_commas();
            // label column shrinks so wide counts stay inside the box
            let room = INNER_WIDTH.saturating_sub(rank.chars().count() + count.chars().count());
            let label = truncate(&label.to_string(), room.saturating_sub(1));
            format!("║ {}{:<room$}{} ║", rank, label, count, room = room)
        })
        .collect()
}

/// The default fixed-width report.
pub fn boxed_report(analysis: &Analysis) -> Result<Vec<String>> {
    let s = analysis.summary()?;
    let mut lines = vec![
        RULE_TOP.to_string(),
        "║          COMMAND HISTORY ANALYSIS          ║".to_string(),
        RULE_MID.to_string(),
        format!("║ {:<20} {:>21} ║", "Total commands:", s.total_commands.separate_with_commas()),
        format!("║ {:<20} {:>21} ║", "Unique commands:", s.unique_commands.separate_with_commas()),
        format!("║ {:<20} {:>21} ║", "Command variety:", percent(s.command_variety)),
        RULE_MID.to_string(),
        format!("║ {:<20} {:>21} ║", "Total keywords:", s.total_keywords.separate_with_commas()),
        format!("║ {:<20} {:>21} ║", "Unique keywords:", s.unique_keywords.separate_with_commas()),
        format!("║ {:<20} {:>21} ║", "Keyword variety:", percent(s.keyword_variety)),
        RULE_MID.to_string(),
        "║           MOST FREQUENT COMMANDS           ║".to_string(),
    ];
    lines.extend(ranked_lines(&analysis.top_commands()));
    lines.push(RULE_MID.to_string());
    lines.push("║            MOST FREQUENT WORDS             ║".to_string());
    lines.extend(ranked_lines(&analysis.top_tokens()));
    lines.push(RULE_MID.to_string());
    lines.push("║               TOP CATEGORIES               ║".to_string());
    let categories: Vec<(String, usize)> = analysis
        .top_categories()
        .into_iter()
        .map(|(c, n)| (c.short_label(), n))
        .collect();
    lines.extend(ranked_lines(&categories));
    lines.push(RULE_BOTTOM.to_string());
    Ok(lines)
}

pub fn bare_report(analysis: &Analysis) -> Result<Vec<String>> {
    let s = analysis.summary()?;
    let complexity = analysis.complexity()?;
    let mut lines = vec![
        "COMMAND STATISTICS".to_string(),
        "------------------".to_string(),
        format!("Total commands: {}", s.total_commands),
        format!("Unique commands: {}", s.unique_commands),
        format!("Command variety: {}", percent(s.command_variety)),
        format!("Total keywords: {}", s.total_keywords),
        format!("Unique keywords: {}", s.unique_keywords),
        format!("Keyword variety: {}", percent(s.keyword_variety)),
        format!("Avg command length: {:.1} chars", complexity.average_length),
        String::new(),
        "TOP CATEGORIES:".to_string(),
    ];
    for (category, count) in analysis.category_counts.most_common(Some(5)) {
        lines.push(format!("{}: {}", category, count));
    }
    Ok(lines)
}

pub fn brief_report(analysis: &Analysis) -> Result<Vec<String>> {
    let s = analysis.summary()?;
    let c = analysis.complexity()?;
    Ok(vec![
        format!("Commands: {} ({} unique)", s.total_commands, s.unique_commands),
        format!("Keywords: {} ({} unique)", s.total_keywords, s.unique_keywords),
        format!("Command length: avg {:.1}, min {}, max {}", c.average_length, c.shortest, c.longest),
    ])
}

pub fn detailed_report(analysis: &Analysis) -> Result<Vec<String>> {
    let s = analysis.summary()?;
    let c = analysis.complexity()?;
    let mistypes = analysis.potential_mistypes();
    let mistype_ratio = ratio(mistypes, s.total_commands, EmptyInputError::NoCommands)?;

    let mut lines = vec![
        "=== DETAILED ANALYSIS ===".to_string(),
        String::new(),
        "Basic Statistics:".to_string(),
        format!("- Total commands: {}", s.total_commands.separate_with_commas()),
        format!(
            "- Unique commands: {} ({} variety)",
            s.unique_commands.separate_with_commas(),
            percent(s.command_variety)
        ),
        format!("- Potentially mistyped: {} ({})", mistypes.separate_with_commas(), percent(mistype_ratio)),
        format!("- Total keywords: {}", s.total_keywords.separate_with_commas()),
        format!(
            "- Unique keywords: {} ({} variety)",
            s.unique_keywords.separate_with_commas(),
            percent(s.keyword_variety)
        ),
        String::new(),
        "Command Complexity:".to_string(),
        format!("- Average length: {:.1} characters", c.average_length),
        format!("- Shortest command: {} chars", c.shortest),
        format!("- Longest command: {} chars", c.longest),
        String::new(),
        "Category Distribution:".to_string(),
    ];
    for (category, count, share) in analysis.category_distribution()? {
        lines.push(format!(
            "- {:26}: {:>5} ({:>6})",
            category.to_string(),
            count.separate_with_commas(),
            percent(share)
        ));
    }
    lines.push(String::new());
    lines.push("Top Keywords:".to_string());
    for (i, (word, count)) in analysis.token_counts.most_common(Some(5)).into_iter().enumerate() {
        lines.push(format!("{}. {:20} {:>5}x", i + 1, word, count.separate_with_commas()));
    }
    Ok(lines)
}

#[derive(Debug, Serialize)]
struct CommandCount<'a> {
    command: &'a str,
    count: usize,
}

#[derive(Debug, Serialize)]
struct WordCount<'a> {
    word: &'a str,
    count: usize,
}

#[derive(Debug, Serialize)]
struct CategoryCount {
    category: String,
    count: usize,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    summary: Summary,
    top_commands: Vec<CommandCount<'a>>,
    top_words: Vec<WordCount<'a>>,
    top_categories: Vec<CategoryCount>,
    all_categories: IndexMap<String, usize>,
}

pub fn json_report(analysis: &Analysis) -> Result<String> {
    let report = JsonReport {
        summary: analysis.summary()?,
        top_commands: analysis
            .top_commands()
            .into_iter()
            .map(|(command, count)| CommandCount { command, count })
            .collect(),
        top_words: analysis
            .top_tokens()
            .into_iter()
            .map(|(word, count)| WordCount { word, count })
            .collect(),
        top_categories: analysis
            .top_categories()
            .into_iter()
            .map(|(category, count)| CategoryCount { category: category.to_string(), count })
            .collect(),
        all_categories: analysis
            .category_counts
            .most_common(None)
            .into_iter()
            .map(|(category, count)| (category.to_string(), count))
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    kind: &'a str,
    value: String,
    count: usize,
}

/// Writes `kind,value,count` rows: top commands, top words, then every category.
pub fn write_csv<W: io::Write>(analysis: &Analysis, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for (command, count) in analysis.top_commands() {
        csv.serialize(CsvRow { kind: "command", value: command.clone(), count })?;
    }
    for (word, count) in analysis.top_tokens() {
        csv.serialize(CsvRow { kind: "word", value: word.clone(), count })?;
    }
    for (category, count) in analysis.category_counts.most_common(None) {
        csv.serialize(CsvRow { kind: "category", value: category.to_string(), count })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn export_csv(analysis: &Analysis, path: &Path) -> Result<()> {
    write_csv(analysis, std::fs::File::create(path)?)
}

pub fn print_lines(lines: &[String]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Cyan when stdout is a terminal `term` can drive, plain otherwise.
pub fn print_colored(lines: &[String]) -> Result<()> {
    match term::stdout() {
        Some(mut t) => {
            let colored = t.fg(term::color::CYAN).is_ok();
            for line in lines {
                writeln!(t, "{}", line)?;
            }
            if colored {
                t.reset().ok();
            }
            Ok(())
        }
        None => print_lines(lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::DEFAULT_TOP_N;
    use crate::error::{EmptyInputError, HistoryError};
    use crate::tokenizer::process_history;

    fn analysis(text: &str) -> Analysis {
        Analysis::new(process_history(text), DEFAULT_TOP_N).unwrap()
    }

    #[test]
    fn json_shape() {
        let a = analysis("  1  ls -la\n  2  git commit -m \"fix bug\"\n#1700000000\n  3  cd /tmp\n  4  ls -la");
        let v: serde_json::Value = serde_json::from_str(&json_report(&a).unwrap()).unwrap();

        assert_eq!(v["summary"]["total_commands"], 4);
        assert_eq!(v["summary"]["unique_commands"], 3);
        assert_eq!(v["summary"]["command_variety"], 0.75);
        assert_eq!(v["summary"]["total_keywords"], 7);
        assert_eq!(v["summary"]["unique_keywords"], 6);
        assert_eq!(v["top_commands"][0]["command"], "ls -la");
        assert_eq!(v["top_commands"][0]["count"], 2);
        assert_eq!(v["top_words"][0]["word"], "ls");
        assert_eq!(v["top_categories"][0]["category"], "Navigation");
        assert_eq!(v["top_categories"][0]["count"], 3);
        assert_eq!(v["all_categories"]["Version Control"], 1);
    }

    #[test]
    fn all_categories_keep_rank_order() {
        let a = analysis("git log\nls\nls\nhtop\nls");
        let json = json_report(&a).unwrap();
        let nav = json.rfind("\"Navigation\"").unwrap();
        let vcs = json.rfind("\"Version Control\"").unwrap();
        let sys = json.rfind("\"System Monitoring\"").unwrap();
        assert!(nav < vcs && vcs < sys);
    }

    #[test]
    fn no_keywords_is_empty_input() {
        let a = analysis("123\n456");
        let err = json_report(&a).unwrap_err();
        assert!(matches!(err, HistoryError::EmptyInput(EmptyInputError::NoTokens)));
    }

    #[test]
    fn boxed_lines_have_fixed_width() {
        let a = analysis("ls\ngit status\nvery long command line that goes well past thirty characters");
        let lines = boxed_report(&a).unwrap();
        assert!(lines.iter().all(|l| l.chars().count() == RULE_TOP.chars().count()));
        assert!(lines.iter().any(|l| l.contains("Total commands:") && l.contains('3')));
    }

    #[test]
    fn large_counts_stay_inside_the_box() {
        let width = RULE_TOP.chars().count();
        let items = [
            ("ls".to_string(), 1_234_567usize),
            ("a command label far longer than the box".to_string(), 100_000),
            ("git".to_string(), 7),
        ];
        let lines = ranked_lines(&items);
        assert!(lines.iter().all(|l| l.chars().count() == width), "{:#?}", lines);
        assert!(lines[0].ends_with("1,234,567 ║"));
        assert!(lines[1].contains("100,000"));

        let many: Vec<(String, usize)> = (0..120).map(|i| (format!("cmd{}", i), 9_999_999)).collect();
        assert!(ranked_lines(&many).iter().all(|l| l.chars().count() == width));
    }

    #[test]
    fn brief_and_bare() {
        let a = analysis("ls\nls\ncd /tmp");
        let brief = brief_report(&a).unwrap();
        assert_eq!(brief[0], "Commands: 3 (2 unique)");
        assert_eq!(brief[2], "Command length: avg 3.7, min 2, max 7");

        let bare = bare_report(&a).unwrap();
        assert!(bare.contains(&"Command variety: 66.7%".to_string()));
        assert_eq!(bare.last().unwrap(), "Navigation: 3");
    }

    #[test]
    fn detailed_lists_categories() {
        let a = analysis("ls\ngit status\ngit status");
        let lines = detailed_report(&a).unwrap();
        assert!(lines.iter().any(|l| l.starts_with("- Version Control") && l.contains("66.7%")));
        assert!(lines.iter().any(|l| l.starts_with("1. git ")));
        assert!(lines.iter().any(|l| l == "- Potentially mistyped: 1 (33.3%)"));
    }

    #[test]
    fn csv_rows() {
        let a = analysis("ls\nls\ngit status");
        let mut buf = Vec::new();
        write_csv(&a, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut rows = text.lines();
        assert_eq!(rows.next(), Some("kind,value,count"));
        assert_eq!(rows.next(), Some("command,ls,2"));
        assert!(text.contains("category,Navigation,2"));
        assert!(text.contains("category,Version Control,1"));
    }
}
