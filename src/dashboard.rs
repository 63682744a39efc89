use std::io;

use termion::event::Key;
use termion::input::TermRead;
use termion::raw::IntoRawMode;
use termion::screen::IntoAlternateScreen;
use thousands::Separable;
use tracing::warn;
use tui::backend::{Backend, TermionBackend};
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::widgets::{BarChart, Block, Borders, Paragraph};
use tui::{Frame, Terminal};

use crate::aggregator::Analysis;
use crate::config::ChartStyle;
use crate::error::Result;

pub fn color_from_name(name: &str) -> Color {
    match name.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        _ => {
            warn!("unknown chart color {:?}, using terminal default", name);
            Color::Reset
        }
    }
}

/// At least one column, so `BarChart` never divides by a zero bar stride.
pub fn effective_bar_width(style: &ChartStyle) -> u16 {
    style.bar_width.max(1)
}

/// Bar labels cut to the bar width so neighbouring labels don't collide.
pub fn bar_data<T: ToString>(items: &[(T, usize)], bar_width: u16) -> Vec<(String, u64)> {
    items
        .iter()
        .map(|(label, count)| {
            let label: String = label.to_string().chars().take(bar_width as usize).collect();
            (label, *count as u64)
        })
        .collect()
}

pub fn summary_line(analysis: &Analysis) -> String {
    let most_used = analysis
        .category_counts
        .most_common(Some(1))
        .first()
        .map(|(category, count)| format!("{} ({})", category, count.separate_with_commas()))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Total Commands: {} | Unique: {}   Total Keywords: {} | Unique: {}   Categories Found: {} | Most Used: {}",
        analysis.command_counts.total().separate_with_commas(),
        analysis.command_counts.unique().separate_with_commas(),
        analysis.token_counts.total().separate_with_commas(),
        analysis.token_counts.unique().separate_with_commas(),
        analysis.category_counts.unique(),
        most_used,
    )
}

struct Charts {
    categories: Vec<(String, u64)>,
    commands: Vec<(String, u64)>,
    keywords: Vec<(String, u64)>,
    summary: String,
}

impl Charts {
    fn new(analysis: &Analysis, style: &ChartStyle) -> Self {
        let categories: Vec<(String, usize)> = analysis
            .category_counts
            .most_common(None)
            .into_iter()
            .map(|(c, n)| (c.short_label(), n))
            .collect();
        Charts {
            categories: bar_data(&categories, effective_bar_width(style)),
            commands: bar_data(&analysis.top_commands(), effective_bar_width(style)),
            keywords: bar_data(&analysis.top_tokens(), effective_bar_width(style)),
            summary: summary_line(analysis),
        }
    }
}

fn render_bars<B: Backend>(f: &mut Frame<B>, area: Rect, title: &str, bars: &[(String, u64)], style: &ChartStyle) {
    let data: Vec<(&str, u64)> = bars.iter().map(|(label, n)| (label.as_str(), *n)).collect();
    let bar_color = color_from_name(&style.bar_color);
    let chart = BarChart::default()
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .data(&data)
        .bar_width(effective_bar_width(style))
        .bar_gap(style.bar_gap)
        .bar_style(Style::default().fg(bar_color))
        .value_style(Style::default().fg(color_from_name(&style.value_color)).bg(bar_color))
        .label_style(Style::default().fg(color_from_name(&style.label_color)).add_modifier(Modifier::BOLD));
    f.render_widget(chart, area);
}

fn draw<B: Backend>(f: &mut Frame<B>, charts: &Charts, style: &ChartStyle, top_n: usize) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(45), Constraint::Min(3)].as_ref())
        .split(f.size());
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[0]);

    render_bars(f, top[0], "Command Categories", &charts.categories, style);
    render_bars(f, top[1], &format!("Top {} Keywords", top_n), &charts.keywords, style);
    render_bars(f, rows[1], &format!("Top {} Commands", top_n), &charts.commands, style);

    let summary = Paragraph::new(charts.summary.as_str())
        .block(Block::default().title("Command History Analysis (q to quit)").borders(Borders::ALL));
    f.render_widget(summary, rows[2]);
}

/// Shows the charts until `q` or Esc is pressed.
pub fn show_dashboard(analysis: &Analysis, style: &ChartStyle) -> Result<()> {
    let charts = Charts::new(analysis, style);

    let stdout = io::stdout().into_raw_mode()?;
    let stdout = stdout.into_alternate_screen()?;
    let mut terminal = Terminal::new(TermionBackend::new(stdout))?;

    terminal.draw(|f| draw(f, &charts, style, analysis.top_n))?;
    for key in io::stdin().keys() {
        match key? {
            Key::Char('q') | Key::Esc | Key::Ctrl('c') => break,
            _ => {
                terminal.draw(|f| draw(f, &charts, style, analysis.top_n))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::DEFAULT_TOP_N;
    use crate::tokenizer::process_history;
    use tui::backend::TestBackend;

    #[test]
    fn colors_by_name() {
        assert_eq!(color_from_name("LightBlue"), Color::LightBlue);
        assert_eq!(color_from_name("dark-gray"), Color::DarkGray);
        assert_eq!(color_from_name("chartreuse"), Color::Reset);
    }

    #[test]
    fn labels_fit_bars() {
        let data = bar_data(&[("kubectl get pods", 4), ("ls", 2)], 5);
        assert_eq!(data, vec![("kubec".to_string(), 4), ("ls".to_string(), 2)]);
    }

    #[test]
    fn summary_names_most_used_category() {
        let analysis = Analysis::new(process_history("ls\nls\ngit log"), DEFAULT_TOP_N).unwrap();
        let line = summary_line(&analysis);
        assert!(line.starts_with("Total Commands: 3 | Unique: 2"));
        assert!(line.ends_with("Most Used: Navigation (2)"));
    }

    #[test]
    fn zero_width_bars_still_render() {
        let analysis = Analysis::new(process_history("ls\nls\ngit log\nhtop"), DEFAULT_TOP_N).unwrap();
        let style = ChartStyle { bar_width: 0, bar_gap: 0, ..ChartStyle::default() };
        assert_eq!(effective_bar_width(&style), 1);

        let charts = Charts::new(&analysis, &style);
        assert!(charts.categories.iter().all(|(label, _)| label.chars().count() == 1));

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| draw(f, &charts, &style, analysis.top_n)).unwrap();
    }
}
