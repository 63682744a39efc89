use std::io;

use termion::event::Key;
use termion::input::TermRead;
use termion::raw::IntoRawMode;
use termion::screen::IntoAlternateScreen;
use tui::backend::TermionBackend;
use tui::layout::{Constraint, Direction, Layout};
use tui::widgets::{Block, Borders, List, ListItem, Paragraph};
use tui::Terminal;

use crate::error::Result;

const MAX_VISIBLE: usize = 20;

/// Incremental filter over distinct commands, most recent first.
#[derive(Debug)]
pub struct Picker<'a> {
    candidates: Vec<&'a str>,
    query: String,
    selected: usize,
}

pub enum Outcome {
    Continue,
    Chosen(String),
    Cancelled,
}

impl<'a> Picker<'a> {
    pub fn new(commands: &'a [String]) -> Self {
        let mut candidates: Vec<&str> = Vec::new();
        for cmd in commands.iter().rev() {
            if !candidates.contains(&cmd.as_str()) {
                candidates.push(cmd);
            }
        }
        Picker { candidates, query: String::new(), selected: 0 }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Case-insensitive substring matches, capped at the visible height.
    pub fn visible(&self) -> Vec<&'a str> {
        let needle = self.query.to_lowercase();
        self.candidates
            .iter()
            .copied()
            .filter(|cmd| cmd.to_lowercase().contains(&needle))
            .take(MAX_VISIBLE)
            .collect()
    }

    pub fn handle_key(&mut self, key: Key) -> Outcome {
        match key {
            Key::Char('\n') => match self.visible().get(self.selected) {
                Some(cmd) => Outcome::Chosen(cmd.to_string()),
                None => Outcome::Continue,
            },
            Key::Esc | Key::Ctrl('c') => Outcome::Cancelled,
            Key::Char(c) => {
                self.query.push(c);
                self.selected = 0;
                Outcome::Continue
            }
            Key::Backspace => {
                self.query.pop();
                self.selected = 0;
                Outcome::Continue
            }
            Key::Up => {
                self.selected = self.selected.saturating_sub(1);
                Outcome::Continue
            }
            Key::Down => {
                if self.selected + 1 < self.visible().len() {
                    self.selected += 1;
                }
                Outcome::Continue
            }
            _ => Outcome::Continue,
        }
    }
}

/// Returns the chosen command, or `None` if the user backed out.
pub fn interactive_search(commands: &[String]) -> Result<Option<String>> {
    let stdout = io::stdout().into_raw_mode()?;
    let stdout = stdout.into_alternate_screen()?;
    let mut terminal = Terminal::new(TermionBackend::new(stdout))?;
    let mut picker = Picker::new(commands);
    let mut keys = io::stdin().keys();

    loop {
        let visible = picker.visible();
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([Constraint::Length(3), Constraint::Min(1)].as_ref())
                .split(f.size());

            let input = Paragraph::new(picker.query())
                .block(Block::default().title("Interactive Search (ESC to quit)").borders(Borders::ALL));
            f.render_widget(input, chunks[0]);

            let items: Vec<ListItem> = visible
                .iter()
                .enumerate()
                .map(|(i, cmd)| {
                    let marker = if i == picker.selected() { ">" } else { " " };
                    ListItem::new(format!("{} {}", marker, cmd))
                })
                .collect();
            f.render_widget(List::new(items).block(Block::default().borders(Borders::ALL)), chunks[1]);
        })?;

        let Some(key) = keys.next() else {
            return Ok(None);
        };
        match picker.handle_key(key?) {
            Outcome::Continue => {}
            Outcome::Chosen(cmd) => return Ok(Some(cmd)),
            Outcome::Cancelled => return Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<String> {
        ["ls", "git status", "cargo test", "git status", "git push"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn distinct_most_recent_first() {
        let commands = history();
        let picker = Picker::new(&commands);
        assert_eq!(picker.visible(), vec!["git push", "git status", "cargo test", "ls"]);
    }

    #[test]
    fn typing_filters_and_enter_chooses() {
        let commands = history();
        let mut picker = Picker::new(&commands);
        for c in "GIT".chars() {
            picker.handle_key(Key::Char(c));
        }
        assert_eq!(picker.visible(), vec!["git push", "git status"]);

        picker.handle_key(Key::Down);
        picker.handle_key(Key::Down);
        assert_eq!(picker.selected(), 1);
        match picker.handle_key(Key::Char('\n')) {
            Outcome::Chosen(cmd) => assert_eq!(cmd, "git status"),
            _ => panic!("expected a selection"),
        }
    }

    #[test]
    fn backspace_resets_selection_and_esc_cancels() {
        let commands = history();
        let mut picker = Picker::new(&commands);
        picker.handle_key(Key::Down);
        picker.handle_key(Key::Char('x'));
        assert!(picker.visible().is_empty());
        assert!(matches!(picker.handle_key(Key::Char('\n')), Outcome::Continue));

        picker.handle_key(Key::Backspace);
        assert_eq!(picker.query(), "");
        assert_eq!(picker.selected(), 0);
        assert!(matches!(picker.handle_key(Key::Esc), Outcome::Cancelled));
    }
}
