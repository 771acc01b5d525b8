//! Move input for `play`: an interactive prompt on a terminal, plain lines
//! otherwise.

use anyhow::Context;
use dialoguer::Input;
use gridstrike_core::game::PlayerAction;
use std::io::{self, IsTerminal};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

const PROMPT: &str = "Please enter some input";

/// One line of player input.
#[derive(Debug, PartialEq, Eq)]
pub enum Entry {
    Move(PlayerAction),
    Quit,
    Blank,
    Unknown(String),
}

impl Entry {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "" => Entry::Blank,
            "q" | "quit" => Entry::Quit,
            _ => line
                .parse()
                .map(Entry::Move)
                .unwrap_or_else(|_| Entry::Unknown(line.to_string())),
        }
    }
}

pub enum MoveSource<R> {
    Terminal,
    Lines(Lines<R>),
}

impl MoveSource<BufReader<Stdin>> {
    /// Prompts when stdin is a terminal, reads piped lines otherwise.
    pub fn stdin() -> Self {
        if io::stdin().is_terminal() {
            MoveSource::Terminal
        } else {
            MoveSource::from_reader(BufReader::new(tokio::io::stdin()))
        }
    }
}

impl<R: AsyncBufRead + Unpin> MoveSource<R> {
    pub fn from_reader(reader: R) -> Self {
        MoveSource::Lines(reader.lines())
    }

    /// The next line, or `None` at end of input.
    pub async fn next_line(&mut self) -> anyhow::Result<Option<String>> {
        match self {
            MoveSource::Terminal => {
                match Input::<String>::new()
                    .with_prompt(PROMPT)
                    .allow_empty(true)
                    .interact_text()
                {
                    Ok(line) => Ok(Some(line)),
                    Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                        Ok(None)
                    }
                    Err(e) => Err(e).context("cannot read move from terminal"),
                }
            }
            MoveSource::Lines(lines) => lines.next_line().await.context("cannot read move"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn piped_lines_are_read_until_eof() {
        let mut source = MoveSource::from_reader(BufReader::new(&b"u\nsl\n"[..]));
        let mut entries = Vec::new();
        while let Some(line) = source.next_line().await.expect("read") {
            entries.push(Entry::parse(&line));
        }
        assert_eq!(
            entries,
            vec![
                Entry::Move(PlayerAction::MoveUp),
                Entry::Move(PlayerAction::ShootLeft),
            ]
        );
    }

    #[tokio::test]
    async fn last_line_without_newline_is_read() {
        let mut source = MoveSource::from_reader(BufReader::new(&b"d"[..]));
        assert_eq!(source.next_line().await.expect("read").as_deref(), Some("d"));
        assert_eq!(source.next_line().await.expect("read"), None);
    }

    #[test]
    fn parses_quit_blank_and_unknown() {
        assert_eq!(Entry::parse(" q "), Entry::Quit);
        assert_eq!(Entry::parse("quit"), Entry::Quit);
        assert_eq!(Entry::parse("  "), Entry::Blank);
        assert_eq!(Entry::parse("sd"), Entry::Move(PlayerAction::ShootDown));
        assert_eq!(Entry::parse("jump"), Entry::Unknown("jump".to_string()));
    }
}
