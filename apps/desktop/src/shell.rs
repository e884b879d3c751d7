//! Line-oriented terminal front end.

use crate::commands::{self, CommandError};
use crate::engine::{GameView, NoticeKind};
use crate::state::AppState;
use polyglot_core::{CardId, CardView};
use std::fmt::Write as _;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

const HELP: &str = "\
commands:
  flip N          turn card N face up
  mode MODE       same | translate (deals a new round)
  level LEVEL     easy | medium | hard (deals a new round)
  reset           deal a new round
  speak N         read card N aloud
  image N         generate an illustration for card N
  clear-images    drop cached illustrations
  full            toggle fullscreen layout
  show            redraw the board
  help            this text
  quit            exit";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Flip(usize),
    Mode(String),
    Level(String),
    Reset,
    Speak(usize),
    Image(usize),
    ClearImages,
    Fullscreen,
    Show,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Card numbers are 1-based as displayed.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Self::Show);
        };
        let arg = words.next();

        let card = |arg: Option<&str>| -> Result<usize, String> {
            let arg = arg.ok_or_else(|| format!("{} needs a card number", verb))?;
            match arg.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(format!("not a card number: {}", arg)),
            }
        };
        let word = |arg: Option<&str>| -> Result<String, String> {
            arg.map(str::to_string)
                .ok_or_else(|| format!("{} needs an argument", verb))
        };

        match verb.to_ascii_lowercase().as_str() {
            "flip" | "f" => card(arg).map(Self::Flip),
            "mode" => word(arg).map(Self::Mode),
            "level" | "difficulty" => word(arg).map(Self::Level),
            "reset" | "new" => Ok(Self::Reset),
            "speak" | "say" => card(arg).map(Self::Speak),
            "image" | "img" => card(arg).map(Self::Image),
            "clear-images" => Ok(Self::ClearImages),
            "full" | "fullscreen" => Ok(Self::Fullscreen),
            "show" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Self::Flip(n)),
                _ => Err(format!("unknown command: {} (try help)", other)),
            },
        }
    }
}

fn card_at(view: &GameView, number: usize) -> Result<CardId, CommandError> {
    view.round
        .as_ref()
        .and_then(|round| round.cards.get(number - 1))
        .map(|card| card.id)
        .ok_or_else(|| CommandError::new(format!("no card {}", number)))
}

fn face(card: &CardView) -> String {
    let picture = if card.image_url.is_some() { "*" } else { "" };
    if card.is_matched {
        format!("ok {} {}{}", card.glyph, card.text, picture)
    } else if card.is_flipped {
        format!("{} {} {}{}", card.glyph, card.text, card.language.tag(), picture)
    } else {
        "?".to_string()
    }
}

/// Render a snapshot as text.
pub fn render(view: &GameView) -> String {
    let mut out = String::new();
    let Some(round) = &view.round else {
        out.push_str(if view.loading { "dealing...\n" } else { "no round\n" });
        return out;
    };

    let _ = writeln!(
        out,
        "{} | {} | moves {} | pairs {}/{} | {}{}",
        round.label,
        round.mode.as_str(),
        round.move_count,
        round.match_count,
        round.pair_count,
        round.clock,
        if view.loading { " | dealing..." } else { "" },
    );

    let width = round.cards.iter().map(|c| face(c).chars().count()).max().unwrap_or(1);
    for (row, chunk) in round.cards.chunks(view.columns.max(1) as usize).enumerate() {
        let line: Vec<String> = chunk
            .iter()
            .enumerate()
            .map(|(i, card)| {
                let number = row * view.columns.max(1) as usize + i + 1;
                format!("{:>2} [{:^width$}]", number, face(card), width = width)
            })
            .collect();
        let _ = writeln!(out, "{}", line.join(" "));
    }

    if round.complete {
        let _ = writeln!(out, "All pairs found in {} moves, {}.", round.move_count, round.clock);
    }
    if let Some(notice) = &view.notice {
        let prefix = match notice.kind {
            NoticeKind::Info => "--",
            NoticeKind::Success => "++",
            NoticeKind::Error => "!!",
        };
        let _ = writeln!(out, "{} {}", prefix, notice.text);
    }
    out
}

/// Same snapshot with the clock blanked, so ticks alone do not redraw.
fn without_clock(view: &GameView) -> GameView {
    let mut view = view.clone();
    if let Some(round) = view.round.as_mut() {
        round.elapsed_seconds = 0;
        round.clock.clear();
    }
    view
}

/// Run one command. Returns false when the shell should exit.
async fn execute(command: ShellCommand, state: &AppState) -> Result<bool, CommandError> {
    let view = state.controller.view();
    match command {
        ShellCommand::Flip(n) => {
            commands::flip_card(card_at(&view, n)?, state).await?;
        }
        ShellCommand::Mode(mode) => {
            commands::set_mode(&mode, state).await?;
        }
        ShellCommand::Level(level) => {
            commands::set_difficulty(&level, state).await?;
        }
        ShellCommand::Reset => {
            commands::reset_game(state).await?;
        }
        ShellCommand::Speak(n) => {
            commands::speak_card(card_at(&view, n)?, state).await?;
        }
        ShellCommand::Image(n) => {
            commands::generate_card_image(card_at(&view, n)?, state).await?;
        }
        ShellCommand::ClearImages => {
            commands::clear_assets(state).await?;
        }
        ShellCommand::Fullscreen => {
            commands::toggle_fullscreen(state).await?;
        }
        ShellCommand::Show | ShellCommand::Help => {}
        ShellCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Read commands from stdin until `quit` or end of input, redrawing the
/// board whenever it changes.
pub async fn run(state: &AppState) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut updates = state.controller.subscribe();

    let mut shown = without_clock(&updates.borrow_and_update());
    stdout.write_all(render(&state.controller.view()).as_bytes()).await?;
    stdout.write_all(b"type help for commands\n> ").await?;
    stdout.flush().await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match ShellCommand::parse(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        stdout.write_all(format!("{}\n> ", message).as_bytes()).await?;
                        stdout.flush().await?;
                        continue;
                    }
                };
                let help = command == ShellCommand::Help;
                match execute(command, state).await {
                    Ok(false) => break,
                    Ok(true) => {}
                    Err(e) => stdout.write_all(format!("{}\n", e).as_bytes()).await?,
                }
                let view = state.controller.view();
                shown = without_clock(&view);
                let mut text = render(&view);
                if help {
                    text.push_str(HELP);
                    text.push('\n');
                }
                text.push_str("> ");
                stdout.write_all(text.as_bytes()).await?;
                stdout.flush().await?;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = updates.borrow_and_update().clone();
                let stripped = without_clock(&view);
                if stripped != shown {
                    shown = stripped;
                    stdout.write_all(format!("\n{}> ", render(&view)).as_bytes()).await?;
                    stdout.flush().await?;
                }
            }
        }
    }

    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyglot_core::{DifficultyLevel, GameMode, Language, RoundView};

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("flip 3"), Ok(ShellCommand::Flip(3)));
        assert_eq!(ShellCommand::parse("7"), Ok(ShellCommand::Flip(7)));
        assert_eq!(ShellCommand::parse("MODE translate"), Ok(ShellCommand::Mode("translate".into())));
        assert_eq!(ShellCommand::parse("level hard"), Ok(ShellCommand::Level("hard".into())));
        assert_eq!(ShellCommand::parse(""), Ok(ShellCommand::Show));
        assert_eq!(ShellCommand::parse("quit"), Ok(ShellCommand::Quit));
        assert!(ShellCommand::parse("flip 0").is_err());
        assert!(ShellCommand::parse("speak").is_err());
        assert!(ShellCommand::parse("dance").is_err());
    }

    fn card(text: &str, flipped: bool, matched: bool) -> CardView {
        CardView {
            id: CardId::new(),
            concept_key: text.to_lowercase(),
            glyph: "#".to_string(),
            text: text.to_string(),
            language: Language::En,
            is_flipped: flipped,
            is_matched: matched,
            image_url: None,
        }
    }

    #[test]
    fn test_render_hides_face_down_cards() {
        let view = GameView {
            round: Some(RoundView {
                generation: 1,
                mode: GameMode::Same,
                difficulty: DifficultyLevel::Easy,
                label: "Easy".to_string(),
                cards: vec![
                    card("Left", true, false),
                    card("Right", false, false),
                    card("Go", false, true),
                ],
                move_count: 2,
                match_count: 1,
                pair_count: 4,
                elapsed_seconds: 5,
                clock: "00:05".to_string(),
                timer_running: true,
                locked: false,
                complete: false,
            }),
            loading: false,
            fullscreen: false,
            columns: 4,
            notice: None,
        };

        let text = render(&view);
        assert!(text.starts_with("Easy | same | moves 2 | pairs 1/4 | 00:05"));
        assert!(text.contains("# Left EN"));
        assert!(!text.contains("Right"));
        assert!(text.contains("ok # Go"));
        assert_eq!(without_clock(&view).round.unwrap().clock, "");
    }
}
