use std::time::Duration;

use checkers_engine::{BoardSize, KingRule, Side, TimeLimit, wins};
use clap::ValueEnum as _;
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, HorizontalAlignment, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Padding, Paragraph},
};

use crate::{
    command::play::{FirstTurn, Setup},
    store::SharedScoreStore,
    tui::{RenderMode, Runtime, Screen, ScreenTransition},
    view::widgets::{KeyBinding, KeyBindingDisplay, color, style},
};

use super::GameScreen;

const BINDINGS: &[KeyBinding] = &[
    (&["↓", "↑"], "Select"),
    (&["←", "→"], "Change"),
    (&["Enter"], "Play"),
    (&["q"], "Quit"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    BoardSize,
    KingRule,
    TimeLimit,
    FirstTurn,
}

impl Item {
    const ALL: [Self; 4] = [Self::BoardSize, Self::KingRule, Self::TimeLimit, Self::FirstTurn];

    fn label(self) -> &'static str {
        match self {
            Self::BoardSize => "Board size",
            Self::KingRule => "King rule",
            Self::TimeLimit => "Time limit",
            Self::FirstTurn => "First turn",
        }
    }
}

/// Steps through `choices` from `current`, wrapping at both ends.
fn cycle<T>(choices: &[T], current: &T, forward: bool) -> T
where
    T: Clone + PartialEq,
{
    let len = choices.len();
    let index = choices.iter().position(|c| c == current).unwrap_or(0);
    let next = if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    };
    choices[next].clone()
}

/// Game settings and win counters; starts a game on top of itself.
#[derive(Debug)]
pub(crate) struct MenuScreen {
    setup: Setup,
    scores: SharedScoreStore,
    fps: f64,
    selected: usize,
}

impl MenuScreen {
    pub(crate) fn new(setup: Setup, scores: SharedScoreStore, fps: f64) -> Self {
        Self {
            setup,
            scores,
            fps,
            selected: 0,
        }
    }

    fn item(&self) -> Item {
        Item::ALL[self.selected]
    }

    fn change(&mut self, forward: bool) {
        let item = self.item();
        let setup = &mut self.setup;
        match item {
            Item::BoardSize => {
                let sizes = [BoardSize::Small, BoardSize::Large];
                setup.board_size = cycle(&sizes, &setup.board_size, forward);
            }
            Item::KingRule => {
                let rules = [KingRule::Default, KingRule::Flying];
                setup.king_rule = cycle(&rules, &setup.king_rule, forward);
            }
            Item::TimeLimit => {
                setup.time_limit = cycle(&TimeLimit::CHOICES, &setup.time_limit, forward);
            }
            Item::FirstTurn => {
                setup.first_turn = cycle(FirstTurn::value_variants(), &setup.first_turn, forward);
            }
        }
    }

    fn value(&self, item: Item) -> String {
        match item {
            Item::BoardSize => self.setup.board_size.to_string(),
            Item::KingRule => self.setup.king_rule.to_string(),
            Item::TimeLimit => self.setup.time_limit.to_string(),
            Item::FirstTurn => self.setup.first_turn.to_string(),
        }
    }
}

impl Screen for MenuScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(None);
        runtime.set_render_mode(RenderMode::OnDirty);
    }

    fn on_close(&mut self, _runtime: &mut Runtime) {}

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        let Some(event) = event.as_key_event() else {
            return ScreenTransition::Stay;
        };
        match event.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.checked_sub(1).unwrap_or(Item::ALL.len() - 1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % Item::ALL.len();
            }
            KeyCode::Left | KeyCode::Char('h') => self.change(false),
            KeyCode::Right | KeyCode::Char('l') => self.change(true),
            KeyCode::Enter | KeyCode::Char(' ') => {
                tracing::info!(setup = ?self.setup, "starting game from menu");
                let game = GameScreen::new(self.setup, self.scores.clone(), self.fps);
                return ScreenTransition::Push(Box::new(game));
            }
            KeyCode::Char('q') | KeyCode::Esc => return ScreenTransition::Exit,
            _ => {}
        }
        ScreenTransition::Stay
    }

    fn update(&mut self, _runtime: &mut Runtime, _elapsed: Duration) {}

    fn draw(&self, frame: &mut Frame) {
        let block = Block::bordered()
            .title("CHECKERS")
            .title_alignment(HorizontalAlignment::Center)
            .padding(Padding::symmetric(2, 1))
            .style(style::DEFAULT);
        let viewport = frame
            .area()
            .centered(Constraint::Length(44), Constraint::Length(14));

        let mut lines = Item::ALL
            .iter()
            .enumerate()
            .map(|(i, &item)| {
                let selected = i == self.selected;
                let marker = if selected { "> " } else { "  " };
                let value_style = if selected {
                    Style::new().fg(color::YELLOW).add_modifier(Modifier::BOLD)
                } else {
                    Style::new()
                };
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(format!("{:<12}", item.label()), style::LABEL),
                    Span::styled(format!("< {} >", self.value(item)), value_style),
                ])
            })
            .collect::<Vec<_>>();
        lines.push(Line::default());
        lines.extend(Side::ALL.map(|side| {
            Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{:<12}", format!("{side} wins")), style::LABEL),
                Span::raw(wins(&self.scores, side).to_string()),
            ])
        }));

        let [body_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(viewport);
        frame.render_widget(Paragraph::new(lines).block(block), body_area);
        frame.render_widget(KeyBindingDisplay::new(BINDINGS), help_area);
    }
}
