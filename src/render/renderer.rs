use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{Cell, GameOverReason, SimulationState};
use crate::metrics::SessionStats;

/// What occupies a board cell, in drawing priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Head,
    Body,
    Food,
    PowerUp,
    Empty,
}

/// Per-frame data that does not live in the simulation state
pub struct Hud<'a> {
    pub now_ms: u64,
    pub submission_status: Option<&'a str>,
    pub can_submit: bool,
    /// Name typed so far, while the prompt is open
    pub name_entry: Option<&'a str>,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        state: &SimulationState,
        stats: &SessionStats,
        hud: &Hud<'_>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, stats, hud), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match state.game_over {
            None => frame.render_widget(self.render_grid(state), game_area),
            Some(reason) => {
                frame.render_widget(self.render_game_over(state, stats, reason, hud), game_area)
            }
        }

        let controls = self.render_controls(chunks[2]);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, state: &SimulationState) -> Paragraph<'_> {
        let half = state.grid_size / 2;
        let mut lines = Vec::new();

        for z in -half..=half {
            let spans: Vec<Span> = (-half..=half)
                .map(|x| match cell_kind(state, Cell::new(x, z)) {
                    CellKind::Head => Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    CellKind::Body => {
                        let color = if state.power_up.active {
                            Color::Magenta
                        } else {
                            Color::Green
                        };
                        Span::styled("□ ", Style::default().fg(color))
                    }
                    CellKind::Food => Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    CellKind::PowerUp => Span::styled(
                        "★ ",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    CellKind::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                })
                .collect();

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        state: &SimulationState,
        stats: &SessionStats,
        hud: &Hud<'_>,
    ) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}ms", state.move_interval_ms),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(stats.format_run_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Food: ", Style::default().fg(Color::Yellow)),
            Span::styled(stats.foods_eaten.to_string(), Style::default().fg(Color::White)),
        ];

        if let Some(remaining) = state.power_up_remaining_ms(hud.now_ms) {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                format!("x2 {:.1}s", remaining as f64 / 1000.0),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(
        &self,
        state: &SimulationState,
        stats: &SessionStats,
        reason: GameOverReason,
        hud: &Hud<'_>,
    ) -> Paragraph<'_> {
        let headline = match reason {
            GameOverReason::BoardFull => "BOARD CLEARED",
            GameOverReason::Wall | GameOverReason::SelfCollision => "GAME OVER",
        };

        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                headline,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(state.high_score.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(Span::styled(
                format!(
                    "{} food, {} doubled, {} power-ups in {}",
                    stats.foods_eaten,
                    stats.doubled_foods,
                    stats.power_ups_taken,
                    stats.format_run_time()
                ),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format!(
                    "Session: {} runs, best {} (wall {}, self {}, cleared {})",
                    stats.runs_finished(),
                    stats.best_score,
                    stats.endings.wall,
                    stats.endings.self_collision,
                    stats.endings.board_full
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        if state.new_high_score {
            text.push(Line::from(Span::styled(
                "New high score!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        if let Some(status) = hud.submission_status {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(
                status.to_string(),
                Style::default().fg(Color::Cyan),
            )));
        }

        text.push(Line::from(""));
        if let Some(name) = hud.name_entry {
            text.push(Line::from(vec![
                Span::styled("Name: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{}_", name),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            text.push(Line::from(vec![
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to submit, ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Esc",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to cancel", Style::default().fg(Color::Gray)),
            ]));
            return self.game_over_panel(text);
        }

        let mut prompt = vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart", Style::default().fg(Color::Gray)),
        ];
        if hud.can_submit {
            prompt.push(Span::styled(", ", Style::default().fg(Color::Gray)));
            prompt.push(Span::styled(
                "Enter",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            prompt.push(Span::styled(" to submit", Style::default().fg(Color::Gray)));
        }
        prompt.push(Span::styled(" or ", Style::default().fg(Color::Gray)));
        prompt.push(Span::styled(
            "Q",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
        prompt.push(Span::styled(" to quit", Style::default().fg(Color::Gray)));
        text.push(Line::from(prompt));

        self.game_over_panel(text)
    }

    fn game_over_panel<'a>(&self, text: Vec<Line<'a>>) -> Paragraph<'a> {
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, _area: Rect) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a cell for drawing
pub fn cell_kind(state: &SimulationState, cell: Cell) -> CellKind {
    if cell == state.snake.head() {
        CellKind::Head
    } else if state.snake.contains(cell) {
        CellKind::Body
    } else if state.food == Some(cell) {
        CellKind::Food
    } else if state.power_up.item == Some(cell) {
        CellKind::PowerUp
    } else {
        CellKind::Empty
    }
}
