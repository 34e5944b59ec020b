use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::audio::SoundBoard;
use crate::config::AppConfig;
use crate::game::{EventSink, Simulation};
use crate::input::{EditAction, InputHandler, KeyAction};
use crate::leaderboard::{
    HttpPoster, PendingSubmission, ScorePoster, Submission, SubmissionState, SubmitError,
};
use crate::metrics::SessionStats;
use crate::persistence::ScoreStore;
use crate::render::{Hud, Renderer};

type SubmitOutcome = (PendingSubmission, Result<(), SubmitError>);

/// Longest name the prompt accepts
const MAX_NAME_LEN: usize = 20;

/// Interactive game: keyboard in, terminal frames out
pub struct PlayMode {
    config: AppConfig,
    simulation: Simulation,
    sounds: SoundBoard,
    submission: Submission,
    poster: Option<Arc<HttpPoster>>,
    /// Name being typed on the game over panel
    name_entry: Option<String>,
    /// Prefill for the next prompt
    last_name: String,
    stats: SessionStats,
    renderer: Renderer,
    input_handler: InputHandler,
    clock: Instant,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(
        config: AppConfig,
        simulation: Simulation,
        store: Arc<dyn ScoreStore>,
        sounds: SoundBoard,
    ) -> Self {
        let poster = if config.can_submit() {
            match HttpPoster::new(config.leaderboard_endpoint.clone()) {
                Ok(poster) => Some(Arc::new(poster)),
                Err(err) => {
                    log::warn!("Leaderboard disabled: {:#}", err);
                    None
                }
            }
        } else {
            None
        };

        let last_name = config.player_name().unwrap_or_default().to_string();

        Self {
            config,
            simulation,
            sounds,
            submission: Submission::new(store),
            poster,
            name_entry: None,
            last_name,
            stats: SessionStats::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            clock: Instant::now(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let (submit_tx, mut submit_rx) = mpsc::channel::<SubmitOutcome>(4);

        // The engine gates its own steps; poll it at ~60 Hz
        let mut tick_timer = interval(Duration::from_millis(16));

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        log::info!("Game started");

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &submit_tx);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Leaderboard responses
                Some((pending, outcome)) = submit_rx.recv() => {
                    // Already logged and shown in the HUD
                    let _ = self.submission.finish(pending, outcome);
                }

                // Render frame
                _ = render_timer.tick() => {
                    let now_ms = self.now_ms();
                    self.stats.on_frame(now_ms);
                    let hud = Hud {
                        now_ms,
                        submission_status: self.submission.status_message(),
                        can_submit: self.can_submit(),
                        name_entry: self.name_entry.as_deref(),
                    };
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.simulation.state(), &self.stats, &hud);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        log::info!("Quitting after {} runs", self.stats.runs_finished());
        Ok(())
    }

    fn handle_event(&mut self, event: Event, submit_tx: &mpsc::Sender<SubmitOutcome>) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.name_entry.is_some() {
            let action = self.input_handler.handle_edit_key(key);
            self.handle_edit(action, submit_tx);
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => {
                self.simulation.handle_input(direction);
            }
            KeyAction::Restart => self.restart(),
            KeyAction::Submit => self.request_submission(submit_tx),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn handle_edit(&mut self, action: EditAction, submit_tx: &mpsc::Sender<SubmitOutcome>) {
        let Some(name) = self.name_entry.as_mut() else {
            return;
        };

        match action {
            EditAction::Insert(c) => {
                if name.chars().count() < MAX_NAME_LEN {
                    name.push(c);
                }
            }
            EditAction::Backspace => {
                name.pop();
            }
            EditAction::Confirm => {
                let name = self.name_entry.take().unwrap_or_default();
                match self.start_submission(&name, submit_tx) {
                    // Keep the prompt open so the player can type one
                    Err(SubmitError::EmptyName) => self.name_entry = Some(name),
                    _ => self.last_name = name.trim().to_string(),
                }
            }
            EditAction::Cancel => self.name_entry = None,
            EditAction::Quit => self.should_quit = true,
            EditAction::None => {}
        }
    }

    fn update_game(&mut self) {
        self.update_game_at(self.now_ms());
    }

    fn update_game_at(&mut self, now_ms: u64) {
        let result = self.simulation.tick(now_ms);
        for event in &result.events {
            self.sounds.notify(event);
            self.stats.notify(event);
        }
    }

    fn restart(&mut self) {
        self.simulation.restart();
        self.submission.reset();
        self.name_entry = None;
        self.stats.start_run();
        // Engine timestamps restart from zero with the new run
        self.clock = Instant::now();
        log::info!("Game restarted");
    }

    /// Whether Enter on the game over panel would do anything
    fn can_submit(&self) -> bool {
        self.simulation.is_game_over()
            && self.poster.is_some()
            && matches!(
                self.submission.state(),
                SubmissionState::Idle | SubmissionState::Failed(_)
            )
    }

    /// Submit under the configured name, or ask for one
    fn request_submission(&mut self, submit_tx: &mpsc::Sender<SubmitOutcome>) {
        if !self.can_submit() {
            return;
        }
        match self.config.player_name().map(str::to_string) {
            Some(name) => {
                // Failures are logged and shown in the HUD
                let _ = self.start_submission(&name, submit_tx);
            }
            None => self.name_entry = Some(self.last_name.clone()),
        }
    }

    /// Kick off a leaderboard request without blocking the frame loop
    fn start_submission(
        &mut self,
        name: &str,
        submit_tx: &mpsc::Sender<SubmitOutcome>,
    ) -> Result<(), SubmitError> {
        let Some(poster) = self.poster.clone() else {
            return Ok(());
        };

        let pending = self
            .submission
            .begin(name, self.simulation.score())
            .inspect_err(|err| log::debug!("Submission not started: {}", err))?;

        let tx = submit_tx.clone();
        tokio::spawn(async move {
            let outcome = poster.post(&pending.body).await;
            if tx.send((pending, outcome)).await.is_err() {
                log::debug!("Game loop gone before submission finished");
            }
        });
        Ok(())
    }

    fn now_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
