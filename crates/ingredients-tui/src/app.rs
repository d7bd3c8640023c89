use crate::game::{Game, Outcome, PuzzleRng};
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use ingredients_core::{
    Button, CommandError, CommandInterpreter, ErrorClass, Feedback, FixedTime, SessionId, Step,
    Technique, Verdict,
};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Upper bound on interpreter steps handled in one tick
const MAX_STEPS_PER_TICK: usize = 64;

/// Ticks a message stays on screen (~3 seconds at 50ms)
const MESSAGE_TICKS: u32 = 60;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Normal gameplay
    Playing,
    /// Recipe book; the bomb keeps ticking
    Manual,
    /// Dish served
    Win,
    /// Bomb went off
    Lose,
}

/// Input mode while playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys press module buttons
    Normal,
    /// Keys edit the command line
    Command,
}

/// How a status message is colored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Good,
    Bad,
}

/// Settings that outlive a single round
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bomb countdown per round
    pub duration: Duration,
    /// Strikes that detonate the bomb
    pub max_strikes: usize,
    /// Seed for reproducible puzzles
    pub seed: Option<u64>,
    /// Initial theme name
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(5 * 60),
            max_strikes: 3,
            seed: None,
            theme: "dark".to_string(),
        }
    }
}

/// A command chain in flight
pub struct RunningCommand {
    interpreter: CommandInterpreter,
    /// Don't resume before this instant
    resume_at: Instant,
    /// The chain as typed
    pub text: String,
    /// Digit a `press` is waiting for
    pub awaiting: Option<char>,
}

/// The main application state
pub struct App {
    /// Current round
    pub game: Game,
    /// Current input mode
    pub mode: InputMode,
    /// Text typed after `:`
    pub command_line: String,
    /// Command chain being driven, if any
    pub running: Option<RunningCommand>,
    /// Color theme
    pub theme: Theme,
    pub theme_name: &'static str,
    /// Message to display
    pub message: Option<(String, MessageKind)>,
    /// Message timer
    message_timer: u32,
    /// Current screen state
    pub screen_state: ScreenState,
    /// How the last round ended
    pub outcome: Option<Outcome>,
    /// Whether the command help box is open
    pub show_help: bool,
    /// First visible line of the recipe book
    pub manual_scroll: usize,
    settings: Settings,
    rng: PuzzleRng,
    next_id: u32,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let mut rng = PuzzleRng::from_seed(settings.seed);
        let game = Game::new(SessionId(1), &mut rng, settings.duration, settings.max_strikes);
        Self::with_game(settings, rng, game)
    }

    fn with_game(settings: Settings, rng: PuzzleRng, game: Game) -> Self {
        let (theme_name, theme) =
            Theme::by_name(&settings.theme).unwrap_or_else(|| ("dark", Theme::dark()));
        let next_id = game.session().id().0 + 1;
        Self {
            game,
            mode: InputMode::Normal,
            command_line: String::new(),
            running: None,
            theme,
            theme_name,
            message: None,
            message_timer: 0,
            screen_state: ScreenState::Playing,
            outcome: None,
            show_help: false,
            manual_scroll: 0,
            settings,
            rng,
            next_id,
        }
    }

    /// Get the tick rate
    pub fn get_tick_rate(&self) -> Duration {
        match self.screen_state {
            ScreenState::Playing | ScreenState::Manual => Duration::from_millis(50),
            ScreenState::Win | ScreenState::Lose => Duration::from_millis(100),
        }
    }

    /// Update timers and drive any running command (called every tick)
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        if matches!(self.screen_state, ScreenState::Playing | ScreenState::Manual) {
            self.pump_command(now);
            self.check_outcome();
        }
    }

    pub fn show_message(&mut self, msg: &str, kind: MessageKind) {
        self.message = Some((msg.to_string(), kind));
        self.message_timer = MESSAGE_TICKS;
    }

    /// Start a fresh round with the next session id
    pub fn new_game(&mut self) {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.game = Game::new(id, &mut self.rng, self.settings.duration, self.settings.max_strikes);
        self.running = None;
        self.mode = InputMode::Normal;
        self.command_line.clear();
        self.screen_state = ScreenState::Playing;
        self.outcome = None;
        self.show_help = false;
        self.message = None;
        self.message_timer = 0;
    }

    /// Press a module button directly
    pub fn press(&mut self, button: Button) {
        let timer = FixedTime(self.game.time_string());
        let feedback = self.game.session_mut().press(button, &timer);
        self.report_feedback(feedback);
        self.check_outcome();
    }

    /// Start driving a typed command chain, replacing any running one
    pub fn start_command(&mut self, text: &str) {
        self.start_command_at(text, Instant::now());
    }

    fn start_command_at(&mut self, text: &str, now: Instant) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if text.eq_ignore_ascii_case("help") {
            self.show_help = true;
            return;
        }
        if let Some(previous) = self.running.take() {
            info!(session = %self.game.session().id(), command = %previous.text, "command replaced");
        }
        info!(session = %self.game.session().id(), command = %text, "command received");
        self.running = Some(RunningCommand {
            interpreter: CommandInterpreter::new(text),
            resume_at: now,
            text: text.to_string(),
            awaiting: None,
        });
    }

    /// Ask the running command to stop at its next step
    pub fn cancel_command(&mut self) {
        if let Some(running) = self.running.as_mut() {
            running.interpreter.cancel();
            running.resume_at = Instant::now();
        }
    }

    fn pump_command(&mut self, now: Instant) {
        for _ in 0..MAX_STEPS_PER_TICK {
            let step = {
                let Some(running) = self.running.as_mut() else {
                    return;
                };
                if now < running.resume_at {
                    return;
                }
                let timer = FixedTime(self.game.time_string_at(now));
                running.interpreter.resume(self.game.session_mut(), &timer)
            };

            match step {
                Step::Pressed { feedback, .. } => self.report_feedback(feedback),
                Step::Wait(delay) => {
                    if let Some(running) = self.running.as_mut() {
                        running.awaiting = None;
                        running.resume_at = now + delay;
                    }
                }
                Step::AwaitingTimer { digit, poll } => {
                    if let Some(running) = self.running.as_mut() {
                        running.awaiting = Some(digit);
                        running.resume_at = now + poll;
                    }
                }
                Step::Finished => self.running = None,
                Step::Aborted(err) => {
                    self.running = None;
                    self.report_error(&err);
                }
                Step::Cancelled => {
                    self.running = None;
                    self.show_message("Command cancelled", MessageKind::Info);
                }
            }

            // The round ends on the press or penalty that decided it
            if self.game.outcome().is_some() {
                self.check_outcome();
                return;
            }
        }
    }

    fn report_feedback(&mut self, feedback: Feedback) {
        match feedback {
            Feedback::Moved | Feedback::Inert | Feedback::Added(_) => {}
            Feedback::Reset => self.show_message("Ingredients reset", MessageKind::Info),
            Feedback::Invalid => self.show_message("Nothing to select", MessageKind::Bad),
            Feedback::Judged(Verdict::Solved) => {
                self.show_message(Verdict::Solved.description(), MessageKind::Good)
            }
            Feedback::Judged(verdict) => self.show_message(verdict.description(), MessageKind::Bad),
        }
    }

    fn report_error(&mut self, err: &CommandError) {
        let tag = match err.class() {
            ErrorClass::Parse => "parse error",
            ErrorClass::NotFound => "not found",
            ErrorClass::Penalty => "penalty",
            ErrorClass::Unrecognized => "unknown command",
        };
        if err.is_penalty() {
            self.game.add_penalty();
            warn!(session = %self.game.session().id(), error = %err, "penalty strike");
        }
        self.show_message(&format!("[{}] {}", tag, err), MessageKind::Bad);
    }

    fn check_outcome(&mut self) {
        let Some(outcome) = self.game.outcome() else {
            return;
        };
        self.game.freeze();
        self.running = None;
        self.mode = InputMode::Normal;
        self.show_help = false;
        self.outcome = Some(outcome);
        self.screen_state = match outcome {
            Outcome::Won => ScreenState::Win,
            Outcome::Exploded | Outcome::TimedOut => ScreenState::Lose,
        };
        info!(
            session = %self.game.session().id(),
            outcome = ?outcome,
            strikes = self.game.strikes(),
            "round over"
        );
    }

    fn cycle_theme(&mut self) {
        let (name, theme) = Theme::next(self.theme_name);
        self.theme_name = name;
        self.theme = theme;
        self.show_message(&format!("Theme: {}", name), MessageKind::Info);
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen_state {
            ScreenState::Win | ScreenState::Lose => self.handle_endgame_key(key),
            ScreenState::Manual => self.handle_manual_key(key),
            ScreenState::Playing => match self.mode {
                InputMode::Normal => self.handle_game_key(key),
                InputMode::Command => self.handle_command_key(key),
            },
        }
    }

    fn handle_endgame_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('n') | KeyCode::Enter => {
                self.new_game();
                AppAction::Continue
            }
            KeyCode::Char('q') | KeyCode::Esc => AppAction::Quit,
            _ => AppAction::Continue,
        }
    }

    fn handle_manual_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.manual_scroll = self.manual_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.manual_scroll += 1;
            }
            KeyCode::PageUp => {
                self.manual_scroll = self.manual_scroll.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.manual_scroll += 10;
            }
            KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('q') => {
                self.screen_state = ScreenState::Playing;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        if self.show_help {
            self.show_help = false;
            return AppAction::Continue;
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.press(Button::Left),
            KeyCode::Right | KeyCode::Char('l') => self.press(Button::Right),
            KeyCode::Enter | KeyCode::Char('a') => self.press(Button::Add),
            KeyCode::Char('r') => self.press(Button::Reset),
            KeyCode::Char(c @ '1'..='4') => {
                let technique = Technique::ALL[c as usize - '1' as usize];
                self.press(Button::Technique(technique));
            }
            KeyCode::Char(':') => {
                self.mode = InputMode::Command;
                self.command_line.clear();
            }
            KeyCode::Esc => self.cancel_command(),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('m') => {
                self.screen_state = ScreenState::Manual;
            }
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Char('n') => self.new_game(),
            KeyCode::Char('q') => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_command_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.command_line);
                self.mode = InputMode::Normal;
                self.start_command(&text);
            }
            KeyCode::Esc => {
                self.command_line.clear();
                self.mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                self.command_line.pop();
            }
            KeyCode::Char(c) => self.command_line.push(c),
            _ => {}
        }
        AppAction::Continue
    }
}
