use super::{parse_subcommand, split_chain, CommandError, Direction, Subcommand};
use crate::catalog::Technique;
use crate::session::{Button, Feedback, PuzzleSession, TimerSource};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::debug;

/// Pacing of the actions a command chain produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Pause after each press in scroll, find, and add sequences
    pub step_delay: Duration,
    /// Pause after each press during `cycle`, long enough to read the display
    pub cycle_delay: Duration,
    /// How often `press ... on <digit>` re-reads the timer
    pub poll_interval: Duration,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_millis(100),
            cycle_delay: Duration::from_millis(1200),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// One unit of progress through a command chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A button was pressed on the session
    Pressed { button: Button, feedback: Feedback },
    /// Wait this long before resuming
    Wait(Duration),
    /// Waiting for the timer to show `digit`; resume after `poll`
    AwaitingTimer { digit: char, poll: Duration },
    /// Every subcommand ran
    Finished,
    /// A subcommand failed; earlier effects are kept
    Aborted(CommandError),
    /// Stopped from outside
    Cancelled,
}

impl Step {
    /// Whether the chain has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Finished | Step::Aborted(_) | Step::Cancelled)
    }
}

#[derive(Debug)]
enum Phase {
    /// Ready for the next subcommand
    Idle,
    /// Pressing `button` a fixed number of times
    Repeat {
        button: Button,
        remaining: usize,
        delay: Duration,
    },
    /// Scrolling right looking for `name`, at most `remaining` more presses
    Scan {
        name: String,
        remaining: usize,
        add: bool,
        queue: VecDeque<String>,
    },
    /// Waiting for the timer digit before pressing a technique
    Press { technique: Technique, digit: char },
    Finished,
    Cancelled,
}

/// Resumable executor for one command chain.
///
/// The driver calls [`resume`](CommandInterpreter::resume) repeatedly,
/// honoring any [`Step::Wait`] or [`Step::AwaitingTimer`] pause, until a
/// terminal step comes back. Each call performs at most one button press,
/// so display text and timer are always read fresh.
#[derive(Debug)]
pub struct CommandInterpreter {
    subcommands: VecDeque<String>,
    phase: Phase,
    pending_wait: Option<Duration>,
    config: InterpreterConfig,
}

impl CommandInterpreter {
    pub fn new(command: &str) -> Self {
        Self::with_config(command, InterpreterConfig::default())
    }

    pub fn with_config(command: &str, config: InterpreterConfig) -> Self {
        Self {
            subcommands: split_chain(command).into(),
            phase: Phase::Idle,
            pending_wait: None,
            config,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Finished | Phase::Cancelled)
    }

    /// Stop the chain. Nothing further runs.
    pub fn cancel(&mut self) {
        self.pending_wait = None;
        if !matches!(self.phase, Phase::Finished) {
            self.phase = Phase::Cancelled;
        }
    }

    /// Advance the chain by one step.
    pub fn resume<T: TimerSource + ?Sized>(&mut self, session: &mut PuzzleSession, timer: &T) -> Step {
        match self.phase {
            Phase::Finished => return Step::Finished,
            Phase::Cancelled => return Step::Cancelled,
            _ => {}
        }

        if let Some(delay) = self.pending_wait.take() {
            return Step::Wait(delay);
        }

        loop {
            match std::mem::replace(&mut self.phase, Phase::Idle) {
                Phase::Idle => {
                    let Some(raw) = self.subcommands.pop_front() else {
                        self.phase = Phase::Finished;
                        return Step::Finished;
                    };
                    debug!(session = %session.id(), command = %raw, "processing subcommand");

                    match parse_subcommand(&raw) {
                        Ok(subcommand) => {
                            if let Some(step) = self.start(subcommand, session, timer) {
                                return step;
                            }
                        }
                        Err(err) => return self.abort(err),
                    }
                }

                Phase::Repeat {
                    button,
                    remaining,
                    delay,
                } => {
                    if remaining == 0 {
                        continue;
                    }
                    self.phase = Phase::Repeat {
                        button,
                        remaining: remaining - 1,
                        delay,
                    };
                    self.pending_wait = Some(delay);
                    return Self::pressed(session, button, timer);
                }

                Phase::Scan {
                    name,
                    remaining,
                    add,
                    mut queue,
                } => {
                    if session.is_solved() {
                        self.phase = Phase::Cancelled;
                        return Step::Cancelled;
                    }

                    // An empty list displays nothing, which must not match a blank name
                    let shown = !session.current_ingredients().is_empty();
                    if shown && session.display().to_lowercase() == name {
                        if !add {
                            continue;
                        }
                        let step = Self::pressed(session, Button::Add, timer);
                        self.pending_wait = Some(self.config.step_delay);
                        if let Some(next) = queue.pop_front() {
                            self.phase = Self::scan(session, next, true, queue);
                        }
                        return step;
                    }

                    if remaining == 0 {
                        let err = if add {
                            CommandError::AddTargetNotFound(name)
                        } else {
                            CommandError::IngredientNotFound(name)
                        };
                        return self.abort(err);
                    }

                    self.phase = Phase::Scan {
                        name,
                        remaining: remaining - 1,
                        add,
                        queue,
                    };
                    self.pending_wait = Some(self.config.step_delay);
                    return Self::pressed(session, Button::Right, timer);
                }

                Phase::Press { technique, digit } => {
                    if session.is_solved() {
                        self.phase = Phase::Cancelled;
                        return Step::Cancelled;
                    }
                    let time = timer.formatted_time();
                    if time.contains(digit) {
                        let feedback = session.submit(technique, &time);
                        return Step::Pressed {
                            button: Button::Technique(technique),
                            feedback,
                        };
                    }
                    self.phase = Phase::Press { technique, digit };
                    return Step::AwaitingTimer {
                        digit,
                        poll: self.config.poll_interval,
                    };
                }

                Phase::Finished => {
                    self.phase = Phase::Finished;
                    return Step::Finished;
                }

                Phase::Cancelled => {
                    self.phase = Phase::Cancelled;
                    return Step::Cancelled;
                }
            }
        }
    }

    /// Set up the phase for a freshly parsed subcommand. Returns a step
    /// when the subcommand is a single press.
    fn start<T: TimerSource + ?Sized>(
        &mut self,
        subcommand: Subcommand,
        session: &mut PuzzleSession,
        timer: &T,
    ) -> Option<Step> {
        let length = session.current_ingredients().len();

        match subcommand {
            Subcommand::Scroll {
                direction,
                distance,
            } => {
                let button = match direction {
                    Direction::Left => Button::Left,
                    Direction::Right => Button::Right,
                };
                self.phase = Phase::Repeat {
                    button,
                    remaining: clamp_distance(distance, length),
                    delay: self.config.step_delay,
                };
                None
            }
            Subcommand::Cycle => {
                self.phase = Phase::Repeat {
                    button: Button::Right,
                    remaining: length,
                    delay: self.config.cycle_delay,
                };
                None
            }
            Subcommand::Find(name) => {
                self.phase = Self::scan(session, name, false, VecDeque::new());
                None
            }
            Subcommand::AddCurrent => Some(Self::pressed(session, Button::Add, timer)),
            Subcommand::AddList(names) => {
                let mut queue: VecDeque<String> = names.into();
                if let Some(first) = queue.pop_front() {
                    self.phase = Self::scan(session, first, true, queue);
                }
                None
            }
            Subcommand::Reset => Some(Self::pressed(session, Button::Reset, timer)),
            Subcommand::Press { technique, digit } => {
                self.phase = Phase::Press { technique, digit };
                None
            }
        }
    }

    /// A scan may take one full trip around the list as it stands now
    fn scan(session: &PuzzleSession, name: String, add: bool, queue: VecDeque<String>) -> Phase {
        Phase::Scan {
            name,
            remaining: session.current_ingredients().len(),
            add,
            queue,
        }
    }

    fn pressed<T: TimerSource + ?Sized>(session: &mut PuzzleSession, button: Button, timer: &T) -> Step {
        let feedback = session.press(button, timer);
        Step::Pressed { button, feedback }
    }

    fn abort(&mut self, err: CommandError) -> Step {
        debug!(error = %err, "command chain aborted");
        self.pending_wait = None;
        self.phase = Phase::Finished;
        Step::Aborted(err)
    }
}

/// Bound an overlong scroll to fewer than three trips around the list.
///
/// An empty list cannot be scrolled, so the request collapses to a single
/// (rejected) press.
fn clamp_distance(distance: usize, length: usize) -> usize {
    if length == 0 {
        return distance.min(1);
    }
    if distance > 2 * length {
        length + distance % length
    } else {
        distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Ingredient, RecipeCatalog};
    use crate::session::{FixedTime, SessionId};
    use crate::verifier::Verdict;
    use std::cell::Cell;

    fn session_with(names: &[Ingredient]) -> PuzzleSession {
        let target = RecipeCatalog::global().find("Chocolate Mousse").unwrap();
        PuzzleSession::from_parts(SessionId(7), target, names.to_vec())
    }

    fn ten_items() -> PuzzleSession {
        session_with(&[
            Ingredient::Lemon,
            Ingredient::Caviar,
            Ingredient::Chocolate,
            Ingredient::Rice,
            Ingredient::Butter,
            Ingredient::Veal,
            Ingredient::Dill,
            Ingredient::Honey,
            Ingredient::Sole,
            Ingredient::Apple,
        ])
    }

    /// Drive the chain to its end, skipping pauses, and collect every step.
    fn run(command: &str, session: &mut PuzzleSession, time: &str) -> Vec<Step> {
        let timer = FixedTime(time.to_string());
        let mut interpreter = CommandInterpreter::new(command);
        let mut steps = Vec::new();
        for _ in 0..1000 {
            let step = interpreter.resume(session, &timer);
            let done = step.is_terminal();
            steps.push(step);
            if done {
                return steps;
            }
        }
        panic!("command did not finish: {}", command);
    }

    fn presses(steps: &[Step]) -> usize {
        steps
            .iter()
            .filter(|s| matches!(s, Step::Pressed { .. }))
            .count()
    }

    #[test]
    fn test_left_then_add() {
        let mut session = ten_items();
        let steps = run("left 3;add", &mut session, "00:00");

        assert_eq!(steps.last(), Some(&Step::Finished));
        assert_eq!(presses(&steps), 4);
        assert_eq!(session.current_ingredients().len(), 9);
        assert!(session.added().contains(&Ingredient::Honey));
        assert!(!session.current_ingredients().contains(&Ingredient::Honey));
        assert_eq!(session.cursor_index(), 7);
    }

    #[test]
    fn test_scroll_waits_between_presses() {
        let mut session = ten_items();
        let timer = FixedTime("00:00".into());
        let mut interpreter = CommandInterpreter::new("r 2");

        assert_eq!(
            interpreter.resume(&mut session, &timer),
            Step::Pressed { button: Button::Right, feedback: Feedback::Moved }
        );
        assert_eq!(interpreter.resume(&mut session, &timer), Step::Wait(Duration::from_millis(100)));
        assert!(matches!(interpreter.resume(&mut session, &timer), Step::Pressed { .. }));
        assert_eq!(interpreter.resume(&mut session, &timer), Step::Wait(Duration::from_millis(100)));
        assert_eq!(interpreter.resume(&mut session, &timer), Step::Finished);
        assert_eq!(interpreter.resume(&mut session, &timer), Step::Finished);
        assert_eq!(session.cursor_index(), 2);
    }

    #[test]
    fn test_find_missing_ingredient() {
        let mut session = ten_items();
        session.scroll(4);
        let steps = run("find garlic", &mut session, "00:00");

        assert_eq!(
            steps.last(),
            Some(&Step::Aborted(CommandError::IngredientNotFound("garlic".into())))
        );
        assert_eq!(presses(&steps), 10);
        assert_eq!(session.cursor_index(), 4);
        assert!(session.added().is_empty());
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let mut session = ten_items();
        let steps = run("FIND Honey", &mut session, "00:00");
        assert_eq!(steps.last(), Some(&Step::Finished));
        assert_eq!(session.display(), "Honey");
        assert_eq!(presses(&steps), 7);
    }

    #[test]
    fn test_find_current_item_needs_no_press() {
        let mut session = ten_items();
        let steps = run("find lemon", &mut session, "00:00");
        assert_eq!(steps, vec![Step::Finished]);
    }

    #[test]
    fn test_cycle_uses_slow_delay() {
        let mut session = session_with(&[Ingredient::Lemon, Ingredient::Butter, Ingredient::Rice]);
        let steps = run("cycle", &mut session, "00:00");
        assert_eq!(presses(&steps), 3);
        assert!(steps.contains(&Step::Wait(Duration::from_millis(1200))));
        assert_eq!(session.cursor_index(), 0);
    }

    #[test]
    fn test_add_list() {
        let mut session = ten_items();
        let steps = run("add butter, lemon,CHOCOLATE", &mut session, "00:00");
        assert_eq!(steps.last(), Some(&Step::Finished));

        let added = session.added();
        assert_eq!(added.len(), 3);
        assert!(added.contains(&Ingredient::Butter));
        assert!(added.contains(&Ingredient::Lemon));
        assert!(added.contains(&Ingredient::Chocolate));
        assert_eq!(session.current_ingredients().len(), 7);
    }

    #[test]
    fn test_add_list_missing_is_penalty_and_keeps_earlier_adds() {
        let mut session = ten_items();
        let steps = run("add lemon, garlic, butter", &mut session, "00:00");

        let Some(Step::Aborted(err)) = steps.last() else {
            panic!("expected abort, got {:?}", steps.last());
        };
        assert_eq!(err, &CommandError::AddTargetNotFound("garlic".into()));
        assert!(err.is_penalty());
        assert!(session.added().contains(&Ingredient::Lemon));
        assert!(!session.added().contains(&Ingredient::Butter));
    }

    #[test]
    fn test_abort_is_not_transactional() {
        let mut session = ten_items();
        let steps = run("right 2; add; dance; reset", &mut session, "00:00");

        assert_eq!(
            steps.last(),
            Some(&Step::Aborted(CommandError::Unrecognized("dance".into())))
        );
        assert!(session.added().contains(&Ingredient::Chocolate));
        assert_eq!(session.current_ingredients().len(), 9);
    }

    #[test]
    fn test_parse_error_aborts_chain() {
        let mut session = ten_items();
        let steps = run("right 1; left 99999999999999999999999; add", &mut session, "00:00");
        assert!(matches!(steps.last(), Some(Step::Aborted(CommandError::InvalidDistance(_)))));
        assert_eq!(session.cursor_index(), 1);
        assert!(session.added().is_empty());
    }

    #[test]
    fn test_reset_command() {
        let mut session = ten_items();
        run("add; r 3; add", &mut session, "00:00");
        assert_eq!(session.added().len(), 2);
        run("reset", &mut session, "00:00");
        assert!(session.added().is_empty());
        assert_eq!(session.current_ingredients(), session.initial_ingredients());
        assert_eq!(session.cursor_index(), 0);
    }

    #[test]
    fn test_overlong_scroll_is_clamped() {
        assert_eq!(clamp_distance(5, 10), 5);
        assert_eq!(clamp_distance(20, 10), 20);
        assert_eq!(clamp_distance(21, 10), 11);
        assert_eq!(clamp_distance(29, 10), 19);
        assert_eq!(clamp_distance(123_456_789, 10), 19);
        assert_eq!(clamp_distance(40, 0), 1);
        assert_eq!(clamp_distance(0, 0), 0);

        let mut session = ten_items();
        let steps = run("left 123456789", &mut session, "00:00");
        assert_eq!(presses(&steps), 19);
        assert_eq!(session.cursor_index(), 1);
    }

    #[test]
    fn test_press_waits_for_digit() {
        let mut session = session_with(&[Ingredient::Chocolate, Ingredient::Lemon, Ingredient::Butter]);
        run("add; add; add", &mut session, "00:00");

        let reading = Cell::new("13:45");
        let timer = || reading.get().to_string();
        let mut interpreter = CommandInterpreter::new("press egg on 2");

        for _ in 0..3 {
            assert_eq!(
                interpreter.resume(&mut session, &timer),
                Step::AwaitingTimer { digit: '2', poll: Duration::from_millis(100) }
            );
        }
        assert!(!session.is_solved());

        reading.set("13:42");
        assert_eq!(
            interpreter.resume(&mut session, &timer),
            Step::Pressed {
                button: Button::Technique(Technique::Egg),
                feedback: Feedback::Judged(Verdict::Solved),
            }
        );
        assert!(session.is_solved());
        assert_eq!(interpreter.resume(&mut session, &timer), Step::Finished);
    }

    #[test]
    fn test_strike_does_not_stop_chain() {
        let mut session = ten_items();
        let steps = run("press knife on 1; right", &mut session, "11:11");

        assert!(steps.contains(&Step::Pressed {
            button: Button::Technique(Technique::Knife),
            feedback: Feedback::Judged(Verdict::WrongIngredients),
        }));
        assert_eq!(steps.last(), Some(&Step::Finished));
        assert_eq!(session.strikes(), 1);
        assert_eq!(session.cursor_index(), 1);
    }

    #[test]
    fn test_cancel_while_waiting() {
        let mut session = ten_items();
        let timer = FixedTime("11:11".into());
        let mut interpreter = CommandInterpreter::new("press egg on 9; add");

        assert!(matches!(interpreter.resume(&mut session, &timer), Step::AwaitingTimer { .. }));
        interpreter.cancel();
        assert!(interpreter.is_done());
        assert_eq!(interpreter.resume(&mut session, &timer), Step::Cancelled);
        assert!(session.added().is_empty());
        assert_eq!(session.strikes(), 0);
    }

    #[test]
    fn test_waiting_press_stops_when_solved_elsewhere() {
        let mut session = session_with(&[Ingredient::Chocolate, Ingredient::Lemon, Ingredient::Butter]);
        let timer = FixedTime("11:11".into());
        let mut interpreter = CommandInterpreter::new("press egg on 9");
        assert!(matches!(interpreter.resume(&mut session, &timer), Step::AwaitingTimer { .. }));

        run("add;add;add;press egg on 2", &mut session, "02:22");
        assert!(session.is_solved());
        assert_eq!(interpreter.resume(&mut session, &timer), Step::Cancelled);
    }

    #[test]
    fn test_scroll_on_empty_list() {
        let mut session = session_with(&[Ingredient::Lemon]);
        run("add", &mut session, "00:00");
        let steps = run("left 40", &mut session, "00:00");
        assert_eq!(
            steps[0],
            Step::Pressed { button: Button::Left, feedback: Feedback::Invalid }
        );
        assert_eq!(presses(&steps), 1);
    }

    #[test]
    fn test_trailing_comma_add_on_emptied_list_is_penalty() {
        let mut session = session_with(&[Ingredient::Butter]);
        let steps = run("add butter,", &mut session, "00:00");

        assert_eq!(
            steps.last(),
            Some(&Step::Aborted(CommandError::AddTargetNotFound(String::new())))
        );
        assert_eq!(presses(&steps), 1);
        assert!(session.added().contains(&Ingredient::Butter));
        assert!(session.current_ingredients().is_empty());
    }

    #[test]
    fn test_blank_add_name_never_matches() {
        let mut session = session_with(&[Ingredient::Lemon, Ingredient::Rice]);
        let steps = run("add lemon, ,rice", &mut session, "00:00");

        assert_eq!(
            steps.last(),
            Some(&Step::Aborted(CommandError::AddTargetNotFound(String::new())))
        );
        assert_eq!(session.added().len(), 1);
    }

    #[test]
    fn test_scan_stops_when_solved_elsewhere() {
        let mut session = session_with(&[
            Ingredient::Rice,
            Ingredient::Chocolate,
            Ingredient::Lemon,
            Ingredient::Butter,
        ]);
        let timer = FixedTime("00:00".into());
        let mut interpreter = CommandInterpreter::new("add garlic");
        assert!(matches!(interpreter.resume(&mut session, &timer), Step::Pressed { .. }));

        run(
            "find chocolate;add;find lemon;add;find butter;add;press egg on 2",
            &mut session,
            "02:22",
        );
        assert!(session.is_solved());

        assert!(matches!(interpreter.resume(&mut session, &timer), Step::Wait(_)));
        assert_eq!(interpreter.resume(&mut session, &timer), Step::Cancelled);
        assert_eq!(interpreter.resume(&mut session, &timer), Step::Cancelled);
        assert_eq!(session.strikes(), 0);
    }
}
