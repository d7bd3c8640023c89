use ingredients_core::{PuzzleSession, RandomSource, SessionId, SimpleRng};
use std::time::{Duration, Instant};

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    /// Too many strikes
    Exploded,
    /// The bomb timer ran out
    TimedOut,
}

/// Random source for new puzzles: seeded for replays, thread RNG otherwise
pub enum PuzzleRng {
    Seeded(SimpleRng),
    Thread(rand::rngs::ThreadRng),
}

impl PuzzleRng {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => PuzzleRng::Seeded(SimpleRng::with_seed(seed)),
            None => PuzzleRng::Thread(rand::thread_rng()),
        }
    }
}

impl RandomSource for PuzzleRng {
    fn next_u64(&mut self) -> u64 {
        match self {
            PuzzleRng::Seeded(rng) => rng.next_u64(),
            PuzzleRng::Thread(rng) => rand::RngCore::next_u64(rng),
        }
    }
}

/// One round: a puzzle session under a counting-down bomb timer
pub struct Game {
    session: PuzzleSession,
    /// Length of the countdown
    duration: Duration,
    /// Start time
    start_time: Instant,
    /// Time left when the round ended
    frozen: Option<Duration>,
    /// Strikes from penalized commands, on top of the session's own
    penalties: usize,
    max_strikes: usize,
}

impl Game {
    pub fn new(id: SessionId, rng: &mut PuzzleRng, duration: Duration, max_strikes: usize) -> Self {
        Self::from_session(PuzzleSession::new(id, rng), duration, max_strikes)
    }

    pub fn from_session(session: PuzzleSession, duration: Duration, max_strikes: usize) -> Self {
        Self {
            session,
            duration,
            start_time: Instant::now(),
            frozen: None,
            penalties: 0,
            max_strikes,
        }
    }

    pub fn session(&self) -> &PuzzleSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PuzzleSession {
        &mut self.session
    }

    pub fn strikes(&self) -> usize {
        self.session.strikes() + self.penalties
    }

    pub fn max_strikes(&self) -> usize {
        self.max_strikes
    }

    pub fn add_penalty(&mut self) {
        self.penalties += 1;
    }

    /// Time left on the bomb at `now`
    pub fn remaining_at(&self, now: Instant) -> Duration {
        if let Some(left) = self.frozen {
            return left;
        }
        self.duration
            .saturating_sub(now.saturating_duration_since(self.start_time))
    }

    pub fn remaining(&self) -> Duration {
        self.remaining_at(Instant::now())
    }

    /// Bomb timer text: `MM:SS`, or `SS.cc` in the final minute
    pub fn time_string(&self) -> String {
        format_bomb_time(self.remaining())
    }

    pub fn time_string_at(&self, now: Instant) -> String {
        format_bomb_time(self.remaining_at(now))
    }

    /// Whether the round is over, and how
    pub fn outcome(&self) -> Option<Outcome> {
        if self.session.is_solved() {
            Some(Outcome::Won)
        } else if self.strikes() >= self.max_strikes {
            Some(Outcome::Exploded)
        } else if self.remaining().is_zero() {
            Some(Outcome::TimedOut)
        } else {
            None
        }
    }

    /// Stop the countdown where it is
    pub fn freeze(&mut self) {
        if self.frozen.is_none() {
            self.frozen = Some(self.remaining());
        }
    }
}

/// Format a countdown the way the bomb shows it
pub fn format_bomb_time(left: Duration) -> String {
    let secs = left.as_secs();
    if secs >= 60 {
        format!("{:02}:{:02}", secs / 60, secs % 60)
    } else {
        format!("{:02}.{:02}", secs, left.subsec_millis() / 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingredients_core::{Ingredient, RecipeCatalog};

    fn game(max_strikes: usize) -> Game {
        let target = RecipeCatalog::global().find("Sole Meunière").unwrap();
        let session = PuzzleSession::from_parts(
            SessionId(1),
            target,
            vec![Ingredient::Sole, Ingredient::Caviar, Ingredient::Rice],
        );
        Game::from_session(session, Duration::from_secs(300), max_strikes)
    }

    #[test]
    fn test_format_bomb_time() {
        assert_eq!(format_bomb_time(Duration::from_secs(300)), "05:00");
        assert_eq!(format_bomb_time(Duration::from_secs(61)), "01:01");
        assert_eq!(format_bomb_time(Duration::from_millis(59_340)), "59.34");
        assert_eq!(format_bomb_time(Duration::ZERO), "00.00");
    }

    #[test]
    fn test_penalties_count_as_strikes() {
        let mut game = game(2);
        assert_eq!(game.outcome(), None);
        game.add_penalty();
        game.session_mut().submit(ingredients_core::Technique::Egg, "00:00");
        assert_eq!(game.strikes(), 2);
        assert_eq!(game.outcome(), Some(Outcome::Exploded));
    }

    #[test]
    fn test_countdown_and_freeze() {
        let mut game = game(3);
        let later = game.start_time + Duration::from_secs(30);
        assert_eq!(game.remaining_at(later), Duration::from_secs(270));
        assert_eq!(game.remaining_at(game.start_time + Duration::from_secs(900)), Duration::ZERO);

        game.freeze();
        let frozen = game.remaining();
        assert_eq!(game.remaining_at(later + Duration::from_secs(100)), frozen);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = PuzzleRng::from_seed(Some(5));
        let mut b = PuzzleRng::from_seed(Some(5));
        let first = Game::new(SessionId(1), &mut a, Duration::from_secs(60), 3);
        let second = Game::new(SessionId(1), &mut b, Duration::from_secs(60), 3);
        assert_eq!(first.session().target(), second.session().target());
        assert_eq!(
            first.session().initial_ingredients(),
            second.session().initial_ingredients()
        );
    }
}
