//! A single puzzle instance: the secret dish, the offered ingredients, and
//! the module's buttons.

use crate::catalog::{Ingredient, Recipe, RecipeCatalog, Technique};
use crate::cursor::IngredientCursor;
use crate::generator::RedHerringSelector;
use crate::rng::RandomSource;
use crate::verifier::{self, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

/// Identifier of a puzzle instance, used to tag its log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u32);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Supplies the bomb timer text at the moment it is needed.
pub trait TimerSource {
    fn formatted_time(&self) -> String;
}

impl<F: Fn() -> String> TimerSource for F {
    fn formatted_time(&self) -> String {
        self()
    }
}

/// A timer frozen at one reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedTime(pub String);

impl TimerSource for FixedTime {
    fn formatted_time(&self) -> String {
        self.0.clone()
    }
}

/// A physical button on the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Left,
    Right,
    Add,
    Reset,
    Technique(Technique),
}

impl std::fmt::Display for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Button::Left => write!(f, "Left"),
            Button::Right => write!(f, "Right"),
            Button::Add => write!(f, "Add"),
            Button::Reset => write!(f, "Reset"),
            Button::Technique(technique) => write!(f, "{}", technique),
        }
    }
}

/// What a button press did, for audio/visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    /// The cursor moved
    Moved,
    /// The ingredient was taken off the list
    Added(Ingredient),
    /// The list was restored
    Reset,
    /// Scroll or add with nothing left on the list
    Invalid,
    /// The module is solved and ignores input
    Inert,
    /// A technique was pressed and judged
    Judged(Verdict),
}

/// Serializable view of a session for front-ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub display: String,
    pub ingredients: Vec<Ingredient>,
    pub cursor: usize,
    pub added: Vec<Ingredient>,
    pub strikes: usize,
    pub solved: bool,
}

/// The state of one puzzle instance.
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    id: SessionId,
    target: &'static Recipe,
    initial: Box<[Ingredient]>,
    cursor: IngredientCursor,
    added: HashSet<Ingredient>,
    strikes: usize,
    solved: bool,
}

impl PuzzleSession {
    /// Start a puzzle with a random dish from the catalog
    pub fn new<R: RandomSource + ?Sized>(id: SessionId, rng: &mut R) -> Self {
        let catalog = RecipeCatalog::global();
        let index = rng.next_usize(catalog.len());
        Self::with_target(id, &catalog.recipes()[index], rng)
    }

    /// Start a puzzle for a chosen dish, with random red herrings
    pub fn with_target<R: RandomSource + ?Sized>(
        id: SessionId,
        target: &'static Recipe,
        rng: &mut R,
    ) -> Self {
        info!(session = %id, "Selected dish: {}", target.name());
        info!(session = %id, "Course: {}", target.course());
        info!(
            session = %id,
            "Technique: {} (button: {})",
            target.technique().description(),
            target.technique()
        );
        info!(session = %id, "Expected digit: {}", target.required_digit());
        info!(session = %id, "Ingredients: {}", join_names(target.ingredients()));

        let decoys = RedHerringSelector::default().select(target, rng);
        info!(session = %id, "Red herrings: {}", join_names(decoys.iter().copied()));

        let mut offered: Vec<Ingredient> = target.ingredients().chain(decoys).collect();
        rng.shuffle(&mut offered);

        Self::from_parts(id, target, offered)
    }

    /// Build a session from an explicit offered list
    pub fn from_parts(id: SessionId, target: &'static Recipe, offered: Vec<Ingredient>) -> Self {
        Self {
            id,
            target,
            initial: offered.clone().into_boxed_slice(),
            cursor: IngredientCursor::new(offered),
            added: HashSet::new(),
            strikes: 0,
            solved: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn target(&self) -> &'static Recipe {
        self.target
    }

    pub fn initial_ingredients(&self) -> &[Ingredient] {
        &self.initial
    }

    pub fn current_ingredients(&self) -> &[Ingredient] {
        self.cursor.items()
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn added(&self) -> &HashSet<Ingredient> {
        &self.added
    }

    pub fn strikes(&self) -> usize {
        self.strikes
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Text on the module display: the current ingredient, or nothing
    pub fn display(&self) -> &'static str {
        self.cursor.current().map(|i| i.name()).unwrap_or("")
    }

    /// Press a button. Technique presses read the timer through `timer`.
    pub fn press<T: TimerSource + ?Sized>(&mut self, button: Button, timer: &T) -> Feedback {
        match button {
            Button::Left => self.scroll(-1),
            Button::Right => self.scroll(1),
            Button::Add => self.add_current(),
            Button::Reset => self.reset(),
            Button::Technique(technique) => self.submit(technique, &timer.formatted_time()),
        }
    }

    /// Move the cursor by `delta` places
    pub fn scroll(&mut self, delta: i64) -> Feedback {
        if self.solved {
            return Feedback::Inert;
        }
        if self.cursor.advance(delta) {
            Feedback::Moved
        } else {
            Feedback::Invalid
        }
    }

    /// Take the displayed ingredient off the list and into the dish
    pub fn add_current(&mut self) -> Feedback {
        if self.solved {
            return Feedback::Inert;
        }
        match self.cursor.remove_current() {
            Some(ingredient) => {
                info!(session = %self.id, "Adding ingredient: {}", ingredient);
                self.added.insert(ingredient);
                Feedback::Added(ingredient)
            }
            None => Feedback::Invalid,
        }
    }

    /// Put every ingredient back and rewind the cursor
    pub fn reset(&mut self) -> Feedback {
        if self.solved {
            return Feedback::Inert;
        }
        // No need to log extraneous reset presses
        if !self.added.is_empty() {
            info!(session = %self.id, "Reset button pressed");
        }
        self.cursor.reset(&self.initial);
        self.added.clear();
        Feedback::Reset
    }

    /// Press a technique button with the timer showing `time_text`
    pub fn submit(&mut self, technique: Technique, time_text: &str) -> Feedback {
        if self.solved {
            return Feedback::Inert;
        }
        info!(session = %self.id, "Pressed {} at time {}", technique, time_text);

        let verdict = verifier::verify(&self.added, technique, self.target, time_text);
        info!(session = %self.id, "{}", verdict.description());

        if verdict.is_strike() {
            self.strikes += 1;
        } else {
            self.solved = true;
        }
        Feedback::Judged(verdict)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut added: Vec<Ingredient> = self.added.iter().copied().collect();
        added.sort_unstable();
        SessionSnapshot {
            id: self.id,
            display: self.display().to_string(),
            ingredients: self.cursor.items().to_vec(),
            cursor: self.cursor.index(),
            added,
            strikes: self.strikes,
            solved: self.solved,
        }
    }
}

fn join_names(ingredients: impl Iterator<Item = Ingredient>) -> String {
    ingredients
        .map(|i| i.name())
        .collect::<Vec<_>>()
        .join(", ")
}
