//! Core engine for the Ingredients puzzle.
//!
//! A secret dish is drawn from the recipe catalog and its ingredients are
//! offered alongside a few red herrings. No red herring set ever makes a
//! second dish completable. The solver scrolls the offered list, adds
//! ingredients, and presses the dish's technique while the bomb timer shows
//! the digit for that technique and course.
//!
//! # Example
//!
//! ```
//! use ingredients_core::{PuzzleSession, SessionId, SimpleRng};
//!
//! let mut rng = SimpleRng::with_seed(7);
//! let session = PuzzleSession::new(SessionId(1), &mut rng);
//! let offered = session.initial_ingredients().len();
//! assert!((7..=10).contains(&offered));
//! ```

pub mod catalog;
pub mod command;
mod cursor;
mod generator;
mod rng;
mod session;
mod verifier;

pub use catalog::{required_digit, Course, Ingredient, Recipe, RecipeCatalog, Technique, RECIPES};
pub use command::{
    CommandError, CommandInterpreter, ErrorClass, InterpreterConfig, Step, HELP_MESSAGE,
};
pub use cursor::IngredientCursor;
pub use generator::{DecoyBounds, RedHerringSelector};
pub use rng::{RandomSource, SimpleRng};
pub use session::{
    Button, Feedback, FixedTime, PuzzleSession, SessionId, SessionSnapshot, TimerSource,
};
pub use verifier::{verify, Verdict};
