use crate::catalog::{Ingredient, Recipe, Technique};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Outcome of pressing a technique button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Dish complete, module disarmed
    Solved,
    WrongIngredients,
    WrongTechnique,
    /// Right dish, but the timer lacked the required digit
    WrongTimer,
}

impl Verdict {
    /// Every verdict except `Solved` is a strike
    pub fn is_strike(&self) -> bool {
        !matches!(self, Verdict::Solved)
    }

    /// Log line describing the verdict
    pub fn description(&self) -> &'static str {
        match self {
            Verdict::Solved => "Delicious!  Module disarmed.",
            Verdict::WrongIngredients => "Strike!  The ingredients are incorrect.",
            Verdict::WrongTechnique => "Strike!  The selected technique is incorrect.",
            Verdict::WrongTimer => "Strike!  The timer does not contain the required digit.",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Solved => write!(f, "Solved"),
            Verdict::WrongIngredients => write!(f, "Wrong ingredients"),
            Verdict::WrongTechnique => write!(f, "Wrong technique"),
            Verdict::WrongTimer => write!(f, "Wrong timer"),
        }
    }
}

/// Judge a submission against the target recipe.
///
/// Checks run in order: ingredients (as a set), then technique, then
/// whether `time_text` shows the digit for the target's technique and course.
pub fn verify(
    added: &HashSet<Ingredient>,
    technique: Technique,
    target: &Recipe,
    time_text: &str,
) -> Verdict {
    let expected: HashSet<Ingredient> = target.ingredients().collect();
    if *added != expected {
        return Verdict::WrongIngredients;
    }

    if technique != target.technique() {
        return Verdict::WrongTechnique;
    }

    let digit = char::from(b'0' + target.required_digit());
    if time_text.contains(digit) {
        Verdict::Solved
    } else {
        Verdict::WrongTimer
    }
}
