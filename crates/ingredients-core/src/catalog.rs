//! Static recipe data: ingredients, techniques, courses, the recipe table,
//! and the ingredient → recipes reverse index.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

/// An ingredient offered by the puzzle.
///
/// Variants are listed in the order they appear in the manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ingredient {
    // Meat
    Veal,
    Beef,
    Quail,
    FiletMignon,

    // Seafood
    Crab,
    Scallop,
    Lobster,
    Sole,
    Eel,
    SeaBass,
    Mussel,
    Cod,

    // Vegetables
    Pumpkin,
    Zucchini,
    Onion,
    Tomato,
    Eggplant,
    Carrot,
    Garlic,
    Celery,

    // Mushrooms
    Morel,
    Porcini,
    Chanterelle,
    Portobello,
    BlackTruffle,
    KingOysterMushroom,
    BlackTrumpet,
    MillerMushroom,

    // Herbs and spices
    Cloves,
    Rosemary,
    Thyme,
    BayLeaf,
    Basil,
    Dill,
    Parsley,
    Saffron,

    // Fruit
    Apricot,
    Gooseberry,
    Lemon,
    Orange,
    Raspberry,
    Pear,
    Blackberry,
    Apple,

    // Pantry
    Cheese,
    Chocolate,
    Caviar,
    Butter,
    OliveOil,
    Cornichon,
    Rice,
    Honey,

    // More fruit
    SourCherry,
    Strawberry,
    BloodOrange,
    Banana,
    Grapes,
    Melon,
    Watermelon,
}

impl Ingredient {
    /// Every ingredient, in manual order.
    pub const ALL: [Ingredient; 59] = [
        Ingredient::Veal,
        Ingredient::Beef,
        Ingredient::Quail,
        Ingredient::FiletMignon,
        Ingredient::Crab,
        Ingredient::Scallop,
        Ingredient::Lobster,
        Ingredient::Sole,
        Ingredient::Eel,
        Ingredient::SeaBass,
        Ingredient::Mussel,
        Ingredient::Cod,
        Ingredient::Pumpkin,
        Ingredient::Zucchini,
        Ingredient::Onion,
        Ingredient::Tomato,
        Ingredient::Eggplant,
        Ingredient::Carrot,
        Ingredient::Garlic,
        Ingredient::Celery,
        Ingredient::Morel,
        Ingredient::Porcini,
        Ingredient::Chanterelle,
        Ingredient::Portobello,
        Ingredient::BlackTruffle,
        Ingredient::KingOysterMushroom,
        Ingredient::BlackTrumpet,
        Ingredient::MillerMushroom,
        Ingredient::Cloves,
        Ingredient::Rosemary,
        Ingredient::Thyme,
        Ingredient::BayLeaf,
        Ingredient::Basil,
        Ingredient::Dill,
        Ingredient::Parsley,
        Ingredient::Saffron,
        Ingredient::Apricot,
        Ingredient::Gooseberry,
        Ingredient::Lemon,
        Ingredient::Orange,
        Ingredient::Raspberry,
        Ingredient::Pear,
        Ingredient::Blackberry,
        Ingredient::Apple,
        Ingredient::Cheese,
        Ingredient::Chocolate,
        Ingredient::Caviar,
        Ingredient::Butter,
        Ingredient::OliveOil,
        Ingredient::Cornichon,
        Ingredient::Rice,
        Ingredient::Honey,
        Ingredient::SourCherry,
        Ingredient::Strawberry,
        Ingredient::BloodOrange,
        Ingredient::Banana,
        Ingredient::Grapes,
        Ingredient::Melon,
        Ingredient::Watermelon,
    ];

    /// The name shown on the module display.
    pub fn name(&self) -> &'static str {
        match self {
            Ingredient::Veal => "Veal",
            Ingredient::Beef => "Beef",
            Ingredient::Quail => "Quail",
            Ingredient::FiletMignon => "Filet Mignon",
            Ingredient::Crab => "Crab",
            Ingredient::Scallop => "Scallop",
            Ingredient::Lobster => "Lobster",
            Ingredient::Sole => "Sole",
            Ingredient::Eel => "Eel",
            Ingredient::SeaBass => "Sea Bass",
            Ingredient::Mussel => "Mussel",
            Ingredient::Cod => "Cod",
            Ingredient::Pumpkin => "Pumpkin",
            Ingredient::Zucchini => "Zucchini",
            Ingredient::Onion => "Onion",
            Ingredient::Tomato => "Tomato",
            Ingredient::Eggplant => "Eggplant",
            Ingredient::Carrot => "Carrot",
            Ingredient::Garlic => "Garlic",
            Ingredient::Celery => "Celery",
            Ingredient::Morel => "Morel",
            Ingredient::Porcini => "Porcini",
            Ingredient::Chanterelle => "Chanterelle",
            Ingredient::Portobello => "Portobello",
            Ingredient::BlackTruffle => "Black Truffle",
            Ingredient::KingOysterMushroom => "King Oyster Mushroom",
            Ingredient::BlackTrumpet => "Black Trumpet",
            Ingredient::MillerMushroom => "Miller Mushroom",
            Ingredient::Cloves => "Cloves",
            Ingredient::Rosemary => "Rosemary",
            Ingredient::Thyme => "Thyme",
            Ingredient::BayLeaf => "Bay Leaf",
            Ingredient::Basil => "Basil",
            Ingredient::Dill => "Dill",
            Ingredient::Parsley => "Parsley",
            Ingredient::Saffron => "Saffron",
            Ingredient::Apricot => "Apricot",
            Ingredient::Gooseberry => "Gooseberry",
            Ingredient::Lemon => "Lemon",
            Ingredient::Orange => "Orange",
            Ingredient::Raspberry => "Raspberry",
            Ingredient::Pear => "Pear",
            Ingredient::Blackberry => "Blackberry",
            Ingredient::Apple => "Apple",
            Ingredient::Cheese => "Cheese",
            Ingredient::Chocolate => "Chocolate",
            Ingredient::Caviar => "Caviar",
            Ingredient::Butter => "Butter",
            Ingredient::OliveOil => "Olive Oil",
            Ingredient::Cornichon => "Cornichon",
            Ingredient::Rice => "Rice",
            Ingredient::Honey => "Honey",
            Ingredient::SourCherry => "Sour Cherry",
            Ingredient::Strawberry => "Strawberry",
            Ingredient::BloodOrange => "Blood Orange",
            Ingredient::Banana => "Banana",
            Ingredient::Grapes => "Grapes",
            Ingredient::Melon => "Melon",
            Ingredient::Watermelon => "Watermelon",
        }
    }
}

impl std::fmt::Display for Ingredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Cooking technique, one per technique button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Technique {
    Egg,
    Fire,
    Knife,
    Pepper,
}

impl Technique {
    /// Techniques in button order
    pub const ALL: [Technique; 4] = [
        Technique::Egg,
        Technique::Fire,
        Technique::Knife,
        Technique::Pepper,
    ];

    /// Lowercase button label, as used by the command protocol
    pub fn button_name(&self) -> &'static str {
        match self {
            Technique::Egg => "egg",
            Technique::Fire => "fire",
            Technique::Knife => "knife",
            Technique::Pepper => "pepper",
        }
    }

    /// Parse a lowercase button label
    pub fn from_button_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.button_name() == name)
    }

    /// The technique's name in the manual
    pub fn description(&self) -> &'static str {
        match self {
            Technique::Egg => "Cracking an egg",
            Technique::Fire => "The perfect flambé",
            Technique::Knife => "Good knife skills",
            Technique::Pepper => "Seasoning with style",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Technique::Egg => write!(f, "Egg"),
            Technique::Fire => write!(f, "Fire"),
            Technique::Knife => write!(f, "Knife"),
            Technique::Pepper => write!(f, "Pepper"),
        }
    }
}

/// Menu course of a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Course {
    Starter,
    Soup,
    Fish,
    Meat,
    Dessert,
}

impl Course {
    pub const ALL: [Course; 5] = [
        Course::Starter,
        Course::Soup,
        Course::Fish,
        Course::Meat,
        Course::Dessert,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Course::Starter => write!(f, "Starter"),
            Course::Soup => write!(f, "Soup"),
            Course::Fish => write!(f, "Fish"),
            Course::Meat => write!(f, "Meat"),
            Course::Dessert => write!(f, "Dessert"),
        }
    }
}

/// Timer digit required for each technique (rows) and course (columns).
const DIGIT_TABLE: [[u8; 5]; 4] = [
    // Starter, Soup, Fish, Meat, Dessert
    [3, 1, 9, 7, 2], // Egg
    [7, 5, 4, 0, 3], // Fire
    [1, 6, 5, 9, 8], // Knife
    [4, 0, 8, 2, 6], // Pepper
];

/// Look up the timer digit for a technique and course.
pub fn required_digit(technique: Technique, course: Course) -> u8 {
    DIGIT_TABLE[technique.index()][course.index()]
}

/// A dish from the manual.
///
/// The ingredient list is frozen static data; accessors hand out either a
/// read-only view or a freshly built set, never anything that aliases
/// mutable state.
#[derive(Debug)]
pub struct Recipe {
    name: &'static str,
    course: Course,
    technique: Technique,
    ingredients: &'static [Ingredient],
}

impl Recipe {
    const fn new(
        name: &'static str,
        course: Course,
        technique: Technique,
        ingredients: &'static [Ingredient],
    ) -> Self {
        Self {
            name,
            course,
            technique,
            ingredients,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn course(&self) -> Course {
        self.course
    }

    pub fn technique(&self) -> Technique {
        self.technique
    }

    /// The ingredients in manual order
    pub fn ingredients(&self) -> impl Iterator<Item = Ingredient> + '_ {
        self.ingredients.iter().copied()
    }

    /// A fresh copy of the ingredient set
    pub fn ingredient_set(&self) -> BTreeSet<Ingredient> {
        self.ingredients().collect()
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    pub fn contains(&self, ingredient: Ingredient) -> bool {
        self.ingredients.contains(&ingredient)
    }

    /// Digit the bomb timer must show when the technique is pressed
    pub fn required_digit(&self) -> u8 {
        required_digit(self.technique, self.course)
    }
}

impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Recipe {}

impl std::hash::Hash for Recipe {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Display for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

use Course::{Dessert, Fish, Meat, Soup, Starter};
use Ingredient::*;
use Technique::{Egg, Fire, Knife, Pepper};

/// Every recipe in the manual.
pub static RECIPES: [Recipe; 28] = [
    Recipe::new("Mushroom Terrine", Starter, Egg, &[Morel, Chanterelle, KingOysterMushroom, BlackTrumpet]),
    Recipe::new("Scallop Poêlé", Starter, Fire, &[Scallop, OliveOil]),
    Recipe::new("Ratatouille", Starter, Knife, &[Zucchini, Eggplant, Tomato, Garlic, BayLeaf]),
    Recipe::new("Lobster Mousse", Starter, Egg, &[Lobster, Scallop, Dill]),
    Recipe::new("Caprese Salad", Starter, Pepper, &[Strawberry, Tomato, Cheese, Basil]),
    Recipe::new("Consommé", Soup, Knife, &[Celery, Onion, Cloves]),
    Recipe::new("Pumpkin Velouté", Soup, Egg, &[Pumpkin, BlackTruffle]),
    Recipe::new("Carrot Potage", Soup, Pepper, &[Carrot, Onion, Rice, Butter]),
    Recipe::new("Crab Bisque", Soup, Fire, &[Crab, Tomato, Carrot, Celery, OliveOil]),
    Recipe::new("Cold Tomato Soup", Soup, Knife, &[Watermelon, Tomato, Dill]),
    Recipe::new("Sole Meunière", Fish, Pepper, &[Sole, Caviar]),
    Recipe::new("Eel Matelote", Fish, Fire, &[Eel, BayLeaf, Parsley]),
    Recipe::new("Bouillabaisse", Fish, Knife, &[Mussel, Lobster, Cod, Garlic, Saffron]),
    Recipe::new("Sea Bass en Papillote", Fish, Pepper, &[SeaBass, Basil, Thyme, OliveOil]),
    Recipe::new("Seafood Tartare", Fish, Pepper, &[BloodOrange, Lobster, SeaBass, OliveOil]),
    Recipe::new("Sea Bass Poêlé", Fish, Fire, &[Grapes, SeaBass, Zucchini, Chanterelle, Parsley]),
    Recipe::new("Sweetbread Poêlé", Meat, Fire, &[Porcini, Lemon, Veal]),
    Recipe::new("Beef Sauté", Meat, Pepper, &[Cornichon, Eggplant, Zucchini, Beef]),
    Recipe::new("Beef Bourguignon", Meat, Pepper, &[Rosemary, BayLeaf, Thyme, Garlic, Beef]),
    Recipe::new("Stuffed Quail", Meat, Knife, &[Rice, Portobello, Porcini, MillerMushroom, Parsley, Quail]),
    Recipe::new("Filet Mignon Poêlé", Meat, Fire, &[SourCherry, Butter, BlackTruffle, Rosemary, Cloves, FiletMignon]),
    Recipe::new("Chocolate Mousse", Dessert, Egg, &[Chocolate, Lemon, Butter]),
    Recipe::new("Fresh Fruit Compote", Dessert, Knife, &[Pear, Apple, Apricot]),
    Recipe::new("Crêpes Suzette", Dessert, Fire, &[Orange, Butter, Honey]),
    Recipe::new("Berries au Fromage", Dessert, Egg, &[Cheese, Lemon, Gooseberry, Raspberry, Blackberry]),
    Recipe::new("Banana Soufflé", Dessert, Egg, &[Banana, Butter, Honey]),
    Recipe::new("Fruit Gelée", Dessert, Knife, &[Melon, Pear, Gooseberry]),
    Recipe::new("Tarte aux Fruits", Dessert, Egg, &[SourCherry, Strawberry, BloodOrange, Banana, Grapes, Melon, Watermelon]),
];

/// The recipe table plus the ingredient → recipes reverse index.
///
/// Built once per process via [`RecipeCatalog::global`] and shared read-only.
#[derive(Debug)]
pub struct RecipeCatalog {
    recipes: &'static [Recipe],
    containing: HashMap<Ingredient, Vec<&'static Recipe>>,
}

impl RecipeCatalog {
    fn build(recipes: &'static [Recipe]) -> Self {
        let mut containing: HashMap<Ingredient, Vec<&'static Recipe>> = Ingredient::ALL
            .iter()
            .map(|&ingredient| (ingredient, Vec::new()))
            .collect();

        for recipe in recipes {
            for ingredient in recipe.ingredients() {
                if let Some(list) = containing.get_mut(&ingredient) {
                    list.push(recipe);
                }
            }
        }

        Self {
            recipes,
            containing,
        }
    }

    /// The shared catalog over [`RECIPES`].
    pub fn global() -> &'static RecipeCatalog {
        static CATALOG: OnceLock<RecipeCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| RecipeCatalog::build(&RECIPES))
    }

    pub fn recipes(&self) -> &'static [Recipe] {
        self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Recipes that use the given ingredient
    pub fn recipes_containing(&self, ingredient: Ingredient) -> &[&'static Recipe] {
        self.containing
            .get(&ingredient)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Find a recipe by name, ignoring case
    pub fn find(&self, name: &str) -> Option<&'static Recipe> {
        let wanted = name.trim().to_lowercase();
        self.recipes
            .iter()
            .find(|recipe| recipe.name.to_lowercase() == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        let catalog = RecipeCatalog::global();
        assert_eq!(catalog.len(), 28);
        assert_eq!(Ingredient::ALL.len(), 59);
    }

    #[test]
    fn test_recipe_names_unique() {
        let names: BTreeSet<&str> = RECIPES.iter().map(Recipe::name).collect();
        assert_eq!(names.len(), RECIPES.len());
    }

    #[test]
    fn test_recipes_have_no_duplicate_ingredients() {
        for recipe in &RECIPES {
            assert!(recipe.ingredient_count() > 0, "{} is empty", recipe);
            assert_eq!(
                recipe.ingredient_set().len(),
                recipe.ingredient_count(),
                "{} repeats an ingredient",
                recipe
            );
        }
    }

    #[test]
    fn test_no_recipe_contained_in_another() {
        for recipe in &RECIPES {
            for other in &RECIPES {
                if recipe == other {
                    continue;
                }
                let missing: Vec<_> = recipe
                    .ingredients()
                    .filter(|&ingredient| !other.contains(ingredient))
                    .collect();
                assert!(
                    !missing.is_empty(),
                    "{} is fully contained in {}",
                    recipe,
                    other
                );
            }
        }
    }

    #[test]
    fn test_at_most_one_recipe_one_ingredient_away() {
        // Red herring selection relies on excluding at most one ingredient
        // per round to keep every other dish incomplete.
        for recipe in &RECIPES {
            let target = recipe.ingredient_set();
            let singletons = RECIPES
                .iter()
                .filter(|other| *other != recipe)
                .filter(|other| other.ingredient_set().difference(&target).count() == 1)
                .count();
            assert!(singletons <= 1, "{} has {} near-complete neighbours", recipe, singletons);
        }
    }

    #[test]
    fn test_reverse_index_matches_recipes() {
        let catalog = RecipeCatalog::global();
        for ingredient in Ingredient::ALL {
            for recipe in catalog.recipes_containing(ingredient) {
                assert!(recipe.contains(ingredient));
            }
            let expected = RECIPES.iter().filter(|r| r.contains(ingredient)).count();
            assert_eq!(catalog.recipes_containing(ingredient).len(), expected);
        }
        assert_eq!(catalog.recipes_containing(Ingredient::Butter).len(), 5);
    }

    #[test]
    fn test_ingredient_set_is_independent_copy() {
        let recipe = &RECIPES[0];
        let mut set = recipe.ingredient_set();
        set.clear();
        set.insert(Ingredient::Veal);
        assert_eq!(recipe.ingredient_count(), 4);
        assert!(!recipe.contains(Ingredient::Veal));
        assert_eq!(recipe.ingredient_set().len(), 4);
    }

    #[test]
    fn test_friendly_names() {
        assert_eq!(Ingredient::KingOysterMushroom.to_string(), "King Oyster Mushroom");
        assert_eq!(Ingredient::OliveOil.name(), "Olive Oil");
        assert_eq!(Ingredient::Veal.name(), "Veal");
    }

    #[test]
    fn test_digit_lookup() {
        assert_eq!(required_digit(Technique::Egg, Course::Starter), 3);
        assert_eq!(required_digit(Technique::Fire, Course::Meat), 0);
        assert_eq!(required_digit(Technique::Knife, Course::Dessert), 8);
        assert_eq!(required_digit(Technique::Pepper, Course::Soup), 0);
        for technique in Technique::ALL {
            for course in Course::ALL {
                assert!(required_digit(technique, course) <= 9);
            }
        }
    }

    #[test]
    fn test_find_recipe_by_name() {
        let catalog = RecipeCatalog::global();
        let recipe = catalog.find("crab bisque").unwrap();
        assert_eq!(recipe.course(), Course::Soup);
        assert_eq!(recipe.technique(), Technique::Fire);
        assert_eq!(recipe.required_digit(), 5);
        assert!(catalog.find("toast").is_none());
    }

    #[test]
    fn test_button_names_round_trip() {
        for technique in Technique::ALL {
            assert_eq!(Technique::from_button_name(technique.button_name()), Some(technique));
        }
        assert_eq!(Technique::from_button_name("spoon"), None);
    }
}
