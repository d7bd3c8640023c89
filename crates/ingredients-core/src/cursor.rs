use crate::catalog::Ingredient;

/// The ingredient list shown on the module with a wrapping index into it.
///
/// Invariant: `index < items.len()` whenever the list is non-empty, and
/// `index == 0` when it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientCursor {
    items: Vec<Ingredient>,
    index: usize,
}

impl IngredientCursor {
    pub fn new(items: Vec<Ingredient>) -> Self {
        Self { items, index: 0 }
    }

    pub fn items(&self) -> &[Ingredient] {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The ingredient under the cursor
    pub fn current(&self) -> Option<Ingredient> {
        self.items.get(self.index).copied()
    }

    /// Move by `delta` positions, wrapping in both directions.
    ///
    /// Returns `false` (and does nothing) when the list is empty.
    pub fn advance(&mut self, delta: i64) -> bool {
        let Ok(len) = i64::try_from(self.items.len()) else {
            return false;
        };
        if len == 0 {
            return false;
        }
        // index < len, so it always fits
        let current = self.index as i64;
        self.index = (current + delta.rem_euclid(len)).rem_euclid(len) as usize;
        true
    }

    /// Remove and return the ingredient under the cursor.
    ///
    /// Removing the last element wraps the cursor back to the start.
    pub fn remove_current(&mut self) -> Option<Ingredient> {
        if self.index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(self.index);
        if self.index == self.items.len() {
            self.index = 0;
        }
        Some(removed)
    }

    /// Restore `initial` and rewind to the start
    pub fn reset(&mut self, initial: &[Ingredient]) {
        self.items = initial.to_vec();
        self.index = 0;
    }

    /// Position of an ingredient in the current list
    pub fn position_of(&self, ingredient: Ingredient) -> Option<usize> {
        self.items.iter().position(|&item| item == ingredient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ten() -> IngredientCursor {
        IngredientCursor::new(Ingredient::ALL[..10].to_vec())
    }

    #[test]
    fn test_advance_wraps_both_ways() {
        let mut cursor = ten();
        assert!(cursor.advance(-3));
        assert_eq!(cursor.index(), 7);
        assert!(cursor.advance(5));
        assert_eq!(cursor.index(), 2);
        assert!(cursor.advance(-25));
        assert_eq!(cursor.index(), 7);
        assert!(cursor.advance(i64::MIN));
        assert!(cursor.index() < 10);
    }

    #[test]
    fn test_advance_on_empty_list() {
        let mut cursor = IngredientCursor::default();
        assert!(!cursor.advance(1));
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn test_remove_current_wraps_from_end() {
        let mut cursor = IngredientCursor::new(vec![Ingredient::Veal, Ingredient::Beef, Ingredient::Quail]);
        cursor.advance(2);
        assert_eq!(cursor.remove_current(), Some(Ingredient::Quail));
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.current(), Some(Ingredient::Veal));

        assert_eq!(cursor.remove_current(), Some(Ingredient::Veal));
        assert_eq!(cursor.current(), Some(Ingredient::Beef));
        assert_eq!(cursor.remove_current(), Some(Ingredient::Beef));
        assert!(cursor.is_empty());
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.remove_current(), None);
    }

    #[test]
    fn test_remove_from_middle_keeps_index() {
        let mut cursor = ten();
        cursor.advance(4);
        let removed = cursor.remove_current();
        assert_eq!(removed, Some(Ingredient::ALL[4]));
        assert_eq!(cursor.index(), 4);
        assert_eq!(cursor.current(), Some(Ingredient::ALL[5]));
    }

    #[test]
    fn test_reset_restores_initial() {
        let initial = Ingredient::ALL[..10].to_vec();
        let mut cursor = IngredientCursor::new(initial.clone());
        cursor.advance(3);
        cursor.remove_current();
        cursor.remove_current();
        cursor.reset(&initial);
        assert_eq!(cursor.items(), initial.as_slice());
        assert_eq!(cursor.index(), 0);
    }

    proptest! {
        #[test]
        fn prop_advance_matches_euclidean_modulo(len in 1usize..20, start in 0usize..20, delta in any::<i32>()) {
            let mut cursor = IngredientCursor::new(Ingredient::ALL[..len].to_vec());
            let start = start % len;
            cursor.advance(start as i64);
            prop_assert_eq!(cursor.index(), start);

            cursor.advance(i64::from(delta));
            let len_i = len as i64;
            let expected = (start as i64 + ((i64::from(delta) % len_i) + len_i) % len_i) % len_i;
            prop_assert_eq!(cursor.index() as i64, expected);
            prop_assert!(cursor.index() < len);
        }
    }
}
