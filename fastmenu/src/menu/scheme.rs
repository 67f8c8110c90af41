use std::collections::HashMap;

use super::{ClickHandler, Menu, click_handler};
use crate::{MenuError, event::MenuClickEvent, item::ItemStack};

const LINE_WIDTH: usize = 9;

/// Lays out a menu from text masks, one mask per row, each character bound
/// to an item.
///
/// ```text
/// "111111111"
/// "1 A B C 1"
/// "111111111"
/// ```
#[derive(Default, Clone)]
pub struct MenuScheme {
    masks: Vec<String>,
    items: HashMap<char, (ItemStack, Option<ClickHandler>)>,
}

impl MenuScheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row. Characters past the ninth are dropped.
    pub fn mask(mut self, mask: &str) -> Self {
        self.masks.push(mask.chars().take(LINE_WIDTH).collect());
        self
    }

    pub fn masks<'a, I>(self, masks: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        masks.into_iter().fold(self, Self::mask)
    }

    pub fn bind_item(mut self, character: char, item: impl Into<ItemStack>) -> Self {
        self.items.insert(character, (item.into(), None));
        self
    }

    pub fn bind_item_with<F>(mut self, character: char, item: impl Into<ItemStack>, handler: F) -> Self
    where
        F: Fn(&mut Menu, &mut MenuClickEvent) + Send + Sync + 'static,
    {
        self.items
            .insert(character, (item.into(), Some(click_handler(handler))));
        self
    }

    pub fn unbind_item(mut self, character: char) -> Self {
        self.items.remove(&character);
        self
    }

    /// Set the bound items on `menu`. Slots of unbound characters keep their
    /// item. Nothing is changed when a mask reaches past the menu.
    pub fn apply(&self, menu: &mut Menu) -> Result<(), MenuError> {
        let placements: Vec<_> = self
            .masks
            .iter()
            .enumerate()
            .flat_map(|(line, mask)| {
                mask.chars()
                    .enumerate()
                    .map(move |(column, character)| (LINE_WIDTH * line + column, character))
            })
            .filter_map(|(slot, character)| Some((slot, self.items.get(&character)?)))
            .collect();

        let size = menu.size();
        if let Some(&(slot, _)) = placements.iter().find(|(slot, _)| *slot >= size) {
            return Err(MenuError::InvalidSlot { slot, size });
        }
        for (slot, (item, handler)) in placements {
            menu.put_item(slot, item.clone(), handler.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::MenuScheme;
    use crate::{MenuError, item::ItemStack, menu::Menu};

    #[test]
    fn test_apply_masks() {
        let mut menu = Menu::new(27).unwrap();
        menu.set_item(10, ItemStack::vanilla("diamond")).unwrap();

        MenuScheme::new()
            .masks(["111111111", "1 A     1", "111111111"])
            .bind_item('1', ItemStack::vanilla("black_stained_glass_pane"))
            .bind_item_with('A', ItemStack::vanilla("emerald"), |_, _| {})
            .apply(&mut menu)
            .unwrap();

        let pane = ItemStack::vanilla("black_stained_glass_pane");
        assert_eq!(menu.item(0), Some(&pane));
        assert_eq!(menu.item(17), Some(&pane));
        assert_eq!(menu.item(26), Some(&pane));
        assert_eq!(menu.item(11), Some(&ItemStack::vanilla("emerald")));
        assert!(menu.has_handler(11));
        // Spaces are not bound
        assert_eq!(menu.item(10), Some(&ItemStack::vanilla("diamond")));
        assert_eq!(menu.item(12), None);
    }

    #[test]
    fn test_long_masks_are_truncated() {
        let mut menu = Menu::new(18).unwrap();
        MenuScheme::new()
            .mask("xxxxxxxxxxxx")
            .bind_item('x', ItemStack::vanilla("stone"))
            .apply(&mut menu)
            .unwrap();
        assert_eq!(menu.item(8), Some(&ItemStack::vanilla("stone")));
        assert_eq!(menu.item(9), None);
    }

    #[test]
    fn test_unbind_and_overflow() {
        let scheme = MenuScheme::new()
            .masks(["a", "a"])
            .bind_item('a', ItemStack::vanilla("stone"));

        let mut small = Menu::new(9).unwrap();
        assert_eq!(
            scheme.apply(&mut small),
            Err(MenuError::InvalidSlot { slot: 9, size: 9 })
        );
        // The rows that did fit are not applied either
        assert_eq!(small.item(0), None);
        assert!(small.take_dirty().is_empty());

        let mut menu = Menu::new(18).unwrap();
        scheme.unbind_item('a').apply(&mut menu).unwrap();
        assert!(menu.contents().iter().all(Option::is_none));
    }
}
