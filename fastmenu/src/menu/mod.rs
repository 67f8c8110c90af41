use std::{
    collections::{BTreeSet, HashMap},
    ops::Range,
    sync::Arc,
};

use fastmenu_util::TextComponent;
use parking_lot::Mutex;

use crate::{
    MenuError,
    event::{MenuClickEvent, MenuCloseEvent, MenuOpenEvent},
    item::ItemStack,
    viewer::Viewer,
};

pub mod async_menu;
pub mod paginated;
pub mod scheme;
pub mod updater;

pub type ClickHandler = Arc<dyn Fn(&mut Menu, &mut MenuClickEvent) + Send + Sync>;
pub type OpenHandler = Arc<dyn Fn(&mut MenuOpenEvent) + Send + Sync>;
pub type CloseHandler = Arc<dyn Fn(&MenuCloseEvent) + Send + Sync>;
/// Returns `true` to keep the viewer inside the menu when they close it.
pub type CloseFilter = Arc<dyn Fn(&dyn Viewer) -> bool + Send + Sync>;

/// A menu behind a lock, as stored by the context. Only lock it from the main thread.
pub type SharedMenu = Arc<Mutex<dyn MenuHolder>>;

pub fn shared<H: MenuHolder>(holder: H) -> SharedMenu {
    Arc::new(Mutex::new(holder))
}

pub fn click_handler<F>(handler: F) -> ClickHandler
where
    F: Fn(&mut Menu, &mut MenuClickEvent) + Send + Sync + 'static,
{
    Arc::new(handler)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuType {
    Generic9x1,
    Generic9x2,
    Generic9x3,
    Generic9x4,
    Generic9x5,
    Generic9x6,
    /// Dispenser and dropper layout.
    Generic3x3,
    Hopper,
}

impl MenuType {
    pub fn size(self) -> usize {
        match self {
            Self::Generic9x1 | Self::Generic3x3 => 9,
            Self::Generic9x2 => 18,
            Self::Generic9x3 => 27,
            Self::Generic9x4 => 36,
            Self::Generic9x5 => 45,
            Self::Generic9x6 => 54,
            Self::Hopper => 5,
        }
    }

    /// Chest layout holding `size` slots.
    pub fn from_size(size: usize) -> Result<Self, MenuError> {
        Ok(match size {
            9 => Self::Generic9x1,
            18 => Self::Generic9x2,
            27 => Self::Generic9x3,
            36 => Self::Generic9x4,
            45 => Self::Generic9x5,
            54 => Self::Generic9x6,
            _ => return Err(MenuError::InvalidSize(size)),
        })
    }

    pub fn default_title(self) -> &'static str {
        match self {
            Self::Generic9x6 => "Large Chest",
            Self::Generic3x3 => "Dispenser",
            Self::Hopper => "Hopper",
            _ => "Chest",
        }
    }
}

/// The slots of one menu together with every click, open and close handler
/// registered on it.
pub struct Menu {
    menu_type: MenuType,
    title: TextComponent,
    slots: Vec<Option<ItemStack>>,
    item_handlers: HashMap<usize, ClickHandler>,
    open_handlers: Vec<OpenHandler>,
    close_handlers: Vec<CloseHandler>,
    click_handlers: Vec<ClickHandler>,
    close_filter: Option<CloseFilter>,
    dirty: BTreeSet<usize>,
}

impl Menu {
    /// A chest menu; `size` must be a multiple of 9 up to 54.
    pub fn new(size: usize) -> Result<Self, MenuError> {
        Ok(Self::of_type(MenuType::from_size(size)?))
    }

    pub fn titled(size: usize, title: impl Into<TextComponent>) -> Result<Self, MenuError> {
        Ok(Self::of_type_titled(MenuType::from_size(size)?, title))
    }

    pub fn of_type(menu_type: MenuType) -> Self {
        Self::of_type_titled(menu_type, menu_type.default_title())
    }

    pub fn of_type_titled(menu_type: MenuType, title: impl Into<TextComponent>) -> Self {
        Self {
            menu_type,
            title: title.into(),
            slots: vec![None; menu_type.size()],
            item_handlers: HashMap::new(),
            open_handlers: Vec::new(),
            close_handlers: Vec::new(),
            click_handlers: Vec::new(),
            close_filter: None,
            dirty: BTreeSet::new(),
        }
    }

    pub fn menu_type(&self) -> MenuType {
        self.menu_type
    }

    pub fn title(&self) -> &TextComponent {
        &self.title
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn item(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn contents(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    pub fn has_handler(&self, slot: usize) -> bool {
        self.item_handlers.contains_key(&slot)
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    fn check_slot(&self, slot: usize) -> Result<(), MenuError> {
        if slot < self.size() {
            Ok(())
        } else {
            Err(MenuError::InvalidSlot {
                slot,
                size: self.size(),
            })
        }
    }

    /// Put an item on the first empty slot without a click handler.
    /// Returns the slot used, or `None` if the menu is full.
    pub fn add_item(&mut self, item: impl Into<ItemStack>) -> Option<usize> {
        self.add_item_handler(item.into(), None)
    }

    pub fn add_item_with<F>(&mut self, item: impl Into<ItemStack>, handler: F) -> Option<usize>
    where
        F: Fn(&mut Menu, &mut MenuClickEvent) + Send + Sync + 'static,
    {
        self.add_item_handler(item.into(), Some(click_handler(handler)))
    }

    pub fn add_item_handler(
        &mut self,
        item: ItemStack,
        handler: Option<ClickHandler>,
    ) -> Option<usize> {
        let slot = self.first_empty()?;
        self.store(slot, Some(item), handler);
        Some(slot)
    }

    pub fn set_item(&mut self, slot: usize, item: impl Into<ItemStack>) -> Result<(), MenuError> {
        self.put_item(slot, item.into(), None)
    }

    pub fn set_item_with<F>(
        &mut self,
        slot: usize,
        item: impl Into<ItemStack>,
        handler: F,
    ) -> Result<(), MenuError>
    where
        F: Fn(&mut Menu, &mut MenuClickEvent) + Send + Sync + 'static,
    {
        self.put_item(slot, item.into(), Some(click_handler(handler)))
    }

    /// Set the item of a slot. A `None` handler removes the previous handler of that slot.
    pub fn put_item(
        &mut self,
        slot: usize,
        item: ItemStack,
        handler: Option<ClickHandler>,
    ) -> Result<(), MenuError> {
        self.check_slot(slot)?;
        self.store(slot, Some(item), handler);
        Ok(())
    }

    /// Fill `range` (end exclusive) with copies of `item`.
    pub fn set_items_range(
        &mut self,
        range: Range<usize>,
        item: impl Into<ItemStack>,
        handler: Option<ClickHandler>,
    ) -> Result<(), MenuError> {
        self.set_items(range, item, handler)
    }

    /// Put `item` on every slot of `slots`. Nothing is changed when one of them is invalid.
    pub fn set_items<I>(
        &mut self,
        slots: I,
        item: impl Into<ItemStack>,
        handler: Option<ClickHandler>,
    ) -> Result<(), MenuError>
    where
        I: IntoIterator<Item = usize>,
    {
        let slots: Vec<usize> = slots.into_iter().collect();
        for &slot in &slots {
            self.check_slot(slot)?;
        }
        let item = item.into();
        for slot in slots {
            self.store(slot, Some(item.clone()), handler.clone());
        }
        Ok(())
    }

    pub fn remove_item(&mut self, slot: usize) -> Result<(), MenuError> {
        self.check_slot(slot)?;
        self.store(slot, None, None);
        Ok(())
    }

    pub fn remove_items<I>(&mut self, slots: I) -> Result<(), MenuError>
    where
        I: IntoIterator<Item = usize>,
    {
        for slot in slots {
            self.remove_item(slot)?;
        }
        Ok(())
    }

    /// Empty every slot and drop all item handlers.
    pub fn clear_items(&mut self) {
        for slot in 0..self.size() {
            if self.slots[slot].is_some() {
                self.slots[slot] = None;
                self.dirty.insert(slot);
            }
        }
        self.item_handlers.clear();
    }

    fn store(&mut self, slot: usize, item: Option<ItemStack>, handler: Option<ClickHandler>) {
        self.slots[slot] = item;
        self.dirty.insert(slot);
        match handler {
            Some(handler) => {
                self.item_handlers.insert(slot, handler);
            }
            None => {
                self.item_handlers.remove(&slot);
            }
        }
    }

    /// Replace only the item of a slot, keeping its click handler.
    pub(crate) fn refresh_item(&mut self, slot: usize, item: ItemStack) -> Result<(), MenuError> {
        self.check_slot(slot)?;
        self.slots[slot] = Some(item);
        self.dirty.insert(slot);
        Ok(())
    }

    pub fn set_close_filter<F>(&mut self, filter: F)
    where
        F: Fn(&dyn Viewer) -> bool + Send + Sync + 'static,
    {
        self.close_filter = Some(Arc::new(filter));
    }

    pub fn clear_close_filter(&mut self) {
        self.close_filter = None;
    }

    pub fn add_open_handler<F>(&mut self, handler: F)
    where
        F: Fn(&mut MenuOpenEvent) + Send + Sync + 'static,
    {
        self.open_handlers.push(Arc::new(handler));
    }

    pub fn add_close_handler<F>(&mut self, handler: F)
    where
        F: Fn(&MenuCloseEvent) + Send + Sync + 'static,
    {
        self.close_handlers.push(Arc::new(handler));
    }

    pub fn add_click_handler<F>(&mut self, handler: F)
    where
        F: Fn(&mut Menu, &mut MenuClickEvent) + Send + Sync + 'static,
    {
        self.click_handlers.push(click_handler(handler));
    }

    /// The outer ring of slots. Menus smaller than three rows are all border.
    pub fn borders(&self) -> Vec<usize> {
        let size = self.size();
        (0..size)
            .filter(|&i| size < 27 || i < 9 || i % 9 == 0 || i % 9 == 8 || i >= size - 9)
            .collect()
    }

    /// Three slots around each corner.
    pub fn corners(&self) -> Vec<usize> {
        let size = self.size() as i64;
        (0..size)
            .filter(|&i| {
                i < 2
                    || (i > 6 && i < 10)
                    || i == 17
                    || i == size - 18
                    || (i > size - 11 && i < size - 7)
                    || i > size - 3
            })
            .map(|i| i as usize)
            .collect()
    }

    /// Slots changed since the last call.
    pub fn take_dirty(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    fn dispatch_open(&mut self, event: &mut MenuOpenEvent) {
        for handler in self.open_handlers.clone() {
            handler(event);
        }
    }

    fn dispatch_close(&mut self, event: &MenuCloseEvent) -> bool {
        for handler in self.close_handlers.clone() {
            handler(event);
        }
        self.close_filter
            .as_ref()
            .is_some_and(|filter| filter(event.viewer.as_ref()))
    }

    fn dispatch_click(&mut self, event: &mut MenuClickEvent) {
        for handler in self.click_handlers.clone() {
            handler(self, event);
        }
        let slot_handler = event
            .slot()
            .and_then(|slot| self.item_handlers.get(&slot).cloned());
        if let Some(handler) = slot_handler {
            handler(self, event);
        }
    }
}

/// Implemented by every type that owns a [`Menu`]. The hooks run before the
/// handlers registered on the menu, so a type wrapping a menu can react to its
/// own events without registering closures.
///
/// The context holds holders behind a [`SharedMenu`] lock: hooks and handlers
/// must not lock the same holder again.
pub trait MenuHolder: Send + 'static {
    fn menu(&self) -> &Menu;

    fn menu_mut(&mut self) -> &mut Menu;

    fn on_open(&mut self, _event: &mut MenuOpenEvent) {}

    fn on_click(&mut self, _event: &mut MenuClickEvent) {}

    fn on_close(&mut self, _event: &MenuCloseEvent) {}

    /// Called right before the menu is shown to a viewer.
    fn prepare_open(&mut self) {}

    fn handle_open(&mut self, event: &mut MenuOpenEvent) {
        self.on_open(event);
        self.menu_mut().dispatch_open(event);
    }

    /// Returns whether the close filter wants to keep the viewer in the menu.
    fn handle_close(&mut self, event: &MenuCloseEvent) -> bool {
        self.on_close(event);
        self.menu_mut().dispatch_close(event)
    }

    fn handle_click(&mut self, event: &mut MenuClickEvent) {
        self.on_click(event);
        self.menu_mut().dispatch_click(event);
    }
}

impl MenuHolder for Menu {
    fn menu(&self) -> &Menu {
        self
    }

    fn menu_mut(&mut self) -> &mut Menu {
        self
    }
}
