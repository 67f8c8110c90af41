use std::sync::Arc;

use fastmenu_util::TextComponent;

use super::{ClickHandler, Menu, MenuHolder, MenuType};
use crate::{MenuError, event::MenuClickEvent, item::ItemStack};

/// Builds the navigation item from the page it leads to.
pub type PageItem = Arc<dyn Fn(usize) -> ItemStack + Send + Sync>;
pub type PageChangeHandler = Arc<dyn Fn(&mut Menu, usize) + Send + Sync>;

struct NavButton {
    slot: usize,
    item: PageItem,
}

/// A menu showing a list of content items over several pages.
///
/// By default every slot except the last row is used for content. The
/// navigation buttons are only shown when there is a page to go to.
pub struct PaginatedMenu {
    menu: Menu,
    content: Vec<(ItemStack, Option<ClickHandler>)>,
    content_slots: Vec<usize>,
    page: usize,
    previous: Option<NavButton>,
    next: Option<NavButton>,
    page_change: Option<PageChangeHandler>,
}

impl PaginatedMenu {
    pub fn new(size: usize) -> Result<Self, MenuError> {
        Ok(Self::from_menu(Menu::new(size)?))
    }

    pub fn titled(size: usize, title: impl Into<TextComponent>) -> Result<Self, MenuError> {
        Ok(Self::from_menu(Menu::titled(size, title)?))
    }

    pub fn of_type(menu_type: MenuType) -> Self {
        Self::from_menu(Menu::of_type(menu_type))
    }

    pub fn from_menu(menu: Menu) -> Self {
        let size = menu.size();
        let content_slots = (0..size.saturating_sub(9).max(9).min(size)).collect();
        Self {
            menu,
            content: Vec::new(),
            content_slots,
            page: 1,
            previous: None,
            next: None,
            page_change: None,
        }
    }

    pub fn add_content(&mut self, item: impl Into<ItemStack>) {
        self.content.push((item.into(), None));
    }

    pub fn add_content_with<F>(&mut self, item: impl Into<ItemStack>, handler: F)
    where
        F: Fn(&mut Menu, &mut MenuClickEvent) + Send + Sync + 'static,
    {
        self.content
            .push((item.into(), Some(super::click_handler(handler))));
    }

    pub fn add_contents<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = ItemStack>,
    {
        self.content.extend(items.into_iter().map(|item| (item, None)));
    }

    /// Items and handlers are paired by position; both lists must have the same length.
    pub fn add_contents_with(
        &mut self,
        items: Vec<ItemStack>,
        handlers: Vec<Option<ClickHandler>>,
    ) -> Result<(), MenuError> {
        if items.len() != handlers.len() {
            return Err(MenuError::ContentMismatch {
                content: items.len(),
                handlers: handlers.len(),
            });
        }
        self.content.extend(items.into_iter().zip(handlers));
        Ok(())
    }

    pub fn set_content(
        &mut self,
        index: usize,
        item: impl Into<ItemStack>,
        handler: Option<ClickHandler>,
    ) -> Result<(), MenuError> {
        let len = self.content.len();
        let entry = self
            .content
            .get_mut(index)
            .ok_or(MenuError::InvalidContentIndex { index, len })?;
        *entry = (item.into(), handler);
        Ok(())
    }

    /// Replace the whole content.
    pub fn set_contents<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = ItemStack>,
    {
        self.clear_content();
        self.add_contents(items);
    }

    pub fn set_contents_with(
        &mut self,
        items: Vec<ItemStack>,
        handlers: Vec<Option<ClickHandler>>,
    ) -> Result<(), MenuError> {
        if items.len() != handlers.len() {
            return Err(MenuError::ContentMismatch {
                content: items.len(),
                handlers: handlers.len(),
            });
        }
        self.clear_content();
        self.add_contents_with(items, handlers)
    }

    pub fn clear_content(&mut self) {
        self.content.clear();
    }

    pub fn content_len(&self) -> usize {
        self.content.len()
    }

    /// The slots content items are laid out on, in order. Must not be empty.
    pub fn set_content_slots(&mut self, slots: Vec<usize>) -> Result<(), MenuError> {
        let size = self.menu.size();
        if slots.is_empty() {
            return Err(MenuError::NoContentSlots);
        }
        if let Some(&slot) = slots.iter().find(|&&slot| slot >= size) {
            return Err(MenuError::InvalidSlot { slot, size });
        }
        self.content_slots = slots;
        Ok(())
    }

    pub fn content_slots(&self) -> &[usize] {
        &self.content_slots
    }

    pub fn previous_page_item<F>(&mut self, slot: usize, item: F) -> Result<(), MenuError>
    where
        F: Fn(usize) -> ItemStack + Send + Sync + 'static,
    {
        self.previous = Some(self.nav_button(slot, Arc::new(item))?);
        Ok(())
    }

    pub fn next_page_item<F>(&mut self, slot: usize, item: F) -> Result<(), MenuError>
    where
        F: Fn(usize) -> ItemStack + Send + Sync + 'static,
    {
        self.next = Some(self.nav_button(slot, Arc::new(item))?);
        Ok(())
    }

    fn nav_button(&self, slot: usize, item: PageItem) -> Result<NavButton, MenuError> {
        let size = self.menu.size();
        if slot >= size {
            return Err(MenuError::InvalidSlot { slot, size });
        }
        Ok(NavButton { slot, item })
    }

    /// Called with the menu and the new page every time a page is drawn.
    pub fn set_page_change_handler<F>(&mut self, handler: F)
    where
        F: Fn(&mut Menu, usize) + Send + Sync + 'static,
    {
        self.page_change = Some(Arc::new(handler));
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    /// Number of pages. Empty content has no pages.
    pub fn last_page(&self) -> usize {
        self.content.len().div_ceil(self.content_slots.len())
    }

    pub fn is_first_page(&self) -> bool {
        self.page == 1
    }

    pub fn is_last_page(&self) -> bool {
        self.page == self.last_page()
    }

    pub fn open_previous(&mut self) {
        self.open_page(self.page.saturating_sub(1));
    }

    pub fn open_next(&mut self) {
        self.open_page(self.page + 1);
    }

    /// Draw `page`, clamped to the existing pages. Viewers get the change on
    /// the next sync of the menu.
    pub fn open_page(&mut self, page: usize) {
        let last_page = self.last_page();
        self.page = page.min(last_page).max(1);

        let start = self.content_slots.len() * (self.page - 1);
        for (offset, &slot) in self.content_slots.iter().enumerate() {
            let drawn = match self.content.get(start + offset) {
                Some((item, handler)) => self.menu.put_item(slot, item.clone(), handler.clone()),
                None => self.menu.remove_item(slot),
            };
            if let Err(err) = drawn {
                log::warn!("Skipping a content slot: {err}");
            }
        }

        if let Some(previous) = &self.previous {
            let drawn = if self.page > 1 {
                self.menu
                    .put_item(previous.slot, (previous.item)(self.page - 1), None)
            } else {
                self.menu.remove_item(previous.slot)
            };
            if let Err(err) = drawn {
                log::warn!("Skipping the previous page item: {err}");
            }
        }
        if let Some(next) = &self.next {
            let drawn = if self.page < last_page {
                self.menu
                    .put_item(next.slot, (next.item)(self.page + 1), None)
            } else {
                self.menu.remove_item(next.slot)
            };
            if let Err(err) = drawn {
                log::warn!("Skipping the next page item: {err}");
            }
        }

        if let Some(handler) = self.page_change.clone() {
            handler(&mut self.menu, self.page);
        }
    }

    fn nav_clicked(button: Option<&NavButton>, slot: Option<usize>) -> bool {
        button.is_some_and(|button| slot == Some(button.slot))
    }
}

impl MenuHolder for PaginatedMenu {
    fn menu(&self) -> &Menu {
        &self.menu
    }

    fn menu_mut(&mut self) -> &mut Menu {
        &mut self.menu
    }

    fn prepare_open(&mut self) {
        self.open_page(self.page);
    }

    fn on_click(&mut self, event: &mut MenuClickEvent) {
        let slot = event.slot();
        if self.page > 1 && Self::nav_clicked(self.previous.as_ref(), slot) {
            self.open_previous();
        } else if self.page < self.last_page() && Self::nav_clicked(self.next.as_ref(), slot) {
            self.open_next();
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use fastmenu_config::{MenuConfiguration, SchedulerConfig};
    use fastmenu_util::Identifier;
    use parking_lot::Mutex;

    use super::PaginatedMenu;
    use crate::{
        MenuError,
        event::{Cancellable, ClickType, MenuClickEvent},
        item::ItemStack,
        menu::{MenuHolder, shared},
        server::{MenuContext, scheduler::TickScheduler},
        test_util::TestViewer,
    };

    fn numbered(count: usize) -> Vec<ItemStack> {
        (0..count)
            .map(|i| ItemStack::with_count(Identifier::vanilla("paper"), i as u8 + 1))
            .collect()
    }

    fn paginated(content: usize) -> PaginatedMenu {
        let mut menu = PaginatedMenu::new(27).unwrap();
        menu.add_contents(numbered(content));
        menu.previous_page_item(18, |_| ItemStack::vanilla("arrow"))
            .unwrap();
        menu.next_page_item(26, |page| {
            ItemStack::with_count(Identifier::vanilla("arrow"), page as u8)
        })
        .unwrap();
        menu
    }

    fn click(menu: &mut PaginatedMenu, slot: i16) {
        let mut event = MenuClickEvent::new(TestViewer::new("Steve"), slot, ClickType::Left);
        menu.handle_click(&mut event);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(paginated(0).last_page(), 0);
        assert_eq!(paginated(18).last_page(), 1);
        assert_eq!(paginated(19).last_page(), 2);
        assert_eq!(paginated(40).last_page(), 3);
    }

    #[test]
    fn test_default_content_slots() {
        assert_eq!(PaginatedMenu::new(9).unwrap().content_slots().len(), 9);
        assert_eq!(PaginatedMenu::new(18).unwrap().content_slots().len(), 9);
        assert_eq!(PaginatedMenu::new(54).unwrap().content_slots().len(), 45);
    }

    #[test]
    fn test_open_page_lays_out_content() {
        let mut menu = paginated(20);
        menu.open_page(1);
        assert_eq!(menu.menu.item(0).unwrap().count, 1);
        assert_eq!(menu.menu.item(17).unwrap().count, 18);
        assert_eq!(menu.menu.item(18), None);
        assert_eq!(menu.menu.item(26).unwrap().count, 2);

        menu.open_page(2);
        assert_eq!(menu.menu.item(0).unwrap().count, 19);
        assert_eq!(menu.menu.item(1).unwrap().count, 20);
        assert_eq!(menu.menu.item(2), None);
        assert_eq!(menu.menu.item(18), Some(&ItemStack::vanilla("arrow")));
        assert_eq!(menu.menu.item(26), None);
        assert!(menu.is_last_page());
    }

    #[test]
    fn test_open_page_is_clamped() {
        let mut menu = paginated(20);
        menu.open_page(7);
        assert_eq!(menu.current_page(), 2);
        menu.open_page(0);
        assert_eq!(menu.current_page(), 1);
        assert!(menu.is_first_page());

        let mut empty = paginated(0);
        empty.open_page(3);
        assert_eq!(empty.current_page(), 1);
        assert_eq!(empty.menu.item(26), None);
    }

    #[test]
    fn test_navigation_clicks() {
        let mut menu = paginated(40);
        menu.prepare_open();

        click(&mut menu, 26);
        assert_eq!(menu.current_page(), 2);
        click(&mut menu, 26);
        assert_eq!(menu.current_page(), 3);
        // Hidden on the last page
        click(&mut menu, 26);
        assert_eq!(menu.current_page(), 3);

        click(&mut menu, 18);
        assert_eq!(menu.current_page(), 2);
        click(&mut menu, 4);
        assert_eq!(menu.current_page(), 2);
    }

    #[test]
    fn test_content_handlers_and_mismatch() {
        let clicked = Arc::new(Mutex::new(Vec::new()));
        let mut menu = PaginatedMenu::new(18).unwrap();
        let seen = clicked.clone();
        menu.add_content_with(ItemStack::vanilla("emerald"), move |_, event| {
            seen.lock().push(event.raw_slot);
        });
        menu.prepare_open();
        click(&mut menu, 0);
        assert_eq!(*clicked.lock(), vec![0]);

        assert_eq!(
            menu.add_contents_with(numbered(2), vec![None]),
            Err(MenuError::ContentMismatch {
                content: 2,
                handlers: 1
            })
        );
        assert_eq!(
            menu.set_content(5, ItemStack::vanilla("stone"), None),
            Err(MenuError::InvalidContentIndex { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_page_change_handler() {
        let pages = Arc::new(Mutex::new(Vec::new()));
        let mut menu = paginated(40);
        let seen = pages.clone();
        menu.set_page_change_handler(move |menu, page| {
            seen.lock().push(page);
            menu.set_item(22, ItemStack::with_count(Identifier::vanilla("book"), page as u8))
                .unwrap();
        });

        menu.open_page(3);
        menu.open_previous();
        assert_eq!(*pages.lock(), vec![3, 2]);
        assert_eq!(menu.menu.item(22).unwrap().count, 2);
    }

    #[test]
    fn test_invalid_navigation_slot() {
        let mut menu = PaginatedMenu::new(9).unwrap();
        assert_eq!(
            menu.next_page_item(9, |_| ItemStack::vanilla("arrow")),
            Err(MenuError::InvalidSlot { slot: 9, size: 9 })
        );
        assert_eq!(
            menu.set_content_slots(vec![0, 12]),
            Err(MenuError::InvalidSlot { slot: 12, size: 9 })
        );
        assert_eq!(menu.set_content_slots(Vec::new()), Err(MenuError::NoContentSlots));
    }

    #[tokio::test]
    async fn test_pages_reach_viewers_through_context() {
        let scheduler = TickScheduler::start(&SchedulerConfig { tps: 1000.0 });
        let context = MenuContext::new(scheduler, MenuConfiguration::default());
        let menu = shared(paginated(20));
        let viewer = TestViewer::new("Steve");

        // The first page is drawn before the menu is shown
        assert!(context.open(&menu, viewer.clone()));
        {
            let shown = viewer.shown.lock();
            assert_eq!(shown[0].as_ref().unwrap().count, 1);
            assert_eq!(shown[17].as_ref().unwrap().count, 18);
            assert_eq!(shown[18], None);
            assert_eq!(shown[26].as_ref().unwrap().count, 2);
        }
        assert!(viewer.updates.lock().is_empty());

        let mut event = MenuClickEvent::new(viewer.clone(), 26, ClickType::Left);
        context.handle_click(&mut event);
        assert!(event.is_cancelled());
        assert_eq!(menu.lock().menu().item(0).unwrap().count, 19);

        let updates = viewer.updates.lock();
        let update = |slot: usize| {
            updates
                .iter()
                .rev()
                .find(|(updated, _)| *updated == slot)
                .map(|(_, item)| item.clone())
        };
        assert_eq!(update(0).flatten().unwrap().count, 19);
        assert_eq!(update(1).flatten().unwrap().count, 20);
        assert_eq!(update(2), Some(None));
        assert_eq!(update(18), Some(Some(ItemStack::vanilla("arrow"))));
        assert_eq!(update(26), Some(None));
    }
}
