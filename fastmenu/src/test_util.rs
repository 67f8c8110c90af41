use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::{item::ItemStack, menu::Menu, viewer::Viewer};

/// A viewer that records what the library asked it to show.
pub struct TestViewer {
    uuid: Uuid,
    name: String,
    pub opened: Mutex<Vec<String>>,
    /// Slots of the last opened menu, as they were when it was shown.
    pub shown: Mutex<Vec<Option<ItemStack>>>,
    pub updates: Mutex<Vec<(usize, Option<ItemStack>)>>,
    pub closes: Mutex<usize>,
}

impl TestViewer {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            opened: Mutex::new(Vec::new()),
            shown: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            closes: Mutex::new(0),
        })
    }

    pub fn open_count(&self) -> usize {
        self.opened.lock().len()
    }

    pub fn close_count(&self) -> usize {
        *self.closes.lock()
    }
}

impl Viewer for TestViewer {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn open_menu(&self, menu: &Menu) {
        self.opened.lock().push(menu.title().get_text());
        *self.shown.lock() = menu.contents().to_vec();
    }

    fn update_slot(&self, slot: usize, item: Option<&ItemStack>) {
        self.updates.lock().push((slot, item.cloned()));
    }

    fn close_menu(&self) {
        *self.closes.lock() += 1;
    }
}
