use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use super::{ClickHandler, SharedMenu};
use crate::{
    MenuError,
    item::ItemStack,
    server::{MenuContext, scheduler::TaskHandle},
};

pub type ItemSupplier = Arc<dyn Fn() -> ItemStack + Send + Sync>;

/// Periodically re-computes the items of some slots.
pub struct MenuUpdater {
    refresh_interval: u64,
    suppliers: BTreeMap<usize, ItemSupplier>,
    handlers: HashMap<usize, ClickHandler>,
    task: Option<TaskHandle>,
}

impl MenuUpdater {
    /// Refreshes every `refresh_interval` ticks, clamped to at least one.
    pub fn new(refresh_interval: u64) -> Self {
        Self {
            refresh_interval: refresh_interval.max(1),
            suppliers: BTreeMap::new(),
            handlers: HashMap::new(),
            task: None,
        }
    }

    /// Uses the configured default interval.
    pub fn for_context(context: &MenuContext) -> Self {
        Self::new(context.config().updater.refresh_interval)
    }

    pub fn refresh_interval(mut self, ticks: u64) -> Self {
        self.refresh_interval = ticks.max(1);
        self
    }

    pub fn update_item<F>(self, slot: usize, supplier: F) -> Self
    where
        F: Fn() -> ItemStack + Send + Sync + 'static,
    {
        self.update_item_handler(slot, Arc::new(supplier), None)
    }

    pub fn update_item_handler(
        mut self,
        slot: usize,
        supplier: ItemSupplier,
        handler: Option<ClickHandler>,
    ) -> Self {
        self.suppliers.insert(slot, supplier);
        match handler {
            Some(handler) => self.handlers.insert(slot, handler),
            None => self.handlers.remove(&slot),
        };
        self
    }

    /// Same supplier for every slot of `from..=to`.
    pub fn update_items(
        self,
        from: usize,
        to: usize,
        supplier: ItemSupplier,
        handler: Option<ClickHandler>,
    ) -> Self {
        (from..=to).fold(self, |updater, slot| {
            updater.update_item_handler(slot, supplier.clone(), handler.clone())
        })
    }

    /// Put every supplied item on `holder` now, then refresh them on the main
    /// thread until stopped. A previous run is stopped first.
    ///
    /// Must be called from the main thread, outside of the hooks of `holder`.
    pub fn start_updating(
        &mut self,
        context: &Arc<MenuContext>,
        holder: &SharedMenu,
    ) -> Result<(), MenuError> {
        self.stop_updating();

        {
            let mut guard = holder.lock();
            let menu = guard.menu_mut();
            for (&slot, supplier) in &self.suppliers {
                menu.put_item(slot, supplier(), self.handlers.get(&slot).cloned())?;
            }
        }
        context.sync(holder);

        let suppliers: Vec<(usize, ItemSupplier)> = self
            .suppliers
            .iter()
            .map(|(&slot, supplier)| (slot, supplier.clone()))
            .collect();
        let refresh_context = context.clone();
        let holder = holder.clone();
        let task = context.main_thread().run_task_timer(
            self.refresh_interval,
            self.refresh_interval,
            Arc::new(move || {
                {
                    let mut guard = holder.lock();
                    let menu = guard.menu_mut();
                    for (slot, supplier) in &suppliers {
                        if let Err(err) = menu.refresh_item(*slot, supplier()) {
                            log::warn!("Stopped refreshing an item: {err}");
                        }
                    }
                }
                refresh_context.sync(&holder);
            }),
        );
        self.task = Some(task);
        Ok(())
    }

    pub fn stop_updating(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
    }

    pub fn is_updating(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_cancelled())
    }
}

impl Drop for MenuUpdater {
    fn drop(&mut self) {
        self.stop_updating();
    }
}

#[cfg(test)]
mod test {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicU8, Ordering},
        },
        time::Duration,
    };

    use fastmenu_config::{MenuConfiguration, SchedulerConfig};
    use fastmenu_util::Identifier;

    use super::MenuUpdater;
    use crate::{
        MenuError,
        item::ItemStack,
        menu::{Menu, click_handler, shared},
        server::{MenuContext, scheduler::TickScheduler},
        test_util::TestViewer,
    };

    fn context() -> Arc<MenuContext> {
        let scheduler = TickScheduler::start(&SchedulerConfig { tps: 1000.0 });
        MenuContext::new(scheduler, MenuConfiguration::default())
    }

    #[tokio::test]
    async fn test_items_are_refreshed() {
        let context = context();
        let menu = shared(Menu::new(9).unwrap());
        let viewer = TestViewer::new("Steve");
        context.open(&menu, viewer.clone());

        let ticks = Arc::new(AtomicU8::new(1));
        let counter = ticks.clone();
        let mut updater = MenuUpdater::for_context(&context)
            .refresh_interval(2)
            .update_item(4, move || {
                ItemStack::with_count(
                    Identifier::vanilla("clock"),
                    counter.fetch_add(1, Ordering::SeqCst),
                )
            })
            .update_items(
                0,
                1,
                Arc::new(|| ItemStack::vanilla("glass_pane")),
                Some(click_handler(|_, _| {})),
            );

        updater.start_updating(&context, &menu).unwrap();
        assert!(updater.is_updating());
        assert_eq!(menu.lock().menu().item(4).unwrap().count, 1);
        assert!(menu.lock().menu().has_handler(1));

        tokio::time::sleep(Duration::from_millis(50)).await;
        updater.stop_updating();
        assert!(!updater.is_updating());

        let count = menu.lock().menu().item(4).unwrap().count;
        assert!(count > 1, "item was refreshed {} times", count - 1);
        // Refreshing keeps the handlers
        assert!(menu.lock().menu().has_handler(0));
        assert!(
            viewer
                .updates
                .lock()
                .iter()
                .any(|(slot, item)| *slot == 4 && item.as_ref().is_some_and(|item| item.count > 1))
        );
    }

    #[tokio::test]
    async fn test_invalid_slot_fails_to_start() {
        let context = context();
        let menu = shared(Menu::new(9).unwrap());
        let mut updater = MenuUpdater::new(10).update_item(20, || ItemStack::vanilla("stone"));

        assert_eq!(
            updater.start_updating(&context, &menu),
            Err(MenuError::InvalidSlot { slot: 20, size: 9 })
        );
        assert!(!updater.is_updating());
    }
}
