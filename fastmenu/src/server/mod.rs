use std::{collections::HashMap, sync::Arc};

use fastmenu_config::MenuConfiguration;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use uuid::Uuid;

use crate::{
    event::{Cancellable, CloseReason, MenuClickEvent, MenuCloseEvent, MenuOpenEvent},
    item::ItemStack,
    menu::{MenuHolder, SharedMenu},
    viewer::Viewer,
};

pub mod scheduler;

use scheduler::MainThread;

struct OpenMenu {
    menu: SharedMenu,
    viewer: Arc<dyn Viewer>,
}

fn same_menu(a: &SharedMenu, b: &SharedMenu) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

/// Owns the main thread dispatcher and tracks which menu every viewer is
/// looking at. The host forwards its inventory events to the `handle_*`
/// methods.
///
/// Unless noted otherwise, methods must be called from the main thread. Menu
/// handlers may call [`open`](Self::open), [`close`](Self::close) and
/// [`handle_close`](Self::handle_close); the other methods must not be called
/// while the lock of the [`SharedMenu`] they touch is held.
pub struct MenuContext {
    main_thread: Arc<dyn MainThread>,
    config: MenuConfiguration,
    runtime: Handle,
    open_menus: Mutex<HashMap<Uuid, OpenMenu>>,
}

impl MenuContext {
    /// Must be called from within a tokio runtime, async items are loaded on it.
    pub fn new(main_thread: Arc<dyn MainThread>, config: MenuConfiguration) -> Arc<Self> {
        Self::with_runtime(main_thread, config, Handle::current())
    }

    pub fn with_runtime(
        main_thread: Arc<dyn MainThread>,
        config: MenuConfiguration,
        runtime: Handle,
    ) -> Arc<Self> {
        Arc::new(Self {
            main_thread,
            config,
            runtime,
            open_menus: Mutex::new(HashMap::new()),
        })
    }

    pub fn main_thread(&self) -> &Arc<dyn MainThread> {
        &self.main_thread
    }

    pub fn config(&self) -> &MenuConfiguration {
        &self.config
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Show `holder` to `viewer`, closing the menu they had open before.
    /// Returns `false` when an open handler cancelled the event.
    ///
    /// Called from one of the handlers of `holder` itself, the open happens on
    /// the next main thread task and `true` is returned.
    pub fn open(self: &Arc<Self>, holder: &SharedMenu, viewer: Arc<dyn Viewer>) -> bool {
        if holder.is_locked() {
            log::debug!("Menu is busy, opening it for {} on the next task", viewer.name());
            let context = self.clone();
            let holder = holder.clone();
            self.main_thread.execute(Box::new(move || {
                context.open_now(&holder, viewer);
            }));
            return true;
        }
        self.open_now(holder, viewer)
    }

    fn open_now(&self, holder: &SharedMenu, viewer: Arc<dyn Viewer>) -> bool {
        let uuid = viewer.uuid();
        let previous = self.open_menus.lock().remove(&uuid);
        if let Some(previous) = previous {
            let event = MenuCloseEvent::new(viewer.clone(), CloseReason::OpenNew);
            self.with_holder(&previous.menu, move |menu| {
                menu.handle_close(&event);
            });
        }

        let mut event = MenuOpenEvent::new(viewer.clone());
        {
            let mut menu = holder.lock();
            menu.prepare_open();
            menu.handle_open(&mut event);
        }
        if event.is_cancelled() {
            log::debug!("Opening a menu for {} was cancelled", viewer.name());
            return false;
        }

        // Viewers already looking at this menu only need the changed slots
        self.sync(holder);
        self.open_menus.lock().insert(
            uuid,
            OpenMenu {
                menu: holder.clone(),
                viewer: viewer.clone(),
            },
        );
        viewer.open_menu(holder.lock().menu());
        true
    }

    /// Close the menu of `viewer` from the plugin side.
    pub fn close(&self, viewer: &Arc<dyn Viewer>) {
        let open = self.open_menus.lock().remove(&viewer.uuid());
        if let Some(open) = open {
            let event = MenuCloseEvent::new(open.viewer.clone(), CloseReason::Plugin);
            self.with_holder(&open.menu, move |menu| {
                menu.handle_close(&event);
            });
            viewer.close_menu();
        }
    }

    /// Click listener entry point. Clicks of viewers without a menu and clicks
    /// outside of the window are ignored.
    ///
    /// Handlers may open other menus or close the current one through this
    /// context. Close handlers of the clicked menu then run on the next main
    /// thread task.
    pub fn handle_click(&self, event: &mut MenuClickEvent) {
        let Some(holder) = self.open_menu_of(event.viewer.uuid()) else {
            return;
        };
        if event.slot().is_none() {
            return;
        }

        let was_cancelled = event.is_cancelled();
        if self.config.clicks.cancel_by_default {
            event.set_cancelled(true);
        }
        holder.lock().handle_click(event);
        // Never un-cancel a click another listener cancelled
        if was_cancelled {
            event.set_cancelled(true);
        }

        self.sync(&holder);
    }

    /// Close listener entry point, for a viewer closing their screen. When the
    /// close filter keeps the viewer, the menu is reopened on the next main
    /// thread task.
    pub fn handle_close(self: &Arc<Self>, viewer: &Arc<dyn Viewer>) {
        let Some(open) = self.open_menus.lock().remove(&viewer.uuid()) else {
            return;
        };
        let event = MenuCloseEvent::new(viewer.clone(), CloseReason::Player);
        let context = self.clone();
        let menu = open.menu.clone();
        let viewer = viewer.clone();
        self.with_holder(&open.menu, move |holder| {
            if holder.handle_close(&event) {
                log::debug!("Keeping {} in their menu", viewer.name());
                let main_thread = context.main_thread.clone();
                main_thread.execute(Box::new(move || {
                    context.open(&menu, viewer);
                }));
            }
        });
    }

    /// Quit listener entry point.
    pub fn handle_quit(&self, viewer: &Arc<dyn Viewer>) {
        let open = self.open_menus.lock().remove(&viewer.uuid());
        if let Some(open) = open {
            let event = MenuCloseEvent::new(viewer.clone(), CloseReason::Disconnect);
            self.with_holder(&open.menu, move |menu| {
                menu.handle_close(&event);
            });
        }
    }

    /// Close every menu opened through this context.
    pub fn close_all(&self) {
        let open: Vec<OpenMenu> = self.open_menus.lock().drain().map(|(_, open)| open).collect();
        for open in open {
            let event = MenuCloseEvent::new(open.viewer.clone(), CloseReason::Plugin);
            self.with_holder(&open.menu, move |menu| {
                menu.handle_close(&event);
            });
            open.viewer.close_menu();
        }
    }

    /// Run `f` on `holder` now, or as the next main thread task when its lock
    /// is taken. That is the case while one of its own handlers runs.
    fn with_holder<F>(&self, holder: &SharedMenu, f: F)
    where
        F: FnOnce(&mut dyn MenuHolder) + Send + 'static,
    {
        if let Some(mut guard) = holder.try_lock() {
            f(&mut *guard);
            return;
        }
        let holder = holder.clone();
        self.main_thread.execute(Box::new(move || f(&mut *holder.lock())));
    }

    /// Plugin disable listener entry point.
    pub fn handle_plugin_disable(&self) {
        let count = self.open_menus.lock().len();
        if count > 0 {
            log::info!("Closing {count} open menus");
        }
        self.close_all();
    }

    /// Push the slots changed since the last sync to every viewer of `holder`.
    pub fn sync(&self, holder: &SharedMenu) {
        let changes: Vec<(usize, Option<ItemStack>)> = {
            let mut guard = holder.lock();
            let menu = guard.menu_mut();
            menu.take_dirty()
                .into_iter()
                .map(|slot| (slot, menu.item(slot).cloned()))
                .collect()
        };
        if changes.is_empty() {
            return;
        }
        for viewer in self.viewers_of(holder) {
            for (slot, item) in &changes {
                viewer.update_slot(*slot, item.as_ref());
            }
        }
    }

    pub fn viewers_of(&self, holder: &SharedMenu) -> Vec<Arc<dyn Viewer>> {
        self.open_menus
            .lock()
            .values()
            .filter(|open| same_menu(&open.menu, holder))
            .map(|open| open.viewer.clone())
            .collect()
    }

    pub fn open_menu_of(&self, viewer: Uuid) -> Option<SharedMenu> {
        self.open_menus
            .lock()
            .get(&viewer)
            .map(|open| open.menu.clone())
    }

    pub fn open_count(&self) -> usize {
        self.open_menus.lock().len()
    }
}
