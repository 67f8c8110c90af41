//! Items computed off the main thread, and opening a menu only once they are
//! all in place.

use std::{collections::HashMap, fmt::Display, future::Future, sync::Arc};

use futures::{
    FutureExt,
    future::{BoxFuture, Shared, join_all},
};
use log::{error, warn};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::{ClickHandler, Menu, SharedMenu, click_handler};
use crate::{
    MenuError,
    event::MenuClickEvent,
    item::ItemStack,
    server::{MenuContext, scheduler::run_on_main},
    viewer::Viewer,
};

type PendingUnit = Shared<BoxFuture<'static, ()>>;

/// One item computation. Resolves once the item has been applied on the main
/// thread, or the computation failed.
#[derive(Clone)]
pub struct PendingItem {
    id: Uuid,
    done: PendingUnit,
}

impl PendingItem {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn wait(self) {
        self.done.await;
    }
}

pub enum OpenWhenReady {
    /// Nothing was pending, the menu is open already.
    Opened,
    /// The menu opens once the items pending at call time are done.
    Deferred(JoinHandle<()>),
}

/// Loads slot items of a shared menu in the background.
///
/// Submissions may come from any thread. Items are always applied on the main
/// thread, and the viewers of the menu are synced right after.
#[derive(Clone)]
pub struct AsyncMenu {
    holder: SharedMenu,
    size: usize,
    context: Arc<MenuContext>,
    pending: Arc<Mutex<HashMap<Uuid, PendingUnit>>>,
}

impl AsyncMenu {
    /// Locks `holder` once to read its size.
    pub fn new(context: Arc<MenuContext>, holder: SharedMenu) -> Self {
        let size = holder.lock().menu().size();
        Self {
            holder,
            size,
            context,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn holder(&self) -> &SharedMenu {
        &self.holder
    }

    /// Computations that have not completed yet.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Run `producer` on the blocking pool and put its item on `slot`.
    /// A failing or panicking producer leaves the slot as it is.
    pub fn set_item_async<F, E>(&self, slot: usize, producer: F) -> Result<PendingItem, MenuError>
    where
        F: FnOnce() -> Result<ItemStack, E> + Send + 'static,
        E: Display + Send + 'static,
    {
        self.set_items_async([slot], producer, None)
    }

    pub fn set_item_async_with<F, E, H>(
        &self,
        slot: usize,
        producer: F,
        handler: H,
    ) -> Result<PendingItem, MenuError>
    where
        F: FnOnce() -> Result<ItemStack, E> + Send + 'static,
        E: Display + Send + 'static,
        H: Fn(&mut Menu, &mut MenuClickEvent) + Send + Sync + 'static,
    {
        self.set_items_async([slot], producer, Some(click_handler(handler)))
    }

    /// Run `producer` once and put its item on every slot of `slots`.
    pub fn set_items_async<I, F, E>(
        &self,
        slots: I,
        producer: F,
        handler: Option<ClickHandler>,
    ) -> Result<PendingItem, MenuError>
    where
        I: IntoIterator<Item = usize>,
        F: FnOnce() -> Result<ItemStack, E> + Send + 'static,
        E: Display + Send + 'static,
    {
        let slots = self.check_slots(slots)?;
        Ok(self.submit(move || tokio::task::spawn_blocking(producer), slots, handler))
    }

    /// Put the output of `future` on `slot`. The future runs as its own task.
    pub fn set_item_future<Fut, E>(
        &self,
        slot: usize,
        future: Fut,
        handler: Option<ClickHandler>,
    ) -> Result<PendingItem, MenuError>
    where
        Fut: Future<Output = Result<ItemStack, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let slots = self.check_slots([slot])?;
        Ok(self.submit(move || tokio::spawn(future), slots, handler))
    }

    fn check_slots<I>(&self, slots: I) -> Result<Vec<usize>, MenuError>
    where
        I: IntoIterator<Item = usize>,
    {
        slots
            .into_iter()
            .map(|slot| {
                if slot < self.size {
                    Ok(slot)
                } else {
                    Err(MenuError::InvalidSlot {
                        slot,
                        size: self.size,
                    })
                }
            })
            .collect()
    }

    fn submit<S, E>(&self, start: S, slots: Vec<usize>, handler: Option<ClickHandler>) -> PendingItem
    where
        S: FnOnce() -> JoinHandle<Result<ItemStack, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let id = Uuid::new_v4();
        let context = self.context.clone();
        let holder = self.holder.clone();
        let pending = self.pending.clone();

        // The task removes its own entry, so it must not be able to finish
        // before the entry exists.
        let mut units = self.pending.lock();
        let task = self.context.runtime().spawn(async move {
            let item = match start().await {
                Ok(Ok(item)) => Some(item),
                Ok(Err(err)) => {
                    error!("Failed to compute the item for slots {slots:?}: {err}");
                    None
                }
                Err(err) => {
                    error!("Item computation for slots {slots:?} did not finish: {err}");
                    None
                }
            };
            if let Some(item) = item {
                let main = context.main_thread().clone();
                let applied = run_on_main(main.as_ref(), move || {
                    apply(&holder, &slots, &item, handler.as_ref());
                    context.sync(&holder);
                })
                .await;
                if let Err(err) = applied {
                    warn!("Dropping a computed item: {err}");
                }
            }
            pending.lock().remove(&id);
        });
        let done = async move {
            // A join error only happens on runtime shutdown
            let _ = task.await;
        }
        .boxed()
        .shared();
        units.insert(id, done.clone());

        PendingItem { id, done }
    }

    /// Open the menu for `viewer` once every item pending right now is done.
    /// Items submitted after this call don't delay the open.
    ///
    /// Must be called from the main thread: with nothing pending the menu is
    /// opened before returning.
    pub fn open_when_ready(&self, viewer: Arc<dyn Viewer>) -> OpenWhenReady {
        let snapshot: Vec<PendingUnit> = self.pending.lock().values().cloned().collect();
        if snapshot.is_empty() {
            self.context.open(&self.holder, viewer);
            return OpenWhenReady::Opened;
        }

        let context = self.context.clone();
        let holder = self.holder.clone();
        let handle = self.context.runtime().spawn(async move {
            join_all(snapshot).await;
            let main = context.main_thread().clone();
            let opened = run_on_main(main.as_ref(), move || {
                context.open(&holder, viewer);
            })
            .await;
            if let Err(err) = opened {
                warn!("Could not open a menu: {err}");
            }
        });
        OpenWhenReady::Deferred(handle)
    }
}

fn apply(holder: &SharedMenu, slots: &[usize], item: &ItemStack, handler: Option<&ClickHandler>) {
    let mut guard = holder.lock();
    let menu = guard.menu_mut();
    for &slot in slots {
        if let Err(err) = menu.put_item(slot, item.clone(), handler.cloned()) {
            warn!("Dropping a computed item: {err}");
        }
    }
}
