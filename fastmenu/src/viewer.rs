use uuid::Uuid;

use crate::{item::ItemStack, menu::Menu};

/// A player as seen by the menu library. The host implements this on top of
/// its own player type; every method is only called from the main thread.
pub trait Viewer: Send + Sync {
    fn uuid(&self) -> Uuid;

    fn name(&self) -> &str;

    /// Show `menu` to the player, replacing whatever screen they have open.
    fn open_menu(&self, menu: &Menu);

    /// Push a single changed slot of the menu the player is looking at.
    fn update_slot(&self, slot: usize, item: Option<&ItemStack>);

    fn close_menu(&self);
}
