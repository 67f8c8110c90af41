#![deny(clippy::all)]
// use log crate
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

//! Chest menus for plugins: build a [`Menu`], hand it to a [`MenuContext`]
//! and forward the host's click and close events to the context.

pub mod error;
pub mod event;
pub mod item;
pub mod logging;
pub mod menu;
pub mod server;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_util;

pub use error::MenuError;
pub use event::{Cancellable, ClickType, CloseReason, MenuClickEvent, MenuCloseEvent, MenuOpenEvent};
pub use item::{ItemBuilder, ItemStack};
pub use menu::{
    Menu, MenuHolder, MenuType, SharedMenu,
    async_menu::{AsyncMenu, OpenWhenReady},
    paginated::PaginatedMenu,
    scheme::MenuScheme,
    updater::MenuUpdater,
};
pub use server::{
    MenuContext,
    scheduler::{MainThread, TaskHandle, TickScheduler},
};
pub use viewer::Viewer;

pub use fastmenu_config::MenuConfiguration;
pub use fastmenu_util::{Identifier, TextComponent};
