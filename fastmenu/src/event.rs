//! Events the host forwards to a [`MenuContext`](crate::MenuContext).

use std::sync::Arc;

use crate::{MenuError, viewer::Viewer};

const SLOT_INDEX_OUTSIDE: i16 = -999;

const BUTTON_CLICK_LEFT: i8 = 0;
const BUTTON_CLICK_RIGHT: i8 = 1;
const BUTTON_CLICK_MIDDLE: i8 = 2;

const KEY_CLICK_OFFHAND: i8 = 40;
const KEY_CLICK_HOTBAR_START: i8 = 0;
const KEY_CLICK_HOTBAR_END: i8 = 9;

pub trait Cancellable {
    fn is_cancelled(&self) -> bool;
    fn set_cancelled(&mut self, cancelled: bool);
}

/// The slot action mode of a container click packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction {
    Pickup,
    QuickMove,
    Swap,
    Clone,
    Throw,
    QuickCraft,
    PickupAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickType {
    Left,
    Right,
    ShiftLeft,
    ShiftRight,
    Middle,
    /// A hotbar number key, `0..9`.
    NumberKey(u8),
    SwapOffhand,
    Drop,
    ControlDrop,
    DoubleClick,
    /// Creative mode middle click.
    Creative,
    Drag,
}

impl ClickType {
    pub fn from_action(action: SlotAction, button: i8) -> Result<Self, MenuError> {
        let invalid = |action| MenuError::InvalidClick { action, button };
        Ok(match action {
            SlotAction::Pickup => match button {
                BUTTON_CLICK_LEFT => Self::Left,
                BUTTON_CLICK_RIGHT => Self::Right,
                _ => return Err(invalid("pickup")),
            },
            SlotAction::QuickMove => match button {
                BUTTON_CLICK_LEFT => Self::ShiftLeft,
                BUTTON_CLICK_RIGHT => Self::ShiftRight,
                _ => return Err(invalid("quick move")),
            },
            SlotAction::Swap => match button {
                KEY_CLICK_HOTBAR_START..KEY_CLICK_HOTBAR_END => Self::NumberKey(button as u8),
                KEY_CLICK_OFFHAND => Self::SwapOffhand,
                _ => return Err(invalid("swap")),
            },
            SlotAction::Clone => match button {
                BUTTON_CLICK_MIDDLE => Self::Creative,
                _ => return Err(invalid("clone")),
            },
            SlotAction::Throw => match button {
                0 => Self::Drop,
                1 => Self::ControlDrop,
                _ => return Err(invalid("throw")),
            },
            SlotAction::QuickCraft => Self::Drag,
            SlotAction::PickupAll => Self::DoubleClick,
        })
    }

    pub fn is_left_click(self) -> bool {
        matches!(self, Self::Left | Self::ShiftLeft | Self::DoubleClick)
    }

    pub fn is_right_click(self) -> bool {
        matches!(self, Self::Right | Self::ShiftRight)
    }

    pub fn is_shift_click(self) -> bool {
        matches!(self, Self::ShiftLeft | Self::ShiftRight)
    }
}

/// A click inside the screen of a viewer that has a menu open.
#[derive(Clone)]
pub struct MenuClickEvent {
    pub viewer: Arc<dyn Viewer>,
    /// Raw slot index of the whole view: the menu slots first, then the
    /// viewer's own inventory. `-999` is a click outside of the window.
    pub raw_slot: i16,
    pub click: ClickType,
    cancelled: bool,
}

impl MenuClickEvent {
    pub fn new(viewer: Arc<dyn Viewer>, raw_slot: i16, click: ClickType) -> Self {
        Self {
            viewer,
            raw_slot,
            click,
            cancelled: false,
        }
    }

    /// Builds the event from the fields of a container click packet.
    pub fn from_packet(
        viewer: Arc<dyn Viewer>,
        raw_slot: i16,
        button: i8,
        action: SlotAction,
    ) -> Result<Self, MenuError> {
        Ok(Self::new(
            viewer,
            raw_slot,
            ClickType::from_action(action, button)?,
        ))
    }

    /// `None` when the click landed outside of the window.
    pub fn slot(&self) -> Option<usize> {
        if self.raw_slot == SLOT_INDEX_OUTSIDE {
            return None;
        }
        usize::try_from(self.raw_slot).ok()
    }

    /// Whether the click hit the menu itself rather than the viewer's inventory.
    pub fn clicked_top(&self, menu_size: usize) -> bool {
        self.slot().is_some_and(|slot| slot < menu_size)
    }

    pub fn hotbar_button(&self) -> Option<u8> {
        match self.click {
            ClickType::NumberKey(key) => Some(key),
            _ => None,
        }
    }

    pub fn is_left_click(&self) -> bool {
        self.click.is_left_click()
    }

    pub fn is_right_click(&self) -> bool {
        self.click.is_right_click()
    }

    pub fn is_shift_click(&self) -> bool {
        self.click.is_shift_click()
    }
}

impl Cancellable for MenuClickEvent {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

#[derive(Clone)]
pub struct MenuOpenEvent {
    pub viewer: Arc<dyn Viewer>,
    cancelled: bool,
}

impl MenuOpenEvent {
    pub fn new(viewer: Arc<dyn Viewer>) -> Self {
        Self {
            viewer,
            cancelled: false,
        }
    }
}

impl Cancellable for MenuOpenEvent {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The viewer closed the screen.
    Player,
    /// Another menu was opened for the viewer.
    OpenNew,
    /// The viewer left the server.
    Disconnect,
    /// The owning plugin is being disabled.
    Plugin,
}

#[derive(Clone)]
pub struct MenuCloseEvent {
    pub viewer: Arc<dyn Viewer>,
    pub reason: CloseReason,
}

impl MenuCloseEvent {
    pub fn new(viewer: Arc<dyn Viewer>, reason: CloseReason) -> Self {
        Self { viewer, reason }
    }
}

#[cfg(test)]
mod test {
    use crate::{
        MenuError,
        event::{ClickType, MenuClickEvent, SlotAction},
        test_util::TestViewer,
    };

    #[test]
    fn test_click_from_packet() {
        let viewer = TestViewer::new("Alex");

        let event = MenuClickEvent::from_packet(viewer.clone(), 4, 1, SlotAction::QuickMove)
            .unwrap();
        assert_eq!(event.click, ClickType::ShiftRight);
        assert!(event.is_shift_click() && event.is_right_click());
        assert_eq!(event.slot(), Some(4));

        let key = MenuClickEvent::from_packet(viewer.clone(), 30, 3, SlotAction::Swap).unwrap();
        assert_eq!(key.hotbar_button(), Some(3));
        assert!(key.clicked_top(54));
        assert!(!key.clicked_top(27));

        let outside =
            MenuClickEvent::from_packet(viewer.clone(), -999, 0, SlotAction::Pickup).unwrap();
        assert_eq!(outside.slot(), None);

        assert_eq!(
            MenuClickEvent::from_packet(viewer, 0, 7, SlotAction::Pickup).err(),
            Some(MenuError::InvalidClick {
                action: "pickup",
                button: 7
            })
        );
    }
}
