use std::collections::BTreeMap;

use bitflags::bitflags;
use fastmenu_util::{Identifier, TextComponent};
use serde::{Deserialize, Serialize};

use crate::MenuError;

mod builder;

pub use builder::ItemBuilder;

pub const MAX_STACK_SIZE: u8 = 99;

/// A display item placed in a menu slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: Identifier,
    pub count: u8,
    pub meta: ItemMeta,
}

impl ItemStack {
    pub fn new(material: Identifier) -> Self {
        Self::with_count(material, 1)
    }

    /// The count is clamped to `1..=MAX_STACK_SIZE`.
    pub fn with_count(material: Identifier, count: u8) -> Self {
        let meta = ItemMeta::for_material(&material);
        Self {
            material,
            count: count.clamp(1, MAX_STACK_SIZE),
            meta,
        }
    }

    pub fn vanilla(path: &str) -> Self {
        Self::new(Identifier::vanilla(path))
    }

    /// Same material and meta, ignoring the count.
    pub fn is_similar(&self, other: &Self) -> bool {
        self.material == other.material && self.meta == other.meta
    }
}

bitflags! {
    /// Parts of the tooltip the client should not render.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ItemFlags: u16 {
        const HIDE_ENCHANTS = 1;
        const HIDE_ATTRIBUTES = 1 << 1;
        const HIDE_UNBREAKABLE = 1 << 2;
        const HIDE_DESTROYS = 1 << 3;
        const HIDE_PLACED_ON = 1 << 4;
        const HIDE_ADDITIONAL_TOOLTIP = 1 << 5;
        const HIDE_DYE = 1 << 6;
        const HIDE_ARMOR_TRIM = 1 << 7;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
    pub display_name: Option<TextComponent>,
    pub lore: Vec<TextComponent>,
    /// Enchantment id to level.
    pub enchantments: BTreeMap<Identifier, u16>,
    pub flags: ItemFlags,
    pub unbreakable: bool,
    pub specific: SpecificMeta,
}

/// Meta only some materials carry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum SpecificMeta {
    #[default]
    None,
    Banner(BannerMeta),
    LeatherArmor(LeatherArmorMeta),
    Skull(SkullMeta),
    Potion(PotionMeta),
}

impl ItemMeta {
    pub fn for_material(material: &Identifier) -> Self {
        let path = material.path.as_str();
        let specific = if !material.is_vanilla() {
            SpecificMeta::None
        } else if path.ends_with("_banner") {
            SpecificMeta::Banner(BannerMeta::default())
        } else if path.starts_with("leather_") || path == "wolf_armor" {
            SpecificMeta::LeatherArmor(LeatherArmorMeta::default())
        } else if path == "player_head" {
            SpecificMeta::Skull(SkullMeta::default())
        } else if matches!(
            path,
            "potion" | "splash_potion" | "lingering_potion" | "tipped_arrow"
        ) {
            SpecificMeta::Potion(PotionMeta::default())
        } else {
            SpecificMeta::None
        };

        Self {
            specific,
            ..Default::default()
        }
    }

    pub fn banner_mut(&mut self, material: &Identifier) -> Result<&mut BannerMeta, MenuError> {
        match &mut self.specific {
            SpecificMeta::Banner(meta) => Ok(meta),
            _ => Err(mismatch(material, "banner")),
        }
    }

    pub fn leather_armor_mut(
        &mut self,
        material: &Identifier,
    ) -> Result<&mut LeatherArmorMeta, MenuError> {
        match &mut self.specific {
            SpecificMeta::LeatherArmor(meta) => Ok(meta),
            _ => Err(mismatch(material, "leather armor")),
        }
    }

    pub fn skull_mut(&mut self, material: &Identifier) -> Result<&mut SkullMeta, MenuError> {
        match &mut self.specific {
            SpecificMeta::Skull(meta) => Ok(meta),
            _ => Err(mismatch(material, "skull")),
        }
    }

    pub fn potion_mut(&mut self, material: &Identifier) -> Result<&mut PotionMeta, MenuError> {
        match &mut self.specific {
            SpecificMeta::Potion(meta) => Ok(meta),
            _ => Err(mismatch(material, "potion")),
        }
    }
}

fn mismatch(material: &Identifier, expected: &'static str) -> MenuError {
    MenuError::MetaMismatch {
        material: material.to_string(),
        expected,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DyeColor {
    White,
    Orange,
    Magenta,
    LightBlue,
    Yellow,
    Lime,
    Pink,
    Gray,
    LightGray,
    Cyan,
    Purple,
    Blue,
    Brown,
    Green,
    Red,
    Black,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub color: DyeColor,
    /// Banner pattern id, e.g. `minecraft:stripe_top`.
    pub pattern: Identifier,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BannerMeta {
    pub base_color: Option<DyeColor>,
    pub patterns: Vec<Pattern>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LeatherArmorMeta {
    pub color: Option<Rgb>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkullMeta {
    pub owner: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotionEffect {
    /// Effect id, e.g. `minecraft:speed`.
    pub effect: Identifier,
    /// Duration in ticks.
    pub duration: i32,
    pub amplifier: u8,
    pub ambient: bool,
    pub show_particles: bool,
}

impl PotionEffect {
    pub fn new(effect: Identifier, duration: i32, amplifier: u8) -> Self {
        Self {
            effect,
            duration,
            amplifier,
            ambient: false,
            show_particles: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PotionMeta {
    pub custom_effects: Vec<PotionEffect>,
}

impl PotionMeta {
    /// Returns whether the effects changed. An existing effect of the same type
    /// is only replaced when `overwrite` is set.
    pub fn add_custom_effect(&mut self, effect: PotionEffect, overwrite: bool) -> bool {
        match self
            .custom_effects
            .iter_mut()
            .find(|existing| existing.effect == effect.effect)
        {
            Some(existing) if overwrite => {
                *existing = effect;
                true
            }
            Some(_) => false,
            None => {
                self.custom_effects.push(effect);
                true
            }
        }
    }

    pub fn has_custom_effect(&self, effect: &Identifier) -> bool {
        self.custom_effects.iter().any(|e| &e.effect == effect)
    }
}

#[cfg(test)]
mod test {
    use fastmenu_util::Identifier;

    use super::{ItemBuilder, ItemStack, PotionEffect, SpecificMeta, MAX_STACK_SIZE};

    #[test]
    fn test_specific_meta_follows_material() {
        assert!(matches!(
            ItemStack::vanilla("red_banner").meta.specific,
            SpecificMeta::Banner(_)
        ));
        assert!(matches!(
            ItemStack::vanilla("leather_helmet").meta.specific,
            SpecificMeta::LeatherArmor(_)
        ));
        assert!(matches!(
            ItemStack::vanilla("player_head").meta.specific,
            SpecificMeta::Skull(_)
        ));
        assert!(matches!(
            ItemStack::vanilla("splash_potion").meta.specific,
            SpecificMeta::Potion(_)
        ));
        assert_eq!(ItemStack::vanilla("stone").meta.specific, SpecificMeta::None);
    }

    #[test]
    fn test_count_is_clamped() {
        assert_eq!(ItemStack::with_count(Identifier::vanilla("stone"), 0).count, 1);
        assert_eq!(
            ItemStack::with_count(Identifier::vanilla("stone"), 200).count,
            MAX_STACK_SIZE
        );
    }

    #[test]
    fn test_potion_overwrite() {
        let mut stack = ItemStack::vanilla("potion");
        let material = stack.material.clone();
        let potion = stack.meta.potion_mut(&material).unwrap();

        let speed = Identifier::vanilla("speed");
        assert!(potion.add_custom_effect(PotionEffect::new(speed.clone(), 200, 0), false));
        assert!(!potion.add_custom_effect(PotionEffect::new(speed.clone(), 400, 1), false));
        assert_eq!(potion.custom_effects[0].duration, 200);

        assert!(potion.add_custom_effect(PotionEffect::new(speed.clone(), 400, 1), true));
        assert_eq!(potion.custom_effects.len(), 1);
        assert_eq!(potion.custom_effects[0].amplifier, 1);
        assert!(potion.has_custom_effect(&speed));
    }

    #[test]
    fn test_item_json_shape() {
        let item = ItemBuilder::vanilla("red_banner").name("Flag").build();
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["material"], "minecraft:red_banner");
        assert_eq!(json["meta"]["display_name"]["text"], "Flag");
        assert!(json["meta"]["specific"]["Banner"].is_object());
    }
}
