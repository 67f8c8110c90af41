use fastmenu_util::{Identifier, TextComponent};
use log::warn;

use super::{DyeColor, ItemFlags, ItemMeta, ItemStack, Pattern, PotionEffect, Rgb, SpecificMeta};
use crate::MenuError;

/// Fluent construction of display items.
///
/// Setters for material specific meta (banners, leather armor, skulls, potions)
/// are ignored with a warning when the material doesn't carry that meta.
#[derive(Clone, Debug)]
pub struct ItemBuilder {
    item: ItemStack,
}

impl ItemBuilder {
    pub fn new(material: Identifier) -> Self {
        Self::from_stack(ItemStack::new(material))
    }

    pub fn vanilla(path: &str) -> Self {
        Self::new(Identifier::vanilla(path))
    }

    pub fn with_amount(material: Identifier, amount: u8) -> Self {
        Self::from_stack(ItemStack::with_count(material, amount))
    }

    pub fn from_stack(item: ItemStack) -> Self {
        Self { item }
    }

    pub fn meta(&self) -> &ItemMeta {
        &self.item.meta
    }

    pub fn replace_meta(mut self, meta: ItemMeta) -> Self {
        self.item.meta = meta;
        self
    }

    pub fn amount(mut self, amount: u8) -> Self {
        self.item.count = amount.clamp(1, super::MAX_STACK_SIZE);
        self
    }

    // Name

    pub fn has_name(&self) -> bool {
        self.item.meta.display_name.is_some()
    }

    pub fn get_name(&self) -> Option<&TextComponent> {
        self.item.meta.display_name.as_ref()
    }

    pub fn name(mut self, name: impl Into<TextComponent>) -> Self {
        self.item.meta.display_name = Some(name.into());
        self
    }

    // Lore

    pub fn has_lore(&self) -> bool {
        !self.item.meta.lore.is_empty()
    }

    pub fn get_lore(&self) -> &[TextComponent] {
        &self.item.meta.lore
    }

    pub fn lore<I, T>(mut self, lore: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TextComponent>,
    {
        self.item.meta.lore = lore.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_lore(mut self, line: impl Into<TextComponent>) -> Self {
        self.item.meta.lore.push(line.into());
        self
    }

    // Enchants

    pub fn has_enchants(&self) -> bool {
        !self.item.meta.enchantments.is_empty()
    }

    pub fn has_enchant(&self, enchantment: &Identifier) -> bool {
        self.item.meta.enchantments.contains_key(enchantment)
    }

    pub fn get_enchant_level(&self, enchantment: &Identifier) -> Option<u16> {
        self.item.meta.enchantments.get(enchantment).copied()
    }

    /// Levels above the vanilla maximum are allowed.
    pub fn enchant(mut self, enchantment: Identifier, level: u16) -> Self {
        self.item.meta.enchantments.insert(enchantment, level);
        self
    }

    pub fn remove_enchant(mut self, enchantment: &Identifier) -> Self {
        self.item.meta.enchantments.remove(enchantment);
        self
    }

    // Flags

    pub fn has_flag(&self, flag: ItemFlags) -> bool {
        self.item.meta.flags.contains(flag)
    }

    pub fn get_flags(&self) -> ItemFlags {
        self.item.meta.flags
    }

    pub fn flags(mut self, flags: ItemFlags) -> Self {
        self.item.meta.flags.insert(flags);
        self
    }

    pub fn all_flags(self) -> Self {
        self.flags(ItemFlags::all())
    }

    pub fn remove_flags(mut self, flags: ItemFlags) -> Self {
        self.item.meta.flags.remove(flags);
        self
    }

    // Unbreakable

    pub fn is_unbreakable(&self) -> bool {
        self.item.meta.unbreakable
    }

    pub fn unbreakable(mut self, unbreakable: bool) -> Self {
        self.item.meta.unbreakable = unbreakable;
        self
    }

    // Banners

    pub fn get_banner_base_color(&self) -> Option<DyeColor> {
        match &self.item.meta.specific {
            SpecificMeta::Banner(banner) => banner.base_color,
            _ => None,
        }
    }

    pub fn get_banner_patterns(&self) -> &[Pattern] {
        match &self.item.meta.specific {
            SpecificMeta::Banner(banner) => &banner.patterns,
            _ => &[],
        }
    }

    pub fn banner_base_color(self, color: DyeColor) -> Self {
        self.edit(|meta, material| {
            meta.banner_mut(material)?.base_color = Some(color);
            Ok(())
        })
    }

    pub fn banner_patterns(self, patterns: Vec<Pattern>) -> Self {
        self.edit(|meta, material| {
            meta.banner_mut(material)?.patterns = patterns;
            Ok(())
        })
    }

    /// Replaces the pattern at `index`, or appends it when `index` is past the end.
    pub fn banner_pattern(self, index: usize, pattern: Pattern) -> Self {
        self.edit(|meta, material| {
            let banner = meta.banner_mut(material)?;
            match banner.patterns.get_mut(index) {
                Some(existing) => *existing = pattern,
                None => banner.patterns.push(pattern),
            }
            Ok(())
        })
    }

    pub fn add_banner_pattern(self, pattern: Pattern) -> Self {
        self.edit(|meta, material| {
            meta.banner_mut(material)?.patterns.push(pattern);
            Ok(())
        })
    }

    pub fn remove_banner_pattern(self, index: usize) -> Self {
        self.edit(|meta, material| {
            let banner = meta.banner_mut(material)?;
            if index < banner.patterns.len() {
                banner.patterns.remove(index);
            }
            Ok(())
        })
    }

    // Leather armors

    pub fn get_leather_armor_color(&self) -> Option<Rgb> {
        match &self.item.meta.specific {
            SpecificMeta::LeatherArmor(armor) => armor.color,
            _ => None,
        }
    }

    pub fn leather_armor_color(self, color: Rgb) -> Self {
        self.edit(|meta, material| {
            meta.leather_armor_mut(material)?.color = Some(color);
            Ok(())
        })
    }

    // Skull

    pub fn has_skull_owner(&self) -> bool {
        self.get_skull_owner().is_some()
    }

    pub fn get_skull_owner(&self) -> Option<&str> {
        match &self.item.meta.specific {
            SpecificMeta::Skull(skull) => skull.owner.as_deref(),
            _ => None,
        }
    }

    pub fn skull_owner(self, owner: impl Into<String>) -> Self {
        let owner = owner.into();
        self.edit(|meta, material| {
            meta.skull_mut(material)?.owner = Some(owner);
            Ok(())
        })
    }

    // Potion

    pub fn has_potion_effect(&self, effect: &Identifier) -> bool {
        match &self.item.meta.specific {
            SpecificMeta::Potion(potion) => potion.has_custom_effect(effect),
            _ => false,
        }
    }

    pub fn has_potion_effects(&self) -> bool {
        !self.get_potion_effects().is_empty()
    }

    pub fn get_potion_effects(&self) -> &[PotionEffect] {
        match &self.item.meta.specific {
            SpecificMeta::Potion(potion) => &potion.custom_effects,
            _ => &[],
        }
    }

    pub fn add_potion_effect(self, effect: PotionEffect, overwrite: bool) -> Self {
        self.edit(|meta, material| {
            meta.potion_mut(material)?
                .add_custom_effect(effect, overwrite);
            Ok(())
        })
    }

    pub fn build(self) -> ItemStack {
        self.item
    }

    fn edit<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut ItemMeta, &Identifier) -> Result<(), MenuError>,
    {
        if let Err(err) = f(&mut self.item.meta, &self.item.material) {
            warn!("Ignoring item meta change: {err}");
        }
        self
    }
}

impl From<ItemBuilder> for ItemStack {
    fn from(builder: ItemBuilder) -> Self {
        builder.build()
    }
}
