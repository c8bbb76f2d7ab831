//! Displayable icon descriptors for waypoint menus.
//!
//! [`IconBuilder`] is a chainable builder producing an [`Icon`]: material,
//! stack size, display name, lore, optional leather tint and enchantments.
//! It has no state beyond the icon under construction.

use waypoints_types::Material;
use waypoints_types::formatting::{format_block_position, format_distance};

use crate::config::ConfigResolver;
use crate::translation::{Translations, fill_placeholders};
use crate::waypoint::{Location, Waypoint};

/// Enchantments that may be attached to an icon (typically for glint)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Enchantment {
    Unbreaking,
    Mending,
    Luck,
}

/// Item flags hiding parts of the tooltip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconFlag {
    HideEnchants,
    HideAttributes,
    HideDye,
}

/// Built icon
#[derive(Debug, Clone, PartialEq)]
pub struct Icon {
    pub material: Material,
    pub amount: u8,
    pub name: Option<String>,
    pub lore: Vec<String>,
    /// Leather tint as RGB
    pub color: Option<[u8; 3]>,
    pub enchantments: Vec<(Enchantment, u8)>,
    pub flags: Vec<IconFlag>,
}

impl Icon {
    pub fn is_glowing(&self) -> bool {
        !self.enchantments.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct IconBuilder {
    icon: Icon,
}

impl IconBuilder {
    pub fn new(material: Material) -> Self {
        Self {
            icon: Icon {
                material,
                amount: 1,
                name: None,
                lore: Vec::new(),
                color: None,
                enchantments: Vec::new(),
                flags: Vec::new(),
            },
        }
    }

    pub fn material(mut self, material: Material) -> Self {
        self.icon.material = material;
        self
    }

    /// Stack size, clamped to 1..=64
    pub fn amount(mut self, amount: u8) -> Self {
        self.icon.amount = amount.clamp(1, 64);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.icon.name = Some(name.into());
        self
    }

    /// Append a lore line
    pub fn lore(mut self, line: impl Into<String>) -> Self {
        self.icon.lore.push(line.into());
        self
    }

    /// Replace all lore lines
    pub fn lores<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.icon.lore = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Set an enchantment level, replacing an existing level
    pub fn enchantment(mut self, enchantment: Enchantment, level: u8) -> Self {
        self.icon.enchantments.retain(|(e, _)| *e != enchantment);
        self.icon.enchantments.push((enchantment, level));
        self
    }

    pub fn clear_enchantment(mut self, enchantment: Enchantment) -> Self {
        self.icon.enchantments.retain(|(e, _)| *e != enchantment);
        self
    }

    /// Leather tint. Only meaningful for dyeable materials.
    pub fn color(mut self, rgb: [u8; 3]) -> Self {
        self.icon.color = Some(rgb);
        self
    }

    pub fn flag(mut self, flag: IconFlag) -> Self {
        if !self.icon.flags.contains(&flag) {
            self.icon.flags.push(flag);
        }
        self
    }

    /// Add an enchantment glint without showing enchantment text
    pub fn glow(self) -> Self {
        self.enchantment(Enchantment::Luck, 1).flag(IconFlag::HideEnchants)
    }

    pub fn build(self) -> Icon {
        self.icon
    }
}

/// Menu icon for a waypoint.
///
/// The display name comes from the category translation with a `{name}`
/// placeholder; lore holds the description, world, block position and,
/// when a viewer location in the same world is given, the distance.
pub fn waypoint_icon(
    waypoint: &Waypoint,
    config: &ConfigResolver,
    translations: &dyn Translations,
    viewer: Option<&Location>,
) -> Icon {
    let european = config.european_number_format();
    let key = waypoint.translation_key();
    let location = waypoint.location();
    let block = location.block();

    let name_template = translations
        .resolve(&key.display_name())
        .unwrap_or_else(|| "{name}".to_string());
    let name = fill_placeholders(&name_template, &[("name", waypoint.name())]);

    let mut builder = IconBuilder::new(waypoint.resolve_material(config))
        .name(name)
        .flag(IconFlag::HideAttributes);

    if let Some(description) = translations.resolve(&key.description()) {
        builder = builder.lore(description);
    }
    builder = builder
        .lore(location.world.clone())
        .lore(format_block_position(block.x, block.y, block.z, european));

    if let Some(distance) = viewer.and_then(|viewer| viewer.distance(location)) {
        builder = builder.lore(format_distance(distance, european));
    }

    builder.build()
}
