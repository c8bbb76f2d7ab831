//! Item and block materials referenced by waypoint icons, menus and beacons.
//!
//! Materials are persisted and configured by their symbolic name
//! (`"COMPASS"`, `"DIAMOND"`, ...). Parsing is forgiving about case, a
//! `minecraft:` namespace prefix and spaces/hyphens, but never invents a
//! material that is not in the table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownSymbol;

macro_rules! materials {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// A known item/block material
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum Material {
            $($variant,)*
        }

        impl Material {
            /// Every known material, in declaration order
            pub const ALL: &'static [Material] = &[$(Material::$variant,)*];

            /// Canonical symbolic name (e.g. `"LIGHT_BLUE_STAINED_GLASS"`)
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Material::$variant => $name,)*
                }
            }

            /// Exact canonical name only, as written by [`Material::as_str`].
            /// User input goes through `FromStr`, which also accepts loose
            /// spellings.
            pub fn from_canonical(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Material::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

materials! {
    Air => "AIR",
    Compass => "COMPASS",
    RecoveryCompass => "RECOVERY_COMPASS",
    Clock => "CLOCK",
    Map => "MAP",
    FilledMap => "FILLED_MAP",
    Paper => "PAPER",
    Book => "BOOK",
    WritableBook => "WRITABLE_BOOK",
    NameTag => "NAME_TAG",
    Diamond => "DIAMOND",
    Emerald => "EMERALD",
    GoldIngot => "GOLD_INGOT",
    IronIngot => "IRON_INGOT",
    NetheriteIngot => "NETHERITE_INGOT",
    EnderPearl => "ENDER_PEARL",
    EnderEye => "ENDER_EYE",
    Lodestone => "LODESTONE",
    Beacon => "BEACON",
    IronBlock => "IRON_BLOCK",
    GoldBlock => "GOLD_BLOCK",
    DiamondBlock => "DIAMOND_BLOCK",
    EmeraldBlock => "EMERALD_BLOCK",
    NetheriteBlock => "NETHERITE_BLOCK",
    SkeletonSkull => "SKELETON_SKULL",
    PlayerHead => "PLAYER_HEAD",
    TotemOfUndying => "TOTEM_OF_UNDYING",
    Chest => "CHEST",
    EnderChest => "ENDER_CHEST",
    Barrier => "BARRIER",
    Arrow => "ARROW",
    Feather => "FEATHER",
    LavaBucket => "LAVA_BUCKET",
    OakSign => "OAK_SIGN",
    OakDoor => "OAK_DOOR",
    RedBed => "RED_BED",
    LeatherChestplate => "LEATHER_CHESTPLATE",
    Glass => "GLASS",
    GlassPane => "GLASS_PANE",
    WhiteStainedGlass => "WHITE_STAINED_GLASS",
    OrangeStainedGlass => "ORANGE_STAINED_GLASS",
    MagentaStainedGlass => "MAGENTA_STAINED_GLASS",
    LightBlueStainedGlass => "LIGHT_BLUE_STAINED_GLASS",
    YellowStainedGlass => "YELLOW_STAINED_GLASS",
    LimeStainedGlass => "LIME_STAINED_GLASS",
    PinkStainedGlass => "PINK_STAINED_GLASS",
    GrayStainedGlass => "GRAY_STAINED_GLASS",
    LightGrayStainedGlass => "LIGHT_GRAY_STAINED_GLASS",
    CyanStainedGlass => "CYAN_STAINED_GLASS",
    PurpleStainedGlass => "PURPLE_STAINED_GLASS",
    BlueStainedGlass => "BLUE_STAINED_GLASS",
    BrownStainedGlass => "BROWN_STAINED_GLASS",
    GreenStainedGlass => "GREEN_STAINED_GLASS",
    RedStainedGlass => "RED_STAINED_GLASS",
    BlackStainedGlass => "BLACK_STAINED_GLASS",
    GrayStainedGlassPane => "GRAY_STAINED_GLASS_PANE",
    BlackStainedGlassPane => "BLACK_STAINED_GLASS_PANE",
}

impl Material {
    /// Whether the material can be placed as a block in the world
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Material::Beacon
                | Material::IronBlock
                | Material::GoldBlock
                | Material::DiamondBlock
                | Material::EmeraldBlock
                | Material::NetheriteBlock
                | Material::Lodestone
                | Material::Chest
                | Material::EnderChest
                | Material::Barrier
                | Material::Glass
                | Material::GlassPane
                | Material::GrayStainedGlassPane
                | Material::BlackStainedGlassPane
        ) || self.as_str().ends_with("_STAINED_GLASS")
    }

    /// Whether a beacon beam passes through (and is tinted by) this block
    pub fn tints_beacon_beam(self) -> bool {
        self == Material::Glass || self.as_str().ends_with("_STAINED_GLASS")
    }
}

/// Normalize user-facing material spelling to the canonical form
fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("minecraft:")
        .or_else(|| trimmed.strip_prefix("MINECRAFT:"))
        .unwrap_or(trimmed);
    trimmed
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

impl FromStr for Material {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Material::from_canonical(&normalize(s)).ok_or_else(|| UnknownSymbol::material(s))
    }
}

impl TryFrom<String> for Material {
    type Error = UnknownSymbol;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Material> for String {
    fn from(material: Material) -> Self {
        material.as_str().to_string()
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
