//! Per-category capability table.
//!
//! Each [`WaypointCategory`] maps to one static row holding its translation
//! key and the lookups for its default icon and beacon color. Waypoints keep
//! only the category tag and dispatch through this table.

use waypoints_types::{BeaconColor, Material, WaypointCategory};

use crate::config::ConfigResolver;
use crate::translation::TranslationKey;

/// What a category contributes to attribute resolution
pub struct CategoryTraits {
    pub category: WaypointCategory,
    pub translation_key: TranslationKey,
    pub default_icon: fn(&ConfigResolver) -> Material,
    pub default_beacon_color: fn(&ConfigResolver) -> BeaconColor,
}

macro_rules! category_row {
    ($category:expr, $key:literal) => {
        CategoryTraits {
            category: $category,
            translation_key: TranslationKey::new($key),
            default_icon: |config| config.default_icon($category),
            default_beacon_color: |config| config.default_beacon_color($category),
        }
    };
}

/// Indexed by `WaypointCategory::index`
static CATEGORY_TRAITS: [CategoryTraits; 4] = [
    category_row!(WaypointCategory::Private, "waypoint.private"),
    category_row!(WaypointCategory::Public, "waypoint.public"),
    category_row!(WaypointCategory::Permission, "waypoint.permission"),
    category_row!(WaypointCategory::Death, "waypoint.death"),
];

pub fn traits(category: WaypointCategory) -> &'static CategoryTraits {
    &CATEGORY_TRAITS[category.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_line_up_with_index() {
        for category in WaypointCategory::ALL {
            assert_eq!(traits(category).category, category);
        }
    }

    #[test]
    fn test_translation_keys_are_distinct() {
        let mut keys: Vec<_> = WaypointCategory::ALL
            .iter()
            .map(|c| traits(*c).translation_key.as_str())
            .collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), WaypointCategory::ALL.len());
    }
}
