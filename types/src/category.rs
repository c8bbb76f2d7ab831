use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownSymbol;

/// Class of waypoint. Each category has its own default icon, default
/// beacon color and translation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointCategory {
    /// Owned by and visible to a single player
    Private,
    /// Shared with every player on the server
    Public,
    /// Visible to players holding a permission node
    Permission,
    /// Created automatically where a player died
    Death,
}

impl WaypointCategory {
    pub const ALL: [WaypointCategory; 4] = [Self::Private, Self::Public, Self::Permission, Self::Death];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
            Self::Permission => "permission",
            Self::Death => "death",
        }
    }

    /// Stable dense index, usable for per-category lookup arrays
    pub fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for WaypointCategory {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == lower)
            .ok_or_else(|| UnknownSymbol::category(s))
    }
}

impl fmt::Display for WaypointCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One optional value per waypoint category.
///
/// Serialized as a table with one key per category; absent keys stay
/// `None` so configuration validation can report exactly which category is
/// missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death: Option<T>,
}

impl<T> Default for CategoryTable<T> {
    fn default() -> Self {
        Self {
            private: None,
            public: None,
            permission: None,
            death: None,
        }
    }
}

impl<T> CategoryTable<T> {
    /// Table with every category set to the value produced by `f`
    pub fn from_fn(mut f: impl FnMut(WaypointCategory) -> T) -> Self {
        Self {
            private: Some(f(WaypointCategory::Private)),
            public: Some(f(WaypointCategory::Public)),
            permission: Some(f(WaypointCategory::Permission)),
            death: Some(f(WaypointCategory::Death)),
        }
    }

    pub fn get(&self, category: WaypointCategory) -> Option<&T> {
        match category {
            WaypointCategory::Private => self.private.as_ref(),
            WaypointCategory::Public => self.public.as_ref(),
            WaypointCategory::Permission => self.permission.as_ref(),
            WaypointCategory::Death => self.death.as_ref(),
        }
    }

    pub fn set(&mut self, category: WaypointCategory, value: T) {
        let slot = match category {
            WaypointCategory::Private => &mut self.private,
            WaypointCategory::Public => &mut self.public,
            WaypointCategory::Permission => &mut self.permission,
            WaypointCategory::Death => &mut self.death,
        };
        *slot = Some(value);
    }

    /// Categories with no value
    pub fn missing(&self) -> Vec<WaypointCategory> {
        WaypointCategory::ALL
            .into_iter()
            .filter(|category| self.get(*category).is_none())
            .collect()
    }
}
