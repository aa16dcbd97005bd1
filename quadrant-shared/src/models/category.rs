/// Task categories
///
/// The matrix groups tasks into a fixed set of six categories. Stored values
/// are free text so an unknown category survives create/update unchanged, but
/// only the six known ones are counted by [`CategoryCounts`].

use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use std::fmt;

/// One of the six known task categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Study,
    Health,
    Family,
    #[default]
    Other,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 6] = [
        Category::Work,
        Category::Personal,
        Category::Study,
        Category::Health,
        Category::Family,
        Category::Other,
    ];

    /// Converts category to its stored string
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Study => "study",
            Category::Health => "health",
            Category::Family => "family",
            Category::Other => "other",
        }
    }

    /// Exact, case-sensitive match against the stored strings
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == value)
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category task counts
///
/// Serializes as a JSON object with exactly the six category keys, in
/// [`Category::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts([u64; 6]);

impl CategoryCounts {
    /// Counts stored category values, ignoring anything outside the known set
    pub fn tally<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = Self::default();
        for category in values.into_iter().filter_map(Category::parse) {
            counts.0[category.index()] += 1;
        }
        counts
    }

    /// Count for one category
    pub fn get(&self, category: Category) -> u64 {
        self.0[category.index()]
    }

    /// Sum over all known categories
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for category in Category::ALL {
            map.serialize_entry(category.as_str(), &self.get(category))?;
        }
        map.end()
    }
}
