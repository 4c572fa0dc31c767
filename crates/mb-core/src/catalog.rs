//! Ritual catalog — the four ordered reel item lists

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Embedded default catalog
const BUILTIN_CATALOG: &str = include_str!("../data/ritual_data.json");

/// Shown whenever an item's image cannot be resolved
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1612817288484-6f916006741a?auto=format&fit=crop&w=400&q=80";

const CURATED_IMAGE_BASE: &str = "https://images.unsplash.com/photo-";
const CURATED_IMAGE_PARAMS: &str = "?auto=format&fit=crop&w=800&q=80";

/// Reel category. The discriminant is the reel position, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Category {
    Tea = 0,
    Activity = 1,
    Perfume = 2,
    Flower = 3,
}

impl Category {
    /// All categories in reel order
    pub const ALL: [Category; 4] = [
        Category::Tea,
        Category::Activity,
        Category::Perfume,
        Category::Flower,
    ];

    /// Reel position (0..4)
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Lower-case tag used in ids and asset paths
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Tea => "tea",
            Category::Activity => "activity",
            Category::Perfume => "perfume",
            Category::Flower => "flower",
        }
    }

    /// Curated photo ids for this category
    fn curated_images(&self) -> &'static [&'static str] {
        match self {
            Category::Tea => &[
                "1596462502278-27bfdc4033c8",
                "1556228720-195a672e8a03",
                "1612817288484-6f916006741a",
                "1629198688000-71f23e745b6e",
            ],
            Category::Activity => &[
                "1518241353317-8f539d420f60",
                "1552693805-65eeac276233",
                "1596462502278-27bfdc4033c8",
                "1556228720-195a672e8a03",
            ],
            Category::Perfume => &[
                "1620916566398-39f1143ab7be",
                "1596462502278-27bfdc4033c8",
                "1612817288484-6f916006741a",
                "1556228720-195a672e8a03",
            ],
            Category::Flower => &[
                "1612817288484-6f916006741a",
                "1596462502278-27bfdc4033c8",
                "1490750967868-88aa4486c946",
                "1508610048659-a06b669e3321",
            ],
        }
    }

    /// Curated image URL for the item at `position` within this category
    pub fn curated_image_url(&self, position: usize) -> String {
        let images = self.curated_images();
        let photo_id = images[position % images.len()];
        format!("{CURATED_IMAGE_BASE}{photo_id}{CURATED_IMAGE_PARAMS}")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A selectable reel item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Stable id, unique within its category (e.g. "tea_4")
    pub id: String,
    pub category: Category,
    pub name_kr: String,
    pub name_en: String,
    pub name_ja: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image_url: String,
}

impl CatalogItem {
    /// Localized display name
    pub fn display_name(&self, lang: Language) -> &str {
        match lang {
            Language::Kr => &self.name_kr,
            Language::En => &self.name_en,
            Language::Ja => &self.name_ja,
        }
    }

    /// Image URL, or the generic placeholder when it cannot be resolved
    pub fn image_or_placeholder(&self) -> &str {
        let url = self.image_url.trim();
        if url.starts_with("https://") || url.starts_with("http://") {
            url
        } else {
            PLACEHOLDER_IMAGE_URL
        }
    }
}

/// Raw item as it appears in the catalog document
#[derive(Debug, Deserialize)]
struct RawItem {
    id: String,
    name_kr: String,
    name_en: String,
    name_ja: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "imageUrl")]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawCatalog {
    tea: Vec<RawItem>,
    activity: Vec<RawItem>,
    perfume: Vec<RawItem>,
    flower: Vec<RawItem>,
}

/// Read-only catalog, one ordered list per category
#[derive(Debug, Clone)]
pub struct Catalog {
    reels: [Vec<CatalogItem>; 4],
}

impl Catalog {
    /// Parse the embedded catalog
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse a catalog document
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let reels = [
            Self::build_reel(Category::Tea, raw.tea)?,
            Self::build_reel(Category::Activity, raw.activity)?,
            Self::build_reel(Category::Perfume, raw.perfume)?,
            Self::build_reel(Category::Flower, raw.flower)?,
        ];
        log::debug!(
            "[Catalog] Loaded {}/{}/{}/{} items",
            reels[0].len(),
            reels[1].len(),
            reels[2].len(),
            reels[3].len()
        );
        Ok(Self { reels })
    }

    fn build_reel(category: Category, raw: Vec<RawItem>) -> Result<Vec<CatalogItem>, CatalogError> {
        if raw.is_empty() {
            return Err(CatalogError::EmptyCategory(category));
        }

        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(raw.len());
        for (position, item) in raw.into_iter().enumerate() {
            if !seen.insert(item.id.clone()) {
                return Err(CatalogError::DuplicateId {
                    category,
                    id: item.id,
                });
            }
            let image_url = item
                .image_url
                .unwrap_or_else(|| category.curated_image_url(position));
            items.push(CatalogItem {
                id: item.id,
                category,
                name_kr: item.name_kr,
                name_en: item.name_en,
                name_ja: item.name_ja,
                description: item.description,
                image_url,
            });
        }
        Ok(items)
    }

    /// Items of one category, in reel order
    pub fn items(&self, category: Category) -> &[CatalogItem] {
        &self.reels[category.index()]
    }

    /// Number of items in a category
    pub fn len(&self, category: Category) -> usize {
        self.reels[category.index()].len()
    }

    /// Per-reel item counts, in reel order
    pub fn reel_lengths(&self) -> [usize; 4] {
        [
            self.reels[0].len(),
            self.reels[1].len(),
            self.reels[2].len(),
            self.reels[3].len(),
        ]
    }

    /// Item at a position
    pub fn get(&self, category: Category, index: usize) -> Option<&CatalogItem> {
        self.reels[category.index()].get(index)
    }

    /// Resolve four reel positions into a selection
    pub fn select(&self, indices: [usize; 4]) -> Result<Selections, CatalogError> {
        let pick = |category: Category| -> Result<CatalogItem, CatalogError> {
            let index = indices[category.index()];
            self.get(category, index)
                .cloned()
                .ok_or(CatalogError::IndexOutOfRange {
                    category,
                    index,
                    len: self.len(category),
                })
        };

        Ok(Selections {
            tea: pick(Category::Tea)?,
            activity: pick(Category::Activity)?,
            perfume: pick(Category::Perfume)?,
            flower: pick(Category::Flower)?,
        })
    }
}

/// One item per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selections {
    pub tea: CatalogItem,
    pub activity: CatalogItem,
    pub perfume: CatalogItem,
    pub flower: CatalogItem,
}

impl Selections {
    pub fn get(&self, category: Category) -> &CatalogItem {
        match category {
            Category::Tea => &self.tea,
            Category::Activity => &self.activity,
            Category::Perfume => &self.perfume,
            Category::Flower => &self.flower,
        }
    }

    /// Item ids in reel order
    pub fn ids(&self) -> [&str; 4] {
        [
            self.tea.id.as_str(),
            self.activity.id.as_str(),
            self.perfume.id.as_str(),
            self.flower.id.as_str(),
        ]
    }

    /// Localized names in reel order
    pub fn display_names(&self, lang: Language) -> [&str; 4] {
        [
            self.tea.display_name(lang),
            self.activity.display_name(lang),
            self.perfume.display_name(lang),
            self.flower.display_name(lang),
        ]
    }
}

/// Catalog loading errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Category {0} has no items")]
    EmptyCategory(Category),

    #[error("Duplicate id {id} in category {category}")]
    DuplicateId { category: Category, id: String },

    #[error("Index {index} out of range for {category} (len {len})")]
    IndexOutOfRange {
        category: Category,
        index: usize,
        len: usize,
    },
}
