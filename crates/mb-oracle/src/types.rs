//! Recommendation request / response types

use serde::{Deserialize, Serialize};

use mb_core::{Language, MoodResult};

/// What the service is asked about: four localized item names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub tea: String,
    pub activity: String,
    pub perfume: String,
    pub flower: String,
    pub language: Language,
}

impl RecommendationRequest {
    pub fn new(names: [&str; 4], language: Language) -> Self {
        let [tea, activity, perfume, flower] = names;
        Self {
            tea: tea.to_string(),
            activity: activity.to_string(),
            perfume: perfume.to_string(),
            flower: flower.to_string(),
            language,
        }
    }

    /// Request for a finished spin, in the result's language
    pub fn for_result(result: &MoodResult) -> Self {
        Self::new(result.display_names(), result.language)
    }

    /// Names in reel order
    pub fn names(&self) -> [&str; 4] {
        [
            self.tea.as_str(),
            self.activity.as_str(),
            self.perfume.as_str(),
            self.flower.as_str(),
        ]
    }
}

/// Where a recommendation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    /// Live answer from the external service
    Service,
    /// No credential configured; static offline pick
    OfflineFallback,
    /// Call failed; static failure pick
    FailureFallback,
}

impl RecommendationSource {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, RecommendationSource::Service)
    }
}

/// A lucky-item recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_name: String,
    pub price_label: String,
    pub rationale: String,
    pub search_keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub source: RecommendationSource,
}

/// Wire shape of the service's JSON answer
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub item_name: String,
    pub item_price: String,
    pub item_reason: String,
    pub search_keyword: String,
    #[serde(default)]
    pub item_image_url: Option<String>,
}

impl ShoppingItem {
    /// Validate required fields and convert. Blank required fields are rejected.
    pub fn into_recommendation(self) -> Result<Recommendation, String> {
        for (field, value) in [
            ("itemName", &self.item_name),
            ("itemPrice", &self.item_price),
            ("itemReason", &self.item_reason),
            ("searchKeyword", &self.search_keyword),
        ] {
            if value.trim().is_empty() {
                return Err(format!("required field {field} is blank"));
            }
        }

        let image_url = self
            .item_image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Ok(Recommendation {
            item_name: self.item_name.trim().to_string(),
            price_label: self.item_price.trim().to_string(),
            rationale: self.item_reason.trim().to_string(),
            search_keyword: self.search_keyword.trim().to_string(),
            image_url,
            source: RecommendationSource::Service,
        })
    }
}
