//! Static recommendations used when the live service is absent or fails

use mb_core::Language;

use crate::types::{Recommendation, RecommendationSource};

const OFFLINE_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1515377905703-c4788e51af15?auto=format&fit=crop&w=600&q=80";
const FAILURE_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1608571423902-eed4a5ad8108?auto=format&fit=crop&w=600&q=80";

struct Entry {
    item_name: &'static str,
    price_label: &'static str,
    rationale: &'static str,
    search_keyword: &'static str,
}

impl Entry {
    fn build(&self, image_url: &str, source: RecommendationSource) -> Recommendation {
        Recommendation {
            item_name: self.item_name.to_string(),
            price_label: self.price_label.to_string(),
            rationale: self.rationale.to_string(),
            search_keyword: self.search_keyword.to_string(),
            image_url: Some(image_url.to_string()),
            source,
        }
    }
}

fn offline_entry(lang: Language) -> Entry {
    match lang {
        Language::Kr => Entry {
            item_name: "힐링 명상 크리스탈",
            price_label: "₩24,500",
            rationale: "오늘의 차분한 조합에 맑은 에너지를 더해 줄 작은 크리스탈이에요.",
            search_keyword: "명상 크리스탈",
        },
        Language::En => Entry {
            item_name: "Healing Meditation Crystal",
            price_label: "$19",
            rationale: "A small crystal to add clear, steady energy to today's calm combination.",
            search_keyword: "meditation crystal",
        },
        Language::Ja => Entry {
            item_name: "ヒーリング瞑想クリスタル",
            price_label: "¥2,800",
            rationale: "今日の穏やかな組み合わせに、澄んだエネルギーを添える小さなクリスタルです。",
            search_keyword: "瞑想 クリスタル",
        },
    }
}

fn failure_entry(lang: Language) -> Entry {
    match lang {
        Language::Kr => Entry {
            item_name: "실크 수면 안대 & 리추얼 미스트",
            price_label: "₩32,000",
            rationale: "어떤 조합이든 하루를 포근하게 마무리해 줄 휴식 세트예요.",
            search_keyword: "실크 수면 안대",
        },
        Language::En => Entry {
            item_name: "Silk Eye Mask & Ritual Mist",
            price_label: "$26",
            rationale: "A rest set that closes any ritual softly, whatever the reels chose today.",
            search_keyword: "silk eye mask",
        },
        Language::Ja => Entry {
            item_name: "シルクアイマスク＆リチュアルミスト",
            price_label: "¥3,600",
            rationale: "どんな組み合わせでも、一日をやさしく締めくくる休息セットです。",
            search_keyword: "シルク アイマスク",
        },
    }
}

/// Pick shown when no credential is configured
pub fn offline(lang: Language) -> Recommendation {
    offline_entry(lang).build(OFFLINE_IMAGE_URL, RecommendationSource::OfflineFallback)
}

/// Pick shown when the service call fails for any reason
pub fn failure(lang: Language) -> Recommendation {
    failure_entry(lang).build(FAILURE_IMAGE_URL, RecommendationSource::FailureFallback)
}
