//! Combination commentary — authored flavor text per four-item combination
//!
//! Lookup is exact-match on the ordered key `tea-activity-perfume-flower`.
//! Every language table carries a `default` record, so resolution is total.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::language::Language;

/// Key of the fallback record in every table
pub const DEFAULT_KEY: &str = "default";

const KR_TABLE: &[(&str, &str)] = &[
    (
        "tea_4-act_1-perf_4-flow_3",
        "페퍼민트의 청량함과 숲길의 싱그러운 공기가 만나 지친 마음을 정화하고, 그 위에 얹어진 플로럴 부케의 우아한 잔향은 당신의 내면을 다정하게 감싸 안아줍니다. 여기에 태양을 닮은 해바라기의 찬란한 에너지가 더해져, 정적인 휴식과 동적인 생동감이 완벽한 균형을 이루는 환상적인 시너지가 완성되었습니다. 오늘 이 조합은 당신의 감각을 섬세하게 깨워주며, 마치 숲속에서 마주한 눈부신 햇살처럼 당신의 하루를 가장 빛나게 피워낼 것입니다.",
    ),
    (
        DEFAULT_KEY,
        "선택하신 조합은 오늘 당신의 기분을 맑게 정화해 줄 완벽한 리추얼입니다. 따뜻한 차 한 잔과 함께 특별한 향기와 꽃이 주는 에너지를 만끽하며, 나만을 위한 소중한 시간을 보내보세요. 이 리추얼이 당신의 평온한 하루를 응원합니다.",
    ),
];

const EN_TABLE: &[(&str, &str)] = &[
    (
        "tea_4-act_1-perf_4-flow_3",
        "The cool clarity of peppermint meets the fresh air of a forest path to cleanse a tired mind, while the graceful trail of a floral bouquet gently embraces your inner self. Add the radiant, sun-like energy of the sunflower and a perfect balance of stillness and vitality blooms. Today this combination delicately awakens your senses and lets your day shine like dazzling sunlight found deep in the woods.",
    ),
    (
        DEFAULT_KEY,
        "The combination you drew is a perfect ritual to clear and refresh your mood today. Savor a warm cup of tea with the energy of a special scent and flower, and spend a precious moment just for yourself. This ritual is cheering on your peaceful day.",
    ),
];

const JA_TABLE: &[(&str, &str)] = &[
    (
        "tea_4-act_1-perf_4-flow_3",
        "ペパーミントの清涼感と森の小道の澄んだ空気が疲れた心を浄化し、フローラルブーケの優雅な余韻があなたの内面をやさしく包み込みます。そこに太陽のようなひまわりの輝くエネルギーが加わり、静かな休息と躍動する生命力が完璧に調和しました。今日この組み合わせはあなたの感覚を繊細に目覚めさせ、森で出会ったまばゆい陽射しのように一日を輝かせてくれるでしょう。",
    ),
    (
        DEFAULT_KEY,
        "選ばれた組み合わせは、今日のあなたの気分を澄みわたらせる完璧なリチュアルです。温かいお茶とともに、特別な香りと花がくれるエネルギーを味わい、自分だけの大切な時間を過ごしてください。このリチュアルがあなたの穏やかな一日を応援しています。",
    ),
];

type Table = HashMap<&'static str, &'static str>;

fn table(lang: Language) -> &'static Table {
    static KR: OnceLock<Table> = OnceLock::new();
    static EN: OnceLock<Table> = OnceLock::new();
    static JA: OnceLock<Table> = OnceLock::new();

    let (cell, source) = match lang {
        Language::Kr => (&KR, KR_TABLE),
        Language::En => (&EN, EN_TABLE),
        Language::Ja => (&JA, JA_TABLE),
    };
    cell.get_or_init(|| source.iter().copied().collect())
}

/// Ordered lookup key for four item ids
pub fn combination_key(ids: [&str; 4]) -> String {
    ids.join("-")
}

/// Commentary for a combination, falling back to the language default
pub fn resolve(ids: [&str; 4], lang: Language) -> &'static str {
    let table = table(lang);
    let key = combination_key(ids);
    match table.get(key.as_str()) {
        Some(text) => *text,
        None => default_commentary(lang),
    }
}

/// The guaranteed default record for a language
pub fn default_commentary(lang: Language) -> &'static str {
    let source = match lang {
        Language::Kr => KR_TABLE,
        Language::En => EN_TABLE,
        Language::Ja => JA_TABLE,
    };
    source
        .iter()
        .find(|(key, _)| *key == DEFAULT_KEY)
        .map(|(_, text)| *text)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTHORED: [&str; 4] = ["tea_4", "act_1", "perf_4", "flow_3"];

    #[test]
    fn test_key_format() {
        assert_eq!(combination_key(AUTHORED), "tea_4-act_1-perf_4-flow_3");
    }

    #[test]
    fn test_exact_match_korean() {
        let text = resolve(AUTHORED, Language::Kr);
        assert!(text.starts_with("페퍼민트의 청량함"));
        assert_ne!(text, default_commentary(Language::Kr));
    }

    #[test]
    fn test_unknown_combination_uses_default() {
        for lang in Language::ALL {
            let text = resolve(["tea_1", "act_1", "perf_4", "flow_3"], lang);
            assert_eq!(text, default_commentary(lang));
        }
    }

    #[test]
    fn test_order_matters() {
        let swapped = resolve(["act_1", "tea_4", "perf_4", "flow_3"], Language::Kr);
        assert_eq!(swapped, default_commentary(Language::Kr));
    }

    #[test]
    fn test_every_language_has_default() {
        for lang in Language::ALL {
            assert!(!default_commentary(lang).is_empty());
            assert!(table(lang).contains_key(DEFAULT_KEY));
        }
    }
}
