//! Localized UI labels

use crate::language::Language;

/// UI strings for one language
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub energy: &'static str,
    pub spin: &'static str,
    pub spinning: &'static str,
    pub recharging: &'static str,
    pub out_of_energy: &'static str,
    pub recharge_needed: &'static str,
    pub result_harmony: &'static str,
    pub commentary_title: &'static str,
    pub lucky_item: &'static str,
    pub loading_recommendation: &'static str,
    pub shop_link: &'static str,
    pub restart: &'static str,
    pub admin_on: &'static str,
    pub admin_off: &'static str,
}

const KR: Labels = Labels {
    title: "오늘의 무드 블라썸",
    subtitle: "나만의 비밀 리추얼",
    energy: "에너지",
    spin: "리추얼 시작하기",
    spinning: "인연을 맺는 중...",
    recharging: "에너지 충전 중",
    out_of_energy: "오늘의 에너지를 모두 사용했어요",
    recharge_needed: "내일 다시 새로운 리추얼을 만나보세요.",
    result_harmony: "오늘의 조화",
    commentary_title: "큐레이터 코멘트",
    lucky_item: "행운의 아이템",
    loading_recommendation: "행운의 아이템을 찾는 중...",
    shop_link: "쿠팡에서 바로 구매하기 ➔",
    restart: "다시 하기",
    admin_on: "관리자 모드가 활성화되었습니다 (무제한)",
    admin_off: "관리자 모드가 해제되었습니다",
};

const EN: Labels = Labels {
    title: "Today's Mood Blossom",
    subtitle: "A private ritual",
    energy: "Energy",
    spin: "Begin the ritual",
    spinning: "Connecting...",
    recharging: "Recharging",
    out_of_energy: "You've used all of today's energy",
    recharge_needed: "Come back tomorrow for a new ritual.",
    result_harmony: "Today's harmony",
    commentary_title: "Curator's note",
    lucky_item: "Lucky item",
    loading_recommendation: "Finding your lucky item...",
    shop_link: "Check on Shop ➔",
    restart: "Restart",
    admin_on: "Admin mode enabled (unlimited)",
    admin_off: "Admin mode disabled",
};

const JA: Labels = Labels {
    title: "今日のムードブロッサム",
    subtitle: "わたしだけの秘密のリチュアル",
    energy: "エネルギー",
    spin: "リチュアルを始める",
    spinning: "縁を結んでいます...",
    recharging: "充電中",
    out_of_energy: "今日のエネルギーを使い切りました",
    recharge_needed: "また明日、新しいリチュアルに出会ってください。",
    result_harmony: "今日の調和",
    commentary_title: "キュレーターのコメント",
    lucky_item: "ラッキーアイテム",
    loading_recommendation: "ラッキーアイテムを探しています...",
    shop_link: "ショップで確認する ➔",
    restart: "もう一度",
    admin_on: "管理者モードが有効になりました（無制限）",
    admin_off: "管理者モードが解除されました",
};

/// Label table for a language
pub fn labels(lang: Language) -> &'static Labels {
    match lang {
        Language::Kr => &KR,
        Language::En => &EN,
        Language::Ja => &JA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_distinct() {
        assert_ne!(labels(Language::Kr).spin, labels(Language::En).spin);
        assert_ne!(labels(Language::En).spin, labels(Language::Ja).spin);
    }
}
