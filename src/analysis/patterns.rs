//! Static keyword tables used for classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// UI pattern categories detected from node text and names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiPattern {
    Navigation,
    Authentication,
    FormInput,
    ModalPopup,
    Transaction,
    Social,
    Settings,
}

impl UiPattern {
    /// Detection order; the first pattern with the highest confidence wins ties
    pub const ALL: [UiPattern; 7] = [
        UiPattern::Navigation,
        UiPattern::Authentication,
        UiPattern::FormInput,
        UiPattern::ModalPopup,
        UiPattern::Transaction,
        UiPattern::Social,
        UiPattern::Settings,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            UiPattern::Navigation => &["nav", "menu", "tab", "breadcrumb", "back", "next", "home"],
            UiPattern::Authentication => &[
                "login", "signup", "register", "signin", "oauth", "auth", "password",
            ],
            UiPattern::FormInput => &[
                "input", "field", "form", "textfield", "submit", "save", "cancel",
            ],
            UiPattern::ModalPopup => &["modal", "popup", "dialog", "overlay", "confirm", "alert"],
            UiPattern::Transaction => &[
                "buy", "sell", "trade", "order", "payment", "checkout", "confirm",
            ],
            UiPattern::Social => &["share", "like", "follow", "comment", "social", "connect"],
            UiPattern::Settings => &["settings", "preferences", "profile", "account", "config"],
        }
    }

    pub fn flow_type(self) -> &'static str {
        match self {
            UiPattern::Navigation => "navigation",
            UiPattern::Authentication => "auth_flow",
            UiPattern::FormInput => "form_interaction",
            UiPattern::ModalPopup => "modal_flow",
            UiPattern::Transaction => "transaction_flow",
            UiPattern::Social => "social_interaction",
            UiPattern::Settings => "settings_flow",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UiPattern::Navigation => "navigation",
            UiPattern::Authentication => "authentication",
            UiPattern::FormInput => "form_input",
            UiPattern::ModalPopup => "modal_popup",
            UiPattern::Transaction => "transaction",
            UiPattern::Social => "social",
            UiPattern::Settings => "settings",
        }
    }
}

impl fmt::Display for UiPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Journey patterns detected from copy text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPattern {
    Onboarding,
    Purchasing,
    Registration,
    Verification,
    ErrorHandling,
    Success,
}

impl FlowPattern {
    pub const ALL: [FlowPattern; 6] = [
        FlowPattern::Onboarding,
        FlowPattern::Purchasing,
        FlowPattern::Registration,
        FlowPattern::Verification,
        FlowPattern::ErrorHandling,
        FlowPattern::Success,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            FlowPattern::Onboarding => &["welcome", "intro", "tutorial", "getting started", "setup"],
            FlowPattern::Purchasing => &["add to cart", "checkout", "payment", "order", "buy"],
            FlowPattern::Registration => &["sign up", "register", "create account", "join"],
            FlowPattern::Verification => &["verify", "confirm", "validate", "check", "code"],
            FlowPattern::ErrorHandling => &[
                "error",
                "failed",
                "retry",
                "oops",
                "something went wrong",
            ],
            FlowPattern::Success => &[
                "success",
                "complete",
                "done",
                "congratulations",
                "thank you",
            ],
        }
    }
}

/// Style-property words that mark a text as design tokens rather than copy
pub const EXCLUDE_KEYWORDS: &[&str] = &[
    "px", "pt", "rem", "color", "font", "weight", "size", "margin", "padding", "border", "shadow",
    "opacity",
];

/// Product vocabulary that marks a text or layer name as a requirement.
/// Korean entries cover designs written for Korean-language products.
pub const REQUIREMENT_KEYWORDS: &[&str] = &[
    // Korean product vocabulary
    "기능", "요구사항", "사용자", "시스템", "화면", "페이지", "버튼",
    "클릭", "선택", "입력", "검색", "필터", "정렬", "스크롤",
    "로그인", "회원가입", "로그아웃", "프로필", "설정", "알림",
    "목록", "리스트", "카드", "메뉴", "탭", "모달", "팝업",
    "등록", "수정", "삭제", "추가", "업데이트", "동기화",
    "거래", "주문", "보유", "자산", "포트폴리오", "접근성", "표시", "대기",
    "자산관리", "잔고", "잔액", "총자산", "수익률", "계좌", "지갑",
    "입금", "출금", "이체", "매수", "매도", "체결", "미체결", "취소",
    "차트", "그래프", "통계", "분석", "리포트", "히스토리", "거래내역",
    "대시보드", "새로고침", "실시간", "진행중", "완료", "실패", "승인",
    "출금한도", "한도", "인증", "검증", "보호", "손실", "평균", "단가",
    "수익", "자동매수", "주소록", "주소", "확인", "네트워크", "블록체인",
    "시스템점검", "점검", "내역", "포지션", "손익", "실현", "보류",
    "상태", "유지보수", "전환", "거래정지", "무기한", "스왑", "트리거",
    "실행", "대기중", "부족", "한계", "제한", "활성화", "업그레이드",
    "경우", "특정", "모든",
    // Interaction and account
    "login", "signup", "profile", "setting", "notification",
    "search", "filter", "sort", "upload", "download",
    "button", "click", "tap", "swipe", "scroll",
    // Trading and assets
    "spot", "holdings", "accessibility", "display", "pending", "order",
    "asset", "portfolio", "wallet", "balance", "total", "deposit",
    "withdrawal", "transfer", "transaction", "buy", "sell", "trade",
    "exchange", "swap", "profit", "loss", "chart", "graph", "analytics",
    "report", "history", "dashboard", "refresh", "realtime", "processing",
    "funds", "available", "apr", "withdraw", "limit", "verification",
    "protection", "average", "cost", "recurring", "address", "book",
    "confirm", "network", "blockchain", "maintenance", "position",
    "realized", "cancel", "status", "convertible", "tradable", "insufficient",
    "icon", "unfilled", "filled", "media", "radio", "document",
    "container", "collapse", "detail", "trend", "mini", "graphic",
    "boosted", "protected", "effective", "contracts", "trigger",
    "execution", "awaiting", "perpetual", "activate", "upgrades",
    "instantly", "additionally", "tradeable", "non-tradable",
    // Order and position screens
    "market order", "trigger order", "order preview", "order confirmation", "order form",
    "trade settings", "positions", "available funds", "schedule order", "trigger time",
    "cancel order", "unrealized p&l", "take profit", "stop loss", "close position",
    "estimated total value", "funding fee", "funding payment", "auto-deleveraging",
    "trading limit tier", "perpetual swap", "picture-in-picture", "order value",
    "max order value", "leverage", "multi-position mode", "open positions", "view holdings",
    "latest trade", "top traders",
    // Market overview
    "tab", "pnl", "funding", "trending", "favorites",
    "volume", "symbol", "banner", "badge", "calendar",
    "long", "short", "perp", "market", "trading",
    // Feed and news
    "feed", "news", "insights", "crypto", "price", "assets",
    "schedule", "vip", "vipstatus",
    "social", "events", "economic", "government", "user", "menu",
    // Earn and staking
    "stake", "staked", "pool", "rewards",
    "earnings", "launchpool", "convert", "auction",
    "sparks", "reward", "pixel",
    // Promotions and referral
    "claimed", "hub", "bonus", "promotion", "promotions", "tasks",
    "complete", "completed", "learn", "identity", "first", "referee",
    "referral", "link",
    // Notifications
    "notifications", "liquidation", "liquidated",
    "system", "notified", "alerts",
    "action", "announcement", "currency", "warning",
    "reached", "initial", "avoid", "successful", "amount", "application",
    // Dashboard and tiers
    "program", "league", "tier", "level", "benefits",
    "day", "time", "share", "empty",
    "secondary", "choice", "my", "basic",
    // Sign-in and registration
    "log", "password", "email", "input", "hint",
    "placeholder", "checkbox", "terms", "privacy", "notice",
    "create", "code", "fast", "pairs", "data",
    "services", "sso", "body", "title",
];

/// Counts keywords occurring as substrings of an already lower-cased corpus
pub fn count_matches(corpus_lower: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|keyword| corpus_lower.contains(&keyword.to_lowercase()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pattern_has_keywords() {
        for pattern in UiPattern::ALL {
            assert!(!pattern.keywords().is_empty(), "{} has no keywords", pattern);
        }
        for flow in FlowPattern::ALL {
            assert!(!flow.keywords().is_empty());
        }
    }

    #[test]
    fn test_pattern_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&UiPattern::FormInput).unwrap(),
            "\"form_input\""
        );
        assert_eq!(UiPattern::ModalPopup.to_string(), "modal_popup");
    }

    #[test]
    fn test_requirement_keywords_are_lowercase() {
        for keyword in REQUIREMENT_KEYWORDS {
            assert_eq!(*keyword, keyword.to_lowercase());
        }
    }

    #[test]
    fn test_count_matches() {
        let corpus = "login screen with password field";
        assert_eq!(count_matches(corpus, UiPattern::Authentication.keywords()), 2);
        assert_eq!(count_matches(corpus, UiPattern::Social.keywords()), 0);
    }
}
