/// Structured result of parsing a release file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Title picked for matching against a subscription list. When the
    /// release name carries several scripts (CJK plus romaji/English), the
    /// Latin-script one is preferred.
    pub title: String,
    /// Episode number, when one could be recognized.
    pub episode: Option<i32>,
    /// Season number from `S2` / `Season 2` / `第二季` style markers.
    pub season: Option<i32>,
    /// Release group from the leading bracket tag.
    pub group: Option<String>,
    /// Video resolution tag, normalized to `720P` / `1080P` / `2160P`.
    pub resolution: Option<String>,
}

// 中文数字映射
pub(crate) static CHINESE_NUMBER_MAP: phf::Map<&'static str, i32> = phf::phf_map! {
    "一" => 1,
    "二" => 2,
    "三" => 3,
    "四" => 4,
    "五" => 5,
    "六" => 6,
    "七" => 7,
    "八" => 8,
    "九" => 9,
    "十" => 10,
};
