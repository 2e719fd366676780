use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Release, CHINESE_NUMBER_MAP};

// 使用 LazyLock 定义全局正则表达式，避免重复编译

// 匹配视频文件扩展名
static EXTENSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(?:mkv|mp4|avi|ts|webm)$").unwrap());

// 匹配技术规格，需要去掉，免得影响匹配集数
static TECHNICAL_SPECS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:-)?(?:fps|bit|kHz|Hz)").unwrap());

// 匹配开头的字幕组标签
static GROUP_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\s*").unwrap());

// 集数标记，按顺序尝试；第一个命中的同时决定标题在哪里结束
static SEASON_EPISODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bS(\d{1,2})\s?E(\d{1,4})\b").unwrap());
static CJK_EPISODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第(\d{1,4})[話话集]").unwrap());
static DASH_EPISODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" - (\d{1,4})(?:[vV]\d)?\b").unwrap());
static EXPLICIT_EPISODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:episode|ep|e)\s?(\d{1,4})\b").unwrap());
static BRACKET_EPISODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[(](\d{1,3})(?:[vV]\d)?[\])]").unwrap());

// 匹配季度信息的正则表达式
static SEASON_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bS(\d{1,2})\b|\bSeason\s*(\d{1,2})\b|第([0-9一二三四五六七八九十]+)[季期]")
        .unwrap()
});

// 匹配视频分辨率的正则表达式
static RESOLUTION_2160_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"2160|4096x2160|4K|4k").unwrap());
static RESOLUTION_1080_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"1080|1920x1080").unwrap());
static RESOLUTION_720_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"720|1280x720").unwrap());

// 匹配方括号和圆括号
static BRACKET_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\[\]()]").unwrap());

// 匹配所有标点符号、括号、特殊字符
static PUNCTUATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\u4e00-\u9fff\u3040-\u309f\u30a0-\u30ff]").unwrap());

// 匹配连续的空格
static MULTIPLE_SPACES_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

// 匹配英文字符的正则表达式
static EN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z]{3,}").unwrap());

// 匹配中日文字符的正则表达式
static CJK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u4e00-\u9fff\u3040-\u309f\u30a0-\u30ff]{2,}").unwrap());

// 与具体作品无关的宣传标记，出现在标题区时整个去掉
const NOISE_MARKERS: [&str; 3] = ["新番", "月番", "港澳台"];

// 方括号里的纯数字有时是分辨率而不是集数
const BARE_RESOLUTIONS: [i32; 3] = [480, 576, 720];

struct FoundEpisode {
    number: i32,
    season: Option<i32>,
    title_end: usize,
}

/// 动画文件名解析器
#[derive(Debug, Clone, Default)]
pub struct Parser;

impl Parser {
    /// 创建新的解析器实例
    pub fn new() -> Self {
        Self {}
    }

    /// 解析动画文件名。识别不出标题时返回 `None`，由调用方丢弃该条目。
    pub fn parse(&self, file_name: &str) -> Option<Release> {
        let raw = file_name.trim().replace('\n', " ");
        let processed = Self::pre_process(&raw);

        let (group, rest) = Self::split_group(&processed);

        let (episode, season_hint, title_end) = match Self::find_episode(rest) {
            Some(found) => (Some(found.number), found.season, found.title_end),
            None => (None, None, rest.len()),
        };

        let head = BRACKET_PATTERN.replace_all(&rest[..title_end], " ");
        let head = Self::drop_noise_tokens(&head);
        let (head, season_marker) = Self::extract_season(&head);

        let title = Self::pick_title(&head)?;

        Some(Release {
            title,
            episode,
            season: season_hint.or(season_marker),
            group,
            resolution: Self::find_resolution(&processed),
        })
    }

    /// 预处理文件名：统一括号、去掉下划线、扩展名和技术规格标记
    fn pre_process(raw: &str) -> String {
        let processed = raw
            .replace('【', "[")
            .replace('】', "]")
            .replace('～', "~")
            .replace('_', " ");

        let processed = EXTENSION_PATTERN.replace(&processed, "");

        TECHNICAL_SPECS_PATTERN
            .replace_all(&processed, "")
            .into_owned()
    }

    /// 从开头的方括号中提取字幕组信息
    fn split_group(s: &str) -> (Option<String>, &str) {
        match GROUP_PATTERN.captures(s) {
            Some(caps) => {
                let end = caps.get(0).map_or(0, |m| m.end());
                (caps.get(1).map(|m| m.as_str().to_string()), &s[end..])
            }
            None => (None, s),
        }
    }

    /// 按优先级尝试各种集数标记
    fn find_episode(s: &str) -> Option<FoundEpisode> {
        if let Some(caps) = SEASON_EPISODE_PATTERN.captures(s) {
            let m = caps.get(0)?;
            let number = caps.get(2).and_then(|g| g.as_str().parse().ok())?;
            return Some(FoundEpisode {
                number,
                season: caps.get(1).and_then(|g| g.as_str().parse().ok()),
                title_end: m.start(),
            });
        }

        for pattern in [
            &*CJK_EPISODE_PATTERN,
            &*DASH_EPISODE_PATTERN,
            &*EXPLICIT_EPISODE_PATTERN,
        ] {
            if let Some(caps) = pattern.captures(s) {
                let m = caps.get(0)?;
                let number = caps.get(1).and_then(|g| g.as_str().parse().ok())?;
                return Some(FoundEpisode {
                    number,
                    season: None,
                    title_end: m.start(),
                });
            }
        }

        // 方括号里的纯数字放最后，跳过分辨率值
        for caps in BRACKET_EPISODE_PATTERN.captures_iter(s) {
            let (Some(m), Some(g)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Ok(number) = g.as_str().parse::<i32>() else {
                continue;
            };
            if BARE_RESOLUTIONS.contains(&number) {
                continue;
            }
            return Some(FoundEpisode {
                number,
                season: None,
                title_end: m.start(),
            });
        }

        None
    }

    /// 移除与作品无关的宣传标记
    fn drop_noise_tokens(s: &str) -> String {
        s.split_whitespace()
            .filter(|token| !NOISE_MARKERS.iter().any(|marker| token.contains(marker)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 处理季度信息，返回去掉季度标记后的名称和季度数字
    fn extract_season(s: &str) -> (String, Option<i32>) {
        let Some(caps) = SEASON_PATTERN.captures(s) else {
            return (s.to_string(), None);
        };

        let season = caps
            .get(1)
            .or_else(|| caps.get(2))
            .and_then(|g| g.as_str().parse().ok())
            .or_else(|| caps.get(3).map(|g| Self::parse_season_numeral(g.as_str())));

        let stripped = match caps.get(0) {
            Some(m) => format!("{} {}", &s[..m.start()], &s[m.end()..]),
            None => s.to_string(),
        };

        (stripped, season)
    }

    fn parse_season_numeral(s: &str) -> i32 {
        s.parse()
            .ok()
            .or_else(|| CHINESE_NUMBER_MAP.get(s).copied())
            .unwrap_or(1)
    }

    /// 多语言标题时优先选择罗马字/英文标题（订阅侧的标题是罗马字）
    fn pick_title(s: &str) -> Option<String> {
        let parts: Vec<&str> = s.split('/').map(str::trim).filter(|p| !p.is_empty()).collect();

        let multilingual = parts.len() > 1
            && parts.iter().any(|p| CJK_PATTERN.is_match(p))
            && parts.iter().any(|p| EN_PATTERN.is_match(p));

        let chosen = if multilingual {
            parts
                .iter()
                .find(|p| EN_PATTERN.is_match(p) && !CJK_PATTERN.is_match(p))
                .copied()
                .unwrap_or(parts[0])
                .to_string()
        } else {
            s.to_string()
        };

        let cleaned = Self::clean_name(&chosen);
        (!cleaned.is_empty()).then_some(cleaned)
    }

    fn clean_name(name: &str) -> String {
        // 使用正则表达式替换所有标点符号、括号等为空格
        let result = PUNCTUATION_PATTERN.replace_all(name, " ").into_owned();

        // 处理连续的空格，替换为单个空格
        let result = MULTIPLE_SPACES_PATTERN.replace_all(&result, " ").into_owned();

        result.trim().to_string()
    }

    /// 从完整文件名中提取分辨率
    fn find_resolution(s: &str) -> Option<String> {
        if RESOLUTION_2160_PATTERN.is_match(s) {
            Some("2160P".to_string())
        } else if RESOLUTION_1080_PATTERN.is_match(s) {
            Some("1080P".to_string())
        } else if RESOLUTION_720_PATTERN.is_match(s) {
            Some("720P".to_string())
        } else {
            None
        }
    }
}
