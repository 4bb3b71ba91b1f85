// ==========================================
// 主题样式配置系统 - 内置默认值
// ==========================================
// 职责: 提供零配置时的兜底样式
// 约束: 存储不可达或记录缺失时,渲染方仍能拿到可用的样式对象
// ==========================================

use crate::domain::theme::{Theme, TokenMap};
use chrono::NaiveDateTime;
use serde_json::{json, Map, Value};

/// 内置默认主题的 ID
pub const DEFAULT_THEME_ID: &str = "default";

/// 内置默认主题
///
/// 存储不可达或没有激活主题记录时的回退令牌集
pub fn default_theme() -> Theme {
    Theme {
        id: DEFAULT_THEME_ID.to_string(),
        name: "内置默认主题".to_string(),
        palette_tokens: token_map(&[
            ("primary", "#3b82f6"),
            ("secondary", "#64748b"),
            ("surface", "#ffffff"),
            ("background", "#f8fafc"),
            ("text", "#111827"),
            ("muted", "#6b7280"),
            ("border", "#e2e8f0"),
            ("danger", "#dc2626"),
            ("success", "#16a34a"),
        ]),
        type_tokens: token_map(&[
            ("family", "system-ui, -apple-system, sans-serif"),
            ("sizeBase", "16px"),
            ("sizeSmall", "14px"),
            ("sizeHeading", "24px"),
            ("lineHeight", "1.6"),
            ("weightBold", "600"),
        ]),
        spacing_tokens: token_map(&[
            ("xs", "4px"),
            ("sm", "8px"),
            ("md", "16px"),
            ("lg", "24px"),
            ("xl", "32px"),
        ]),
        radius_tokens: token_map(&[
            ("sm", "4px"),
            ("md", "8px"),
            ("lg", "16px"),
            ("pill", "9999px"),
        ]),
        elevation_tokens: token_map(&[
            ("low", "0 1px 2px rgba(0, 0, 0, 0.08)"),
            ("medium", "0 4px 12px rgba(0, 0, 0, 0.12)"),
            ("high", "0 12px 32px rgba(0, 0, 0, 0.18)"),
        ]),
        active: false,
        updated_at: NaiveDateTime::default(),
    }
}

/// 页面布局的内置默认属性组
///
/// 零片段的页面也要有合理的版心与留白
pub fn page_layout_defaults() -> Map<String, Value> {
    group_map(json!({
        "base": {
            "maxWidth": "1200px",
            "padding": "24px",
            "margin": "0 auto",
        }
    }))
}

/// 常见组件名的兜底声明
///
/// 未配置任何片段的已知组件按这里的属性组渲染;
/// 未知组件名返回 None,由调用方按空配置处理
pub fn component_fallback(component_name: &str) -> Option<Map<String, Value>> {
    let groups = match component_name.to_ascii_lowercase().as_str() {
        "button" => json!({
            "base": {
                "padding": "8px 16px",
                "borderRadius": "6px",
                "backgroundColor": "#3b82f6",
                "color": "#ffffff",
                "border": "none",
                "cursor": "pointer",
            },
            "hover": {"opacity": "0.9"},
            "disabled": {"opacity": "0.5", "cursor": "not-allowed"},
        }),
        "input" => json!({
            "base": {
                "padding": "8px 12px",
                "borderRadius": "6px",
                "border": "1px solid #e2e8f0",
                "backgroundColor": "#ffffff",
                "color": "#111827",
            },
            "focus": {"borderColor": "#3b82f6", "outline": "none"},
        }),
        "card" => json!({
            "base": {
                "padding": "24px",
                "borderRadius": "8px",
                "backgroundColor": "#ffffff",
                "boxShadow": "0 1px 2px rgba(0, 0, 0, 0.08)",
            }
        }),
        "navbar" => json!({
            "base": {
                "padding": "12px 24px",
                "backgroundColor": "#ffffff",
                "borderBottom": "1px solid #e2e8f0",
            }
        }),
        "footer" => json!({
            "base": {
                "padding": "24px",
                "backgroundColor": "#f8fafc",
                "color": "#6b7280",
            }
        }),
        "link" => json!({
            "base": {"color": "#3b82f6", "textDecoration": "none"},
            "hover": {"textDecoration": "underline"},
        }),
        _ => return None,
    };

    Some(group_map(groups))
}

fn token_map(pairs: &[(&str, &str)]) -> TokenMap {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn group_map(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}
