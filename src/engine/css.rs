// ==========================================
// 主题样式配置系统 - CSS 合成器
// ==========================================
// 职责: 把解析结果转成样式表文本,把主题令牌转成 CSS 变量声明
// 红线: 纯函数,不校验属性值;缺失的组不输出空块
// ==========================================

use crate::domain::resolved::{ResolvedStyleConfig, StyleProperties};
use crate::domain::theme::Theme;
use crate::domain::types::Breakpoint;
use serde_json::Value;

// ==========================================
// CssSynthesizer - 纯函数工具类
// ==========================================
pub struct CssSynthesizer;

impl CssSynthesizer {
    /// 解析结果 → 样式表文本
    ///
    /// # 输出结构
    /// - base 组: 扁平的 `属性: 值;` 声明
    /// - 每个存在的交互状态组: 一个 `&:状态 { … }` 块
    /// - 每个存在的断点组: 一个 `@media … { … }` 块
    ///
    /// variants 不直接合成,调用方须先把变体折叠进 base;
    /// 扩展袋里的未识别组一律忽略,不报错
    pub fn generate_css_styles(config: &ResolvedStyleConfig) -> String {
        let mut out = String::new();

        Self::push_declarations(&mut out, &config.base, "");

        for (state, props) in &config.states {
            if props.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("&:");
            out.push_str(state.as_str());
            out.push_str(" {\n");
            Self::push_declarations(&mut out, props, "  ");
            out.push_str("}\n");
        }

        for (breakpoint, props) in &config.responsive {
            if props.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("@media ");
            out.push_str(Self::media_condition(*breakpoint));
            out.push_str(" {\n");
            Self::push_declarations(&mut out, props, "  ");
            out.push_str("}\n");
        }

        out
    }

    /// 主题令牌 → `:root` CSS 变量声明块
    pub fn generate_theme_variables(theme: &Theme) -> String {
        let mut out = String::from(":root {\n");
        for (prefix, tokens) in theme.token_groups() {
            for (key, value) in tokens {
                out.push_str("  --");
                out.push_str(prefix);
                out.push('-');
                out.push_str(&Self::normalize_property_name(key));
                out.push_str(": ");
                out.push_str(value);
                out.push_str(";\n");
            }
        }
        out.push_str("}\n");
        out
    }

    /// 断点对应的媒体查询条件(阈值固定)
    pub fn media_condition(breakpoint: Breakpoint) -> &'static str {
        match breakpoint {
            Breakpoint::Mobile => "(max-width: 768px)",
            Breakpoint::Tablet => "(min-width: 769px) and (max-width: 1024px)",
            Breakpoint::Desktop => "(min-width: 1025px)",
        }
    }

    /// 结构化属性名 → 连字符 CSS 属性名
    ///
    /// backgroundColor → background-color;下划线同样转连字符;
    /// `--` 开头的自定义属性原样保留
    pub fn normalize_property_name(name: &str) -> String {
        if name.starts_with("--") {
            return name.to_string();
        }

        let mut out = String::with_capacity(name.len() + 4);
        for ch in name.chars() {
            if ch.is_ascii_uppercase() {
                out.push('-');
                out.push(ch.to_ascii_lowercase());
            } else if ch == '_' {
                out.push('-');
            } else {
                out.push(ch);
            }
        }
        out
    }

    fn push_declarations(out: &mut String, props: &StyleProperties, indent: &str) {
        for (name, value) in props {
            if let Some(rendered) = Self::render_value(value) {
                out.push_str(indent);
                out.push_str(&Self::normalize_property_name(name));
                out.push_str(": ");
                out.push_str(&rendered);
                out.push_str(";\n");
            }
        }
    }

    /// 属性值 → CSS 字面量
    ///
    /// 数组按逗号拼接(字体栈等);对象与 null 不是叶子值,跳过
    fn render_value(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().filter_map(Self::render_value).collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(", "))
                }
            }
            Value::Object(_) | Value::Null => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::defaults;
    use serde_json::json;

    fn config(value: serde_json::Value) -> ResolvedStyleConfig {
        ResolvedStyleConfig::from_group_map(value.as_object().cloned().unwrap_or_default())
    }

    #[test]
    fn test_base_only_emits_no_blocks() {
        let css = CssSynthesizer::generate_css_styles(&config(json!({
            "base": {"backgroundColor": "#fff", "padding": "12px"},
        })));

        assert_eq!(css, "background-color: #fff;\npadding: 12px;\n");
        assert!(!css.contains("&:"));
        assert!(!css.contains("@media"));
    }

    #[test]
    fn test_pseudo_state_block() {
        let css = CssSynthesizer::generate_css_styles(&config(json!({
            "base": {"color": "#111"},
            "hover": {"color": "#000"},
        })));

        assert!(css.contains("&:hover {\n  color: #000;\n}\n"));
    }

    #[test]
    fn test_mobile_emits_exactly_one_media_block() {
        let css = CssSynthesizer::generate_css_styles(&config(json!({
            "responsive": {"mobile": {"fontSize": "14px"}},
        })));

        assert_eq!(css.matches("@media").count(), 1);
        assert!(css.contains("@media (max-width: 768px) {\n  font-size: 14px;\n}\n"));
    }

    #[test]
    fn test_tablet_and_desktop_thresholds() {
        let css = CssSynthesizer::generate_css_styles(&config(json!({
            "responsive": {
                "tablet": {"padding": "16px"},
                "desktop": {"padding": "24px"},
            },
        })));

        assert!(css.contains("@media (min-width: 769px) and (max-width: 1024px)"));
        assert!(css.contains("@media (min-width: 1025px)"));
    }

    #[test]
    fn test_variants_and_extra_groups_are_not_synthesized() {
        let css = CssSynthesizer::generate_css_styles(&config(json!({
            "base": {"color": "#111"},
            "variants": {"primary": {"color": "#fff"}},
            "print": {"display": "none"},
        })));

        assert!(!css.contains("primary"));
        assert!(!css.contains("display"));
    }

    #[test]
    fn test_empty_config_emits_nothing() {
        let css = CssSynthesizer::generate_css_styles(&ResolvedStyleConfig::default());
        assert!(css.is_empty());
    }

    #[test]
    fn test_value_rendering() {
        let css = CssSynthesizer::generate_css_styles(&config(json!({
            "base": {
                "fontFamily": ["Inter", "sans-serif"],
                "zIndex": 10,
                "nested": {"not": "a leaf"},
            },
        })));

        assert!(css.contains("font-family: Inter, sans-serif;"));
        assert!(css.contains("z-index: 10;"));
        assert!(!css.contains("not"));
    }

    #[test]
    fn test_property_name_normalization() {
        assert_eq!(CssSynthesizer::normalize_property_name("backgroundColor"), "background-color");
        assert_eq!(CssSynthesizer::normalize_property_name("max_width"), "max-width");
        assert_eq!(CssSynthesizer::normalize_property_name("margin"), "margin");
        assert_eq!(CssSynthesizer::normalize_property_name("--color-primary"), "--color-primary");
    }

    #[test]
    fn test_theme_variables_block() {
        let css = CssSynthesizer::generate_theme_variables(&defaults::default_theme());

        assert!(css.starts_with(":root {\n"));
        assert!(css.ends_with("}\n"));
        assert!(css.contains("  --color-primary: #3b82f6;\n"));
        assert!(css.contains("  --spacing-md: 16px;\n"));
        assert!(css.contains("  --font-size-base: 16px;\n"));
    }
}
