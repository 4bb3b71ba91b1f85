// ==========================================
// 主题样式配置系统 - 解析结果对象
// ==========================================
// 职责: 承载合并完成的样式配置,属性组为封闭集合
// 约束: 临时派生对象,只存在于缓存条目内,消费方拿到只读视图
// ==========================================

use crate::domain::types::{Breakpoint, InteractionState};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 扁平属性映射: 结构化属性名 → 字面值
///
/// BTreeMap 保证迭代顺序稳定,重复解析结果逐字节一致
pub type StyleProperties = BTreeMap<String, Value>;

/// 解析完成的样式配置
///
/// 属性组为封闭集合: base、交互状态、变体、响应式断点,
/// 其余未识别的组进入扩展袋 extra,不报错也不丢失
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedStyleConfig {
    /// 基础属性组
    pub base: StyleProperties,
    /// 交互状态覆盖 (hover/active/focus/disabled/loading)
    pub states: BTreeMap<InteractionState, StyleProperties>,
    /// 变体映射: 变体名 → 扁平属性
    pub variants: BTreeMap<String, StyleProperties>,
    /// 响应式覆盖: 断点 → 扁平属性
    pub responsive: BTreeMap<Breakpoint, StyleProperties>,
    /// 扩展袋: 未识别的属性组
    pub extra: BTreeMap<String, StyleProperties>,
}

impl ResolvedStyleConfig {
    /// 是否为空配置
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
            && self.states.is_empty()
            && self.variants.is_empty()
            && self.responsive.is_empty()
            && self.extra.is_empty()
    }

    /// 从合并后的顶层属性组映射归类构建
    ///
    /// # 归类规则
    /// - "base" 与顶层标量 → base
    /// - hover/active/focus/disabled/loading → states
    /// - "variants" 下的对象条目 → variants
    /// - "responsive" 下的已知断点 → responsive,未知断点 → extra("responsive.{键}")
    /// - 其余对象值的组 → extra
    pub fn from_group_map(groups: Map<String, Value>) -> Self {
        let mut config = ResolvedStyleConfig::default();

        for (key, value) in groups {
            let group = match value {
                Value::Object(group) => group,
                scalar => {
                    // 无组包装的顶层属性按基础属性处理
                    config.base.insert(key, scalar);
                    continue;
                }
            };

            if key == "base" {
                config.base.extend(flatten(group));
            } else if let Some(state) = InteractionState::from_key(&key) {
                config.states.insert(state, flatten(group));
            } else if key == "variants" {
                for (name, entry) in group {
                    match entry {
                        Value::Object(props) => {
                            config.variants.insert(name, flatten(props));
                        }
                        _ => {
                            tracing::debug!(
                                "ResolvedStyleConfig: 忽略非对象的变体定义 - variant={}",
                                name
                            );
                        }
                    }
                }
            } else if key == "responsive" {
                for (bp_key, entry) in group {
                    match entry {
                        Value::Object(props) => match Breakpoint::from_key(&bp_key) {
                            Some(bp) => {
                                config.responsive.insert(bp, flatten(props));
                            }
                            None => {
                                config
                                    .extra
                                    .insert(format!("responsive.{}", bp_key), flatten(props));
                            }
                        },
                        _ => {
                            tracing::debug!(
                                "ResolvedStyleConfig: 忽略非对象的断点定义 - breakpoint={}",
                                bp_key
                            );
                        }
                    }
                }
            } else {
                config.extra.insert(key, flatten(group));
            }
        }

        config
    }

    /// 还原为顶层属性组映射,供上层再次参与深合并
    pub fn to_group_map(&self) -> Map<String, Value> {
        let mut groups = Map::new();

        if !self.base.is_empty() {
            groups.insert("base".to_string(), props_to_value(&self.base));
        }
        for (state, props) in &self.states {
            groups.insert(state.as_str().to_string(), props_to_value(props));
        }
        if !self.variants.is_empty() {
            let mut variants = Map::new();
            for (name, props) in &self.variants {
                variants.insert(name.clone(), props_to_value(props));
            }
            groups.insert("variants".to_string(), Value::Object(variants));
        }
        if !self.responsive.is_empty() {
            let mut responsive = Map::new();
            for (bp, props) in &self.responsive {
                responsive.insert(bp.as_str().to_string(), props_to_value(props));
            }
            groups.insert("responsive".to_string(), Value::Object(responsive));
        }
        for (key, props) in &self.extra {
            groups.insert(key.clone(), props_to_value(props));
        }

        groups
    }

    /// 把指定变体折叠进 base
    ///
    /// 变体属性逐键覆盖基础属性;变体不存在时返回原配置的拷贝
    pub fn with_variant_applied(&self, variant: &str) -> Self {
        let mut merged = self.clone();
        if let Some(props) = self.variants.get(variant) {
            for (name, value) in props {
                merged.base.insert(name.clone(), value.clone());
            }
        }
        merged
    }

    /// 按渲染实例的优先级展开扁平属性
    ///
    /// 优先级: base < 选中变体 < 当前交互状态 < 当前断点覆盖,
    /// 逐属性覆盖,后面的层整属性获胜
    pub fn instance_properties(
        &self,
        variant: Option<&str>,
        state: Option<InteractionState>,
        breakpoint: Option<Breakpoint>,
    ) -> StyleProperties {
        let mut props = self.base.clone();

        if let Some(name) = variant {
            if let Some(overlay) = self.variants.get(name) {
                props.extend(overlay.clone());
            }
        }
        if let Some(state) = state {
            if let Some(overlay) = self.states.get(&state) {
                props.extend(overlay.clone());
            }
        }
        if let Some(bp) = breakpoint {
            if let Some(overlay) = self.responsive.get(&bp) {
                props.extend(overlay.clone());
            }
        }

        props
    }
}

/// 属性组对象转为扁平属性映射(保留数组与嵌套值原样)
fn flatten(group: Map<String, Value>) -> StyleProperties {
    group.into_iter().collect()
}

fn props_to_value(props: &StyleProperties) -> Value {
    Value::Object(props.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn group_map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_classification_of_known_groups() {
        let config = ResolvedStyleConfig::from_group_map(group_map(json!({
            "base": {"background": "#fff"},
            "hover": {"opacity": "0.9"},
            "variants": {"primary": {"background": "#3b82f6"}},
            "responsive": {"mobile": {"fontSize": "14px"}},
        })));

        assert_eq!(config.base.get("background"), Some(&json!("#fff")));
        assert_eq!(
            config.states.get(&InteractionState::Hover).unwrap().get("opacity"),
            Some(&json!("0.9"))
        );
        assert_eq!(
            config.variants.get("primary").unwrap().get("background"),
            Some(&json!("#3b82f6"))
        );
        assert_eq!(
            config.responsive.get(&Breakpoint::Mobile).unwrap().get("fontSize"),
            Some(&json!("14px"))
        );
    }

    #[test]
    fn test_top_level_scalars_go_to_base() {
        let config = ResolvedStyleConfig::from_group_map(group_map(json!({
            "padding": "12px",
            "base": {"margin": "0"},
        })));

        assert_eq!(config.base.get("padding"), Some(&json!("12px")));
        assert_eq!(config.base.get("margin"), Some(&json!("0")));
    }

    #[test]
    fn test_unknown_groups_land_in_extra() {
        let config = ResolvedStyleConfig::from_group_map(group_map(json!({
            "print": {"display": "none"},
            "responsive": {"widescreen": {"maxWidth": "1600px"}},
        })));

        assert!(config.extra.contains_key("print"));
        assert!(config.extra.contains_key("responsive.widescreen"));
        assert!(config.responsive.is_empty());
    }

    #[test]
    fn test_with_variant_applied_overrides_base() {
        let config = ResolvedStyleConfig::from_group_map(group_map(json!({
            "base": {"background": "#fff", "color": "#111"},
            "variants": {"primary": {"background": "#3b82f6"}},
        })));

        let applied = config.with_variant_applied("primary");
        assert_eq!(applied.base.get("background"), Some(&json!("#3b82f6")));
        assert_eq!(applied.base.get("color"), Some(&json!("#111")));
        // 未命中的变体不改动任何属性
        let untouched = config.with_variant_applied("ghost");
        assert_eq!(untouched.base, config.base);
    }

    #[test]
    fn test_instance_properties_precedence() {
        let config = ResolvedStyleConfig::from_group_map(group_map(json!({
            "base": {"background": "#fff"},
            "variants": {"primary": {"background": "#3b82f6"}},
            "hover": {"background": "#2563eb"},
            "responsive": {"mobile": {"background": "#1d4ed8"}},
        })));

        let props = config.instance_properties(
            Some("primary"),
            Some(InteractionState::Hover),
            Some(Breakpoint::Mobile),
        );
        // 断点覆盖排在最后,最具体者生效
        assert_eq!(props.get("background"), Some(&json!("#1d4ed8")));

        let props = config.instance_properties(Some("primary"), None, None);
        assert_eq!(props.get("background"), Some(&json!("#3b82f6")));
    }

    #[test]
    fn test_group_map_round_trip() {
        let groups = group_map(json!({
            "base": {"background": "#fff"},
            "hover": {"opacity": "0.9"},
            "responsive": {"tablet": {"padding": "16px"}},
        }));
        let config = ResolvedStyleConfig::from_group_map(groups.clone());
        let restored = ResolvedStyleConfig::from_group_map(config.to_group_map());
        assert_eq!(config, restored);
    }
}
