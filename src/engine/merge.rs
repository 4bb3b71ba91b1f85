// ==========================================
// 主题样式配置系统 - 样式合并解析器
// ==========================================
// 职责: 把按优先级排好序的片段折叠成一份解析结果
// 红线: 纯函数,无状态、无 I/O;坏片段只跳过自身,不拖垮整体
// ==========================================

use crate::domain::fragment::StyleFragment;
use crate::domain::resolved::ResolvedStyleConfig;
use serde_json::{Map, Value};

// ==========================================
// StyleMergeResolver - 纯函数工具类
// ==========================================
pub struct StyleMergeResolver;

impl StyleMergeResolver {
    /// 合并片段序列为一份解析结果
    ///
    /// # 规则
    /// - 输入已按优先级排序,后面的片段逐属性覆盖前面的
    /// - 嵌套属性组逐键深合并;叶子属性与数组整体替换
    /// - 载荷解析失败的片段记日志后跳过,其余照常合并
    /// - 空输入返回空配置,不是错误
    pub fn resolve(fragments: &[StyleFragment]) -> ResolvedStyleConfig {
        Self::resolve_with_seed(Map::new(), fragments)
    }

    /// 以内置默认组为最低层进行合并
    ///
    /// # 参数
    /// - seed: 最低优先级的属性组映射(内置默认值)
    /// - fragments: 按优先级排序的片段
    pub fn resolve_with_seed(
        seed: Map<String, Value>,
        fragments: &[StyleFragment],
    ) -> ResolvedStyleConfig {
        let mut merged = seed;

        for fragment in fragments {
            match fragment.parse_payload() {
                Ok(groups) => Self::deep_merge(&mut merged, groups),
                Err(reason) => {
                    tracing::warn!(
                        "StyleMergeResolver: 跳过格式错误的片段 - fragment_id={}, reason={}",
                        fragment.id,
                        reason
                    );
                }
            }
        }

        ResolvedStyleConfig::from_group_map(merged)
    }

    /// 深合并: overlay 逐键并入 dest
    ///
    /// 两边都是对象时递归合并;否则 overlay 的值整体替换,
    /// 数组不做逐元素合并
    pub fn deep_merge(dest: &mut Map<String, Value>, overlay: Map<String, Value>) {
        for (key, value) in overlay {
            match value {
                Value::Object(incoming) => {
                    if let Some(Value::Object(existing)) = dest.get_mut(&key) {
                        Self::deep_merge(existing, incoming);
                        continue;
                    }
                    dest.insert(key, Value::Object(incoming));
                }
                // 叶子属性与数组整体替换
                leaf => {
                    dest.insert(key, leaf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Breakpoint, InteractionState, StyleScope};
    use chrono::NaiveDateTime;
    use serde_json::json;

    fn fragment(id: &str, payload: Value) -> StyleFragment {
        StyleFragment {
            id: id.to_string(),
            scope: StyleScope::Component,
            owner_key: "Button".to_string(),
            sub_key: None,
            payload: payload.to_string(),
            sort_order: 0,
            active: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn raw_fragment(id: &str, payload: &str) -> StyleFragment {
        let mut f = fragment(id, json!({}));
        f.payload = payload.to_string();
        f
    }

    #[test]
    fn test_later_fragment_wins_per_property() {
        let resolved = StyleMergeResolver::resolve(&[
            fragment("f1", json!({"base": {"background": "#fff", "color": "#111"}})),
            fragment("f2", json!({"base": {"background": "#000"}})),
        ]);

        assert_eq!(resolved.base.get("background"), Some(&json!("#000")));
        // 覆盖按属性进行,未触碰的属性保留
        assert_eq!(resolved.base.get("color"), Some(&json!("#111")));
    }

    #[test]
    fn test_nested_groups_merge_key_by_key() {
        let resolved = StyleMergeResolver::resolve(&[
            fragment("f1", json!({"responsive": {"mobile": {"padding": "8px"}}})),
            fragment("f2", json!({"responsive": {"tablet": {"padding": "16px"}}})),
        ]);

        assert_eq!(resolved.responsive.len(), 2);
        assert_eq!(
            resolved.responsive.get(&Breakpoint::Mobile).unwrap().get("padding"),
            Some(&json!("8px"))
        );
    }

    #[test]
    fn test_arrays_replaced_wholesale() {
        let resolved = StyleMergeResolver::resolve(&[
            fragment("f1", json!({"base": {"fontFamily": ["Inter", "sans-serif"]}})),
            fragment("f2", json!({"base": {"fontFamily": ["Georgia"]}})),
        ]);

        assert_eq!(resolved.base.get("fontFamily"), Some(&json!(["Georgia"])));
    }

    #[test]
    fn test_malformed_fragment_is_isolated() {
        let resolved = StyleMergeResolver::resolve(&[
            fragment("good1", json!({"base": {"color": "#111"}})),
            raw_fragment("bad", "{not json"),
            raw_fragment("scalar", "\"just a string\""),
            fragment("good2", json!({"base": {"padding": "4px"}})),
        ]);

        assert_eq!(resolved.base.get("color"), Some(&json!("#111")));
        assert_eq!(resolved.base.get("padding"), Some(&json!("4px")));
    }

    #[test]
    fn test_empty_input_resolves_to_empty_config() {
        let resolved = StyleMergeResolver::resolve(&[]);
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_seed_is_lowest_layer() {
        let seed = json!({"base": {"maxWidth": "1200px", "padding": "24px"}})
            .as_object()
            .cloned()
            .unwrap();
        let resolved = StyleMergeResolver::resolve_with_seed(
            seed,
            &[fragment("f1", json!({"base": {"padding": "12px"}}))],
        );

        assert_eq!(resolved.base.get("padding"), Some(&json!("12px")));
        assert_eq!(resolved.base.get("maxWidth"), Some(&json!("1200px")));
    }

    #[test]
    fn test_interaction_state_overlays_survive_merge() {
        let resolved = StyleMergeResolver::resolve(&[
            fragment("f1", json!({"hover": {"opacity": "0.8"}})),
            fragment("f2", json!({"hover": {"opacity": "0.9"}, "focus": {"outline": "none"}})),
        ]);

        assert_eq!(
            resolved.states.get(&InteractionState::Hover).unwrap().get("opacity"),
            Some(&json!("0.9"))
        );
        assert!(resolved.states.contains_key(&InteractionState::Focus));
    }
}
