// ==========================================
// 主题样式配置系统 - 写入校验器
// ==========================================
// 职责: 在任何存储写入发生之前拦截坏输入
// 说明: 校验失败 → InvalidMutation,编辑界面原样展示;
//       先校验后写入,保证不产生部分写
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::fragment::{FragmentOrder, NewStyleFragment, StyleFragmentPatch};
use crate::domain::theme::NewTheme;
use serde_json::Value;
use std::collections::HashSet;

// ==========================================
// FragmentValidator - 纯函数工具类
// ==========================================
pub struct FragmentValidator;

impl FragmentValidator {
    /// 校验新建片段
    ///
    /// # 规则
    /// - owner_key 非空
    /// - 子级作用域(PAGE_SECTION/COMPONENT_VARIANT)必须携带非空 sub_key,
    ///   其余作用域不允许 sub_key
    /// - sort_order 非负
    /// - payload 是合法 JSON 对象
    pub fn validate_new(fragment: &NewStyleFragment) -> ApiResult<()> {
        if fragment.owner_key.trim().is_empty() {
            return Err(ApiError::InvalidMutation("owner_key 不能为空".to_string()));
        }

        if fragment.scope.requires_sub_key() {
            match fragment.sub_key.as_deref() {
                Some(sub) if !sub.trim().is_empty() => {}
                _ => {
                    return Err(ApiError::InvalidMutation(format!(
                        "作用域 {} 的片段必须携带非空 sub_key",
                        fragment.scope
                    )));
                }
            }
        } else if fragment.sub_key.is_some() {
            return Err(ApiError::InvalidMutation(format!(
                "作用域 {} 的片段不允许携带 sub_key",
                fragment.scope
            )));
        }

        if fragment.sort_order < 0 {
            return Err(ApiError::InvalidMutation("sort_order 不能为负数".to_string()));
        }

        Self::validate_payload(&fragment.payload)
    }

    /// 校验片段更新
    pub fn validate_patch(patch: &StyleFragmentPatch) -> ApiResult<()> {
        if patch.is_empty() {
            return Err(ApiError::InvalidMutation("空的更新请求".to_string()));
        }
        if let Some(sort_order) = patch.sort_order {
            if sort_order < 0 {
                return Err(ApiError::InvalidMutation("sort_order 不能为负数".to_string()));
            }
        }
        if let Some(payload) = &patch.payload {
            Self::validate_payload(payload)?;
        }
        Ok(())
    }

    /// 校验重排序请求
    pub fn validate_reorder(orders: &[FragmentOrder]) -> ApiResult<()> {
        if orders.is_empty() {
            return Err(ApiError::InvalidMutation("重排序列表不能为空".to_string()));
        }

        let mut seen = HashSet::new();
        for order in orders {
            if order.id.trim().is_empty() {
                return Err(ApiError::InvalidMutation("重排序条目缺少片段 ID".to_string()));
            }
            if order.sort_order < 0 {
                return Err(ApiError::InvalidMutation("sort_order 不能为负数".to_string()));
            }
            if !seen.insert(order.id.as_str()) {
                return Err(ApiError::InvalidMutation(format!(
                    "重排序列表中片段重复: {}",
                    order.id
                )));
            }
        }
        Ok(())
    }

    /// 校验新建主题
    pub fn validate_new_theme(theme: &NewTheme) -> ApiResult<()> {
        if theme.name.trim().is_empty() {
            return Err(ApiError::InvalidMutation("主题名称不能为空".to_string()));
        }
        Ok(())
    }

    /// payload 必须是合法 JSON 对象
    ///
    /// 只做形状检查,不校验 CSS 属性值本身
    fn validate_payload(raw: &str) -> ApiResult<()> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| ApiError::InvalidMutation(format!("载荷不是合法 JSON: {}", e)))?;
        if !value.is_object() {
            return Err(ApiError::InvalidMutation("载荷必须是属性组对象".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::StyleScope;

    #[test]
    fn test_owner_key_required() {
        let fragment = NewStyleFragment::new(StyleScope::Page, "  ", "{}");
        assert!(FragmentValidator::validate_new(&fragment).is_err());
    }

    #[test]
    fn test_sub_key_rules_per_scope() {
        let missing = NewStyleFragment::new(StyleScope::ComponentVariant, "Button", "{}");
        assert!(FragmentValidator::validate_new(&missing).is_err());

        let ok = NewStyleFragment::new(StyleScope::ComponentVariant, "Button", "{}")
            .with_sub_key("primary");
        assert!(FragmentValidator::validate_new(&ok).is_ok());

        let stray = NewStyleFragment::new(StyleScope::Page, "home", "{}").with_sub_key("hero");
        assert!(FragmentValidator::validate_new(&stray).is_err());
    }

    #[test]
    fn test_payload_must_be_json_object() {
        let bad_json = NewStyleFragment::new(StyleScope::Page, "home", "{not json");
        assert!(FragmentValidator::validate_new(&bad_json).is_err());

        let not_object = NewStyleFragment::new(StyleScope::Page, "home", "[1, 2]");
        assert!(FragmentValidator::validate_new(&not_object).is_err());

        let ok = NewStyleFragment::new(StyleScope::Page, "home", r#"{"base": {}}"#);
        assert!(FragmentValidator::validate_new(&ok).is_ok());
    }

    #[test]
    fn test_patch_rules() {
        assert!(FragmentValidator::validate_patch(&StyleFragmentPatch::default()).is_err());

        let bad_order = StyleFragmentPatch { sort_order: Some(-1), ..Default::default() };
        assert!(FragmentValidator::validate_patch(&bad_order).is_err());

        let ok = StyleFragmentPatch { active: Some(false), ..Default::default() };
        assert!(FragmentValidator::validate_patch(&ok).is_ok());
    }

    #[test]
    fn test_reorder_rejects_duplicates() {
        let orders = vec![
            FragmentOrder { id: "f1".to_string(), sort_order: 0 },
            FragmentOrder { id: "f1".to_string(), sort_order: 1 },
        ];
        assert!(FragmentValidator::validate_reorder(&orders).is_err());
        assert!(FragmentValidator::validate_reorder(&[]).is_err());
    }
}
