// ==========================================
// 主题样式配置系统 - 样式片段实体
// ==========================================
// 职责: 定义持久化样式片段及其写入形态
// 约束: 片段读取后不可变,编辑产生新行,不原地修改已解析对象
// ==========================================

use crate::domain::types::StyleScope;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 持久化样式片段
///
/// 一条片段是某个作用域下的一片样式配置,payload 为序列化的
/// 嵌套属性组 JSON 对象(如 base/hover/responsive.mobile)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleFragment {
    /// 片段 ID
    pub id: String,
    /// 作用域
    pub scope: StyleScope,
    /// 归属键(页面名、组件名或主题 ID)
    pub owner_key: String,
    /// 子键(分区名或变体名,仅子级作用域使用)
    pub sub_key: Option<String>,
    /// 序列化的嵌套属性组 JSON
    pub payload: String,
    /// 合并顺序(小的先合并,大的后合并、优先生效)
    pub sort_order: i32,
    /// 是否启用
    pub active: bool,
    /// 创建时间
    pub created_at: NaiveDateTime,
    /// 最后修改时间
    pub updated_at: NaiveDateTime,
}

impl StyleFragment {
    /// 解析 payload 为属性组对象
    ///
    /// # 返回
    /// - Ok(Map): 顶层属性组映射
    /// - Err(String): 不是合法 JSON 或不是对象
    pub fn parse_payload(&self) -> Result<Map<String, Value>, String> {
        let value: Value =
            serde_json::from_str(&self.payload).map_err(|e| format!("JSON 解析失败: {}", e))?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Err("载荷不是属性组对象".to_string()),
        }
    }
}

/// 新建片段的写入形态(ID 与时间戳由存储分配)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStyleFragment {
    pub scope: StyleScope,
    pub owner_key: String,
    pub sub_key: Option<String>,
    pub payload: String,
    pub sort_order: i32,
    pub active: bool,
}

impl NewStyleFragment {
    /// 创建启用状态的新片段
    pub fn new(scope: StyleScope, owner_key: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            scope,
            owner_key: owner_key.into(),
            sub_key: None,
            payload: payload.into(),
            sort_order: 0,
            active: true,
        }
    }

    pub fn with_sub_key(mut self, sub_key: impl Into<String>) -> Self {
        self.sub_key = Some(sub_key.into());
        self
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// 片段的部分更新
///
/// 作用域与归属键创建后不可更改,只允许调整载荷、顺序与启用状态
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleFragmentPatch {
    pub payload: Option<String>,
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}

impl StyleFragmentPatch {
    /// 是否为空更新(没有任何字段)
    pub fn is_empty(&self) -> bool {
        self.payload.is_none() && self.sort_order.is_none() && self.active.is_none()
    }
}

/// 重排序条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentOrder {
    pub id: String,
    pub sort_order: i32,
}
