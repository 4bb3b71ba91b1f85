// ==========================================
// 主题样式配置系统 - 主题实体
// ==========================================
// 职责: 定义主题及其五组设计令牌
// 约束: 全局同时只允许一个激活主题,由存储的互斥激活保证
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 设计令牌组: 令牌名 → 字面值
pub type TokenMap = BTreeMap<String, String>;

/// 主题
///
/// 五组设计令牌构成主题的基础令牌集,解析与 CSS 变量合成都以此为源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// 主题 ID
    pub id: String,
    /// 主题名称
    pub name: String,
    /// 调色板令牌
    pub palette_tokens: TokenMap,
    /// 字体排印令牌
    pub type_tokens: TokenMap,
    /// 间距令牌
    pub spacing_tokens: TokenMap,
    /// 圆角令牌
    pub radius_tokens: TokenMap,
    /// 投影令牌
    pub elevation_tokens: TokenMap,
    /// 是否为当前激活主题
    pub active: bool,
    /// 最后修改时间
    pub updated_at: NaiveDateTime,
}

impl Theme {
    /// 按 CSS 变量前缀列出全部令牌组
    ///
    /// 顺序固定,合成的变量声明按此顺序输出
    pub fn token_groups(&self) -> [(&'static str, &TokenMap); 5] {
        [
            ("color", &self.palette_tokens),
            ("font", &self.type_tokens),
            ("spacing", &self.spacing_tokens),
            ("radius", &self.radius_tokens),
            ("shadow", &self.elevation_tokens),
        ]
    }
}

/// 新建主题的写入形态(ID 与时间戳由存储分配)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTheme {
    pub name: String,
    pub palette_tokens: TokenMap,
    pub type_tokens: TokenMap,
    pub spacing_tokens: TokenMap,
    pub radius_tokens: TokenMap,
    pub elevation_tokens: TokenMap,
    /// 创建即激活(存储层会先互斥停用其他主题)
    pub active: bool,
}

impl NewTheme {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// 主题的部分更新
///
/// 激活状态不走 patch,由互斥激活操作单独处理
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemePatch {
    pub name: Option<String>,
    pub palette_tokens: Option<TokenMap>,
    pub type_tokens: Option<TokenMap>,
    pub spacing_tokens: Option<TokenMap>,
    pub radius_tokens: Option<TokenMap>,
    pub elevation_tokens: Option<TokenMap>,
}

impl ThemePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.palette_tokens.is_none()
            && self.type_tokens.is_none()
            && self.spacing_tokens.is_none()
            && self.radius_tokens.is_none()
            && self.elevation_tokens.is_none()
    }
}
