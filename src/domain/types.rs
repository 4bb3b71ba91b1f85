// ==========================================
// 主题样式配置系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与存储行一致)
// 属性组键: 小写 (与样式载荷一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 样式作用域 (Style Scope)
// ==========================================
// 片段生效的层级,子级作用域携带 sub_key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StyleScope {
    Theme,            // 主题全局
    Page,             // 整页
    PageSection,      // 页面分区
    Component,        // 组件基础
    ComponentVariant, // 组件变体
}

impl StyleScope {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            StyleScope::Theme => "THEME",
            StyleScope::Page => "PAGE",
            StyleScope::PageSection => "PAGE_SECTION",
            StyleScope::Component => "COMPONENT",
            StyleScope::ComponentVariant => "COMPONENT_VARIANT",
        }
    }

    /// 该作用域的片段是否必须携带 sub_key
    pub fn requires_sub_key(&self) -> bool {
        matches!(self, StyleScope::PageSection | StyleScope::ComponentVariant)
    }
}

impl fmt::Display for StyleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 交互状态 (Interaction State)
// ==========================================
// 枚举顺序即合成时的伪类输出顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionState {
    Hover,
    Active,
    Focus,
    Disabled,
    Loading,
}

impl InteractionState {
    pub const ALL: [InteractionState; 5] = [
        InteractionState::Hover,
        InteractionState::Active,
        InteractionState::Focus,
        InteractionState::Disabled,
        InteractionState::Loading,
    ];

    /// 转换为属性组键 / 伪类名
    pub fn as_str(&self) -> &str {
        match self {
            InteractionState::Hover => "hover",
            InteractionState::Active => "active",
            InteractionState::Focus => "focus",
            InteractionState::Disabled => "disabled",
            InteractionState::Loading => "loading",
        }
    }

    /// 从属性组键识别交互状态
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|state| state.as_str() == key)
    }
}

impl fmt::Display for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 响应式断点 (Breakpoint)
// ==========================================
// 固定三档,媒体查询阈值见 CSS 合成器
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Mobile, Breakpoint::Tablet, Breakpoint::Desktop];

    /// 转换为属性组键
    pub fn as_str(&self) -> &str {
        match self {
            Breakpoint::Mobile => "mobile",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Desktop => "desktop",
        }
    }

    /// 从属性组键识别断点
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|bp| bp.as_str() == key)
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
