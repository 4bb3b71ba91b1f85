// ==========================================
// 主题样式配置系统 - 领域层
// ==========================================
// 职责: 定义样式片段、主题、解析结果等核心实体
// 约束: 实体一经读取即视为不可变,编辑走存储适配层
// ==========================================

pub mod defaults;
pub mod fragment;
pub mod resolved;
pub mod theme;
pub mod types;

// 重导出核心实体
pub use fragment::{FragmentOrder, NewStyleFragment, StyleFragment, StyleFragmentPatch};
pub use resolved::{ResolvedStyleConfig, StyleProperties};
pub use theme::{NewTheme, Theme, ThemePatch};
pub use types::{Breakpoint, InteractionState, StyleScope};
