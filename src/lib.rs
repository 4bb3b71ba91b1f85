// ==========================================
// 主题样式配置系统 - 核心库
// ==========================================
// 技术栈: Rust + Tokio + 外部配置存储
// 系统定位: 内容管理后台的运行时样式解析引擎
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 存储适配层 - 外部配置存储网关
pub mod repository;

// 引擎层 - 解析、合并、缓存、合成
pub mod engine;

// 配置层 - 引擎调优参数
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 消费方接口
pub mod api;

// 应用层 - 组合根
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Breakpoint, InteractionState, StyleScope};

// 领域实体
pub use domain::{
    FragmentOrder, NewStyleFragment, NewTheme, ResolvedStyleConfig, StyleFragment,
    StyleFragmentPatch, StyleProperties, Theme, ThemePatch,
};

// 存储适配
pub use repository::{FragmentStore, InMemoryStyleStore, StoreError, StoreResult, ThemeStore};

// 引擎
pub use engine::{
    ComponentStyleResolver, CssSynthesizer, PageStyleResolver, StyleChangeKind,
    StyleMergeResolver, StyleUpdateBus, StyleUpdateEvent, StyleUpdatePublisher, SubscriptionId,
    ThemeResolver, ThemeState, TtlCache,
};

// API
pub use api::{ApiError, ApiResult, StyleApi, ThemeApi};

// 配置与组合根
pub use app::AppState;
pub use config::EngineSettings;
