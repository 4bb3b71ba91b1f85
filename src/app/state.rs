// ==========================================
// 主题样式配置系统 - 应用状态
// ==========================================
// 职责: 显式构造并持有全部服务实例
// 说明: 不使用模块级单例 —— 依赖在这里装配一次,
//       测试可以用独立存储构造隔离实例
// ==========================================

use std::sync::Arc;

use crate::api::{StyleApi, ThemeApi};
use crate::config::EngineSettings;
use crate::engine::cache::{self, ExpiringCache};
use crate::engine::component_resolver::ComponentStyleResolver;
use crate::engine::events::{StyleUpdateBus, StyleUpdatePublisher};
use crate::engine::page_resolver::PageStyleResolver;
use crate::engine::theme_resolver::ThemeResolver;
use crate::repository::store::{FragmentStore, ThemeStore};

/// 应用状态
///
/// 包含全部 API 实例与共享资源,由宿主应用在启动时构造并持有
pub struct AppState {
    /// 引擎设置
    pub settings: EngineSettings,

    /// 样式更新总线
    pub update_bus: Arc<StyleUpdateBus>,

    /// 主题解析器
    pub theme_resolver: Arc<ThemeResolver>,

    /// 页面样式解析器
    pub page_resolver: Arc<PageStyleResolver>,

    /// 组件样式解析器
    pub component_resolver: Arc<ComponentStyleResolver>,

    /// 主题管理 API
    pub theme_api: Arc<ThemeApi>,

    /// 样式 API
    pub style_api: Arc<StyleApi>,
}

impl AppState {
    /// 装配全部服务
    ///
    /// # 参数
    /// - fragment_store / theme_store: 外部配置存储的适配器
    /// - settings: 引擎调优参数
    pub fn new(
        fragment_store: Arc<dyn FragmentStore>,
        theme_store: Arc<dyn ThemeStore>,
        settings: EngineSettings,
    ) -> Self {
        let update_bus = Arc::new(StyleUpdateBus::new());
        let publisher: Arc<dyn StyleUpdatePublisher> = update_bus.clone();

        let theme_resolver = Arc::new(ThemeResolver::new(
            theme_store.clone(),
            fragment_store.clone(),
            publisher.clone(),
            &settings,
        ));
        let page_resolver = Arc::new(PageStyleResolver::new(
            fragment_store.clone(),
            theme_resolver.clone(),
            &settings,
        ));
        let component_resolver = Arc::new(ComponentStyleResolver::new(
            fragment_store.clone(),
            theme_resolver.clone(),
            &settings,
        ));

        let theme_api = Arc::new(ThemeApi::new(
            theme_store,
            theme_resolver.clone(),
            publisher,
        ));
        let style_api = Arc::new(StyleApi::new(
            fragment_store,
            theme_resolver.clone(),
            page_resolver.clone(),
            component_resolver.clone(),
            update_bus.clone(),
        ));

        tracing::info!(
            "AppState: 样式引擎已装配 - cache_ttl={:?}, sweep_interval={:?}",
            settings.cache_ttl,
            settings.sweep_interval
        );

        Self {
            settings,
            update_bus,
            theme_resolver,
            page_resolver,
            component_resolver,
            theme_api,
            style_api,
        }
    }

    /// 启动后台缓存清扫任务
    ///
    /// 固定间隔清扫全部解析器的缓存;返回任务句柄,
    /// 宿主应用关停时 abort 即可
    pub fn spawn_cache_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let mut caches: Vec<Arc<dyn ExpiringCache>> = Vec::new();
        caches.extend(self.theme_resolver.caches());
        caches.extend(self.page_resolver.caches());
        caches.extend(self.component_resolver.caches());

        cache::spawn_sweeper(caches, self.settings.sweep_interval)
    }
}
