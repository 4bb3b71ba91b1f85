// ==========================================
// 主题样式配置系统 - 主题解析器
// ==========================================
// 职责: 解析激活主题与主题级样式组,管理主题切换
// 红线: 读路径永不失败 —— 存储不可达或无激活记录时
//       回退内置默认主题,并缓存回退结果避免反复打存储
// ==========================================

use crate::config::EngineSettings;
use crate::domain::defaults;
use crate::domain::resolved::ResolvedStyleConfig;
use crate::domain::theme::Theme;
use crate::domain::types::StyleScope;
use crate::engine::cache::{ExpiringCache, TtlCache};
use crate::engine::events::{StyleChangeKind, StyleUpdateEvent, StyleUpdatePublisher};
use crate::engine::merge::StyleMergeResolver;
use crate::repository::store::{FragmentStore, ThemeStore};
use crate::repository::StoreResult;
use std::sync::{Arc, Mutex};

/// 激活主题缓存键
const ACTIVE_THEME_CACHE_KEY: &str = "theme:active";

/// 主题解析状态
///
/// 首次成功读到激活记录前停留在 NoActiveTheme;
/// 回退到内置默认主题不算成功读取,不发生状态迁移
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeState {
    NoActiveTheme,
    ActiveTheme(String),
}

/// 主题解析器
pub struct ThemeResolver {
    theme_store: Arc<dyn ThemeStore>,
    fragment_store: Arc<dyn FragmentStore>,
    theme_cache: Arc<TtlCache<Arc<Theme>>>,
    group_cache: Arc<TtlCache<Arc<ResolvedStyleConfig>>>,
    publisher: Arc<dyn StyleUpdatePublisher>,
    state: Mutex<ThemeState>,
}

impl ThemeResolver {
    pub fn new(
        theme_store: Arc<dyn ThemeStore>,
        fragment_store: Arc<dyn FragmentStore>,
        publisher: Arc<dyn StyleUpdatePublisher>,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            theme_store,
            fragment_store,
            theme_cache: Arc::new(TtlCache::new("theme", settings.cache_ttl)),
            group_cache: Arc::new(TtlCache::new("theme-groups", settings.cache_ttl)),
            publisher,
            state: Mutex::new(ThemeState::NoActiveTheme),
        }
    }

    /// 解析当前激活主题
    ///
    /// # 返回
    /// - Arc<Theme>: 激活主题;无激活记录或存储不可达时为内置默认主题
    ///
    /// 回退结果同样写入缓存,存储持续故障时不会每次渲染都打一次往返
    pub async fn get_active_theme(&self) -> Arc<Theme> {
        if let Some(theme) = self.theme_cache.get(ACTIVE_THEME_CACHE_KEY) {
            return theme;
        }

        let resolved = match self.theme_store.find_active().await {
            Ok(Some(theme)) => {
                self.set_state(ThemeState::ActiveTheme(theme.id.clone()));
                Arc::new(theme)
            }
            Ok(None) => {
                tracing::warn!("ThemeResolver: 无激活主题记录,回退内置默认主题");
                Arc::new(defaults::default_theme())
            }
            Err(e) => {
                tracing::warn!("ThemeResolver: 激活主题读取失败,回退内置默认主题 - error={}", e);
                Arc::new(defaults::default_theme())
            }
        };

        self.theme_cache.set(ACTIVE_THEME_CACHE_KEY, resolved.clone());
        resolved
    }

    /// 当前激活主题的 ID
    pub async fn active_theme_id(&self) -> String {
        self.get_active_theme().await.id.clone()
    }

    /// 切换激活主题
    ///
    /// # 流程
    /// 存储互斥激活 → 失效激活主题缓存键 → 状态迁移 →
    /// 重新解析 → 发布 ThemeSwitched
    ///
    /// 写失败原样向上抛,缓存与状态保持切换前的样子;
    /// 切换期间并发的解析会看到旧主题或新主题,不会看到撕裂的混合
    pub async fn switch_theme(&self, new_id: &str) -> StoreResult<Arc<Theme>> {
        self.theme_store.set_active_exclusive(new_id).await?;

        self.theme_cache.invalidate(ACTIVE_THEME_CACHE_KEY);
        self.set_state(ThemeState::ActiveTheme(new_id.to_string()));

        let theme = self.get_active_theme().await;
        let groups = self.get_theme_style_groups(new_id).await;
        self.publisher.publish_update(&StyleUpdateEvent {
            owner_key: new_id.to_string(),
            kind: StyleChangeKind::ThemeSwitched,
            resolved: groups,
        });

        tracing::info!("ThemeResolver: 主题已切换 - theme_id={}", new_id);
        Ok(theme)
    }

    /// 解析主题级样式组
    ///
    /// scope=THEME 且 owner_key=theme_id 的片段合并结果,
    /// 作为页面/组件解析时"激活主题"这一层;读失败回退空配置并缓存
    pub async fn get_theme_style_groups(&self, theme_id: &str) -> Arc<ResolvedStyleConfig> {
        let key = Self::group_cache_key(theme_id);
        if let Some(config) = self.group_cache.get(&key) {
            return config;
        }

        let resolved = match self
            .fragment_store
            .query(StyleScope::Theme, Some(theme_id), None)
            .await
        {
            Ok(fragments) => StyleMergeResolver::resolve(&fragments),
            Err(e) => {
                tracing::warn!(
                    "ThemeResolver: 主题级片段读取失败,按空样式组处理 - theme_id={}, error={}",
                    theme_id,
                    e
                );
                ResolvedStyleConfig::default()
            }
        };

        let resolved = Arc::new(resolved);
        self.group_cache.set(&key, resolved.clone());
        resolved
    }

    /// 列出全部主题(编辑界面用,存储错误原样上抛)
    pub async fn get_all_themes(&self) -> StoreResult<Vec<Theme>> {
        self.theme_store.list().await
    }

    /// 失效激活主题缓存键
    pub fn invalidate_active(&self) {
        self.theme_cache.invalidate(ACTIVE_THEME_CACHE_KEY);
    }

    /// 失效某主题的全部缓存(激活键 + 该主题的样式组)
    pub fn invalidate_theme(&self, theme_id: &str) {
        self.invalidate_active();
        self.group_cache.invalidate(&Self::group_cache_key(theme_id));
    }

    /// 当前解析状态
    pub fn state(&self) -> ThemeState {
        self.state.lock().unwrap().clone()
    }

    /// 交给后台清扫任务的缓存列表
    pub fn caches(&self) -> Vec<Arc<dyn ExpiringCache>> {
        vec![self.theme_cache.clone(), self.group_cache.clone()]
    }

    fn set_state(&self, next: ThemeState) {
        let mut state = self.state.lock().unwrap();
        if *state != next {
            tracing::debug!("ThemeResolver: 状态迁移 {:?} -> {:?}", *state, next);
            *state = next;
        }
    }

    fn group_cache_key(theme_id: &str) -> String {
        format!("theme:groups:{}", theme_id)
    }
}
