// ==========================================
// 主题样式配置系统 - 组件样式解析器
// ==========================================
// 职责: 解析组件基础样式、变体样式、变体与组件清单
// 约束: 已知组件名零配置时以内置兜底声明起底;
//       渲染实例的优先级为 base < 变体 < 交互状态 < 断点覆盖
// ==========================================

use crate::config::EngineSettings;
use crate::domain::defaults;
use crate::domain::resolved::ResolvedStyleConfig;
use crate::domain::types::StyleScope;
use crate::engine::cache::{ExpiringCache, TtlCache};
use crate::engine::merge::StyleMergeResolver;
use crate::engine::theme_resolver::ThemeResolver;
use crate::repository::store::FragmentStore;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

/// 组件样式解析器
pub struct ComponentStyleResolver {
    fragment_store: Arc<dyn FragmentStore>,
    themes: Arc<ThemeResolver>,
    style_cache: Arc<TtlCache<Arc<ResolvedStyleConfig>>>,
    key_cache: Arc<TtlCache<Arc<Vec<String>>>>,
}

impl ComponentStyleResolver {
    pub fn new(
        fragment_store: Arc<dyn FragmentStore>,
        themes: Arc<ThemeResolver>,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            fragment_store,
            themes,
            style_cache: Arc::new(TtlCache::new("component-styles", settings.cache_ttl)),
            key_cache: Arc::new(TtlCache::new("component-keys", settings.cache_ttl)),
        }
    }

    /// 解析组件基础样式
    ///
    /// # 合并层次(低 → 高)
    /// 已知组件名的兜底声明 < 激活主题样式组 <
    /// scope=COMPONENT 的组件片段(按 sort_order)
    ///
    /// 变体片段不参与基础对象
    pub async fn get_component_styles(
        &self,
        theme_id: &str,
        component_name: &str,
    ) -> Arc<ResolvedStyleConfig> {
        let key = Self::style_key(component_name, theme_id);
        if let Some(config) = self.style_cache.get(&key) {
            return config;
        }

        let seed = self.seed_for(theme_id, component_name).await;
        let resolved = match self
            .fragment_store
            .query(StyleScope::Component, Some(component_name), None)
            .await
        {
            Ok(fragments) => StyleMergeResolver::resolve_with_seed(seed, &fragments),
            Err(e) => {
                tracing::warn!(
                    "ComponentStyleResolver: 组件片段读取失败,按内置兜底渲染 - component={}, error={}",
                    component_name,
                    e
                );
                StyleMergeResolver::resolve_with_seed(seed, &[])
            }
        };

        let resolved = Arc::new(resolved);
        self.style_cache.set(&key, resolved.clone());
        resolved
    }

    /// 解析组件变体样式
    ///
    /// 组件基础链之上再合并该变体的 scope=COMPONENT_VARIANT 片段;
    /// 载荷内嵌 variants 组中命中的条目随后折叠进 base,
    /// 返回对象的 base 即是该变体的最终基础属性
    pub async fn get_component_variant_styles(
        &self,
        theme_id: &str,
        component_name: &str,
        variant_name: &str,
    ) -> Arc<ResolvedStyleConfig> {
        let key = Self::variant_key(component_name, theme_id, variant_name);
        if let Some(config) = self.style_cache.get(&key) {
            return config;
        }

        let seed = self.seed_for(theme_id, component_name).await;

        let mut chain = match self
            .fragment_store
            .query(StyleScope::Component, Some(component_name), None)
            .await
        {
            Ok(fragments) => fragments,
            Err(e) => {
                tracing::warn!(
                    "ComponentStyleResolver: 组件片段读取失败 - component={}, error={}",
                    component_name,
                    e
                );
                Vec::new()
            }
        };

        match self
            .fragment_store
            .query(
                StyleScope::ComponentVariant,
                Some(component_name),
                Some(variant_name),
            )
            .await
        {
            Ok(mut fragments) => chain.append(&mut fragments),
            Err(e) => {
                tracing::warn!(
                    "ComponentStyleResolver: 变体片段读取失败 - component={}, variant={}, error={}",
                    component_name,
                    variant_name,
                    e
                );
            }
        }

        let resolved = StyleMergeResolver::resolve_with_seed(seed, &chain)
            .with_variant_applied(variant_name);

        let resolved = Arc::new(resolved);
        self.style_cache.set(&key, resolved.clone());
        resolved
    }

    /// 列出组件的全部变体名
    pub async fn get_component_variants(
        &self,
        theme_id: &str,
        component_name: &str,
    ) -> Arc<Vec<String>> {
        let key = Self::variants_key(component_name, theme_id);
        if let Some(variants) = self.key_cache.get(&key) {
            return variants;
        }

        let variants: Vec<String> = match self
            .fragment_store
            .query(StyleScope::ComponentVariant, Some(component_name), None)
            .await
        {
            Ok(fragments) => fragments
                .into_iter()
                .filter_map(|f| f.sub_key)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            Err(e) => {
                tracing::warn!(
                    "ComponentStyleResolver: 变体清单读取失败 - component={}, error={}",
                    component_name,
                    e
                );
                Vec::new()
            }
        };

        let variants = Arc::new(variants);
        self.key_cache.set(&key, variants.clone());
        variants
    }

    /// 列出配置过样式的全部组件名
    pub async fn get_theme_components(&self, theme_id: &str) -> Arc<Vec<String>> {
        let key = Self::components_index_key(theme_id);
        if let Some(components) = self.key_cache.get(&key) {
            return components;
        }

        let components: Vec<String> = match self
            .fragment_store
            .query(StyleScope::Component, None, None)
            .await
        {
            Ok(fragments) => fragments
                .into_iter()
                .map(|f| f.owner_key)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            Err(e) => {
                tracing::warn!("ComponentStyleResolver: 组件清单读取失败 - error={}", e);
                Vec::new()
            }
        };

        let components = Arc::new(components);
        self.key_cache.set(&key, components.clone());
        components
    }

    /// 失效该组件的全部缓存键(基础、各变体、变体清单,覆盖所有主题)
    ///
    /// 组件清单索引一并失效 —— 片段增删可能让组件出现或消失
    pub fn invalidate_component(&self, component_name: &str) -> usize {
        let prefix = Self::component_prefix(component_name);
        self.style_cache.invalidate_by_prefix(&prefix)
            + self.key_cache.invalidate_by_prefix(&prefix)
            + self.key_cache.invalidate_by_prefix("components:")
    }

    /// 清空全部组件缓存(主题级变更波及所有组件时使用)
    pub fn invalidate_all(&self) -> usize {
        self.style_cache.clear() + self.key_cache.clear()
    }

    /// 交给后台清扫任务的缓存列表
    pub fn caches(&self) -> Vec<Arc<dyn ExpiringCache>> {
        vec![self.style_cache.clone(), self.key_cache.clone()]
    }

    /// 兜底声明 + 主题样式组,作为合并种子
    async fn seed_for(&self, theme_id: &str, component_name: &str) -> Map<String, Value> {
        let mut seed = defaults::component_fallback(component_name).unwrap_or_default();
        let theme_groups = self.themes.get_theme_style_groups(theme_id).await;
        StyleMergeResolver::deep_merge(&mut seed, theme_groups.to_group_map());
        seed
    }

    fn component_prefix(component_name: &str) -> String {
        format!("component:{}:", component_name)
    }

    fn style_key(component_name: &str, theme_id: &str) -> String {
        format!("component:{}:{}:styles", component_name, theme_id)
    }

    fn variant_key(component_name: &str, theme_id: &str, variant_name: &str) -> String {
        format!("component:{}:{}:variant:{}", component_name, theme_id, variant_name)
    }

    fn variants_key(component_name: &str, theme_id: &str) -> String {
        format!("component:{}:{}:variants", component_name, theme_id)
    }

    fn components_index_key(theme_id: &str) -> String {
        format!("components:{}", theme_id)
    }
}
