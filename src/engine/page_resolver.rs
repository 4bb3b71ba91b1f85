// ==========================================
// 主题样式配置系统 - 页面样式解析器
// ==========================================
// 职责: 解析整页样式、分区样式与分区清单
// 约束: 零片段的页面也要能渲染 —— 以内置布局默认值起底;
//       分区是独立覆盖层,不叠加整页对象
// ==========================================

use crate::config::EngineSettings;
use crate::domain::defaults;
use crate::domain::resolved::ResolvedStyleConfig;
use crate::domain::types::StyleScope;
use crate::engine::cache::{ExpiringCache, TtlCache};
use crate::engine::merge::StyleMergeResolver;
use crate::engine::theme_resolver::ThemeResolver;
use crate::repository::store::FragmentStore;
use std::collections::BTreeSet;
use std::sync::Arc;

/// 页面样式解析器
pub struct PageStyleResolver {
    fragment_store: Arc<dyn FragmentStore>,
    themes: Arc<ThemeResolver>,
    style_cache: Arc<TtlCache<Arc<ResolvedStyleConfig>>>,
    key_cache: Arc<TtlCache<Arc<Vec<String>>>>,
}

impl PageStyleResolver {
    pub fn new(
        fragment_store: Arc<dyn FragmentStore>,
        themes: Arc<ThemeResolver>,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            fragment_store,
            themes,
            style_cache: Arc::new(TtlCache::new("page-styles", settings.cache_ttl)),
            key_cache: Arc::new(TtlCache::new("page-keys", settings.cache_ttl)),
        }
    }

    /// 解析整页样式
    ///
    /// # 合并层次(低 → 高)
    /// 内置布局默认值 < 激活主题样式组 < scope=PAGE 的整页片段(按 sort_order)
    ///
    /// 只取 sub_key 为空的片段;分区片段不参与整页对象。
    /// 存储读失败回退"默认值 + 主题层",记日志,不上抛
    pub async fn get_page_styles(&self, theme_id: &str, page_name: &str) -> Arc<ResolvedStyleConfig> {
        let key = Self::style_key(page_name, theme_id);
        if let Some(config) = self.style_cache.get(&key) {
            return config;
        }

        let mut seed = defaults::page_layout_defaults();
        let theme_groups = self.themes.get_theme_style_groups(theme_id).await;
        StyleMergeResolver::deep_merge(&mut seed, theme_groups.to_group_map());

        let resolved = match self
            .fragment_store
            .query(StyleScope::Page, Some(page_name), None)
            .await
        {
            Ok(fragments) => {
                let page_fragments: Vec<_> =
                    fragments.into_iter().filter(|f| f.sub_key.is_none()).collect();
                StyleMergeResolver::resolve_with_seed(seed, &page_fragments)
            }
            Err(e) => {
                tracing::warn!(
                    "PageStyleResolver: 页面片段读取失败,按内置默认渲染 - page={}, error={}",
                    page_name,
                    e
                );
                StyleMergeResolver::resolve_with_seed(seed, &[])
            }
        };

        let resolved = Arc::new(resolved);
        self.style_cache.set(&key, resolved.clone());
        resolved
    }

    /// 解析页面分区样式
    ///
    /// 独立覆盖层: 只合并该 sub_key 的分区片段,不做默认值起底,
    /// 也不叠加整页对象 —— 分区作为隔离区域单独渲染
    pub async fn get_page_section_styles(
        &self,
        theme_id: &str,
        page_name: &str,
        section_name: &str,
    ) -> Arc<ResolvedStyleConfig> {
        let key = Self::section_key(page_name, theme_id, section_name);
        if let Some(config) = self.style_cache.get(&key) {
            return config;
        }

        let resolved = match self
            .fragment_store
            .query(StyleScope::PageSection, Some(page_name), Some(section_name))
            .await
        {
            Ok(fragments) => StyleMergeResolver::resolve(&fragments),
            Err(e) => {
                tracing::warn!(
                    "PageStyleResolver: 分区片段读取失败,按空配置处理 - page={}, section={}, error={}",
                    page_name,
                    section_name,
                    e
                );
                ResolvedStyleConfig::default()
            }
        };

        let resolved = Arc::new(resolved);
        self.style_cache.set(&key, resolved.clone());
        resolved
    }

    /// 列出页面的全部分区名
    ///
    /// 去重后的 sub_key 集合,供编辑界面使用;顺序无业务含义,
    /// 返回前排序只为结果稳定
    pub async fn get_page_sections(&self, theme_id: &str, page_name: &str) -> Arc<Vec<String>> {
        let key = Self::sections_key(page_name, theme_id);
        if let Some(sections) = self.key_cache.get(&key) {
            return sections;
        }

        let sections: Vec<String> = match self
            .fragment_store
            .query(StyleScope::PageSection, Some(page_name), None)
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
                    "PageStyleResolver: 分区清单读取失败 - page={}, error={}",
                    page_name,
                    e
                );
                Vec::new()
            }
        };

        let sections = Arc::new(sections);
        self.key_cache.set(&key, sections.clone());
        sections
    }

    /// 失效该页面的全部缓存键(整页、各分区、分区清单,覆盖所有主题)
    pub fn invalidate_page(&self, page_name: &str) -> usize {
        let prefix = Self::page_prefix(page_name);
        self.style_cache.invalidate_by_prefix(&prefix) + self.key_cache.invalidate_by_prefix(&prefix)
    }

    /// 清空全部页面缓存(主题级变更波及所有页面时使用)
    pub fn invalidate_all(&self) -> usize {
        self.style_cache.clear() + self.key_cache.clear()
    }

    /// 当前缓存的样式条目数(诊断用)
    pub fn cached_style_count(&self) -> usize {
        self.style_cache.len()
    }

    /// 交给后台清扫任务的缓存列表
    pub fn caches(&self) -> Vec<Arc<dyn ExpiringCache>> {
        vec![self.style_cache.clone(), self.key_cache.clone()]
    }

    fn page_prefix(page_name: &str) -> String {
        format!("page:{}:", page_name)
    }

    fn style_key(page_name: &str, theme_id: &str) -> String {
        format!("page:{}:{}:styles", page_name, theme_id)
    }

    fn section_key(page_name: &str, theme_id: &str, section_name: &str) -> String {
        format!("page:{}:{}:section:{}", page_name, theme_id, section_name)
    }

    fn sections_key(page_name: &str, theme_id: &str) -> String {
        format!("page:{}:{}:sections", page_name, theme_id)
    }
}
