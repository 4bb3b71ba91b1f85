// ==========================================
// 主题样式配置系统 - 样式 API
// ==========================================
// 职责: 页面/组件样式读取、片段 CRUD 透传、订阅管理
// 流程: 写入 → 按片段归属做缓存失效 → 重新解析 → 发布更新
// ==========================================

use crate::api::error::ApiResult;
use crate::api::validator::FragmentValidator;
use crate::domain::fragment::{FragmentOrder, NewStyleFragment, StyleFragment, StyleFragmentPatch};
use crate::domain::resolved::ResolvedStyleConfig;
use crate::domain::types::StyleScope;
use crate::engine::component_resolver::ComponentStyleResolver;
use crate::engine::css::CssSynthesizer;
use crate::engine::events::{
    StyleChangeKind, StyleUpdateBus, StyleUpdateEvent, SubscriptionId,
};
use crate::engine::page_resolver::PageStyleResolver;
use crate::engine::theme_resolver::ThemeResolver;
use crate::repository::store::FragmentStore;
use std::collections::HashSet;
use std::sync::Arc;

/// 样式 API
///
/// 职责:
/// 1. 渲染方的样式读取(内部解析激活主题,读路径永不失败)
/// 2. 片段 CRUD 透传(校验 → 写入 → 失效 → 重发布)
/// 3. 样式更新订阅的注册与退订
pub struct StyleApi {
    fragment_store: Arc<dyn FragmentStore>,
    theme_resolver: Arc<ThemeResolver>,
    page_resolver: Arc<PageStyleResolver>,
    component_resolver: Arc<ComponentStyleResolver>,
    update_bus: Arc<StyleUpdateBus>,
}

impl StyleApi {
    pub fn new(
        fragment_store: Arc<dyn FragmentStore>,
        theme_resolver: Arc<ThemeResolver>,
        page_resolver: Arc<PageStyleResolver>,
        component_resolver: Arc<ComponentStyleResolver>,
        update_bus: Arc<StyleUpdateBus>,
    ) -> Self {
        Self {
            fragment_store,
            theme_resolver,
            page_resolver,
            component_resolver,
            update_bus,
        }
    }

    // ==========================================
    // 读取接口(激活主题在内部解析)
    // ==========================================

    /// 整页样式
    pub async fn get_page_styles(&self, page_name: &str) -> Arc<ResolvedStyleConfig> {
        let theme_id = self.theme_resolver.active_theme_id().await;
        self.page_resolver.get_page_styles(&theme_id, page_name).await
    }

    /// 页面分区样式
    pub async fn get_page_section_styles(
        &self,
        page_name: &str,
        section_name: &str,
    ) -> Arc<ResolvedStyleConfig> {
        let theme_id = self.theme_resolver.active_theme_id().await;
        self.page_resolver
            .get_page_section_styles(&theme_id, page_name, section_name)
            .await
    }

    /// 页面分区清单
    pub async fn get_page_sections(&self, page_name: &str) -> Arc<Vec<String>> {
        let theme_id = self.theme_resolver.active_theme_id().await;
        self.page_resolver.get_page_sections(&theme_id, page_name).await
    }

    /// 组件基础样式
    pub async fn get_component_styles(&self, component_name: &str) -> Arc<ResolvedStyleConfig> {
        let theme_id = self.theme_resolver.active_theme_id().await;
        self.component_resolver
            .get_component_styles(&theme_id, component_name)
            .await
    }

    /// 组件变体样式
    pub async fn get_component_variant_styles(
        &self,
        component_name: &str,
        variant_name: &str,
    ) -> Arc<ResolvedStyleConfig> {
        let theme_id = self.theme_resolver.active_theme_id().await;
        self.component_resolver
            .get_component_variant_styles(&theme_id, component_name, variant_name)
            .await
    }

    /// 组件变体清单
    pub async fn get_component_variants(&self, component_name: &str) -> Arc<Vec<String>> {
        let theme_id = self.theme_resolver.active_theme_id().await;
        self.component_resolver
            .get_component_variants(&theme_id, component_name)
            .await
    }

    /// 配置过样式的组件清单
    pub async fn get_theme_components(&self) -> Arc<Vec<String>> {
        let theme_id = self.theme_resolver.active_theme_id().await;
        self.component_resolver.get_theme_components(&theme_id).await
    }

    /// 解析结果 → 样式表文本(纯函数透传)
    pub fn generate_css_styles(config: &ResolvedStyleConfig) -> String {
        CssSynthesizer::generate_css_styles(config)
    }

    // ==========================================
    // 订阅接口
    // ==========================================

    /// 订阅样式更新
    pub fn on_style_update<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&StyleUpdateEvent) + Send + Sync + 'static,
    {
        self.update_bus.subscribe(listener)
    }

    /// 退订样式更新
    pub fn off_style_update(&self, id: SubscriptionId) -> bool {
        self.update_bus.unsubscribe(id)
    }

    // ==========================================
    // 片段 CRUD 透传
    // ==========================================

    /// 创建片段
    ///
    /// # 返回
    /// - Ok(String): 存储分配的片段 ID
    pub async fn create_fragment(&self, fragment: NewStyleFragment) -> ApiResult<String> {
        FragmentValidator::validate_new(&fragment)?;

        let scope = fragment.scope;
        let owner_key = fragment.owner_key.clone();
        let sub_key = fragment.sub_key.clone();
        let active = fragment.active;

        let id = self.fragment_store.insert(fragment).await?;

        self.invalidate_for(scope, &owner_key);
        if active {
            self.republish(scope, &owner_key, sub_key.as_deref()).await;
        }

        tracing::info!(
            "StyleApi: 片段已创建 - fragment_id={}, scope={}, owner_key={}",
            id,
            scope,
            owner_key
        );
        Ok(id)
    }

    /// 更新片段
    pub async fn update_fragment(
        &self,
        fragment_id: &str,
        patch: StyleFragmentPatch,
    ) -> ApiResult<StyleFragment> {
        FragmentValidator::validate_patch(&patch)?;

        let before = self.fragment_store.find_by_id(fragment_id).await?;
        let updated = self.fragment_store.update(fragment_id, patch).await?;

        self.invalidate_for(updated.scope, &updated.owner_key);
        // 启用片段的变更,或启用状态本身翻转,都要重新发布
        if before.active || updated.active {
            self.republish(updated.scope, &updated.owner_key, updated.sub_key.as_deref())
                .await;
        }

        tracing::info!("StyleApi: 片段已更新 - fragment_id={}", fragment_id);
        Ok(updated)
    }

    /// 删除片段
    pub async fn delete_fragment(&self, fragment_id: &str) -> ApiResult<()> {
        let fragment = self.fragment_store.find_by_id(fragment_id).await?;
        self.fragment_store.delete(fragment_id).await?;

        self.invalidate_for(fragment.scope, &fragment.owner_key);
        if fragment.active {
            self.republish(fragment.scope, &fragment.owner_key, fragment.sub_key.as_deref())
                .await;
        }

        tracing::info!("StyleApi: 片段已删除 - fragment_id={}", fragment_id);
        Ok(())
    }

    /// 翻转片段启用状态
    pub async fn toggle_active(&self, fragment_id: &str) -> ApiResult<StyleFragment> {
        let current = self.fragment_store.find_by_id(fragment_id).await?;
        let patch = StyleFragmentPatch {
            active: Some(!current.active),
            ..Default::default()
        };
        let updated = self.fragment_store.update(fragment_id, patch).await?;

        self.invalidate_for(updated.scope, &updated.owner_key);
        // 启停都会改变生效的片段集合
        self.republish(updated.scope, &updated.owner_key, updated.sub_key.as_deref())
            .await;

        tracing::info!(
            "StyleApi: 片段启用状态已翻转 - fragment_id={}, active={}",
            fragment_id,
            updated.active
        );
        Ok(updated)
    }

    /// 批量调整片段顺序
    ///
    /// 每个受影响的归属键只失效并重新发布一次
    pub async fn update_order(&self, orders: &[FragmentOrder]) -> ApiResult<()> {
        FragmentValidator::validate_reorder(orders)?;

        self.fragment_store.reorder(orders).await?;

        let mut republished: HashSet<(StyleScope, String)> = HashSet::new();
        for order in orders {
            let fragment = self.fragment_store.find_by_id(&order.id).await?;
            if republished.insert((fragment.scope, fragment.owner_key.clone())) {
                self.invalidate_for(fragment.scope, &fragment.owner_key);
                if fragment.active {
                    self.republish(fragment.scope, &fragment.owner_key, fragment.sub_key.as_deref())
                        .await;
                }
            }
        }

        tracing::info!("StyleApi: 片段顺序已调整 - count={}", orders.len());
        Ok(())
    }

    // ==========================================
    // 内部: 失效与重发布
    // ==========================================

    /// 按片段归属失效对应解析器的缓存键范围
    ///
    /// 主题级片段参与所有页面/组件的合并,一并清空两侧缓存
    fn invalidate_for(&self, scope: StyleScope, owner_key: &str) {
        match scope {
            StyleScope::Theme => {
                self.theme_resolver.invalidate_theme(owner_key);
                self.page_resolver.invalidate_all();
                self.component_resolver.invalidate_all();
            }
            StyleScope::Page | StyleScope::PageSection => {
                self.page_resolver.invalidate_page(owner_key);
            }
            StyleScope::Component | StyleScope::ComponentVariant => {
                self.component_resolver.invalidate_component(owner_key);
            }
        }
    }

    /// 变更成功后重新解析归属对象并发布
    async fn republish(&self, scope: StyleScope, owner_key: &str, sub_key: Option<&str>) {
        let theme_id = self.theme_resolver.active_theme_id().await;

        let (kind, resolved) = match scope {
            StyleScope::Theme => (
                StyleChangeKind::ThemeUpdated,
                self.theme_resolver.get_theme_style_groups(owner_key).await,
            ),
            StyleScope::Page => (
                StyleChangeKind::PageStyleChanged,
                self.page_resolver.get_page_styles(&theme_id, owner_key).await,
            ),
            StyleScope::PageSection => match sub_key {
                Some(section) => (
                    StyleChangeKind::PageSectionStyleChanged,
                    self.page_resolver
                        .get_page_section_styles(&theme_id, owner_key, section)
                        .await,
                ),
                None => (
                    StyleChangeKind::PageStyleChanged,
                    self.page_resolver.get_page_styles(&theme_id, owner_key).await,
                ),
            },
            StyleScope::Component => (
                StyleChangeKind::ComponentStyleChanged,
                self.component_resolver
                    .get_component_styles(&theme_id, owner_key)
                    .await,
            ),
            StyleScope::ComponentVariant => match sub_key {
                Some(variant) => (
                    StyleChangeKind::ComponentVariantStyleChanged,
                    self.component_resolver
                        .get_component_variant_styles(&theme_id, owner_key, variant)
                        .await,
                ),
                None => (
                    StyleChangeKind::ComponentStyleChanged,
                    self.component_resolver
                        .get_component_styles(&theme_id, owner_key)
                        .await,
                ),
            },
        };

        self.update_bus.publish(&StyleUpdateEvent {
            owner_key: owner_key.to_string(),
            kind,
            resolved,
        });
    }
}
