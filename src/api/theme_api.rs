// ==========================================
// 主题样式配置系统 - 主题管理 API
// ==========================================
// 职责: 主题读取、切换与 CRUD 透传,写入后做对应失效与通知
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::FragmentValidator;
use crate::domain::theme::{NewTheme, Theme, ThemePatch};
use crate::engine::css::CssSynthesizer;
use crate::engine::events::{StyleChangeKind, StyleUpdateEvent, StyleUpdatePublisher};
use crate::engine::theme_resolver::ThemeResolver;
use crate::repository::store::ThemeStore;
use std::sync::Arc;

/// 主题管理 API
///
/// 职责:
/// 1. 激活主题读取与切换
/// 2. 主题 CRUD 透传(写入后失效对应缓存、发布更新)
/// 3. 主题令牌的 CSS 变量合成
pub struct ThemeApi {
    theme_store: Arc<dyn ThemeStore>,
    resolver: Arc<ThemeResolver>,
    publisher: Arc<dyn StyleUpdatePublisher>,
}

impl ThemeApi {
    pub fn new(
        theme_store: Arc<dyn ThemeStore>,
        resolver: Arc<ThemeResolver>,
        publisher: Arc<dyn StyleUpdatePublisher>,
    ) -> Self {
        Self {
            theme_store,
            resolver,
            publisher,
        }
    }

    /// 当前激活主题(读路径,永不失败)
    pub async fn get_active_theme(&self) -> Arc<Theme> {
        self.resolver.get_active_theme().await
    }

    /// 列出全部主题(编辑界面的列表读,存储错误上抛)
    pub async fn get_all_themes(&self) -> ApiResult<Vec<Theme>> {
        Ok(self.resolver.get_all_themes().await?)
    }

    /// 切换激活主题
    pub async fn switch_theme(&self, theme_id: &str) -> ApiResult<Arc<Theme>> {
        if theme_id.trim().is_empty() {
            return Err(ApiError::InvalidMutation("主题 ID 不能为空".to_string()));
        }
        Ok(self.resolver.switch_theme(theme_id).await?)
    }

    /// 创建主题
    ///
    /// # 返回
    /// - Ok(String): 存储分配的主题 ID
    pub async fn create_theme(&self, theme: NewTheme) -> ApiResult<String> {
        FragmentValidator::validate_new_theme(&theme)?;

        let created_active = theme.active;
        let id = self.theme_store.insert(theme).await?;

        if created_active {
            // 创建即激活等同于一次切换
            self.resolver.invalidate_active();
            self.publish_theme_update(&id, StyleChangeKind::ThemeSwitched).await;
        }

        tracing::info!("ThemeApi: 主题已创建 - theme_id={}, active={}", id, created_active);
        Ok(id)
    }

    /// 更新主题
    pub async fn update_theme(&self, theme_id: &str, patch: ThemePatch) -> ApiResult<Theme> {
        if patch.is_empty() {
            return Err(ApiError::InvalidMutation("空的更新请求".to_string()));
        }

        let updated = self.theme_store.update(theme_id, patch).await?;

        self.resolver.invalidate_theme(theme_id);
        if updated.active {
            // 激活主题的令牌变了,通知订阅方重新取样式
            self.publish_theme_update(theme_id, StyleChangeKind::ThemeUpdated).await;
        }

        tracing::info!("ThemeApi: 主题已更新 - theme_id={}", theme_id);
        Ok(updated)
    }

    /// 删除主题
    ///
    /// 当前激活主题不可删除(先切换再删),违反时返回 InvalidMutation
    pub async fn delete_theme(&self, theme_id: &str) -> ApiResult<()> {
        let theme = self.theme_store.find_by_id(theme_id).await?;
        if theme.active {
            return Err(ApiError::InvalidMutation(
                "不能删除当前激活主题,请先切换到其他主题".to_string(),
            ));
        }

        self.theme_store.delete(theme_id).await?;
        self.resolver.invalidate_theme(theme_id);

        tracing::info!("ThemeApi: 主题已删除 - theme_id={}", theme_id);
        Ok(())
    }

    /// 激活主题令牌的 CSS 变量声明文本
    pub async fn active_theme_variables(&self) -> String {
        let theme = self.resolver.get_active_theme().await;
        CssSynthesizer::generate_theme_variables(&theme)
    }

    async fn publish_theme_update(&self, theme_id: &str, kind: StyleChangeKind) {
        let resolved = self.resolver.get_theme_style_groups(theme_id).await;
        self.publisher.publish_update(&StyleUpdateEvent {
            owner_key: theme_id.to_string(),
            kind,
            resolved,
        });
    }
}
