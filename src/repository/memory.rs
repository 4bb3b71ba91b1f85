// ==========================================
// 主题样式配置系统 - 内存参考存储
// ==========================================
// 职责: FragmentStore/ThemeStore 的进程内参考实现
// 用途: 集成测试与本地开发;生产存储在本 crate 之外
// 说明: set_offline 可模拟存储断连,用于验证读路径回退
// ==========================================

use crate::domain::fragment::{FragmentOrder, NewStyleFragment, StyleFragment, StyleFragmentPatch};
use crate::domain::theme::{NewTheme, Theme, ThemePatch};
use crate::domain::types::StyleScope;
use crate::repository::error::{StoreError, StoreResult};
use crate::repository::store::{FragmentStore, ThemeStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// 内存样式存储
///
/// 两张 Mutex 保护的表,ID 用 uuid 分配,时间戳用 chrono 打点
#[derive(Default)]
pub struct InMemoryStyleStore {
    fragments: Mutex<HashMap<String, StyleFragment>>,
    themes: Mutex<HashMap<String, Theme>>,
    offline: AtomicBool,
}

impl InMemoryStyleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟存储断连
    ///
    /// 断连期间所有方法返回 StoreError::Unavailable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    fn ensure_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("模拟的存储断连".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FragmentStore for InMemoryStyleStore {
    async fn query(
        &self,
        scope: StyleScope,
        owner_key: Option<&str>,
        sub_key: Option<&str>,
    ) -> StoreResult<Vec<StyleFragment>> {
        self.ensure_online()?;

        let fragments = self.fragments.lock().unwrap();
        let mut rows: Vec<StyleFragment> = fragments
            .values()
            .filter(|f| f.active && f.scope == scope)
            .filter(|f| owner_key.map_or(true, |owner| f.owner_key == owner))
            .filter(|f| sub_key.map_or(true, |sub| f.sub_key.as_deref() == Some(sub)))
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<StyleFragment> {
        self.ensure_online()?;

        let fragments = self.fragments.lock().unwrap();
        fragments
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::fragment_not_found(id))
    }

    async fn insert(&self, fragment: NewStyleFragment) -> StoreResult<String> {
        self.ensure_online()?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();
        let row = StyleFragment {
            id: id.clone(),
            scope: fragment.scope,
            owner_key: fragment.owner_key,
            sub_key: fragment.sub_key,
            payload: fragment.payload,
            sort_order: fragment.sort_order,
            active: fragment.active,
            created_at: now,
            updated_at: now,
        };

        self.fragments.lock().unwrap().insert(id.clone(), row);
        Ok(id)
    }

    async fn update(&self, id: &str, patch: StyleFragmentPatch) -> StoreResult<StyleFragment> {
        self.ensure_online()?;

        let mut fragments = self.fragments.lock().unwrap();
        let row = fragments
            .get_mut(id)
            .ok_or_else(|| StoreError::fragment_not_found(id))?;

        if let Some(payload) = patch.payload {
            row.payload = payload;
        }
        if let Some(sort_order) = patch.sort_order {
            row.sort_order = sort_order;
        }
        if let Some(active) = patch.active {
            row.active = active;
        }
        row.updated_at = Utc::now().naive_utc();

        Ok(row.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.ensure_online()?;

        let mut fragments = self.fragments.lock().unwrap();
        fragments
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::fragment_not_found(id))
    }

    async fn reorder(&self, orders: &[FragmentOrder]) -> StoreResult<()> {
        self.ensure_online()?;

        let mut fragments = self.fragments.lock().unwrap();

        // 先整体校验,避免部分写入
        for order in orders {
            if !fragments.contains_key(&order.id) {
                return Err(StoreError::fragment_not_found(&order.id));
            }
        }

        let now = Utc::now().naive_utc();
        for order in orders {
            if let Some(row) = fragments.get_mut(&order.id) {
                row.sort_order = order.sort_order;
                row.updated_at = now;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ThemeStore for InMemoryStyleStore {
    async fn list(&self) -> StoreResult<Vec<Theme>> {
        self.ensure_online()?;

        let themes = self.themes.lock().unwrap();
        let mut rows: Vec<Theme> = themes.values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn find_active(&self) -> StoreResult<Option<Theme>> {
        self.ensure_online()?;

        let themes = self.themes.lock().unwrap();
        Ok(themes.values().find(|t| t.active).cloned())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Theme> {
        self.ensure_online()?;

        let themes = self.themes.lock().unwrap();
        themes
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::theme_not_found(id))
    }

    async fn insert(&self, theme: NewTheme) -> StoreResult<String> {
        self.ensure_online()?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();
        let mut themes = self.themes.lock().unwrap();

        // 创建即激活时先互斥停用其他主题
        if theme.active {
            for row in themes.values_mut() {
                row.active = false;
            }
        }

        themes.insert(
            id.clone(),
            Theme {
                id: id.clone(),
                name: theme.name,
                palette_tokens: theme.palette_tokens,
                type_tokens: theme.type_tokens,
                spacing_tokens: theme.spacing_tokens,
                radius_tokens: theme.radius_tokens,
                elevation_tokens: theme.elevation_tokens,
                active: theme.active,
                updated_at: now,
            },
        );

        Ok(id)
    }

    async fn update(&self, id: &str, patch: ThemePatch) -> StoreResult<Theme> {
        self.ensure_online()?;

        let mut themes = self.themes.lock().unwrap();
        let row = themes
            .get_mut(id)
            .ok_or_else(|| StoreError::theme_not_found(id))?;

        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(tokens) = patch.palette_tokens {
            row.palette_tokens = tokens;
        }
        if let Some(tokens) = patch.type_tokens {
            row.type_tokens = tokens;
        }
        if let Some(tokens) = patch.spacing_tokens {
            row.spacing_tokens = tokens;
        }
        if let Some(tokens) = patch.radius_tokens {
            row.radius_tokens = tokens;
        }
        if let Some(tokens) = patch.elevation_tokens {
            row.elevation_tokens = tokens;
        }
        row.updated_at = Utc::now().naive_utc();

        Ok(row.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.ensure_online()?;

        let mut themes = self.themes.lock().unwrap();
        themes
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::theme_not_found(id))
    }

    async fn set_active_exclusive(&self, id: &str) -> StoreResult<()> {
        self.ensure_online()?;

        let mut themes = self.themes.lock().unwrap();
        if !themes.contains_key(id) {
            return Err(StoreError::theme_not_found(id));
        }

        // 单锁内完成"全部停用 + 激活一个",对调用方原子
        let now = Utc::now().naive_utc();
        for (theme_id, row) in themes.iter_mut() {
            let next_active = theme_id == id;
            if row.active != next_active {
                row.active = next_active;
                row.updated_at = now;
            }
        }

        Ok(())
    }
}
