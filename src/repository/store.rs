// ==========================================
// 主题样式配置系统 - 配置存储接口
// ==========================================
// 职责: 按聚合定义异步存储 trait,屏蔽远端记录库细节
// 说明: 引擎层只依赖这里的 trait,不关心存储的具体实现
// ==========================================

use crate::domain::fragment::{FragmentOrder, NewStyleFragment, StyleFragment, StyleFragmentPatch};
use crate::domain::theme::{NewTheme, Theme, ThemePatch};
use crate::domain::types::StyleScope;
use crate::repository::error::StoreResult;
use async_trait::async_trait;

/// 样式片段存储接口
///
/// 所有方法都是网络往返,失败以 StoreError 呈现;
/// query 只返回启用的片段,按 sort_order 升序
#[async_trait]
pub trait FragmentStore: Send + Sync {
    /// 查询启用片段
    ///
    /// # 参数
    /// - scope: 作用域(必选过滤)
    /// - owner_key: 归属键过滤,None 表示不过滤
    /// - sub_key: 子键过滤,None 表示不过滤
    ///
    /// # 返回
    /// - Ok(Vec): active=true 的片段,按 sort_order 升序
    async fn query(
        &self,
        scope: StyleScope,
        owner_key: Option<&str>,
        sub_key: Option<&str>,
    ) -> StoreResult<Vec<StyleFragment>>;

    /// 按 ID 查找片段(不论启用状态)
    async fn find_by_id(&self, id: &str) -> StoreResult<StyleFragment>;

    /// 插入片段
    ///
    /// # 返回
    /// - Ok(String): 存储分配的片段 ID
    async fn insert(&self, fragment: NewStyleFragment) -> StoreResult<String>;

    /// 部分更新片段
    async fn update(&self, id: &str, patch: StyleFragmentPatch) -> StoreResult<StyleFragment>;

    /// 删除片段
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// 批量重排序
    ///
    /// 所有条目校验通过后一次性生效,不做部分写入
    async fn reorder(&self, orders: &[FragmentOrder]) -> StoreResult<()>;
}

/// 主题存储接口
#[async_trait]
pub trait ThemeStore: Send + Sync {
    /// 列出全部主题
    async fn list(&self) -> StoreResult<Vec<Theme>>;

    /// 查找当前激活主题
    ///
    /// # 返回
    /// - Ok(Some): 激活主题
    /// - Ok(None): 没有激活记录
    async fn find_active(&self) -> StoreResult<Option<Theme>>;

    /// 按 ID 查找主题
    async fn find_by_id(&self, id: &str) -> StoreResult<Theme>;

    /// 插入主题
    ///
    /// active=true 时先互斥停用其他主题
    async fn insert(&self, theme: NewTheme) -> StoreResult<String>;

    /// 部分更新主题
    async fn update(&self, id: &str, patch: ThemePatch) -> StoreResult<Theme>;

    /// 删除主题
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// 互斥激活: 原子地停用所有其他主题并激活指定主题
    async fn set_active_exclusive(&self, id: &str) -> StoreResult<()>;
}
