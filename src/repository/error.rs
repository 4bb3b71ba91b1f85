// ==========================================
// 主题样式配置系统 - 存储适配层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 存储适配层错误类型
///
/// 所有存储方法都是可能失败的网络往返,失败以这里的类型呈现
#[derive(Error, Debug)]
pub enum StoreError {
    // ===== 可用性错误 =====
    #[error("配置存储不可达: {0}")]
    Unavailable(String),

    // ===== 记录错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("存储约束违反: {0}")]
    Constraint(String),

    // ===== 请求错误 =====
    #[error("无效的存储请求: {0}")]
    InvalidRequest(String),

    #[error("载荷序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// 片段未找到的快捷构造
    pub fn fragment_not_found(id: &str) -> Self {
        StoreError::NotFound {
            entity: "StyleFragment".to_string(),
            id: id.to_string(),
        }
    }

    /// 主题未找到的快捷构造
    pub fn theme_not_found(id: &str) -> Self {
        StoreError::NotFound {
            entity: "Theme".to_string(),
            id: id.to_string(),
        }
    }
}

/// Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;
