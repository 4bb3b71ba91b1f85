// ==========================================
// 主题样式配置系统 - API 层错误类型
// ==========================================
// 职责: 把存储层技术错误转换为面向编辑界面的业务错误
// 说明: InvalidMutation 表示坏输入,是唯一不被读路径吸收的类别
// ==========================================

use crate::repository::error::StoreError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 写入校验错误 =====
    #[error("无效的样式变更: {0}")]
    InvalidMutation(String),

    // ===== 资源错误 =====
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("约束冲突: {0}")]
    Conflict(String),

    // ===== 存储错误 =====
    #[error("配置存储不可用: {0}")]
    StoreUnavailable(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 StoreError 转换
// ==========================================
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => ApiError::StoreUnavailable(msg),
            StoreError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            StoreError::Constraint(msg) => ApiError::Conflict(msg),
            StoreError::InvalidRequest(msg) => ApiError::InvalidMutation(msg),
            StoreError::Serialization(e) => {
                ApiError::InvalidMutation(format!("载荷解析失败: {}", e))
            }
            StoreError::Other(e) => ApiError::Other(e),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
