// ==========================================
// 主题样式配置系统 - 引擎设置
// ==========================================
// 职责: 缓存 TTL 与清扫间隔等调参项
// 说明: TTL 是非关键调参项,默认 5 分钟;测试自行注入短时长
// ==========================================

use std::time::Duration;

/// 引擎调优参数
///
/// 在组合根一次性注入,所有缓存实例共用同一组时长
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// 缓存条目存活时长
    pub cache_ttl: Duration,
    /// 后台清扫间隔
    pub sweep_interval: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl EngineSettings {
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}
