// ==========================================
// 主题样式配置系统 - TTL 缓存
// ==========================================
// 职责: 为所有解析器提供带过期时间的键值缓存
// 约束: 过期判定发生在调用时刻,过期读一律视为缺失并删除条目,
//       绝不返回陈旧值
// ==========================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// 缓存条目
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

/// 缓存命中统计快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// 带 TTL 的通用键值缓存
///
/// TTL 按实例固定;时长是非关键调参项,由 EngineSettings 注入。
/// get/set 只在短临界区内持锁,后台清扫不会阻塞并发读写
pub struct TtlCache<V> {
    name: &'static str,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    /// 创建缓存实例
    ///
    /// # 参数
    /// - name: 日志与统计用的标识
    /// - ttl: 条目存活时长
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// 读取缓存
    ///
    /// # 返回
    /// - Some(value): 未过期的条目
    /// - None: 缺失或已过期(过期条目当场删除)
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().unwrap();

        match entries.get(key) {
            Some(entry) if entry.created_at.elapsed() < self.ttl => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("TtlCache[{}]: 命中 - key={}", self.name, key);
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                self.evictions.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("TtlCache[{}]: 条目过期 - key={}", self.name, key);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// 写入缓存(覆盖同键旧值,计时重新开始)
    pub fn set(&self, key: &str, value: V) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    /// 失效单个键
    ///
    /// # 返回
    /// - true: 条目存在且已删除
    pub fn invalidate(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().unwrap();
        let removed = entries.remove(key).is_some();
        if removed {
            tracing::debug!("TtlCache[{}]: 失效 - key={}", self.name, key);
        }
        removed
    }

    /// 按前缀批量失效
    ///
    /// # 返回
    /// - usize: 删除的条目数
    pub fn invalidate_by_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(
                "TtlCache[{}]: 前缀失效 - prefix={}, removed={}",
                self.name,
                prefix,
                removed
            );
        }
        removed
    }

    /// 清空全部条目
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let removed = entries.len();
        entries.clear();
        removed
    }

    /// 清扫已过期条目
    ///
    /// # 返回
    /// - usize: 本轮删除的条目数
    pub fn sweep_expired(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.created_at.elapsed() < ttl);
        let removed = before - entries.len();
        if removed > 0 {
            self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
        }
        removed
    }

    /// 当前条目数(含尚未清扫的过期条目)
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 命中统计快照
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

// ==========================================
// 后台清扫
// ==========================================

/// 可被后台清扫的缓存(对象安全,供清扫任务持有异构缓存)
pub trait ExpiringCache: Send + Sync {
    fn cache_name(&self) -> &str;
    fn sweep(&self) -> usize;
}

impl<V: Clone + Send + Sync> ExpiringCache for TtlCache<V> {
    fn cache_name(&self) -> &str {
        self.name
    }

    fn sweep(&self) -> usize {
        self.sweep_expired()
    }
}

/// 启动周期性清扫任务
///
/// 固定间隔逐个清扫传入的缓存;任务只在 tick 时短暂持锁,
/// 不阻塞并发的 get/set
pub fn spawn_sweeper(
    caches: Vec<Arc<dyn ExpiringCache>>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            for cache in &caches {
                let removed = cache.sweep();
                if removed > 0 {
                    tracing::debug!(
                        "CacheSweeper: 清扫过期条目 - cache={}, removed={}",
                        cache.cache_name(),
                        removed
                    );
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_and_invalidate() {
        let cache: TtlCache<String> = TtlCache::new("test", Duration::from_secs(60));

        assert_eq!(cache.get("k1"), None);
        cache.set("k1", "v1".to_string());
        assert_eq!(cache.get("k1"), Some("v1".to_string()));

        assert!(cache.invalidate("k1"));
        assert_eq!(cache.get("k1"), None);
        assert!(!cache.invalidate("k1"));
    }

    #[test]
    fn test_expired_read_is_a_miss_and_deletes() {
        let cache: TtlCache<i32> = TtlCache::new("test", Duration::from_millis(30));
        cache.set("k1", 1);
        assert_eq!(cache.get("k1"), Some(1));

        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get("k1"), None);
        // 过期读已当场删除条目
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_invalidate_by_prefix_spares_other_keys() {
        let cache: TtlCache<i32> = TtlCache::new("test", Duration::from_secs(60));
        cache.set("page:home:t1:styles", 1);
        cache.set("page:home:t1:sections", 2);
        cache.set("page:homepage:t1:styles", 3);

        let removed = cache.invalidate_by_prefix("page:home:");
        assert_eq!(removed, 2);
        // 前缀带分隔符,"homepage" 不受波及
        assert_eq!(cache.get("page:homepage:t1:styles"), Some(3));
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let cache: TtlCache<i32> = TtlCache::new("test", Duration::from_millis(30));
        cache.set("old", 1);
        std::thread::sleep(Duration::from_millis(40));
        cache.set("fresh", 2);

        let removed = cache.sweep_expired();
        assert_eq!(removed, 1);
        assert_eq!(cache.get("fresh"), Some(2));
    }

    #[test]
    fn test_stats_counting() {
        let cache: TtlCache<i32> = TtlCache::new("test", Duration::from_secs(60));
        cache.set("k", 1);
        cache.get("k");
        cache.get("absent");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_sweeper_task_runs() {
        let cache: Arc<TtlCache<i32>> = Arc::new(TtlCache::new("test", Duration::from_millis(10)));
        cache.set("k", 1);

        let handle = spawn_sweeper(vec![cache.clone()], Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(60)).await;
        handle.abort();

        assert_eq!(cache.len(), 0);
    }
}
