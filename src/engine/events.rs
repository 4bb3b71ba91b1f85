// ==========================================
// 主题样式配置系统 - 样式更新通知
// ==========================================
// 职责: 进程内发布/订阅,变更成功后通知依赖方
// 架构: 引擎层定义发布 trait,总线是默认实现;
//       订阅生命周期由消费方显式管理,避免监听器泄漏
// ==========================================

use crate::domain::resolved::ResolvedStyleConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

// ==========================================
// 事件类型
// ==========================================

/// 样式变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleChangeKind {
    /// 激活主题切换
    ThemeSwitched,
    /// 主题记录或主题级片段变更
    ThemeUpdated,
    /// 整页样式变更
    PageStyleChanged,
    /// 页面分区样式变更
    PageSectionStyleChanged,
    /// 组件基础样式变更
    ComponentStyleChanged,
    /// 组件变体样式变更
    ComponentVariantStyleChanged,
}

impl StyleChangeKind {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            StyleChangeKind::ThemeSwitched => "ThemeSwitched",
            StyleChangeKind::ThemeUpdated => "ThemeUpdated",
            StyleChangeKind::PageStyleChanged => "PageStyleChanged",
            StyleChangeKind::PageSectionStyleChanged => "PageSectionStyleChanged",
            StyleChangeKind::ComponentStyleChanged => "ComponentStyleChanged",
            StyleChangeKind::ComponentVariantStyleChanged => "ComponentVariantStyleChanged",
        }
    }
}

/// 样式更新事件
///
/// 变更成功后发布,携带归属键与重新解析完成的配置只读视图
#[derive(Clone)]
pub struct StyleUpdateEvent {
    /// 归属键(页面名、组件名或主题 ID)
    pub owner_key: String,
    /// 变更类型
    pub kind: StyleChangeKind,
    /// 重新解析后的配置
    pub resolved: Arc<ResolvedStyleConfig>,
}

// ==========================================
// 发布 Trait
// ==========================================

/// 样式更新发布者
///
/// 解析器只依赖此 trait,不关心订阅方;总线是默认实现
pub trait StyleUpdatePublisher: Send + Sync {
    fn publish_update(&self, event: &StyleUpdateEvent);
}

/// 空实现: 不需要通知时注入
pub struct NoOpStyleUpdatePublisher;

impl StyleUpdatePublisher for NoOpStyleUpdatePublisher {
    fn publish_update(&self, _event: &StyleUpdateEvent) {}
}

// ==========================================
// 更新总线
// ==========================================

/// 订阅句柄
///
/// 退订凭据;消费方在自身生命周期结束时必须退订
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// 监听器类型
pub type StyleUpdateListener = Box<dyn Fn(&StyleUpdateEvent) + Send + Sync>;

/// 样式更新总线
///
/// 显式的观察者注册表,同步投递;监听器内不要再订阅/退订,
/// 投递期间注册表处于锁定状态
pub struct StyleUpdateBus {
    listeners: Mutex<HashMap<u64, StyleUpdateListener>>,
    next_id: AtomicU64,
}

impl StyleUpdateBus {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// 订阅样式更新
    ///
    /// # 返回
    /// - SubscriptionId: 退订句柄
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&StyleUpdateEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().unwrap().insert(id, Box::new(listener));
        SubscriptionId(id)
    }

    /// 退订
    ///
    /// # 返回
    /// - true: 句柄有效且已移除
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.lock().unwrap().remove(&id.0).is_some()
    }

    /// 当前监听器数量
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    /// 发布事件,同步投递给全部监听器
    pub fn publish(&self, event: &StyleUpdateEvent) {
        let listeners = self.listeners.lock().unwrap();
        for listener in listeners.values() {
            listener(event);
        }
        tracing::debug!(
            "StyleUpdateBus: 事件已投递 - kind={}, owner_key={}, listeners={}",
            event.kind.as_str(),
            event.owner_key,
            listeners.len()
        );
    }
}

impl Default for StyleUpdateBus {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleUpdatePublisher for StyleUpdateBus {
    fn publish_update(&self, event: &StyleUpdateEvent) {
        self.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn event(owner: &str) -> StyleUpdateEvent {
        StyleUpdateEvent {
            owner_key: owner.to_string(),
            kind: StyleChangeKind::ComponentStyleChanged,
            resolved: Arc::new(ResolvedStyleConfig::default()),
        }
    }

    #[test]
    fn test_subscribe_publish_unsubscribe() {
        let bus = StyleUpdateBus::new();
        let delivered = Arc::new(AtomicUsize::new(0));

        let counter = delivered.clone();
        let id = bus.subscribe(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(bus.listener_count(), 1);

        bus.publish(&event("Button"));
        assert_eq!(delivered.load(Ordering::Relaxed), 1);

        assert!(bus.unsubscribe(id));
        bus.publish(&event("Button"));
        assert_eq!(delivered.load(Ordering::Relaxed), 1);
        assert_eq!(bus.listener_count(), 0);

        // 重复退订无效
        assert!(!bus.unsubscribe(id));
    }

    #[test]
    fn test_event_carries_owner_and_kind() {
        let bus = StyleUpdateBus::new();
        let seen: Arc<Mutex<Vec<(String, StyleChangeKind)>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe(move |event| {
            sink.lock().unwrap().push((event.owner_key.clone(), event.kind));
        });

        bus.publish(&event("home"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "home");
        assert_eq!(seen[0].1, StyleChangeKind::ComponentStyleChanged);
    }

    #[test]
    fn test_noop_publisher() {
        let publisher = NoOpStyleUpdatePublisher;
        publisher.publish_update(&event("Button"));
    }
}
