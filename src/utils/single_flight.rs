use std::sync::atomic::{AtomicBool, Ordering};

/// 单飞保护：同一时刻最多只有一个执行，重复调用直接丢弃而不是排队
///
/// 基于 `AtomicBool` 的 compare-exchange，多线程调用同样安全。
#[derive(Debug, Default)]
pub struct SingleFlight {
    busy: AtomicBool,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取执行权，已有执行在进行时返回 `None`
    pub fn try_acquire(&self) -> Option<FlightGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard { flag: &self.busy })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// 释放时自动复位标志，提前返回或 panic 都不会让标志卡住
#[derive(Debug)]
pub struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
