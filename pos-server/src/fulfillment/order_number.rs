//! 订单号生成
//!
//! `ORD{unix毫秒}{序号:03}`。毫秒时间戳保证跨重启单调，进程内原子
//! 序号消除同毫秒碰撞 (UNIQUE 约束兜底)。

use std::sync::atomic::{AtomicU64, Ordering};

use crate::utils::time::now_millis;

#[derive(Debug, Default)]
pub struct OrderNumberGenerator {
    seq: AtomicU64,
}

impl OrderNumberGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) % 1000;
        format!("ORD{}{:03}", now_millis(), seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_format() {
        let generated = OrderNumberGenerator::new().next();
        assert!(generated.starts_with("ORD"));
        assert!(generated.len() >= 16);
        assert!(generated[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_burst_uniqueness() {
        let generator = OrderNumberGenerator::new();
        let numbers: HashSet<String> = (0..500).map(|_| generator.next()).collect();
        assert_eq!(numbers.len(), 500);
    }
}
