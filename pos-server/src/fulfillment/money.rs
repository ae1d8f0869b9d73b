//! 金额计算
//!
//! 存储层用 f64，所有算术经 Decimal 完成，避免二进制浮点累加误差。

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// f64 -> Decimal (非法浮点按 0 处理)
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Decimal -> f64，四舍五入到分
pub fn to_f64(value: Decimal) -> f64 {
    value.round_dp(2).to_f64().unwrap_or(0.0)
}

/// 行项合计：Σ 单价 × 数量
pub fn line_total(unit_price: f64, quantity: i64) -> Decimal {
    to_decimal(unit_price) * Decimal::from(quantity)
}

/// 客户端申报金额与服务端权威金额是否一致 (容差一分钱)
pub fn totals_match(client_total: f64, server_total: f64) -> bool {
    let diff = (to_decimal(client_total) - to_decimal(server_total)).abs();
    diff <= Decimal::new(1, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_sum_avoids_float_drift() {
        // 0.1 + 0.2 != 0.3 in f64; Decimal gets it right
        let total = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(total), 0.3);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(to_f64(line_total(9.99, 3)), 29.97);
    }

    #[test]
    fn test_totals_match_within_cent() {
        assert!(totals_match(29.97, 29.97));
        assert!(totals_match(29.97, 29.975));
        assert!(!totals_match(29.97, 30.00));
    }
}
