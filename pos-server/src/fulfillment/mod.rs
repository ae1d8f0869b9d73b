//! 订单履约核心
//!
//! 下单的完整事务链路：配方解析 → 库存检查与扣减 → 订单落库 →
//! 提交后广播。取消订单走反向链路 (按当前配方 × 冻结数量回冲)。

pub mod coordinator;
pub mod error;
pub mod ledger;
pub mod money;
pub mod order_number;
pub mod resolver;

pub use coordinator::{NewOrderLine, OrderCoordinator, PlacedOrder};
pub use error::{FulfillmentError, FulfillmentResult};
pub use ledger::InventoryLedger;
pub use order_number::OrderNumberGenerator;
pub use resolver::RecipeResolver;
