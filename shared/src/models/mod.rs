//! Domain models shared between server and clients

pub mod inventory_item;
pub mod menu_item;
pub mod order;
pub mod recipe;

pub use inventory_item::InventoryItem;
pub use menu_item::MenuItem;
pub use order::{Order, OrderLine, OrderStatus};
pub use recipe::{IngredientRequirement, RecipeLine};
