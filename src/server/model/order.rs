use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct PostOrderRequest {
    pub user_id: i64,
    pub restaurant_id: i64,
    pub items: Vec<OrderItemRequest>,
    pub delivery_address: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderItemRequest {
    pub menu_item_id: i64,
    pub quantity: i32,
    pub special_instructions: Option<String>,
}

impl PostOrderRequest {
    /// reject malformed orders before a connection is even checked out
    pub fn validate(&self) -> Result<(), String> {
        if self.items.is_empty() {
            return Err("order must contain at least one item".to_string());
        }
        if let Some(line) = self.items.iter().find(|line| line.quantity < 1) {
            return Err(format!(
                "quantity must be a positive integer, got {} for menu item {}",
                line.quantity, line.menu_item_id
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PostOrderResponse {
    pub order_id: i64,
    /// in cents, derived server side
    pub total_amount: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetOrderResponse {
    pub order: Option<Order>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Order {
    pub id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub total_amount: i64,
    pub status: String,
    pub delivery_address: String,
    pub created_at: String,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderLine {
    pub menu_item_id: i64,
    pub quantity: i32,
    /// price snapshot captured when the order was placed
    pub price: i64,
    pub special_instructions: Option<String>,
}
