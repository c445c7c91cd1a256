use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// price in cents
    pub price: i64,
    pub category: Option<String>,
    pub is_vegetarian: bool,
    pub is_available: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetMenuResponse {
    pub restaurant_id: i64,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostMenuItemsRequest {
    pub items: Vec<NewMenuItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewMenuItem {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub category: Option<String>,
    #[serde(default)]
    pub is_vegetarian: bool,
}
