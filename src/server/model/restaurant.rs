use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct Restaurant {
    pub id: i64,
    pub name: String,
    pub cuisine: String,
    pub rating: Option<f32>,
    /// estimated delivery time in minutes
    pub delivery_time: Option<i32>,
    /// minimum order amount in cents
    pub min_order: i64,
    pub address: String,
    pub phone: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetRestaurantsResponse {
    pub restaurants: Vec<Restaurant>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetRestaurantResponse {
    pub restaurant: Option<Restaurant>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostRestaurantsRequest {
    pub name: String,
    pub cuisine: String,
    pub rating: Option<f32>,
    pub delivery_time: Option<i32>,
    pub min_order: i64,
    pub address: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostRestaurantsResponse {
    pub id: i64,
}
