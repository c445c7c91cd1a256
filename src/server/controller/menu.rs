use crate::server::controller::error::CustomError;
use crate::server::controller::DB_TIMEOUT_SECONDS;
use crate::server::model::menu_item::{GetMenuResponse, MenuItem, PostMenuItemsRequest};
use crate::server::state::AppState;
use actix_web::{get, post, web, HttpResponse, Responder};
use log::{error, warn};
use tokio_postgres::types::ToSql;

#[get("/v1/restaurant/{id}/menu")]
/// List a restaurant's available menu items
pub(crate) async fn get_restaurant_menu(
    id: web::Path<i64>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    if let Some(conn) = data.get_db_read_pool().acquire(DB_TIMEOUT_SECONDS).await {
        let restaurant_id = id.into_inner();
        return match conn
            .query(
                r##"
            SELECT id, name, description, price, category, is_vegetarian, is_available
            FROM menu_item
            WHERE restaurant_id = $1 AND is_available
            ORDER BY category, name
            ;
        "##,
                &[&restaurant_id],
            )
            .await
        {
            Ok(rows) => Ok(web::Json(GetMenuResponse {
                restaurant_id,
                items: rows
                    .iter()
                    .map(|r| MenuItem {
                        id: r.get("id"),
                        name: r.get("name"),
                        description: r.get("description"),
                        price: r.get("price"),
                        category: r.get("category"),
                        is_vegetarian: r.get("is_vegetarian"),
                        is_available: r.get("is_available"),
                    })
                    .collect(),
            })),
            Err(e) => {
                error!("get_restaurant_menu failed, {}", e);
                Err(CustomError::DbError)
            }
        };
    }
    Err(CustomError::ServerIsBusy)
}

#[post("/v1/restaurant/{id}/menu")]
/// Add menu items to a restaurant (admin/seed path)
pub(crate) async fn post_menu_items(
    id: web::Path<i64>,
    body: web::Json<PostMenuItemsRequest>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    const COLUMN_LEN: usize = 6;
    if body.items.is_empty() {
        return Err(CustomError::BadRequest);
    }
    if let Some(conn) = data.get_db_write_pool().acquire(DB_TIMEOUT_SECONDS).await {
        let mut stmt =
            "INSERT INTO menu_item(restaurant_id, name, description, price, category, is_vegetarian) VALUES"
                .to_string();
        let mut idx = 1;
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(body.items.len() * COLUMN_LEN);
        let id = id.into_inner();
        for (i, item) in body.items.iter().enumerate() {
            let maybe_comma = if i != body.items.len() - 1 { "," } else { "" };
            stmt.extend(
                format!(
                    " (${}, ${}, ${}, ${}, ${}, ${}){}",
                    idx,
                    idx + 1,
                    idx + 2,
                    idx + 3,
                    idx + 4,
                    idx + 5,
                    maybe_comma
                )
                .chars(),
            );
            params.extend([
                &id as &(dyn ToSql + Sync),
                &item.name,
                &item.description,
                &item.price,
                &item.category,
                &item.is_vegetarian,
            ]);
            idx += COLUMN_LEN;
        }
        return match conn.execute(&stmt, params.as_slice()).await {
            Ok(_) => Ok(HttpResponse::Ok()),
            Err(e) => {
                warn!("post_menu_items failed, {}", e);
                Err(CustomError::DbError)
            }
        };
    }
    Err(CustomError::ServerIsBusy)
}
