use crate::server::controller::error::CustomError;
use crate::server::controller::DB_TIMEOUT_SECONDS;
use crate::server::database::pool::{GenericRow, GenericTransaction};
use crate::server::model::order::{
    GetOrderResponse, Order, OrderLine, PostOrderRequest, PostOrderResponse,
};
use crate::server::state::AppState;
use crate::server::util::time as time_util;
use actix_web::rt::time;
use actix_web::{get, post, web, Responder};
use chrono::{DateTime, Utc};
use log::{error, warn};
use std::time::Duration;
use tokio_postgres::types::ToSql;

/// The order placement unit of work.
///
/// Reads each line item's current price exactly once, derives the total
/// server side, and inserts the order row plus its line items inside the
/// supplied transaction. Any error leaves the transaction uncommitted, so
/// dropping it rolls everything back; the caller never sees a partial
/// order. The price captured during the lookup is reused for the
/// `order_item` snapshot rather than re-read, so a concurrent menu update
/// cannot split an order's total from its line items.
pub(crate) async fn place_order<Tx>(
    txn: Tx,
    req: &PostOrderRequest,
) -> Result<PostOrderResponse, CustomError>
where
    Tx: GenericTransaction,
{
    let mut total = 0_i64;
    let mut prices = Vec::with_capacity(req.items.len());
    for line in &req.items {
        let maybe_row = txn
            .query_opt(
                "SELECT price FROM menu_item WHERE id = $1",
                &[&line.menu_item_id],
            )
            .await
            .map_err(|e| {
                warn!("menu item lookup failed, {}", e);
                CustomError::DbError
            })?;
        let Some(row) = maybe_row else {
            return Err(CustomError::MenuItemNotFound(line.menu_item_id));
        };
        let price: i64 = row.try_get("price").map_err(|e| {
            warn!("menu item price decode failed, {}", e);
            CustomError::DbError
        })?;
        total += price * i64::from(line.quantity);
        prices.push(price);
    }

    let order_params: &[&(dyn ToSql + Sync); 5] = &[
        &req.user_id,
        &req.restaurant_id,
        &total,
        &req.delivery_address,
        &time_util::helper::get_utc_now(),
    ];
    let row = txn
        .query_one(
            r#"
            INSERT INTO orders(user_id, restaurant_id, total_amount, status, delivery_address, created_at)
            VALUES ($1, $2, $3, 'pending', $4, $5)
            RETURNING id
        "#,
            order_params,
        )
        .await
        .map_err(|e| {
            warn!("order insert failed, {}", e);
            CustomError::DbError
        })?;
    let order_id: i64 = row.try_get("id").map_err(|e| {
        warn!("order id decode failed, {}", e);
        CustomError::DbError
    })?;

    const COLUMN_LEN: usize = 5;
    let mut stmt =
        "INSERT INTO order_item(order_id, menu_item_id, quantity, price, special_instructions) VALUES"
            .to_string();
    let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(req.items.len() * COLUMN_LEN);
    let mut idx = 1;
    for (i, (line, price)) in req.items.iter().zip(prices.iter()).enumerate() {
        let maybe_comma = if i != req.items.len() - 1 { "," } else { "" };
        stmt.extend(
            format!(
                " (${}, ${}, ${}, ${}, ${}){}",
                idx,
                idx + 1,
                idx + 2,
                idx + 3,
                idx + 4,
                maybe_comma
            )
            .chars(),
        );
        params.extend([
            &order_id as &(dyn ToSql + Sync),
            &line.menu_item_id,
            &line.quantity,
            price,
            &line.special_instructions,
        ]);
        idx += COLUMN_LEN;
    }
    txn.execute(&stmt, params.as_slice()).await.map_err(|e| {
        warn!("order items insert failed, {}", e);
        CustomError::DbError
    })?;

    txn.commit().await.map_err(|e| {
        error!("order commit failed, {}", e);
        CustomError::DbError
    })?;

    Ok(PostOrderResponse {
        order_id,
        total_amount: total,
    })
}

#[post("/v1/orders")]
/// Place an order
pub(crate) async fn post_orders(
    body: web::Json<PostOrderRequest>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let req = body.into_inner();
    if let Err(e) = req.validate() {
        warn!("invalid order request, {}", e);
        return Err(CustomError::BadRequest);
    }
    if let Some(mut conn) = data.get_db_write_pool().acquire(DB_TIMEOUT_SECONDS).await {
        let txn = match conn.transaction().await {
            Ok(txn) => txn,
            Err(e) => {
                error!("failed to open transaction, {}", e);
                return Err(CustomError::DbError);
            }
        };
        let sleep = time::sleep(Duration::from_secs(DB_TIMEOUT_SECONDS));
        tokio::pin!(sleep);
        return tokio::select! {
            result = place_order(txn, &req) => result.map(web::Json),
            _ = &mut sleep => {
                // dropping the in-flight future drops the transaction, which rolls it back
                warn!("timeout placing an order");
                Err(CustomError::Timeout)
            }
        };
    }
    Err(CustomError::ServerIsBusy)
}

#[get("/v1/order/{id}")]
/// Get an order with its line items
pub(crate) async fn get_order(
    id: web::Path<i64>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    if let Some(conn) = data.get_db_read_pool().acquire(DB_TIMEOUT_SECONDS).await {
        let id = id.into_inner();
        return match conn
            .query(
                r##"
            SELECT o.id, o.user_id, o.restaurant_id, o.total_amount, o.status, o.delivery_address, o.created_at,
                   oi.menu_item_id, oi.quantity, oi.price, oi.special_instructions
            FROM orders o
            JOIN order_item oi
            ON oi.order_id = o.id
            WHERE o.id = $1
            ;
        "##,
                &[&id],
            )
            .await
        {
            Ok(rows) => {
                let order = rows.first().map(|first| {
                    let created_at: DateTime<Utc> = first.get("created_at");
                    Order {
                        id: first.get("id"),
                        user_id: first.get("user_id"),
                        restaurant_id: first.get("restaurant_id"),
                        total_amount: first.get("total_amount"),
                        status: first.get("status"),
                        delivery_address: first.get("delivery_address"),
                        created_at: time_util::format_ts(created_at),
                        items: rows
                            .iter()
                            .map(|r| OrderLine {
                                menu_item_id: r.get("menu_item_id"),
                                quantity: r.get("quantity"),
                                price: r.get("price"),
                                special_instructions: r.get("special_instructions"),
                            })
                            .collect(),
                    }
                });
                Ok(web::Json(GetOrderResponse { order }))
            }
            Err(e) => {
                error!("get_order failed, {}", e);
                Err(CustomError::DbError)
            }
        };
    }
    Err(CustomError::ServerIsBusy)
}
