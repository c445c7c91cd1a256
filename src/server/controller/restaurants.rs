use crate::server::controller::error::CustomError;
use crate::server::controller::DB_TIMEOUT_SECONDS;
use crate::server::model::restaurant::{
    GetRestaurantResponse, GetRestaurantsResponse, PostRestaurantsRequest, PostRestaurantsResponse,
    Restaurant,
};
use crate::server::model::CommonRequestParams;
use crate::server::state::AppState;
use crate::server::util::time;
use actix_web::{get, post, web, HttpRequest, Responder};
use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{error, warn};
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

fn from_row(r: &Row) -> Restaurant {
    let created_at: DateTime<Utc> = r.get("created_at");
    let updated_at: Option<DateTime<Utc>> = r.get("updated_at");
    Restaurant {
        id: r.get("id"),
        name: r.get("name"),
        cuisine: r.get("cuisine"),
        rating: r.get("rating"),
        delivery_time: r.get("delivery_time"),
        min_order: r.get("min_order"),
        address: r.get("address"),
        phone: r.get("phone"),
        created_at: time::format_ts(created_at),
        updated_at: updated_at.map(time::format_ts),
    }
}

#[get("/v1/restaurants")]
/// List restaurants, paginated
pub(crate) async fn get_restaurants(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    if let Some(conn) = data.get_db_read_pool().acquire(DB_TIMEOUT_SECONDS).await {
        let maybe_queries = web::Query::<CommonRequestParams>::from_query(req.query_string())
            .context("failed to parse query string");
        if maybe_queries.is_err() {
            return Err(CustomError::BadRequest);
        }
        let CommonRequestParams {
            page: maybe_page,
            page_size: maybe_page_size,
        } = maybe_queries.unwrap().into_inner();
        let (page, page_size) = (maybe_page.unwrap_or(0), maybe_page_size.unwrap_or(20));
        let offset = i64::from(page) * i64::from(page_size);
        let limit = i64::from(page_size);
        return match conn
            .query(
                r##"
            SELECT id, name, cuisine, rating, delivery_time, min_order, address, phone, created_at, updated_at
            FROM restaurant
            ORDER BY id
            OFFSET $1
            LIMIT $2
            ;
        "##,
                &[&offset, &limit],
            )
            .await
        {
            Ok(rows) => Ok(web::Json(GetRestaurantsResponse {
                restaurants: rows.iter().map(from_row).collect(),
            })),
            Err(e) => {
                error!("get_restaurants failed, {}", e);
                Err(CustomError::DbError)
            }
        };
    }
    Err(CustomError::ServerIsBusy)
}

#[get("/v1/restaurant/{id}")]
/// Get one restaurant
pub(crate) async fn get_restaurant(
    id: web::Path<i64>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    if let Some(conn) = data.get_db_read_pool().acquire(DB_TIMEOUT_SECONDS).await {
        let params: &[&(dyn ToSql + Sync)] = &[&id.into_inner()];
        return match conn
            .query_opt(
                r##"
            SELECT id, name, cuisine, rating, delivery_time, min_order, address, phone, created_at, updated_at
            FROM restaurant
            WHERE id = $1
            ;
        "##,
                params,
            )
            .await
        {
            Ok(Some(row)) => Ok(web::Json(GetRestaurantResponse {
                restaurant: Some(from_row(&row)),
            })),
            Ok(None) => Err(CustomError::ResourceNotFound),
            Err(e) => {
                warn!("get_restaurant failed, {}", e);
                Err(CustomError::DbError)
            }
        };
    }
    Err(CustomError::ServerIsBusy)
}

#[post("/v1/restaurants")]
/// Create a restaurant (admin/seed path)
pub(crate) async fn post_restaurants(
    req: web::Json<PostRestaurantsRequest>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    if let Some(conn) = data.get_db_write_pool().acquire(DB_TIMEOUT_SECONDS).await {
        let params: &[&(dyn ToSql + Sync); 8] = &[
            &req.name,
            &req.cuisine,
            &req.rating,
            &req.delivery_time,
            &req.min_order,
            &req.address,
            &req.phone,
            &time::helper::get_utc_now(),
        ];
        return match conn
            .query_one(
                r#"
                INSERT INTO restaurant(name, cuisine, rating, delivery_time, min_order, address, phone, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id
            "#,
                params,
            )
            .await
        {
            Ok(row) => Ok(web::Json(PostRestaurantsResponse { id: row.get("id") })),
            Err(e) => {
                error!("post_restaurants failed, {}", e);
                Err(CustomError::DbError)
            }
        };
    }
    Err(CustomError::ServerIsBusy)
}
