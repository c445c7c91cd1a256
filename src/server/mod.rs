//! main file for the server

pub(crate) mod controller;
pub(crate) mod database;
pub mod model;
pub(crate) mod state;
pub(crate) mod util;

use crate::server::controller::{menu, orders, restaurants};
use crate::server::database::pool::{Init, Pool};
use crate::server::model::config::ServerConfig;
use crate::server::state::AppState;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;
use tokio_postgres::Client;

/// Run the server
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let ServerConfig {
        addr,
        db_read_conn_str,
        db_write_conn_str,
    } = config;

    let (mut read_pool, mut write_pool) = match (Pool::<Client>::new().await, Pool::<Client>::new().await) {
        (Ok(r), Ok(w)) => (r, w),
        _ => return Err(io::Error::other("failed to create connection pools")),
    };
    read_pool.init(db_read_conn_str).await.map_err(io::Error::other)?;
    write_pool.init(db_write_conn_str).await.map_err(io::Error::other)?;

    let state = web::Data::new(AppState::new(read_pool, write_pool));

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .service(restaurants::get_restaurants)
            .service(restaurants::get_restaurant)
            .service(restaurants::post_restaurants)
            .service(menu::get_restaurant_menu)
            .service(menu::post_menu_items)
            .service(orders::post_orders)
            .service(orders::get_order)
    })
    .bind(addr)?
    .run()
    .await
}
