//! In-memory doubles for the persistence seam, used by unit tests.
//!
//! `MockTransaction` stages writes and only makes them visible on `commit`,
//! so tests can assert rollback atomicity the same way they would against a
//! real database.

use crate::server::database::pool::{DbClient, GenericRow, GenericTransaction, Init, Pool};
use anyhow::{anyhow, Error};
use bytes::BytesMut;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use tokio_postgres::row::RowIndex;
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type};

#[derive(Debug, Default)]
pub(crate) struct MockDb {
    pub menu_prices: HashMap<i64, i64>,
    pub next_order_id: i64,
    pub fail_order_items: bool,
    staged_orders: Vec<OrderRow>,
    staged_items: Vec<OrderItemRow>,
    pub orders: Vec<OrderRow>,
    pub order_items: Vec<OrderItemRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OrderRow {
    pub id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub total_amount: i64,
    pub status: String,
    pub delivery_address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OrderItemRow {
    pub order_id: i64,
    pub menu_item_id: i64,
    pub quantity: i32,
    pub price: i64,
    pub special_instructions: Option<String>,
}

impl MockDb {
    pub fn shared(menu_prices: &[(i64, i64)]) -> Arc<Mutex<MockDb>> {
        Arc::new(Mutex::new(MockDb {
            menu_prices: menu_prices.iter().copied().collect(),
            ..MockDb::default()
        }))
    }
}

#[derive(Default)]
pub(crate) struct MockClient {
    pub state: Arc<Mutex<MockDb>>,
}

impl DbClient for MockClient {
    type Txn<'a> = MockTransaction;

    async fn transaction(&mut self) -> Result<MockTransaction, Error> {
        Ok(MockTransaction::new(self.state.clone()))
    }
}

impl Init for Pool<MockClient> {
    async fn init(&mut self, _: String) -> Result<(), Error> {
        self.release(MockClient::default());
        Ok(())
    }
}

pub(crate) struct MockTransaction {
    state: Arc<Mutex<MockDb>>,
}

impl MockTransaction {
    pub fn new(state: Arc<Mutex<MockDb>>) -> Self {
        Self { state }
    }
}

impl Drop for MockTransaction {
    fn drop(&mut self) {
        // uncommitted staged writes are discarded, mirroring rollback-on-drop
        let mut db = self.state.lock().expect("mock db mutex poisoned");
        db.staged_orders.clear();
        db.staged_items.clear();
    }
}

impl GenericTransaction for MockTransaction {
    type Row = MockRow;

    async fn query_one(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<MockRow, Error> {
        if statement.contains("INSERT INTO orders") {
            let mut db = self.state.lock().expect("mock db mutex poisoned");
            db.next_order_id += 1;
            let id = db.next_order_id;
            db.staged_orders.push(OrderRow {
                id,
                user_id: decode_int8(params[0]),
                restaurant_id: decode_int8(params[1]),
                total_amount: decode_int8(params[2]),
                status: "pending".to_string(),
                delivery_address: decode_text(params[3]).expect("delivery_address is not null"),
            });
            return Ok(MockRow::with_int8s(&[("id", id)]));
        }
        panic!("unexpected statement for query_one, {statement}");
    }

    async fn query_opt(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<MockRow>, Error> {
        if statement.contains("FROM menu_item") {
            // let sibling futures interleave at the read point
            tokio::task::yield_now().await;
            let id = decode_int8(params[0]);
            let db = self.state.lock().expect("mock db mutex poisoned");
            return Ok(db
                .menu_prices
                .get(&id)
                .map(|price| MockRow::with_int8s(&[("price", *price)])));
        }
        panic!("unexpected statement for query_opt, {statement}");
    }

    async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Error> {
        if statement.contains("INSERT INTO order_item") {
            let mut db = self.state.lock().expect("mock db mutex poisoned");
            if db.fail_order_items {
                return Err(anyhow!("duplicate key value violates unique constraint"));
            }
            const COLUMN_LEN: usize = 5;
            assert_eq!(params.len() % COLUMN_LEN, 0, "ragged order_item params");
            for row in params.chunks(COLUMN_LEN) {
                db.staged_items.push(OrderItemRow {
                    order_id: decode_int8(row[0]),
                    menu_item_id: decode_int8(row[1]),
                    quantity: decode_int4(row[2]),
                    price: decode_int8(row[3]),
                    special_instructions: decode_text(row[4]),
                });
            }
            return Ok((params.len() / COLUMN_LEN) as u64);
        }
        panic!("unexpected statement for execute, {statement}");
    }

    async fn commit(self) -> Result<(), Error> {
        let mut db = self.state.lock().expect("mock db mutex poisoned");
        let mut orders = std::mem::take(&mut db.staged_orders);
        let mut items = std::mem::take(&mut db.staged_items);
        db.orders.append(&mut orders);
        db.order_items.append(&mut items);
        Ok(())
    }
}

pub(crate) struct MockRow {
    cols: Vec<(String, [u8; 8])>,
}

impl MockRow {
    pub fn with_int8s(cols: &[(&str, i64)]) -> Self {
        Self {
            cols: cols
                .iter()
                .map(|(name, v)| (name.to_string(), v.to_be_bytes()))
                .collect(),
        }
    }
}

impl GenericRow for MockRow {
    fn get<'a, I, T>(&'a self, idx: I) -> T
    where
        I: RowIndex + Display,
        T: FromSql<'a>,
    {
        self.try_get(idx).expect("mock column decode failed")
    }

    fn try_get<'a, I, T>(&'a self, idx: I) -> Result<T, Error>
    where
        I: RowIndex + Display,
        T: FromSql<'a>,
    {
        let name = idx.to_string();
        let (_, raw) = self
            .cols
            .iter()
            .find(|(col, _)| *col == name)
            .ok_or_else(|| anyhow!("no such mock column, {name}"))?;
        T::from_sql(&Type::INT8, raw).map_err(|e| anyhow!(e))
    }
}

/// read a bound parameter back through its wire encoding
fn decode_int8(param: &(dyn ToSql + Sync)) -> i64 {
    let mut buf = BytesMut::new();
    match param
        .to_sql_checked(&Type::INT8, &mut buf)
        .expect("param is not an int8")
    {
        IsNull::Yes => panic!("unexpected null int8 param"),
        IsNull::No => i64::from_be_bytes(buf[..].try_into().expect("int8 width")),
    }
}

fn decode_int4(param: &(dyn ToSql + Sync)) -> i32 {
    let mut buf = BytesMut::new();
    match param
        .to_sql_checked(&Type::INT4, &mut buf)
        .expect("param is not an int4")
    {
        IsNull::Yes => panic!("unexpected null int4 param"),
        IsNull::No => i32::from_be_bytes(buf[..].try_into().expect("int4 width")),
    }
}

fn decode_text(param: &(dyn ToSql + Sync)) -> Option<String> {
    let mut buf = BytesMut::new();
    match param
        .to_sql_checked(&Type::TEXT, &mut buf)
        .expect("param is not text")
    {
        IsNull::Yes => None,
        IsNull::No => Some(String::from_utf8(buf.to_vec()).expect("utf8 text param")),
    }
}
