use crate::server::database::pool::{DbClient, GenericRow, GenericTransaction, Pool};
use anyhow::Error;
use std::fmt::Display;
use std::ops::{Deref, DerefMut};
use tokio_postgres::row::RowIndex;
use tokio_postgres::types::{FromSql, ToSql};
use tokio_postgres::{Client, Row, Transaction};

/// RAII guard around a pooled client; hands the client back to its pool on
/// drop.
pub(crate) struct Connection<M>
where
    M: DbClient,
{
    client: Option<M>,
    pool: Pool<M>,
}

impl<M> Connection<M>
where
    M: DbClient,
{
    pub fn new(client: M, pool: Pool<M>) -> Self {
        Self {
            client: Some(client),
            pool,
        }
    }
}

impl<M> Deref for Connection<M>
where
    M: DbClient,
{
    type Target = M;

    fn deref(&self) -> &M {
        self.client.as_ref().expect("connection already released")
    }
}

impl<M> DerefMut for Connection<M>
where
    M: DbClient,
{
    fn deref_mut(&mut self) -> &mut M {
        self.client.as_mut().expect("connection already released")
    }
}

impl<M> Drop for Connection<M>
where
    M: DbClient,
{
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            self.pool.release(client);
        }
    }
}

impl DbClient for Client {
    type Txn<'a> = Transaction<'a>;

    async fn transaction(&mut self) -> Result<Transaction<'_>, Error> {
        Client::transaction(self).await.map_err(Error::from)
    }
}

impl GenericTransaction for Transaction<'_> {
    type Row = Row;

    async fn query_one(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Row, Error> {
        Transaction::query_one(self, statement, params)
            .await
            .map_err(Error::from)
    }

    async fn query_opt(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Error> {
        Transaction::query_opt(self, statement, params)
            .await
            .map_err(Error::from)
    }

    async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Error> {
        Transaction::execute(self, statement, params)
            .await
            .map_err(Error::from)
    }

    async fn commit(self) -> Result<(), Error> {
        Transaction::commit(self).await.map_err(Error::from)
    }
}

impl GenericRow for Row {
    fn get<'a, I, T>(&'a self, idx: I) -> T
    where
        I: RowIndex + Display,
        T: FromSql<'a>,
    {
        Row::get(self, idx)
    }

    fn try_get<'a, I, T>(&'a self, idx: I) -> Result<T, Error>
    where
        I: RowIndex + Display,
        T: FromSql<'a>,
    {
        Row::try_get(self, idx).map_err(Error::from)
    }
}

pub(crate) mod connect_util {
    use anyhow::Context;
    use log::error;
    use tokio_postgres::{Client, NoTls};

    /// abort the process if failed to connect db
    pub async fn connect(conn_str: &str) -> Client {
        let (client, conn) = tokio_postgres::connect(conn_str, NoTls)
            .await
            .context("failed to create connection")
            .unwrap();
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                error!("connection returned error and aborted, {}", e);
            }
        });
        client
    }
}
