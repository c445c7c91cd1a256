use crate::server::database::connection::{connect_util, Connection};
use anyhow::Error;
use log::{error, info};
use std::collections::VecDeque;
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time;
use tokio_postgres::row::RowIndex;
use tokio_postgres::types::{FromSql, ToSql};
use tokio_postgres::Client;

/// A database client a [`Pool`] can hand out. The single seam between the
/// request handlers and the persistence layer; mocked under test.
pub(crate) trait DbClient: Send + Sized + 'static {
    type Txn<'a>: GenericTransaction
    where
        Self: 'a;

    async fn transaction(&mut self) -> Result<Self::Txn<'_>, Error>;
}

/// Transactional scope over a checked-out connection. Dropping an
/// uncommitted transaction rolls it back.
pub(crate) trait GenericTransaction {
    type Row: GenericRow;

    async fn query_one(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Self::Row, Error>;

    async fn query_opt(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Self::Row>, Error>;

    async fn execute(&self, statement: &str, params: &[&(dyn ToSql + Sync)])
        -> Result<u64, Error>;

    async fn commit(self) -> Result<(), Error>;
}

pub(crate) trait GenericRow {
    fn get<'a, I, T>(&'a self, idx: I) -> T
    where
        I: RowIndex + Display,
        T: FromSql<'a>;

    fn try_get<'a, I, T>(&'a self, idx: I) -> Result<T, Error>
    where
        I: RowIndex + Display,
        T: FromSql<'a>;
}

pub(crate) struct CommonPool<M>
where
    M: DbClient,
{
    /// idle clients, handed out in a FIFO manner
    connections: Mutex<VecDeque<M>>,
}

pub(crate) struct Pool<M>(Arc<CommonPool<M>>)
where
    M: DbClient;

impl<M> Clone for Pool<M>
where
    M: DbClient,
{
    fn clone(&self) -> Pool<M> {
        Pool(self.0.clone())
    }
}

pub(crate) trait Init {
    async fn init(&mut self, conn_str: String) -> Result<(), Error>;
}

impl Init for Pool<Client> {
    async fn init(&mut self, conn_str: String) -> Result<(), Error> {
        let mut connections: VecDeque<Client> = VecDeque::with_capacity(Self::DEFAULT_SIZE);
        let mut set = JoinSet::new();
        for _ in 0..Self::DEFAULT_SIZE {
            let str = conn_str.clone();
            set.spawn(async move { connect_util::connect(str.as_str()).await });
        }
        while let Some(res) = set.join_next().await {
            match res {
                Ok(client) => {
                    info!("connection created");
                    connections.push_back(client);
                }
                Err(e) => {
                    error!("join_next failed when joining, {}", e);
                }
            };
        }
        self.0
            .connections
            .lock()
            .expect("pool mutex poisoned")
            .append(&mut connections);
        Ok(())
    }
}

impl<M> Pool<M>
where
    M: DbClient,
{
    const DEFAULT_SIZE: usize = 10;
    const POLL_INTERVAL_MS: u64 = 10;

    /// create a connection pool with default configuration
    pub async fn new() -> Result<Self, Error> {
        let shared = Arc::new(CommonPool {
            connections: Mutex::new(VecDeque::with_capacity(Self::DEFAULT_SIZE)),
        });
        Ok(Self(shared))
    }

    /// acquire a connection within the specified timeout in seconds, bail
    /// out with `None` once the timeout elapses.
    pub async fn acquire(&self, timeout: u64) -> Option<Connection<M>> {
        let deadline = time::sleep(Duration::new(timeout, 0));
        tokio::pin!(deadline);
        let mut poll = time::interval(Duration::from_millis(Self::POLL_INTERVAL_MS));
        loop {
            tokio::select! {
                biased;
                _ = poll.tick() => {
                    let maybe_client = self
                        .0
                        .connections
                        .lock()
                        .expect("pool mutex poisoned")
                        .pop_front();
                    if let Some(client) = maybe_client {
                        return Some(Connection::new(client, self.clone()));
                    }
                },
                _ = &mut deadline => {
                    error!("timed out to acquire a connection from pool after {} seconds", timeout);
                    return None;
                },
            }
        }
    }

    pub fn release(&self, client: M) {
        self.0
            .connections
            .lock()
            .expect("pool mutex poisoned")
            .push_back(client);
    }
}
