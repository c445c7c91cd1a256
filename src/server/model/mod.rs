use serde::Deserialize;

pub(crate) mod config;
pub(crate) mod menu_item;
pub(crate) mod order;
pub(crate) mod restaurant;

#[derive(Debug, Deserialize)]
pub(crate) struct CommonRequestParams {
    pub page: Option<u8>,
    pub page_size: Option<u8>,
}
