//! Client library for the warehouse inventory REST API.
//!
//! Layers, from the wire up:
//! - [`api`] issues requests, attaches the session token and decodes errors.
//! - [`repository`] exposes one trait per resource, implemented over HTTP.
//! - [`forms`] and [`services`] validate user input before it reaches the API.
//! - [`controller`] drives paginated, filterable list views.

pub mod api;
pub mod controller;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod query;
pub mod repository;
pub mod services;

#[cfg(feature = "cli")]
pub mod cli;

use std::sync::Arc;

use crate::api::ApiClient;
use crate::api::errors::ApiResult;
use crate::api::session::{FileTokenStore, Session};
use crate::models::config::ClientConfig;
use crate::repository::HttpRepository;

/// Builds the HTTP repository described by `config`, restoring any token saved
/// by a previous run.
pub fn connect(config: &ClientConfig) -> ApiResult<HttpRepository> {
    let client = ApiClient::new(config.api_url.trim_end_matches('/'), config.request_timeout())?;
    let session = Arc::new(Session::new(FileTokenStore::new(&config.token_path)));
    Ok(HttpRepository::new(client, session))
}
