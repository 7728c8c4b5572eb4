//! itemsvc - CRUD item service with a generic entity repository
//!
//! Queries are composed as immutable expression trees and only executed on
//! demand. Paging inspects a query before executing it and injects a default
//! sort when no ordering operator is present.

pub mod cli;
pub mod config;
pub mod data;
pub mod observability;
pub mod query;
pub mod rest_api;
pub mod service;
