//! Greenbasket admin shell library.
//!
//! A deliberately small operator dashboard: one password, one session, read
//! access to the catalog and order tables. Catalog changes go through
//! `gb-cli seed products`, not this UI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;
