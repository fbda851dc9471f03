//! Greenbasket API library.
//!
//! This crate provides the backend API as a library, allowing it to be
//! tested and reused (the CLI uses its repositories for seeding).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pricing;
pub mod routes;
pub mod state;
