//! Gym Roster server library.
//!
//! This crate provides the GraphQL API as a library, allowing it to be tested
//! and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod middleware;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
