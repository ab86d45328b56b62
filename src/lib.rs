pub mod api;
pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod ledger;
pub mod models;
pub mod observability;
pub mod state;
pub mod workflow;
