pub mod api;
pub mod auth;
pub mod circuit;
pub mod client;
pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod graph;
pub mod prover;
