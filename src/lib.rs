pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod models;
pub mod storage;
pub mod store;
pub mod utils;

pub use app::App;
pub use db::Database;
