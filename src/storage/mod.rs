mod comics;
pub mod db;
mod library;
pub mod models;
mod tables;
mod users;

pub use db::{Database, DatabaseError, PurgeStats};
pub use tables::*;
