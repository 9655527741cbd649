//! SQLite storage backend for the food ordering engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
