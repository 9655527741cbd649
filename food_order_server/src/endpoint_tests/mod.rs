mod auth;
mod mocks;
mod orders;
mod sqlite_backend;
