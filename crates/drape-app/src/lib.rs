pub mod config;
pub mod routes;
pub mod schemas;
pub mod state;
pub mod worker;
