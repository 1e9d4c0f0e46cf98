pub mod aggregate;
pub mod dates;
pub mod db;
pub mod models;
pub mod report;
pub mod routes;
pub mod session;
