pub mod db;
pub mod errors;
pub mod outcome;
pub mod review;
pub mod service;
pub mod user;
