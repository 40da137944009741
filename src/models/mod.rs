//! Data models for Biblioteca

pub mod book;
pub mod dashboard;
pub mod loan;
pub mod reservation;
pub mod setting;
pub mod user;

