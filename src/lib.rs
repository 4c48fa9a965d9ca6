//! Local-first CRM for freelancers: clients, projects, invoices and
//! calendar events kept in a string-keyed store, plus the dashboard
//! figures derived from them.

pub mod aggregation;
pub mod config;
pub mod models;
pub mod repository;
pub mod storage;
