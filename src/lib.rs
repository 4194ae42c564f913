//! Bakery point-of-sale back office.
//!
//! This crate tracks employee attendance (work sessions, meal and short
//! breaks, lateness and worked hours) and reconciles the daily cash drawer
//! against counter sales, cake-bar payments and custom-order payments. The
//! [`api`] module exposes both over JSON/HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod attendance;
pub mod cash;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
