//! Club Events - Event publishing and paid registration backend
//!
//! This crate implements the club site's event catalog together with the
//! registration, pricing, and payment orchestration core: admissibility of a
//! registration attempt against an event's lifecycle and team-size bounds,
//! per-role discount pricing, duplicate prevention, and reconciliation of
//! gateway captures with durable registration rows.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
