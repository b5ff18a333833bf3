//! Walrus proxy relay
//!
//! Browsers can't always talk to publishers directly, and publishers
//! shouldn't see end users. The relay forwards `PUT /api/proxy` to a
//! publisher and `GET /api/proxy/{blob_id}` to an aggregator, failing over
//! across configured mirrors. It never stores anything.

pub mod config;
pub mod error;
pub mod relay;
pub mod routes;
pub mod state;
