//! Wire models shared between the ingestion backend and its HTTP clients.

pub mod model;
pub mod requests;
pub mod responses;
