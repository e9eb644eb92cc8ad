//! Batched JSON inserts into one resource table.
//!
//! `POST /api/records/{resource}` takes a JSON array of 1 to 1000 records. The batch
//! is validated as a whole and inserted in one transaction: `404` unknown resource,
//! `400` bad batch size, `422` a record does not match the resource shape, `500` the
//! write failed and was rolled back.

use actix_web::web::{post, scope};
use actix_web::Scope;

mod insert;

const API_PATH: &str = "/api/records";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/{resource}", post().to(insert::process))
}
