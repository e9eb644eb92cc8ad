//! Named SQL templates, addressed by file name without the `.sql` suffix.
//!
//! - `POST /api/queries/{name}`: parameters as a JSON object body (an empty body means none).
//! - `GET /api/queries/{name}`: parameters from the query string, bound as text.
//!
//! Both respond with a JSON array of row objects, `404` when the template does not
//! exist and `500` when it fails to execute.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod run;

const API_PATH: &str = "/api/queries";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/{name}", post().to(run::process))
        .route("/{name}", get().to(run::process_query_string))
}
