pub mod api;
pub mod healthz;
pub mod resources;

use actix_web::HttpRequest;

use crate::server::response::Response;

pub trait Handler {
    fn handle(&self, path: &str, req: HttpRequest, body: Option<Vec<u8>>) -> Response;
}
