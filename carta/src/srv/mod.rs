//! The HTTP surface: one route that renders a geographic region to PNG.

use actix_web::dev::Server;
use actix_web::error::ErrorBadRequest;
use actix_web::web::{Data, Query};
use actix_web::{App, HttpResponse, HttpServer, Result as ActixResult, middleware, route};
use carta_core::render::{RenderQuery, Renderer};
use log::error;
use serde::Deserialize;

use crate::error::{CartaError, CartaResult};

/// Upper bound on the output edge size; anything above this is a client
/// error rather than an allocation.
pub const MAX_RENDER_SIZE: u32 = 4096;

/// Query parameters of the `/render` route.
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct RenderRequest {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
    pub size: u32,
}

fn map_internal_error<T: std::fmt::Display>(e: T) -> actix_web::Error {
    error!("{e}");
    actix_web::error::ErrorInternalServerError(e.to_string())
}

#[route("/health", method = "GET", method = "HEAD")]
#[allow(clippy::unused_async)]
async fn get_health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

/// Renders the requested region and returns it as `image/png`.
#[route("/render", method = "GET")]
async fn get_render(
    request: Query<RenderRequest>,
    renderer: Data<Renderer>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    if request.size == 0 || request.size > MAX_RENDER_SIZE {
        return Err(ErrorBadRequest(format!(
            "size must be between 1 and {MAX_RENDER_SIZE}, got {}",
            request.size
        )));
    }

    let query = RenderQuery {
        min_lon: request.min_lon,
        min_lat: request.min_lat,
        max_lon: request.max_lon,
        max_lat: request.max_lat,
        size: request.size,
    };
    let png = renderer.render(&query).map_err(map_internal_error)?;

    Ok(HttpResponse::Ok().content_type("image/png").body(png))
}

/// Builds the HTTP server around one shared [`Renderer`].
pub fn new_server(renderer: Renderer, listen: &str) -> CartaResult<Server> {
    let renderer = Data::new(renderer);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(renderer.clone())
            .wrap(middleware::Logger::default())
            .service(get_health)
            .service(get_render)
    })
    .bind(listen)
    .map_err(|e| CartaError::BindingError(e, listen.to_string()))?
    .run();
    Ok(server)
}
