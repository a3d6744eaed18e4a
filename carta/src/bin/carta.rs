use carta::args::Args;
use carta::srv::new_server;
use carta::CartaResult;
use carta_core::map::MapStore;
use carta_core::render::{LabelFont, Renderer};
use clap::Parser;
use log::{error, info, warn};

const VERSION: &str = env!("CARGO_PKG_VERSION");

async fn start(args: Args) -> CartaResult<()> {
    info!("Starting Carta v{VERSION}");

    let store = MapStore::open(&args.map_file)?;
    info!("Opened map file {}", store.path().display());

    let mut renderer = Renderer::new(store);
    match &args.font {
        Some(font) => renderer = renderer.with_label_font(LabelFont::load(font)?),
        None => warn!("No --font given; place-name labels will not be drawn"),
    }

    let server = new_server(renderer, &args.listen)?;
    info!("Carta has been started on {}.", args.listen);
    info!(
        "Try http://{}/render?min_lon=13.0&min_lat=52.3&max_lon=13.8&max_lat=52.7&size=512",
        args.listen
    );

    server.await?;
    Ok(())
}

#[actix_web::main]
async fn main() {
    let env = env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "carta=info");
    env_logger::Builder::from_env(env).init();

    if let Err(e) = start(Args::parse()).await {
        error!("{e}");
        std::process::exit(1);
    }
}
