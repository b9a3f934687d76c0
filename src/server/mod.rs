pub mod config;
mod error;
mod http_layers;
pub mod server;
pub mod song_routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::*;
pub use server::{make_app, run_server};
pub(self) use song_routes::make_song_routes;
