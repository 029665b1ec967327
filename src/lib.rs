pub mod app;
pub mod attendance;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod live;
pub mod models;
pub mod presentation;
pub mod registry;
pub mod storage;
pub mod ui;
pub mod state;
pub mod variant;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::load_data;
