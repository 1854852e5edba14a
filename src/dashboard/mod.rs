pub mod server;
pub mod stream;
pub mod utils;

pub use server::{dashboard_router, serve_dashboard, start_dashboard_server};
