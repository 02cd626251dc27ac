// Doc QA - ask questions about uploaded PDF, Word, Excel, PowerPoint and text files

pub mod agents;
pub mod config;
pub mod documents;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod registry;
pub mod routes;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
