pub mod csrf;
pub mod fallback;
pub mod middleware;
pub mod router;
pub mod state;
pub mod upload;
