pub mod router;
pub mod types;
pub mod handlers {
    pub mod common;
    pub mod health;
    pub mod staking;
    pub mod zoo;
}

pub use router::{create_router, ApiDoc, ROUTES};
pub use types::AppState;
