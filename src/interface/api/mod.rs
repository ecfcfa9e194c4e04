//! API interface implementations

pub mod dto;
pub mod identity;
pub mod metrics_handler;
pub mod router;
pub mod signaling_handler;
pub mod ws_handler;

pub use dto::ApiResponse;
pub use identity::{AuthenticatedPrincipal, PRINCIPAL_HEADER};
pub use metrics_handler::{init_metrics, update_active_calls};
pub use router::build_router;
pub use signaling_handler::AppState;
