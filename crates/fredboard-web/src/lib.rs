//! # Fredboard Web
//!
//! HTTP handler surface over [`fredboard_core`]: validates inbound parameters,
//! delegates to the shared client and renders `{data, error, cached, timestamp}`
//! envelopes whose status mirrors the error's status code.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /api/fred/observations` | [`handlers::observations`] |
//! | `GET /api/fred/series` | [`handlers::series`] |
//! | `GET /api/fred/search` | [`handlers::search`] |
//! | `GET /api/fred/category-series` | [`handlers::category_series`] |
//! | `POST /api/fred/multi` | [`handlers::multi`] |
//! | `GET /api/fred/presets` | [`handlers::presets`] |
//! | `GET /api/fred/presets/:slug` | [`handlers::preset_observations`] |
//! | `GET /api/status` | [`handlers::status`] |
//! | `POST /api/validate-keys` | [`handlers::validate_keys`] |

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;
pub mod state;

pub use config::ServerArgs;
pub use error::{ApiError, ServerError};
pub use extract::FirstQuery;
pub use server::{router, serve};
pub use state::AppState;
