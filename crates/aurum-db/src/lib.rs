//! # aurum-db: Persistence Layer for Aurum Estimate
//!
//! SQLite storage behind the estimation store's gateway, plus the counter's
//! deployment configuration.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Aurum Estimate Data Flow                          │
//! │                                                                         │
//! │  EstimationStore (aurum-core)                                          │
//! │       │  EstimationGateway                                             │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     aurum-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │ SqliteGateway │───►│  Repositories  │    │  Migrations  │  │   │
//! │  │   │ (gateway.rs)  │    │                │    │  (embedded)  │  │   │
//! │  │   └───────────────┘    │ RateSheetRepo  │    │ 001_init.sql │  │   │
//! │  │   ┌───────────────┐    │ EstimationRepo │    └──────────────┘  │   │
//! │  │   │   Database    │◄───│                │                      │   │
//! │  │   │   (pool.rs)   │    └────────────────┘                      │   │
//! │  │   └───────────────┘                                             │   │
//! │  │   EstimateConfig (config.rs) ─► DbConfig + PricingConfig       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   SQLite: <data dir>/aurum.db                                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - `estimate.toml` loading, env overrides, validation
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - Rate sheet and estimation repositories
//! - [`gateway`] - `EstimationGateway` over the repositories
//! - [`logging`] - tracing subscriber setup for binaries
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aurum_core::EstimationStore;
//! use aurum_db::{Database, EstimateConfig, SqliteGateway};
//!
//! let config = EstimateConfig::load_or_default(None);
//! let db = Database::new(config.db_config()).await?;
//!
//! let mut store = EstimationStore::new(SqliteGateway::new(db), config.pricing());
//! store.load().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, EstimateConfig};
pub use error::DbError;
pub use gateway::SqliteGateway;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::estimation::EstimationRepository;
pub use repository::rate_sheet::RateSheetRepository;
