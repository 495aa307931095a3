//! # Doppler Workplace
//!
//! Typed client for the workplace roles and permissions endpoints of the
//! Doppler API (`/v3/workplace`).
//!
//! ## Overview
//!
//! The crate handles:
//! - **Roles**: list, retrieve, create, update and delete workplace roles
//! - **Permissions**: list the permission identifiers roles can grant
//! - **Execution**: a pluggable [`RequestExecutor`] with an HTTP implementation
//! - **Configuration**: API host, token and timeout from the environment
//!
//! ## Endpoints
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | `list_roles` | GET | `/v3/workplace/roles` |
//! | `list_permissions` | GET | `/v3/workplace/permissions` |
//! | `retrieve_role` | GET | `/v3/workplace/roles/role/{role}` |
//! | `create_role` | POST | `/v3/workplace/roles` |
//! | `update_role` | PATCH | `/v3/workplace/roles/role/{role}` |
//! | `delete_role` | DELETE | `/v3/workplace/roles/role/{role}` |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use doppler_workplace::{ApiConfig, CreateWorkplaceRoleParams, WorkplaceRoleClient};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::from_env()?;
//!     let client = WorkplaceRoleClient::from_config(config)?;
//!
//!     let roles = client.list_roles().await?;
//!     println!("{} roles", roles.roles.len());
//!
//!     let role = client
//!         .create_role(CreateWorkplaceRoleParams::new("viewer", ["workplace_read"]))
//!         .await?;
//!     println!("created {}", role.identifier);
//!     Ok(())
//! }
//! ```
//!
//! ## Custom executors
//!
//! Anything implementing [`RequestExecutor`] can back the client, which is
//! how callers add their own transport or how tests stub the API out.

pub mod config;
pub mod error;
pub mod executor;
pub mod roles;

pub use config::{ApiConfig, ConfigError};
pub use error::{TransportError, WorkplaceError, WorkplaceResult};
pub use executor::{ApiRequest, HttpExecutor, RequestExecutor};
pub use roles::{
    CreateWorkplaceRoleParams, RetrieveWorkplaceRoleResponse, WorkplacePermissions,
    WorkplaceRole, WorkplaceRoleClient, WorkplaceRoles, WORKPLACE_PATH,
};
