//! Workplace roles client.
//!
//! Typed access to the `/v3/workplace` role and permission endpoints. Every
//! operation builds one [`ApiRequest`], hands it to the configured
//! [`RequestExecutor`] and decodes the JSON body into the operation's result
//! type. Executor errors are returned unchanged.

use crate::config::ApiConfig;
use crate::error::{TransportError, WorkplaceError, WorkplaceResult};
use crate::executor::{ApiRequest, HttpExecutor, RequestExecutor};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, instrument, warn};

/// Path prefix of the workplace API.
pub const WORKPLACE_PATH: &str = "/v3/workplace";

/// Workplace roles and permissions client.
///
/// Holds nothing but its executor, so it is as cheap to clone and as safe to
/// share between tasks as the executor itself.
#[derive(Debug, Clone)]
pub struct WorkplaceRoleClient<E = HttpExecutor> {
    executor: E,
}

impl WorkplaceRoleClient<HttpExecutor> {
    /// Create a client that talks HTTP to the configured API host.
    pub fn from_config(config: ApiConfig) -> Result<Self, TransportError> {
        Ok(Self::new(HttpExecutor::new(config)?))
    }
}

impl<E> WorkplaceRoleClient<E>
where
    E: RequestExecutor,
{
    /// Create a client over any request executor.
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// The executor requests are delegated to.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// List the roles defined in the workplace.
    #[instrument(skip(self))]
    pub async fn list_roles(&self) -> WorkplaceResult<WorkplaceRoles> {
        debug!("Listing workplace roles");

        let request = ApiRequest::new(Method::GET, format!("{}/roles", WORKPLACE_PATH));
        let body = self.send(request).await?;
        decode(&body)
    }

    /// List every permission identifier a role may be granted.
    #[instrument(skip(self))]
    pub async fn list_permissions(&self) -> WorkplaceResult<WorkplacePermissions> {
        debug!("Listing workplace permissions");

        let request = ApiRequest::new(Method::GET, format!("{}/permissions", WORKPLACE_PATH));
        let body = self.send(request).await?;
        decode(&body)
    }

    /// Retrieve a single role by name.
    ///
    /// Fails with [`WorkplaceError::InvalidRequest`] for an empty or
    /// whitespace-only name, without sending anything.
    #[instrument(skip(self), fields(role = %role))]
    pub async fn retrieve_role(&self, role: &str) -> WorkplaceResult<RetrieveWorkplaceRoleResponse> {
        debug!("Retrieving workplace role {}", role);

        let request = ApiRequest::new(Method::GET, role_path(role)?);
        let body = self.send(request).await?;
        decode(&body)
    }

    /// Create a custom role.
    #[instrument(skip(self, params), fields(role = %params.name))]
    pub async fn create_role(
        &self,
        params: CreateWorkplaceRoleParams,
    ) -> WorkplaceResult<WorkplaceRole> {
        debug!("Creating workplace role {}", params.name);

        let payload = serde_json::to_vec(&params).map_err(WorkplaceError::Encode)?;
        let request =
            ApiRequest::new(Method::POST, format!("{}/roles", WORKPLACE_PATH)).with_body(payload);
        let body = self.send(request).await?;
        decode(&body)
    }

    /// Update a role.
    ///
    /// The update payload is not documented upstream, so this sends the PATCH
    /// without a body and the server is not asked to change anything. Treat
    /// it as partial until the request shape is confirmed.
    #[instrument(skip(self), fields(role = %role))]
    pub async fn update_role(&self, role: &str) -> WorkplaceResult<WorkplaceRole> {
        warn!("Updating workplace role {} without a payload", role);

        let request = ApiRequest::new(Method::PATCH, role_path(role)?);
        let body = self.send(request).await?;
        decode(&body)
    }

    /// Delete a role.
    ///
    /// Returns the response body as text, byte for byte. Its shape is not
    /// modeled. A body that is not valid UTF-8 fails with
    /// [`WorkplaceError::InvalidText`] rather than being altered.
    #[instrument(skip(self), fields(role = %role))]
    pub async fn delete_role(&self, role: &str) -> WorkplaceResult<String> {
        debug!("Deleting workplace role {}", role);

        let request = ApiRequest::new(Method::DELETE, role_path(role)?);
        let body = self.send(request).await?;
        Ok(String::from_utf8(body)?)
    }

    async fn send(&self, request: ApiRequest) -> WorkplaceResult<Vec<u8>> {
        Ok(self.executor.execute(request).await?)
    }
}

/// Build the path of a single role, encoding the name as one segment.
///
/// Whitespace-only names are rejected along with the empty name, since no
/// role can be named that way.
fn role_path(role: &str) -> WorkplaceResult<String> {
    if role.trim().is_empty() {
        return Err(WorkplaceError::InvalidRequest(
            "role name must not be empty".to_string(),
        ));
    }
    Ok(format!(
        "{}/roles/role/{}",
        WORKPLACE_PATH,
        urlencoding::encode(role)
    ))
}

fn decode<T>(body: &[u8]) -> WorkplaceResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(WorkplaceError::Decode)
}

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A workplace role.
///
/// Every field is optional on the wire; missing fields take their zero value
/// and zero values are left out when serializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkplaceRole {
    /// Role name.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,

    /// Permission identifiers granted by the role.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub permissions: Vec<String>,

    /// Stable role identifier.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub identifier: String,

    /// Creation timestamp (ISO 8601).
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub created_at: String,

    /// Whether the role was defined by the workplace rather than built in.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_false"
    )]
    pub is_custom_role: bool,

    /// Whether the role is an inline role.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_false"
    )]
    pub is_inline_role: bool,
}

impl WorkplaceRole {
    /// Parse `created_at`, if present and well formed.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// Check whether the role grants a permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Response from listing roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkplaceRoles {
    /// Roles, in server order.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub roles: Vec<WorkplaceRole>,

    /// Whether the API reported success.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_false"
    )]
    pub success: bool,
}

impl WorkplaceRoles {
    /// Find a role by name.
    pub fn find(&self, name: &str) -> Option<&WorkplaceRole> {
        self.roles.iter().find(|role| role.name == name)
    }
}

/// Response from listing permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkplacePermissions {
    /// Permission identifiers, in server order.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub permissions: Vec<String>,

    /// Whether the API reported success.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_false"
    )]
    pub success: bool,
}

impl WorkplacePermissions {
    /// Check whether a permission identifier exists.
    pub fn contains(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Response from retrieving a single role.
///
/// The API documents this payload as a project role, but it carries the same
/// fields as a workplace role, so both decode into [`WorkplaceRole`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveWorkplaceRoleResponse {
    /// The role.
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: WorkplaceRole,

    /// Whether the API reported success.
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
}

/// Parameters for creating a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWorkplaceRoleParams {
    /// Role name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Permission identifiers to grant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}

impl CreateWorkplaceRoleParams {
    /// Create parameters for a role with the given permissions.
    pub fn new<I, S>(name: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }
}
