//! # REST Client
//!
//! [`VenueApiClient`] is one authenticated session against the venue-mapping
//! API. It owns the HTTP connection pool and the session cookie jar.
//!
//! ## Request Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  {server_url}/api/v1/{collection}[/{id}]                               │
//! │      ?api_key=...&organizationId=...   (every request)                 │
//! │      &venueId=...&isPublished=all      (venue-scoped lists)            │
//! │      &page=N                           (paginated lists)               │
//! │                                                                         │
//! │  Response status                                                       │
//! │  ───────────────                                                       │
//! │  2xx        → JSON body (empty body → none)                            │
//! │  404        → ApiError::NotFound                                       │
//! │  otherwise  → ApiError::Remote { status, body }                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried. Transport failures surface as
//! [`ApiError::ConnectionFailed`] or [`ApiError::Timeout`].

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;
use venuesync_core::{is_equal, Record, ResourceKind};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};

const API_PREFIX: &str = "/api/v1";

// =============================================================================
// Layer Image Corners
// =============================================================================

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

/// Where the four corners of a layer image sit on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageCorners {
    pub top_left: LatLng,
    pub top_right: LatLng,
    pub bottom_left: LatLng,
    pub bottom_right: LatLng,
}

impl ImageCorners {
    /// The `importJob` part of an image upload.
    fn import_job(&self) -> Value {
        json!({
            "corners": [self.top_left, self.top_right, self.bottom_left, self.bottom_right]
        })
    }
}

// =============================================================================
// Client
// =============================================================================

/// Authenticated session against the venue-mapping API.
///
/// Cheap to clone: clones share the connection pool and cookie jar.
#[derive(Clone)]
pub struct VenueApiClient {
    http: reqwest::Client,
    server_url: String,
    api_key: String,
    organization_id: String,
}

impl std::fmt::Debug for VenueApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VenueApiClient")
            .field("server_url", &self.server_url)
            .field("organization_id", &self.organization_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl VenueApiClient {
    /// Builds a session from a validated configuration.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout())
            .user_agent(concat!("venuesync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(
            server_url = %config.api.server_url,
            organization_id = %config.api.organization_id,
            "API client created"
        );

        Ok(VenueApiClient {
            http,
            server_url: config.api.server_url.trim_end_matches('/').to_string(),
            api_key: config.api.api_key.clone(),
            organization_id: config.api.organization_id.clone(),
        })
    }

    /// Returns the server URL requests are sent to.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Returns the organization every request is scoped to.
    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Signs in with user credentials.
    ///
    /// The session cookie set by the server is kept for later requests made
    /// through this client and its clones.
    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<Value> {
        let response = self
            .request(Method::POST, "/auth/signin")?
            .form(&[("email", email), ("password", password)])
            .send()
            .await?;

        let user = read_body(response, "user", email).await?;
        info!(email, "Signed in");
        Ok(user.unwrap_or(Value::Null))
    }

    // =========================================================================
    // Venues
    // =========================================================================

    /// Lists every venue of the organization, published or not.
    pub async fn venues(&self) -> ApiResult<Vec<Record>> {
        let kind = ResourceKind::Venue;
        let response = self
            .request(Method::GET, &collection_path(kind))?
            .query(&[("isPublished", "all")])
            .send()
            .await?;

        let body = read_body(response, kind.collection(), &self.organization_id).await?;
        records_from(body)
    }

    /// Creates a venue.
    pub async fn create_venue(&self, venue: &Record) -> ApiResult<Record> {
        self.create(ResourceKind::Venue, venue).await
    }

    /// Updates a venue; the record must carry `_id`.
    pub async fn update_venue(&self, venue: &Record) -> ApiResult<Record> {
        self.update(ResourceKind::Venue, venue).await
    }

    // =========================================================================
    // Generic Resource Operations
    // =========================================================================

    /// Fetches one record by id.
    pub async fn get(&self, kind: ResourceKind, id: &str) -> ApiResult<Record> {
        let response = self
            .request(Method::GET, &record_path(kind, id))?
            .send()
            .await?;

        let body = read_body(response, kind.singular(), id).await?;
        record_from(body)
    }

    /// Lists every record of `kind` belonging to a venue.
    ///
    /// Paginated kinds are fetched page by page until an empty page comes
    /// back; pages are concatenated in order.
    pub async fn list_for_venue(
        &self,
        kind: ResourceKind,
        venue_id: &str,
    ) -> ApiResult<Vec<Record>> {
        if kind == ResourceKind::Venue {
            return Err(ApiError::UnsupportedKind {
                kind,
                reason: "venues are not venue-scoped, use venues()".into(),
            });
        }

        let mut query = vec![("venueId", venue_id.to_string())];
        if kind.lists_all_publication_states() {
            query.push(("isPublished", "all".to_string()));
        }

        if !kind.is_paginated() {
            return self.list_page(kind, venue_id, &query).await;
        }

        let mut records = Vec::new();
        for page in 1u32.. {
            let mut paged = query.clone();
            paged.push(("page", page.to_string()));

            let batch = self.list_page(kind, venue_id, &paged).await?;
            if batch.is_empty() {
                break;
            }
            debug!(%kind, venue_id, page, count = batch.len(), "Fetched page");
            records.extend(batch);
        }

        Ok(records)
    }

    /// Creates a record and returns the server copy (with `_id`).
    pub async fn create(&self, kind: ResourceKind, record: &Record) -> ApiResult<Record> {
        let response = self
            .request(Method::POST, &collection_path(kind))?
            .json(record)
            .send()
            .await?;

        let body = read_body(response, kind.singular(), record.name().unwrap_or_default()).await?;
        record_from(body)
    }

    /// Replaces a record identified by its `_id`.
    pub async fn update(&self, kind: ResourceKind, record: &Record) -> ApiResult<Record> {
        let id = record.id().ok_or(ApiError::MissingId { kind })?;

        let response = self
            .request(Method::PUT, &record_path(kind, id))?
            .json(record)
            .send()
            .await?;

        match read_body(response, kind.singular(), id).await? {
            Some(body) => record_from(Some(body)),
            None => Ok(record.clone()),
        }
    }

    /// Deletes a record by id.
    pub async fn delete(&self, kind: ResourceKind, id: &str) -> ApiResult<()> {
        let response = self
            .request(Method::DELETE, &record_path(kind, id))?
            .send()
            .await?;

        read_body(response, kind.singular(), id).await?;
        Ok(())
    }

    // =========================================================================
    // Layer Images and Route Graphs
    // =========================================================================

    /// Uploads a PNG as the image of a layer, georeferenced by its corners.
    pub async fn upload_layer_image(
        &self,
        layer_id: &str,
        png: Vec<u8>,
        corners: ImageCorners,
    ) -> ApiResult<Value> {
        let image = Part::bytes(png)
            .file_name("image.png")
            .mime_str("image/png")?;
        let form = Form::new()
            .text("importJob", corners.import_job().to_string())
            .part("file", image);

        let path = format!("{}/image", record_path(ResourceKind::Layer, layer_id));
        let response = self.request(Method::POST, &path)?.multipart(form).send().await?;

        let body = read_body(response, ResourceKind::Layer.singular(), layer_id).await?;
        info!(layer_id, "Layer image uploaded");
        Ok(body.unwrap_or(Value::Null))
    }

    /// Creates or replaces the route graph of one floor of a venue.
    ///
    /// An existing graph whose content already matches is returned as is,
    /// without a write.
    pub async fn upsert_route_graph_for_floor(
        &self,
        venue_id: &str,
        floor: f64,
        graph: &Record,
    ) -> ApiResult<Record> {
        let kind = ResourceKind::RouteGraph;
        let query = [("venueId", venue_id.to_string()), ("floor", floor.to_string())];
        let existing = self.list_page(kind, venue_id, &query).await?;

        let payload = graph
            .clone()
            .with("venueId", venue_id)
            .with("floor", floor);

        match existing.into_iter().next() {
            Some(current) => {
                let id = current
                    .id()
                    .ok_or(ApiError::MissingId { kind })?
                    .to_string();
                let payload = payload.with_id(id.as_str());

                if is_equal(kind, &payload, &current) {
                    debug!(venue_id, floor, "Route graph unchanged");
                    return Ok(current);
                }

                info!(venue_id, floor, id = %id, "Updating route graph");
                self.update(kind, &payload).await
            }
            None => {
                info!(venue_id, floor, "Creating route graph");
                self.create(kind, &payload).await
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn list_page(
        &self,
        kind: ResourceKind,
        venue_id: &str,
        query: &[(&str, String)],
    ) -> ApiResult<Vec<Record>> {
        let response = self
            .request(Method::GET, &collection_path(kind))?
            .query(query)
            .send()
            .await?;

        let body = read_body(response, kind.collection(), venue_id).await?;
        records_from(body)
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = Url::parse(&format!("{}{}", self.server_url, path))?;
        debug!(%method, path, "API request");

        Ok(self.http.request(method, url).query(&[
            ("api_key", self.api_key.as_str()),
            ("organizationId", self.organization_id.as_str()),
        ]))
    }
}

// =============================================================================
// Typed Shorthands
// =============================================================================

macro_rules! venue_resource_methods {
    ($($kind:ident => $list:ident, $create:ident, $update:ident, $delete:ident;)*) => {
        impl VenueApiClient {
            $(
                #[doc = concat!("Lists every ", stringify!($kind), " of a venue.")]
                pub async fn $list(&self, venue_id: &str) -> ApiResult<Vec<Record>> {
                    self.list_for_venue(ResourceKind::$kind, venue_id).await
                }

                #[doc = concat!("Creates a ", stringify!($kind), ".")]
                pub async fn $create(&self, record: &Record) -> ApiResult<Record> {
                    self.create(ResourceKind::$kind, record).await
                }

                #[doc = concat!("Updates a ", stringify!($kind), "; the record must carry `_id`.")]
                pub async fn $update(&self, record: &Record) -> ApiResult<Record> {
                    self.update(ResourceKind::$kind, record).await
                }

                #[doc = concat!("Deletes a ", stringify!($kind), " by id.")]
                pub async fn $delete(&self, id: &str) -> ApiResult<()> {
                    self.delete(ResourceKind::$kind, id).await
                }
            )*
        }
    };
}

venue_resource_methods! {
    Layer => layers, create_layer, update_layer, delete_layer;
    Place => places, create_place, update_place, delete_place;
    PlaceList => place_lists, create_place_list, update_place_list, delete_place_list;
    Connector => connectors, create_connector, update_connector, delete_connector;
    Beacon => beacons, create_beacon, update_beacon, delete_beacon;
    Universe => universes, create_universe, update_universe, delete_universe;
}

// =============================================================================
// Response Handling
// =============================================================================

fn collection_path(kind: ResourceKind) -> String {
    format!("{}/{}", API_PREFIX, kind.collection())
}

fn record_path(kind: ResourceKind, id: &str) -> String {
    format!("{}/{}/{}", API_PREFIX, kind.collection(), id)
}

/// Maps a response to its JSON body, or to an error by status.
async fn read_body(response: Response, resource: &str, id: &str) -> ApiResult<Option<Value>> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Remote {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    Ok(Some(serde_json::from_slice(&bytes)?))
}

fn record_from(body: Option<Value>) -> ApiResult<Record> {
    let value = body.ok_or_else(|| ApiError::InvalidRecord("empty response body".into()))?;
    Ok(Record::from_value(value)?)
}

fn records_from(body: Option<Value>) -> ApiResult<Vec<Record>> {
    match body {
        Some(value) => Ok(Record::list_from_value(value)?),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(collection_path(ResourceKind::PlaceList), "/api/v1/placeLists");
        assert_eq!(record_path(ResourceKind::Place, "p1"), "/api/v1/places/p1");
    }

    #[test]
    fn test_import_job_corner_order() {
        let corners = ImageCorners {
            top_left: LatLng::new(1.0, 1.0),
            top_right: LatLng::new(1.0, 2.0),
            bottom_left: LatLng::new(0.0, 1.0),
            bottom_right: LatLng::new(0.0, 2.0),
        };

        assert_eq!(
            corners.import_job(),
            json!({"corners": [
                {"lat": 1.0, "lng": 1.0},
                {"lat": 1.0, "lng": 2.0},
                {"lat": 0.0, "lng": 1.0},
                {"lat": 0.0, "lng": 2.0}
            ]})
        );
    }

    #[test]
    fn test_new_rejects_missing_credentials() {
        let err = VenueApiClient::new(&ClientConfig::default()).unwrap_err();
        assert!(matches!(err, ApiError::MissingApiKey));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = VenueApiClient::new(&ClientConfig::new("secret-key", "org")).unwrap();
        let printed = format!("{client:?}");
        assert!(!printed.contains("secret-key"));
        assert!(printed.contains("org"));
    }
}
