//! Provider implementation for the collection-point backend (categories, point
//! search, and point detail).

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use coleta_core::{
    model::{Category, CategoryId, Coordinate, Point, PointDetail, PointId},
    plugin::BackendPlugin,
    ports::{CategoryPort, PointPort, PointQuery, PortError},
};

/// Category as returned by /items
#[derive(Debug, Deserialize)]
struct ItemEntry {
    id: u32,
    title: String,
    image_url: String,
}

/// Point as returned by /points and inside /points/{id}
#[derive(Debug, Deserialize)]
struct PointEntry {
    id: u64,
    name: String,
    image: String,
    latitude: f64,
    longitude: f64,
}

/// Response from /points/{id}
#[derive(Debug, Deserialize)]
struct PointDetailResponse {
    point: PointRecord,
    #[serde(default)]
    items: Vec<ItemTitle>,
}

/// Full point row; the summary fields are shared with the search result.
#[derive(Debug, Deserialize)]
struct PointRecord {
    #[serde(flatten)]
    summary: PointEntry,
    #[serde(default)]
    email: String,
    #[serde(default)]
    whatsapp: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    uf: String,
}

#[derive(Debug, Deserialize)]
struct ItemTitle {
    title: String,
}

/// Category catalog served by the backend.
pub struct BackendCategoryPort {
    client: Client,
    base_url: String,
}

impl BackendCategoryPort {
    /// Create a new category port bound to the given HTTP client and backend root.
    #[must_use]
    pub fn new<S: Into<String>>(client: Client, base_url: S) -> Self {
        Self {
            client,
            base_url: trim_base(base_url.into()),
        }
    }
}

#[async_trait]
impl CategoryPort for BackendCategoryPort {
    async fn categories(&self) -> Result<Vec<Category>, PortError> {
        let items =
            fetch_json::<Vec<ItemEntry>>(self.client.get(format!("{}/items", self.base_url)))
                .await?;

        Ok(items
            .into_iter()
            .map(|item| Category {
                id: CategoryId(item.id),
                title: item.title,
                icon_ref: item.image_url,
            })
            .collect())
    }
}

/// Point search and detail served by the backend.
pub struct BackendPointPort {
    client: Client,
    base_url: String,
}

impl BackendPointPort {
    /// Create a new point port bound to the given HTTP client and backend root.
    #[must_use]
    pub fn new<S: Into<String>>(client: Client, base_url: S) -> Self {
        Self {
            client,
            base_url: trim_base(base_url.into()),
        }
    }
}

#[async_trait]
impl PointPort for BackendPointPort {
    async fn search(&self, query: &PointQuery) -> Result<Vec<Point>, PortError> {
        let mut req = self
            .client
            .get(format!("{}/points", self.base_url))
            .query(&[
                ("city", query.municipality.name.as_str()),
                ("uf", query.region.code.as_str()),
            ]);

        // No `items` parameter at all means every category is admitted.
        if let Some(items) = query.items_param() {
            req = req.query(&[("items", items)]);
        }

        let points = fetch_json::<Vec<PointEntry>>(req).await?;
        debug!("backend returned {} points", points.len());

        Ok(points.into_iter().map(into_point).collect())
    }

    async fn detail(&self, id: PointId) -> Result<PointDetail, PortError> {
        let resp = self
            .client
            .get(format!("{}/points/{id}", self.base_url))
            .send()
            .await
            .map_err(PortError::from)?;

        // The backend answers unknown ids with 400 and a message body.
        if matches!(resp.status(), StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST) {
            return Err(PortError::PointNotFound);
        }

        let body = resp
            .error_for_status()
            .map_err(PortError::from)?
            .text()
            .await
            .map_err(PortError::from)?;
        let detail: PointDetailResponse = serde_json::from_str(&body)?;

        Ok(PointDetail {
            point: into_point(detail.point.summary),
            email: detail.point.email,
            whatsapp: detail.point.whatsapp,
            city: detail.point.city,
            uf: detail.point.uf,
            items: detail.items.into_iter().map(|item| item.title).collect(),
        })
    }
}

/// Build the plugin bundle for the backend provider.
#[must_use]
pub fn plugin(client: Client, base_url: &str) -> BackendPlugin {
    let category_port = Arc::new(BackendCategoryPort::new(client.clone(), base_url));
    let point_port = Arc::new(BackendPointPort::new(client, base_url));

    BackendPlugin {
        category_port,
        point_port,
    }
}

fn into_point(entry: PointEntry) -> Point {
    Point {
        id: PointId(entry.id),
        name: entry.name,
        image_ref: entry.image,
        coordinate: Coordinate::new(entry.latitude, entry.longitude),
    }
}

fn trim_base(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    let body = req
        .send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .text()
        .await
        .map_err(PortError::from)?;
    serde_json::from_str(&body).map_err(PortError::from)
}
