//! Provider implementation for Brazilian states and municipalities using the IBGE
//! locality API.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use coleta_core::{
    model::{Municipality, Region},
    plugin::LocalityPlugin,
    ports::{MunicipalityPort, PortError, RegionPort},
};

/// State as returned by /estados
#[derive(Debug, Deserialize)]
struct StateEntry {
    sigla: String,
    // id, nome and regiao exist but the code is all we show
}

/// Municipality as returned by /estados/{sigla}/municipios
#[derive(Debug, Deserialize)]
struct MunicipalityEntry {
    nome: String,
}

/// Region list backed by IBGE.
pub struct IbgeRegionPort {
    client: Client,
    base_url: String,
}

impl IbgeRegionPort {
    /// Create a new region port bound to the given HTTP client and API root.
    #[must_use]
    pub fn new<S: Into<String>>(client: Client, base_url: S) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RegionPort for IbgeRegionPort {
    async fn regions(&self) -> Result<Vec<Region>, PortError> {
        let url = endpoint(&self.base_url, &["estados"])?;
        let states = fetch_json::<Vec<StateEntry>>(self.client.get(url)).await?;

        // API order is kept; blank codes cannot be queried so they are skipped.
        Ok(states
            .into_iter()
            .filter_map(|state| {
                let region = Region::new(state.sigla);
                if region.is_none() {
                    warn!("skipping state with blank sigla");
                }
                region
            })
            .collect())
    }
}

/// Municipality list backed by IBGE.
pub struct IbgeMunicipalityPort {
    client: Client,
    base_url: String,
}

impl IbgeMunicipalityPort {
    /// Create a new municipality port bound to the given HTTP client and API root.
    #[must_use]
    pub fn new<S: Into<String>>(client: Client, base_url: S) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MunicipalityPort for IbgeMunicipalityPort {
    async fn municipalities(&self, region: &Region) -> Result<Vec<Municipality>, PortError> {
        let url = endpoint(&self.base_url, &["estados", &region.code, "municipios"])?;
        let entries = fetch_json::<Vec<MunicipalityEntry>>(self.client.get(url)).await?;

        Ok(entries
            .into_iter()
            .map(|entry| Municipality::new(entry.nome))
            .collect())
    }
}

/// Build the plugin bundle for the IBGE provider.
#[must_use]
pub fn plugin(client: Client, base_url: &str) -> LocalityPlugin {
    let region_port = Arc::new(IbgeRegionPort::new(client.clone(), base_url));
    let municipality_port = Arc::new(IbgeMunicipalityPort::new(client, base_url));

    LocalityPlugin {
        region_port,
        municipality_port,
    }
}

/// Append path segments to the API root, escaping each one.
fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, PortError> {
    let mut url = Url::parse(base_url)
        .map_err(|err| PortError::Internal(format!("invalid IBGE URL {base_url}: {err}")))?;
    url.path_segments_mut()
        .map_err(|()| PortError::Internal(format!("IBGE URL {base_url} cannot have a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
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
