// src/dhis2/mod.rs
//
// Thin client for the DHIS2 web API: metadata lookups feeding
// reconciliation, plus data-value submission. Only the endpoints the
// pipeline needs are covered.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::assemble::DataValueSet;
use crate::error::{Error, Result};
use crate::metadata::FormDescription;

/// Server coordinates, passed explicitly to every call site. Credentials are
/// never process-global.
#[derive(Debug, Clone, Deserialize)]
pub struct Dhis2Config {
    pub server_url: String,
    pub username: String,
    pub password: String,
}

/// A data set as listed on an organisation unit.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSetRef {
    pub id: String,
}

/// A direct child of an organisation unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnitChild {
    pub name: String,
    #[serde(default)]
    pub data_sets: Vec<DataSetRef>,
    pub id: String,
}

/// Name, id and period type of a data set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSetInfo {
    pub name: String,
    pub id: String,
    pub period_type: String,
}

pub struct Dhis2Client {
    http: Client,
    config: Dhis2Config,
}

impl Dhis2Client {
    pub fn new(http: Client, config: Dhis2Config) -> Self {
        Dhis2Client { http, config }
    }

    /// Search metadata items by name, returning `(display name, id)` pairs.
    /// Data elements are matched on their form name; everything else on its
    /// plain name.
    pub async fn search_identifiers(
        &self,
        item_type: &str,
        search_terms: &[String],
    ) -> Result<Vec<(String, String)>> {
        let url = search_url(&self.config.server_url, item_type, search_terms)?;
        let data: serde_json::Value = self.get_json(url).await?;

        let items = data
            .get(item_type)
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        info!(count = items.len(), item_type, "metadata matches");

        Ok(items
            .iter()
            .filter_map(|item| {
                let name = item.get("displayName")?.as_str()?;
                let id = item.get("id")?.as_str()?;
                Some((name.to_string(), id.to_string()))
            })
            .collect())
    }

    /// Direct children of an organisation unit, the unit itself excluded.
    pub async fn org_unit_children(&self, uid: &str) -> Result<Vec<OrgUnitChild>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Listing {
            organisation_units: Vec<OrgUnitChild>,
        }

        let mut url = self.api_url(&format!("organisationUnits/{uid}"))?;
        url.query_pairs_mut().append_pair("includeChildren", "true");

        let listing: Listing = self.get_json(url).await?;
        Ok(listing
            .organisation_units
            .into_iter()
            .filter(|unit| unit.id != uid)
            .collect())
    }

    /// Name/id/period-type for each referenced data set.
    pub async fn data_sets(&self, refs: &[DataSetRef]) -> Result<Vec<DataSetInfo>> {
        let mut sets = Vec::with_capacity(refs.len());
        for r in refs {
            let url = self.api_url(&format!("dataSets/{}", r.id))?;
            sets.push(self.get_json(url).await?);
        }
        Ok(sets)
    }

    /// The entry-form description for a data set in a given period and
    /// organisation unit; input to the index and vocabulary builders.
    pub async fn form(
        &self,
        data_set: &str,
        period: &str,
        org_unit: &str,
    ) -> Result<FormDescription> {
        let mut url = self.api_url(&format!("dataSets/{data_set}/form.json"))?;
        url.query_pairs_mut()
            .append_pair("pe", period)
            .append_pair("ou", org_unit);
        self.get_json(url).await
    }

    /// POST a data-value set. With `dry_run` the server validates without
    /// storing anything.
    pub async fn submit(
        &self,
        payload: &DataValueSet,
        dry_run: bool,
    ) -> Result<serde_json::Value> {
        let mut url = self.api_url("dataValueSets")?;
        if dry_run {
            url.query_pairs_mut().append_pair("dryRun", "true");
        }
        debug!(%url, values = payload.data_values.len(), "POST");
        let resp = self
            .http
            .post(url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(payload)
            .send()
            .await?;
        decode(resp).await
    }

    fn api_url(&self, path: &str) -> Result<Url> {
        let base = format!("{}/api/{}", self.config.server_url.trim_end_matches('/'), path);
        Ok(Url::parse(&base)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "GET");
        let resp = self
            .http
            .get(url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let detail = resp.text().await.unwrap_or_default();
        return Err(status_error(status, detail));
    }
    Ok(resp.json().await?)
}

/// 401 means bad credentials and gets its own error kind so callers can
/// re-prompt; every other non-2xx carries the status and body.
fn status_error(status: StatusCode, detail: String) -> Error {
    if status == StatusCode::UNAUTHORIZED {
        Error::Authentication
    } else {
        Error::Http { status, detail }
    }
}

fn search_url(server_url: &str, item_type: &str, search_terms: &[String]) -> Result<Url> {
    let mut url = Url::parse(&format!(
        "{}/api/{}",
        server_url.trim_end_matches('/'),
        item_type
    ))?;
    let field = if item_type == "dataElements" {
        "formName"
    } else {
        "name"
    };
    for term in search_terms {
        url.query_pairs_mut()
            .append_pair("filter", &format!("{field}:ilike:{term}"));
    }
    Ok(url)
}
