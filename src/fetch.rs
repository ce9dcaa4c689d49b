use crate::config::Endpoints;
use crate::error::DexError;
use crate::format::{card_from_entity, detail_from_parts};
use crate::models::{
    CardViewModel, DetailViewModel, ListPage, Neighbors, RawEntity, TypeRelations, TypeResource,
    TypeSlot, ViewState,
};
use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

/// Read access to the upstream API. Views only ever need "GET this URL as JSON".
#[async_trait]
pub trait DexApi: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, DexError>;
}

/// [`DexApi`] backed by a shared `reqwest` client.
#[derive(Clone, Default)]
pub struct HttpApi {
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DexApi for HttpApi {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, DexError> {
        debug!(%url, "GET");
        let network = |source| DexError::Network {
            url: url.to_string(),
            source,
        };
        let res = self.client.get(url).send().await.map_err(network)?;
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DexError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(DexError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        res.json().await.map_err(network)
    }
}

async fn get<T: DeserializeOwned>(api: &dyn DexApi, url: &str) -> Result<T, DexError> {
    let value = api.get_json(url).await?;
    Ok(serde_json::from_value(value)?)
}

pub async fn fetch_catalog_page(api: &dyn DexApi, url: &str) -> Result<ListPage, DexError> {
    get(api, url).await
}

/// Fetch one entity from its resource URL and reduce it to a card.
pub async fn fetch_card(
    api: &dyn DexApi,
    endpoints: &Endpoints,
    url: &str,
) -> Result<CardViewModel, DexError> {
    let raw: RawEntity = get(api, url).await?;
    card_from_entity(&raw, endpoints)
}

/// Damage relations for every type, fetched concurrently, in the given order.
pub async fn fetch_damage_relations(
    api: &dyn DexApi,
    types: &[TypeSlot],
) -> Result<Vec<TypeRelations>, DexError> {
    try_join_all(types.iter().map(|slot| async move {
        let resource: TypeResource = get(api, &slot.kind.url).await?;
        Ok::<_, DexError>(TypeRelations {
            type_name: slot.kind.name.clone(),
            relations: resource.damage_relations,
        })
    }))
    .await
}

/// First step of neighbour resolution: the single-item page sitting at `id`.
pub async fn fetch_page_links(
    api: &dyn DexApi,
    endpoints: &Endpoints,
    id: u32,
) -> Result<ListPage, DexError> {
    let offset = id.checked_sub(1).ok_or_else(|| DexError::malformed("entity id 0"))?;
    get(api, &endpoints.listing_url(offset, 1)).await
}

/// Second step: follow a pagination link, if any, to the name on that page.
pub async fn resolve_link(
    api: &dyn DexApi,
    link: Option<&str>,
) -> Result<Option<String>, DexError> {
    let Some(link) = link else {
        return Ok(None);
    };
    let page: ListPage = get(api, link).await?;
    Ok(page.results.into_iter().next().map(|r| r.name))
}

pub async fn resolve_neighbors(
    api: &dyn DexApi,
    endpoints: &Endpoints,
    id: u32,
) -> Result<Neighbors, DexError> {
    let page = fetch_page_links(api, endpoints, id).await?;
    let previous = resolve_link(api, page.previous.as_deref()).await?;
    let next = resolve_link(api, page.next.as_deref()).await?;
    Ok(Neighbors { previous, next })
}

/// Entity, type relations and neighbours merged into one detail model.
pub async fn fetch_detail(
    api: &dyn DexApi,
    endpoints: &Endpoints,
    key: &str,
) -> Result<DetailViewModel, DexError> {
    let raw: RawEntity = get(api, &endpoints.entity_url(key)).await?;
    // Only the entity itself can be missing; a 404 further down is a broken aggregation.
    let relations = fetch_damage_relations(api, &raw.types)
        .await
        .map_err(DexError::into_failure)?;
    let neighbors = resolve_neighbors(api, endpoints, raw.id)
        .await
        .map_err(DexError::into_failure)?;
    detail_from_parts(&raw, relations, neighbors, endpoints)
}

fn settle<T>(what: &str, result: Result<T, DexError>) -> ViewState<T> {
    match result {
        Ok(v) => ViewState::Ready(v),
        Err(e) if e.is_not_found() => {
            warn!("{what}: {e}");
            ViewState::NotFound
        }
        Err(e) => {
            error!("{what}: {e}");
            ViewState::Failed(e.to_string())
        }
    }
}

pub async fn load_page(api: &dyn DexApi, url: &str) -> ViewState<ListPage> {
    let state = settle("catalog page", fetch_catalog_page(api, url).await);
    if let ViewState::Ready(page) = &state {
        info!(%url, entries = page.results.len(), "catalog page loaded");
    }
    state
}

pub async fn load_card(
    api: &dyn DexApi,
    endpoints: &Endpoints,
    url: &str,
) -> ViewState<CardViewModel> {
    settle(&format!("card {url}"), fetch_card(api, endpoints, url).await)
}

pub async fn load_detail(
    api: &dyn DexApi,
    endpoints: &Endpoints,
    key: &str,
) -> ViewState<DetailViewModel> {
    let state = settle(&format!("detail {key}"), fetch_detail(api, endpoints, key).await);
    if let ViewState::Ready(d) = &state {
        info!(id = d.id, name = %d.name, "detail loaded");
    }
    state
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;
