use serde::{Deserialize, Serialize};

// Upstream payloads. Only the fields the views consume are modelled; serde
// ignores the rest of the (very large) entity document.

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AbilitySlot {
    pub ability: NamedResource,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatEntry {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEntity {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    pub weight: u32,
    pub height: u32,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
}

/// One page of the `limit`/`offset` listing endpoint.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ListPage {
    pub next: Option<String>,
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TypeResource {
    pub damage_relations: DamageRelations,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct DamageRelations {
    #[serde(default)]
    pub double_damage_from: Vec<NamedResource>,
    #[serde(default)]
    pub double_damage_to: Vec<NamedResource>,
    #[serde(default)]
    pub half_damage_from: Vec<NamedResource>,
    #[serde(default)]
    pub half_damage_to: Vec<NamedResource>,
    #[serde(default)]
    pub no_damage_from: Vec<NamedResource>,
    #[serde(default)]
    pub no_damage_to: Vec<NamedResource>,
}

// View models.

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CardViewModel {
    pub id: u32,
    pub name: String,
    pub primary_type: String,
    pub artwork: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StatLine {
    pub label: &'static str,
    pub value: u32,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TypeRelations {
    pub type_name: String,
    pub relations: DamageRelations,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DetailViewModel {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    /// Kilograms.
    pub weight: f64,
    /// Metres.
    pub height: f64,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<StatLine>,
    pub damage_relations: Vec<TypeRelations>,
    pub artwork: String,
}

/// Catalog neighbours of an entity, by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighbors {
    pub previous: Option<String>,
    pub next: Option<String>,
}

/// Lifecycle of a single view's data.
///
/// A view starts `Pending` and settles exactly once. There is no partial
/// state: a failed sub-request anywhere in an aggregation yields `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Pending,
    Ready(T),
    NotFound,
    Failed(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Pending
    }
}

impl<T> ViewState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ViewState::Pending)
    }
}
