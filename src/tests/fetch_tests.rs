use super::*;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

const API: &str = "http://api.test/v2";
const ART: &str = "http://art.test";

fn endpoints() -> Endpoints {
    Endpoints::new(API, ART)
}

/// Serves canned payloads by exact URL; unknown URLs are 404s.
#[derive(Default)]
struct FakeApi {
    routes: HashMap<String, Value>,
    broken: HashSet<String>,
    hits: Arc<Mutex<Vec<String>>>,
}

impl FakeApi {
    fn route(mut self, url: impl Into<String>, body: Value) -> Self {
        self.routes.insert(url.into(), body);
        self
    }

    fn without(mut self, url: &str) -> Self {
        self.routes.remove(url);
        self
    }

    fn broken(mut self, url: impl Into<String>) -> Self {
        self.broken.insert(url.into());
        self
    }

    fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

#[async_trait]
impl DexApi for FakeApi {
    async fn get_json(&self, url: &str) -> Result<Value, DexError> {
        self.hits.lock().unwrap().push(url.to_string());
        if self.broken.contains(url) {
            return Err(DexError::Status {
                url: url.to_string(),
                status: 500,
            });
        }
        self.routes
            .get(url)
            .cloned()
            .ok_or_else(|| DexError::NotFound(url.to_string()))
    }
}

fn type_url(name: &str) -> String {
    format!("{API}/type/{name}")
}

fn page_url(offset: u32) -> String {
    format!("{API}/pokemon?limit=1&offset={offset}")
}

// Upstream pagination links put offset first.
fn link_url(offset: u32) -> String {
    format!("{API}/pokemon?offset={offset}&limit=1")
}

fn entity_body(id: u32, name: &str, types: &[&str], abilities: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "weight": 60,
        "height": 4,
        "types": types.iter().enumerate().map(|(i, t)| json!({
            "slot": i + 1,
            "type": { "name": t, "url": type_url(t) }
        })).collect::<Vec<_>>(),
        "abilities": abilities.iter().map(|a| json!({
            "ability": { "name": a, "url": "" },
            "is_hidden": false
        })).collect::<Vec<_>>(),
        "stats": [
            { "base_stat": 35, "stat": { "name": "hp" } },
            { "base_stat": 55, "stat": { "name": "attack" } },
            { "base_stat": 40, "stat": { "name": "defense" } },
            { "base_stat": 50, "stat": { "name": "special-attack" } },
            { "base_stat": 50, "stat": { "name": "special-defense" } },
            { "base_stat": 90, "stat": { "name": "speed" } }
        ],
        "base_experience": 112
    })
}

fn type_body(name: &str, weak_to: &[&str]) -> Value {
    json!({
        "name": name,
        "damage_relations": {
            "double_damage_from": weak_to
                .iter()
                .map(|t| json!({ "name": t, "url": type_url(t) }))
                .collect::<Vec<_>>(),
            "double_damage_to": [],
            "half_damage_from": [],
            "half_damage_to": [],
            "no_damage_from": [],
            "no_damage_to": []
        }
    })
}

fn list_body(name: &str, offset: u32, count: u32) -> Value {
    let previous = (offset > 0).then(|| link_url(offset - 1));
    let next = (offset + 1 < count).then(|| link_url(offset + 1));
    json!({
        "count": count,
        "previous": previous,
        "next": next,
        "results": [{ "name": name, "url": format!("{API}/pokemon/{}/", offset + 1) }]
    })
}

/// A tiny three-entry catalog plus pikachu's surroundings.
fn catalog() -> FakeApi {
    FakeApi::default()
        .route(
            format!("{API}/pokemon/25"),
            entity_body(25, "pikachu", &["electric"], &["static", "lightning-rod"]),
        )
        .route(type_url("electric"), type_body("electric", &["ground"]))
        .route(page_url(24), list_body("pikachu", 24, 1025))
        .route(link_url(23), list_body("arbok", 23, 1025))
        .route(link_url(25), list_body("raichu", 25, 1025))
}

#[tokio::test]
async fn pikachu_detail_end_to_end() {
    let api = catalog();
    let detail = fetch_detail(&api, &endpoints(), "25").await.unwrap();

    assert_eq!(detail.id, 25);
    assert_eq!(detail.name, "pikachu");
    assert_eq!(detail.types, vec!["electric"]);
    assert_eq!(detail.weight, 6.0);
    assert_eq!(detail.height, 0.4);
    assert_eq!(detail.abilities, vec!["static", "lightning rod"]);
    assert_eq!(detail.previous.as_deref(), Some("arbok"));
    assert_eq!(detail.next.as_deref(), Some("raichu"));
    assert_eq!(detail.damage_relations.len(), 1);
    assert_eq!(detail.damage_relations[0].type_name, "electric");
    assert_eq!(detail.damage_relations[0].relations.double_damage_from[0].name, "ground");
    assert_eq!(detail.artwork, format!("{ART}/25.png"));
    let labels: Vec<_> = detail.stats.iter().map(|s| s.label).collect();
    assert_eq!(
        labels,
        ["Hit Point", "Atteck", "Defense", "Special Atteck", "Special Defense", "Speed"]
    );
}

#[tokio::test]
async fn neighbour_fetches_run_page_then_previous_then_next() {
    let api = catalog();
    resolve_neighbors(&api, &endpoints(), 25).await.unwrap();
    assert_eq!(api.hits(), vec![page_url(24), link_url(23), link_url(25)]);
}

#[tokio::test]
async fn first_entry_has_no_previous() {
    let api = FakeApi::default()
        .route(page_url(0), list_body("bulbasaur", 0, 1025))
        .route(link_url(1), list_body("ivysaur", 1, 1025));
    let n = resolve_neighbors(&api, &endpoints(), 1).await.unwrap();
    assert_eq!(n.previous, None);
    assert_eq!(n.next.as_deref(), Some("ivysaur"));
    assert_eq!(api.hits().len(), 2);
}

#[tokio::test]
async fn last_entry_has_no_next() {
    let api = FakeApi::default()
        .route(page_url(2), list_body("venusaur", 2, 3))
        .route(link_url(1), list_body("ivysaur", 1, 3));
    let n = resolve_neighbors(&api, &endpoints(), 3).await.unwrap();
    assert_eq!(n.previous.as_deref(), Some("ivysaur"));
    assert_eq!(n.next, None);
}

#[tokio::test]
async fn damage_relations_follow_entity_type_order() {
    let api = FakeApi::default()
        .route(type_url("grass"), type_body("grass", &["fire"]))
        .route(type_url("poison"), type_body("poison", &["psychic"]));
    let raw: RawEntity =
        serde_json::from_value(entity_body(1, "bulbasaur", &["grass", "poison"], &[])).unwrap();
    let relations = fetch_damage_relations(&api, &raw.types).await.unwrap();
    let names: Vec<_> = relations.iter().map(|r| r.type_name.as_str()).collect();
    assert_eq!(names, vec!["grass", "poison"]);
    assert_eq!(relations[1].relations.double_damage_from[0].name, "psychic");
}

#[tokio::test]
async fn one_failing_type_fails_the_batch() {
    let api = FakeApi::default()
        .route(type_url("grass"), type_body("grass", &["fire"]))
        .broken(type_url("poison"));
    let raw: RawEntity =
        serde_json::from_value(entity_body(1, "bulbasaur", &["grass", "poison"], &[])).unwrap();
    assert!(fetch_damage_relations(&api, &raw.types).await.is_err());
}

#[tokio::test]
async fn any_failing_sub_request_yields_no_model() {
    for broken in [
        format!("{API}/pokemon/25"),
        type_url("electric"),
        page_url(24),
        link_url(23),
        link_url(25),
    ] {
        let api = catalog().broken(broken.clone());
        let state = load_detail(&api, &endpoints(), "25").await;
        assert!(
            matches!(state, ViewState::Failed(_)),
            "{broken} should fail the detail, got {state:?}"
        );
    }
}

#[tokio::test]
async fn missing_dependent_resource_fails_instead_of_not_found() {
    for missing in [type_url("electric"), page_url(24), link_url(23), link_url(25)] {
        let api = catalog().without(&missing);
        let state = load_detail(&api, &endpoints(), "25").await;
        assert!(
            matches!(state, ViewState::Failed(_)),
            "missing {missing} should fail the detail, got {state:?}"
        );
    }
}

#[tokio::test]
async fn entity_without_weight_is_malformed() {
    let mut body = entity_body(25, "pikachu", &["electric"], &["static"]);
    body.as_object_mut().unwrap().remove("weight");
    let api = catalog().route(format!("{API}/pokemon/25"), body);
    let result = fetch_detail(&api, &endpoints(), "25").await;
    assert!(matches!(result, Err(DexError::Decode(_))));
}

#[tokio::test]
async fn unknown_entity_is_not_found() {
    let api = catalog();
    let state = load_detail(&api, &endpoints(), "missingno").await;
    assert_eq!(state, ViewState::NotFound);
}

#[tokio::test]
async fn card_reduces_entity_to_summary() {
    let url = format!("{API}/pokemon/6/");
    let api = FakeApi::default().route(
        url.clone(),
        entity_body(6, "charizard", &["fire", "flying"], &["blaze"]),
    );
    let state = load_card(&api, &endpoints(), &url).await;
    let card = state.ready().expect("card should load");
    assert_eq!(card.id, 6);
    assert_eq!(card.name, "charizard");
    assert_eq!(card.primary_type, "fire");
    assert_eq!(card.artwork, format!("{ART}/6.png"));
}

#[tokio::test]
async fn card_with_malformed_payload_fails() {
    let url = format!("{API}/pokemon/6/");
    let api = FakeApi::default().route(url.clone(), json!({ "id": "six" }));
    assert!(matches!(
        load_card(&api, &endpoints(), &url).await,
        ViewState::Failed(_)
    ));
}

#[tokio::test]
async fn catalog_page_exposes_results_and_next_link() {
    let url = endpoints().listing_url(0, 2);
    let api = FakeApi::default().route(
        url.clone(),
        json!({
            "count": 1025,
            "next": format!("{API}/pokemon?offset=2&limit=2"),
            "previous": null,
            "results": [
                { "name": "bulbasaur", "url": format!("{API}/pokemon/1/") },
                { "name": "ivysaur", "url": format!("{API}/pokemon/2/") }
            ]
        }),
    );
    let page = load_page(&api, &url).await;
    let page = page.ready().unwrap();
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[1].name, "ivysaur");
    assert!(page.previous.is_none());
    assert_eq!(page.next.as_deref(), Some(format!("{API}/pokemon?offset=2&limit=2").as_str()));
}

mod http {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::get, Json, Router};
    use tokio::net::TcpListener;

    async fn spawn_server() -> std::io::Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = Router::new()
            .route(
                "/pokemon/25",
                get(|| async { Json(json!({ "id": 25, "name": "pikachu" })) }),
            )
            .route("/broken", get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }))
            .route("/garbage", get(|| async { "not json" }));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(format!("http://{addr}"))
    }

    #[tokio::test]
    async fn http_api_decodes_json() {
        let base = spawn_server().await.expect("spawn server");
        let value = HttpApi::new()
            .get_json(&format!("{base}/pokemon/25"))
            .await
            .unwrap();
        assert_eq!(value["name"], "pikachu");
    }

    #[tokio::test]
    async fn http_api_maps_statuses() {
        let base = spawn_server().await.expect("spawn server");
        let api = HttpApi::new();
        assert!(api
            .get_json(&format!("{base}/pokemon/0"))
            .await
            .unwrap_err()
            .is_not_found());
        assert!(matches!(
            api.get_json(&format!("{base}/broken")).await,
            Err(DexError::Status { status: 500, .. })
        ));
        assert!(api.get_json(&format!("{base}/garbage")).await.is_err());
    }
}
