//! Pure reshaping of upstream payloads into view models.
//!
//! Nothing in here performs I/O; every function is a deterministic transform
//! so the fetchers can stay thin and the shapes can be tested directly.

use crate::config::Endpoints;
use crate::error::DexError;
use crate::models::{
    AbilitySlot, CardViewModel, DetailViewModel, Neighbors, RawEntity, StatEntry, StatLine,
    TypeRelations,
};
use tracing::warn;

/// Display labels for the six base stats, in upstream order.
pub const STAT_LABELS: [&str; 6] = [
    "Hit Point",
    "Atteck",
    "Defense",
    "Special Atteck",
    "Special Defense",
    "Speed",
];

/// Upstream stat names expected at each position.
const CANONICAL_STATS: [&str; 6] = [
    "hp",
    "attack",
    "defense",
    "special-attack",
    "special-defense",
    "speed",
];

const MAX_ABILITIES: usize = 2;

/// Weight and height are integers in tenths of the display unit.
pub fn tenths(raw: u32) -> f64 {
    raw as f64 / 10.0
}

/// First two abilities in upstream order, hyphens turned into spaces.
pub fn format_abilities(abilities: &[AbilitySlot]) -> Vec<String> {
    abilities
        .iter()
        .take(MAX_ABILITIES)
        .map(|a| a.ability.name.replace('-', " "))
        .collect()
}

/// Map the first six stat entries positionally onto [`STAT_LABELS`].
///
/// Upstream is trusted to deliver stats in canonical order; a mismatching name
/// is logged but still labelled by position.
pub fn format_stats(stats: &[StatEntry]) -> Result<Vec<StatLine>, DexError> {
    if stats.len() < STAT_LABELS.len() {
        return Err(DexError::malformed(format!(
            "expected {} stats, got {}",
            STAT_LABELS.len(),
            stats.len()
        )));
    }
    Ok(stats
        .iter()
        .zip(STAT_LABELS.iter().zip(CANONICAL_STATS.iter()))
        .map(|(entry, (&label, &expected))| {
            if entry.stat.name != expected {
                warn!(
                    position = label,
                    got = %entry.stat.name,
                    "stat out of canonical order"
                );
            }
            StatLine {
                label,
                value: entry.base_stat,
            }
        })
        .collect())
}

pub fn card_from_entity(raw: &RawEntity, endpoints: &Endpoints) -> Result<CardViewModel, DexError> {
    let primary = raw
        .types
        .first()
        .ok_or_else(|| DexError::malformed(format!("{} has no types", raw.name)))?;
    Ok(CardViewModel {
        id: raw.id,
        name: raw.name.clone(),
        primary_type: primary.kind.name.clone(),
        artwork: endpoints.artwork_url(raw.id),
    })
}

/// Merge the entity, its per-type relations and its neighbours into one model.
pub fn detail_from_parts(
    raw: &RawEntity,
    damage_relations: Vec<TypeRelations>,
    neighbors: Neighbors,
    endpoints: &Endpoints,
) -> Result<DetailViewModel, DexError> {
    Ok(DetailViewModel {
        id: raw.id,
        name: raw.name.clone(),
        types: raw.types.iter().map(|t| t.kind.name.clone()).collect(),
        weight: tenths(raw.weight),
        height: tenths(raw.height),
        previous: neighbors.previous,
        next: neighbors.next,
        abilities: format_abilities(&raw.abilities),
        stats: format_stats(&raw.stats)?,
        damage_relations,
        artwork: endpoints.artwork_url(raw.id),
    })
}
