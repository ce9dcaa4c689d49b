//! Display helpers shared by the listing and detail screens.

use crate::models::{DamageRelations, NamedResource};

/// Format a Pokémon `name` into a human-friendly form.
///
/// Examples: `mr-mime` -> `Mr Mime`, `ho_oh` -> `Ho Oh`.
pub fn format_name(name: &str) -> String {
    let replaced = name.replace('-', " ").replace('_', " ");
    let parts: Vec<String> = replaced
        .split_whitespace()
        .map(|w| {
            let mut chs = w.chars();
            match chs.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chs.as_str().to_lowercase()
                }
            }
        })
        .collect();
    parts.join(" ")
}

/// Catalog number padded to three digits: `#007`, `#025`, `#1025`.
pub fn dex_number(id: u32) -> String {
    format!("#{:03}", id)
}

/// Badge colour for a type name; unknown types fall back to grey.
pub fn type_rgb(name: &str) -> (u8, u8, u8) {
    match name.to_lowercase().as_str() {
        "normal" => (168, 168, 120),
        "fire" => (240, 128, 48),
        "water" => (104, 144, 240),
        "grass" => (120, 200, 80),
        "electric" => (248, 208, 48),
        "ice" => (152, 216, 216),
        "fighting" => (192, 48, 40),
        "poison" => (160, 64, 160),
        "ground" => (224, 192, 104),
        "flying" => (168, 144, 240),
        "psychic" => (248, 88, 136),
        "bug" => (168, 184, 32),
        "rock" => (184, 160, 56),
        "ghost" => (112, 88, 152),
        "dragon" => (112, 56, 248),
        "dark" => (112, 88, 72),
        "steel" => (184, 184, 208),
        "fairy" => (238, 153, 172),
        _ => (200, 200, 200),
    }
}

/// Whether text drawn on `rgb` should be dark for contrast.
pub fn wants_dark_text((r, g, b): (u8, u8, u8)) -> bool {
    let lum = 0.2126 * (r as f32) + 0.7152 * (g as f32) + 0.0722 * (b as f32);
    lum > 160.0
}

fn names(list: &[NamedResource]) -> String {
    if list.is_empty() {
        "-".to_string()
    } else {
        list.iter()
            .map(|r| format_name(&r.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// `(heading, types)` rows for one type's damage relations.
pub fn relation_rows(rel: &DamageRelations) -> Vec<(&'static str, String)> {
    vec![
        ("2x from", names(&rel.double_damage_from)),
        ("1/2x from", names(&rel.half_damage_from)),
        ("0x from", names(&rel.no_damage_from)),
        ("2x to", names(&rel.double_damage_to)),
        ("1/2x to", names(&rel.half_damage_to)),
        ("0x to", names(&rel.no_damage_to)),
    ]
}
