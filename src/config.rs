//! Command-line and environment configuration.

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// Terminal Pokédex: browse the catalog and inspect entries.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the upstream REST API
    #[arg(long, env = "DEX_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Base URL of the official artwork images
    #[arg(long, env = "DEX_ARTWORK_BASE", default_value = DEFAULT_ARTWORK_BASE)]
    pub artwork_base: String,

    /// Number of cards requested per listing page
    #[arg(long, env = "POKEMON_LIMIT", default_value_t = 151)]
    pub page_size: u32,

    /// Where diagnostics are written (the terminal belongs to the UI)
    #[arg(long, default_value = "dex.log")]
    pub log_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the detail view of one entry as JSON and exit
    #[arg(long, value_name = "ID_OR_NAME")]
    pub show: Option<String>,
}

/// URL templates for every upstream resource the views touch.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    api_base: String,
    artwork_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, DEFAULT_ARTWORK_BASE)
    }
}

impl Endpoints {
    pub fn new(api_base: &str, artwork_base: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            artwork_base: artwork_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_args(args: &Args) -> Self {
        Self::new(&args.api_base, &args.artwork_base)
    }

    /// Entity by numeric id or by name.
    pub fn entity_url(&self, key: &str) -> String {
        format!("{}/pokemon/{}", self.api_base, key)
    }

    pub fn listing_url(&self, offset: u32, limit: u32) -> String {
        format!("{}/pokemon?limit={}&offset={}", self.api_base, limit, offset)
    }

    pub fn artwork_url(&self, id: u32) -> String {
        format!("{}/{}.png", self.artwork_base, id)
    }
}
