use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section carries defaults matching the dashboard's standing policy,
/// so a minimal `config.toml` only has to override what differs.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub reports: Reports,
    #[serde(default)]
    pub breakdowns: Breakdowns,
}

/// Where the dashboard API listens.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Where exported analysis datasets and report artifacts live.
#[derive(Debug, Clone, Deserialize)]
pub struct Reports {
    #[serde(default = "default_reports_dir")]
    pub dir: PathBuf,
}

/// Shaping policy for the grouped breakdown views.
///
/// The category view drops tiny groups at 50 orders and shows the worst 10;
/// the geographic view uses 100 and 10 (15 in the exploration view); the
/// payment view is served unshaped and takes nothing from here.
#[derive(Debug, Clone, Deserialize)]
pub struct Breakdowns {
    #[serde(default = "default_category_min_orders")]
    pub category_min_orders: u64,
    #[serde(default = "default_category_top_n")]
    pub category_top_n: usize,
    #[serde(default = "default_state_min_orders")]
    pub state_min_orders: u64,
    #[serde(default = "default_state_top_n")]
    pub state_top_n: usize,
    #[serde(default = "default_state_top_n_explore")]
    pub state_top_n_explore: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}
fn default_category_min_orders() -> u64 {
    50
}
fn default_category_top_n() -> usize {
    10
}
fn default_state_min_orders() -> u64 {
    100
}
fn default_state_top_n() -> usize {
    10
}
fn default_state_top_n_explore() -> usize {
    15
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for Reports {
    fn default() -> Self {
        Self {
            dir: default_reports_dir(),
        }
    }
}

impl Default for Breakdowns {
    fn default() -> Self {
        Self {
            category_min_orders: default_category_min_orders(),
            category_top_n: default_category_top_n(),
            state_min_orders: default_state_min_orders(),
            state_top_n: default_state_top_n(),
            state_top_n_explore: default_state_top_n_explore(),
        }
    }
}
