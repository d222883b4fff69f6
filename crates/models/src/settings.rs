use serde::{Deserialize, Serialize};

/// Batch-run settings, loaded from an optional `settings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Factor between hundred-million display units and the ledger's default
    /// (thousand) unit.
    pub unit_scale: i64,
    /// Letter prepended to digits-only codes of the market export.
    pub market_code_prefix: String,
    /// Market tags that mark a sheet row as company data.
    pub markets: Vec<String>,
    /// Years before this use the reported yearly ROE; later years sum the
    /// quarterly ROE values.
    pub yearly_roe_cutoff_year: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unit_scale: 100_000,
            market_code_prefix: "A".to_string(),
            markets: vec!["KS".to_string(), "KQ".to_string()],
            yearly_roe_cutoff_year: 2020,
        }
    }
}

impl Settings {
    pub fn is_market(&self, tag: &str) -> bool {
        self.markets.iter().any(|m| m == tag)
    }
}
