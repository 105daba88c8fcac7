use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Screen label for sizes that could not be parsed.
pub const UNKNOWN_SCREEN: &str = "Unknown";

/// Menu choice meaning "no filter".
pub const ANY_SENTINEL: &str = "Semua";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Data source configuration
    pub field_catalog_path: String,
    pub laptop_catalog_path: String,
    pub default_budget: u64,
    /// How many offerings are shown as primary picks before the alternatives.
    pub primary_count: usize,
    pub output_directory: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field_catalog_path: "Dataset Jurusan.csv".to_string(),
            laptop_catalog_path: "Dataset Laptop.csv".to_string(),
            default_budget: 15_000_000,
            primary_count: crate::recommender::PRIMARY_COUNT,
            output_directory: Some("output".to_string()),
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }
}

/// Coarse laptop-use profile shared by fields of study and laptops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NeedCategory {
    CreativeEngineering,
    ProgrammingDevelopment,
    #[default]
    BasicProductivity,
}

impl NeedCategory {
    pub fn label(&self) -> &'static str {
        match self {
            NeedCategory::CreativeEngineering => "Creative & Engineering",
            NeedCategory::ProgrammingDevelopment => "Programming & Development",
            NeedCategory::BasicProductivity => "Basic Productivity",
        }
    }
}

impl fmt::Display for NeedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the field-of-study table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldRequirement {
    pub name: String,
    pub focus: String,
    pub key_software: String,
    pub recommended_gpu: String,
    pub min_ram: String,
}

/// One row of the laptop table, with price and screen size normalized at load time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaptopOffering {
    pub brand: String,
    pub model: String,
    pub processor: String,
    pub ram: String,
    pub gpu: String,
    pub storage: String,
    pub raw_screen: String,
    pub raw_price: String,
    pub os: Option<String>,
    pub link_tokopedia: Option<String>,
    pub link_shopee: Option<String>,
    pub price: u64,
    pub screen: String,
}

impl LaptopOffering {
    /// Fills in the derived price and screen from the raw cell text.
    pub fn normalized(mut self) -> Self {
        self.price = normalize_price(&self.raw_price);
        self.screen = normalize_screen(&self.raw_screen);
        self
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model).trim().to_string()
    }

    pub fn display_price(&self) -> String {
        format_price(self.price)
    }
}

/// Parses a currency-formatted price such as `Rp 15.000.000`.
pub fn parse_price(raw: &str) -> Result<u64, CatalogError> {
    let digits = raw.replace("Rp", "").replace(['.', ','], "");
    digits
        .trim()
        .parse::<u64>()
        .map_err(|_| CatalogError::PriceParse(raw.to_string()))
}

/// Like [`parse_price`], but an unparseable price counts as 0.
pub fn normalize_price(raw: &str) -> u64 {
    parse_price(raw).unwrap_or_else(|e| {
        tracing::debug!("{}, using 0", e);
        0
    })
}

/// Parses a screen size into its canonical label: `15.0` becomes `15`, `15.6` stays `15.6`.
pub fn parse_screen(raw: &str) -> Result<String, CatalogError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| CatalogError::ScreenParse(raw.to_string()))?;

    if value.fract() == 0.0 {
        Ok(format!("{:.0}", value))
    } else {
        Ok(value.to_string())
    }
}

/// Like [`parse_screen`], but an unparseable size becomes [`UNKNOWN_SCREEN`].
pub fn normalize_screen(raw: &str) -> String {
    parse_screen(raw).unwrap_or_else(|e| {
        tracing::debug!("{}, using {}", e, UNKNOWN_SCREEN);
        UNKNOWN_SCREEN.to_string()
    })
}

/// Formats an amount as `Rp 15.000.000`.
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("Rp {}", grouped)
}

/// Turns a menu choice into a filter; the "any" choices mean no filter.
pub fn filter_from_choice(choice: Option<&str>) -> Option<String> {
    let choice = choice?.trim();
    if choice.is_empty()
        || choice.eq_ignore_ascii_case(ANY_SENTINEL)
        || choice.eq_ignore_ascii_case("any")
        || choice.eq_ignore_ascii_case("all")
    {
        None
    } else {
        Some(choice.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_strips_currency_and_separators() {
        assert_eq!(normalize_price("Rp 15.000.000"), 15_000_000);
        assert_eq!(normalize_price("Rp12,500,000"), 12_500_000);
        assert_eq!(normalize_price(" 9000000 "), 9_000_000);
    }

    #[test]
    fn unparseable_price_is_zero() {
        assert_eq!(normalize_price("garbage"), 0);
        assert_eq!(normalize_price(""), 0);
        assert_eq!(normalize_price("Rp -5"), 0);
        assert!(matches!(parse_price("nan"), Err(CatalogError::PriceParse(_))));
    }

    #[test]
    fn screen_drops_integral_decimal() {
        assert_eq!(normalize_screen("15.0"), "15");
        assert_eq!(normalize_screen("14"), "14");
        assert_eq!(normalize_screen("15.6"), "15.6");
        assert_eq!(normalize_screen(" 13.3 "), "13.3");
    }

    #[test]
    fn bad_screen_is_unknown() {
        assert_eq!(normalize_screen("N/A"), UNKNOWN_SCREEN);
        assert_eq!(normalize_screen(""), UNKNOWN_SCREEN);
        assert_eq!(normalize_screen("nan"), UNKNOWN_SCREEN);
        assert_eq!(normalize_screen("-14"), UNKNOWN_SCREEN);
    }

    #[test]
    fn normalized_screen_parses_back() {
        for raw in ["15.0", "15.6", "13.3", "16", "17.3"] {
            let screen = normalize_screen(raw);
            let value: f64 = screen.parse().unwrap();
            assert!(value >= 0.0);
        }
    }

    #[test]
    fn price_display_groups_with_dots() {
        assert_eq!(format_price(15_000_000), "Rp 15.000.000");
        assert_eq!(format_price(500_000), "Rp 500.000");
        assert_eq!(format_price(999), "Rp 999");
        assert_eq!(format_price(0), "Rp 0");
        assert_eq!(format_price(1_234_567), "Rp 1.234.567");
    }

    #[test]
    fn offering_caches_derived_values() {
        let offer = LaptopOffering {
            brand: "Asus".into(),
            model: "TUF".into(),
            ram: "8GB".into(),
            gpu: "GTX 1650".into(),
            raw_screen: "15.6".into(),
            raw_price: "Rp 12.000.000".into(),
            ..Default::default()
        }
        .normalized();
        assert_eq!(offer.price, 12_000_000);
        assert_eq!(offer.screen, "15.6");
        assert_eq!(offer.display_price(), "Rp 12.000.000");
        assert_eq!(offer.display_name(), "Asus TUF");
    }

    #[test]
    fn any_choices_mean_no_filter() {
        assert_eq!(filter_from_choice(None), None);
        assert_eq!(filter_from_choice(Some("Semua")), None);
        assert_eq!(filter_from_choice(Some("ANY")), None);
        assert_eq!(filter_from_choice(Some("  ")), None);
        assert_eq!(filter_from_choice(Some("Windows")), Some("Windows".to_string()));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let config = Config {
            default_budget: 9_000_000,
            ..Config::default()
        };
        config.save_to_file(path).unwrap();

        let loaded = Config::load_from_file(path).unwrap();
        assert_eq!(loaded.default_budget, 9_000_000);
        assert_eq!(loaded.primary_count, 2);
        assert_eq!(loaded.field_catalog_path, "Dataset Jurusan.csv");
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: Config = toml::from_str("default_budget = 7000000\n").unwrap();
        assert_eq!(config.default_budget, 7_000_000);
        assert_eq!(config.laptop_catalog_path, "Dataset Laptop.csv");
    }
}
