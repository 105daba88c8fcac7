use crate::error::CatalogError;
use crate::models::{Config, FieldRequirement, LaptopOffering, UNKNOWN_SCREEN};
use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct FieldRow {
    #[serde(rename = "Jurusan", default)]
    name: Option<String>,
    #[serde(rename = "Fokus_Utama", default)]
    focus: Option<String>,
    #[serde(rename = "Software_Kunci", default)]
    key_software: Option<String>,
    #[serde(rename = "VGA_Rekomendasi", default)]
    recommended_gpu: Option<String>,
    #[serde(rename = "RAM_Min", default)]
    min_ram: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LaptopRow {
    #[serde(rename = "Brand", default)]
    brand: Option<String>,
    #[serde(rename = "Model", default)]
    model: Option<String>,
    #[serde(rename = "Processor", default)]
    processor: Option<String>,
    #[serde(rename = "RAM", default)]
    ram: Option<String>,
    #[serde(rename = "GPU", default)]
    gpu: Option<String>,
    #[serde(rename = "Storage", default)]
    storage: Option<String>,
    #[serde(rename = "Screen_Size_Inch", default)]
    screen: Option<String>,
    #[serde(rename = "Price_IDR", default)]
    price: Option<String>,
    #[serde(rename = "OS", default)]
    os: Option<String>,
    #[serde(rename = "Link_Tokopedia", default)]
    link_tokopedia: Option<String>,
    #[serde(rename = "Link_Shopee", default)]
    link_shopee: Option<String>,
}

impl From<FieldRow> for FieldRequirement {
    fn from(row: FieldRow) -> Self {
        Self {
            name: row.name.unwrap_or_default(),
            focus: row.focus.unwrap_or_default(),
            key_software: row.key_software.unwrap_or_default(),
            recommended_gpu: row.recommended_gpu.unwrap_or_default(),
            min_ram: row.min_ram.unwrap_or_default(),
        }
    }
}

impl From<LaptopRow> for LaptopOffering {
    fn from(row: LaptopRow) -> Self {
        LaptopOffering {
            brand: row.brand.unwrap_or_default(),
            model: row.model.unwrap_or_default(),
            processor: row.processor.unwrap_or_default(),
            ram: row.ram.unwrap_or_default(),
            gpu: row.gpu.unwrap_or_default(),
            storage: row.storage.unwrap_or_default(),
            raw_screen: row.screen.unwrap_or_default(),
            raw_price: row.price.unwrap_or_default(),
            os: present(row.os),
            link_tokopedia: link(row.link_tokopedia),
            link_shopee: link(row.link_shopee),
            ..Default::default()
        }
        .normalized()
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Empty cells and spreadsheet `nan` placeholders mean "no link".
fn link(value: Option<String>) -> Option<String> {
    present(value)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.eq_ignore_ascii_case("nan"))
}

fn open_source(path: &Path) -> Result<File, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::SourceUnavailable {
            path: path.to_path_buf(),
        });
    }
    File::open(path).map_err(|e| CatalogError::Csv {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Decodes a raw record cell by cell; a cell that is not valid UTF-8 becomes empty.
fn text_record(record: &ByteRecord, headers: &StringRecord, row: u64) -> StringRecord {
    record
        .iter()
        .enumerate()
        .map(|(column, cell)| {
            std::str::from_utf8(cell).unwrap_or_else(|_| {
                let err = CatalogError::CellEncoding {
                    row,
                    column: headers.get(column).unwrap_or_default().to_string(),
                };
                debug!("{}, using empty text", err);
                ""
            })
        })
        .collect()
}

/// Reads the two catalog tables from CSV.
///
/// Bad cells fall back to empty text. Unreadable rows are skipped and reported in `warnings`; they never abort a load.
#[derive(Debug, Default)]
pub struct CatalogLoader {
    pub warnings: Vec<String>,
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_fields(&mut self, path: &Path) -> Result<Vec<FieldRequirement>, CatalogError> {
        let file = open_source(path)?;
        self.read_fields(file, path)
    }

    pub fn load_laptops(&mut self, path: &Path) -> Result<Vec<LaptopOffering>, CatalogError> {
        let file = open_source(path)?;
        self.read_laptops(file, path)
    }

    pub fn read_fields<R: Read>(&mut self, reader: R, source: &Path) -> Result<Vec<FieldRequirement>, CatalogError> {
        let rows: Vec<FieldRow> = self.read_rows(reader, source)?;
        Ok(rows.into_iter().map(FieldRequirement::from).collect())
    }

    pub fn read_laptops<R: Read>(&mut self, reader: R, source: &Path) -> Result<Vec<LaptopOffering>, CatalogError> {
        let rows: Vec<LaptopRow> = self.read_rows(reader, source)?;
        Ok(rows.into_iter().map(LaptopOffering::from).collect())
    }

    fn read_rows<T: DeserializeOwned, R: Read>(&mut self, reader: R, source: &Path) -> Result<Vec<T>, CatalogError> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        // Header problems make the whole table unusable
        let headers = csv_reader
            .headers()
            .map_err(|e| CatalogError::Csv {
                path: source.to_path_buf(),
                source: e,
            })?
            .clone();

        let mut rows = Vec::new();
        for (i, result) in csv_reader.byte_records().enumerate() {
            let row_number = i as u64 + 1;
            let row = result.and_then(|record| {
                text_record(&record, &headers, row_number).deserialize::<T>(Some(&headers))
            });
            match row {
                Ok(row) => rows.push(row),
                Err(e) => {
                    let err = CatalogError::Row {
                        path: source.to_path_buf(),
                        row: row_number,
                        source: e,
                    };
                    warn!("Skipping row: {}", err);
                    self.warnings.push(err.to_string());
                }
            }
        }

        debug!("Read {} rows from {}", rows.len(), source.display());
        Ok(rows)
    }
}

/// Load-once handle over both tables.
///
/// Built at startup and passed by reference into the recommender. The only way
/// to pick up changed source files is an explicit [`CatalogRepository::reload`].
#[derive(Debug, Default)]
pub struct CatalogRepository {
    field_path: PathBuf,
    laptop_path: PathBuf,
    fields: Vec<FieldRequirement>,
    laptops: Vec<LaptopOffering>,
    warnings: Vec<String>,
}

impl CatalogRepository {
    pub fn load(field_path: impl Into<PathBuf>, laptop_path: impl Into<PathBuf>) -> Self {
        let mut repository = Self {
            field_path: field_path.into(),
            laptop_path: laptop_path.into(),
            ..Self::default()
        };
        repository.reload();
        repository
    }

    pub fn from_config(config: &Config) -> Self {
        Self::load(&config.field_catalog_path, &config.laptop_catalog_path)
    }

    /// Wraps tables that are already in memory.
    #[cfg(test)]
    pub fn from_tables(fields: Vec<FieldRequirement>, laptops: Vec<LaptopOffering>) -> Self {
        Self {
            fields,
            laptops,
            ..Self::default()
        }
    }

    /// Re-reads both source files, replacing the cached tables.
    pub fn reload(&mut self) {
        let mut loader = CatalogLoader::new();

        self.fields = loader.load_fields(&self.field_path).unwrap_or_else(|e| {
            warn!("Field catalog unavailable: {}", e);
            loader.warnings.push(format!("Failed to load field catalog: {}", e));
            Vec::new()
        });

        self.laptops = loader.load_laptops(&self.laptop_path).unwrap_or_else(|e| {
            warn!("Laptop catalog unavailable: {}", e);
            loader.warnings.push(format!("Failed to load laptop catalog: {}", e));
            Vec::new()
        });

        self.warnings = loader.warnings;
        info!(
            "Loaded {} fields and {} laptops",
            self.fields.len(),
            self.laptops.len()
        );
    }

    pub fn fields(&self) -> &[FieldRequirement] {
        &self.fields
    }

    pub fn laptops(&self) -> &[LaptopOffering] {
        &self.laptops
    }

    /// Problems hit during the last load, for showing to the user.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// First field whose name matches exactly.
    pub fn find_field(&self, name: &str) -> Option<&FieldRequirement> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| f.name.clone())
            .filter(|n| !n.trim().is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn os_options(&self) -> Vec<String> {
        self.laptops
            .iter()
            .filter_map(|l| l.os.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Known screen sizes, smallest first.
    pub fn screen_options(&self) -> Vec<String> {
        let mut screens: Vec<String> = self
            .laptops
            .iter()
            .map(|l| l.screen.clone())
            .filter(|s| s != UNKNOWN_SCREEN)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        screens.sort_by(|a, b| {
            let a: f64 = a.parse().unwrap_or(0.0);
            let b: f64 = b.parse().unwrap_or(0.0);
            a.total_cmp(&b)
        });
        screens
    }
}
