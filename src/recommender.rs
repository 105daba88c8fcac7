use crate::loader::CatalogRepository;
use crate::models::{FieldRequirement, LaptopOffering, NeedCategory};
use tracing::{debug, warn};

/// Slack added on top of the user's budget when filtering by price.
pub const BUDGET_TOLERANCE: u64 = 500_000;

/// Number of offerings shown as primary picks.
pub const PRIMARY_COUNT: usize = 2;

/// Classifies a field of study from its GPU and RAM requirements.
pub fn classify_field(req: &FieldRequirement) -> NeedCategory {
    let gpu = req.recommended_gpu.to_lowercase();
    let ram = req.min_ram.to_lowercase();

    // Rule 1 wins whenever both rules would hold
    if gpu.contains("rtx") && (ram.contains("16") || ram.contains("32")) {
        NeedCategory::CreativeEngineering
    } else if gpu.contains("gtx") && (ram.contains("8") || ram.contains("16")) {
        NeedCategory::ProgrammingDevelopment
    } else {
        NeedCategory::BasicProductivity
    }
}

/// Classifies a laptop from its GPU and RAM.
///
/// Kept separate from [`classify_field`]: the two tables are joined only by
/// category, and the laptop thresholds may move independently of the field ones.
pub fn classify_laptop(offer: &LaptopOffering) -> NeedCategory {
    let gpu = offer.gpu.to_lowercase();
    let ram = offer.ram.to_lowercase();

    if gpu.contains("rtx") && (ram.contains("16") || ram.contains("32")) {
        NeedCategory::CreativeEngineering
    } else if gpu.contains("gtx") && (ram.contains("8") || ram.contains("16")) {
        NeedCategory::ProgrammingDevelopment
    } else {
        NeedCategory::BasicProductivity
    }
}

/// A user query against the catalog.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub field: String,
    pub budget: u64,
    /// `None` means any OS.
    pub os: Option<String>,
    /// `None` means any screen size.
    pub screen: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Recommendation {
    pub category: NeedCategory,
    /// The matched field row, if the name was found.
    pub field: Option<FieldRequirement>,
    /// Highest price that still passed the budget filter.
    pub price_ceiling: u64,
    /// Matching offerings, most expensive first.
    pub offerings: Vec<LaptopOffering>,
}

impl Recommendation {
    pub fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }

    pub fn focus(&self) -> &str {
        self.field
            .as_ref()
            .map(|f| f.focus.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("-")
    }

    pub fn software(&self) -> &str {
        self.field
            .as_ref()
            .map(|f| f.key_software.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("-")
    }

    /// The first `count` offerings.
    pub fn primary(&self, count: usize) -> &[LaptopOffering] {
        &self.offerings[..count.min(self.offerings.len())]
    }

    /// Everything after the primary picks.
    pub fn alternatives(&self, count: usize) -> &[LaptopOffering] {
        &self.offerings[count.min(self.offerings.len())..]
    }
}

pub struct Recommender<'a> {
    pub catalog: &'a CatalogRepository,
}

impl<'a> Recommender<'a> {
    pub fn new(catalog: &'a CatalogRepository) -> Self {
        Self { catalog }
    }

    /// Main recommendation function: classify the field, then filter and rank laptops
    pub fn recommend(&self, query: &Query) -> Recommendation {
        // Step 1: Resolve the field and its target category
        let field = self.catalog.find_field(&query.field).cloned();
        let category = match &field {
            Some(req) => classify_field(req),
            None => {
                if !self.catalog.fields().is_empty() {
                    warn!("Field {:?} not found, using default category", query.field);
                }
                NeedCategory::default()
            }
        };
        debug!("Target category for {:?}: {}", query.field, category);

        // Step 2: Filter laptops by category, price, OS and screen, then rank
        let offerings = filter_and_rank(
            category,
            query.budget,
            query.os.as_deref(),
            query.screen.as_deref(),
            self.catalog.laptops(),
        );

        Recommendation {
            category,
            field,
            price_ceiling: price_ceiling(query.budget),
            offerings,
        }
    }
}

pub fn price_ceiling(budget: u64) -> u64 {
    budget.saturating_add(BUDGET_TOLERANCE)
}

/// Filters laptops matching `category` within budget and the optional
/// OS / screen filters, sorted by price descending.
pub fn filter_and_rank(
    category: NeedCategory,
    budget: u64,
    os_filter: Option<&str>,
    screen_filter: Option<&str>,
    laptops: &[LaptopOffering],
) -> Vec<LaptopOffering> {
    let ceiling = price_ceiling(budget);
    let os_filter = os_filter.map(str::to_lowercase);

    let mut results: Vec<LaptopOffering> = laptops
        .iter()
        .filter(|laptop| classify_laptop(laptop) == category)
        .filter(|laptop| laptop.price <= ceiling)
        .filter(|laptop| match &os_filter {
            Some(os) => laptop
                .os
                .as_ref()
                .is_some_and(|value| value.to_lowercase().contains(os.as_str())),
            None => true,
        })
        .filter(|laptop| match screen_filter {
            Some(screen) => laptop.screen == screen,
            None => true,
        })
        .cloned()
        .collect();

    // Most expensive first; sort_by is stable so ties keep catalog order
    results.sort_by(|a, b| b.price.cmp(&a.price));

    debug!("{} laptops match {} under {}", results.len(), category, ceiling);
    results
}
