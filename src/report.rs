use crate::loader::CatalogRepository;
use crate::models::{format_price, LaptopOffering, ANY_SENTINEL};
use crate::recommender::{classify_laptop, Recommendation};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Renders one offering as a text card. `rank` starts at 1.
pub fn render_card(offer: &LaptopOffering, rank: usize) -> String {
    let mut card = String::new();
    card.push_str(&format!(
        "   #{} {} | {}\n",
        rank,
        offer.display_name(),
        offer.display_price()
    ));
    card.push_str(&format!(
        "      {} | RAM {} | {}\n",
        offer.processor, offer.ram, offer.gpu
    ));
    card.push_str(&format!(
        "      Storage: {} | Screen: {}\"\n",
        offer.storage, offer.screen
    ));
    if let Some(link) = &offer.link_tokopedia {
        card.push_str(&format!("      🟢 Tokopedia: {}\n", link));
    }
    if let Some(link) = &offer.link_shopee {
        card.push_str(&format!("      🟠 Shopee: {}\n", link));
    }
    card
}

/// Guidance shown when nothing matched.
pub fn no_match_hint(recommendation: &Recommendation) -> String {
    format!(
        "No '{}' laptops at or below {}. Try raising your budget.",
        recommendation.category,
        format_price(recommendation.price_ceiling)
    )
}

pub fn print_recommendation(recommendation: &Recommendation, primary_count: usize) {
    println!("\n🎓 Field focus: {}", recommendation.focus());
    println!("🧰 Software: {}", recommendation.software());
    println!("🏷️  Category: {}", recommendation.category);

    if recommendation.is_empty() {
        println!("\n⚠️  {}", no_match_hint(recommendation));
        return;
    }

    println!("\n⭐ Top picks");
    println!("===========\n");
    for (i, offer) in recommendation.primary(primary_count).iter().enumerate() {
        println!("{}", render_card(offer, i + 1));
    }

    let alternatives = recommendation.alternatives(primary_count);
    if !alternatives.is_empty() {
        println!("🔁 Alternatives / other options");
        println!("==============================\n");
        for (i, offer) in alternatives.iter().enumerate() {
            println!("{}", render_card(offer, primary_count + i + 1));
        }
    }
}

pub fn print_menu_options(catalog: &CatalogRepository) {
    println!("\n📚 Fields of study:");
    for name in catalog.field_names() {
        println!("   - {}", name);
    }

    println!("\n💻 Operating systems:");
    println!("   - {}", ANY_SENTINEL);
    for os in catalog.os_options() {
        println!("   - {}", os);
    }

    println!("\n📐 Screen sizes (inch):");
    println!("   - {}", ANY_SENTINEL);
    for screen in catalog.screen_options() {
        println!("   - {}", screen);
    }
}

/// Writes the ranked offerings to `recommendations.csv` in `output_dir`.
pub fn write_recommendations_csv(recommendation: &Recommendation, output_dir: &str) -> Result<PathBuf> {
    use csv::Writer;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir))?;

    let csv_path = Path::new(output_dir).join("recommendations.csv");
    let mut writer = Writer::from_path(&csv_path)
        .with_context(|| format!("Failed to create {}", csv_path.display()))?;

    // Write headers
    writer.write_record([
        "Rank",
        "Brand",
        "Model",
        "Processor",
        "RAM",
        "GPU",
        "Storage",
        "Screen_Size_Inch",
        "Price_IDR",
        "OS",
        "Category",
        "Link_Tokopedia",
        "Link_Shopee",
    ])?;

    // Write data
    for (i, offer) in recommendation.offerings.iter().enumerate() {
        let rank = (i + 1).to_string();
        let price = offer.display_price();
        let record: [&str; 13] = [
            &rank,
            &offer.brand,
            &offer.model,
            &offer.processor,
            &offer.ram,
            &offer.gpu,
            &offer.storage,
            &offer.screen,
            &price,
            offer.os.as_deref().unwrap_or(""),
            classify_laptop(offer).label(),
            offer.link_tokopedia.as_deref().unwrap_or(""),
            offer.link_shopee.as_deref().unwrap_or(""),
        ];
        writer.write_record(record)?;
    }

    writer.flush()?;
    Ok(csv_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NeedCategory;

    fn offer(model: &str, price: &str) -> LaptopOffering {
        LaptopOffering {
            brand: "Asus".into(),
            model: model.into(),
            processor: "i5-11400H".into(),
            ram: "8GB".into(),
            gpu: "GTX 1650".into(),
            storage: "512GB SSD".into(),
            raw_screen: "15.6".into(),
            raw_price: price.into(),
            os: Some("Windows 11".into()),
            link_tokopedia: Some("https://tokopedia.com/asus".into()),
            ..Default::default()
        }
        .normalized()
    }

    fn recommendation(offerings: Vec<LaptopOffering>) -> Recommendation {
        Recommendation {
            category: NeedCategory::ProgrammingDevelopment,
            field: None,
            price_ceiling: 15_500_000,
            offerings,
        }
    }

    #[test]
    fn card_shows_price_screen_and_present_links() {
        let card = render_card(&offer("TUF F15", "Rp 12.000.000"), 1);
        assert!(card.contains("#1 Asus TUF F15"));
        assert!(card.contains("Rp 12.000.000"));
        assert!(card.contains("Screen: 15.6\""));
        assert!(card.contains("Tokopedia: https://tokopedia.com/asus"));
        assert!(!card.contains("Shopee"));
    }

    #[test]
    fn hint_names_category_and_ceiling() {
        let hint = no_match_hint(&recommendation(Vec::new()));
        assert_eq!(
            hint,
            "No 'Programming & Development' laptops at or below Rp 15.500.000. Try raising your budget."
        );
    }

    #[test]
    fn export_writes_one_row_per_offering() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("out");
        let rec = recommendation(vec![
            offer("TUF F15", "Rp 12.000.000"),
            offer("Vivobook", "Rp 9.000.000"),
        ]);

        let path = write_recommendations_csv(&rec, output_dir.to_str().unwrap()).unwrap();

        let mut reader = csv::Reader::from_path(path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][2], "TUF F15");
        assert_eq!(&rows[0][8], "Rp 12.000.000");
        assert_eq!(&rows[0][10], "Programming & Development");
        assert_eq!(&rows[1][12], "");
    }
}
