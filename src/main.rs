mod error;
mod loader;
mod models;
mod recommender;
mod report;

use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command};
use loader::CatalogRepository;
use models::{filter_from_choice, Config};
use recommender::{Query, Recommender};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn build_cli() -> Command {
    Command::new("laptop-recommender")
        .version("1.0")
        .about("Recommends laptops for a student's field of study and budget")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("field")
                .short('f')
                .long("field")
                .value_name("NAME")
                .help("Field of study (Jurusan), exactly as listed by --list")
                .required_unless_present("list"),
        )
        .arg(
            Arg::new("budget")
                .short('b')
                .long("budget")
                .value_name("AMOUNT")
                .help("Maximum budget in Rupiah")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("os")
                .long("os")
                .value_name("TEXT")
                .help("Operating system filter, or \"Semua\" for any"),
        )
        .arg(
            Arg::new("screen")
                .long("screen")
                .value_name("SIZE")
                .help("Screen size filter in inches, or \"Semua\" for any"),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("List the available fields, operating systems and screen sizes")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("export")
                .long("export")
                .help("Write the ranked laptops to recommendations.csv in the output directory")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let filter = if matches.get_flag("verbose") { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config_file = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.toml");

    // Load or create configuration
    let config = if Path::new(config_file).exists() {
        println!("📋 Loading configuration from: {}", config_file);
        Config::load_from_file(config_file)?
    } else {
        println!("📝 Creating default configuration file: {}", config_file);
        let default_config = Config::default();
        default_config.save_to_file(config_file)?;
        default_config
    };

    // Load both catalogs once; a missing file leaves an empty table
    let catalog = CatalogRepository::from_config(&config);
    for warning in catalog.warnings() {
        println!("⚠️  {}", warning);
    }
    println!(
        "📂 {} fields from {}, {} laptops from {}",
        catalog.fields().len(),
        config.field_catalog_path,
        catalog.laptops().len(),
        config.laptop_catalog_path
    );

    if matches.get_flag("list") {
        report::print_menu_options(&catalog);
        return Ok(());
    }

    // clap rejects a missing --field unless --list was given
    let field = matches.get_one::<String>("field").cloned().unwrap_or_default();

    let query = Query {
        field,
        budget: matches
            .get_one::<u64>("budget")
            .copied()
            .unwrap_or(config.default_budget),
        os: filter_from_choice(matches.get_one::<String>("os").map(String::as_str)),
        screen: filter_from_choice(matches.get_one::<String>("screen").map(String::as_str)),
    };

    println!(
        "🔍 Searching laptops for {} with budget {}",
        query.field,
        models::format_price(query.budget)
    );

    let recommendation = Recommender::new(&catalog).recommend(&query);
    report::print_recommendation(&recommendation, config.primary_count);

    if matches.get_flag("export") {
        let output_dir = config.output_directory.as_deref().unwrap_or("output");
        let path = report::write_recommendations_csv(&recommendation, output_dir)?;
        println!("\n📄 Recommendations written to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn field_is_required_without_list() {
        let err = build_cli()
            .try_get_matches_from(["laptop-recommender", "--budget", "9000000"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn list_does_not_need_a_field() {
        let matches = build_cli()
            .try_get_matches_from(["laptop-recommender", "--list"])
            .unwrap();
        assert!(matches.get_flag("list"));
        assert!(matches.get_one::<String>("field").is_none());
    }

    #[test]
    fn query_arguments_parse() {
        let matches = build_cli()
            .try_get_matches_from([
                "laptop-recommender",
                "-f",
                "Teknik Informatika",
                "-b",
                "12000000",
                "--screen",
                "15.6",
            ])
            .unwrap();
        assert_eq!(matches.get_one::<String>("field").unwrap(), "Teknik Informatika");
        assert_eq!(matches.get_one::<u64>("budget").copied(), Some(12_000_000));
        assert_eq!(matches.get_one::<String>("screen").unwrap(), "15.6");
    }
}
