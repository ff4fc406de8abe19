// Basic usage example for sitecfg
//
// Run with: cargo run --example basic_usage

use sitecfg::{ProcessEnv, RequestContext, SiteConfig, SiteSettings, defaults, opt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SiteConfig::builder("demo-site", "1.0.0")
        .database_path("./demo_site/site.db")
        .table_prefix("uf_")
        .app_root("./demo_site")
        .build();

    // Reads REQUEST_SCHEME / SERVER_NAME / SCRIPT_NAME, falling back to http://localhost
    let context = RequestContext::from_env(&ProcessEnv);

    let mut site = SiteSettings::open(
        config,
        &context,
        defaults! {
            "userfrosting" => {
                "site_title" => ("UserFrosting", "The title of the site."),
                "can_register" => ("1", "Allow public registration."),
                "default_theme" => ("root", "Theme used for pages without one."),
            },
        },
    )?;

    println!("Site title: {}", site.get_core("site_title")?);
    println!("Public URI: {}", site.get_core("uri.public")?);

    // Expose settings to the admin UI
    site.register_text("userfrosting", "site_title", "Site Title")?;
    site.register(
        "userfrosting",
        "can_register",
        "Public Registration",
        "toggle",
        vec![opt("0", "Off"), opt("1", "On")],
    )?;

    site.set_core("site_title", "My Demo Site");
    site.set("blog", "posts_per_page", Some("10"), Some("Posts shown on each page."));

    let report = site.store()?;
    println!(
        "Stored: {} inserted, {} updated",
        report.inserted.len(),
        report.updated.len()
    );

    println!(
        "Registered settings:\n{}",
        serde_json::to_string_pretty(site.registered_settings())?
    );

    for (key, value) in site.system_info() {
        println!("{key}: {value}");
    }

    Ok(())
}
