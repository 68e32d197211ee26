use std::sync::Arc;

use serde::Deserialize;
use setkit::settings::{Defaults, SettingsStore};
use setkit::{AppContext, Config, Director, SettingsDirector};

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct AppSettings {
    app_name: String,
    host: String,
    port: u16,
    database_url: String,
    workers: u32,
}

fn main() -> Result<(), setkit::Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let environment = std::env::var("DEMO_ENV").unwrap_or_else(|_| "development".into());

    // defaults file -> DEMO__* environment overrides
    let loader = Config::builder()
        .with_file("demos/settings.toml", true)
        .with_env("DEMO", "__")
        .with_environment(environment);

    let director = SettingsDirector::<AppSettings>::new()
        .with_transformer(Defaults::new().value("workers", 4));

    let store = Arc::new(SettingsStore::new());
    store.set(director.build(&loader)?);

    let ctx = AppContext::builder().with_store(store).build()?;
    let settings = ctx.config()?;

    println!("{} listening on {}:{}", settings.app_name, settings.host, settings.port);
    println!("database: {}", settings.database_url);
    println!("workers: {}", settings.workers);

    Ok(())
}
