//! Language picker - Main Entry Point
//!
//! Shows and changes the persisted display locale.
//!
//! ```text
//! locale-sync [--config PATH] [--state PATH] [list|get|set TAG|cycle]
//! ```

use anyhow::Context;
use locale_sync::{
    ComponentLocaleRegistry, JsonFileStorage, LocaleBinding, LocaleConfig, LocaleStore,
    RustI18nEngine,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "usage: locale-sync [--config PATH] [--state PATH] [list|get|set TAG|cycle]";

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,locale_sync=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        println!("{}", USAGE);
        return Ok(());
    }

    let config_path: Option<PathBuf> = args.opt_value_from_str("--config")?;
    let state_path: Option<PathBuf> = args.opt_value_from_str("--state")?;
    let rest: Vec<String> = args
        .finish()
        .into_iter()
        .map(|s| s.to_string_lossy().into_owned())
        .collect();

    let config = match config_path {
        Some(path) => LocaleConfig::load(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => LocaleConfig::load_or_default(),
    };

    let state_file = match state_path {
        Some(path) => path,
        None => config.resolve_state_file()?,
    };
    tracing::debug!("Using locale state file {:?}", state_file);

    let store = LocaleStore::open(JsonFileStorage::new(state_file), &config.store_options())?;
    let binding = LocaleBinding::new(
        store,
        RustI18nEngine::default(),
        ComponentLocaleRegistry::builtin(),
    )?
    .with_display_names(config.display_names_table()?);

    match rest.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["get"] => print_current(&binding)?,
        ["list"] => {
            println!("{}", binding.translate("language.title"));
            for option in binding.locale_options()? {
                let marker = if option.is_current { "*" } else { " " };
                println!("{} {:<6} {}", marker, option.locale, option.display_name);
            }
        }
        ["set", tag] => match binding.set_locale_code(tag) {
            Ok(()) => print_changed(&binding)?,
            Err(e) if e.is_invalid_locale() => {
                tracing::warn!("Rejected locale change: {}", e);
                eprintln!("{}", binding.translate("language.invalid").replace("%{tag}", tag));
                print_current(&binding)?;
                std::process::exit(2);
            }
            Err(e) => return Err(e.into()),
        },
        ["cycle"] => {
            binding.cycle_locale()?;
            print_changed(&binding)?;
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

fn print_current(binding: &LocaleBinding<RustI18nEngine>) -> anyhow::Result<()> {
    let descriptor = binding.ui_locale_descriptor()?;
    println!(
        "{}",
        binding
            .translate("language.current")
            .replace("%{name}", binding.display_name()?)
    );
    println!(
        "{} ({}, {})",
        binding.current_locale(),
        descriptor.library_code,
        descriptor.format_date(chrono::Local::now().date_naive())
    );
    Ok(())
}

fn print_changed(binding: &LocaleBinding<RustI18nEngine>) -> anyhow::Result<()> {
    println!(
        "{}",
        binding
            .translate("language.changed")
            .replace("%{name}", binding.display_name()?)
    );
    Ok(())
}
