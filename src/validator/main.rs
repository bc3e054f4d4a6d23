//! Standalone validator for the bot's environment configuration.
//!
//! Checks the four required variables (TOKEN, FORM_URL, FORM_FIELD_IDS,
//! USER_NAME_MAPPING) for presence and well-formedness without starting the
//! bot, so a broken deployment is caught before restart.

use std::process::ExitCode;

use clap::Parser;

// Import from the main crate
use redhill_aircon_bot::config::{FormFieldIds, UserRegistry};

/// Environment configuration validator.
#[derive(Parser, Debug)]
#[command(name = "validate_config")]
#[command(about = "Validates the environment configuration for the aircon bot")]
#[command(version)]
struct Args {
    /// Path to the .env file to load before validating.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Show the parsed field ids and registered users.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match dotenvy::from_filename(&args.env_file) {
        Ok(_) => println!("Loaded environment from: {}", args.env_file),
        Err(e) => println!("Note: could not load {} ({e}); using process environment", args.env_file),
    }
    println!();

    let mut errors = 0;

    errors += check_present("TOKEN");
    errors += check_form_url();
    errors += check_field_ids(args.verbose);
    errors += check_user_mapping(args.verbose);

    println!();
    if errors == 0 {
        println!("✓ Configuration is valid.");
        ExitCode::SUCCESS
    } else {
        println!("✗ Validation failed: {errors} error(s).");
        ExitCode::FAILURE
    }
}

/// Checks that a variable is set and non-empty. Returns the error count.
fn check_present(name: &str) -> u32 {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            println!("✓ {name} is set");
            0
        }
        Ok(_) => {
            println!("✗ {name} is set but empty");
            1
        }
        Err(_) => {
            println!("✗ {name} is missing");
            1
        }
    }
}

fn check_form_url() -> u32 {
    let Ok(url) = std::env::var("FORM_URL") else {
        println!("✗ FORM_URL is missing");
        return 1;
    };

    if url.starts_with("http://") || url.starts_with("https://") {
        println!("✓ FORM_URL is set");
        0
    } else {
        println!("✗ FORM_URL does not look like an HTTP(S) URL: {url}");
        1
    }
}

fn check_field_ids(verbose: bool) -> u32 {
    let Ok(raw) = std::env::var("FORM_FIELD_IDS") else {
        println!("✗ FORM_FIELD_IDS is missing");
        return 1;
    };

    match serde_json::from_str::<FormFieldIds>(&raw) {
        Ok(fields) => {
            println!("✓ FORM_FIELD_IDS is a valid field-id mapping");
            if fields.usage_duration.is_none() {
                println!("  (no usage_duration field configured; the duration will not be submitted)");
            }
            if verbose {
                println!("  name              -> {}", fields.name);
                println!("  start_time_hour   -> {}", fields.start_time_hour);
                println!("  start_time_minute -> {}", fields.start_time_minute);
                println!("  start_date_year   -> {}", fields.start_date_year);
                println!("  start_date_month  -> {}", fields.start_date_month);
                println!("  start_date_day    -> {}", fields.start_date_day);
                println!("  end_time_hour     -> {}", fields.end_time_hour);
                println!("  end_time_minute   -> {}", fields.end_time_minute);
                println!("  end_date_year     -> {}", fields.end_date_year);
                println!("  end_date_month    -> {}", fields.end_date_month);
                println!("  end_date_day      -> {}", fields.end_date_day);
            }
            0
        }
        Err(e) => {
            println!("✗ FORM_FIELD_IDS is invalid: {e}");
            1
        }
    }
}

fn check_user_mapping(verbose: bool) -> u32 {
    let Ok(raw) = std::env::var("USER_NAME_MAPPING") else {
        println!("✗ USER_NAME_MAPPING is missing");
        return 1;
    };

    match serde_json::from_str::<UserRegistry>(&raw) {
        Ok(registry) => {
            println!("✓ USER_NAME_MAPPING is valid ({} user(s))", registry.len());
            if registry.is_empty() {
                println!("  (no registered users; every /on and /hour will be rejected)");
            }
            if verbose {
                for (username, display_name) in registry.iter() {
                    println!("  @{username} -> {display_name}");
                }
            }
            0
        }
        Err(e) => {
            println!("✗ USER_NAME_MAPPING is invalid: {e}");
            1
        }
    }
}
