//! Help message display for CLI.

#![allow(clippy::print_stdout)]

use crate::constants::env;

/// Credential variables and the commands that need them.
const CREDENTIALS: [(&str, &str); 3] = [
    (env::FLICKR_KEY, "search"),
    (env::VISION_API_KEY, "classify"),
    (env::TWITTER_ACCESS_TOKEN, "post"),
];

/// Credentials that are unset or blank.
pub fn missing_credentials() -> Vec<&'static str> {
    CREDENTIALS
        .iter()
        .filter(|(name, _)| !matches!(std::env::var(name), Ok(v) if !v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect()
}

/// Print a setup guide when credentials are missing, else a short reminder.
pub fn print_smart_help() {
    let missing = missing_credentials();
    if missing.is_empty() {
        print_configured_help();
    } else {
        print_first_time_help(&missing);
    }
}

/// Print the setup guide.
pub fn print_first_time_help(missing: &[&str]) {
    println!("Get started with birbybot:");
    println!();
    println!("1. Set the credentials for the commands you want to run:");
    for (name, command) in CREDENTIALS {
        let state = if missing.contains(&name) { "missing" } else { "set" };
        println!("   {name:<24} {command:<9} ({state})");
    }
    println!();
    println!("2. Optionally write a config file to adjust search terms and targets:");
    println!("   birbybot config init");
    println!();
    println!("3. Run the pipeline:");
    println!("   birbybot search");
    println!("   birbybot classify");
    println!("   birbybot post --dry-run");
    println!();
    println!("Run 'birbybot -h' for all options.");
}

/// Print brief usage reminder.
pub fn print_configured_help() {
    println!("Usage: birbybot <search|classify|post|config> [OPTIONS]");
    println!();
    println!("Run 'birbybot -h' for all options.");
}
