//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_search(config)?;
    validate_classify(config)?;
    validate_post(config)?;
    Ok(())
}

fn invalid(message: impl Into<String>) -> Error {
    Error::ConfigValidation {
        message: message.into(),
    }
}

fn validate_search(config: &Config) -> Result<()> {
    let search = &config.search;

    if search.per_page == 0 || search.per_page > 500 {
        return Err(invalid(format!(
            "search.per_page must be between 1 and 500, got {}",
            search.per_page
        )));
    }

    if search.max_pages == 0 {
        return Err(invalid("search.max_pages must be at least 1"));
    }

    if search.terms.iter().all(|t| t.trim().is_empty()) {
        return Err(invalid("search.terms must contain at least one term"));
    }

    Ok(())
}

fn validate_classify(config: &Config) -> Result<()> {
    let classify = &config.classify;

    if classify.targets.iter().all(|t| t.trim().is_empty()) {
        return Err(invalid("classify.targets must contain at least one term"));
    }

    if classify.label_byte_budget == 0 {
        return Err(invalid("classify.label_byte_budget must be at least 1"));
    }

    Ok(())
}

fn validate_post(config: &Config) -> Result<()> {
    if config.post.max_chars == 0 {
        return Err(invalid("post.max_chars must be at least 1"));
    }
    Ok(())
}
