//! Prompts shown when the binary runs with `--interactive`.

use dialoguer::{Confirm, Input};

use crate::config::CatalogConfig;

/// Answers collected from the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunChoices {
    pub force_refresh: bool,
    pub refresh_records: bool,
}

/// Asks how the next run should treat both caches. Defaults are taken from
/// `config` and the current `refresh_records` flag.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read from.
pub fn prompt_run_choices(
    config: &CatalogConfig,
    refresh_records: bool,
) -> Result<RunChoices, dialoguer::Error> {
    let force_refresh = Confirm::new()
        .with_prompt("Re-crawl the card list even if it is cached?")
        .default(config.force_refresh)
        .interact()?;

    let refresh_records = Confirm::new()
        .with_prompt("Re-fetch every cached card?")
        .default(refresh_records)
        .interact()?;

    Ok(RunChoices {
        force_refresh,
        refresh_records,
    })
}

/// Asks for the listing start URL, offering the configured one.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read from.
pub fn prompt_start_url(config: &CatalogConfig) -> Result<String, dialoguer::Error> {
    Input::new()
        .with_prompt("Category listing URL")
        .default(config.start_url.clone())
        .interact_text()
}

/// Applies the operator's answers to `config`. Returns the record refresh
/// choice, which is not part of the configuration.
pub fn apply_choices(config: &mut CatalogConfig, choices: RunChoices) -> bool {
    config.force_refresh = choices.force_refresh;
    choices.refresh_records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_override_config() {
        let mut config = CatalogConfig::default();
        let refresh = apply_choices(
            &mut config,
            RunChoices {
                force_refresh: true,
                refresh_records: false,
            },
        );
        assert!(config.force_refresh);
        assert!(!refresh);
    }
}
