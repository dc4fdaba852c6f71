use std::{env, path::Path};

use chrono::{Local, NaiveDate};

use super::commands::{all_definitions, CommandRegistry};
use super::output::{self, OutputPreferences};
use super::CommandError;
use crate::{
    config::{ConfigManager, Settings},
    currency::format_amount,
    domain::Subscription,
    schedule::parse_iso_date,
    storage::{JsonStore, SnapshotStore},
    utils::paths::{app_data_dir, snapshot_file},
};

/// Overrides the date the CLI treats as today (`YYYY-MM-DD`).
pub const TODAY_ENV: &str = "SUBSCRIPTION_CORE_TODAY";

/// Everything a command handler needs for one invocation.
pub struct CliContext {
    pub store: JsonStore,
    pub config: ConfigManager,
    pub settings: Settings,
    pub today: NaiveDate,
    pub registry: CommandRegistry,
}

impl CliContext {
    pub fn new(snapshot: Option<&str>) -> Result<Self, CommandError> {
        let base = app_data_dir();
        let store = JsonStore::new(
            Some(base.clone()),
            Some(snapshot_file(snapshot.map(Path::new))),
        )?;
        let config = ConfigManager::with_base_dir(base)?;
        let settings = config.load()?;
        output::set_preferences(OutputPreferences::from(&settings.accessibility));

        Ok(Self {
            store,
            config,
            settings,
            today: resolve_today()?,
            registry: CommandRegistry::new(all_definitions()),
        })
    }

    pub fn subscriptions(&self) -> Result<Vec<Subscription>, CommandError> {
        Ok(self.store.load_subscriptions()?)
    }

    /// Amount in the user's display currency.
    pub fn money(&self, amount: f64) -> String {
        format_amount(amount, &self.settings.currency_symbol)
    }

    pub fn save_settings(&self) -> Result<(), CommandError> {
        self.config.save(&self.settings)?;
        output::set_preferences(OutputPreferences::from(&self.settings.accessibility));
        Ok(())
    }
}

fn resolve_today() -> Result<NaiveDate, CommandError> {
    match env::var(TODAY_ENV) {
        Ok(raw) if !raw.trim().is_empty() => parse_iso_date(raw.trim()).ok_or_else(|| {
            CommandError::InvalidArguments(format!("{TODAY_ENV} must be YYYY-MM-DD, got `{raw}`"))
        }),
        _ => Ok(Local::now().date_naive()),
    }
}
