//! Country-settings set reconciliation, keyed by `country_code`.

use std::collections::{HashMap, HashSet};

use crate::constants::COUNTRY_CODE_LENGTH;
use crate::error::{DomainError, DomainResult};
use crate::product::{CountrySettingInput, ProductCountrySetting};

/// A country setting to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCountrySetting {
    pub country_code: String,
    pub enabled: bool,
    pub sellable: bool,
    pub category_code: Option<String>,
    pub category: Option<String>,
    pub related: Option<String>,
    pub substitute: String,
}

/// What to write to turn the stored set into the incoming one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountrySettingsPlan {
    pub create: Vec<NewCountrySetting>,
    /// Existing rows with the incoming fields merged in
    pub update: Vec<ProductCountrySetting>,
    pub delete: Vec<ProductCountrySetting>,
}

impl CountrySettingsPlan {
    /// Rows touched by the plan
    pub fn touched(&self) -> usize {
        self.create.len() + self.update.len() + self.delete.len()
    }
}

fn validate_country_code(code: &str) -> DomainResult<()> {
    if code.len() != COUNTRY_CODE_LENGTH || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::validation(format!(
            "Invalid country code '{}'",
            code
        )));
    }
    Ok(())
}

impl CountrySettingInput {
    fn merge_into(self, mut current: ProductCountrySetting) -> ProductCountrySetting {
        if let Some(enabled) = self.enabled {
            current.enabled = enabled;
        }
        if let Some(sellable) = self.sellable {
            current.sellable = sellable;
        }
        if let Some(category_code) = self.category_code {
            current.category_code = category_code;
        }
        if let Some(category) = self.category {
            current.category = category;
        }
        if let Some(related) = self.related {
            current.related = related;
        }
        if let Some(substitute) = self.substitute {
            current.substitute = substitute;
        }
        current
    }

    fn into_new(self, country_code: String) -> NewCountrySetting {
        NewCountrySetting {
            country_code,
            enabled: self.enabled.unwrap_or(true),
            sellable: self.sellable.unwrap_or(true),
            category_code: self.category_code.flatten(),
            category: self.category.flatten(),
            related: self.related.flatten(),
            substitute: self.substitute.unwrap_or_default(),
        }
    }
}

/// Diff `existing` against `incoming`. Codes compare case-insensitively and
/// new rows store them uppercased. Items without a country code are
/// skipped; a code repeated within `incoming` is rejected.
pub fn plan_country_settings(
    existing: &[ProductCountrySetting],
    incoming: Vec<CountrySettingInput>,
) -> DomainResult<CountrySettingsPlan> {
    let by_code: HashMap<String, &ProductCountrySetting> = existing
        .iter()
        .map(|setting| (setting.country_code.to_ascii_uppercase(), setting))
        .collect();
    let mut seen: HashSet<String> = HashSet::with_capacity(incoming.len());
    let mut plan = CountrySettingsPlan::default();

    for mut item in incoming {
        let Some(code) = item.country_code.take().filter(|code| !code.is_empty()) else {
            continue;
        };
        validate_country_code(&code)?;
        let code = code.to_ascii_uppercase();
        if !seen.insert(code.clone()) {
            return Err(DomainError::validation(format!(
                "Country code '{}' appears more than once",
                code
            )));
        }

        match by_code.get(code.as_str()) {
            Some(current) => plan.update.push(item.merge_into((*current).clone())),
            None => plan.create.push(item.into_new(code)),
        }
    }

    plan.delete = existing
        .iter()
        .filter(|setting| !seen.contains(&setting.country_code.to_ascii_uppercase()))
        .cloned()
        .collect();

    Ok(plan)
}
