use serde::{Deserialize, Serialize};
use tinycast_core::thresholds::AgeGroupBounds;
use tinycast_core::{AgeGroup, ChildConfig};
use uuid::Uuid;

/// A child on the roster. The age band is derived and kept in sync with
/// `age_months` by every mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: Uuid,
    pub name: String,
    pub age_months: u32,
    pub age_group: AgeGroup,
}

impl Child {
    pub fn new(name: impl Into<String>, age_months: u32) -> Self {
        Self::with_bounds(name, age_months, &AgeGroupBounds::default())
    }

    /// Classify against configured band boundaries.
    pub fn with_bounds(
        name: impl Into<String>,
        age_months: u32,
        bounds: &AgeGroupBounds,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            age_months,
            age_group: bounds.classify(age_months),
        }
    }

    pub fn set_age(&mut self, age_months: u32) {
        self.set_age_with(age_months, &AgeGroupBounds::default());
    }

    pub fn set_age_with(&mut self, age_months: u32, bounds: &AgeGroupBounds) {
        self.age_months = age_months;
        self.age_group = bounds.classify(age_months);
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

impl From<&ChildConfig> for Child {
    fn from(config: &ChildConfig) -> Self {
        Self::new(config.name.clone(), config.age_months)
    }
}
