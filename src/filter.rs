//! Client-side filtering of fetched pages by gender and country.

use crate::model::{Gender, User};

/// Active filter criteria. `None` means "match everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub gender: Option<Gender>,
    pub country: Option<String>,
}

impl FilterState {
    pub fn new(gender: Option<Gender>, country: Option<&str>) -> Self {
        let mut state = Self {
            gender,
            country: None,
        };
        state.set_country(country.unwrap_or(""));
        state
    }

    /// Set the country substring, matched as given; empty input clears the filter
    pub fn set_country(&mut self, text: &str) {
        self.country = if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        };
    }

    pub fn is_empty(&self) -> bool {
        self.gender.is_none() && self.country.is_none()
    }

    /// Case-insensitive gender equality and case-insensitive country substring
    pub fn matches(&self, user: &User) -> bool {
        if let Some(gender) = self.gender {
            if user.gender != gender {
                return false;
            }
        }
        if let Some(country) = &self.country {
            let needle = country.to_lowercase();
            if !user.address.country.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }

    /// Keep the users of a batch that pass the filter, in their original order
    pub fn apply(&self, batch: Vec<User>) -> Vec<User> {
        if self.is_empty() {
            return batch;
        }
        batch.into_iter().filter(|u| self.matches(u)).collect()
    }

    /// Toolbar summary, e.g. "Gender: female | Country: united"
    pub fn describe(&self) -> String {
        format!(
            "Gender: {} | Country: {}",
            self.gender.map(|g| g.as_str()).unwrap_or("All"),
            self.country.as_deref().unwrap_or("-")
        )
    }
}
