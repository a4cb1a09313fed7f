//! Client-side ordering of the displayed list.

use crate::model::User;
use anyhow::{anyhow, Result};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    FirstName,
    Age,
}

impl SortField {
    /// Accepts both column labels and field names
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "id" => Some(Self::Id),
            "name" | "firstname" | "first_name" => Some(Self::FirstName),
            "age" | "demography" => Some(Self::Age),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "firstName",
            Self::Age => "age",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortState {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Sort requested on the command line. `--desc` without a column
    /// reverses the default id column.
    pub fn from_args(field: Option<&str>, desc: bool) -> Result<Option<Self>> {
        let field = match field {
            Some(s) => SortField::from_str(s)
                .ok_or_else(|| anyhow!("Invalid sort field: {}. Use: id, name, age", s))?,
            None if desc => SortField::Id,
            None => return Ok(None),
        };
        let order = if desc { SortOrder::Desc } else { SortOrder::Asc };
        Ok(Some(Self::new(field, order)))
    }

    /// Header click: same column flips direction, another column starts ascending
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.order = self.order.toggled();
        } else {
            self.field = field;
            self.order = SortOrder::Asc;
        }
    }

    /// Ascending comparison on the chosen field
    fn compare_field(&self, a: &User, b: &User) -> Ordering {
        match self.field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::FirstName => a
                .first_name
                .to_lowercase()
                .cmp(&b.first_name.to_lowercase()),
            SortField::Age => a.age.cmp(&b.age),
        }
    }

    pub fn compare(&self, a: &User, b: &User) -> Ordering {
        let ord = self.compare_field(a, b);
        match self.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

impl std::fmt::Display for SortState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field.as_str(), self.order.as_str())
    }
}

/// Stable in-place sort of the displayed list
pub fn sort_users(users: &mut [User], state: &SortState) {
    users.sort_by(|a, b| state.compare(a, b));
}
