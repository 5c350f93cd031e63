use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::AppError;
use crate::config::Config;

const ALL_SITES: &str = "all";

const MONTH_LABELS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Which site the dashboard is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SiteScope {
    /// No concrete site; site-scoped consumers stay idle.
    #[default]
    All,
    Site(String),
}

impl SiteScope {
    /// Parses a raw site id. Blank input and `"all"` mean every site.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_SITES) {
            Self::All
        } else {
            Self::Site(trimmed.to_string())
        }
    }

    /// Returns the concrete site id, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Site(id) => Some(id),
        }
    }

    /// Value written to storage and to `<select>` options.
    pub fn as_str(&self) -> &str {
        self.id().unwrap_or(ALL_SITES)
    }
}

/// Date dimensions an endpoint is scoped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub month: bool,
    pub year: bool,
}

impl Dimensions {
    /// Scoped by both month and year.
    pub const MONTH_AND_YEAR: Self = Self {
        month: true,
        year: true,
    };

    /// Scoped by site only.
    pub const SITE_ONLY: Self = Self {
        month: false,
        year: false,
    };
}

/// A normalized site/month/year filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    site: SiteScope,
    months: BTreeSet<u8>,
    years: BTreeSet<i32>,
}

impl Selection {
    /// Builds a normalized selection from untrusted input.
    ///
    /// Duplicates collapse, values sort ascending, months outside 1..=12 and
    /// years outside the `i32` range are dropped without error.
    pub fn normalize<M, Y>(raw_site: &str, raw_months: M, raw_years: Y) -> Self
    where
        M: IntoIterator<Item = i64>,
        Y: IntoIterator<Item = i64>,
    {
        Self {
            site: SiteScope::parse(raw_site),
            months: raw_months
                .into_iter()
                .filter(|m| (1..=12).contains(m))
                .filter_map(|m| u8::try_from(m).ok())
                .collect(),
            years: raw_years
                .into_iter()
                .filter_map(|y| i32::try_from(y).ok())
                .collect(),
        }
    }

    pub fn site(&self) -> &SiteScope {
        &self.site
    }

    pub fn months(&self) -> &BTreeSet<u8> {
        &self.months
    }

    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    /// True iff a concrete site and at least one month and year are chosen.
    pub fn is_queryable(&self) -> bool {
        self.is_queryable_for(Dimensions::MONTH_AND_YEAR)
    }

    /// Like [`is_queryable`](Self::is_queryable), checking only the
    /// dimensions a consumer is scoped by.
    pub fn is_queryable_for(&self, dimensions: Dimensions) -> bool {
        self.site.id().is_some()
            && (!dimensions.month || !self.months.is_empty())
            && (!dimensions.year || !self.years.is_empty())
    }

    /// Splits into one selection per year, keeping site and months.
    pub fn per_year(&self) -> Vec<Selection> {
        self.years
            .iter()
            .map(|year| Selection {
                site: self.site.clone(),
                months: self.months.clone(),
                years: BTreeSet::from([*year]),
            })
            .collect()
    }

    pub fn to_persisted(&self) -> PersistedSelection {
        PersistedSelection {
            site: self.site.as_str().to_string(),
            months: self
                .months
                .iter()
                .map(|m| MonthToken::Code(i64::from(*m)))
                .collect(),
            years: self.years.iter().map(|y| i64::from(*y)).collect(),
        }
    }

    pub fn from_persisted(shape: PersistedSelection) -> Self {
        let months: Vec<i64> = shape.months.iter().filter_map(MonthToken::code).collect();
        Self::normalize(&shape.site, months, shape.years)
    }

    /// Parses a stored JSON value.
    ///
    /// Only a JSON object carrying `site`, `months` and `years` is accepted.
    pub fn try_restore(raw: &str) -> Result<Self, AppError> {
        let malformed = |e: serde_json::Error| AppError::MalformedPersistedState(e.to_string());

        let value: serde_json::Value = serde_json::from_str(raw).map_err(malformed)?;
        if !value.is_object() {
            return Err(AppError::MalformedPersistedState(format!(
                "expected an object, found {value}"
            )));
        }
        serde_json::from_value::<PersistedSelection>(value)
            .map(Self::from_persisted)
            .map_err(malformed)
    }

    /// Restores a stored JSON value, falling back to the default when it is
    /// absent or malformed.
    pub fn restore(raw: Option<&str>) -> Self {
        raw.and_then(|raw| Self::try_restore(raw).ok())
            .unwrap_or_default()
    }

    /// Applies a filter action, always yielding a normalized selection.
    pub fn reduce(&self, action: SelectionAction) -> Self {
        let mut next = self.clone();
        match action {
            SelectionAction::SetSite(raw) => next.site = SiteScope::parse(&raw),
            SelectionAction::ToggleMonth(month) => {
                if (1..=12).contains(&month) && !next.months.remove(&month) {
                    next.months.insert(month);
                }
            }
            SelectionAction::ToggleYear(year) => {
                if !next.years.remove(&year) {
                    next.years.insert(year);
                }
            }
            SelectionAction::Reset => next = Self::default(),
        }
        next
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            site: SiteScope::All,
            months: BTreeSet::from([Config::DEFAULT_MONTH]),
            years: BTreeSet::from([Config::DEFAULT_YEAR]),
        }
    }
}

/// Filter UI actions.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionAction {
    SetSite(String),
    ToggleMonth(u8),
    ToggleYear(i32),
    Reset,
}

/// Stored form of a [`Selection`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSelection {
    pub site: String,
    pub months: Vec<MonthToken>,
    pub years: Vec<i64>,
}

/// A stored month, either as its code or as a label written by older builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonthToken {
    Code(i64),
    Label(String),
}

impl MonthToken {
    fn code(&self) -> Option<i64> {
        match self {
            Self::Code(code) => Some(*code),
            Self::Label(label) => month_from_label(label).map(i64::from),
        }
    }
}

/// Lowercase full month name for a code in 1..=12.
pub fn month_label(code: u8) -> Option<&'static str> {
    MONTH_LABELS.get(usize::from(code).checked_sub(1)?).copied()
}

/// Month code for a full or three-letter month name, any case.
pub fn month_from_label(label: &str) -> Option<u8> {
    let label = label.trim().to_lowercase();
    if label.len() < 3 {
        return None;
    }
    MONTH_LABELS
        .iter()
        .position(|name| *name == label || (label.len() == 3 && name.starts_with(&label)))
        .and_then(|index| u8::try_from(index + 1).ok())
}
