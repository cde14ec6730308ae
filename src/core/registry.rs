use crate::core::arena::TechnologyArena;
use crate::domain::model::{TechId, Year};
use crate::utils::error::{Result, VintageError};
use std::collections::BTreeMap;

/// Ordered family of vintages sharing one technology identity.
///
/// Holds handles only; the technologies themselves live in a
/// [`TechnologyArena`] owned by the caller.
#[derive(Debug, Clone, Default)]
pub struct VintageSeries {
    name: String,
    vintages: BTreeMap<Year, TechId>,
}

impl VintageSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vintages: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `id` as the vintage for `year`. An occupied year is rejected
    /// and left untouched.
    ///
    /// `year` must be the technology's own vintage year.
    pub fn insert(&mut self, arena: &TechnologyArena, year: Year, id: TechId) -> Result<()> {
        debug_assert_eq!(
            arena[id].year(),
            year,
            "{} vintage keyed under a different year",
            self.name
        );
        if self.vintages.contains_key(&year) {
            tracing::error!(
                "A vintage already exists with year: {} of the technology type: {}",
                year,
                self.name
            );
            return Err(VintageError::DuplicateVintage {
                series: self.name.clone(),
                year,
            });
        }

        self.vintages.insert(year, id);
        Ok(())
    }

    pub fn find(&self, year: Year) -> Option<TechId> {
        self.vintages.get(&year).copied()
    }

    pub fn contains(&self, year: Year) -> bool {
        self.vintages.contains_key(&year)
    }

    pub fn len(&self) -> usize {
        self.vintages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vintages.is_empty()
    }

    /// Vintage years in ascending order.
    pub fn years(&self) -> impl DoubleEndedIterator<Item = Year> + '_ {
        self.vintages.keys().copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Year, TechId)> + '_ {
        self.vintages.iter().map(|(y, id)| (*y, *id))
    }

    /// Vintages with year <= `year`, ascending.
    pub fn range_up_to(&self, year: Year) -> impl DoubleEndedIterator<Item = (Year, TechId)> + '_ {
        self.vintages.range(..=year).map(|(y, id)| (*y, *id))
    }

    /// Vintages strictly older than `year`, ascending.
    pub fn range_before(&self, year: Year) -> impl DoubleEndedIterator<Item = (Year, TechId)> + '_ {
        self.vintages.range(..year).map(|(y, id)| (*y, *id))
    }

    /// Most recent vintage year strictly before `year`.
    pub fn latest_year_before(&self, year: Year) -> Option<Year> {
        self.range_before(year).next_back().map(|(y, _)| y)
    }

    pub fn latest_year(&self) -> Option<Year> {
        self.vintages.keys().next_back().copied()
    }

    /// Total capital of every vintage built in or before `up_to_year`.
    ///
    /// Defined for any real year; NaN and years before the first vintage give 0.
    pub fn sum_capital_up_to(&self, arena: &TechnologyArena, up_to_year: f64) -> f64 {
        self.vintages
            .iter()
            .take_while(|(year, _)| f64::from(**year) <= up_to_year)
            .map(|(_, id)| arena[*id].capital())
            .sum()
    }
}
