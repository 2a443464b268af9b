//! Logo list operations on the brands section.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::section::content::{BrandLogo, Brands};

/// Logo submitted for appending; id and order are assigned.
#[derive(Debug, Clone)]
pub struct NewLogo {
    pub name: String,
    pub logo_url: String,
}

impl Brands {
    /// Append a logo after every existing one.
    ///
    /// The id is one past the current maximum and the display order one past
    /// the current highest order, starting at 1 for an empty list. Fails when
    /// the highest id is already `i64::MAX`.
    pub fn add_logo(&mut self, logo: NewLogo) -> Result<BrandLogo, CoreError> {
        let id = self
            .logos
            .iter()
            .map(|l| l.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| CoreError::Validation("no logo id left after the current maximum".into()))?;
        let display_order = self
            .logos
            .iter()
            .map(|l| l.display_order)
            .max()
            .map_or(1, |max| max.saturating_add(1));

        let logo = BrandLogo {
            id,
            name: logo.name.trim().to_string(),
            logo_url: logo.logo_url.trim().to_string(),
            display_order,
        };
        self.logos.push(logo.clone());
        Ok(logo)
    }

    /// Remove the logo with `id` and renumber the rest `1..=n` in their
    /// current display order.
    pub fn remove_logo(&mut self, id: i64) -> Result<BrandLogo, CoreError> {
        let index = self
            .logos
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| CoreError::not_found("BrandLogo", id))?;
        let removed = self.logos.remove(index);

        self.logos.sort_by_key(|l| l.display_order);
        for (position, logo) in self.logos.iter_mut().enumerate() {
            logo.display_order = position as u32 + 1;
        }
        Ok(removed)
    }

    /// Reorder logos to match `ids`, which must name every existing logo
    /// exactly once.
    pub fn reorder_logos(&mut self, ids: &[i64]) -> Result<(), CoreError> {
        if ids.is_empty() {
            return Err(CoreError::Validation(
                "logoIds must be a non-empty list".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(ids.len());
        if let Some(dup) = ids.iter().find(|id| !seen.insert(**id)) {
            return Err(CoreError::Validation(format!(
                "logo id {dup} appears more than once"
            )));
        }

        let unknown: Vec<String> = ids
            .iter()
            .filter(|id| !self.logos.iter().any(|l| l.id == **id))
            .map(ToString::to_string)
            .collect();
        if !unknown.is_empty() {
            return Err(CoreError::Validation(format!(
                "unknown logo ids: {}",
                unknown.join(", ")
            )));
        }

        let omitted: Vec<String> = self
            .logos
            .iter()
            .filter(|l| !seen.contains(&l.id))
            .map(|l| l.id.to_string())
            .collect();
        if !omitted.is_empty() {
            return Err(CoreError::Validation(format!(
                "every existing logo must be included; missing: {}",
                omitted.join(", ")
            )));
        }

        let mut reordered = Vec::with_capacity(ids.len());
        for (position, id) in ids.iter().enumerate() {
            if let Some(index) = self.logos.iter().position(|l| l.id == *id) {
                let mut logo = self.logos.swap_remove(index);
                logo.display_order = position as u32 + 1;
                reordered.push(logo);
            }
        }
        self.logos = reordered;
        Ok(())
    }
}
