//! Form State Collector: assembles a `PortfolioRecord` from the form state.
//!
//! Pure read-and-assemble: nothing is retained between calls, so collecting twice
//! without edits in between yields identical records.

use crate::errors::AppError;
use crate::form::sections::{Section, SectionEntry, SectionKind};
use crate::form::state::FormState;
use crate::models::portfolio::{PortfolioRecord, WorkEntry};

/// Returns the static entry (if its primary field is filled) followed by every
/// dynamic entry in visual order that passes the same rule.
pub fn collect_entries<E: SectionEntry>(section: &Section<E>) -> Vec<E> {
    std::iter::once(&section.static_entry)
        .chain(section.items().iter().map(|item| &item.entry))
        .filter(|entry| !entry.primary().is_empty())
        .cloned()
        .collect()
}

pub fn collect(form: &FormState) -> PortfolioRecord {
    PortfolioRecord {
        personal: form.personal.clone(),
        skills: form.skills.clone(),
        education: collect_entries(&form.sections.education),
        work_experience: collect_entries(&form.sections.work),
        projects: collect_entries(&form.sections.projects),
    }
}

/// Enforces the required-field rule of added work sections before export.
///
/// Every field of an added work sub-section is required; the static items and
/// the other sections have no required fields.
pub fn validate_required(form: &FormState) -> Result<(), AppError> {
    for item in form.sections.work.items() {
        if let Some(field) = first_missing_work_field(&item.entry) {
            return Err(AppError::Validation(format!(
                "{} {}: {field} is required",
                SectionKind::Work.label(),
                item.id
            )));
        }
    }
    Ok(())
}

fn first_missing_work_field(entry: &WorkEntry) -> Option<&'static str> {
    [
        ("Company Name", &entry.company),
        ("Duration", &entry.duration),
        ("Job Responsibilities", &entry.responsibilities),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty())
    .map(|(label, _)| label)
}
