//! In-memory form state. The UI layer writes field values here; the collector
//! and layout engine never look at anything else.

use crate::errors::AppError;
use crate::form::sections::{SectionKind, SectionManager, SectionSlot};
use crate::models::portfolio::{PersonalInfo, Skills};

/// A form field identifier such as `company` (static item) or `company3`
/// (dynamic sub-section 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldId<'a> {
    pub name: &'a str,
    pub section_id: Option<u32>,
}

impl<'a> FieldId<'a> {
    /// Splits a trailing decimal id off the field name. A suffix that is not a
    /// valid id never addresses the static item.
    pub fn parse(raw: &'a str) -> Result<FieldId<'a>, AppError> {
        let name = raw.trim_end_matches(|c: char| c.is_ascii_digit());
        let suffix = &raw[name.len()..];
        if suffix.is_empty() {
            return Ok(FieldId {
                name,
                section_id: None,
            });
        }
        let id = suffix
            .parse::<u32>()
            .map_err(|_| AppError::Validation(format!("Unknown form field '{raw}'")))?;
        Ok(FieldId {
            name,
            section_id: Some(id),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub personal: PersonalInfo,
    pub skills: Skills,
    pub sections: SectionManager,
}

impl FormState {
    /// Applies one input change from the UI.
    pub fn set_field(&mut self, raw_field: &str, value: impl Into<String>) -> Result<(), AppError> {
        let value = value.into();
        let field = FieldId::parse(raw_field)?;

        if field.section_id.is_none() {
            let target = match field.name {
                "fullName" => Some(&mut self.personal.full_name),
                "email" => Some(&mut self.personal.email),
                "contact" => Some(&mut self.personal.contact),
                "bio" => Some(&mut self.personal.bio),
                "softSkills" => Some(&mut self.skills.soft),
                "technicalSkills" => Some(&mut self.skills.technical),
                _ => None,
            };
            if let Some(target) = target {
                *target = value;
                return Ok(());
            }
        }

        let kind = SectionKind::for_field(field.name)
            .ok_or_else(|| AppError::Validation(format!("Unknown form field '{raw_field}'")))?;
        let slot = match field.section_id {
            None => SectionSlot::Static,
            Some(id) => SectionSlot::Dynamic(id),
        };

        if self.sections.set_field(kind, slot, field.name, value) {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "{} item for field '{raw_field}' no longer exists",
                kind.label()
            )))
        }
    }

    pub fn set_photo(&mut self, data_uri: String) {
        self.personal.photo = data_uri;
    }

    /// Returns the form to its initial state, including section counters.
    pub fn reset(&mut self) {
        self.personal = PersonalInfo::default();
        self.skills = Skills::default();
        self.sections.reset();
    }
}
