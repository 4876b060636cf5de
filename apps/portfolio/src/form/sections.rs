//! Dynamic Section Manager: repeatable education / work / project sub-sections.
//!
//! Each kind owns its own identity counter. The counter starts at 1, which is the
//! id of the static item baked into the base form, and is incremented *before*
//! assignment, so the first added sub-section gets id 2. Ids are never recycled:
//! after removals they stay monotonic but sparse.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::portfolio::{EducationEntry, ProjectEntry, WorkEntry};

/// Id of the always-present, non-removable item of every section.
pub const STATIC_ITEM_ID: u32 = 1;

// ────────────────────────────────────────────────────────────────────────────
// Section kinds and entries
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Education,
    Work,
    Project,
}

impl SectionKind {
    /// Label used in sub-section headers ("Work Experience 3").
    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Education => "Education",
            SectionKind::Work => "Work Experience",
            SectionKind::Project => "Project",
        }
    }

    /// Resolves a form field name (without id suffix) to the section it belongs to.
    pub fn for_field(field: &str) -> Option<SectionKind> {
        [SectionKind::Education, SectionKind::Work, SectionKind::Project]
            .into_iter()
            .find(|kind| kind.field_names().contains(&field))
    }

    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            SectionKind::Education => EducationEntry::FIELDS,
            SectionKind::Work => WorkEntry::FIELDS,
            SectionKind::Project => ProjectEntry::FIELDS,
        }
    }
}

/// An entry type that can live in a repeatable section.
pub trait SectionEntry: Default + Clone {
    const KIND: SectionKind;
    /// Form field names, in form order. The first one is the primary field.
    const FIELDS: &'static [&'static str];

    /// Writes one field. Returns `false` for a name this entry does not have.
    fn set_field(&mut self, field: &str, value: String) -> bool;

    /// The identifying field: an entry with an empty primary field is not collected.
    fn primary(&self) -> &str;
}

impl SectionEntry for EducationEntry {
    const KIND: SectionKind = SectionKind::Education;
    const FIELDS: &'static [&'static str] = &["institution", "degree", "year", "grade"];

    fn set_field(&mut self, field: &str, value: String) -> bool {
        match field {
            "institution" => self.institution = value,
            "degree" => self.degree = value,
            "year" => self.year = value,
            "grade" => self.grade = value,
            _ => return false,
        }
        true
    }

    fn primary(&self) -> &str {
        &self.institution
    }
}

impl SectionEntry for WorkEntry {
    const KIND: SectionKind = SectionKind::Work;
    const FIELDS: &'static [&'static str] = &["company", "duration", "responsibilities"];

    fn set_field(&mut self, field: &str, value: String) -> bool {
        match field {
            "company" => self.company = value,
            "duration" => self.duration = value,
            "responsibilities" => self.responsibilities = value,
            _ => return false,
        }
        true
    }

    fn primary(&self) -> &str {
        &self.company
    }
}

impl SectionEntry for ProjectEntry {
    const KIND: SectionKind = SectionKind::Project;
    const FIELDS: &'static [&'static str] = &["projectName", "projectDescription", "projectLink"];

    fn set_field(&mut self, field: &str, value: String) -> bool {
        match field {
            "projectName" => self.name = value,
            "projectDescription" => self.description = value,
            // The link is optional: clearing the input removes it.
            "projectLink" => self.link = Some(value).filter(|v| !v.is_empty()),
            _ => return false,
        }
        true
    }

    fn primary(&self) -> &str {
        &self.name
    }
}

// ────────────────────────────────────────────────────────────────────────────
// One repeatable section
// ────────────────────────────────────────────────────────────────────────────

/// Addresses either the static item or a dynamically added sub-section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionSlot {
    Static,
    Dynamic(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicItem<E> {
    pub id: u32,
    pub entry: E,
}

/// The static item plus every added sub-section of one kind, in visual order.
#[derive(Debug, Clone)]
pub struct Section<E> {
    pub static_entry: E,
    items: Vec<DynamicItem<E>>,
    counter: u32,
}

impl<E: SectionEntry> Default for Section<E> {
    fn default() -> Self {
        Section {
            static_entry: E::default(),
            items: Vec::new(),
            counter: STATIC_ITEM_ID,
        }
    }
}

impl<E: SectionEntry> Section<E> {
    /// Appends an empty sub-section after the existing ones and returns its id.
    pub fn add(&mut self) -> u32 {
        self.counter += 1;
        let id = self.counter;
        self.items.push(DynamicItem {
            id,
            entry: E::default(),
        });
        debug!(kind = ?E::KIND, id, "Section added");
        id
    }

    /// Removes exactly the sub-section with `id`. The static item cannot be removed.
    pub fn remove(&mut self, id: u32) -> bool {
        match self.items.iter().position(|item| item.id == id) {
            Some(pos) => {
                self.items.remove(pos);
                debug!(kind = ?E::KIND, id, "Section removed");
                true
            }
            None => false,
        }
    }

    pub fn items(&self) -> &[DynamicItem<E>] {
        &self.items
    }

    #[cfg(test)]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn entry_mut(&mut self, slot: SectionSlot) -> Option<&mut E> {
        match slot {
            SectionSlot::Static => Some(&mut self.static_entry),
            SectionSlot::Dynamic(id) => self
                .items
                .iter_mut()
                .find(|item| item.id == id)
                .map(|item| &mut item.entry),
        }
    }

    pub fn reset(&mut self) {
        *self = Section::default();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Manager over all three kinds
// ────────────────────────────────────────────────────────────────────────────

/// Owns the lifecycle of every repeatable sub-section and its per-kind counter.
#[derive(Debug, Clone, Default)]
pub struct SectionManager {
    pub education: Section<EducationEntry>,
    pub work: Section<WorkEntry>,
    pub projects: Section<ProjectEntry>,
}

impl SectionManager {
    pub fn add_section(&mut self, kind: SectionKind) -> u32 {
        match kind {
            SectionKind::Education => self.education.add(),
            SectionKind::Work => self.work.add(),
            SectionKind::Project => self.projects.add(),
        }
    }

    /// No-op (returns `false`) if no sub-section of `kind` has this id.
    pub fn remove_section(&mut self, kind: SectionKind, id: u32) -> bool {
        match kind {
            SectionKind::Education => self.education.remove(id),
            SectionKind::Work => self.work.remove(id),
            SectionKind::Project => self.projects.remove(id),
        }
    }

    #[cfg(test)]
    pub fn counter(&self, kind: SectionKind) -> u32 {
        match kind {
            SectionKind::Education => self.education.counter(),
            SectionKind::Work => self.work.counter(),
            SectionKind::Project => self.projects.counter(),
        }
    }

    /// Ids of the dynamic sub-sections of `kind`, in visual order.
    #[cfg(test)]
    pub fn ids(&self, kind: SectionKind) -> Vec<u32> {
        match kind {
            SectionKind::Education => self.education.items().iter().map(|i| i.id).collect(),
            SectionKind::Work => self.work.items().iter().map(|i| i.id).collect(),
            SectionKind::Project => self.projects.items().iter().map(|i| i.id).collect(),
        }
    }

    /// Writes `field` of the addressed entry. Returns `false` if the slot or the
    /// field does not exist.
    pub fn set_field(
        &mut self,
        kind: SectionKind,
        slot: SectionSlot,
        field: &str,
        value: String,
    ) -> bool {
        match kind {
            SectionKind::Education => self
                .education
                .entry_mut(slot)
                .is_some_and(|e| e.set_field(field, value)),
            SectionKind::Work => self
                .work
                .entry_mut(slot)
                .is_some_and(|e| e.set_field(field, value)),
            SectionKind::Project => self
                .projects
                .entry_mut(slot)
                .is_some_and(|e| e.set_field(field, value)),
        }
    }

    /// Drops every dynamic sub-section, clears the static items and resets all
    /// counters to 1.
    pub fn reset(&mut self) {
        self.education.reset();
        self.work.reset();
        self.projects.reset();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
