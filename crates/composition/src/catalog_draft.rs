use shared::{
    domain::{CoffeeId, CoffeeKind},
    protocol::{BlendComponent, CatalogEntry, CoffeePayload},
};

use crate::{
    balance::{
        balance_percentage, coerce_percentage, sum_percentages, FULL_BLEND, MAX_BLEND_COMPONENTS,
    },
    error::{DraftError, ValidationError, ValidationIssue},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentField {
    SourceName(String),
    Percentage(u32),
}

impl ComponentField {
    /// Percentage edit from raw form text.
    pub fn percentage_input(raw: &str) -> Self {
        ComponentField::Percentage(coerce_percentage(raw))
    }
}

/// Editable catalog entry. Intermediate states may be invalid; only
/// [`CatalogDraft::to_persistable_payload`] enforces the blend rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDraft {
    id: Option<CoffeeId>,
    name: String,
    kind: CoffeeKind,
    components: Vec<BlendComponent>,
}

impl CatalogDraft {
    pub fn new(kind: CoffeeKind) -> Self {
        let mut draft = Self {
            id: None,
            name: String::new(),
            kind,
            components: Vec::new(),
        };
        draft.start_new(kind);
        draft
    }

    pub fn from_entry(entry: CatalogEntry) -> Self {
        let mut draft = Self::new(entry.kind);
        draft.start_edit(entry);
        draft
    }

    /// Resets to an empty entry. Blends start with one empty component row.
    pub fn start_new(&mut self, kind: CoffeeKind) {
        self.id = None;
        self.name.clear();
        self.kind = kind;
        self.components.clear();
        if kind == CoffeeKind::Blend {
            self.components.push(BlendComponent::default());
        }
    }

    /// Loads an existing entry verbatim, including data that would fail validation.
    pub fn start_edit(&mut self, entry: CatalogEntry) {
        self.id = entry.id;
        self.name = entry.name;
        self.kind = entry.kind;
        self.components = match entry.kind {
            CoffeeKind::Blend => entry.components,
            CoffeeKind::SingleOrigin => Vec::new(),
        };
    }

    pub fn id(&self) -> Option<&CoffeeId> {
        self.id.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CoffeeKind {
        self.kind
    }

    pub fn components(&self) -> &[BlendComponent] {
        &self.components
    }

    pub fn total_percentage(&self) -> u32 {
        sum_percentages(&self.components)
    }

    pub fn can_add_component(&self) -> bool {
        self.kind == CoffeeKind::Blend && self.components.len() < MAX_BLEND_COMPONENTS
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
    }

    /// Appends an empty component and returns its index.
    pub fn add_component(&mut self) -> Result<usize, DraftError> {
        if self.kind != CoffeeKind::Blend {
            return Err(DraftError::NotABlend);
        }
        if self.components.len() >= MAX_BLEND_COMPONENTS {
            return Err(DraftError::ComponentLimit {
                max: MAX_BLEND_COMPONENTS,
            });
        }
        self.components.push(BlendComponent::default());
        Ok(self.components.len() - 1)
    }

    pub fn remove_component(&mut self, index: usize) -> Result<BlendComponent, DraftError> {
        self.check_index(index)?;
        if self.components.len() == 1 {
            return Err(DraftError::LastSlot("component"));
        }
        Ok(self.components.remove(index))
    }

    /// Updates one component. Percentage edits are clamped so the blend total never
    /// passes 100; the edited field takes the whole correction.
    pub fn set_component_field(
        &mut self,
        index: usize,
        field: ComponentField,
    ) -> Result<(), DraftError> {
        self.check_index(index)?;
        match field {
            ComponentField::SourceName(name) => {
                self.components[index].source_name = name;
            }
            ComponentField::Percentage(requested) => {
                let others_total = self
                    .components
                    .iter()
                    .enumerate()
                    .filter(|(position, _)| *position != index)
                    .fold(0u32, |total, (_, component)| {
                        total.saturating_add(component.percentage)
                    });
                self.components[index].percentage = balance_percentage(others_total, requested);
            }
        }
        Ok(())
    }

    pub fn validate_for_submit(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(ValidationIssue::MissingName);
        }

        if self.kind == CoffeeKind::Blend {
            let count = self.components.len();
            if count == 0 || count > MAX_BLEND_COMPONENTS {
                issues.push(ValidationIssue::ComponentCount {
                    count,
                    max: MAX_BLEND_COMPONENTS,
                });
            }
            for (index, component) in self.components.iter().enumerate() {
                if component.source_name.trim().is_empty() {
                    issues.push(ValidationIssue::MissingSource { index });
                }
                if component.percentage == 0 {
                    issues.push(ValidationIssue::ZeroPercentage { index });
                }
            }
            let total = self.total_percentage();
            if total != FULL_BLEND {
                issues.push(ValidationIssue::PercentageTotal { total });
            }
        }

        ValidationError::check(issues)
    }

    pub fn is_submittable(&self) -> bool {
        self.validate_for_submit().is_ok()
    }

    pub fn to_persistable_payload(&self) -> Result<CoffeePayload, DraftError> {
        self.validate_for_submit()?;
        let components = match self.kind {
            CoffeeKind::Blend => Some(self.components.clone()),
            CoffeeKind::SingleOrigin => None,
        };
        Ok(CoffeePayload {
            name: self.name.trim().to_string(),
            kind: self.kind,
            components,
        })
    }

    fn check_index(&self, index: usize) -> Result<(), DraftError> {
        if index < self.components.len() {
            Ok(())
        } else {
            Err(DraftError::IndexOutOfRange {
                what: "component",
                index,
                len: self.components.len(),
            })
        }
    }
}
