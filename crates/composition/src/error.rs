use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{what} index {index} is out of range (have {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    #[error("a blend holds at most {max} components")]
    ComponentLimit { max: usize },
    #[error("the last remaining {0} cannot be removed")]
    LastSlot(&'static str),
    #[error("single-origin coffees have no components")]
    NotABlend,
}

/// The control a validation issue belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueTarget {
    Name,
    Component(usize),
    Customer,
    DeliveryMethod,
    Line(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("name is required")]
    MissingName,
    #[error("a blend needs between 1 and {max} components, found {count}")]
    ComponentCount { count: usize, max: usize },
    #[error("component {} needs a coffee", .index + 1)]
    MissingSource { index: usize },
    #[error("component {} needs a percentage above 0", .index + 1)]
    ZeroPercentage { index: usize },
    #[error("blend percentages must total 100%, found {total}%")]
    PercentageTotal { total: u32 },
    #[error("customer is required")]
    MissingCustomer,
    #[error("delivery method is required")]
    MissingDeliveryMethod,
    #[error("coffee order #{} needs a coffee type", .line + 1)]
    MissingCoffeeType { line: usize },
    #[error("coffee order #{} needs a quantity above 0", .line + 1)]
    InvalidQuantity { line: usize },
    #[error("coffee order #{} needs a bag size", .line + 1)]
    MissingBagSize { line: usize },
}

impl ValidationIssue {
    pub fn target(&self) -> IssueTarget {
        match self {
            ValidationIssue::MissingName => IssueTarget::Name,
            ValidationIssue::ComponentCount { .. } | ValidationIssue::PercentageTotal { .. } => {
                IssueTarget::Component(0)
            }
            ValidationIssue::MissingSource { index } | ValidationIssue::ZeroPercentage { index } => {
                IssueTarget::Component(*index)
            }
            ValidationIssue::MissingCustomer => IssueTarget::Customer,
            ValidationIssue::MissingDeliveryMethod => IssueTarget::DeliveryMethod,
            ValidationIssue::MissingCoffeeType { line }
            | ValidationIssue::InvalidQuantity { line }
            | ValidationIssue::MissingBagSize { line } => IssueTarget::Line(*line),
        }
    }
}

/// Every reason a draft cannot be submitted yet. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", IssueList(.issues))]
pub struct ValidationError {
    issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub(crate) fn check(issues: Vec<ValidationIssue>) -> Result<(), ValidationError> {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    pub(crate) fn single(issue: ValidationIssue) -> Self {
        ValidationError {
            issues: vec![issue],
        }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn has(&self, issue: &ValidationIssue) -> bool {
        self.issues.contains(issue)
    }

    pub fn for_target(&self, target: IssueTarget) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.target() == target)
    }
}

struct IssueList<'a>(&'a [ValidationIssue]);

impl fmt::Display for IssueList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, issue) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}
