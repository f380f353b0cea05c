//! Teacher profile and the institutions it declares.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;

/// Educational level taught at an institution.
///
/// Declaration order is the canonical order used for defaults and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Initial,
    Primary,
    Secondary,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Initial, Level::Primary, Level::Secondary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Initial => "initial",
            Level::Primary => "primary",
            Level::Secondary => "secondary",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Level::Initial => "Initial",
            Level::Primary => "Primary",
            Level::Secondary => "Secondary",
        }
    }

    pub fn from_name(name: &str) -> Option<Level> {
        match name.trim().to_lowercase().as_str() {
            "initial" | "inicial" => Some(Level::Initial),
            "primary" | "primario" => Some(Level::Primary),
            "secondary" | "secundario" => Some(Level::Secondary),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Socio-geographic setting of an institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolContext {
    #[default]
    Urban,
    Rural,
    UrbanMarginal,
}

impl SchoolContext {
    pub const ALL: [SchoolContext; 3] =
        [SchoolContext::Urban, SchoolContext::Rural, SchoolContext::UrbanMarginal];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolContext::Urban => "urban",
            SchoolContext::Rural => "rural",
            SchoolContext::UrbanMarginal => "urban_marginal",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SchoolContext::Urban => "urban",
            SchoolContext::Rural => "rural",
            SchoolContext::UrbanMarginal => "urban-marginal",
        }
    }
}

impl fmt::Display for SchoolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Stable opaque identifier of an institution, assigned on first save.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstitutionId(String);

impl InstitutionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstitutionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for InstitutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
    pub id: InstitutionId,
    pub name: String,
    pub levels: BTreeSet<Level>,
    pub context: SchoolContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub teacher_name: String,
    pub teacher_surname: String,
    pub teacher_email: Option<String>,
    pub institutions: Vec<Institution>,
}

impl Profile {
    /// Look an institution up by its stable identifier.
    pub fn institution(&self, id: &InstitutionId) -> Option<&Institution> {
        self.institutions.iter().find(|institution| &institution.id == id)
    }
}

/// One institution card as submitted by the profile form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionRow {
    /// Present when the row was saved before; keeps selections pointing at it.
    #[serde(default)]
    pub id: Option<InstitutionId>,
    #[serde(default)]
    pub name: String,
    /// `None` when no level checkbox was ticked.
    #[serde(default)]
    pub levels: Option<Vec<Level>>,
    #[serde(default)]
    pub context: Option<SchoolContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub institutions: Vec<InstitutionRow>,
}

impl ProfileForm {
    /// Validate the form and build a profile, assigning fresh ids where needed.
    pub fn validate(&self) -> Result<Profile, ValidationError> {
        self.validate_with(InstitutionId::generate)
    }

    /// Like [`ProfileForm::validate`] with a caller-provided id source.
    ///
    /// Rows are checked in index order and the first failure wins.
    pub fn validate_with<F>(&self, mut next_id: F) -> Result<Profile, ValidationError>
    where
        F: FnMut() -> InstitutionId,
    {
        if is_blank(&self.name) || is_blank(&self.surname) {
            return Err(ValidationError::MissingIdentity);
        }
        if self.institutions.is_empty() {
            return Err(ValidationError::NoInstitutions);
        }

        let mut seen = HashSet::new();
        let mut institutions = Vec::with_capacity(self.institutions.len());
        for (index, row) in self.institutions.iter().enumerate() {
            if is_blank(&row.name) {
                return Err(ValidationError::MissingInstitutionName(index));
            }

            // A duplicated id would make two cards indistinguishable.
            let id = match &row.id {
                Some(id) if !id.as_str().is_empty() && !seen.contains(id) => id.clone(),
                _ => next_id(),
            };
            seen.insert(id.clone());

            institutions.push(Institution {
                id,
                name: row.name.clone(),
                levels: row.levels.iter().flatten().copied().collect(),
                context: row.context.unwrap_or_default(),
            });
        }

        Ok(Profile {
            teacher_name: self.name.clone(),
            teacher_surname: self.surname.clone(),
            teacher_email: self.email.clone().filter(|email| !is_blank(email)),
            institutions,
        })
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
