//! Projections from a selected institution to the assistant's context options.

use std::collections::BTreeSet;

use serde::Serialize;

use super::error::{RequiredField, ValidationError};
use super::generation::GenerationContext;
use super::mode::PlanType;
use super::profile::{Institution, InstitutionId, Level, Profile, SchoolContext};

/// Which optional level-specific input the create form shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelExtraKind {
    SpecialDates,
    SyllabusReference,
    GeneralContext,
}

pub fn levels_for(institution: &Institution) -> &BTreeSet<Level> {
    &institution.levels
}

/// First level present in the declared order `[Initial, Primary, Secondary]`.
pub fn default_level(levels: &BTreeSet<Level>) -> Option<Level> {
    Level::ALL.into_iter().find(|level| levels.contains(level))
}

pub fn context_tag(institution: &Institution) -> SchoolContext {
    institution.context
}

pub fn plan_types_for(level: Option<Level>) -> Vec<PlanType> {
    match level {
        Some(Level::Primary) | Some(Level::Secondary) => vec![PlanType::Annual, PlanType::Monthly],
        Some(Level::Initial) | None => vec![PlanType::Activities],
    }
}

pub fn level_extra_kind(level: Option<Level>) -> LevelExtraKind {
    match level {
        Some(Level::Primary) => LevelExtraKind::SpecialDates,
        Some(Level::Secondary) => LevelExtraKind::SyllabusReference,
        _ => LevelExtraKind::GeneralContext,
    }
}

/// Options the assistant page shows once an institution (and maybe a level) is picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextOptions {
    pub institution_id: InstitutionId,
    pub institution_name: String,
    pub levels: Vec<Level>,
    pub selected_level: Option<Level>,
    pub context_tag: SchoolContext,
    pub plan_types: Vec<PlanType>,
    pub level_extra: LevelExtraKind,
}

pub fn context_options(
    profile: &Profile,
    institution_id: &InstitutionId,
    level: Option<Level>,
) -> Result<ContextOptions, ValidationError> {
    let institution = find_institution(profile, institution_id)?;
    let selected_level = select_level(institution, level)?;

    Ok(ContextOptions {
        institution_id: institution.id.clone(),
        institution_name: institution.name.clone(),
        levels: levels_for(institution).iter().copied().collect(),
        selected_level,
        context_tag: context_tag(institution),
        plan_types: plan_types_for(selected_level),
        level_extra: level_extra_kind(selected_level),
    })
}

/// Build the generation context for a selection.
///
/// A missing level falls back to the institution's default level.
pub fn resolve_context(
    profile: &Profile,
    institution_id: Option<&InstitutionId>,
    level: Option<Level>,
) -> Result<GenerationContext, ValidationError> {
    let institution_id =
        institution_id.ok_or(ValidationError::MissingField(RequiredField::Institution))?;
    let institution = find_institution(profile, institution_id)?;
    let level = select_level(institution, level)?;

    Ok(GenerationContext {
        institution_name: institution.name.clone(),
        level,
        context_tag: context_tag(institution),
    })
}

fn find_institution<'a>(
    profile: &'a Profile,
    id: &InstitutionId,
) -> Result<&'a Institution, ValidationError> {
    profile.institution(id).ok_or_else(|| ValidationError::UnknownInstitution(id.to_string()))
}

fn select_level(
    institution: &Institution,
    level: Option<Level>,
) -> Result<Option<Level>, ValidationError> {
    match level {
        None => Ok(default_level(levels_for(institution))),
        Some(level) if institution.levels.contains(&level) => Ok(Some(level)),
        Some(level) => Err(ValidationError::LevelNotOffered {
            level: level.display_name().to_string(),
            institution: institution.name.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn institution(id: &str, levels: &[Level], context: SchoolContext) -> Institution {
        Institution {
            id: InstitutionId::from(id),
            name: format!("School {}", id),
            levels: levels.iter().copied().collect(),
            context,
        }
    }

    fn profile(institutions: Vec<Institution>) -> Profile {
        Profile {
            teacher_name: "Nahuel".into(),
            teacher_surname: "Ghilardi".into(),
            teacher_email: None,
            institutions,
        }
    }

    #[test]
    fn default_level_follows_declared_order() {
        let levels: BTreeSet<Level> = [Level::Secondary, Level::Primary].into_iter().collect();
        assert_eq!(default_level(&levels), Some(Level::Primary));
        assert_eq!(default_level(&BTreeSet::new()), None);
    }

    #[test]
    fn plan_types_depend_on_level() {
        assert_eq!(plan_types_for(Some(Level::Primary)), vec![PlanType::Annual, PlanType::Monthly]);
        assert_eq!(plan_types_for(Some(Level::Initial)), vec![PlanType::Activities]);
        assert_eq!(plan_types_for(None), vec![PlanType::Activities]);
    }

    #[test]
    fn level_extra_matches_level() {
        assert_eq!(level_extra_kind(Some(Level::Primary)), LevelExtraKind::SpecialDates);
        assert_eq!(level_extra_kind(Some(Level::Secondary)), LevelExtraKind::SyllabusReference);
        assert_eq!(level_extra_kind(Some(Level::Initial)), LevelExtraKind::GeneralContext);
    }

    #[test]
    fn options_preselect_default_level() {
        let p = profile(vec![institution(
            "a",
            &[Level::Secondary, Level::Primary],
            SchoolContext::Rural,
        )]);
        let options = context_options(&p, &InstitutionId::from("a"), None).unwrap();

        assert_eq!(options.levels, vec![Level::Primary, Level::Secondary]);
        assert_eq!(options.selected_level, Some(Level::Primary));
        assert_eq!(options.context_tag, SchoolContext::Rural);
        assert_eq!(options.level_extra, LevelExtraKind::SpecialDates);
    }

    #[test]
    fn institution_without_levels_has_no_selected_level() {
        let p = profile(vec![institution("a", &[], SchoolContext::Urban)]);
        let context = resolve_context(&p, Some(&InstitutionId::from("a")), None).unwrap();
        assert_eq!(context.level, None);
    }

    #[test]
    fn level_outside_institution_is_rejected() {
        let p = profile(vec![institution("a", &[Level::Initial], SchoolContext::Urban)]);
        let err = resolve_context(&p, Some(&InstitutionId::from("a")), Some(Level::Secondary))
            .unwrap_err();
        assert!(matches!(err, ValidationError::LevelNotOffered { .. }));
    }

    #[test]
    fn unknown_or_missing_institution_is_rejected() {
        let p = profile(vec![institution("a", &[], SchoolContext::Urban)]);
        assert_eq!(
            resolve_context(&p, Some(&InstitutionId::from("zzz")), None),
            Err(ValidationError::UnknownInstitution("zzz".into()))
        );
        assert_eq!(
            resolve_context(&p, None, None),
            Err(ValidationError::MissingField(RequiredField::Institution))
        );
    }

    #[test]
    fn selection_follows_id_not_position() {
        let p = profile(vec![
            institution("b", &[Level::Secondary], SchoolContext::UrbanMarginal),
            institution("a", &[Level::Primary], SchoolContext::Rural),
        ]);
        let context = resolve_context(&p, Some(&InstitutionId::from("a")), None).unwrap();
        assert_eq!(context.institution_name, "School a");
        assert_eq!(context.context_tag, SchoolContext::Rural);
    }
}
