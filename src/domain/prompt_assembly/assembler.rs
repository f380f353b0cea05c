use include_dir::{Dir, include_dir};
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

use crate::domain::context_selector::{LevelExtraKind, level_extra_kind};
use crate::domain::error::{RequiredField, ValidationError};
use crate::domain::generation::{GenerationContext, GenerationRequest};
use crate::domain::mode::{AdaptFields, AnalyzeFields, CreateFields, ModeFields};

use super::error::PromptAssemblyError;

static PROMPT_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/prompts");

const CREATE_TEMPLATE: &str = "create.md.j2";
const ANALYZE_TEMPLATE: &str = "analyze.md.j2";
const ADAPT_TEMPLATE: &str = "adapt.md.j2";

/// Persona and locale the role statement is written for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionSettings {
    pub persona: String,
    pub region: String,
}

impl Default for InstructionSettings {
    fn default() -> Self {
        Self { persona: "Guidia".to_string(), region: "Mendoza".to_string() }
    }
}

/// Assemble the natural-language instruction for a generation request.
///
/// Required fields are checked before anything is rendered; the first unmet
/// one is reported. Output depends only on the inputs.
pub fn assemble_instruction(
    request: &GenerationRequest,
    settings: &InstructionSettings,
) -> Result<String, PromptAssemblyError> {
    let header = Header::new(request, settings);

    match &request.task {
        ModeFields::Create(fields) => {
            check_create(fields)?;
            render(CREATE_TEMPLATE, &CreateVars::new(header, &request.context, fields))
        }
        ModeFields::Analyze(fields) => {
            check_analyze(fields)?;
            render(ANALYZE_TEMPLATE, &AnalyzeVars::new(header, fields))
        }
        ModeFields::Adapt(fields) => {
            check_adapt(fields)?;
            render(ADAPT_TEMPLATE, &AdaptVars::new(header, fields))
        }
    }
}

fn check_create(fields: &CreateFields) -> Result<(), ValidationError> {
    require(&fields.subject, RequiredField::Subject)?;
    require(&fields.grade_or_year, RequiredField::GradeOrYear)?;
    if fields.plan_type.is_none() {
        return Err(ValidationError::MissingField(RequiredField::PlanType));
    }
    Ok(())
}

fn check_analyze(fields: &AnalyzeFields) -> Result<(), ValidationError> {
    require(&fields.document, RequiredField::DocumentToAnalyze)
}

fn check_adapt(fields: &AdaptFields) -> Result<(), ValidationError> {
    require(&fields.activity, RequiredField::ActivityToAdapt)
}

fn require(value: &str, field: RequiredField) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

fn render<S: Serialize>(template: &str, vars: &S) -> Result<String, PromptAssemblyError> {
    let source = PROMPT_DIR
        .get_file(template)
        .and_then(|file| file.contents_utf8())
        .ok_or_else(|| PromptAssemblyError::TemplateNotFound(template.to_string()))?;

    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    // Pasted text is embedded byte-for-byte.
    env.set_auto_escape_callback(|_| AutoEscape::None);

    env.render_str(source, vars).map_err(|err| PromptAssemblyError::TemplateRender {
        template: template.to_string(),
        reason: err.to_string(),
    })
}

#[derive(Serialize)]
struct Header<'a> {
    persona: &'a str,
    region: &'a str,
    teacher: &'a str,
    institution: &'a str,
    level: &'static str,
    context_tag: &'static str,
}

impl<'a> Header<'a> {
    fn new(request: &'a GenerationRequest, settings: &'a InstructionSettings) -> Self {
        Self {
            persona: &settings.persona,
            region: &settings.region,
            teacher: &request.teacher_name,
            institution: &request.context.institution_name,
            level: request.context.level.map(|level| level.display_name()).unwrap_or("general"),
            context_tag: request.context.context_tag.display_name(),
        }
    }
}

#[derive(Serialize)]
struct CreateVars<'a> {
    #[serde(flatten)]
    header: Header<'a>,
    plan: String,
    subject: &'a str,
    grade_or_year: &'a str,
    day_count: u32,
    student_count: u32,
    evaluation_count: u32,
    practical_work_count: u32,
    level_extra: String,
    inclusion: String,
    base_text: &'a str,
    base_text_missing: bool,
}

impl<'a> CreateVars<'a> {
    fn new(header: Header<'a>, context: &GenerationContext, fields: &'a CreateFields) -> Self {
        Self {
            header,
            plan: plan_label(context, fields),
            subject: &fields.subject,
            grade_or_year: &fields.grade_or_year,
            day_count: fields.day_count,
            student_count: fields.student_count,
            evaluation_count: fields.evaluation_count,
            practical_work_count: fields.practical_work_count,
            level_extra: level_extra(context, fields),
            inclusion: inclusion_summary(fields),
            base_text: &fields.base_text,
            base_text_missing: fields.base_text.trim().is_empty(),
        }
    }
}

fn plan_label(context: &GenerationContext, fields: &CreateFields) -> String {
    let Some(plan_type) = fields.plan_type else {
        return String::new();
    };
    let label = plan_type.describe(context.level);
    let month = fields.month.trim();
    if plan_type.is_monthly() && !month.is_empty() {
        format!("{} for the month of {}", label, month)
    } else {
        label.to_string()
    }
}

fn level_extra(context: &GenerationContext, fields: &CreateFields) -> String {
    let (prefix, value) = match level_extra_kind(context.level) {
        LevelExtraKind::SpecialDates => {
            ("Special events to consider (national holidays)", &fields.special_dates)
        }
        LevelExtraKind::SyllabusReference => {
            ("Reference syllabus / core textbook", &fields.syllabus_reference)
        }
        LevelExtraKind::GeneralContext => ("General context provided", &fields.general_context),
    };
    let value = value.trim();
    if value.is_empty() { String::new() } else { format!("{}: {}", prefix, value) }
}

fn inclusion_summary(fields: &CreateFields) -> String {
    let listed: Vec<String> = fields
        .inclusion
        .iter()
        .filter(|entry| entry.students > 0)
        .map(|entry| format!("{} ({} student/s)", entry.challenge.short_name(), entry.students))
        .collect();
    if listed.is_empty() { "none specified".to_string() } else { listed.join(", ") }
}

#[derive(Serialize)]
struct AnalyzeVars<'a> {
    #[serde(flatten)]
    header: Header<'a>,
    actions: String,
    no_actions: bool,
    document: &'a str,
}

impl<'a> AnalyzeVars<'a> {
    fn new(header: Header<'a>, fields: &'a AnalyzeFields) -> Self {
        let actions = if fields.actions.is_empty() {
            "(none selected)".to_string()
        } else {
            fields.actions.iter().map(|action| action.describe()).collect::<Vec<_>>().join("; ")
        };
        Self { header, actions, no_actions: fields.actions.is_empty(), document: &fields.document }
    }
}

#[derive(Serialize)]
struct AdaptVars<'a> {
    #[serde(flatten)]
    header: Header<'a>,
    challenges: String,
    activity: &'a str,
}

impl<'a> AdaptVars<'a> {
    fn new(header: Header<'a>, fields: &'a AdaptFields) -> Self {
        let challenges = if fields.challenges.is_empty() {
            "none".to_string()
        } else {
            fields
                .challenges
                .iter()
                .map(|challenge| challenge.short_name())
                .collect::<Vec<_>>()
                .join(", ")
        };
        Self { header, challenges, activity: &fields.activity }
    }
}
