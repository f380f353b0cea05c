//! Assistant modes and the fields each of them collects.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::profile::{InstitutionId, Level};

/// What the teacher wants the assistant to do. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Build a new annual/monthly plan.
    #[default]
    Create,
    /// Review an existing plan (rubrics, summary, inclusion suggestions).
    Analyze,
    /// Quickly adapt a daily activity for inclusion challenges.
    Adapt,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Create, Mode::Analyze, Mode::Adapt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Create => "create",
            Mode::Analyze => "analyze",
            Mode::Adapt => "adapt",
        }
    }

    /// Verb used in the instruction's task line.
    pub fn task_verb(&self) -> &'static str {
        match self {
            Mode::Create => "CREATE",
            Mode::Analyze => "ANALYZE",
            Mode::Adapt => "ADAPT",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Annual,
    Monthly,
    Activities,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Annual => "annual",
            PlanType::Monthly => "monthly",
            PlanType::Activities => "activities",
        }
    }

    pub fn is_monthly(&self) -> bool {
        matches!(self, PlanType::Monthly)
    }

    /// Plan wording as offered for a given level.
    pub fn describe(&self, level: Option<Level>) -> &'static str {
        match (self, level) {
            (PlanType::Annual, Some(Level::Primary)) => "Annual plan (grid)",
            (PlanType::Monthly, Some(Level::Primary)) => "Monthly plan (activities and rubrics)",
            (PlanType::Annual, Some(Level::Secondary)) => "Annual plan (from the core textbook)",
            (PlanType::Monthly, Some(Level::Secondary)) => "Monthly plan (from the annual plan)",
            (PlanType::Annual, _) => "Annual plan",
            (PlanType::Monthly, _) => "Monthly plan",
            (PlanType::Activities, _) => "Activity plan",
        }
    }
}

/// Learning differences the plans can be adapted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InclusionChallenge {
    Adhd,
    Dyslexia,
    Add,
    Asd,
    Dyscalculia,
    HighAbilities,
}

impl InclusionChallenge {
    pub const ALL: [InclusionChallenge; 6] = [
        InclusionChallenge::Adhd,
        InclusionChallenge::Dyslexia,
        InclusionChallenge::Add,
        InclusionChallenge::Asd,
        InclusionChallenge::Dyscalculia,
        InclusionChallenge::HighAbilities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InclusionChallenge::Adhd => "adhd",
            InclusionChallenge::Dyslexia => "dyslexia",
            InclusionChallenge::Add => "add",
            InclusionChallenge::Asd => "asd",
            InclusionChallenge::Dyscalculia => "dyscalculia",
            InclusionChallenge::HighAbilities => "high_abilities",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            InclusionChallenge::Adhd => "ADHD",
            InclusionChallenge::Dyslexia => "Dyslexia",
            InclusionChallenge::Add => "ADD",
            InclusionChallenge::Asd => "ASD",
            InclusionChallenge::Dyscalculia => "Dyscalculia",
            InclusionChallenge::HighAbilities => "High abilities",
        }
    }

    pub fn long_name(&self) -> &'static str {
        match self {
            InclusionChallenge::Adhd => "ADHD (attention deficit with hyperactivity)",
            InclusionChallenge::Dyslexia => "Dyslexia",
            InclusionChallenge::Add => "ADD (attention deficit without hyperactivity)",
            InclusionChallenge::Asd => "ASD (mild autism spectrum disorder)",
            InclusionChallenge::Dyscalculia => "Dyscalculia (difficulty with mathematics)",
            InclusionChallenge::HighAbilities => "High abilities",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzeAction {
    Rubrics,
    Summary,
    InclusionSuggestions,
}

impl AnalyzeAction {
    pub const ALL: [AnalyzeAction; 3] =
        [AnalyzeAction::Rubrics, AnalyzeAction::Summary, AnalyzeAction::InclusionSuggestions];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzeAction::Rubrics => "rubrics",
            AnalyzeAction::Summary => "summary",
            AnalyzeAction::InclusionSuggestions => "inclusion_suggestions",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            AnalyzeAction::Rubrics => "Generate evaluation rubrics",
            AnalyzeAction::Summary => "Summarize for a substitute teacher (key topics)",
            AnalyzeAction::InclusionSuggestions => "Suggest inclusion adaptations",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionCount {
    pub challenge: InclusionChallenge,
    pub students: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateFields {
    pub subject: String,
    pub grade_or_year: String,
    pub plan_type: Option<PlanType>,
    /// Only read for monthly plans.
    pub month: String,
    pub student_count: u32,
    pub day_count: u32,
    pub evaluation_count: u32,
    pub practical_work_count: u32,
    pub inclusion: Vec<InclusionCount>,
    pub base_text: String,
    /// Primary level extra.
    pub special_dates: String,
    /// Secondary level extra.
    pub syllabus_reference: String,
    /// Extra for any other level.
    pub general_context: String,
}

impl Default for CreateFields {
    fn default() -> Self {
        Self {
            subject: String::new(),
            grade_or_year: String::new(),
            plan_type: None,
            month: String::new(),
            student_count: 30,
            day_count: 20,
            evaluation_count: 2,
            practical_work_count: 3,
            inclusion: Vec::new(),
            base_text: String::new(),
            special_dates: String::new(),
            syllabus_reference: String::new(),
            general_context: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeFields {
    pub actions: Vec<AnalyzeAction>,
    pub document: String,
}

impl Default for AnalyzeFields {
    fn default() -> Self {
        Self { actions: vec![AnalyzeAction::Rubrics], document: String::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptFields {
    pub activity: String,
    pub challenges: Vec<InclusionChallenge>,
}

impl Default for AdaptFields {
    fn default() -> Self {
        Self { activity: String::new(), challenges: vec![InclusionChallenge::Adhd] }
    }
}

/// Fields of the active mode only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "fields", rename_all = "snake_case")]
pub enum ModeFields {
    Create(CreateFields),
    Analyze(AnalyzeFields),
    Adapt(AdaptFields),
}

impl ModeFields {
    pub fn mode(&self) -> Mode {
        match self {
            ModeFields::Create(_) => Mode::Create,
            ModeFields::Analyze(_) => Mode::Analyze,
            ModeFields::Adapt(_) => Mode::Adapt,
        }
    }
}

/// The assistant page's form: the mode switch, the context selection, and
/// one draft per mode. Drafts of inactive modes are kept but never read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantForm {
    pub mode: Mode,
    pub institution: Option<InstitutionId>,
    pub level: Option<Level>,
    pub create: CreateFields,
    pub analyze: AnalyzeFields,
    pub adapt: AdaptFields,
}

impl AssistantForm {
    pub fn select_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn active_fields(&self) -> ModeFields {
        match self.mode {
            Mode::Create => ModeFields::Create(self.create.clone()),
            Mode::Analyze => ModeFields::Analyze(self.analyze.clone()),
            Mode::Adapt => ModeFields::Adapt(self.adapt.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_mode_keeps_other_drafts() {
        let mut form = AssistantForm::default();
        form.create.subject = "Math".to_string();
        form.select_mode(Mode::Adapt);
        form.adapt.activity = "Read chapter 2".to_string();
        form.select_mode(Mode::Create);

        assert_eq!(form.create.subject, "Math");
        assert_eq!(form.adapt.activity, "Read chapter 2");
    }

    #[test]
    fn only_active_draft_is_read() {
        let mut form = AssistantForm::default();
        form.create.subject = "Math".to_string();
        form.select_mode(Mode::Analyze);

        match form.active_fields() {
            ModeFields::Analyze(fields) => assert_eq!(fields.actions, vec![AnalyzeAction::Rubrics]),
            other => panic!("unexpected fields: {:?}", other),
        }
    }

    #[test]
    fn create_defaults_match_form_defaults() {
        let fields = CreateFields::default();
        assert_eq!(fields.student_count, 30);
        assert_eq!(fields.day_count, 20);
        assert_eq!(fields.evaluation_count, 2);
        assert_eq!(fields.practical_work_count, 3);
    }

    #[test]
    fn mode_fields_serialize_with_mode_tag() {
        let value = serde_json::to_value(ModeFields::Adapt(AdaptFields::default())).unwrap();
        assert_eq!(value["mode"], "adapt");
        assert_eq!(value["fields"]["challenges"][0], "adhd");
    }

    #[test]
    fn names_match_serialized_values() {
        for challenge in InclusionChallenge::ALL {
            assert_eq!(serde_json::to_value(challenge).unwrap(), challenge.as_str());
        }
        for action in AnalyzeAction::ALL {
            assert_eq!(serde_json::to_value(action).unwrap(), action.as_str());
        }
        assert_eq!(serde_json::to_value(PlanType::Activities).unwrap(), "activities");
    }

    #[test]
    fn plan_wording_depends_on_level() {
        assert_eq!(PlanType::Annual.describe(Some(Level::Primary)), "Annual plan (grid)");
        assert_eq!(PlanType::Activities.describe(None), "Activity plan");
        assert!(PlanType::Monthly.is_monthly());
    }
}
