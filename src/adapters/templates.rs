//! HTML page shells rendered from embedded minijinja templates.

use std::collections::BTreeMap;

use include_dir::{Dir, include_dir};
use minijinja::{AutoEscape, Environment, UndefinedBehavior, context};
use serde::Serialize;

use crate::domain::mode::{AnalyzeAction, InclusionChallenge, Mode, PlanType};
use crate::domain::profile::{Level, SchoolContext};
use crate::domain::{AppError, Route, SessionState};

static PAGE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/pages");

const PAGE_EXTENSION: &str = ".html.j2";

#[derive(Debug, Serialize)]
struct NavLink {
    path: &'static str,
    title: &'static str,
    current: bool,
}

#[derive(Debug, Serialize)]
struct Choice {
    value: &'static str,
    label: &'static str,
    long_label: &'static str,
}

pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, AppError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::Html);

        for file in PAGE_DIR.files() {
            let Some(name) = file.path().to_str() else { continue };
            let source = file.contents_utf8().ok_or_else(|| AppError::PageRender {
                page: name.to_string(),
                reason: "template is not UTF-8".to_string(),
            })?;
            env.add_template(name, source).map_err(|e| AppError::PageRender {
                page: name.to_string(),
                reason: e.to_string(),
            })?;
        }

        Ok(Self { env })
    }

    pub fn render(&self, route: Route, state: &SessionState) -> Result<String, AppError> {
        let name = template_name(route);
        let render_error = |reason: String| AppError::PageRender { page: name.clone(), reason };

        let template = self.env.get_template(&name).map_err(|e| render_error(e.to_string()))?;
        let institutions = state.profile.as_ref().map(|p| p.institutions.as_slice()).unwrap_or(&[]);

        let ctx = context! {
            title => route.title(),
            nav => nav_links(route, state.authenticated),
            authenticated => state.authenticated,
            user_email => state.user_email.clone(),
            profile => state.profile.clone(),
            levels => Level::ALL.map(|level| choice(level.as_str(), level.display_name())),
            contexts => SchoolContext::ALL
                .map(|context| choice(context.as_str(), context.display_name())),
            modes => Mode::ALL.map(|mode| choice(mode.as_str(), mode_label(mode))),
            actions => AnalyzeAction::ALL.map(|action| choice(action.as_str(), action.describe())),
            challenges => InclusionChallenge::ALL.map(|challenge| Choice {
                value: challenge.as_str(),
                label: challenge.short_name(),
                long_label: challenge.long_name(),
            }),
            institutions_json => script_json(&institutions)?,
            plan_labels_json => script_json(&plan_labels())?,
            challenge_values_json => script_json(&InclusionChallenge::ALL.map(|c| c.as_str()))?,
        };

        template.render(ctx).map_err(|e| render_error(e.to_string()))
    }
}

fn template_name(route: Route) -> String {
    let stem = match route {
        Route::Profile => "profile",
        Route::Login => "login",
        Route::Register => "register",
        Route::Assistant => "assistant",
        Route::About => "about",
        Route::Feedback => "feedback",
        Route::Terms => "terms",
        Route::Privacy => "privacy",
    };
    format!("{}{}", stem, PAGE_EXTENSION)
}

fn nav_links(current: Route, authenticated: bool) -> Vec<NavLink> {
    let routes: &[Route] = if authenticated {
        &[Route::Profile, Route::Assistant, Route::About, Route::Feedback]
    } else {
        &[Route::Login, Route::Register]
    };
    routes
        .iter()
        .map(|route| NavLink { path: route.path(), title: route.title(), current: *route == current })
        .collect()
}

fn choice(value: &'static str, label: &'static str) -> Choice {
    Choice { value, label, long_label: label }
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Create => "Create plan",
        Mode::Analyze => "Analyze plan",
        Mode::Adapt => "Quick adaptation",
    }
}

/// Plan-type wording per level key (`"none"` when no level is selected).
fn plan_labels() -> BTreeMap<&'static str, BTreeMap<&'static str, &'static str>> {
    let levels = Level::ALL.map(|level| (level.as_str(), Some(level)));
    levels
        .into_iter()
        .chain([("none", None)])
        .map(|(key, level)| {
            let labels = [PlanType::Annual, PlanType::Monthly, PlanType::Activities]
                .into_iter()
                .map(|plan| (plan.as_str(), plan.describe(level)))
                .collect();
            (key, labels)
        })
        .collect()
}

/// JSON safe to embed inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    let json = serde_json::to_string(value).map_err(|e| AppError::ParseError {
        what: "page data".to_string(),
        details: e.to_string(),
    })?;
    Ok(json.replace('<', "\\u003c"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::{Institution, InstitutionId, Profile};

    fn signed_in_with_profile() -> SessionState {
        SessionState {
            authenticated: true,
            user_email: Some("ana@example.com".into()),
            profile: Some(Profile {
                teacher_name: "Ana".into(),
                teacher_surname: "Paz".into(),
                teacher_email: None,
                institutions: vec![Institution {
                    id: InstitutionId::from("inst-1"),
                    name: "Escuela </script> 12".into(),
                    levels: [Level::Primary].into_iter().collect(),
                    context: SchoolContext::Rural,
                }],
            }),
            ..Default::default()
        }
    }

    #[test]
    fn every_route_renders() {
        let renderer = PageRenderer::new().unwrap();
        for route in Route::ALL {
            let html = renderer.render(route, &signed_in_with_profile()).unwrap();
            assert!(html.contains(route.title()), "{}", route);
        }
        for route in Route::ALL {
            assert!(renderer.render(route, &SessionState::default()).is_ok(), "{}", route);
        }
    }

    #[test]
    fn login_page_labels_demo_gate() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer.render(Route::Login, &SessionState::default()).unwrap();
        assert!(html.contains("does not authenticate"));
        assert!(!html.contains("Sign out"));
    }

    #[test]
    fn assistant_without_profile_asks_for_one() {
        let renderer = PageRenderer::new().unwrap();
        let state = SessionState { authenticated: true, ..Default::default() };
        let html = renderer.render(Route::Assistant, &state).unwrap();
        assert!(html.contains("Profile not found"));
    }

    #[test]
    fn embedded_json_cannot_close_script() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer.render(Route::Profile, &signed_in_with_profile()).unwrap();
        assert!(!html.contains("Escuela </script>"));
        assert!(html.contains("Escuela \\u003c/script>"));
    }

    #[test]
    fn plan_labels_cover_every_level() {
        let labels = plan_labels();
        assert_eq!(labels["primary"]["annual"], "Annual plan (grid)");
        assert_eq!(labels["none"]["activities"], "Activity plan");
    }
}
