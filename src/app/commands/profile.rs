use tracing::info;

use crate::app::AppContext;
use crate::domain::{AppError, Profile, ProfileForm, SessionId};

/// Validate the form and replace the session's profile with it.
///
/// Nothing is written when validation fails.
pub fn save(ctx: &AppContext, session: &SessionId, form: &ProfileForm) -> Result<Profile, AppError> {
    let profile = form.validate()?;
    ctx.sessions().update(session, &mut |state| Ok(state.with_profile(profile.clone())))?;

    info!(institutions = profile.institutions.len(), "profile saved");
    Ok(profile)
}

pub fn get(ctx: &AppContext, session: &SessionId) -> Result<Option<Profile>, AppError> {
    Ok(ctx.sessions().get(session)?.profile)
}
