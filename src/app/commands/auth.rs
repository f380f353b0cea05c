//! Demo access gate. See [`crate::domain::session`] for what it does not do.

use tracing::info;

use crate::app::AppContext;
use crate::domain::session::{LoginForm, RegistrationForm};
use crate::domain::{AppError, SessionId};

pub fn register(
    ctx: &AppContext,
    session: &SessionId,
    form: &RegistrationForm,
) -> Result<(), AppError> {
    ctx.sessions().update(session, &mut |state| Ok(state.register(form)?))?;
    info!("demo account registered");
    Ok(())
}

pub fn login(ctx: &AppContext, session: &SessionId, form: &LoginForm) -> Result<(), AppError> {
    ctx.sessions().update(session, &mut |state| Ok(state.login(form)?))?;
    info!("demo account signed in");
    Ok(())
}

pub fn logout(ctx: &AppContext, session: &SessionId) -> Result<(), AppError> {
    ctx.sessions().update(session, &mut |state| Ok(state.logout()))?;
    info!("demo account signed out");
    Ok(())
}

pub fn is_authenticated(ctx: &AppContext, session: &SessionId) -> Result<bool, AppError> {
    Ok(ctx.sessions().get(session)?.authenticated)
}
