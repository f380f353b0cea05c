use tracing::info;

use crate::domain::AppError;
use crate::domain::feedback::FeedbackForm;

/// Accept feedback. It is written to the log and nowhere else.
pub fn submit(form: &FeedbackForm) -> Result<(), AppError> {
    form.validate()?;
    info!(rating = form.rating, message = %form.message.trim(), "feedback received");
    Ok(())
}
