use sqlx::PgPool;

use crate::core::config::Settings;
use crate::db::types::PaymentMethod;
use crate::repositories;

/// Admin-configured external checkout URL for a course, if one is set.
/// Callers fall back to static bank/cash instructions when absent.
pub(crate) async fn get_payment_link(
    pool: &PgPool,
    course_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    let link = repositories::payment_links::find_for_course(pool, course_id).await?;
    Ok(link.map(|record| record.checkout_url).filter(|url| !url.trim().is_empty()))
}

pub(crate) fn fallback_instructions(method: PaymentMethod, settings: &Settings) -> Option<String> {
    match method {
        PaymentMethod::Online => None,
        PaymentMethod::Bank => Some(settings.payments().bank_transfer_instructions.clone()),
        PaymentMethod::Cash => Some(settings.payments().cash_payment_instructions.clone()),
    }
}
