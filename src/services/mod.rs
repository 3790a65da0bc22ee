pub(crate) mod assessment_export;
pub(crate) mod enrollment;
pub(crate) mod meeting_status;
pub(crate) mod payment_links;
pub(crate) mod pricing;
pub(crate) mod roadmap;
