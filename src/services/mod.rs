pub mod audit;
pub mod housing_service;
pub mod liability_form_service;
pub mod meal_group_service;
pub mod payment_service;
pub mod registration_service;

pub use audit::AuditTrailService;
pub use housing_service::HousingService;
pub use liability_form_service::LiabilityFormService;
pub use meal_group_service::MealGroupService;
pub use payment_service::PaymentService;
pub use registration_service::RegistrationService;
