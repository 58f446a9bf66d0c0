pub mod event_repository;
pub mod housing_lock_repository;
pub mod liability_form_repository;
pub mod meal_group_repository;
pub mod participant_repository;
pub mod payment_repository;
pub mod registration_repository;
pub mod room_repository;

// Re-export all repositories for convenient access
pub use event_repository::EventRepository;
pub use housing_lock_repository::HousingLockRepository;
pub use liability_form_repository::LiabilityFormRepository;
pub use meal_group_repository::{MealGroupRepository, NewMealGroup};
pub use participant_repository::ParticipantRepository;
pub use payment_repository::PaymentRepository;
pub use registration_repository::{
    NewGroupRegistration, NewIndividualRegistration, RegistrationRepository,
};
pub use room_repository::{NewRoom, RoomRepository};
