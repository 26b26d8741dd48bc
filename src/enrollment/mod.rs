pub mod enrollment_models;
pub mod enrollment_dto;
pub mod enrollment_repository;
pub mod enrollment_handlers;
pub mod enrollment_service;

pub use enrollment_models::{Enrollment, EnrollmentStatus, EnrollmentWithProgram};
pub use enrollment_repository::EnrollmentRepository;
pub use enrollment_service::EnrollmentService;
