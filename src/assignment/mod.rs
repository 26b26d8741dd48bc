pub mod assignment_models;
pub mod assignment_dto;
pub mod assignment_repository;
pub mod assignment_handlers;
pub mod assignment_service;

pub use assignment_models::{Assignment, Submission, SubmissionStatus};
pub use assignment_repository::AssignmentRepository;
pub use assignment_service::AssignmentService;
