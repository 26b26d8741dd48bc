pub mod program_models;
pub mod program_dto;
pub mod program_repository;
pub mod program_handlers;
pub mod program_service;

pub use program_models::{Program, ProgramStatus, ProgramSummary};
pub use program_repository::ProgramRepository;
pub use program_service::ProgramService;
