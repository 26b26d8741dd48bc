pub mod announcement_models;
pub mod announcement_dto;
pub mod announcement_repository;
pub mod announcement_handlers;
pub mod announcement_service;

pub use announcement_models::Announcement;
pub use announcement_repository::AnnouncementRepository;
pub use announcement_service::AnnouncementService;
