pub mod attendance_models;
pub mod attendance_dto;
pub mod attendance_repository;
pub mod attendance_handlers;
pub mod attendance_service;

pub use attendance_models::{Attendance, AttendanceStatus};
pub use attendance_repository::AttendanceRepository;
pub use attendance_service::AttendanceService;
