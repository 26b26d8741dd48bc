pub mod document_models;
pub mod document_repository;
pub mod document_handlers;
pub mod document_service;

pub use document_models::Document;
pub use document_repository::DocumentRepository;
pub use document_service::DocumentService;
