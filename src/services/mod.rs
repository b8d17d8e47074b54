pub mod chat_service;
pub mod document_merger;
pub mod regeneration_service;
pub mod response_extractor;
