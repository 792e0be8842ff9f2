pub mod mapper;
pub mod service;
pub mod transfer;
