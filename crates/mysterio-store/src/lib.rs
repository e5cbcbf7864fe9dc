//! Mysterio Store: process-lifetime storage for session aggregates.

pub mod in_memory_repository;

pub use in_memory_repository::InMemoryRepository;
