//! Infrastructure layer - persistence, filesystem, services

pub mod chunk;
pub mod document;
pub mod filesystem;
pub mod identity;
pub mod knowledge_base;
pub mod logging;
pub mod services;
pub mod storage;
