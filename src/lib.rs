pub mod attribute_group;
pub mod columns;
pub mod config;
pub mod criterion;
pub mod entity;
pub mod export;
pub mod fetch_compiler;
pub mod search_event;
pub mod session;
pub mod topology;
pub mod view;
pub mod xml;
