pub mod captioning;
pub mod observability;
pub mod speech;
pub mod storage;
