pub mod record;
pub mod report;
pub mod resource;
