pub mod milestone;

pub use milestone::MilestoneService;
