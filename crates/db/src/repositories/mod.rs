pub mod section_repo;
pub mod version_repo;

pub use section_repo::SectionRepo;
pub use version_repo::VersionRepo;
