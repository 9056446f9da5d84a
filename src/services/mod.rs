pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod blockchain;
pub mod courses;
pub mod enrollments;
pub mod submissions;
pub mod system;
pub mod users;

pub use announcements::AnnouncementService;
pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use blockchain::BlockchainService;
pub use courses::CourseService;
pub use enrollments::EnrollmentService;
pub use submissions::SubmissionService;
pub use system::SystemService;
pub use users::UserService;
