pub mod auth_repository;
pub mod company_repository;
pub mod course_repository;
pub mod course_section_repository;
pub mod enrollment_status_repository;
pub mod instructor_repository;
pub mod staff_repository;
pub mod student_repository;
pub mod users_repository;
pub mod visitor_repository;
