pub mod auth_handler;
pub mod company_handler;
pub mod course_handler;
pub mod enrollment_status_handler;
pub mod file_handler;
pub mod health_handler;
pub mod instructor_handler;
pub mod staff_handler;
pub mod student_handler;
pub mod user_handler;
pub mod visitor_handler;
