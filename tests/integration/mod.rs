mod auth_test;
mod health_test;
mod resource_test;
mod user_test;
