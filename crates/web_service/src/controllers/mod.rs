pub mod health_controller;
pub mod prepack_controller;
