pub mod errors;
pub mod mailer;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::run;
