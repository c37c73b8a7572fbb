pub mod account;
pub mod appointment;
pub mod doctor;
pub mod enums;
pub mod filters;
pub mod invoice;
pub mod medical_record;
pub mod patient;
pub mod prescription;
pub mod service;

pub use account::*;
pub use appointment::*;
pub use doctor::*;
pub use enums::*;
pub use filters::*;
pub use invoice::*;
pub use medical_record::*;
pub use patient::*;
pub use prescription::*;
pub use service::*;
