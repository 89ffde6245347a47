pub mod booking;
pub mod email;
pub mod messaging;
pub mod signature;
pub mod validation;
