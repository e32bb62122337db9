pub mod companion;
pub mod invite;
pub mod not_found;
pub mod pets;
pub mod recover;
