pub mod button;
pub mod error_view;
pub mod fields;
pub mod qr;
pub mod spinner;
pub mod status;
pub mod toast;
pub mod wizard;
