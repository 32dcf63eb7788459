pub mod form;
pub mod validation;
