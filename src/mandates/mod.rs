//! Mandate templates, the configuration form, the custom-mandate wizard and
//! the board that owns configured mandates.

pub mod board;
pub mod custom;
pub mod form;
pub mod icons;

pub use board::MandateBoard;
pub use custom::CustomMandateWizard;
pub use form::MandateForm;
pub use icons::IconName;
