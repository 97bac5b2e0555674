// Draft state model: pool/pick reconciliation and derived views.

pub mod filter;
pub mod order;
pub mod state;
pub mod views;
