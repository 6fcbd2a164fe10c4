pub mod add;
pub mod agenda;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod pull;
pub mod restore;
pub mod when;
