pub mod doctor;
pub mod export;
pub mod import;
pub mod maintenance;
pub mod remember;
pub mod reset;
pub mod search;
pub mod stats;
