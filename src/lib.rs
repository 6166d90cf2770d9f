pub mod altaz;
pub mod atmosphere;
pub mod catalog;
pub mod constants;
pub mod detection;
pub mod fix_params;
pub mod geometry;
pub mod intersection;
pub mod observation;
pub mod service;
pub mod sight;
pub mod sight_collection;
pub mod starfix_errors;
pub mod time;
