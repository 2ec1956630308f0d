pub mod emitters;
pub mod generator;
pub mod template;
pub mod zod_mapper;

pub use generator::EntitiesGenerator;
pub use zod_mapper::{RefStyle, to_ts_type, to_validator};
