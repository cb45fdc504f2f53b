// Утилиты

pub mod b64;
pub mod serialization;
pub mod time;
pub mod uuid;
